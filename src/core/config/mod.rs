pub mod config;

pub use config::{
    AmbientConfig, BurstConfig, CelebrationConfig, EffectsConfig, GreetingConfig, HeartConfig,
    PerformanceConfig, SparkleConfig, SpawnRange, WindowConfig,
};
