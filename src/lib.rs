pub mod app;
pub mod core;
pub mod debug;
pub mod effects;
pub mod gameplay;
pub mod interaction;
pub mod rendering;

// Curated re-exports
pub use crate::app::celebration::CelebrationPlugin;
pub use crate::core::config::{EffectsConfig, SpawnRange, WindowConfig};
pub use crate::core::effect::{
    DriftVelocity, EffectMode, EffectParams, ParticleSurface, ParticleSystem, ShapeSet,
    SpawnError, SpawnOrigin, SurfaceBounds,
};
pub use crate::core::particle::{Life, Particle, Shape};
