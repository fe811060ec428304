use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::core::effect::{
    DriftVelocity, EffectMode, EffectParams, ParticleSystem, ShapeSet,
};
use crate::core::palette::BASE_COLORS;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct SpawnRange<T> {
    pub min: T,
    pub max: T,
}

impl<T> SpawnRange<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: Default> Default for SpawnRange<T> {
    fn default() -> Self {
        Self {
            min: Default::default(),
            max: Default::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Confetti Rain".into(),
            auto_close: 0.0,
        }
    }
}

/// Explicit performance knobs; the original page derived these from mobile
/// user-agent sniffing, here they are configuration (flip with `--reduced`).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PerformanceConfig {
    pub reduced: bool,
    /// Ambient tick rate in Hz.
    pub frame_rate: f32,
    pub reduced_frame_rate: f32,
    /// Seconds a resize must settle before bounds are re-acquired.
    pub resize_debounce: f32,
}
impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            reduced: false,
            frame_rate: 60.0,
            reduced_frame_rate: 30.0,
            resize_debounce: 0.25,
        }
    }
}
impl PerformanceConfig {
    pub fn effective_frame_rate(&self) -> f32 {
        if self.reduced {
            self.reduced_frame_rate
        } else {
            self.frame_rate
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AmbientConfig {
    pub count: usize,
    pub reduced_count: usize,
    pub size_range: SpawnRange<f32>,
    /// Pixels per tick, downward.
    pub fall_speed: SpawnRange<f32>,
    pub wobble: f32,
}
impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            count: 100,
            reduced_count: 50,
            size_range: SpawnRange::new(4.0, 12.0),
            fall_speed: SpawnRange::new(2.0, 5.0),
            wobble: 1.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct BurstConfig {
    pub count: usize,
    pub reduced_count: usize,
    pub spread: f32,
    pub lift: f32,
    /// Pixels per tick^2, downward.
    pub gravity: f32,
    pub life: u32,
    pub size_range: SpawnRange<f32>,
}
impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            count: 50,
            reduced_count: 30,
            spread: 10.0,
            lift: 5.0,
            gravity: 0.5,
            life: 100,
            size_range: SpawnRange::new(5.0, 15.0),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SparkleConfig {
    pub count: usize,
    pub speed: SpawnRange<f32>,
    pub life: u32,
    pub size: f32,
}
impl Default for SparkleConfig {
    fn default() -> Self {
        Self {
            count: 10,
            speed: SpawnRange::new(1.0, 2.0),
            life: 50,
            size: 5.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct HeartConfig {
    pub count: usize,
    pub rise_speed: f32,
    pub sway: f32,
    pub life: u32,
    pub size: f32,
    /// Seconds between hearts in one train.
    pub stagger: f32,
}
impl Default for HeartConfig {
    fn default() -> Self {
        Self {
            count: 5,
            rise_speed: 2.0,
            sway: 1.0,
            life: 50,
            size: 12.0,
            stagger: 0.1,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CelebrationConfig {
    /// Seconds after startup before the welcome burst.
    pub welcome_delay: f32,
    /// Bursts fired by the headline easter egg.
    pub mega_rounds: u32,
    pub mega_interval: f32,
    /// Headline clicks required to trigger the easter egg.
    pub title_clicks: u32,
}
impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            welcome_delay: 1.0,
            mega_rounds: 10,
            mega_interval: 0.2,
            title_clicks: 5,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GreetingConfig {
    pub headline: String,
    pub subtitle: String,
    /// Characters per second for the subtitle typewriter.
    pub type_rate: f32,
    pub age: u32,
    /// Seconds for the age counter to reach `age`.
    pub age_count_duration: f32,
}
impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            headline: "Happy Birthday!".into(),
            subtitle: "Wishing you the happiest of days".into(),
            type_rate: 30.0,
            age: 25,
            age_count_duration: 2.0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct EffectsConfig {
    pub window: WindowConfig,
    pub performance: PerformanceConfig,
    pub ambient: AmbientConfig,
    pub burst: BurstConfig,
    pub sparkles: SparkleConfig,
    pub hearts: HeartConfig,
    pub celebration: CelebrationConfig,
    pub greeting: GreetingConfig,
}

impl EffectsConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Merge successive RON layers; later paths override earlier ones.
    /// Returns the config, the layers actually used, and any load errors.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut ron::value::Value, overlay: ron::value::Value) {
            use ron::value::Value;
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut incoming = Some(v);
                        let mut replaced = false;
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                let val = incoming.take().unwrap();
                                merge_value(ev, val);
                                replaced = true;
                                break;
                            }
                        }
                        if !replaced {
                            bm.insert(k, incoming.unwrap());
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        if let Some(val) = merged {
            match val.clone().into_rust::<EffectsConfig>() {
                Ok(cfg) => (cfg, used, errors),
                Err(e) => (EffectsConfig::default(), used, {
                    let mut evec = errors;
                    evec.push(format!(
                        "failed to deserialize merged config; using defaults: {e}"
                    ));
                    evec
                }),
            }
        } else {
            (EffectsConfig::default(), used, errors)
        }
    }

    /// Soft sanity pass: returns human-readable warnings, never fails.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        }
        if self.performance.frame_rate <= 0.0 || self.performance.reduced_frame_rate <= 0.0 {
            w.push("performance frame rates must be > 0".into());
        }
        if self.performance.reduced_frame_rate > self.performance.frame_rate {
            w.push(format!(
                "performance.reduced_frame_rate {} exceeds frame_rate {}",
                self.performance.reduced_frame_rate, self.performance.frame_rate
            ));
        }
        if self.performance.resize_debounce < 0.0 {
            w.push("performance.resize_debounce negative -> treated as immediate".into());
        }
        if self.ambient.count == 0 {
            w.push("ambient.count is 0; no confetti will fall".into());
        }
        if self.ambient.count > 10_000 {
            w.push(format!(
                "ambient.count {} very high; frame time may suffer",
                self.ambient.count
            ));
        }
        fn check_range_f32(w: &mut Vec<String>, label: &str, r: &SpawnRange<f32>) {
            if r.min > r.max {
                w.push(format!(
                    "{label} min ({}) greater than max ({})",
                    r.min, r.max
                ));
            }
        }
        check_range_f32(&mut w, "ambient.size_range", &self.ambient.size_range);
        if self.ambient.size_range.min <= 0.0 {
            w.push("ambient.size_range.min must be > 0".into());
        }
        check_range_f32(&mut w, "ambient.fall_speed", &self.ambient.fall_speed);
        if self.ambient.fall_speed.min < 0.0 {
            w.push("ambient.fall_speed.min negative -> confetti rises".into());
        }
        if self.ambient.wobble < 0.0 {
            w.push("ambient.wobble negative -> horizontal drift collapses to a fixed value".into());
        }
        check_range_f32(&mut w, "burst.size_range", &self.burst.size_range);
        if self.burst.size_range.min <= 0.0 {
            w.push("burst.size_range.min must be > 0".into());
        }
        if self.burst.gravity < 0.0 {
            w.push(format!(
                "burst.gravity is negative ({}); surface space is y-down, bursts will float away",
                self.burst.gravity
            ));
        }
        if self.burst.life == 0 {
            w.push("burst.life is 0; bursts would be rejected at spawn".into());
        }
        check_range_f32(&mut w, "sparkles.speed", &self.sparkles.speed);
        if self.sparkles.life == 0 {
            w.push("sparkles.life is 0; sparkles would be rejected at spawn".into());
        }
        if self.sparkles.size <= 0.0 {
            w.push("sparkles.size must be > 0".into());
        }
        if self.hearts.life == 0 {
            w.push("hearts.life is 0; hearts would be rejected at spawn".into());
        }
        if self.hearts.size <= 0.0 {
            w.push("hearts.size must be > 0".into());
        }
        if self.hearts.stagger < 0.0 {
            w.push("hearts.stagger negative -> whole train fires at once".into());
        }
        if self.hearts.sway < 0.0 {
            w.push("hearts.sway negative -> sway collapses to a fixed value".into());
        }
        if self.celebration.welcome_delay < 0.0 {
            w.push("celebration.welcome_delay negative -> welcome burst disabled".into());
        }
        if self.celebration.mega_rounds == 0 {
            w.push("celebration.mega_rounds is 0; easter egg does nothing".into());
        }
        if self.celebration.title_clicks == 0 {
            w.push("celebration.title_clicks is 0; every headline click is a surprise".into());
        }
        if self.greeting.type_rate <= 0.0 {
            w.push("greeting.type_rate must be > 0".into());
        }
        w
    }

    /// Effect factories: the single place the three loop variants are wired
    /// from configuration.
    pub fn ambient_system(&self) -> ParticleSystem {
        ParticleSystem::new(
            EffectMode::Ambient {
                fall_speed: self.ambient.fall_speed,
                wobble: self.ambient.wobble,
            },
            EffectParams {
                colors: BASE_COLORS.to_vec(),
                size_range: self.ambient.size_range,
                shapes: ShapeSet::Both,
                spin: true,
            },
        )
    }

    pub fn ambient_count(&self) -> usize {
        if self.performance.reduced {
            self.ambient.reduced_count
        } else {
            self.ambient.count
        }
    }

    pub fn burst_system(&self) -> ParticleSystem {
        ParticleSystem::new(
            EffectMode::Burst {
                spread: self.burst.spread,
                lift: self.burst.lift,
                gravity: self.burst.gravity,
                life: self.burst.life,
            },
            EffectParams {
                colors: BASE_COLORS.to_vec(),
                size_range: self.burst.size_range,
                shapes: ShapeSet::Square,
                spin: false,
            },
        )
    }

    pub fn burst_count(&self) -> usize {
        if self.performance.reduced {
            self.burst.reduced_count
        } else {
            self.burst.count
        }
    }

    pub fn sparkle_system(&self) -> ParticleSystem {
        ParticleSystem::new(
            EffectMode::Drift {
                velocity: DriftVelocity::Radial {
                    speed: self.sparkles.speed,
                },
                life: self.sparkles.life,
            },
            EffectParams {
                colors: vec![BASE_COLORS[3]], // yellow
                size_range: SpawnRange::new(self.sparkles.size, self.sparkles.size),
                shapes: ShapeSet::Circle,
                spin: false,
            },
        )
    }

    pub fn heart_system(&self) -> ParticleSystem {
        ParticleSystem::new(
            EffectMode::Drift {
                velocity: DriftVelocity::Rising {
                    speed: self.hearts.rise_speed,
                    sway: self.hearts.sway,
                },
                life: self.hearts.life,
            },
            EffectParams {
                colors: vec![BASE_COLORS[0]], // pink
                size_range: SpawnRange::new(self.hearts.size, self.hearts.size),
                shapes: ShapeSet::Circle,
                spin: true,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_no_warnings() {
        let cfg = EffectsConfig::default();
        let warnings = cfg.validate();
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn reduced_mode_lowers_counts_and_rate() {
        let mut cfg = EffectsConfig::default();
        assert_eq!(cfg.ambient_count(), 100);
        assert_eq!(cfg.burst_count(), 50);
        assert_eq!(cfg.performance.effective_frame_rate(), 60.0);
        cfg.performance.reduced = true;
        assert_eq!(cfg.ambient_count(), 50);
        assert_eq!(cfg.burst_count(), 30);
        assert_eq!(cfg.performance.effective_frame_rate(), 30.0);
    }

    #[test]
    fn suspicious_values_warn() {
        let mut cfg = EffectsConfig::default();
        cfg.burst.gravity = -0.5;
        cfg.ambient.count = 0;
        cfg.hearts.life = 0;
        let joined = cfg.validate().join("\n");
        assert!(joined.contains("burst.gravity"));
        assert!(joined.contains("ambient.count"));
        assert!(joined.contains("hearts.life"));
    }

    #[test]
    fn degenerate_motion_params_warn() {
        // Negative spans would invert the sampling range, which collapses to
        // a fixed value instead of panicking; flag them up front.
        let mut cfg = EffectsConfig::default();
        cfg.ambient.wobble = -1.0;
        cfg.hearts.sway = -0.5;
        cfg.celebration.welcome_delay = -2.0;
        let joined = cfg.validate().join("\n");
        assert!(joined.contains("ambient.wobble"));
        assert!(joined.contains("hearts.sway"));
        assert!(joined.contains("celebration.welcome_delay"));
    }
}
