//! The parameterized particle effect core.
//!
//! One [`ParticleSystem`] type covers all three celebration effects (the
//! indefinite confetti rain, radial bursts, decorative drifts); the effects
//! differ only in [`EffectMode`]: initial velocity distribution, gravity,
//! and whether particles wrap at the bottom edge or burn a life budget.
//! Rendering is behind the [`ParticleSurface`] capability trait so the
//! kinematic core stays backend-agnostic.

use bevy::prelude::*;
use rand::Rng;
use thiserror::Error;

use crate::core::config::SpawnRange;
use crate::core::palette::random_color;
use crate::core::particle::{Life, Particle, Shape};

/// Rotation speed sampled in `[-SPIN_SPEED_MAX, SPIN_SPEED_MAX]` degrees/tick
/// for spinning particles.
const SPIN_SPEED_MAX: f32 = 5.0;

/// Vertical position particles re-enter at when wrapping past the bottom.
const WRAP_RESPAWN_Y: f32 = -10.0;

/// Drawable region of the surface, in surface coordinates (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceBounds {
    pub width: f32,
    pub height: f32,
}

impl SurfaceBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A collapsed or zero-sized surface must not be ticked or drawn into.
    pub fn is_drawable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Where a batch of particles enters the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnOrigin {
    /// All particles start at this point (bursts, drifts).
    Point(Vec2),
    /// Anywhere across the top edge. For an ambient system the initial fill
    /// scatters over the whole surface instead, so the rain is already mid-air
    /// on the first frame; recycled particles always re-enter above y = 0.
    TopEdge,
}

/// Velocity distribution for drift effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriftVelocity {
    /// Evenly spaced ring around the origin (sparkles).
    Radial { speed: SpawnRange<f32> },
    /// Straight up with a small horizontal sway (hearts).
    Rising { speed: f32, sway: f32 },
}

/// What kind of system this is: the only thing distinguishing the three
/// celebration effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectMode {
    /// Indefinite fall; particles wrap at the bottom edge and never expire.
    Ambient {
        fall_speed: SpawnRange<f32>,
        /// Horizontal velocity sampled in `[-wobble, wobble]`.
        wobble: f32,
    },
    /// Finite scatter under gravity.
    Burst {
        /// Each velocity component sampled in `[-spread, spread]`.
        spread: f32,
        /// Upward bias subtracted from the initial vertical velocity.
        lift: f32,
        /// Added to `vel.y` once per tick (surface space: positive is down).
        gravity: f32,
        life: u32,
    },
    /// Finite directed motion without gravity.
    Drift { velocity: DriftVelocity, life: u32 },
}

impl EffectMode {
    fn gravity(&self) -> f32 {
        match self {
            EffectMode::Burst { gravity, .. } => *gravity,
            _ => 0.0,
        }
    }

    fn life_budget(&self) -> Option<u32> {
        match self {
            EffectMode::Ambient { .. } => None,
            EffectMode::Burst { life, .. } | EffectMode::Drift { life, .. } => Some(*life),
        }
    }
}

/// Which shapes a system may paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeSet {
    Square,
    Circle,
    /// 50/50 pick per particle.
    Both,
}

impl ShapeSet {
    fn sample(&self, rng: &mut impl Rng) -> Shape {
        match self {
            ShapeSet::Square => Shape::Square,
            ShapeSet::Circle => Shape::Circle,
            ShapeSet::Both => {
                if rng.gen_bool(0.5) {
                    Shape::Square
                } else {
                    Shape::Circle
                }
            }
        }
    }
}

/// Visual parameters shared by every mode.
#[derive(Debug, Clone)]
pub struct EffectParams {
    /// Non-empty palette; each particle picks uniformly.
    pub colors: Vec<Color>,
    /// Diameter range, strictly positive.
    pub size_range: SpawnRange<f32>,
    pub shapes: ShapeSet,
    /// Randomize rotation at spawn and advance it every tick.
    pub spin: bool,
}

/// Rejection of malformed spawn parameters. Raised before any particle is
/// created, so a failed spawn leaves the collection untouched.
#[derive(Debug, Error, PartialEq)]
pub enum SpawnError {
    #[error("color palette is empty")]
    EmptyPalette,
    #[error("size range [{min}, {max}] must be positive and ordered")]
    InvalidSizeRange { min: f32, max: f32 },
    #[error("speed range [{min}, {max}] is inverted")]
    InvalidSpeedRange { min: f32, max: f32 },
    #[error("life budget must be > 0 for finite effects")]
    ZeroLifeBudget,
    #[error("burst spread must be >= 0, got {0}")]
    NegativeSpread(f32),
}

/// Backend capability interface: how particles become pixels.
///
/// The ambient canvas-style backend clears the whole surface in [`begin`];
/// per-element backends (the sprite backend in this crate) use [`begin`] /
/// [`finish`] to diff their retained state against the live collection.
///
/// [`begin`]: ParticleSurface::begin
/// [`finish`]: ParticleSurface::finish
pub trait ParticleSurface {
    /// Called once per rendered frame, before any draw.
    fn begin(&mut self);
    /// Paint one particle at its current position, rotation, color and alpha.
    fn draw(&mut self, particle: &Particle);
    /// Called once after the last draw of the frame.
    fn finish(&mut self) {}
}

/// An ordered collection of particles advanced once per scheduling tick.
///
/// Each instance exclusively owns its collection; particles are never shared
/// across systems. Update and draw order is stable insertion order.
pub struct ParticleSystem {
    mode: EffectMode,
    params: EffectParams,
    particles: Vec<Particle>,
    next_id: u64,
}

impl ParticleSystem {
    pub fn new(mode: EffectMode, params: EffectParams) -> Self {
        Self {
            mode,
            params,
            particles: Vec::new(),
            next_id: 0,
        }
    }

    pub fn mode(&self) -> &EffectMode {
        &self.mode
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// A finite system is finished once every particle has expired; an
    /// ambient system never is, even while momentarily empty.
    pub fn is_finished(&self) -> bool {
        self.mode.life_budget().is_some() && self.particles.is_empty()
    }

    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Direct particle access for custom emitters and tests.
    pub fn particles_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.particles.iter_mut()
    }

    /// Batch-create `count` particles. `count == 0` is a valid no-op; invalid
    /// parameters are rejected up front with no partial spawn.
    pub fn spawn(
        &mut self,
        count: usize,
        origin: SpawnOrigin,
        bounds: SurfaceBounds,
    ) -> Result<(), SpawnError> {
        self.validate()?;
        let mut rng = rand::thread_rng();
        self.particles.reserve(count);
        for i in 0..count {
            let pos = self.spawn_pos(origin, bounds, &mut rng);
            let vel = self.spawn_vel(i, count, &mut rng);
            let (rotation, rotation_speed) = if self.params.spin {
                (
                    rng.gen_range(0.0..360.0),
                    rng.gen_range(-SPIN_SPEED_MAX..SPIN_SPEED_MAX),
                )
            } else {
                (0.0, 0.0)
            };
            let particle = Particle {
                id: self.next_id,
                pos,
                vel,
                rotation,
                rotation_speed,
                size: sample(&mut rng, self.params.size_range),
                color: random_color(&mut rng, &self.params.colors),
                shape: self.params.shapes.sample(&mut rng),
                life: self.mode.life_budget().map(Life::new),
            };
            self.next_id += 1;
            self.particles.push(particle);
        }
        Ok(())
    }

    /// Advance every particle by one tick: integrate position, apply gravity
    /// (exactly once), advance rotation, then wrap ambient particles past the
    /// bottom edge and cull finite particles whose life has run out.
    ///
    /// A non-drawable surface makes this a safe no-op; normal operation
    /// resumes once the bounds are positive again.
    pub fn tick(&mut self, bounds: SurfaceBounds) {
        if !bounds.is_drawable() {
            return;
        }
        let gravity = self.mode.gravity();
        let spin = self.params.spin;
        for p in &mut self.particles {
            p.step(gravity, spin);
        }
        match self.mode {
            EffectMode::Ambient { fall_speed, wobble } => {
                let mut rng = rand::thread_rng();
                let params = self.params.clone();
                for p in &mut self.particles {
                    if p.pos.y > bounds.height {
                        recycle(p, &mut rng, bounds, fall_speed, wobble, &params);
                    }
                }
            }
            _ => self.particles.retain(|p| !p.expired()),
        }
    }

    /// Draw the collection in insertion order. Never mutates particles; an
    /// empty collection still brackets the frame with `begin`/`finish` so
    /// canvas-owning backends clear stale pixels.
    pub fn render(&self, surface: &mut dyn ParticleSurface) {
        surface.begin();
        for p in &self.particles {
            surface.draw(p);
        }
        surface.finish();
    }

    fn validate(&self) -> Result<(), SpawnError> {
        if self.params.colors.is_empty() {
            return Err(SpawnError::EmptyPalette);
        }
        let sr = self.params.size_range;
        if sr.min <= 0.0 || sr.min > sr.max {
            return Err(SpawnError::InvalidSizeRange {
                min: sr.min,
                max: sr.max,
            });
        }
        match self.mode {
            EffectMode::Ambient { fall_speed, .. } => {
                if fall_speed.min > fall_speed.max {
                    return Err(SpawnError::InvalidSpeedRange {
                        min: fall_speed.min,
                        max: fall_speed.max,
                    });
                }
            }
            EffectMode::Burst { spread, life, .. } => {
                if spread < 0.0 {
                    return Err(SpawnError::NegativeSpread(spread));
                }
                if life == 0 {
                    return Err(SpawnError::ZeroLifeBudget);
                }
            }
            EffectMode::Drift { velocity, life } => {
                if life == 0 {
                    return Err(SpawnError::ZeroLifeBudget);
                }
                if let DriftVelocity::Radial { speed } = velocity {
                    if speed.min > speed.max {
                        return Err(SpawnError::InvalidSpeedRange {
                            min: speed.min,
                            max: speed.max,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn spawn_pos(&self, origin: SpawnOrigin, bounds: SurfaceBounds, rng: &mut impl Rng) -> Vec2 {
        match origin {
            SpawnOrigin::Point(p) => p,
            SpawnOrigin::TopEdge => {
                let x = sample(rng, SpawnRange::new(0.0, bounds.width.max(0.0)));
                let y = match self.mode {
                    // Initial ambient fill: already mid-air across the surface.
                    EffectMode::Ambient { .. } => {
                        sample(rng, SpawnRange::new(0.0, bounds.height.max(0.0)))
                    }
                    _ => 0.0,
                };
                Vec2::new(x, y)
            }
        }
    }

    fn spawn_vel(&self, index: usize, count: usize, rng: &mut impl Rng) -> Vec2 {
        match self.mode {
            EffectMode::Ambient { fall_speed, wobble } => Vec2::new(
                sample(rng, SpawnRange::new(-wobble, wobble)),
                sample(rng, fall_speed),
            ),
            EffectMode::Burst { spread, lift, .. } => Vec2::new(
                sample(rng, SpawnRange::new(-spread, spread)),
                sample(rng, SpawnRange::new(-spread, spread)) - lift,
            ),
            EffectMode::Drift { velocity, .. } => match velocity {
                DriftVelocity::Radial { speed } => {
                    // Evenly spaced ring, like the original sparkle fan.
                    let angle = std::f32::consts::TAU * index as f32 / count.max(1) as f32;
                    let magnitude = sample(rng, speed);
                    Vec2::new(angle.cos(), angle.sin()) * magnitude
                }
                DriftVelocity::Rising { speed, sway } => {
                    Vec2::new(sample(rng, SpawnRange::new(-sway, sway)), -speed)
                }
            },
        }
    }
}

/// Re-randomize an ambient particle in place above the top edge.
fn recycle(
    p: &mut Particle,
    rng: &mut impl Rng,
    bounds: SurfaceBounds,
    fall_speed: SpawnRange<f32>,
    wobble: f32,
    params: &EffectParams,
) {
    p.pos = Vec2::new(
        sample(rng, SpawnRange::new(0.0, bounds.width)),
        WRAP_RESPAWN_Y,
    );
    p.vel = Vec2::new(
        sample(rng, SpawnRange::new(-wobble, wobble)),
        sample(rng, fall_speed),
    );
    p.size = sample(rng, params.size_range);
    p.color = random_color(rng, &params.colors);
    p.shape = params.shapes.sample(rng);
    if params.spin {
        p.rotation = rng.gen_range(0.0..360.0);
        p.rotation_speed = rng.gen_range(-SPIN_SPEED_MAX..SPIN_SPEED_MAX);
    }
}

/// Uniform sample; degenerate ranges (min >= max) collapse to `min` so fixed
/// parameters do not panic the rng.
fn sample(rng: &mut impl Rng, range: SpawnRange<f32>) -> f32 {
    if range.max > range.min {
        rng.gen_range(range.min..range.max)
    } else {
        range.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::palette::BASE_COLORS;

    fn params() -> EffectParams {
        EffectParams {
            colors: BASE_COLORS.to_vec(),
            size_range: SpawnRange::new(4.0, 12.0),
            shapes: ShapeSet::Both,
            spin: true,
        }
    }

    fn bounds() -> SurfaceBounds {
        SurfaceBounds::new(800.0, 600.0)
    }

    fn burst_mode() -> EffectMode {
        EffectMode::Burst {
            spread: 10.0,
            lift: 5.0,
            gravity: 0.5,
            life: 100,
        }
    }

    #[test]
    fn spawn_zero_is_a_noop() {
        let mut sys = ParticleSystem::new(burst_mode(), params());
        sys.spawn(0, SpawnOrigin::Point(Vec2::ZERO), bounds()).unwrap();
        assert!(sys.is_empty());
        sys.tick(bounds());
        assert!(sys.is_empty());
    }

    #[test]
    fn empty_palette_rejected() {
        let mut p = params();
        p.colors.clear();
        let mut sys = ParticleSystem::new(burst_mode(), p);
        let err = sys
            .spawn(10, SpawnOrigin::Point(Vec2::ZERO), bounds())
            .unwrap_err();
        assert_eq!(err, SpawnError::EmptyPalette);
        assert!(sys.is_empty());
    }

    #[test]
    fn bad_size_range_rejected() {
        let mut p = params();
        p.size_range = SpawnRange::new(0.0, 8.0);
        let mut sys = ParticleSystem::new(burst_mode(), p);
        assert!(matches!(
            sys.spawn(1, SpawnOrigin::Point(Vec2::ZERO), bounds()),
            Err(SpawnError::InvalidSizeRange { .. })
        ));
    }

    #[test]
    fn zero_life_rejected_for_finite_modes() {
        let mode = EffectMode::Drift {
            velocity: DriftVelocity::Rising {
                speed: 2.0,
                sway: 1.0,
            },
            life: 0,
        };
        let mut sys = ParticleSystem::new(mode, params());
        assert_eq!(
            sys.spawn(5, SpawnOrigin::Point(Vec2::ZERO), bounds()),
            Err(SpawnError::ZeroLifeBudget)
        );
    }

    #[test]
    fn ids_follow_insertion_order() {
        let mut sys = ParticleSystem::new(burst_mode(), params());
        sys.spawn(8, SpawnOrigin::Point(Vec2::ZERO), bounds()).unwrap();
        let ids: Vec<u64> = sys.particles().map(|p| p.id).collect();
        assert_eq!(ids, (0..8).collect::<Vec<u64>>());
    }

    #[test]
    fn ambient_system_is_never_finished() {
        let mode = EffectMode::Ambient {
            fall_speed: SpawnRange::new(2.0, 5.0),
            wobble: 1.0,
        };
        let sys = ParticleSystem::new(mode, params());
        assert!(sys.is_empty());
        assert!(!sys.is_finished());
    }

    #[test]
    fn burst_finishes_when_drained() {
        let mode = EffectMode::Burst {
            spread: 10.0,
            lift: 5.0,
            gravity: 0.5,
            life: 3,
        };
        let mut sys = ParticleSystem::new(mode, params());
        sys.spawn(4, SpawnOrigin::Point(Vec2::new(400.0, 300.0)), bounds())
            .unwrap();
        assert!(!sys.is_finished());
        for _ in 0..3 {
            sys.tick(bounds());
        }
        assert!(sys.is_empty());
        assert!(sys.is_finished());
    }

    #[test]
    fn radial_drift_fans_out_evenly() {
        let mode = EffectMode::Drift {
            velocity: DriftVelocity::Radial {
                speed: SpawnRange::new(2.0, 2.0),
            },
            life: 50,
        };
        let mut sys = ParticleSystem::new(mode, params());
        sys.spawn(4, SpawnOrigin::Point(Vec2::ZERO), bounds()).unwrap();
        let vels: Vec<Vec2> = sys.particles().map(|p| p.vel).collect();
        // Quarter turns at fixed magnitude.
        assert!((vels[0] - Vec2::new(2.0, 0.0)).length() < 1e-4);
        assert!((vels[1] - Vec2::new(0.0, 2.0)).length() < 1e-4);
        assert!((vels[2] - Vec2::new(-2.0, 0.0)).length() < 1e-4);
        assert!((vels[3] - Vec2::new(0.0, -2.0)).length() < 1e-4);
    }
}
