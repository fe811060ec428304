//! Particle value type shared by every effect.
//!
//! Positions and velocities live in surface coordinates: origin at the
//! top-left of the drawing surface, y growing downward, units of pixels per
//! tick. Conversion to world space is a rendering concern.

use bevy::prelude::*;

/// Shape a particle is painted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Square,
    Circle,
}

/// Remaining-life countdown for finite particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Life {
    pub remaining: u32,
    pub initial: u32,
}

impl Life {
    pub fn new(budget: u32) -> Self {
        Self {
            remaining: budget,
            initial: budget,
        }
    }
}

/// A transient visual unit owned by exactly one [`ParticleSystem`].
///
/// [`ParticleSystem`]: crate::core::effect::ParticleSystem
#[derive(Debug, Clone)]
pub struct Particle {
    /// Stable per-system id, assigned in insertion order. Render backends key
    /// their per-particle state (sprite entities) on this.
    pub id: u64,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Degrees; only advanced when the owning effect configures spin.
    pub rotation: f32,
    /// Degrees per tick.
    pub rotation_speed: f32,
    /// Diameter / edge length in pixels. Always > 0.
    pub size: f32,
    pub color: Color,
    pub shape: Shape,
    /// `None` for ambient particles, which recycle instead of expiring.
    pub life: Option<Life>,
}

impl Particle {
    /// Integrate one tick of motion. Gravity, when configured by the owning
    /// effect, is applied exactly once per call.
    pub(crate) fn step(&mut self, gravity: f32, spin: bool) {
        self.pos += self.vel;
        self.vel.y += gravity;
        if spin {
            self.rotation += self.rotation_speed;
        }
        if let Some(life) = self.life.as_mut() {
            life.remaining = life.remaining.saturating_sub(1);
        }
    }

    /// True once a life-tracked particle has burned its budget. Ambient
    /// particles never expire.
    pub fn expired(&self) -> bool {
        self.life.is_some_and(|l| l.remaining == 0)
    }

    /// Derived opacity: `remaining / initial` clamped to [0, 1], or fully
    /// opaque when life-tracking is absent.
    pub fn alpha(&self) -> f32 {
        match self.life {
            Some(l) if l.initial > 0 => (l.remaining as f32 / l.initial as f32).clamp(0.0, 1.0),
            Some(_) => 0.0,
            None => 1.0,
        }
    }
}
