pub mod ambient;
pub mod transient;

use bevy::prelude::*;

/// All effect ticking/rendering runs here, after surface maintenance.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct EffectTickSet;

/// Z layer for the ambient rain sprites.
pub const Z_AMBIENT: f32 = 10.0;
/// Z layer for transient effects (bursts, hearts, sparkles) above the rain.
pub const Z_TRANSIENT: f32 = 20.0;
