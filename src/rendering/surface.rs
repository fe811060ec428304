//! Shared drawing-surface state.
//!
//! Effects tick against [`SurfaceState::bounds`], which tracks the primary
//! window: resizes are debounced (a settling window mid-drag would thrash
//! wrap/cull bounds), and occlusion pauses ticking entirely. The core never
//! sees stale bounds because every `tick` call is handed the current value.

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowOccluded, WindowResized};

use crate::core::config::EffectsConfig;
use crate::core::effect::SurfaceBounds;

pub struct SurfacePlugin;

impl Plugin for SurfacePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SurfaceState>().add_systems(
            Update,
            (watch_resize, watch_occlusion).in_set(SurfaceMaintenanceSet),
        );
    }
}

/// Runs before any effect tick so bounds are current within the frame.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct SurfaceMaintenanceSet;

#[derive(Resource)]
pub struct SurfaceState {
    bounds: SurfaceBounds,
    occluded: bool,
    pending: Option<PendingResize>,
}

struct PendingResize {
    bounds: SurfaceBounds,
    timer: Timer,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            // Zero until the first resize event; effects no-op on
            // non-drawable bounds, so nothing is ticked before the window
            // reports its size.
            bounds: SurfaceBounds::new(0.0, 0.0),
            occluded: false,
            pending: None,
        }
    }
}

impl SurfaceState {
    pub fn bounds(&self) -> SurfaceBounds {
        self.bounds
    }

    /// True while ticking should proceed: drawable bounds, window visible.
    pub fn active(&self) -> bool {
        !self.occluded && self.bounds.is_drawable()
    }
}

fn watch_resize(
    time: Res<Time>,
    cfg: Res<EffectsConfig>,
    mut state: ResMut<SurfaceState>,
    mut resize_evr: EventReader<WindowResized>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    // First frame: adopt whatever the window already is.
    if !state.bounds.is_drawable() && state.pending.is_none() {
        if let Ok(window) = windows.single() {
            state.bounds = SurfaceBounds::new(window.width(), window.height());
        }
    }
    for ev in resize_evr.read() {
        let bounds = SurfaceBounds::new(ev.width, ev.height);
        let debounce = cfg.performance.resize_debounce.max(0.0);
        if debounce == 0.0 {
            state.bounds = bounds;
            state.pending = None;
        } else {
            // Restart the settle timer on every event in a drag.
            state.pending = Some(PendingResize {
                bounds,
                timer: Timer::from_seconds(debounce, TimerMode::Once),
            });
        }
    }
    let mut applied = None;
    if let Some(pending) = state.pending.as_mut() {
        pending.timer.tick(time.delta());
        if pending.timer.finished() {
            applied = Some(pending.bounds);
        }
    }
    if let Some(bounds) = applied {
        debug!(
            "surface bounds settled at {}x{}",
            bounds.width, bounds.height
        );
        state.bounds = bounds;
        state.pending = None;
    }
}

fn watch_occlusion(mut state: ResMut<SurfaceState>, mut occluded_evr: EventReader<WindowOccluded>) {
    for ev in occluded_evr.read() {
        state.occluded = ev.occluded;
    }
}

/// Map a surface-space point (top-left origin, y-down) into world space
/// (centered, y-up) at the given z layer.
pub fn surface_to_world(p: Vec2, bounds: SurfaceBounds, z: f32) -> Vec3 {
    Vec3::new(
        p.x - bounds.width * 0.5,
        bounds.height * 0.5 - p.y,
        z,
    )
}
