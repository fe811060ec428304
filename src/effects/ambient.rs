//! The indefinite confetti rain.
//!
//! One ambient [`ParticleSystem`] owns the whole backdrop: particles fall,
//! wobble, spin, and wrap back above the top edge when they leave the bottom.
//! Ticking is throttled to the configured frame rate and pauses while the
//! window is occluded; neither is a correctness contract, just the original
//! page's frame-budget behavior.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::core::config::EffectsConfig;
use crate::core::effect::{ParticleSystem, SpawnOrigin, SurfaceBounds};
use crate::effects::{EffectTickSet, Z_AMBIENT};
use crate::rendering::sprites::{EntityLinks, ParticleMeshes, SpriteQuery, SpriteSurface};
use crate::rendering::surface::SurfaceState;

pub struct AmbientConfettiPlugin;

impl Plugin for AmbientConfettiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_ambient).add_systems(
            Update,
            (tick_ambient, render_ambient).chain().in_set(EffectTickSet),
        );
    }
}

#[derive(Resource)]
pub struct AmbientConfetti {
    pub system: ParticleSystem,
}

#[derive(Resource, Default)]
struct AmbientLinks(EntityLinks);

/// Repeating gate for ambient ticks; fires at the effective frame rate.
#[derive(Resource, Deref, DerefMut)]
struct AmbientClock(Timer);

fn setup_ambient(
    mut commands: Commands,
    cfg: Res<EffectsConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let bounds = match windows.single() {
        Ok(window) => SurfaceBounds::new(window.width(), window.height()),
        Err(_) => SurfaceBounds::new(cfg.window.width, cfg.window.height),
    };
    let mut system = cfg.ambient_system();
    match system.spawn(cfg.ambient_count(), SpawnOrigin::TopEdge, bounds) {
        Ok(()) => info!(
            "ambient confetti: {} pieces at {:.0} Hz",
            system.len(),
            cfg.performance.effective_frame_rate()
        ),
        Err(e) => warn!("ambient confetti disabled: {e}"),
    }
    let rate = cfg.performance.effective_frame_rate().max(1.0);
    commands.insert_resource(AmbientConfetti { system });
    commands.insert_resource(AmbientLinks::default());
    commands.insert_resource(AmbientClock(Timer::from_seconds(
        1.0 / rate,
        TimerMode::Repeating,
    )));
}

fn tick_ambient(
    time: Res<Time>,
    state: Res<SurfaceState>,
    mut clock: ResMut<AmbientClock>,
    mut ambient: ResMut<AmbientConfetti>,
) {
    clock.tick(time.delta());
    if !clock.just_finished() || !state.active() {
        return;
    }
    ambient.system.tick(state.bounds());
}

fn render_ambient(
    mut commands: Commands,
    meshes: Option<Res<ParticleMeshes>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    ambient: Res<AmbientConfetti>,
    mut links: ResMut<AmbientLinks>,
    state: Res<SurfaceState>,
    mut sprites: SpriteQuery,
) {
    let Some(meshes) = meshes else { return };
    if !state.bounds().is_drawable() {
        return;
    }
    let mut surface = SpriteSurface::new(
        &mut commands,
        &meshes,
        materials.as_mut(),
        &mut links.0,
        &mut sprites,
        state.bounds(),
        Z_AMBIENT,
    );
    ambient.system.render(&mut surface);
}
