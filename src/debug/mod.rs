//! Feature-gated stats overlay (enable with the default `debug` feature).

#[cfg(feature = "debug")]
use bevy::prelude::*;

#[cfg(feature = "debug")]
use crate::effects::ambient::AmbientConfetti;
#[cfg(feature = "debug")]
use crate::effects::transient::{ActiveEffects, StaggerQueue};
#[cfg(feature = "debug")]
use crate::rendering::surface::SurfaceState;

pub struct DebugPlugin;

#[cfg(not(feature = "debug"))]
impl bevy::prelude::Plugin for DebugPlugin {
    fn build(&self, _app: &mut bevy::prelude::App) {}
}

#[cfg(feature = "debug")]
impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, overlay_spawn)
            .add_systems(Update, overlay_update);
    }
}

#[cfg(feature = "debug")]
#[derive(Component)]
struct DebugOverlayText;

#[cfg(feature = "debug")]
fn overlay_spawn(mut commands: Commands) {
    commands.spawn((
        Text::new("(stats pending)"),
        TextFont {
            font_size: 13.0,
            ..Default::default()
        },
        TextColor(Color::srgb(0.75, 0.85, 0.95)),
        bevy::ui::Node {
            position_type: bevy::ui::PositionType::Absolute,
            bottom: Val::Px(4.0),
            left: Val::Px(6.0),
            ..Default::default()
        },
        DebugOverlayText,
    ));
}

#[cfg(feature = "debug")]
fn overlay_update(
    state: Res<SurfaceState>,
    ambient: Option<Res<AmbientConfetti>>,
    active: Res<ActiveEffects>,
    queue: Res<StaggerQueue>,
    mut q_text: Query<&mut Text, With<DebugOverlayText>>,
) {
    if let Ok(mut text) = q_text.single_mut() {
        let bounds = state.bounds();
        let ambient_count = ambient.map(|a| a.system.len()).unwrap_or(0);
        text.0 = format!(
            "surface {:.0}x{:.0} active={} | ambient={} transient systems={} particles={} queued={}",
            bounds.width,
            bounds.height,
            state.active(),
            ambient_count,
            active.len(),
            active.particle_count(),
            queue.pending(),
        );
    }
}
