//! Pointer and keyboard wiring for the celebration effects.
//!
//! Cursor positions come straight from the window (top-left origin, y-down),
//! which is exactly the surface space the particle core works in, so no
//! camera math is needed here.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::core::config::EffectsConfig;
use crate::effects::transient::{queue_mega_burst, EffectTrigger, StaggerQueue};
use crate::gameplay::guestbook::GuestbookCommand;

/// Clicks landing in this strip below the top edge count toward the easter
/// egg instead of bursting. Matches the banner block height.
const HEADLINE_STRIP_PX: f32 = 150.0;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TitleClicks>()
            .add_systems(Startup, setup_welcome)
            .add_systems(Update, (welcome_burst, keyboard_shortcuts, pointer_clicks));
    }
}

/// One-shot delay before the welcome burst fires.
#[derive(Resource, Deref, DerefMut)]
struct WelcomeTimer(Timer);

/// Counts headline clicks toward the surprise.
#[derive(Resource, Default)]
struct TitleClicks(u32);

fn setup_welcome(mut commands: Commands, cfg: Res<EffectsConfig>) {
    let delay = cfg.celebration.welcome_delay;
    if delay >= 0.0 {
        commands.insert_resource(WelcomeTimer(Timer::from_seconds(delay, TimerMode::Once)));
    }
}

fn welcome_burst(
    mut commands: Commands,
    time: Res<Time>,
    mut timer: Option<ResMut<WelcomeTimer>>,
    mut writer: EventWriter<EffectTrigger>,
) {
    if let Some(t) = timer.as_mut() {
        t.tick(time.delta());
        if t.finished() {
            writer.write(EffectTrigger::burst_centered());
            commands.remove_resource::<WelcomeTimer>();
        }
    }
}

fn keyboard_shortcuts(
    keys: Res<ButtonInput<KeyCode>>,
    mut effects: EventWriter<EffectTrigger>,
    mut guestbook: EventWriter<GuestbookCommand>,
) {
    if keys.just_pressed(KeyCode::KeyC) {
        effects.write(EffectTrigger::burst_centered());
    }
    if keys.just_pressed(KeyCode::KeyR) {
        effects.write(EffectTrigger::sparkles_centered());
    }
    if keys.just_pressed(KeyCode::KeyM) {
        guestbook.write(GuestbookCommand::AddSample);
    }
    if keys.just_pressed(KeyCode::KeyL) {
        guestbook.write(GuestbookCommand::LikeLatest);
    }
}

fn pointer_clicks(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cfg: Res<EffectsConfig>,
    mut title: ResMut<TitleClicks>,
    mut effects: EventWriter<EffectTrigger>,
    mut queue: ResMut<StaggerQueue>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Ok(window) = windows.single() else { return };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    if cursor.y <= HEADLINE_STRIP_PX {
        title.0 += 1;
        if title.0 >= cfg.celebration.title_clicks.max(1) {
            info!("headline surprise unlocked");
            queue_mega_burst(&mut queue, &cfg);
            title.0 = 0;
        }
    } else {
        effects.write(EffectTrigger::burst_at(cursor));
    }
}
