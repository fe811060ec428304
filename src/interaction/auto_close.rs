//! Optional timed shutdown, mainly for headless smoke runs.
//!
//! `window.autoClose` seconds after startup the app requests a clean exit.
//! Zero (the default) leaves the window open until closed by hand; the CLI's
//! `--auto-close` flag overrides the config value.

use bevy::prelude::*;

use crate::core::config::EffectsConfig;

pub struct AutoClosePlugin;

impl Plugin for AutoClosePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, arm_shutdown)
            .add_systems(Update, request_exit);
    }
}

/// One-shot countdown; only present when a positive autoClose is configured.
#[derive(Resource, Deref, DerefMut)]
struct ShutdownTimer(Timer);

fn arm_shutdown(mut commands: Commands, cfg: Res<EffectsConfig>) {
    let secs = cfg.window.auto_close;
    if secs > 0.0 {
        info!("closing automatically in {secs} s");
        commands.insert_resource(ShutdownTimer(Timer::from_seconds(secs, TimerMode::Once)));
    }
}

fn request_exit(
    time: Res<Time>,
    mut timer: Option<ResMut<ShutdownTimer>>,
    mut exit: EventWriter<AppExit>,
) {
    if let Some(t) = timer.as_mut() {
        t.tick(time.delta());
        if t.just_finished() {
            exit.write(AppExit::Success);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn app_with(auto_close: f32) -> App {
        let mut app = App::new();
        app.init_resource::<Time>();
        app.add_event::<AppExit>();
        let mut cfg = EffectsConfig::default();
        cfg.window.auto_close = auto_close;
        app.insert_resource(cfg);
        app.add_plugins(AutoClosePlugin);
        app
    }

    #[test]
    fn exits_after_the_configured_delay() {
        let mut app = app_with(0.2);
        app.update();
        assert!(app.world().get_resource::<ShutdownTimer>().is_some());
        assert!(app.world().resource::<Events<AppExit>>().is_empty());

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(300));
        app.update();
        assert!(!app.world().resource::<Events<AppExit>>().is_empty());
    }

    #[test]
    fn zero_disables_the_countdown() {
        let mut app = app_with(0.0);
        app.update();
        assert!(app.world().get_resource::<ShutdownTimer>().is_none());

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs(60));
        app.update();
        assert!(app.world().resource::<Events<AppExit>>().is_empty());
    }
}
