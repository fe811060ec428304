use bevy::prelude::*;

use crate::debug::DebugPlugin;
use crate::effects::ambient::AmbientConfettiPlugin;
use crate::effects::transient::TransientEffectsPlugin;
use crate::effects::EffectTickSet;
use crate::gameplay::banner::BannerPlugin;
use crate::gameplay::guestbook::GuestbookPlugin;
use crate::interaction::auto_close::AutoClosePlugin;
use crate::interaction::input::InputPlugin;
use crate::rendering::camera::CameraPlugin;
use crate::rendering::sprites::SpriteBackendPlugin;
use crate::rendering::surface::{SurfaceMaintenanceSet, SurfacePlugin};

pub struct CelebrationPlugin;

impl Plugin for CelebrationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (SurfaceMaintenanceSet, EffectTickSet.after(SurfaceMaintenanceSet)),
        )
        .add_plugins((
            CameraPlugin,
            SurfacePlugin,
            SpriteBackendPlugin,
            AmbientConfettiPlugin,
            TransientEffectsPlugin,
            InputPlugin,
            GuestbookPlugin,
            BannerPlugin,
            AutoClosePlugin,
            DebugPlugin,
        ));
    }
}
