//! Finite celebration effects: bursts, heart trains, sparkle rings.
//!
//! Everything event-driven funnels through one mechanism: an
//! [`EffectTrigger`] instantiates a finite [`ParticleSystem`] from config,
//! the system is ticked every frame until empty, then its sprites are
//! retired. Delayed choreography (the mega-burst rounds, hearts released one
//! by one) goes through the [`StaggerQueue`] instead of ad-hoc timers.

use bevy::prelude::*;

use crate::core::config::EffectsConfig;
use crate::core::effect::{ParticleSystem, SpawnOrigin};
use crate::effects::{EffectTickSet, Z_TRANSIENT};
use crate::rendering::sprites::{EntityLinks, ParticleMeshes, SpriteQuery, SpriteSurface};
use crate::rendering::surface::SurfaceState;

pub struct TransientEffectsPlugin;

impl Plugin for TransientEffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EffectTrigger>()
            .init_resource::<ActiveEffects>()
            .init_resource::<StaggerQueue>()
            .add_systems(
                Update,
                (
                    drain_stagger_queue,
                    spawn_triggered,
                    tick_transients,
                    render_transients,
                    retire_finished,
                )
                    .chain()
                    .in_set(EffectTickSet),
            );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// Square confetti scatter under gravity.
    Burst,
    /// A single rising heart (trains are queued via [`queue_heart_train`]).
    Heart,
    /// An evenly fanned sparkle ring.
    Sparkles,
}

#[derive(Event, Debug, Clone)]
pub struct EffectTrigger {
    pub kind: TriggerKind,
    /// Surface-space origin; `None` means the center of the surface.
    pub origin: Option<Vec2>,
}

impl EffectTrigger {
    pub fn burst_at(origin: Vec2) -> Self {
        Self {
            kind: TriggerKind::Burst,
            origin: Some(origin),
        }
    }

    pub fn burst_centered() -> Self {
        Self {
            kind: TriggerKind::Burst,
            origin: None,
        }
    }

    pub fn sparkles_at(origin: Vec2) -> Self {
        Self {
            kind: TriggerKind::Sparkles,
            origin: Some(origin),
        }
    }

    pub fn sparkles_centered() -> Self {
        Self {
            kind: TriggerKind::Sparkles,
            origin: None,
        }
    }
}

/// All live finite systems. Each owns its particles and its sprite links.
#[derive(Resource, Default)]
pub struct ActiveEffects {
    effects: Vec<ActiveEffect>,
}

impl ActiveEffects {
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn particle_count(&self) -> usize {
        self.effects.iter().map(|e| e.system.len()).sum()
    }
}

struct ActiveEffect {
    system: ParticleSystem,
    links: EntityLinks,
}

/// Triggers scheduled for a later frame.
#[derive(Resource, Default)]
pub struct StaggerQueue {
    entries: Vec<StaggeredTrigger>,
}

struct StaggeredTrigger {
    trigger: EffectTrigger,
    delay: Timer,
}

impl StaggerQueue {
    pub fn push(&mut self, trigger: EffectTrigger, delay_secs: f32) {
        self.entries.push(StaggeredTrigger {
            trigger,
            delay: Timer::from_seconds(delay_secs.max(0.0), TimerMode::Once),
        });
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }
}

/// The headline easter egg: a volley of bursts marching across time.
pub fn queue_mega_burst(queue: &mut StaggerQueue, cfg: &EffectsConfig) {
    for round in 0..cfg.celebration.mega_rounds {
        queue.push(
            EffectTrigger::burst_centered(),
            round as f32 * cfg.celebration.mega_interval,
        );
    }
}

/// Hearts leave one at a time, like the original like-button animation.
pub fn queue_heart_train(queue: &mut StaggerQueue, origin: Vec2, cfg: &EffectsConfig) {
    for i in 0..cfg.hearts.count {
        queue.push(
            EffectTrigger {
                kind: TriggerKind::Heart,
                origin: Some(origin),
            },
            i as f32 * cfg.hearts.stagger,
        );
    }
}

fn drain_stagger_queue(
    time: Res<Time>,
    mut queue: ResMut<StaggerQueue>,
    mut writer: EventWriter<EffectTrigger>,
) {
    let delta = time.delta();
    queue.entries.retain_mut(|entry| {
        entry.delay.tick(delta);
        if entry.delay.finished() {
            writer.write(entry.trigger.clone());
            false
        } else {
            true
        }
    });
}

fn spawn_triggered(
    mut reader: EventReader<EffectTrigger>,
    cfg: Res<EffectsConfig>,
    state: Res<SurfaceState>,
    mut active: ResMut<ActiveEffects>,
) {
    let bounds = state.bounds();
    if !bounds.is_drawable() {
        // Collapsed surface: drop triggers rather than spawn into nowhere.
        reader.clear();
        return;
    }
    for trigger in reader.read() {
        let (mut system, count) = match trigger.kind {
            TriggerKind::Burst => (cfg.burst_system(), cfg.burst_count()),
            TriggerKind::Heart => (cfg.heart_system(), 1),
            TriggerKind::Sparkles => (cfg.sparkle_system(), cfg.sparkles.count),
        };
        let origin = SpawnOrigin::Point(trigger.origin.unwrap_or_else(|| bounds.center()));
        match system.spawn(count, origin, bounds) {
            Ok(()) => {
                debug!("{:?} spawned {} particles", trigger.kind, system.len());
                active.effects.push(ActiveEffect {
                    system,
                    links: EntityLinks::default(),
                });
            }
            Err(e) => warn!("{:?} rejected: {e}", trigger.kind),
        }
    }
}

fn tick_transients(state: Res<SurfaceState>, mut active: ResMut<ActiveEffects>) {
    if !state.active() {
        return;
    }
    let bounds = state.bounds();
    for effect in &mut active.effects {
        effect.system.tick(bounds);
    }
}

fn render_transients(
    mut commands: Commands,
    meshes: Option<Res<ParticleMeshes>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut active: ResMut<ActiveEffects>,
    state: Res<SurfaceState>,
    mut sprites: SpriteQuery,
) {
    let Some(meshes) = meshes else { return };
    if !state.bounds().is_drawable() {
        return;
    }
    for effect in &mut active.effects {
        let mut surface = SpriteSurface::new(
            &mut commands,
            &meshes,
            materials.as_mut(),
            &mut effect.links,
            &mut sprites,
            state.bounds(),
            Z_TRANSIENT,
        );
        effect.system.render(&mut surface);
    }
}

fn retire_finished(mut commands: Commands, mut active: ResMut<ActiveEffects>) {
    active.effects.retain_mut(|effect| {
        if effect.system.is_finished() {
            effect.links.despawn_all(&mut commands);
            false
        } else {
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_constructors_leave_origin_open() {
        assert_eq!(EffectTrigger::burst_centered().origin, None);
        assert_eq!(EffectTrigger::sparkles_centered().origin, None);
        assert_eq!(
            EffectTrigger::sparkles_centered().kind,
            TriggerKind::Sparkles
        );
        let at = EffectTrigger::burst_at(Vec2::new(10.0, 20.0));
        assert_eq!(at.kind, TriggerKind::Burst);
        assert_eq!(at.origin, Some(Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn queues_expand_to_configured_counts() {
        let cfg = EffectsConfig::default();
        let mut queue = StaggerQueue::default();
        queue_mega_burst(&mut queue, &cfg);
        assert_eq!(queue.pending(), cfg.celebration.mega_rounds as usize);
        queue_heart_train(&mut queue, Vec2::ZERO, &cfg);
        assert_eq!(
            queue.pending(),
            cfg.celebration.mega_rounds as usize + cfg.hearts.count
        );
    }
}
