//! Rendering contract tests against a recording backend.

use bevy::prelude::*;

use confetti_rain::core::palette::BASE_COLORS;
use confetti_rain::{
    EffectMode, EffectParams, Particle, ParticleSurface, ParticleSystem, ShapeSet, SpawnOrigin,
    SpawnRange, SurfaceBounds,
};

#[derive(Debug, PartialEq)]
enum Call {
    Begin,
    Draw(u64),
    Finish,
}

#[derive(Default)]
struct RecordingSurface {
    calls: Vec<Call>,
}

impl ParticleSurface for RecordingSurface {
    fn begin(&mut self) {
        self.calls.push(Call::Begin);
    }

    fn draw(&mut self, particle: &Particle) {
        self.calls.push(Call::Draw(particle.id));
    }

    fn finish(&mut self) {
        self.calls.push(Call::Finish);
    }
}

fn burst_system() -> ParticleSystem {
    ParticleSystem::new(
        EffectMode::Burst {
            spread: 10.0,
            lift: 5.0,
            gravity: 0.5,
            life: 100,
        },
        EffectParams {
            colors: BASE_COLORS.to_vec(),
            size_range: SpawnRange::new(4.0, 12.0),
            shapes: ShapeSet::Square,
            spin: false,
        },
    )
}

fn bounds() -> SurfaceBounds {
    SurfaceBounds::new(800.0, 600.0)
}

#[test]
fn draws_in_insertion_order_between_begin_and_finish() {
    let mut sys = burst_system();
    sys.spawn(3, SpawnOrigin::Point(Vec2::new(400.0, 300.0)), bounds())
        .unwrap();
    sys.spawn(2, SpawnOrigin::Point(Vec2::new(100.0, 100.0)), bounds())
        .unwrap();

    let mut surface = RecordingSurface::default();
    sys.render(&mut surface);

    assert_eq!(
        surface.calls,
        vec![
            Call::Begin,
            Call::Draw(0),
            Call::Draw(1),
            Call::Draw(2),
            Call::Draw(3),
            Call::Draw(4),
            Call::Finish,
        ]
    );
}

#[test]
fn empty_collection_still_brackets_the_frame() {
    let sys = burst_system();
    let mut surface = RecordingSurface::default();
    sys.render(&mut surface);
    // A backend that clears in begin() must still get the chance to wipe
    // the last frame's pixels.
    assert_eq!(surface.calls, vec![Call::Begin, Call::Finish]);
}

#[test]
fn render_never_mutates_the_collection() {
    let mut sys = burst_system();
    sys.spawn(5, SpawnOrigin::Point(Vec2::new(400.0, 300.0)), bounds())
        .unwrap();
    let before: Vec<(u64, Vec2, Vec2)> = sys.particles().map(|p| (p.id, p.pos, p.vel)).collect();

    let mut surface = RecordingSurface::default();
    sys.render(&mut surface);
    sys.render(&mut surface);

    let after: Vec<(u64, Vec2, Vec2)> = sys.particles().map(|p| (p.id, p.pos, p.vel)).collect();
    assert_eq!(before, after);
}

#[test]
fn order_is_preserved_across_ticks_and_culls() {
    let mut sys = burst_system();
    sys.spawn(4, SpawnOrigin::Point(Vec2::new(400.0, 300.0)), bounds())
        .unwrap();
    // Expire the middle two by hand; survivors keep their relative order.
    for p in sys.particles_mut() {
        if p.id == 1 || p.id == 2 {
            if let Some(life) = p.life.as_mut() {
                life.remaining = 1;
            }
        }
    }
    sys.tick(bounds());

    let mut surface = RecordingSurface::default();
    sys.render(&mut surface);
    assert_eq!(
        surface.calls,
        vec![Call::Begin, Call::Draw(0), Call::Draw(3), Call::Finish]
    );
}
