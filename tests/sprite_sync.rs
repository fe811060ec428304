//! Sprite backend synchronization: linked entities must follow every visual
//! attribute of their particle, and lose their sprite the frame the particle
//! vanishes.

use bevy::ecs::system::SystemState;
use bevy::prelude::*;
use bevy::sprite::MeshMaterial2d;

use confetti_rain::core::palette::BASE_COLORS;
use confetti_rain::rendering::sprites::{EntityLinks, ParticleMeshes, SpriteQuery, SpriteSurface};
use confetti_rain::{
    EffectMode, EffectParams, ParticleSystem, Shape, ShapeSet, SpawnOrigin, SpawnRange,
    SurfaceBounds,
};

fn test_world() -> (World, ParticleMeshes) {
    let mut world = World::new();
    world.insert_resource(Assets::<Mesh>::default());
    world.insert_resource(Assets::<ColorMaterial>::default());
    let meshes = {
        let mut assets = world.resource_mut::<Assets<Mesh>>();
        ParticleMeshes {
            circle: assets.add(Mesh::from(Circle { radius: 0.5 })),
            square: assets.add(Mesh::from(Rectangle::new(1.0, 1.0))),
        }
    };
    (world, meshes)
}

fn bounds() -> SurfaceBounds {
    SurfaceBounds::new(800.0, 600.0)
}

/// One backend frame: render the system through a SpriteSurface, then flush
/// the deferred commands so spawns/despawns land in the world.
fn sync(world: &mut World, meshes: &ParticleMeshes, links: &mut EntityLinks, sys: &ParticleSystem) {
    let mut state: SystemState<(Commands, ResMut<Assets<ColorMaterial>>, SpriteQuery)> =
        SystemState::new(world);
    {
        let (mut commands, mut materials, mut sprites) = state.get_mut(world);
        let mut surface = SpriteSurface::new(
            &mut commands,
            meshes,
            materials.as_mut(),
            links,
            &mut sprites,
            bounds(),
            0.0,
        );
        sys.render(&mut surface);
    }
    state.apply(world);
}

#[test]
fn linked_sprites_track_color_and_shape_changes() {
    let (mut world, meshes) = test_world();
    let mut links = EntityLinks::default();
    let mut sys = ParticleSystem::new(
        EffectMode::Ambient {
            fall_speed: SpawnRange::new(2.0, 5.0),
            wobble: 1.0,
        },
        EffectParams {
            colors: vec![BASE_COLORS[0]],
            size_range: SpawnRange::new(6.0, 6.0),
            shapes: ShapeSet::Square,
            spin: false,
        },
    );
    sys.spawn(1, SpawnOrigin::TopEdge, bounds()).unwrap();
    sync(&mut world, &meshes, &mut links, &sys);

    let entity = *links.0.get(&0).expect("particle 0 linked");
    assert_eq!(world.get::<Mesh2d>(entity).unwrap().0, meshes.square);

    // A wrap re-randomizes the particle in place; mimic one by hand.
    {
        let p = sys.particles_mut().next().unwrap();
        p.color = BASE_COLORS[2];
        p.shape = Shape::Circle;
    }
    sync(&mut world, &meshes, &mut links, &sys);

    assert_eq!(
        *links.0.get(&0).unwrap(),
        entity,
        "recycling reuses the entity"
    );
    assert_eq!(world.get::<Mesh2d>(entity).unwrap().0, meshes.circle);
    let material = world
        .get::<MeshMaterial2d<ColorMaterial>>(entity)
        .unwrap()
        .0
        .clone();
    let color = world
        .resource::<Assets<ColorMaterial>>()
        .get(&material)
        .unwrap()
        .color;
    assert_eq!(color, BASE_COLORS[2]);
}

#[test]
fn fading_particles_dim_their_material() {
    let (mut world, meshes) = test_world();
    let mut links = EntityLinks::default();
    let mut sys = ParticleSystem::new(
        EffectMode::Burst {
            spread: 10.0,
            lift: 5.0,
            gravity: 0.5,
            life: 100,
        },
        EffectParams {
            colors: vec![BASE_COLORS[1]],
            size_range: SpawnRange::new(8.0, 8.0),
            shapes: ShapeSet::Square,
            spin: false,
        },
    );
    sys.spawn(1, SpawnOrigin::Point(Vec2::new(400.0, 300.0)), bounds())
        .unwrap();
    sync(&mut world, &meshes, &mut links, &sys);

    for _ in 0..50 {
        sys.tick(bounds());
    }
    sync(&mut world, &meshes, &mut links, &sys);

    let entity = *links.0.get(&0).unwrap();
    let material = world
        .get::<MeshMaterial2d<ColorMaterial>>(entity)
        .unwrap()
        .0
        .clone();
    let alpha = world
        .resource::<Assets<ColorMaterial>>()
        .get(&material)
        .unwrap()
        .color
        .alpha();
    assert!((alpha - 0.5).abs() < 1e-5, "half life, half alpha: {alpha}");
}

#[test]
fn culled_particles_lose_their_sprites() {
    let (mut world, meshes) = test_world();
    let mut links = EntityLinks::default();
    let mut sys = ParticleSystem::new(
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
    );
    sys.spawn(3, SpawnOrigin::Point(Vec2::new(400.0, 300.0)), bounds())
        .unwrap();
    sync(&mut world, &meshes, &mut links, &sys);
    assert_eq!(links.0.len(), 3);
    let doomed = *links.0.get(&1).unwrap();

    for p in sys.particles_mut() {
        if p.id == 1 {
            if let Some(life) = p.life.as_mut() {
                life.remaining = 1;
            }
        }
    }
    sys.tick(bounds());
    sync(&mut world, &meshes, &mut links, &sys);

    assert_eq!(links.0.len(), 2);
    assert!(world.get::<Transform>(doomed).is_none());
}
