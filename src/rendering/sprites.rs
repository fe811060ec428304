//! Sprite backend for the particle core.
//!
//! The analog of the original per-element style writes: every live particle
//! is mirrored by one mesh entity, keyed by particle id. `begin`/`finish`
//! bracket a frame so entities for culled particles are despawned the same
//! frame their particle disappears.

use bevy::prelude::*;
use bevy::sprite::MeshMaterial2d;
use std::collections::{HashMap, HashSet};

use crate::core::effect::{ParticleSurface, SurfaceBounds};
use crate::core::particle::{Particle, Shape};
use crate::rendering::surface::surface_to_world;

pub struct SpriteBackendPlugin;

impl Plugin for SpriteBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_particle_meshes);
    }
}

/// Marker for all particle sprite entities.
#[derive(Component)]
pub struct EffectSprite;

/// Shared unit meshes; per-particle size comes from the transform scale.
#[derive(Resource)]
pub struct ParticleMeshes {
    pub circle: Handle<Mesh>,
    pub square: Handle<Mesh>,
}

fn setup_particle_meshes(mut meshes: ResMut<Assets<Mesh>>, mut commands: Commands) {
    let circle = meshes.add(Mesh::from(Circle { radius: 0.5 }));
    let square = meshes.add(Mesh::from(Rectangle::new(1.0, 1.0)));
    commands.insert_resource(ParticleMeshes { circle, square });
}

/// Particle-id -> entity map owned by each effect instance.
#[derive(Default)]
pub struct EntityLinks(pub HashMap<u64, Entity>);

impl EntityLinks {
    /// Retire every linked entity (used when a finite system finishes).
    pub fn despawn_all(&mut self, commands: &mut Commands) {
        for (_, entity) in self.0.drain() {
            commands.entity(entity).despawn();
        }
    }
}

pub type SpriteQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut Transform,
        &'static mut Mesh2d,
        &'static MeshMaterial2d<ColorMaterial>,
    ),
    With<EffectSprite>,
>;

/// One frame of sprite synchronization for one particle system.
pub struct SpriteSurface<'a, 'w, 's, 'wq, 'sq> {
    commands: &'a mut Commands<'w, 's>,
    meshes: &'a ParticleMeshes,
    materials: &'a mut Assets<ColorMaterial>,
    links: &'a mut EntityLinks,
    sprites: &'a mut SpriteQuery<'wq, 'sq>,
    bounds: SurfaceBounds,
    z: f32,
    seen: HashSet<u64>,
}

impl<'a, 'w, 's, 'wq, 'sq> SpriteSurface<'a, 'w, 's, 'wq, 'sq> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        commands: &'a mut Commands<'w, 's>,
        meshes: &'a ParticleMeshes,
        materials: &'a mut Assets<ColorMaterial>,
        links: &'a mut EntityLinks,
        sprites: &'a mut SpriteQuery<'wq, 'sq>,
        bounds: SurfaceBounds,
        z: f32,
    ) -> Self {
        Self {
            commands,
            meshes,
            materials,
            links,
            sprites,
            bounds,
            z,
            seen: HashSet::new(),
        }
    }

    fn mesh_for(&self, shape: Shape) -> Handle<Mesh> {
        match shape {
            Shape::Circle => self.meshes.circle.clone(),
            Shape::Square => self.meshes.square.clone(),
        }
    }

    fn transform_for(&self, p: &Particle) -> Transform {
        Transform {
            translation: surface_to_world(p.pos, self.bounds, self.z),
            // Surface space is y-down, so visual rotation is mirrored.
            rotation: Quat::from_rotation_z(-p.rotation.to_radians()),
            scale: Vec3::new(p.size, p.size, 1.0),
        }
    }
}

impl ParticleSurface for SpriteSurface<'_, '_, '_, '_, '_> {
    fn begin(&mut self) {
        self.seen.clear();
    }

    fn draw(&mut self, p: &Particle) {
        self.seen.insert(p.id);
        match self.links.0.get(&p.id) {
            Some(&entity) => {
                let next = self.transform_for(p);
                // Ambient recycling re-randomizes color and shape in place;
                // both must follow the particle, not the spawn.
                let wanted = self.mesh_for(p.shape);
                if let Ok((mut transform, mut mesh, material)) = self.sprites.get_mut(entity) {
                    *transform = next;
                    if mesh.0 != wanted {
                        mesh.0 = wanted;
                    }
                    if let Some(mat) = self.materials.get_mut(&material.0) {
                        mat.color = p.color.with_alpha(p.alpha());
                    }
                }
                // Entities spawned last frame may not be queryable yet; they
                // pick up their first sync next frame.
            }
            None => {
                let mesh = self.mesh_for(p.shape);
                let material = self.materials.add(ColorMaterial::from(
                    p.color.with_alpha(p.alpha()),
                ));
                let entity = self
                    .commands
                    .spawn((
                        Mesh2d::from(mesh),
                        MeshMaterial2d(material),
                        self.transform_for(p),
                        EffectSprite,
                    ))
                    .id();
                self.links.0.insert(p.id, entity);
            }
        }
    }

    fn finish(&mut self) {
        let seen = std::mem::take(&mut self.seen);
        self.links.0.retain(|id, entity| {
            if seen.contains(id) {
                true
            } else {
                self.commands.entity(*entity).despawn();
                false
            }
        });
    }
}
