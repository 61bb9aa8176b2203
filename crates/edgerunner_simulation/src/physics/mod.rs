//! Physics module
//!
//! Kinematic контроллер, ground probe, collision backends.
//!
//! Backends (`CollisionBackend`):
//! - `Static` - `StaticWorld` resource, аналитическая геометрия (headless, тесты)
//! - `Rapier` - `bevy_rapier3d` context (runtime; Transform + Rapier plugins добавляются при необходимости)

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

pub mod layers;
pub mod movement;
pub mod rapier_query;
pub mod static_world;

pub use movement::{
    apply_gravity, apply_jump, apply_movement_input, integrate_velocity_to_transform, probe_ground,
    GroundProbeActors, KinematicController, MovementInput, PhysicsBody,
};
pub use rapier_query::RapierWorldQuery;
pub use static_world::{StaticCollider, StaticWorld};

use crate::SimulationSet;
use movement::run_ground_probe;

/// Откуда берутся world queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionBackend {
    /// `StaticWorld` resource
    #[default]
    Static,
    /// `bevy_rapier3d` (RapierPhysicsPlugin добавляется при необходимости)
    Rapier,
}

/// Система: ground probe через StaticWorld
pub fn probe_ground_static(world: Res<StaticWorld>, mut actors: GroundProbeActors) {
    let world = world.as_ref();
    run_ground_probe(|_| world, &mut actors);
}

/// Система: ground probe через Rapier
pub fn probe_ground_rapier(rapier: ReadRapierContext, mut actors: GroundProbeActors) {
    let Ok(context) = rapier.single() else {
        return;
    };
    run_ground_probe(|entity| RapierWorldQuery::new(&context).excluding(entity), &mut actors);
}

/// Plugin для kinematic контроллера
///
/// Порядок (FixedUpdate, SimulationSet::Physics):
/// 1. ground probe (backend)
/// 2. apply_jump
/// 3. apply_movement_input
/// 4. apply_gravity
/// 5. integrate_velocity_to_transform
pub struct KinematicControllerPlugin {
    pub backend: CollisionBackend,
}

impl Plugin for KinematicControllerPlugin {
    fn build(&self, app: &mut App) {
        match self.backend {
            CollisionBackend::Static => {
                app.init_resource::<StaticWorld>().add_systems(
                    FixedUpdate,
                    probe_ground_static.in_set(SimulationSet::Physics).before(apply_jump),
                );
            }
            CollisionBackend::Rapier => {
                // Rapier синхронизирует коллайдеры через GlobalTransform
                if !app.is_plugin_added::<TransformPlugin>() {
                    app.add_plugins(TransformPlugin);
                }
                if !app.is_plugin_added::<RapierPhysicsPlugin<NoUserData>>() {
                    app.add_plugins(RapierPhysicsPlugin::<NoUserData>::default());
                }
                app.add_systems(
                    FixedUpdate,
                    probe_ground_rapier.in_set(SimulationSet::Physics).before(apply_jump),
                );
            }
        }

        app.add_systems(
            FixedUpdate,
            (
                apply_jump,
                apply_movement_input,
                apply_gravity,
                integrate_velocity_to_transform,
            )
                .chain()
                .in_set(SimulationSet::Physics),
        );
    }
}
