//! Player character
//!
//! Marker + spawn helper: locomotion, dash и kinematic контроллер на одной entity.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::config::SimulationConfig;
use crate::dash::{DashAbility, DashState};
use crate::locomotion::{FirstPersonView, LocomotionInput};
use crate::physics::{layers, KinematicController, MovementInput, PhysicsBody};

/// Marker component для player-controlled entity
///
/// Хост пишет `LocomotionInput` и `ActionInput` только для entity с этим компонентом.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Spawn helper для персонажа игрока
///
/// Создает entity с полным набором компонентов:
/// - Transform (центр капсулы)
/// - Locomotion: LocomotionConfig, LocomotionInput, FirstPersonView
/// - Dash: DashConfig, DashAbility, DashState
/// - Kinematic: KinematicController (walk speed из конфига), MovementInput, PhysicsBody
/// - Rapier: RigidBody + Collider (capsule), actor collision groups
pub fn spawn_player_character(commands: &mut Commands, position: Vec3, config: &SimulationConfig) -> Entity {
    let controller = KinematicController {
        max_speed: config.locomotion.walk_speed,
        jump_speed: config.locomotion.jump_speed,
        ..default()
    };
    let view = FirstPersonView {
        eye_height: config.locomotion.eye_height,
        ..default()
    };

    commands
        .spawn((
            Player,
            Transform::from_translation(position).with_rotation(view.yaw_rotation()),
            // Locomotion
            config.locomotion,
            LocomotionInput::default(),
            view,
            // Dash
            config.dash,
            DashAbility::default(),
            DashState::Idle,
            // Kinematic
            controller,
            MovementInput::default(),
            PhysicsBody::default(),
            // Rapier (capsule 1.8m: 0.5 + 0.5 + 2*0.4, центр на foot_offset)
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.4),
            layers::actor_groups(),
        ))
        .id()
}
