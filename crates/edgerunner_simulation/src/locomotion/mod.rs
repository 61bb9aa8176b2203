//! Locomotion domain - input оси и кнопки → движение, взгляд, sprint, jump
//!
//! Содержит:
//! - LocomotionConfig, LocomotionInput, FirstPersonView, Sprinting
//! - ActionInput / JumpIntent events
//! - Systems: look, move, sprint/jump

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

pub use components::*;
pub use events::*;
pub use systems::*;

use crate::SimulationSet;

/// Locomotion Plugin
///
/// Порядок (FixedUpdate, SimulationSet::Input):
/// 1. apply_look_input - yaw/pitch (forward для dash берётся отсюда)
/// 2. apply_move_input - оси → MovementInput
/// 3. handle_locomotion_actions - sprint/jump
pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ActionInput>().add_event::<JumpIntent>();

        app.add_systems(
            FixedUpdate,
            (apply_look_input, apply_move_input, handle_locomotion_actions)
                .chain()
                .in_set(SimulationSet::Input),
        );
    }
}
