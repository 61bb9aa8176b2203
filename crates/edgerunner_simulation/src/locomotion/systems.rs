//! Locomotion systems: оси → взгляд/движение, кнопки → sprint/jump

use bevy::prelude::*;

use super::components::{FirstPersonView, LocomotionConfig, LocomotionInput, Sprinting};
use super::events::{ActionInput, ButtonPhase, InputAction, JumpIntent};
use crate::physics::{KinematicController, MovementInput};

/// Вклад одной оси движения
///
/// Нулевая ось ничего не добавляет (movement collaborator не вызывается).
pub fn movement_delta(axis: f32, direction: Vec3, move_speed: f32) -> Option<Vec3> {
    if axis == 0.0 {
        return None;
    }
    Some(direction * (axis * move_speed))
}

/// Применить оси взгляда к yaw/pitch
pub fn apply_look_axes(view: &mut FirstPersonView, input: &LocomotionInput, config: &LocomotionConfig) {
    // Turn > 0 - вправо (по часовой, если смотреть сверху)
    view.yaw = (view.yaw - input.turn * config.look_speed).rem_euclid(360.0);
    view.pitch = (view.pitch + input.look_up * config.look_speed).clamp(-config.max_pitch, config.max_pitch);
}

/// Система: turn/look_up → FirstPersonView, yaw → Transform
pub fn apply_look_input(
    mut query: Query<(&LocomotionInput, &LocomotionConfig, &mut FirstPersonView, &mut Transform)>,
) {
    for (input, config, mut view, mut transform) in query.iter_mut() {
        if input.turn == 0.0 && input.look_up == 0.0 {
            continue;
        }

        apply_look_axes(&mut view, input, config);
        transform.rotation = view.yaw_rotation();
    }
}

/// Система: move_forward/move_sideways → MovementInput
///
/// Направления берутся только из yaw (pitch не наклоняет движение).
pub fn apply_move_input(
    mut query: Query<(&LocomotionInput, &LocomotionConfig, &FirstPersonView, &mut MovementInput)>,
) {
    for (input, config, view, mut movement) in query.iter_mut() {
        if let Some(delta) = movement_delta(input.move_forward, view.flat_forward(), config.move_speed) {
            movement.add(delta);
        }
        if let Some(delta) = movement_delta(input.move_sideways, view.flat_right(), config.move_speed) {
            movement.add(delta);
        }
    }
}

/// Система: Sprint/Jump кнопки
///
/// - Sprint pressed/released → max_speed = sprint_speed / walk_speed
/// - Jump pressed → JumpIntent
pub fn handle_locomotion_actions(
    mut commands: Commands,
    mut actions: EventReader<ActionInput>,
    mut actors: Query<(&LocomotionConfig, &mut KinematicController)>,
    mut jumps: EventWriter<JumpIntent>,
) {
    for action in actions.read() {
        let Ok((config, mut controller)) = actors.get_mut(action.entity) else {
            continue;
        };

        match (action.action, action.phase) {
            (InputAction::Sprint, ButtonPhase::Pressed) => {
                controller.max_speed = config.sprint_speed;
                commands.entity(action.entity).insert(Sprinting);
                crate::log(&format!("Locomotion: {:?} sprint on ({} m/s)", action.entity, config.sprint_speed));
            }
            (InputAction::Sprint, ButtonPhase::Released) => {
                controller.max_speed = config.walk_speed;
                commands.entity(action.entity).remove::<Sprinting>();
                crate::log(&format!("Locomotion: {:?} sprint off ({} m/s)", action.entity, config.walk_speed));
            }
            (InputAction::Jump, ButtonPhase::Pressed) => {
                jumps.write(JumpIntent { entity: action.entity });
            }
            // Dash обрабатывается в dash::systems
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_axis_produces_no_movement() {
        assert!(movement_delta(0.0, Vec3::NEG_Z, 20.0).is_none());
    }

    #[test]
    fn test_axis_scales_move_speed() {
        let delta = movement_delta(0.5, Vec3::NEG_Z, 20.0).unwrap();
        assert_eq!(delta, Vec3::new(0.0, 0.0, -10.0));

        let back = movement_delta(-1.0, Vec3::NEG_Z, 2.0).unwrap();
        assert_eq!(back, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_look_axes_scale_and_clamp() {
        let config = LocomotionConfig::default();
        let mut view = FirstPersonView::default();

        let input = LocomotionInput { turn: 10.0, look_up: 2.0, ..default() };
        apply_look_axes(&mut view, &input, &config);

        assert!((view.yaw - 345.0).abs() < 1e-4, "yaw = {}", view.yaw);
        assert!((view.pitch - 3.0).abs() < 1e-4, "pitch = {}", view.pitch);

        let input = LocomotionInput { look_up: 1000.0, ..default() };
        apply_look_axes(&mut view, &input, &config);
        assert_eq!(view.pitch, config.max_pitch);
    }
}
