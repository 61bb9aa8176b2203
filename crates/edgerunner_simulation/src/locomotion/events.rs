//! Locomotion events

use bevy::prelude::*;

/// Дискретные действия игрока
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum InputAction {
    Dash,
    Jump,
    Sprint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ButtonPhase {
    Pressed,
    Released,
}

/// Event: нажатие/отпускание кнопки действия
///
/// Генерируется хостом (input subsystem) один раз на переход кнопки.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ActionInput {
    pub entity: Entity,
    pub action: InputAction,
    pub phase: ButtonPhase,
}

impl ActionInput {
    pub fn pressed(entity: Entity, action: InputAction) -> Self {
        Self { entity, action, phase: ButtonPhase::Pressed }
    }

    pub fn released(entity: Entity, action: InputAction) -> Self {
        Self { entity, action, phase: ButtonPhase::Released }
    }

    pub fn is(&self, action: InputAction, phase: ButtonPhase) -> bool {
        self.action == action && self.phase == phase
    }
}

/// Event: намерение прыгнуть (jump intent)
///
/// Генерируется из `ActionInput` (Jump pressed).
/// Обрабатывается `apply_jump`: прыжок только с земли.
#[derive(Event, Debug, Clone)]
pub struct JumpIntent {
    pub entity: Entity,
}
