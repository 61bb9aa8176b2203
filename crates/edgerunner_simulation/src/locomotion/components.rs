//! Locomotion компоненты: настройки, input оси, first-person взгляд

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Настройки передвижения (designer-tunable)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Множитель оси движения (input scale)
    pub move_speed: f32,
    /// Градусы поворота на единицу оси взгляда
    pub look_speed: f32,
    /// Max скорость ходьбы (m/s)
    pub walk_speed: f32,
    /// Max скорость спринта (m/s)
    pub sprint_speed: f32,
    /// Вертикальная скорость прыжка (m/s)
    pub jump_speed: f32,
    /// Высота глаз над центром капсулы (m)
    pub eye_height: f32,
    /// Ограничение pitch (градусы)
    pub max_pitch: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            move_speed: 1.0,
            look_speed: 1.5,
            walk_speed: 5.0,
            sprint_speed: 9.0,
            jump_speed: 5.0,
            eye_height: 0.7,
            max_pitch: 89.0,
        }
    }
}

/// Непрерывные оси ввода (хост перезаписывает каждый кадр)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct LocomotionInput {
    pub move_forward: f32,
    pub move_sideways: f32,
    pub turn: f32,
    pub look_up: f32,
}

/// First-person взгляд (controller rotation)
///
/// Yaw поворачивает тело, pitch - только камеру.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct FirstPersonView {
    /// Градусы, 0 = смотрим в -Z
    pub yaw: f32,
    /// Градусы, плюс = вверх
    pub pitch: f32,
    pub eye_height: f32,
}

impl Default for FirstPersonView {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            eye_height: LocomotionConfig::default().eye_height,
        }
    }
}

impl FirstPersonView {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw.to_radians(), self.pitch.to_radians(), 0.0)
    }

    /// Направление камеры (с учётом pitch)
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    pub fn yaw_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw.to_radians())
    }

    /// Горизонтальное направление "вперёд" (только yaw)
    pub fn flat_forward(&self) -> Vec3 {
        self.yaw_rotation() * Vec3::NEG_Z
    }

    /// Горизонтальное направление "вправо" (только yaw)
    pub fn flat_right(&self) -> Vec3 {
        self.yaw_rotation() * Vec3::X
    }

    pub fn eye_position(&self, transform: &Transform) -> Vec3 {
        transform.translation + Vec3::Y * self.eye_height
    }
}

/// Marker: спринт активен
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Sprinting;
