//! Dash компоненты: настройки, cooldown gate, state machine

use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::query::PathParams;
use super::surface::Pose;

/// Настройки dash (designer-tunable)
///
/// Единицы - метры/секунды/градусы.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct DashConfig {
    /// Скорость запуска предсказательного снаряда (m/s)
    pub launch_speed: f32,
    /// Порог крутизны: поверхность с углом >= порога - steep (градусы)
    pub max_surface_angle: f32,
    /// Шаг вдоль направления: старт траектории и шаг поиска (m)
    pub forward_offset: f32,
    /// На сколько поднимаемся перед trace вниз при поиске (m)
    pub search_height: f32,
    /// Длина trace вниз при поиске (m)
    pub search_depth: f32,
    /// Максимум trace'ов в одной ветке поиска
    pub max_search_steps: u32,
    /// Радиус предсказательного снаряда (m)
    pub projectile_radius: f32,
    /// Sub-steps траектории в секунду
    pub path_sim_frequency: f32,
    /// Максимальное время полёта снаряда (sec)
    pub path_max_sim_time: f32,
    /// Гравитация траектории по Y (m/s²)
    pub gravity: f32,
    /// Скорость перемещения во время dash (m/s)
    pub dash_speed: f32,
    /// Cooldown между dash'ами (sec)
    pub cooldown_secs: f32,
    /// Радиус debug маркера цели (m)
    pub marker_radius: f32,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            launch_speed: 15.0,
            max_surface_angle: 35.0,
            forward_offset: 0.2,
            search_height: 2.0,
            search_depth: 5.0,
            max_search_steps: 32,
            projectile_radius: 0.05,
            path_sim_frequency: 20.0,
            path_max_sim_time: 2.0,
            gravity: -9.81,
            dash_speed: 20.0,
            cooldown_secs: 5.0,
            marker_radius: 0.15,
        }
    }
}

impl DashConfig {
    /// Траектория из `origin` вдоль `forward` (forward нормализован)
    pub fn path_params(&self, origin: Vec3, forward: Vec3) -> PathParams {
        PathParams {
            start: origin + forward * self.forward_offset,
            launch_velocity: forward * self.launch_speed,
            radius: self.projectile_radius,
            gravity: Vec3::Y * self.gravity,
            sim_frequency: self.path_sim_frequency,
            max_sim_time: self.path_max_sim_time,
        }
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs_f32(self.cooldown_secs.max(0.0))
    }
}

/// Cooldown gate
///
/// Инвариант: `can_dash == false` ровно пока идёт cooldown.
#[derive(Component, Debug, Clone)]
pub struct DashAbility {
    pub can_dash: bool,
    pub cooldown: Timer,
}

impl Default for DashAbility {
    fn default() -> Self {
        Self {
            can_dash: true,
            cooldown: Timer::new(Duration::ZERO, TimerMode::Once),
        }
    }
}

impl DashAbility {
    /// Закрыть gate и запустить cooldown заново
    pub fn start_cooldown(&mut self, duration: Duration) {
        self.can_dash = false;
        self.cooldown.set_duration(duration);
        self.cooldown.reset();
    }

    /// Продвинуть cooldown. `true` - gate открылся на этом тике.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.can_dash {
            return false;
        }

        self.cooldown.tick(delta);
        if self.cooldown.finished() {
            self.can_dash = true;
            return true;
        }

        false
    }
}

/// Активный dash: куда летим
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct DashRequest {
    /// Поза на поверхности
    pub target: Pose,
    /// Позиция Transform актора по прибытии (target + foot offset)
    pub destination: Vec3,
}

/// Dash state machine
///
/// Idle → Predicting (кнопка зажата) → Dashing (отпущена, цель найдена) → Idle
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub enum DashState {
    Idle,
    /// Кнопка зажата: цель пересчитывается и показывается каждый тик
    Predicting,
    /// Интерполяция к цели
    Dashing(DashRequest),
}

impl Default for DashState {
    fn default() -> Self {
        Self::Idle
    }
}

impl DashState {
    pub fn is_dashing(&self) -> bool {
        matches!(self, DashState::Dashing(_))
    }

    pub fn request(&self) -> Option<&DashRequest> {
        match self {
            DashState::Dashing(request) => Some(request),
            _ => None,
        }
    }
}

/// Шаг к цели с постоянной скоростью
///
/// Если до цели не больше одного шага - возвращает ровно `target`.
pub fn interp_constant_to(current: Vec3, target: Vec3, delta_secs: f32, speed: f32) -> Vec3 {
    let delta = target - current;
    let distance = delta.length();
    let max_step = speed * delta_secs;

    if distance > max_step {
        if max_step > 0.0 {
            return current + delta / distance * max_step;
        }
        return current;
    }

    target
}
