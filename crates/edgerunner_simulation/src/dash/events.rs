//! Dash events
//!
//! Все события fire-and-forget: хост рисует маркеры / спавнит VFX / проигрывает звук.

use bevy::prelude::*;

use super::components::DashRequest;
use super::resolver::LandingMethod;
use super::surface::Pose;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashCueKind {
    /// Превью цели, пока кнопка зажата (каждый тик)
    Preview,
    /// Траектория сама попала в walkable поверхность
    DirectImpact,
}

/// Event: визуальная подсказка (debug sphere / VFX marker)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DashCue {
    pub entity: Entity,
    pub pose: Pose,
    pub radius: f32,
    pub kind: DashCueKind,
}

/// Event: dash зафиксирован (кнопка отпущена, цель найдена)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DashStarted {
    pub entity: Entity,
    pub request: DashRequest,
    pub method: LandingMethod,
}

/// Event: актор прибыл в цель
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DashFinished {
    pub entity: Entity,
    pub position: Vec3,
}

/// Event: cooldown закончился, dash снова доступен
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DashReady {
    pub entity: Entity,
}
