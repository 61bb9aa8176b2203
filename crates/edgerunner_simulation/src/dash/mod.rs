//! Dash module
//!
//! Предсказание точки приземления и перемещение к ней.
//!
//! - `resolver` - чистый алгоритм поиска цели поверх `WorldQuery`
//! - `components` - DashConfig, DashAbility (cooldown gate), DashState
//! - `systems` - state machine Idle → Predicting → Dashing → Idle
//! - `events` - DashCue (превью), DashStarted, DashFinished, DashReady

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod query;
pub mod resolver;
pub mod surface;
pub mod systems;

#[cfg(test)]
mod resolver_tests;

// Re-export основных типов
pub use components::{interp_constant_to, DashAbility, DashConfig, DashRequest, DashState};
pub use events::{DashCue, DashCueKind, DashFinished, DashReady, DashStarted};
pub use query::{trace_ballistic_path, PathParams, WorldQuery};
pub use resolver::{
    Candidate, DashResolution, DashTargetResolver, LandingMethod, SearchCandidates, SearchDirection,
};
pub use surface::{incidence_angle, surface_orientation, Pose, SurfaceHit};
pub use systems::{
    execute_dash, handle_dash_press, tick_dash_cooldowns, update_dash_targeting_rapier,
    update_dash_targeting_static, DashTargetingActors,
};

use crate::physics::CollisionBackend;
use crate::SimulationSet;

/// Dash Plugin
///
/// Регистрирует dash системы в FixedUpdate (SimulationSet::Dash).
///
/// Порядок выполнения:
/// 1. tick_dash_cooldowns - cooldown таймеры
/// 2. handle_dash_press - нажатие → Predicting
/// 3. update_dash_targeting_* - превью цели / release (backend зависит от `CollisionBackend`)
/// 4. execute_dash - перемещение к цели
pub struct DashPlugin {
    pub backend: CollisionBackend,
}

impl Plugin for DashPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DashCue>()
            .add_event::<DashStarted>()
            .add_event::<DashFinished>()
            .add_event::<DashReady>();

        match self.backend {
            CollisionBackend::Static => {
                app.init_resource::<crate::physics::StaticWorld>().add_systems(
                    FixedUpdate,
                    (
                        tick_dash_cooldowns,
                        handle_dash_press,
                        update_dash_targeting_static,
                        execute_dash,
                    )
                        .chain()
                        .in_set(SimulationSet::Dash),
                );
            }
            CollisionBackend::Rapier => {
                app.add_systems(
                    FixedUpdate,
                    (
                        tick_dash_cooldowns,
                        handle_dash_press,
                        update_dash_targeting_rapier,
                        execute_dash,
                    )
                        .chain()
                        .in_set(SimulationSet::Dash),
                );
            }
        }
    }
}
