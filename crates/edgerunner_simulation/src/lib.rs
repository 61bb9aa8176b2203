//! EdgeRunner Simulation Core
//!
//! First-person locomotion + dash на Bevy 0.16 (headless ECS).
//!
//! Подсистемы (FixedUpdate 60Hz, строго по порядку):
//! 1. `SimulationSet::Input` - locomotion: оси, взгляд, sprint/jump
//! 2. `SimulationSet::Dash` - cooldown, prediction, dash перемещение
//! 3. `SimulationSet::Physics` - ground probe, kinematic интеграция
//!
//! Геометрия мира доступна только через `dash::WorldQuery`
//! (Rapier или `physics::StaticWorld`).

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

// Публичные модули
pub mod config;
pub mod dash;
pub mod locomotion;
pub mod logger;
pub mod physics;
pub mod player;

// Re-export базовых типов для удобства
pub use config::{ConfigError, SimulationConfig};
pub use dash::{
    DashAbility, DashConfig, DashCue, DashCueKind, DashFinished, DashPlugin, DashReady, DashStarted, DashState,
    DashTargetResolver, LandingMethod, Pose, SurfaceHit, WorldQuery,
};
pub use locomotion::{
    ActionInput, ButtonPhase, FirstPersonView, InputAction, JumpIntent, LocomotionConfig, LocomotionInput,
    LocomotionPlugin, Sprinting,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel, LogPrinter};
pub use physics::{
    CollisionBackend, KinematicController, KinematicControllerPlugin, MovementInput, PhysicsBody, StaticCollider,
    StaticWorld,
};
pub use player::{spawn_player_character, Player};

/// Частота FixedUpdate
pub const SIMULATION_HZ: f64 = 60.0;

/// Фазы симуляционного тика
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Input,
    Dash,
    Physics,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin {
    pub backend: CollisionBackend,
}

impl SimulationPlugin {
    /// StaticWorld backend (тесты, headless бинарь)
    pub fn headless() -> Self {
        Self {
            backend: CollisionBackend::Static,
        }
    }

    /// Rapier backend
    pub fn rapier() -> Self {
        Self {
            backend: CollisionBackend::Rapier,
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            .configure_sets(
                FixedUpdate,
                (SimulationSet::Input, SimulationSet::Dash, SimulationSet::Physics).chain(),
            )
            .add_plugins((
                LocomotionPlugin,
                DashPlugin {
                    backend: self.backend,
                },
                KinematicControllerPlugin {
                    backend: self.backend,
                },
            ));
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается вручную: один `app.update()` = один fixed тик
/// (кроме самого первого update, который только инициализирует часы).
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / SIMULATION_HZ,
        )))
        .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
