//! Headless симуляция EdgeRunner
//!
//! Трасса из StaticWorld (пол + стена с уступом), скриптованный input:
//! шаг вперёд → взгляд вверх → dash на верх стены → повторный dash на cooldown.
//!
//! Путь к JSON конфигу можно передать первым аргументом.

use bevy::prelude::*;
use edgerunner_simulation::*;

/// Сколько тиков держим dash перед release
const HOLD_TICKS: usize = 10;
/// Лимит ожидания (dash + cooldown), тиков
const MAX_WAIT_TICKS: usize = 600;

fn build_course() -> StaticWorld {
    StaticWorld::new()
        // Пол (верх на y=0)
        .with(StaticCollider::from_min_max(Vec3::new(-50.0, -1.0, -50.0), Vec3::new(50.0, 0.0, 50.0)))
        // Стена высотой 3m в 8m впереди
        .with(StaticCollider::from_min_max(Vec3::new(-5.0, 0.0, -9.0), Vec3::new(5.0, 3.0, -8.0)))
}

fn load_config() -> SimulationConfig {
    let Some(path) = std::env::args().nth(1) else {
        return SimulationConfig::default();
    };

    match SimulationConfig::from_json_file(&path) {
        Ok(config) => {
            log_info(&format!("Config loaded from {}", path));
            config
        }
        Err(err) => {
            log_error(&format!("Config {} rejected: {}, using defaults", path, err));
            SimulationConfig::default()
        }
    }
}

fn send(app: &mut App, action: ActionInput) {
    app.world_mut().send_event(action);
}

fn set_input(app: &mut App, player: Entity, input: LocomotionInput) {
    if let Some(mut current) = app.world_mut().get_mut::<LocomotionInput>(player) {
        *current = input;
    }
}

fn dash_state(app: &App, player: Entity) -> DashState {
    app.world().get::<DashState>(player).cloned().unwrap_or(DashState::Idle)
}

fn position(app: &App, player: Entity) -> Vec3 {
    app.world()
        .get::<Transform>(player)
        .map(|transform| transform.translation)
        .unwrap_or_default()
}

fn main() {
    let mut app = create_headless_app();
    let config = load_config();

    log_info("Starting EdgeRunner headless simulation");

    app.add_plugins(SimulationPlugin::headless())
        .insert_resource(build_course());

    let player = spawn_player_character(&mut app.world_mut().commands(), Vec3::new(0.0, 0.9, 0.0), &config);
    app.update(); // Инициализация часов

    // Шаг вперёд
    set_input(&mut app, player, LocomotionInput { move_forward: 1.0, ..default() });
    for _ in 0..12 {
        app.update();
    }
    log_info(&format!("Walked to {:?}", position(&app, player)));

    // Взгляд вверх на 15°
    set_input(&mut app, player, LocomotionInput { look_up: 10.0, ..default() });
    app.update();
    set_input(&mut app, player, LocomotionInput::default());

    // Dash: зажать, подержать, отпустить
    send(&mut app, ActionInput::pressed(player, InputAction::Dash));
    for _ in 0..HOLD_TICKS {
        app.update();
    }
    send(&mut app, ActionInput::released(player, InputAction::Dash));
    app.update();

    for _ in 0..MAX_WAIT_TICKS {
        if !dash_state(&app, player).is_dashing() {
            break;
        }
        app.update();
    }
    log_info(&format!("Dash finished at {:?}", position(&app, player)));

    // Сразу ещё раз - на cooldown
    send(&mut app, ActionInput::pressed(player, InputAction::Dash));
    app.update();
    send(&mut app, ActionInput::released(player, InputAction::Dash));
    app.update();

    let mut waited = 0;
    while waited < MAX_WAIT_TICKS {
        let ready = app
            .world()
            .get::<DashAbility>(player)
            .is_some_and(|ability| ability.can_dash);
        if ready {
            break;
        }
        app.update();
        waited += 1;
    }
    log_info(&format!(
        "Dash ready again after {} more ticks ({:.2}s)",
        waited,
        waited as f64 / SIMULATION_HZ
    ));

    log_info("Simulation complete!");
}
