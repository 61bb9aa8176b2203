//! Kinematic контроллер для игрока
//!
//! Архитектура:
//! - Movement input накапливается за тик и потребляется один раз (clamp до единичной длины)
//! - Custom velocity integration (не используем Rapier forces)
//! - Ground probe через `WorldQuery` (тот же seam, что и у dash)
//! - Во время dash контроллер не трогает актора
//!
//! Детерминизм: fixed timestep (60Hz)

use bevy::prelude::*;

use crate::dash::{DashState, WorldQuery};
use crate::locomotion::JumpIntent;

/// Насколько выше стоп стартует ground probe (m)
pub const GROUND_PROBE_LIFT: f32 = 0.25;
/// Насколько ниже стоп ещё считаем "на земле" (m)
pub const GROUND_PROBE_DEPTH: f32 = 0.05;

/// Kinematic контроллер компонент
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct KinematicController {
    /// Текущая max скорость (walk или sprint, m/s)
    pub max_speed: f32,
    /// Вертикальная скорость прыжка (m/s)
    pub jump_speed: f32,
    /// Сила гравитации (m/s²)
    pub gravity: f32,
    /// От центра капсулы до стоп (m)
    pub foot_offset: f32,
    /// На земле ли персонаж
    pub grounded: bool,
}

impl Default for KinematicController {
    fn default() -> Self {
        Self {
            max_speed: 5.0,
            jump_speed: 5.0,
            gravity: -9.81,
            foot_offset: 0.9, // capsule 1.8m, центр на середине
            grounded: false,
        }
    }
}

/// Накопленный за тик movement input (world space)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct MovementInput {
    pub pending: Vec3,
}

impl MovementInput {
    pub fn add(&mut self, delta: Vec3) {
        self.pending += delta;
    }

    /// Забрать накопленный input (clamp до единичной длины) и обнулить
    pub fn consume(&mut self) -> Vec3 {
        let input = self.pending.clamp_length_max(1.0);
        self.pending = Vec3::ZERO;
        input
    }
}

/// Скорость актора (интегрируем сами)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PhysicsBody {
    pub velocity: Vec3,
}

fn is_dashing(state: Option<&DashState>) -> bool {
    state.is_some_and(DashState::is_dashing)
}

/// Ground probe одного актора
///
/// Trace вниз от чуть выше стоп. При падении (или покое) снапает стопы на поверхность.
pub fn probe_ground<Q>(
    world: &Q,
    transform: &mut Transform,
    controller: &mut KinematicController,
    body: &mut PhysicsBody,
) where
    Q: WorldQuery + ?Sized,
{
    let feet = transform.translation - Vec3::Y * controller.foot_offset;
    let start = feet + Vec3::Y * GROUND_PROBE_LIFT;
    let end = feet - Vec3::Y * GROUND_PROBE_DEPTH;

    let ground = world
        .line_trace(start, end)
        .filter(|hit| !hit.is_penetrating() && hit.normal.y > 0.0);

    match ground {
        Some(hit) if body.velocity.y <= 0.0 => {
            controller.grounded = true;
            transform.translation.y = hit.position.y + controller.foot_offset;
            body.velocity.y = 0.0;
        }
        _ => controller.grounded = false,
    }
}

/// Акторы для ground probe (общий тип для всех backend систем)
pub type GroundProbeActors<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static mut Transform,
        &'static mut KinematicController,
        &'static mut PhysicsBody,
        Option<&'static DashState>,
    ),
>;

/// Общий цикл ground probe для любого backend
pub(crate) fn run_ground_probe<Q, F>(query_for: F, actors: &mut GroundProbeActors)
where
    Q: WorldQuery,
    F: Fn(Entity) -> Q,
{
    for (entity, mut transform, mut controller, mut body, dash) in actors.iter_mut() {
        if is_dashing(dash) {
            continue;
        }
        let world = query_for(entity);
        probe_ground(&world, &mut transform, &mut controller, &mut body);
    }
}

/// Система: JumpIntent → вертикальная скорость (только с земли)
pub fn apply_jump(
    mut jumps: EventReader<JumpIntent>,
    mut query: Query<(&mut KinematicController, &mut PhysicsBody, Option<&DashState>)>,
) {
    for intent in jumps.read() {
        let Ok((mut controller, mut body, dash)) = query.get_mut(intent.entity) else {
            continue;
        };
        if !controller.grounded || is_dashing(dash) {
            continue;
        }

        body.velocity.y = controller.jump_speed;
        controller.grounded = false;
    }
}

/// Система применения движения от input
///
/// Горизонтальная скорость = clamp(input, 1) * max_speed.
/// Нет input → останавливаем горизонтальное движение (трение).
pub fn apply_movement_input(
    mut query: Query<(&KinematicController, &mut MovementInput, &mut PhysicsBody, Option<&DashState>)>,
) {
    for (controller, mut input, mut body, dash) in query.iter_mut() {
        let direction = input.consume();
        if is_dashing(dash) {
            continue;
        }

        body.velocity.x = direction.x * controller.max_speed;
        body.velocity.z = direction.z * controller.max_speed;
    }
}

/// Система применения gravity к velocity
pub fn apply_gravity(
    mut query: Query<(&KinematicController, &mut PhysicsBody, Option<&DashState>)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (controller, mut body, dash) in query.iter_mut() {
        if !controller.grounded && !is_dashing(dash) {
            body.velocity.y += controller.gravity * delta;
        }
    }
}

/// Система интеграции velocity → Transform
pub fn integrate_velocity_to_transform(
    mut query: Query<(&PhysicsBody, &mut Transform, Option<&DashState>), With<KinematicController>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (body, mut transform, dash) in query.iter_mut() {
        if is_dashing(dash) {
            continue;
        }
        transform.translation += body.velocity * delta;
    }
}
