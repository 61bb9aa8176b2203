//! Dash systems
//!
//! Порядок (FixedUpdate, SimulationSet::Dash):
//! 1. tick_dash_cooldowns - gate открывается по таймеру
//! 2. handle_dash_press - Idle → Predicting
//! 3. update_dash_targeting_{static,rapier} - превью / release → Dashing | Idle
//! 4. execute_dash - перемещение к цели, Dashing → Idle

use bevy::prelude::*;

use super::components::{interp_constant_to, DashAbility, DashConfig, DashRequest, DashState};
use super::events::{DashCue, DashCueKind, DashFinished, DashReady, DashStarted};
use super::query::WorldQuery;
use super::resolver::{DashResolution, DashTargetResolver, LandingMethod};
use crate::locomotion::{ActionInput, ButtonPhase, FirstPersonView, InputAction};
use crate::physics::{KinematicController, PhysicsBody, RapierWorldQuery, StaticWorld};

/// Система: cooldown таймеры
pub fn tick_dash_cooldowns(
    mut query: Query<(Entity, &mut DashAbility)>,
    mut ready: EventWriter<DashReady>,
    time: Res<Time<Fixed>>,
) {
    for (entity, mut ability) in query.iter_mut() {
        if ability.tick(time.delta()) {
            ready.write(DashReady { entity });
            crate::log(&format!("Dash: {:?} ready", entity));
        }
    }
}

/// Система: нажатие dash
///
/// Idle + can_dash → Predicting. Иначе нажатие игнорируется.
pub fn handle_dash_press(
    mut actions: EventReader<ActionInput>,
    mut query: Query<(&DashAbility, &mut DashState)>,
) {
    for action in actions.read() {
        if !action.is(InputAction::Dash, ButtonPhase::Pressed) {
            continue;
        }
        let Ok((ability, mut state)) = query.get_mut(action.entity) else {
            continue;
        };

        if *state != DashState::Idle {
            crate::log(&format!("Dash: {:?} press ignored (state {:?})", action.entity, *state));
            continue;
        }
        if !ability.can_dash {
            crate::log(&format!(
                "Dash: {:?} press ignored (cooldown {:.2}s left)",
                action.entity,
                ability.cooldown.remaining_secs()
            ));
            continue;
        }

        *state = DashState::Predicting;
        crate::log(&format!("Dash: {:?} Idle → Predicting", action.entity));
    }
}

/// Акторы для dash targeting (общий тип для всех backend систем)
pub type DashTargetingActors<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static Transform,
        &'static FirstPersonView,
        &'static DashConfig,
        &'static mut DashState,
        &'static mut DashAbility,
        Option<&'static KinematicController>,
    ),
>;

fn emit_cues(entity: Entity, resolution: &DashResolution, config: &DashConfig, cues: &mut EventWriter<DashCue>) {
    cues.write(DashCue {
        entity,
        pose: resolution.pose,
        radius: config.marker_radius,
        kind: DashCueKind::Preview,
    });

    if resolution.method == LandingMethod::Direct {
        cues.write(DashCue {
            entity,
            pose: resolution.pose,
            radius: config.marker_radius,
            kind: DashCueKind::DirectImpact,
        });
    }
}

/// Общий цикл targeting для любого backend
///
/// - Predicting без release → resolve + cues
/// - Predicting + release → resolve: успех → Dashing, провал → Idle
/// - release не в Predicting игнорируется
pub(crate) fn run_dash_targeting<Q, F>(
    query_for: F,
    actions: &mut EventReader<ActionInput>,
    actors: &mut DashTargetingActors,
    cues: &mut EventWriter<DashCue>,
    started: &mut EventWriter<DashStarted>,
) where
    Q: WorldQuery,
    F: Fn(Entity) -> Q,
{
    let released: Vec<Entity> = actions
        .read()
        .filter(|action| action.is(InputAction::Dash, ButtonPhase::Released))
        .map(|action| action.entity)
        .collect();

    for (entity, transform, view, config, mut state, mut ability, controller) in actors.iter_mut() {
        if *state != DashState::Predicting {
            continue;
        }

        let world = query_for(entity);
        let resolver = DashTargetResolver::new(*config);
        let resolution = resolver.resolve(&world, view.eye_position(transform), view.forward());
        let is_released = released.contains(&entity);

        match (resolution, is_released) {
            (Some(resolution), false) => emit_cues(entity, &resolution, config, cues),
            (None, false) => {}
            (Some(resolution), true) => {
                let foot_offset = controller.map_or(0.0, |controller| controller.foot_offset);
                let request = DashRequest {
                    target: resolution.pose,
                    destination: resolution.pose.position + Vec3::Y * foot_offset,
                };

                *state = DashState::Dashing(request);
                ability.start_cooldown(config.cooldown());
                started.write(DashStarted {
                    entity,
                    request,
                    method: resolution.method,
                });

                crate::log(&format!(
                    "Dash: {:?} Predicting → Dashing to {:?} ({:?})",
                    entity, request.destination, resolution.method
                ));
            }
            (None, true) => {
                *state = DashState::Idle;
                crate::log(&format!("Dash: {:?} no valid target, Predicting → Idle", entity));
            }
        }
    }
}

/// Система: targeting через StaticWorld
pub fn update_dash_targeting_static(
    world: Res<StaticWorld>,
    mut actions: EventReader<ActionInput>,
    mut actors: DashTargetingActors,
    mut cues: EventWriter<DashCue>,
    mut started: EventWriter<DashStarted>,
) {
    let world = world.as_ref();
    run_dash_targeting(|_| world, &mut actions, &mut actors, &mut cues, &mut started);
}

/// Система: targeting через Rapier
pub fn update_dash_targeting_rapier(
    rapier: bevy_rapier3d::prelude::ReadRapierContext,
    mut actions: EventReader<ActionInput>,
    mut actors: DashTargetingActors,
    mut cues: EventWriter<DashCue>,
    mut started: EventWriter<DashStarted>,
) {
    let Ok(context) = rapier.single() else {
        // Нет physics context → пустой мир: release вернёт актора в Idle
        let empty = StaticWorld::default();
        run_dash_targeting(|_| &empty, &mut actions, &mut actors, &mut cues, &mut started);
        return;
    };
    run_dash_targeting(
        |entity| RapierWorldQuery::new(&context).excluding(entity),
        &mut actions,
        &mut actors,
        &mut cues,
        &mut started,
    );
}

/// Система: перемещение во время dash
///
/// Постоянная скорость `dash_speed`; по прибытии → Idle + DashFinished.
/// Скорость актора после прибытия обнуляется.
pub fn execute_dash(
    mut query: Query<(Entity, &DashConfig, &mut DashState, &mut Transform, Option<&mut PhysicsBody>)>,
    mut finished: EventWriter<DashFinished>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, config, mut state, mut transform, body) in query.iter_mut() {
        let Some(request) = state.request().copied() else {
            continue;
        };

        transform.translation =
            interp_constant_to(transform.translation, request.destination, delta, config.dash_speed);

        if transform.translation == request.destination {
            *state = DashState::Idle;
            if let Some(mut body) = body {
                body.velocity = Vec3::ZERO;
            }
            finished.write(DashFinished {
                entity,
                position: transform.translation,
            });
            crate::log(&format!("Dash: {:?} arrived at {:?}, Dashing → Idle", entity, transform.translation));
        }
    }
}
