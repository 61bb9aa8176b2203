//! Collision groups
//!
//! ## Слои:
//! - GROUP_2: Actors (капсулы игрока)
//! - GROUP_3: Environment (пол, стены, уступы)
//!
//! Dash traces и ground probe видят только Environment (аналог visibility channel).

use bevy_rapier3d::prelude::*;

/// Actors (капсулы персонажей)
pub const LAYER_ACTORS: Group = Group::GROUP_2;

/// Environment (статическая геометрия уровня)
pub const LAYER_ENVIRONMENT: Group = Group::GROUP_3;

/// Actors коллайдят с Actors + Environment
pub fn actor_groups() -> CollisionGroups {
    CollisionGroups::new(LAYER_ACTORS, LAYER_ACTORS | LAYER_ENVIRONMENT)
}

/// Environment коллайдит со всем
pub fn environment_groups() -> CollisionGroups {
    CollisionGroups::new(LAYER_ENVIRONMENT, Group::ALL)
}

/// Фильтр world queries (dash prediction, ground probe)
pub fn environment_query_groups() -> CollisionGroups {
    CollisionGroups::new(Group::ALL, LAYER_ENVIRONMENT)
}
