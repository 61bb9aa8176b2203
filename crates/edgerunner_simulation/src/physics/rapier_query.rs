//! Rapier backend для `WorldQuery`
//!
//! - sphere sweep → `cast_shape` (ball), witness/normal уже в world space
//! - line trace → `cast_ray_and_get_normal` (solid: старт внутри → toi 0, нулевая нормаль)
//!
//! Фильтр: только Environment слой, без сенсоров, без собственного тела актора.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::layers;
use crate::dash::{SurfaceHit, WorldQuery};

pub struct RapierWorldQuery<'c, 'w> {
    context: &'c RapierContext<'w>,
    exclude: Option<Entity>,
}

impl<'c, 'w> RapierWorldQuery<'c, 'w> {
    pub fn new(context: &'c RapierContext<'w>) -> Self {
        Self { context, exclude: None }
    }

    /// Не попадать в тело самого актора
    pub fn excluding(mut self, entity: Entity) -> Self {
        self.exclude = Some(entity);
        self
    }

    fn filter(&self) -> QueryFilter<'static> {
        let filter = QueryFilter::new()
            .exclude_sensors()
            .groups(layers::environment_query_groups());

        match self.exclude {
            Some(entity) => filter.exclude_rigid_body(entity),
            None => filter,
        }
    }
}

impl WorldQuery for RapierWorldQuery<'_, '_> {
    fn sweep_sphere(&self, start: Vec3, end: Vec3, radius: f32) -> Option<SurfaceHit> {
        let velocity = end - start;
        let shape = Collider::ball(radius);
        let options = ShapeCastOptions {
            max_time_of_impact: 1.0,
            target_distance: 0.0,
            stop_at_penetration: true,
            compute_impact_geometry_on_penetration: true,
        };

        let (_, hit) = self
            .context
            .cast_shape(start, Quat::IDENTITY, velocity, &*shape.raw, options, self.filter())?;

        let surface = match hit.details {
            Some(details) => SurfaceHit::new(details.witness1, details.normal1),
            // Без геометрии контакта - считаем penetration в точке остановки
            None => SurfaceHit::new(start + velocity * hit.time_of_impact, Vec3::ZERO),
        };
        Some(surface)
    }

    fn line_trace(&self, start: Vec3, end: Vec3) -> Option<SurfaceHit> {
        let direction = end - start;

        let (_, intersection) = self
            .context
            .cast_ray_and_get_normal(start, direction, 1.0, true, self.filter())?;

        Some(SurfaceHit::new(intersection.point, intersection.normal))
    }
}
