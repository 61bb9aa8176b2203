//! Headless collision world (без Rapier)
//!
//! Геометрия уровня - набор oriented boxes. Используется в тестах и headless бинаре,
//! где физический движок не подключён.
//!
//! Семантика совпадает с Rapier backend:
//! - sphere sweep = отрезок против box'а, раздутого на радиус
//! - отрезок, стартующий внутри box'а → penetrating hit (нулевая нормаль в точке старта)

use bevy::prelude::*;

use crate::dash::{SurfaceHit, WorldQuery};

const PARALLEL_EPSILON: f32 = 1e-8;

/// Oriented box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticCollider {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub rotation: Quat,
}

impl StaticCollider {
    pub fn cuboid(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self::cuboid((min + max) * 0.5, (max - min) * 0.5)
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Отрезок `start → end` против box'а, раздутого на `radius`
    ///
    /// Возвращает долю отрезка (0..=1) и точку контакта на поверхности box'а.
    pub fn cast_segment(&self, start: Vec3, end: Vec3, radius: f32) -> Option<(f32, SurfaceHit)> {
        let inverse = self.rotation.inverse();
        let origin = inverse * (start - self.center);
        let delta = inverse * (end - start);
        let extents = self.half_extents + Vec3::splat(radius.max(0.0));

        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut local_normal = Vec3::ZERO;

        // Slab test по трём осям
        for axis in 0..3 {
            let o = origin[axis];
            let d = delta[axis];
            let e = extents[axis];

            if d.abs() < PARALLEL_EPSILON {
                if o.abs() > e {
                    return None;
                }
                continue;
            }

            let mut near = (-e - o) / d;
            let mut far = (e - o) / d;
            let mut sign = -1.0;
            if near > far {
                std::mem::swap(&mut near, &mut far);
                sign = 1.0;
            }

            if near > t_enter {
                t_enter = near;
                local_normal = Vec3::ZERO;
                local_normal[axis] = sign;
            }
            t_exit = t_exit.min(far);

            if t_enter > t_exit {
                return None;
            }
        }

        if t_exit < 0.0 || t_enter > 1.0 {
            return None;
        }

        if t_enter < 0.0 {
            return Some((0.0, SurfaceHit::new(start, Vec3::ZERO)));
        }

        let normal = self.rotation * local_normal;
        let point = start + (end - start) * t_enter - normal * radius.max(0.0);
        Some((t_enter, SurfaceHit::new(point, normal)))
    }
}

/// Геометрия уровня для headless симуляции
#[derive(Resource, Debug, Clone, Default)]
pub struct StaticWorld {
    pub colliders: Vec<StaticCollider>,
}

impl StaticWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, collider: StaticCollider) -> Self {
        self.colliders.push(collider);
        self
    }

    pub fn insert(&mut self, collider: StaticCollider) {
        self.colliders.push(collider);
    }

    /// Ближайший удар среди всех box'ов
    pub fn cast(&self, start: Vec3, end: Vec3, radius: f32) -> Option<SurfaceHit> {
        self.colliders
            .iter()
            .filter_map(|collider| collider.cast_segment(start, end, radius))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, hit)| hit)
    }
}

impl WorldQuery for StaticWorld {
    fn sweep_sphere(&self, start: Vec3, end: Vec3, radius: f32) -> Option<SurfaceHit> {
        self.cast(start, end, radius)
    }

    fn line_trace(&self, start: Vec3, end: Vec3) -> Option<SurfaceHit> {
        self.cast(start, end, 0.0)
    }
}
