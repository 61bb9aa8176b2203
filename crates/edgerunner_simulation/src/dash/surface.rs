//! Поверхности и позы: результат world query и цель dash
//!
//! World-up = `Vec3::Y` (Bevy convention).

use bevy::prelude::*;

/// Позиция + ориентация (цель dash)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self { position, orientation }
    }

    /// Поза на поверхности: up персонажа смотрит вдоль нормали
    pub fn on_surface(hit: &SurfaceHit) -> Self {
        Self::new(hit.position, surface_orientation(hit.normal))
    }
}

impl From<Pose> for Transform {
    fn from(pose: Pose) -> Self {
        Transform::from_translation(pose.position).with_rotation(pose.orientation)
    }
}

/// Точка удара world query
///
/// `normal == Vec3::ZERO` - query стартовал внутри геометрии (penetration).
/// Такая поверхность никогда не считается walkable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub position: Vec3,
    pub normal: Vec3,
}

impl SurfaceHit {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }

    pub fn is_penetrating(&self) -> bool {
        self.normal.length_squared() <= f32::EPSILON
    }

    pub fn incidence_angle(&self) -> f32 {
        incidence_angle(self.normal)
    }

    /// Можно ли стоять на поверхности
    ///
    /// Граница строгая: угол ровно `max_angle` - уже steep.
    pub fn is_walkable(&self, max_angle: f32) -> bool {
        self.incidence_angle() < max_angle
    }
}

/// Угол между нормалью и world-up (градусы, 0..=180)
///
/// Нулевая нормаль → 180° (заведомо не walkable).
pub fn incidence_angle(normal: Vec3) -> f32 {
    let length = normal.length();
    if length <= f32::EPSILON {
        return 180.0;
    }

    let cos = (normal.dot(Vec3::Y) / length).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Ориентация, переводящая world-up в нормаль поверхности
pub fn surface_orientation(normal: Vec3) -> Quat {
    match normal.try_normalize() {
        Some(normal) => Quat::from_rotation_arc(Vec3::Y, normal),
        None => Quat::IDENTITY,
    }
}
