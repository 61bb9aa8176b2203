//! World query seam
//!
//! Resolver не знает про физический движок - только про этот trait.
//! Реализации:
//! - `physics::RapierWorldQuery` (bevy_rapier3d)
//! - `physics::StaticWorld` (headless, аналитическая геометрия)

use bevy::prelude::*;

use super::surface::SurfaceHit;

/// Параметры баллистической траектории (predict path)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathParams {
    pub start: Vec3,
    pub launch_velocity: Vec3,
    /// Радиус снаряда (sphere sweep)
    pub radius: f32,
    /// Ускорение (обычно `Vec3::Y * -9.81`)
    pub gravity: Vec3,
    /// Sub-steps в секунду
    pub sim_frequency: f32,
    /// Максимальное время полёта (секунды)
    pub max_sim_time: f32,
}

/// Collision queries, нужные dash resolver'у и ground probe
pub trait WorldQuery {
    /// Sphere sweep по отрезку, первый blocking hit
    fn sweep_sphere(&self, start: Vec3, end: Vec3, radius: f32) -> Option<SurfaceHit>;

    /// Line trace по отрезку, первый blocking hit
    fn line_trace(&self, start: Vec3, end: Vec3) -> Option<SurfaceHit>;

    /// Первый удар баллистической траектории
    fn predict_path(&self, params: &PathParams) -> Option<SurfaceHit> {
        trace_ballistic_path(params, |start, end| self.sweep_sphere(start, end, params.radius))
    }
}

impl<Q: WorldQuery + ?Sized> WorldQuery for &Q {
    fn sweep_sphere(&self, start: Vec3, end: Vec3, radius: f32) -> Option<SurfaceHit> {
        (**self).sweep_sphere(start, end, radius)
    }

    fn line_trace(&self, start: Vec3, end: Vec3) -> Option<SurfaceHit> {
        (**self).line_trace(start, end)
    }

    fn predict_path(&self, params: &PathParams) -> Option<SurfaceHit> {
        (**self).predict_path(params)
    }
}

/// Прогоняет траекторию sub-step'ами и возвращает первый удар
///
/// Интеграция velocity Verlet: `p += v*dt + g*dt²/2`, `v += g*dt`.
/// Последний шаг укорачивается до `max_sim_time`.
pub fn trace_ballistic_path<F>(params: &PathParams, mut cast_segment: F) -> Option<SurfaceHit>
where
    F: FnMut(Vec3, Vec3) -> Option<SurfaceHit>,
{
    if params.sim_frequency <= 0.0 || params.max_sim_time <= 0.0 {
        return None;
    }

    let step = 1.0 / params.sim_frequency;
    let step_count = (params.max_sim_time * params.sim_frequency).ceil() as u32;
    let mut position = params.start;
    let mut velocity = params.launch_velocity;

    for index in 0..step_count {
        let remaining = params.max_sim_time - index as f32 * step;
        let dt = step.min(remaining);
        let next = position + velocity * dt + params.gravity * (0.5 * dt * dt);

        if let Some(hit) = cast_segment(position, next) {
            return Some(hit);
        }

        velocity += params.gravity * dt;
        position = next;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PathParams {
        PathParams {
            start: Vec3::new(0.0, 10.0, 0.0),
            launch_velocity: Vec3::new(0.0, 0.0, -10.0),
            radius: 0.05,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            sim_frequency: 20.0,
            max_sim_time: 2.0,
        }
    }

    #[test]
    fn test_path_segments_are_contiguous() {
        let mut segments = Vec::new();
        let hit = trace_ballistic_path(&params(), |start, end| {
            segments.push((start, end));
            None
        });

        assert!(hit.is_none());
        assert_eq!(segments.len(), 40); // 2 sec * 20 Hz
        assert_eq!(segments[0].0, params().start);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
    }

    #[test]
    fn test_path_follows_gravity() {
        let mut last_end = Vec3::ZERO;
        trace_ballistic_path(&params(), |_, end| {
            last_end = end;
            None
        });

        // После 2 sec: z = -20, y = 10 - 9.81*4/2
        assert!((last_end.z + 20.0).abs() < 1e-3, "z = {}", last_end.z);
        assert!((last_end.y - (10.0 - 19.62)).abs() < 1e-2, "y = {}", last_end.y);
    }

    #[test]
    fn test_path_stops_on_first_hit() {
        let mut calls = 0;
        let hit = trace_ballistic_path(&params(), |start, _| {
            calls += 1;
            (calls == 3).then(|| SurfaceHit::new(start, Vec3::Y))
        });

        assert_eq!(calls, 3);
        assert!(hit.is_some());
    }

    #[test]
    fn test_path_degenerate_params() {
        let mut p = params();
        p.sim_frequency = 0.0;
        assert!(trace_ballistic_path(&p, |s, _| Some(SurfaceHit::new(s, Vec3::Y))).is_none());
    }
}
