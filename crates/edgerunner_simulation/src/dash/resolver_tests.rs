//! Tests for dash target resolver.

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use bevy::prelude::*;
    use proptest::prelude::*;

    use crate::dash::{
        incidence_angle, DashConfig, DashTargetResolver, LandingMethod, PathParams, SearchDirection, SurfaceHit,
        WorldQuery,
    };
    use crate::physics::{StaticCollider, StaticWorld};

    const ORIGIN: Vec3 = Vec3::new(0.0, 1.6, 0.0);
    const FORWARD: Vec3 = Vec3::NEG_Z;

    /// Мир со сценарием: фиксированный удар траектории + скриптованные trace'ы
    struct ScriptedWorld<F: Fn(Vec3, Vec3) -> Option<SurfaceHit>> {
        path_hit: Option<SurfaceHit>,
        trace: F,
        traces: RefCell<Vec<(Vec3, Vec3)>>,
    }

    impl<F: Fn(Vec3, Vec3) -> Option<SurfaceHit>> ScriptedWorld<F> {
        fn new(path_hit: Option<SurfaceHit>, trace: F) -> Self {
            Self {
                path_hit,
                trace,
                traces: RefCell::new(Vec::new()),
            }
        }

        fn trace_count(&self) -> usize {
            self.traces.borrow().len()
        }
    }

    impl<F: Fn(Vec3, Vec3) -> Option<SurfaceHit>> WorldQuery for ScriptedWorld<F> {
        fn sweep_sphere(&self, _start: Vec3, _end: Vec3, _radius: f32) -> Option<SurfaceHit> {
            None
        }

        fn line_trace(&self, start: Vec3, end: Vec3) -> Option<SurfaceHit> {
            self.traces.borrow_mut().push((start, end));
            (self.trace)(start, end)
        }

        fn predict_path(&self, _params: &PathParams) -> Option<SurfaceHit> {
            self.path_hit
        }
    }

    fn wall_hit() -> SurfaceHit {
        // Стена перед игроком, нормаль к игроку (90° от up)
        SurfaceHit::new(Vec3::new(0.0, 1.0, -5.0), Vec3::Z)
    }

    fn floor_at(position: Vec3) -> Option<SurfaceHit> {
        Some(SurfaceHit::new(position, Vec3::Y))
    }

    fn is_forward_trace(start: Vec3) -> bool {
        start.z < wall_hit().position.z
    }

    fn resolver() -> DashTargetResolver {
        DashTargetResolver::new(DashConfig::default())
    }

    #[test]
    fn test_flat_floor_is_direct_target() {
        let impact = SurfaceHit::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Y);
        let world = ScriptedWorld::new(Some(impact), |_, _| None);

        let resolution = resolver().resolve(&world, ORIGIN, FORWARD).expect("floor is walkable");

        assert_eq!(resolution.method, LandingMethod::Direct);
        assert_eq!(resolution.pose.position, impact.position);
        assert_eq!(resolution.impact, impact);
        assert_eq!(world.trace_count(), 0, "walkable impact не должен запускать поиск");
    }

    #[test]
    fn test_wall_uses_forward_candidate_when_backward_fails() {
        let forward_floor = wall_hit().position + Vec3::new(0.0, 0.0, -50.0);
        let world = ScriptedWorld::new(Some(wall_hit()), move |start, _| {
            if is_forward_trace(start) {
                floor_at(forward_floor)
            } else {
                None
            }
        });

        let resolution = resolver().resolve(&world, ORIGIN, FORWARD).expect("forward candidate");

        assert_eq!(resolution.method, LandingMethod::Forward { steps: 1 });
        assert_eq!(resolution.pose.position, forward_floor);
    }

    #[test]
    fn test_wall_picks_closer_backward_candidate() {
        let forward_floor = wall_hit().position + Vec3::new(0.0, 0.0, -80.0);
        let backward_floor = wall_hit().position + Vec3::new(0.0, 0.0, 40.0);
        let world = ScriptedWorld::new(Some(wall_hit()), move |start, _| {
            if is_forward_trace(start) {
                floor_at(forward_floor)
            } else {
                floor_at(backward_floor)
            }
        });

        let resolution = resolver().resolve(&world, ORIGIN, FORWARD).expect("both candidates");

        assert_eq!(resolution.method, LandingMethod::Backward { steps: 1 });
        assert_eq!(resolution.pose.position, backward_floor);
    }

    #[test]
    fn test_wall_picks_closer_forward_candidate() {
        let forward_floor = wall_hit().position + Vec3::new(0.0, 0.0, -10.0);
        let backward_floor = wall_hit().position + Vec3::new(0.0, 0.0, 40.0);
        let world = ScriptedWorld::new(Some(wall_hit()), move |start, _| {
            if is_forward_trace(start) {
                floor_at(forward_floor)
            } else {
                floor_at(backward_floor)
            }
        });

        let resolution = resolver().resolve(&world, ORIGIN, FORWARD).expect("both candidates");
        assert_eq!(resolution.method, LandingMethod::Forward { steps: 1 });
    }

    #[test]
    fn test_equal_distances_resolve_to_backward() {
        let forward_floor = wall_hit().position + Vec3::new(0.0, 0.0, -30.0);
        let backward_floor = wall_hit().position + Vec3::new(0.0, 0.0, 30.0);
        let world = ScriptedWorld::new(Some(wall_hit()), move |start, _| {
            if is_forward_trace(start) {
                floor_at(forward_floor)
            } else {
                floor_at(backward_floor)
            }
        });

        let resolution = resolver().resolve(&world, ORIGIN, FORWARD).expect("both candidates");
        assert_eq!(resolution.pose.position, backward_floor);
    }

    #[test]
    fn test_no_projectile_hit_fails() {
        let world = ScriptedWorld::new(None, |start, _| floor_at(start));

        assert!(resolver().resolve(&world, ORIGIN, FORWARD).is_none());
        assert_eq!(world.trace_count(), 0);
    }

    #[test]
    fn test_both_searches_empty_fails() {
        let world = ScriptedWorld::new(Some(wall_hit()), |_, _| None);

        assert!(resolver().resolve(&world, ORIGIN, FORWARD).is_none());
        assert_eq!(world.trace_count(), 2);
    }

    #[test]
    fn test_zero_direction_fails() {
        let world = ScriptedWorld::new(Some(wall_hit()), |start, _| floor_at(start));
        assert!(resolver().resolve(&world, ORIGIN, Vec3::ZERO).is_none());
    }

    #[test]
    fn test_search_trace_geometry() {
        let config = DashConfig::default();
        let world = ScriptedWorld::new(Some(wall_hit()), |_, _| None);

        resolver().resolve(&world, ORIGIN, FORWARD);

        let traces = world.traces.borrow();
        let (forward_start, forward_end) = traces[0];
        let (backward_start, _) = traces[1];

        let raised = wall_hit().position + Vec3::Y * config.search_height;
        assert!(forward_start.distance(raised + FORWARD * config.forward_offset) < 1e-5);
        assert!(backward_start.distance(raised - FORWARD * config.forward_offset) < 1e-5);
        assert!((forward_start.y - forward_end.y - config.search_depth).abs() < 1e-5);
        assert_eq!(forward_start.x, forward_end.x);
        assert_eq!(forward_start.z, forward_end.z);
    }

    #[test]
    fn test_steep_trace_continues_from_new_point() {
        let config = DashConfig::default();
        let ledge = Vec3::new(0.0, 2.5, -5.3);
        let world = ScriptedWorld::new(Some(wall_hit()), move |start, _| {
            if !is_forward_trace(start) {
                return None;
            }
            if start.z > -5.3 {
                // Первый шаг: снова стена (ещё один steep удар)
                Some(SurfaceHit::new(Vec3::new(0.0, 2.0, -5.2), Vec3::X))
            } else {
                floor_at(ledge)
            }
        });

        let candidate = resolver()
            .search(&world, &wall_hit(), FORWARD, SearchDirection::Forward)
            .expect("ledge found on second step");

        assert_eq!(candidate.steps, 2);
        assert_eq!(candidate.pose.position, ledge);

        let traces = world.traces.borrow();
        let expected_second = Vec3::new(0.0, 2.0, -5.2)
            + FORWARD * config.forward_offset
            + Vec3::Y * config.search_height;
        assert!(traces[1].0.distance(expected_second) < 1e-5);
    }

    #[test]
    fn test_search_is_bounded() {
        let config = DashConfig {
            max_search_steps: 7,
            ..default()
        };
        let world = ScriptedWorld::new(Some(wall_hit()), |start, _| {
            Some(SurfaceHit::new(start - Vec3::Y, Vec3::X))
        });

        let resolution = DashTargetResolver::new(config).resolve(&world, ORIGIN, FORWARD);

        assert!(resolution.is_none());
        assert_eq!(world.trace_count(), 14); // 7 forward + 7 backward
    }

    #[test]
    fn test_penetrating_trace_keeps_searching() {
        let world = ScriptedWorld::new(Some(wall_hit()), |start, _| {
            if !is_forward_trace(start) {
                return None;
            }
            if start.z > -5.5 {
                // Старт внутри стены
                Some(SurfaceHit::new(start, Vec3::ZERO))
            } else {
                floor_at(start - Vec3::Y)
            }
        });

        let resolution = resolver().resolve(&world, ORIGIN, FORWARD).expect("ledge behind wall");
        assert_eq!(resolution.method, LandingMethod::Forward { steps: 3 });
    }

    #[test]
    fn test_penetrating_trace_does_not_raise_search_base() {
        let config = DashConfig::default();
        let world = ScriptedWorld::new(Some(wall_hit()), |start, _| Some(SurfaceHit::new(start, Vec3::ZERO)));

        let candidate = resolver().search(&world, &wall_hit(), FORWARD, SearchDirection::Forward);
        assert!(candidate.is_none());

        let traces = world.traces.borrow();
        assert_eq!(traces.len(), config.max_search_steps as usize);

        let ceiling = wall_hit().position.y + config.search_height;
        for (index, (start, _)) in traces.iter().enumerate() {
            assert!((start.y - ceiling).abs() < 1e-4, "trace {} starts at {:?}", index, start);
            let expected_z = wall_hit().position.z - config.forward_offset * (index + 1) as f32;
            assert!((start.z - expected_z).abs() < 1e-4, "trace {} starts at {:?}", index, start);
        }
    }

    #[test]
    fn test_pitched_search_through_solid_stays_below_ceiling() {
        let config = DashConfig::default();
        let forward = Vec3::new(0.0, 0.5, -1.0).normalize();
        let world = ScriptedWorld::new(Some(wall_hit()), |start, _| Some(SurfaceHit::new(start, Vec3::ZERO)));

        resolver().search(&world, &wall_hit(), forward, SearchDirection::Forward);

        let ceiling = wall_hit().position.y + forward.y * config.forward_offset + config.search_height;
        for (start, _) in world.traces.borrow().iter() {
            assert!(start.y <= ceiling + 1e-4, "trace starts at {:?}", start);
        }
    }

    #[test]
    fn test_tall_tower_is_not_scaled() {
        // Башня 30m, толщина 5m: верх вне досягаемости поиска
        let world = StaticWorld::new()
            .with(StaticCollider::from_min_max(Vec3::new(-50.0, -1.0, -50.0), Vec3::new(50.0, 0.0, 50.0)))
            .with(StaticCollider::from_min_max(Vec3::new(-5.0, 0.0, -13.0), Vec3::new(5.0, 30.0, -8.0)));
        let config = DashConfig::default();
        let forward = Quat::from_rotation_x(50f32.to_radians()) * Vec3::NEG_Z;

        let impact = world
            .predict_path(&config.path_params(ORIGIN, forward))
            .expect("trajectory hits the tower face");
        assert!(!impact.is_walkable(config.max_surface_angle));

        let resolver = DashTargetResolver::new(config);
        let candidates = resolver.search_candidates(&world, &impact, forward);
        let ceiling = impact.position.y + config.forward_offset + config.search_height;
        for candidate in [candidates.forward, candidates.backward].into_iter().flatten() {
            assert!(candidate.pose.position.y <= ceiling, "candidate {:?}", candidate);
        }

        assert!(resolver.resolve(&world, ORIGIN, forward).is_none());
    }

    #[test]
    fn test_surface_at_threshold_triggers_search() {
        let normal = Quat::from_rotation_x(0.6) * Vec3::Y;
        let config = DashConfig {
            max_surface_angle: incidence_angle(normal),
            ..default()
        };
        let impact = SurfaceHit::new(Vec3::new(0.0, 0.0, -8.0), normal);
        let world = ScriptedWorld::new(Some(impact), |_, _| None);

        assert!(DashTargetResolver::new(config).resolve(&world, ORIGIN, FORWARD).is_none());
        assert_eq!(world.trace_count(), 2);
    }

    proptest! {
        #[test]
        fn prop_walkable_impact_is_returned_unchanged(
            yaw in 0.0f32..std::f32::consts::TAU,
            tilt_degrees in 0.0f32..34.5,
            x in -50.0f32..50.0,
            z in -50.0f32..50.0,
        ) {
            let normal = Quat::from_rotation_y(yaw) * Quat::from_rotation_x(tilt_degrees.to_radians()) * Vec3::Y;
            let impact = SurfaceHit::new(Vec3::new(x, 0.0, z), normal);
            let world = ScriptedWorld::new(Some(impact), |_, _| None);

            let resolution = resolver().resolve(&world, ORIGIN, FORWARD);

            prop_assert!(resolution.is_some());
            let resolution = resolution.unwrap();
            prop_assert_eq!(resolution.method, LandingMethod::Direct);
            prop_assert_eq!(resolution.pose.position, impact.position);
            prop_assert_eq!(world.trace_count(), 0);
        }

        #[test]
        fn prop_steep_impact_picks_nearest_candidate(
            forward_distance in 0.5f32..100.0,
            backward_distance in 0.5f32..100.0,
        ) {
            let forward_floor = wall_hit().position + Vec3::new(0.0, 0.0, -forward_distance);
            let backward_floor = wall_hit().position + Vec3::new(0.0, 0.0, backward_distance);
            let world = ScriptedWorld::new(Some(wall_hit()), move |start, _| {
                if is_forward_trace(start) {
                    floor_at(forward_floor)
                } else {
                    floor_at(backward_floor)
                }
            });

            let resolution = resolver().resolve(&world, ORIGIN, FORWARD);
            prop_assert!(resolution.is_some());
            let resolution = resolution.unwrap();

            let measured_forward = forward_floor.distance(wall_hit().position);
            let measured_backward = backward_floor.distance(wall_hit().position);
            let expected = if measured_forward < measured_backward { forward_floor } else { backward_floor };
            prop_assert_eq!(resolution.pose.position, expected);
        }

        #[test]
        fn prop_result_is_never_steep(
            tilt_degrees in 0.0f32..90.0,
            candidate_tilt in 0.0f32..90.0,
        ) {
            let config = DashConfig::default();
            let impact = SurfaceHit::new(
                wall_hit().position,
                Quat::from_rotation_x(tilt_degrees.to_radians()) * Vec3::Y,
            );
            let candidate_normal = Quat::from_rotation_x(candidate_tilt.to_radians()) * Vec3::Y;
            let world = ScriptedWorld::new(Some(impact), move |start, _| {
                Some(SurfaceHit::new(start - Vec3::Y, candidate_normal))
            });

            if let Some(resolution) = resolver().resolve(&world, ORIGIN, FORWARD) {
                let landing_normal = resolution.pose.orientation * Vec3::Y;
                prop_assert!(incidence_angle(landing_normal) < config.max_surface_angle + 1e-3);
            }
        }
    }
}
