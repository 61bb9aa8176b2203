//! Dash target resolver
//!
//! Алгоритм:
//! 1. Баллистическая траектория из `origin + forward*offset` со скоростью `forward*launch_speed`
//! 2. Нет удара → нет цели
//! 3. Поверхность walkable (угол < порога) → цель = точка удара (`LandingMethod::Direct`)
//! 4. Steep → поиск вдоль линии подхода в обе стороны:
//!    шаг `±forward*offset`, подъём на `search_height`, trace вниз на `search_depth`;
//!    steep снова → следующий шаг от новой точки (не больше `max_search_steps`);
//!    старт внутри геометрии → база не поднимается, только горизонтальный шаг
//! 5. Из двух кандидатов берём ближайший к точке удара, при равенстве - backward
//!
//! Resolver - чистое значение: без ECS, без логов, без побочных эффектов.

use bevy::prelude::*;

use super::components::DashConfig;
use super::query::WorldQuery;
use super::surface::{Pose, SurfaceHit};

/// Направление поиска вдоль линии подхода
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Forward,
    Backward,
}

impl SearchDirection {
    pub fn sign(self) -> f32 {
        match self {
            SearchDirection::Forward => 1.0,
            SearchDirection::Backward => -1.0,
        }
    }
}

/// Как найдена цель
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingMethod {
    /// Точка удара траектории сама walkable
    Direct,
    /// Найдена forward веткой за `steps` trace'ов
    Forward { steps: u32 },
    /// Найдена backward веткой за `steps` trace'ов
    Backward { steps: u32 },
}

/// Кандидат одной ветки поиска
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub pose: Pose,
    pub steps: u32,
}

/// Результаты обеих веток (каждая заполняется максимум один раз)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchCandidates {
    pub forward: Option<Candidate>,
    pub backward: Option<Candidate>,
}

impl SearchCandidates {
    /// Выбор ближайшего к `impact` кандидата; равенство → backward
    pub fn choose(&self, impact: Vec3) -> Option<(Pose, LandingMethod)> {
        let forward = self
            .forward
            .map(|c| (c.pose, LandingMethod::Forward { steps: c.steps }));
        let backward = self
            .backward
            .map(|c| (c.pose, LandingMethod::Backward { steps: c.steps }));

        match (forward, backward) {
            (Some(forward), Some(backward)) => {
                let forward_distance = forward.0.position.distance(impact);
                let backward_distance = backward.0.position.distance(impact);
                if forward_distance < backward_distance {
                    Some(forward)
                } else {
                    Some(backward)
                }
            }
            (forward, backward) => forward.or(backward),
        }
    }
}

/// Успешный результат resolve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashResolution {
    /// Куда приземляемся
    pub pose: Pose,
    /// Первый удар траектории
    pub impact: SurfaceHit,
    pub method: LandingMethod,
}

/// Resolver цели dash поверх любого `WorldQuery`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashTargetResolver {
    config: DashConfig,
}

impl DashTargetResolver {
    pub fn new(config: DashConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DashConfig {
        &self.config
    }

    /// Найти walkable позу для dash из `origin` в направлении `forward`
    ///
    /// `forward` нормализуется; нулевой вектор → `None`.
    pub fn resolve<Q>(&self, world: &Q, origin: Vec3, forward: Vec3) -> Option<DashResolution>
    where
        Q: WorldQuery + ?Sized,
    {
        let forward = forward.try_normalize()?;
        let impact = world.predict_path(&self.config.path_params(origin, forward))?;

        if impact.is_walkable(self.config.max_surface_angle) {
            return Some(DashResolution {
                pose: Pose::on_surface(&impact),
                impact,
                method: LandingMethod::Direct,
            });
        }

        let (pose, method) = self
            .search_candidates(world, &impact, forward)
            .choose(impact.position)?;

        Some(DashResolution { pose, impact, method })
    }

    /// Обе ветки поиска от steep точки удара
    pub fn search_candidates<Q>(&self, world: &Q, impact: &SurfaceHit, forward: Vec3) -> SearchCandidates
    where
        Q: WorldQuery + ?Sized,
    {
        SearchCandidates {
            forward: self.search(world, impact, forward, SearchDirection::Forward),
            backward: self.search(world, impact, forward, SearchDirection::Backward),
        }
    }

    /// Одна ветка поиска
    ///
    /// Каждый шаг: сдвиг вдоль `forward`, подъём на `search_height`, trace вниз.
    /// Пустой trace обрывает ветку; steep поверхность - продолжает от новой точки.
    /// Trace, начатый внутри геометрии, точкой опоры не считается: база остаётся
    /// на высоте последней реальной поверхности, сдвигается только по горизонтали.
    pub fn search<Q>(
        &self,
        world: &Q,
        impact: &SurfaceHit,
        forward: Vec3,
        direction: SearchDirection,
    ) -> Option<Candidate>
    where
        Q: WorldQuery + ?Sized,
    {
        let step = forward * (self.config.forward_offset * direction.sign());
        let raise = Vec3::Y * self.config.search_height;
        let drop = Vec3::NEG_Y * self.config.search_depth;

        let mut from = impact.position;
        for steps in 1..=self.config.max_search_steps {
            let start = from + step + raise;
            let hit = world.line_trace(start, start + drop)?;

            if hit.is_walkable(self.config.max_surface_angle) {
                return Some(Candidate {
                    pose: Pose::on_surface(&hit),
                    steps,
                });
            }

            from = if hit.is_penetrating() {
                from + step.with_y(0.0)
            } else {
                hit.position
            };
        }

        None
    }
}
