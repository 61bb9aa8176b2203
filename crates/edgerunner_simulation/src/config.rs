//! Конфигурация симуляции (JSON)
//!
//! Все поля опциональны: отсутствующие берутся из `Default` (оригинальный тюнинг, метры).
//!
//! ```json
//! { "dash": { "cooldown_secs": 3.0 }, "locomotion": { "sprint_speed": 12.0 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dash::DashConfig;
use crate::locomotion::LocomotionConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub locomotion: LocomotionConfig,
    pub dash: DashConfig,
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(ConfigError::Invalid {
        field,
        reason: format!("expected finite value > 0, got {}", value),
    })
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        return Ok(());
    }
    Err(ConfigError::Invalid {
        field,
        reason: format!("expected finite value >= 0, got {}", value),
    })
}

fn in_range(field: &'static str, value: f32, max: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 && value <= max {
        return Ok(());
    }
    Err(ConfigError::Invalid {
        field,
        reason: format!("expected value in (0, {}], got {}", max, value),
    })
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Проверка значений (первое нарушение → ошибка)
    pub fn validate(&self) -> Result<(), ConfigError> {
        let locomotion = &self.locomotion;
        positive("locomotion.move_speed", locomotion.move_speed)?;
        positive("locomotion.look_speed", locomotion.look_speed)?;
        positive("locomotion.walk_speed", locomotion.walk_speed)?;
        positive("locomotion.sprint_speed", locomotion.sprint_speed)?;
        positive("locomotion.jump_speed", locomotion.jump_speed)?;
        non_negative("locomotion.eye_height", locomotion.eye_height)?;
        in_range("locomotion.max_pitch", locomotion.max_pitch, 90.0)?;

        let dash = &self.dash;
        positive("dash.launch_speed", dash.launch_speed)?;
        in_range("dash.max_surface_angle", dash.max_surface_angle, 180.0)?;
        positive("dash.forward_offset", dash.forward_offset)?;
        non_negative("dash.search_height", dash.search_height)?;
        positive("dash.search_depth", dash.search_depth)?;
        if dash.max_search_steps == 0 {
            return Err(ConfigError::Invalid {
                field: "dash.max_search_steps",
                reason: "expected at least one step".to_string(),
            });
        }
        non_negative("dash.projectile_radius", dash.projectile_radius)?;
        positive("dash.path_sim_frequency", dash.path_sim_frequency)?;
        positive("dash.path_max_sim_time", dash.path_max_sim_time)?;
        if !dash.gravity.is_finite() {
            return Err(ConfigError::Invalid {
                field: "dash.gravity",
                reason: format!("expected finite value, got {}", dash.gravity),
            });
        }
        positive("dash.dash_speed", dash.dash_speed)?;
        non_negative("dash.cooldown_secs", dash.cooldown_secs)?;
        non_negative("dash.marker_radius", dash.marker_radius)?;

        Ok(())
    }
}
