//! Configuration System
//!
//! Loads tuning parameters from tuning.toml so action timings, damage and AI
//! weights can be adjusted without recompiling. Every section is optional and
//! falls back to the compiled-in defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::grid::{AcceptanceRule, HexLayout};

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "tuning.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub grid: GridConfig,
    pub economy: EconomyConfig,
    pub movement: MovementConfig,
    pub ranged: RangedConfig,
    pub melee: MeleeConfig,
    pub area: AreaConfig,
    pub sight: SightConfig,
    pub pathfinding: PathfindingConfig,
    pub ai: AiConfig,
}

/// World layout of the grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub cell_size: f32,
    pub floor_height: f32,
}

/// Per-turn point maxima
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub action_points: u32,
    pub move_points: u32,
}

/// Move action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub range: i32,
    pub speed: f32,
    pub stop_distance: f32,
    pub teleport_pause: f32,
}

/// Ranged attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangedConfig {
    pub range: i32,
    pub damage: i32,
    pub point_cost: u32,
    pub aim_time: f32,
    pub fire_time: f32,
    pub cooldown_time: f32,
}

/// Melee attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeleeConfig {
    pub range: i32,
    pub damage: i32,
    pub point_cost: u32,
    pub wind_up_time: f32,
    pub recovery_time: f32,
}

/// Area attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaConfig {
    pub range: i32,
    pub damage: i32,
    pub point_cost: u32,
    pub projectile_speed: f32,
    pub reach_distance: f32,
    /// World-space radius around the detonation point, inclusive.
    pub blast_radius: f32,
}

/// Line-of-sight sampling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SightConfig {
    pub shoulder_height: f32,
    pub obstacle_height: f32,
    pub sample_step: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfindingConfig {
    pub acceptance: AcceptanceRule,
}

/// Opponent decision timing and scoring weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub initial_delay: f32,
    pub chain_delay: f32,
    pub move_target_weight: i32,
    pub ranged_base_score: i32,
    pub ranged_wounded_bonus: f32,
    pub melee_score: i32,
    pub area_score: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            floor_height: 3.0,
        }
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            action_points: 2,
            move_points: 4,
        }
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            range: 4,
            speed: 4.0,
            stop_distance: 0.1,
            teleport_pause: 0.5,
        }
    }
}

impl Default for RangedConfig {
    fn default() -> Self {
        Self {
            range: 8,
            damage: 40,
            point_cost: 1,
            aim_time: 1.0,
            fire_time: 0.1,
            cooldown_time: 0.5,
        }
    }
}

impl Default for MeleeConfig {
    fn default() -> Self {
        Self {
            range: 1,
            damage: 100,
            point_cost: 1,
            wind_up_time: 0.7,
            recovery_time: 0.5,
        }
    }
}

impl Default for AreaConfig {
    fn default() -> Self {
        Self {
            range: 6,
            damage: 30,
            point_cost: 1,
            projectile_speed: 15.0,
            reach_distance: 0.2,
            blast_radius: 1.0,
        }
    }
}

impl Default for SightConfig {
    fn default() -> Self {
        Self {
            shoulder_height: 1.7,
            obstacle_height: 2.0,
            sample_step: 0.1,
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            initial_delay: 2.0,
            chain_delay: 0.5,
            move_target_weight: 10,
            ranged_base_score: 100,
            ranged_wounded_bonus: 100.0,
            melee_score: 200,
            area_score: 0,
        }
    }
}

impl GridConfig {
    pub fn layout(&self) -> HexLayout {
        HexLayout::new(self.cell_size, self.floor_height)
    }
}

impl Tuning {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let tuning: Tuning = toml::from_str(&content)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load configuration from `path`, or use defaults if it cannot be read
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Could not load {}: {}. Using defaults.", path.display(), e);
            Self::default()
        })
    }

    /// Rejects values that would stall or break the tick loop.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("grid.cell_size", self.grid.cell_size),
            ("grid.floor_height", self.grid.floor_height),
            ("movement.speed", self.movement.speed),
            ("movement.stop_distance", self.movement.stop_distance),
            ("area.projectile_speed", self.area.projectile_speed),
            ("area.reach_distance", self.area.reach_distance),
            ("sight.sample_step", self.sight.sample_step),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {}", value),
                });
            }
        }
        if self.area.blast_radius < 0.0 {
            return Err(ConfigError::Invalid {
                field: "area.blast_radius",
                reason: "must not be negative".into(),
            });
        }
        Ok(())
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let tuning = Tuning::default();
        assert_eq!(tuning.economy.action_points, 2);
        assert_eq!(tuning.economy.move_points, 4);
        assert_eq!(tuning.ranged.damage, 40);
        assert_eq!(tuning.melee.damage, 100);
        assert_eq!(tuning.pathfinding.acceptance, AcceptanceRule::AccumulatedCost);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ranged]\ndamage = 55\n\n[pathfinding]\nacceptance = \"combined_cost\"").unwrap();

        let tuning = Tuning::load(file.path()).unwrap();
        assert_eq!(tuning.ranged.damage, 55);
        assert_eq!(tuning.ranged.range, 8);
        assert_eq!(tuning.melee, MeleeConfig::default());
        assert_eq!(tuning.pathfinding.acceptance, AcceptanceRule::CombinedCost);
    }

    #[test]
    fn test_invalid_value_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[movement]\nspeed = 0.0").unwrap();
        assert!(matches!(
            Tuning::load(file.path()),
            Err(ConfigError::Invalid { field: "movement.speed", .. })
        ));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = Tuning::load_or_default("does/not/exist.toml");
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ranged\ndamage = ").unwrap();
        assert!(matches!(Tuning::load(file.path()), Err(ConfigError::Parse(_))));
    }
}
