use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::sim::Stage;

/// Largest grid side whose tile indices still fit a [`TileIndex`](crate::sim::TileIndex).
pub const MAX_GRID_SIZE: u32 = u16::MAX as u32;

/// Top-level configuration for a [`Simulation`](crate::sim::Simulation).
///
/// Every field defaults to the values the game ships with, so a config file
/// only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// RNG seed for deterministic placement and scheduling.
    pub seed: u64,
    pub grid: GridConfig,
    /// Build-interval sampling ranges keyed by settlements built so far.
    pub stages: Vec<Stage>,
    pub economy: EconomyConfig,
    pub hud: HudConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            grid: GridConfig::default(),
            stages: Stage::default_table(),
            economy: EconomyConfig::default(),
            hud: HudConfig::default(),
        }
    }
}

/// Logical grid and pixel scale for settlement placement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Cells per side (the grid is `size x size`).
    pub size: u32,
    /// Pixel width of one logical cell.
    pub cell_pixels: f32,
    /// Pixel width of one settlement sub-tile.
    pub sub_tile_pixels: f32,
    /// Horizontal pixel inset of a settlement block within its cell.
    pub column_inset: f32,
    /// Once this many tiles are recorded, placement stops retrying collisions.
    pub saturation_bound: usize,
    /// Render layer of settlement sub-tiles (the base map sits at 0).
    pub settlement_z: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 18,
            cell_pixels: 64.0,
            sub_tile_pixels: 16.0,
            column_inset: 8.0,
            saturation_bound: 300,
            settlement_z: 1,
        }
    }
}

/// Income and expense rates, applied once per accrual period.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomyConfig {
    /// Simulated seconds between accruals.
    pub accrual_period: f32,
    pub starting_balance: i64,
    pub town: i64,
    pub city: i64,
    pub metro: i64,
    /// Per-officer upkeep (negative).
    pub officer: i64,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            accrual_period: 10.0,
            starting_balance: 0,
            town: 100,
            city: 500,
            metro: 1000,
            officer: -20,
        }
    }
}

/// HUD text layout. Offsets are measured up from the bottom edge of the viewport.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HudConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub line_offsets: [f32; 4],
    pub balance_offset: f32,
    pub font_size: f32,
    pub z: i32,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800,
            viewport_height: 600,
            line_offsets: [200.0, 180.0, 160.0, 140.0],
            balance_offset: 40.0,
            font_size: 20.0,
            z: 1001,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = &self.grid;
        if grid.size == 0 || grid.size > MAX_GRID_SIZE {
            return Err(invalid(format!(
                "grid.size must be between 1 and {MAX_GRID_SIZE}, got {}",
                grid.size
            )));
        }
        let cells = (grid.size as usize) * (grid.size as usize);
        if grid.saturation_bound >= cells {
            return Err(invalid(format!(
                "grid.saturation_bound ({}) must be below the cell count ({cells})",
                grid.saturation_bound
            )));
        }
        if !(grid.cell_pixels > 0.0 && grid.sub_tile_pixels > 0.0) {
            return Err(invalid("grid pixel sizes must be positive"));
        }

        validate_stages(&self.stages)?;

        if !(self.economy.accrual_period > 0.0) {
            return Err(invalid("economy.accrual_period must be positive"));
        }
        if self.hud.viewport_height == 0 {
            return Err(invalid("hud.viewport_height must be positive"));
        }
        Ok(())
    }
}

fn validate_stages(stages: &[Stage]) -> Result<(), ConfigError> {
    let Some((last, bounded)) = stages.split_last() else {
        return Err(invalid("stages must not be empty"));
    };
    if last.below.is_some() {
        return Err(invalid("the last stage must be open-ended (no `below`)"));
    }

    let mut previous = None;
    for (i, stage) in stages.iter().enumerate() {
        if !(stage.min > 0.0 && stage.min < stage.max) {
            return Err(invalid(format!(
                "stage {i}: range [{}, {}) must satisfy 0 < min < max",
                stage.min, stage.max
            )));
        }
        if i < bounded.len() {
            let Some(below) = stage.below else {
                return Err(invalid(format!("stage {i}: only the last stage may be open-ended")));
            };
            if previous.is_some_and(|p| below <= p) {
                return Err(invalid(format!("stage {i}: `below` must be strictly increasing")));
            }
            previous = Some(below);
        }
    }
    Ok(())
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SimConfig::from_json_str(r#"{ "seed": 7, "economy": { "town": 150 } }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.economy.town, 150);
        assert_eq!(config.economy.city, 500);
        assert_eq!(config.grid.size, 18);
        assert_eq!(config.stages, Stage::default_table());
    }

    #[test]
    fn unknown_field_rejected() {
        let err = SimConfig::from_json_str(r#"{ "sede": 7 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn oversized_grid_rejected() {
        let mut config = SimConfig::default();
        config.grid.size = MAX_GRID_SIZE;
        config.validate().unwrap();

        config.grid.size = MAX_GRID_SIZE + 1;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    }

    #[test]
    fn saturation_bound_must_fit_grid() {
        let err = SimConfig::from_json_str(r#"{ "grid": { "size": 10 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    }

    #[test]
    fn empty_or_inverted_stage_rejected() {
        let mut config = SimConfig::default();
        config.stages[0].min = 15.0;
        config.stages[0].max = 10.0;
        assert!(config.validate().is_err());

        config.stages[0].min = 0.0;
        config.stages[0].max = 10.0;
        assert!(config.validate().is_err());

        config.stages.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn stage_order_enforced() {
        let config = SimConfig::from_json_str(
            r#"{ "stages": [
                { "below": 5, "min": 1.0, "max": 2.0 },
                { "below": 3, "min": 1.0, "max": 2.0 },
                { "min": 1.0, "max": 2.0 }
            ] }"#,
        );
        assert!(config.is_err());
    }

    #[test]
    fn closed_last_stage_rejected() {
        let config = SimConfig::from_json_str(
            r#"{ "stages": [ { "below": 5, "min": 1.0, "max": 2.0 } ] }"#,
        );
        assert!(config.is_err());
    }

    #[test]
    fn zero_accrual_period_rejected() {
        let mut config = SimConfig::default();
        config.economy.accrual_period = 0.0;
        assert!(config.validate().is_err());
    }
}
