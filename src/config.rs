//! Engine configuration loaded from environment variables.
//!
//! Every setting has a default, so an empty environment yields a working
//! configuration. Values that are present but malformed are errors rather
//! than silently replaced.

use crate::models::FireBreakType;
use crate::services::spatial_validator::CoordinateSystem;
use std::env;

/// 40,000 km²
pub const DEFAULT_MAX_AREA_M2: f64 = 40_000_000_000.0;

/// Longest simulation the form accepts, in hours.
pub const DEFAULT_SIMULATION_TIME_LIMIT_HOURS: u32 = 72;

/// Engine configuration, loaded once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Largest allowed area of interest, in square metres
    pub max_area_m2: f64,
    /// Fire break type preselected for new boundary-condition rows
    pub default_fire_break_type: FireBreakType,
    /// Coordinate system WKT coordinates are range-checked against
    pub coordinate_system: CoordinateSystem,
    /// Upper bound for hours of projection and time offsets
    pub simulation_time_limit_hours: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_area_m2: DEFAULT_MAX_AREA_M2,
            default_fire_break_type: FireBreakType::Canadair,
            coordinate_system: CoordinateSystem::WebMercator,
            simulation_time_limit_hours: DEFAULT_SIMULATION_TIME_LIMIT_HOURS,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `WILDFIRE_MAX_AREA_M2`, `WILDFIRE_DEFAULT_FIRE_BREAK`,
    /// `WILDFIRE_EPSG` and `WILDFIRE_TIME_LIMIT_HOURS`, after loading a
    /// `.env` file if one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        let max_area_m2 = match env::var("WILDFIRE_MAX_AREA_M2") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .ok_or(ConfigError::Invalid("WILDFIRE_MAX_AREA_M2", raw))?,
            Err(_) => defaults.max_area_m2,
        };

        let default_fire_break_type = match env::var("WILDFIRE_DEFAULT_FIRE_BREAK") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("WILDFIRE_DEFAULT_FIRE_BREAK", raw.clone()))?,
            Err(_) => defaults.default_fire_break_type,
        };

        let coordinate_system = match env::var("WILDFIRE_EPSG") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .and_then(CoordinateSystem::from_epsg)
                .ok_or(ConfigError::Invalid("WILDFIRE_EPSG", raw))?,
            Err(_) => defaults.coordinate_system,
        };

        let simulation_time_limit_hours = match env::var("WILDFIRE_TIME_LIMIT_HOURS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or(ConfigError::Invalid("WILDFIRE_TIME_LIMIT_HOURS", raw))?,
            Err(_) => defaults.simulation_time_limit_hours,
        };

        tracing::info!(
            max_area_m2,
            default_fire_break_type = %default_fire_break_type,
            epsg = coordinate_system.epsg(),
            simulation_time_limit_hours,
            "Loaded engine configuration"
        );

        Ok(Self {
            max_area_m2,
            default_fire_break_type,
            coordinate_system,
            simulation_time_limit_hours,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1:?}")]
    Invalid(&'static str, String),
}
