//! Engine configuration loaded from JSON.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::request::VehicleType;
use crate::routing::{HeuristicMode, RouteAlgorithm, SearchLimits};

/// Tunables for the evacuation engine.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub algorithm: RouteAlgorithm,
    pub heuristic: HeuristicMode,
    pub walking_speed_kmh: f64,
    pub driving_speed_kmh: f64,
    pub emergency_speed_kmh: f64,
    /// Abort a search after this many node expansions.
    pub max_expansions: Option<usize>,
    /// Abort a search after this many milliseconds.
    pub timeout_ms: Option<u64>,
    /// Number of routes to further shelters to attach as alternatives.
    pub max_alternatives: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            algorithm: RouteAlgorithm::AStar,
            heuristic: HeuristicMode::Admissible,
            walking_speed_kmh: 5.0,
            driving_speed_kmh: 30.0,
            emergency_speed_kmh: 60.0,
            max_expansions: None,
            timeout_ms: None,
            max_alternatives: 0,
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Travel speed used for time estimates.
    ///
    /// Buses travel at the regular driving speed.
    pub fn speed_kmh(&self, vehicle: VehicleType) -> f64 {
        match vehicle {
            VehicleType::Walk => self.walking_speed_kmh,
            VehicleType::Emergency => self.emergency_speed_kmh,
            VehicleType::Car | VehicleType::Bus => self.driving_speed_kmh,
        }
    }

    /// Fresh limits for a search starting now.
    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits::new(
            self.max_expansions,
            self.timeout_ms.map(Duration::from_millis),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"algorithm": "dijkstra", "max_alternatives": 2}"#).unwrap();
        assert_eq!(config.algorithm, RouteAlgorithm::Dijkstra);
        assert_eq!(config.max_alternatives, 2);
        assert_eq!(config.heuristic, HeuristicMode::Admissible);
        assert_eq!(config.walking_speed_kmh, 5.0);
    }

    #[test]
    fn speeds_per_vehicle() {
        let config = EngineConfig::default();
        assert_eq!(config.speed_kmh(VehicleType::Walk), 5.0);
        assert_eq!(config.speed_kmh(VehicleType::Emergency), 60.0);
        assert_eq!(config.speed_kmh(VehicleType::Car), 30.0);
        assert_eq!(config.speed_kmh(VehicleType::Bus), 30.0);
    }

    #[test]
    fn heuristic_mode_names() {
        let config: EngineConfig = serde_json::from_str(r#"{"heuristic": "raw"}"#).unwrap();
        assert_eq!(config.heuristic, HeuristicMode::Raw);
        let config: EngineConfig = serde_json::from_str(r#"{"algorithm": "a-star"}"#).unwrap();
        assert_eq!(config.algorithm, RouteAlgorithm::AStar);
    }
}
