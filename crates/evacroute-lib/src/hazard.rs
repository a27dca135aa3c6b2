//! Hazard zone registry.
//!
//! The registry holds exactly one list of circular hazard zones. Updates from
//! the hazard-detection side always carry the complete picture: [`HazardRegistry::replace`]
//! swaps the whole list, there is no merge and no versioning.
//!
//! Readers take a [`HazardSnapshot`] (a cheap `Arc` clone) and keep using it
//! for the duration of one search, so a replacement that lands mid-search is
//! only observed by the next search.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::geo::Coordinate;

/// How dangerous a hazard zone is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardSeverity {
    Low,
    Moderate,
    High,
    Critical,
}

impl HazardSeverity {
    pub fn label(self) -> &'static str {
        match self {
            HazardSeverity::Low => "low",
            HazardSeverity::Moderate => "moderate",
            HazardSeverity::High => "high",
            HazardSeverity::Critical => "critical",
        }
    }
}

impl fmt::Display for HazardSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A circular area affected by a disaster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardZone {
    pub id: String,
    pub center: Coordinate,
    pub radius_m: f64,
    pub severity: HazardSeverity,
    /// Free-form hazard type, e.g. `flood`, `fire`, `landslide`.
    pub hazard_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread_rate_m_per_h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
}

impl HazardZone {
    /// Whether `point` lies within the zone (boundary inclusive).
    pub fn contains(&self, point: &Coordinate) -> bool {
        self.center.distance_to(point) <= self.radius_m
    }

    fn validate(&self) -> Result<()> {
        if !self.radius_m.is_finite() || self.radius_m < 0.0 {
            return Err(Error::InvalidHazard {
                id: self.id.clone(),
                message: format!("radius must be finite and >= 0, got {}", self.radius_m),
            });
        }
        if !self.center.is_finite() {
            return Err(Error::InvalidHazard {
                id: self.id.clone(),
                message: "center must be a finite coordinate".to_string(),
            });
        }
        Ok(())
    }
}

/// Immutable view of the hazard list at one point in time.
#[derive(Debug, Clone, Default)]
pub struct HazardSnapshot {
    zones: Arc<Vec<HazardZone>>,
}

impl HazardSnapshot {
    pub fn new(zones: Vec<HazardZone>) -> Self {
        Self {
            zones: Arc::new(zones),
        }
    }

    /// First zone, in list order, covering `point`.
    ///
    /// This is a first-match lookup: with overlapping zones the earlier entry
    /// wins regardless of severity.
    pub fn containing(&self, point: &Coordinate) -> Option<&HazardZone> {
        self.zones.iter().find(|zone| zone.contains(point))
    }

    pub fn zones(&self) -> &[HazardZone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Shared registry of the current hazard zones.
#[derive(Debug, Default)]
pub struct HazardRegistry {
    current: RwLock<HazardSnapshot>,
}

impl HazardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire hazard list.
    ///
    /// All zones are validated first; on error the previous list stays in place.
    pub fn replace(&self, zones: Vec<HazardZone>) -> Result<()> {
        for zone in &zones {
            zone.validate()?;
        }
        let count = zones.len();
        let snapshot = HazardSnapshot::new(zones);
        *self.current.write() = snapshot;
        info!(zones = count, "hazard zones replaced");
        Ok(())
    }

    /// Current hazard list.
    pub fn snapshot(&self) -> HazardSnapshot {
        self.current.read().clone()
    }

    /// First zone covering `point` in the current list.
    pub fn containing(&self, point: &Coordinate) -> Option<HazardZone> {
        self.snapshot().containing(point).cloned()
    }
}

/// Load a hazard list (a JSON array of zones) from a file.
pub fn load_hazards(path: &Path) -> Result<Vec<HazardZone>> {
    let contents = fs::read_to_string(path)?;
    let zones: Vec<HazardZone> = serde_json::from_str(&contents)?;
    Ok(zones)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(id: &str, lat: f64, lon: f64, radius_m: f64, severity: HazardSeverity) -> HazardZone {
        HazardZone {
            id: id.to_string(),
            center: Coordinate::new(lat, lon),
            radius_m,
            severity,
            hazard_type: "flood".to_string(),
            spread_rate_m_per_h: None,
            duration_hours: None,
        }
    }

    #[test]
    fn containing_returns_first_match_not_most_severe() {
        let registry = HazardRegistry::new();
        registry
            .replace(vec![
                zone("a", 0.0, 0.0, 500.0, HazardSeverity::Low),
                zone("b", 0.0, 0.0, 500.0, HazardSeverity::Critical),
            ])
            .unwrap();

        let hit = registry.containing(&Coordinate::new(0.0, 0.001)).unwrap();
        assert_eq!(hit.id, "a");
    }

    #[test]
    fn containing_misses_outside_radius() {
        let registry = HazardRegistry::new();
        registry
            .replace(vec![zone("a", 0.0, 0.0, 100.0, HazardSeverity::High)])
            .unwrap();
        assert!(registry.containing(&Coordinate::new(0.0, 0.01)).is_none());
    }

    #[test]
    fn replace_swaps_whole_list() {
        let registry = HazardRegistry::new();
        registry
            .replace(vec![
                zone("a", 0.0, 0.0, 100.0, HazardSeverity::High),
                zone("b", 1.0, 1.0, 100.0, HazardSeverity::High),
            ])
            .unwrap();
        registry
            .replace(vec![zone("c", 2.0, 2.0, 100.0, HazardSeverity::Low)])
            .unwrap();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.zones()[0].id, "c");
    }

    #[test]
    fn snapshot_is_unaffected_by_later_replace() {
        let registry = HazardRegistry::new();
        registry
            .replace(vec![zone("a", 0.0, 0.0, 100.0, HazardSeverity::High)])
            .unwrap();
        let before = registry.snapshot();
        registry.replace(Vec::new()).unwrap();

        assert_eq!(before.len(), 1);
        assert!(registry.snapshot().is_empty());
    }

    #[test]
    fn invalid_zone_keeps_previous_list() {
        let registry = HazardRegistry::new();
        registry
            .replace(vec![zone("a", 0.0, 0.0, 100.0, HazardSeverity::High)])
            .unwrap();
        let error = registry
            .replace(vec![zone("bad", 0.0, 0.0, -5.0, HazardSeverity::Low)])
            .unwrap_err();

        assert!(matches!(error, Error::InvalidHazard { id, .. } if id == "bad"));
        assert_eq!(registry.snapshot().zones()[0].id, "a");
    }

    #[test]
    fn deserializes_zone_without_optional_fields() {
        let json = r#"[{"id": "z", "center": {"lat": 1.0, "lon": 2.0}, "radius_m": 50.0,
                        "severity": "moderate", "hazard_type": "fire"}]"#;
        let zones: Vec<HazardZone> = serde_json::from_str(json).unwrap();
        assert_eq!(zones[0].severity, HazardSeverity::Moderate);
        assert!(zones[0].spread_rate_m_per_h.is_none());
    }
}
