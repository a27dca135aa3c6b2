//! Evacuation requests as submitted by callers.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::network::NodeId;

/// Mobility needs of the evacuating group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobilityConstraint {
    #[default]
    None,
    Wheelchair,
    Elderly,
    Children,
}

/// How the group travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    #[default]
    Car,
    Bus,
    Walk,
    Emergency,
}

/// A single request to route a group to safety.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvacuationRequest {
    pub origin: Coordinate,
    /// Accepted for forward compatibility; shelter selection does not use it.
    #[serde(default)]
    pub preferred_destinations: Vec<NodeId>,
    #[serde(default)]
    pub mobility: MobilityConstraint,
    #[serde(default)]
    pub vehicle: VehicleType,
    #[serde(default = "default_group_size")]
    pub group_size: u32,
    #[serde(default = "default_true")]
    pub avoid_hazards: bool,
    #[serde(default = "default_true")]
    pub prioritize_safety: bool,
}

impl EvacuationRequest {
    /// Request for a single person by car with hazard avoidance and safety
    /// priority enabled.
    pub fn new(origin: Coordinate) -> Self {
        Self {
            origin,
            preferred_destinations: Vec::new(),
            mobility: MobilityConstraint::None,
            vehicle: VehicleType::Car,
            group_size: default_group_size(),
            avoid_hazards: true,
            prioritize_safety: true,
        }
    }

    pub fn with_group_size(mut self, group_size: u32) -> Self {
        self.group_size = group_size;
        self
    }

    pub fn with_mobility(mut self, mobility: MobilityConstraint) -> Self {
        self.mobility = mobility;
        self
    }

    pub fn with_vehicle(mut self, vehicle: VehicleType) -> Self {
        self.vehicle = vehicle;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.group_size == 0 {
            return Err(Error::InvalidRequest {
                message: "group size must be at least 1".to_string(),
            });
        }
        if !self.origin.is_finite() {
            return Err(Error::InvalidRequest {
                message: format!("origin {} is not a finite coordinate", self.origin),
            });
        }
        Ok(())
    }
}

fn default_group_size() -> u32 {
    1
}

fn default_true() -> bool {
    true
}
