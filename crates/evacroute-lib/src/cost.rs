//! Edge traversal cost model.
//!
//! The cost of an edge starts at its length in metres and is scaled by a fixed
//! sequence of multiplicative factors:
//!
//! | # | Factor                | Applies when                               | Multiplier                 |
//! |---|-----------------------|--------------------------------------------|----------------------------|
//! | 1 | traffic               | always                                     | `1 + traffic * 2`          |
//! | 2 | road condition        | always                                     | see [`condition_factor`]   |
//! | 3 | hazard zone           | `avoid_hazards`, midpoint inside a zone    | see [`severity_factor`]    |
//! | 4 | flood escape uphill   | flooded and destination is higher          | `0.8`                      |
//! | 5 | accessibility         | mobility constraint present                | pedestrian `0.8`, inaccessible destination `10` |
//! | 6 | evacuation route      | designated evacuation road                 | `0.7`                      |
//! | 7 | safety preference     | `prioritize_safety`                        | `1 + traffic * 0.5`        |
//!
//! The order is part of the contract: reference outputs are computed by
//! applying the factors in exactly this sequence.

use crate::hazard::{HazardSeverity, HazardSnapshot};
use crate::network::{RoadCategory, RoadCondition, RouteEdge, RouteNode};
use crate::request::{EvacuationRequest, MobilityConstraint};

/// Floor applied to every edge cost so zero-length edges still cost something.
pub const MIN_EDGE_COST: f64 = 1e-3;

const FLOOD_UPHILL_FACTOR: f64 = 0.8;
const PEDESTRIAN_FACTOR: f64 = 0.8;
const INACCESSIBLE_FACTOR: f64 = 10.0;
const EVACUATION_ROUTE_FACTOR: f64 = 0.7;

/// Multiplier for a road condition.
pub fn condition_factor(condition: RoadCondition) -> f64 {
    match condition {
        RoadCondition::Clear => 1.0,
        RoadCondition::Congested => 1.5,
        RoadCondition::Blocked => 100.0,
        RoadCondition::Flooded => 50.0,
        RoadCondition::Damaged => 10.0,
    }
}

/// Multiplier for crossing a hazard zone of the given severity.
pub fn severity_factor(severity: HazardSeverity) -> f64 {
    match severity {
        HazardSeverity::Low => 2.0,
        HazardSeverity::Moderate => 5.0,
        HazardSeverity::High => 20.0,
        HazardSeverity::Critical => 100.0,
    }
}

/// Computes traversal costs against one hazard snapshot.
#[derive(Debug, Clone, Copy)]
pub struct CostModel<'a> {
    hazards: &'a HazardSnapshot,
}

impl<'a> CostModel<'a> {
    pub fn new(hazards: &'a HazardSnapshot) -> Self {
        Self { hazards }
    }

    /// Cost of traversing `edge` from `from` to `to` for `request`.
    ///
    /// Always finite and strictly positive for valid edges.
    pub fn edge_cost(
        &self,
        edge: &RouteEdge,
        from: &RouteNode,
        to: &RouteNode,
        request: &EvacuationRequest,
    ) -> f64 {
        let traffic = edge.traffic_level;
        let mut cost = edge.distance_m;

        cost *= 1.0 + traffic * 2.0;
        cost *= condition_factor(edge.condition);

        if request.avoid_hazards {
            let midpoint = from.position.midpoint(&to.position);
            if let Some(zone) = self.hazards.containing(&midpoint) {
                cost *= severity_factor(zone.severity);
            }
        }

        if edge.condition == RoadCondition::Flooded && to.elevation_m > from.elevation_m {
            cost *= FLOOD_UPHILL_FACTOR;
        }

        if request.mobility != MobilityConstraint::None {
            if edge.category == RoadCategory::Pedestrian {
                cost *= PEDESTRIAN_FACTOR;
            }
            if !to.accessible {
                cost *= INACCESSIBLE_FACTOR;
            }
        }

        if edge.evacuation_route {
            cost *= EVACUATION_ROUTE_FACTOR;
        }

        if request.prioritize_safety {
            cost *= 1.0 + traffic * 0.5;
        }

        cost.max(MIN_EDGE_COST)
    }

    /// Smallest compound multiplier any edge can receive for `request`.
    ///
    /// The flood-uphill discount only ever applies on top of the flooded
    /// penalty, so the discounts that can push cost below distance are the
    /// evacuation-route factor and, with a mobility constraint, the
    /// pedestrian factor.
    pub fn min_multiplier(request: &EvacuationRequest) -> f64 {
        if request.mobility == MobilityConstraint::None {
            EVACUATION_ROUTE_FACTOR
        } else {
            EVACUATION_ROUTE_FACTOR * PEDESTRIAN_FACTOR
        }
    }
}
