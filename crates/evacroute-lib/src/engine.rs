//! Evacuation engine: the single entry point for route requests.
//!
//! The engine owns the hazard registry and a shared handle to the road
//! network. It is constructed once at startup and passed by reference to
//! whatever serves requests; there is no global instance.
//!
//! A request is handled in one synchronous pass:
//! 1. Snap the origin to the nearest network node
//! 2. Rank shelters with enough spare capacity by straight-line distance
//! 3. Search towards the closest one using a hazard snapshot taken up front
//! 4. Build the route (and optional alternatives to the next shelters)

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::builder::{OptimizedRoute, RouteBuilder};
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::hazard::{HazardRegistry, HazardSnapshot, HazardZone};
use crate::network::{RoadNetwork, RouteNode};
use crate::request::EvacuationRequest;
use crate::routing::{select_planner, SearchContext};

/// Routes evacuation requests over a shared road network.
#[derive(Debug)]
pub struct EvacuationEngine {
    network: Arc<RoadNetwork>,
    hazards: HazardRegistry,
    config: EngineConfig,
}

impl EvacuationEngine {
    pub fn new(network: Arc<RoadNetwork>, config: EngineConfig) -> Self {
        Self {
            network,
            hazards: HazardRegistry::new(),
            config,
        }
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace every hazard zone with `zones`.
    pub fn replace_hazard_zones(&self, zones: Vec<HazardZone>) -> Result<()> {
        self.hazards.replace(zones)
    }

    /// The hazard list new searches will use.
    pub fn hazard_zones(&self) -> HazardSnapshot {
        self.hazards.snapshot()
    }

    /// Shelters able to take the whole group, closest (straight line) first.
    pub fn candidate_shelters(&self, request: &EvacuationRequest) -> Vec<&RouteNode> {
        let mut candidates: Vec<(f64, &RouteNode)> = self
            .network
            .shelters()
            .into_iter()
            .filter(|node| {
                node.spare_capacity()
                    .is_some_and(|spare| spare >= request.group_size)
            })
            .map(|node| (node.position.distance_to(&request.origin), node))
            .collect();
        candidates.sort_by(|(da, a), (db, b)| da.total_cmp(db).then_with(|| a.id.cmp(&b.id)));
        candidates.into_iter().map(|(_, node)| node).collect()
    }

    /// Find the route to the nearest shelter that can take the group.
    pub fn find_optimal_route(&self, request: &EvacuationRequest) -> Result<OptimizedRoute> {
        request.validate()?;
        if !request.preferred_destinations.is_empty() {
            debug!(
                preferred = ?request.preferred_destinations,
                "preferred destinations are not used for shelter selection"
            );
        }

        let start = self
            .network
            .nearest_node(&request.origin)
            .ok_or(Error::NoStartNode)?;

        let candidates = self.candidate_shelters(request);
        let Some(target) = candidates.first() else {
            warn!(
                group_size = request.group_size,
                "no shelter has enough spare capacity"
            );
            return Err(Error::NoCapacityShelter {
                group_size: request.group_size,
            });
        };
        debug!(
            start = %start.id,
            target = %target.id,
            candidates = candidates.len(),
            "selected evacuation target"
        );

        let hazards = self.hazards.snapshot();
        let context = SearchContext {
            network: &self.network,
            hazards: &hazards,
            request,
            limits: self.config.search_limits(),
        };
        let planner = select_planner(self.config.algorithm, self.config.heuristic);
        let builder = RouteBuilder::new(
            &self.network,
            &hazards,
            self.config.speed_kmh(request.vehicle),
        );

        let path = planner
            .find_path(&context, &start.id, &target.id)
            .inspect_err(|error| warn!(%error, "evacuation route search failed"))?;
        let mut route = builder.build(&path, planner.algorithm())?;

        for shelter in candidates.iter().skip(1).take(self.config.max_alternatives) {
            match planner.find_path(&context, &start.id, &shelter.id) {
                Ok(path) => route
                    .alternative_routes
                    .push(builder.build(&path, planner.algorithm())?),
                Err(Error::NoPath { .. }) => {
                    debug!(shelter = %shelter.id, "no alternative route to shelter");
                }
                Err(Error::SearchAborted { expanded }) => {
                    debug!(
                        shelter = %shelter.id,
                        expanded,
                        "alternative search aborted; returning main route"
                    );
                    break;
                }
                Err(error) => return Err(error),
            }
        }

        info!(
            start = %route.start,
            shelter = %route.destination.id,
            distance_m = route.total_distance_m,
            safety = route.safety_score,
            alternatives = route.alternative_routes.len(),
            "evacuation route found"
        );
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::network::{sample_network, NodeKind};

    fn engine() -> EvacuationEngine {
        EvacuationEngine::new(
            Arc::new(sample_network().unwrap()),
            EngineConfig::default(),
        )
    }

    fn near_n1() -> Coordinate {
        Coordinate::new(14.5996, 120.9843)
    }

    #[test]
    fn candidate_shelters_filter_by_capacity_and_sort_by_distance() {
        let engine = engine();
        let request = EvacuationRequest::new(near_n1()).with_group_size(50);
        let ids: Vec<&str> = engine
            .candidate_shelters(&request)
            .iter()
            .map(|node| node.id.as_str())
            .collect();
        assert_eq!(ids, vec!["s1", "s2"]);

        let request = request.with_group_size(200);
        let ids: Vec<&str> = engine
            .candidate_shelters(&request)
            .iter()
            .map(|node| node.id.as_str())
            .collect();
        assert_eq!(ids, vec!["s2"]);
    }

    #[test]
    fn hospitals_are_never_candidates() {
        let engine = engine();
        let request = EvacuationRequest::new(Coordinate::new(14.6020, 120.9900));
        assert!(engine
            .candidate_shelters(&request)
            .iter()
            .all(|node| node.kind == NodeKind::Shelter));
    }

    #[test]
    fn empty_network_has_no_start() {
        let engine = EvacuationEngine::new(Arc::new(RoadNetwork::new()), EngineConfig::default());
        let error = engine
            .find_optimal_route(&EvacuationRequest::new(near_n1()))
            .unwrap_err();
        assert!(matches!(error, Error::NoStartNode));
    }

    #[test]
    fn invalid_request_is_rejected_before_searching() {
        let engine = engine();
        let error = engine
            .find_optimal_route(&EvacuationRequest::new(near_n1()).with_group_size(0))
            .unwrap_err();
        assert!(matches!(error, Error::InvalidRequest { .. }));
    }

    #[test]
    fn alternatives_cover_further_shelters() {
        let config = EngineConfig {
            max_alternatives: 3,
            ..EngineConfig::default()
        };
        let engine = EvacuationEngine::new(Arc::new(sample_network().unwrap()), config);
        let route = engine
            .find_optimal_route(&EvacuationRequest::new(near_n1()).with_group_size(50))
            .unwrap();

        assert_eq!(route.destination.id, "s1");
        assert_eq!(route.alternative_routes.len(), 1);
        assert_eq!(route.alternative_routes[0].destination.id, "s2");
        assert!(route.alternative_routes[0].alternative_routes.is_empty());
    }

    #[test]
    fn aborted_alternative_keeps_main_route() {
        let config = EngineConfig {
            max_expansions: Some(4),
            max_alternatives: 1,
            ..EngineConfig::default()
        };
        let engine = EvacuationEngine::new(Arc::new(sample_network().unwrap()), config);
        let route = engine
            .find_optimal_route(&EvacuationRequest::new(near_n1()).with_group_size(50))
            .unwrap();

        assert_eq!(route.path, vec!["n1", "n2", "n3", "s1"]);
        assert!(route.alternative_routes.is_empty());
    }
}
