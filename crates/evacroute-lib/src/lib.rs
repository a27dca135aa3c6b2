//! Evacuation route planning library entry points.
//!
//! This crate exposes the road-network model, the hazard registry, the edge
//! cost model and the A* planner that together route an evacuee from their
//! location to the nearest shelter with spare capacity. Higher-level consumers
//! (the CLI, dashboards) should only depend on the items exported here instead
//! of reimplementing behavior.
//!

#![deny(warnings)]

pub mod builder;
pub mod config;
pub mod cost;
pub mod engine;
pub mod error;
pub mod geo;
pub mod hazard;
pub mod network;
pub mod output;
pub mod request;
pub mod routing;

pub use builder::{InstructionKind, OptimizedRoute, RouteBuilder, RouteInstruction};
pub use config::EngineConfig;
pub use cost::CostModel;
pub use engine::EvacuationEngine;
pub use error::{Error, Result};
pub use geo::{bearing_delta, haversine_distance, initial_bearing, Coordinate};
pub use hazard::{load_hazards, HazardRegistry, HazardSeverity, HazardSnapshot, HazardZone};
pub use network::{
    load_network, sample_network, NetworkSnapshot, NodeId, NodeKind, RoadCategory, RoadCondition,
    RoadNetwork, RouteEdge, RouteNode,
};
pub use output::{render_route, RouteRenderMode};
pub use request::{EvacuationRequest, MobilityConstraint, VehicleType};
pub use routing::{
    find_path, select_planner, HeuristicMode, RouteAlgorithm, RoutePlanner, SearchContext,
    SearchLimits, SearchPath,
};
