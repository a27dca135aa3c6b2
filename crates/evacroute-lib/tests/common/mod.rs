//! Common test utilities and fixture helpers.

use std::path::PathBuf;
use std::sync::Arc;

use evacroute_lib::{
    sample_network, Coordinate, EngineConfig, EvacuationEngine, EvacuationRequest, HazardSeverity,
    HazardZone, RoadNetwork,
};

/// Path to the checked-in data directory.
#[allow(dead_code)]
pub fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

/// A point a few metres from intersection `n1` of the sample network.
#[allow(dead_code)]
pub fn near_n1() -> Coordinate {
    Coordinate::new(14.5996, 120.9843)
}

/// Request from next to `n1` with default preferences.
#[allow(dead_code)]
pub fn request_for(group_size: u32) -> EvacuationRequest {
    EvacuationRequest::new(near_n1()).with_group_size(group_size)
}

/// Engine over the sample network with default configuration.
#[allow(dead_code)]
pub fn sample_engine() -> EvacuationEngine {
    engine_for(sample_network().expect("sample network loads"))
}

#[allow(dead_code)]
pub fn engine_for(network: RoadNetwork) -> EvacuationEngine {
    EvacuationEngine::new(Arc::new(network), EngineConfig::default())
}

/// Flood zone centred on the midpoint of road `n2`-`n3`.
#[allow(dead_code)]
pub fn flood_on_n2_n3(severity: HazardSeverity) -> HazardZone {
    HazardZone {
        id: "flood-n2-n3".to_string(),
        center: Coordinate::new(14.6065, 120.9900),
        radius_m: 350.0,
        severity,
        hazard_type: "flood".to_string(),
        spread_rate_m_per_h: Some(120.0),
        duration_hours: None,
    }
}

#[allow(dead_code)]
pub fn path_of(route: &evacroute_lib::OptimizedRoute) -> Vec<&str> {
    route.path.iter().map(String::as_str).collect()
}
