//! Turn a searched path into the route handed back to callers.
//!
//! Metrics are derived from the traversed edges only:
//!
//! - hazard exposure: +30 per flooded and +20 per damaged segment, capped at 100
//! - congestion: mean traffic level of the segments, as a percentage
//! - safety: `100 - hazard exposure - congestion * 0.3`, floored at 0
//! - time: total distance at the vehicle's travel speed
//!
//! Maneuvers are classified from the change in bearing between consecutive
//! segments, so identical paths always produce identical instructions.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::geo::{bearing_delta, compass_label, Coordinate};
use crate::hazard::HazardSnapshot;
use crate::network::{NodeId, RoadCategory, RoadCondition, RoadNetwork, RouteEdge, RouteNode};
use crate::routing::{RouteAlgorithm, SearchPath};

/// Heading changes below this many degrees are reported as "continue".
const CONTINUE_THRESHOLD_DEG: f64 = 30.0;
/// Heading changes at or above this many degrees are sharp turns.
const SHARP_TURN_THRESHOLD_DEG: f64 = 135.0;

const FLOODED_EXPOSURE: f64 = 30.0;
const DAMAGED_EXPOSURE: f64 = 20.0;
const MAX_SCORE: f64 = 100.0;

/// Kind of a turn-by-turn instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionKind {
    Start,
    Continue,
    TurnLeft,
    TurnRight,
    SharpTurn,
    Merge,
    Exit,
    Arrive,
    Warning,
}

/// One turn-by-turn instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteInstruction {
    pub kind: InstructionKind,
    pub text: String,
    /// Metres until the next instruction.
    pub distance_m: f64,
    /// Minutes until the next instruction.
    pub duration_minutes: f64,
    pub coordinate: Coordinate,
}

/// Route returned to callers of the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizedRoute {
    pub algorithm: RouteAlgorithm,
    pub start: NodeId,
    pub path: Vec<NodeId>,
    pub waypoints: Vec<Coordinate>,
    pub total_distance_m: f64,
    pub estimated_time_minutes: f64,
    pub safety_score: f64,
    pub congestion_level: f64,
    pub hazard_exposure: f64,
    /// Cost-model cost of the path, useful for comparing alternatives.
    pub search_cost: f64,
    pub destination: RouteNode,
    pub instructions: Vec<RouteInstruction>,
    pub risk_factors: Vec<String>,
    pub alternative_routes: Vec<OptimizedRoute>,
    pub generated_at: DateTime<Utc>,
}

impl OptimizedRoute {
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Builds [`OptimizedRoute`]s against one network and hazard snapshot.
#[derive(Debug, Clone, Copy)]
pub struct RouteBuilder<'a> {
    network: &'a RoadNetwork,
    hazards: &'a HazardSnapshot,
    speed_kmh: f64,
}

impl<'a> RouteBuilder<'a> {
    pub fn new(network: &'a RoadNetwork, hazards: &'a HazardSnapshot, speed_kmh: f64) -> Self {
        Self {
            network,
            hazards,
            speed_kmh,
        }
    }

    pub fn build(&self, path: &SearchPath, algorithm: RouteAlgorithm) -> Result<OptimizedRoute> {
        let nodes = path
            .nodes
            .iter()
            .map(|id| {
                self.network.node(id).ok_or_else(|| Error::UnknownNode {
                    id: id.clone(),
                    suggestions: Vec::new(),
                })
            })
            .collect::<Result<Vec<&RouteNode>>>()?;
        let (Some(start), Some(destination)) = (nodes.first(), nodes.last()) else {
            return Err(Error::InvalidRequest {
                message: "cannot build a route from an empty path".to_string(),
            });
        };
        if path.edges.len() + 1 != nodes.len() {
            return Err(Error::InvalidRequest {
                message: format!(
                    "path has {} nodes but {} edges",
                    nodes.len(),
                    path.edges.len()
                ),
            });
        }

        let total_distance_m: f64 = path.edges.iter().map(|edge| edge.distance_m).sum();
        let hazard_exposure = hazard_exposure(&path.edges);
        let congestion_level = congestion_level(&path.edges);
        let safety_score = (MAX_SCORE - hazard_exposure - congestion_level * 0.3).clamp(0.0, MAX_SCORE);

        Ok(OptimizedRoute {
            algorithm,
            start: start.id.clone(),
            path: path.nodes.clone(),
            waypoints: nodes.iter().map(|node| node.position).collect(),
            total_distance_m,
            estimated_time_minutes: self.minutes_for(total_distance_m),
            safety_score,
            congestion_level,
            hazard_exposure,
            search_cost: path.cost,
            destination: (*destination).clone(),
            instructions: self.instructions(&nodes, &path.edges),
            risk_factors: self.risk_factors(&nodes, &path.edges),
            alternative_routes: Vec::new(),
            generated_at: Utc::now(),
        })
    }

    fn minutes_for(&self, distance_m: f64) -> f64 {
        if self.speed_kmh <= 0.0 {
            return 0.0;
        }
        (distance_m / 1000.0) / self.speed_kmh * 60.0
    }

    fn instructions(&self, nodes: &[&RouteNode], edges: &[RouteEdge]) -> Vec<RouteInstruction> {
        let mut instructions = Vec::with_capacity(edges.len() * 2 + 2);
        let start = nodes[0];
        instructions.push(RouteInstruction {
            kind: InstructionKind::Start,
            text: format!("Start at {} {}", start.kind, start.id),
            distance_m: 0.0,
            duration_minutes: 0.0,
            coordinate: start.position,
        });

        let mut previous: Option<(&RouteEdge, f64)> = None;
        for (index, edge) in edges.iter().enumerate() {
            let from = nodes[index];
            let to = nodes[index + 1];
            let bearing = from.position.bearing_to(&to.position);

            if edge.condition != RoadCondition::Clear {
                instructions.push(RouteInstruction {
                    kind: InstructionKind::Warning,
                    text: warning_text(edge),
                    distance_m: 0.0,
                    duration_minutes: 0.0,
                    coordinate: from.position,
                });
            }

            let (kind, text) = maneuver(previous, edge, bearing);
            instructions.push(RouteInstruction {
                kind,
                text,
                distance_m: edge.distance_m,
                duration_minutes: self.minutes_for(edge.distance_m),
                coordinate: from.position,
            });
            previous = Some((edge, bearing));
        }

        let destination = nodes[nodes.len() - 1];
        instructions.push(RouteInstruction {
            kind: InstructionKind::Arrive,
            text: format!("Arrive at {} {}", destination.kind, destination.id),
            distance_m: 0.0,
            duration_minutes: 0.0,
            coordinate: destination.position,
        });
        instructions
    }

    fn risk_factors(&self, nodes: &[&RouteNode], edges: &[RouteEdge]) -> Vec<String> {
        let mut factors = Vec::new();
        let mut seen_zones = HashSet::new();

        for (index, edge) in edges.iter().enumerate() {
            let segment = match edge.condition {
                RoadCondition::Flooded => Some("Flooded"),
                RoadCondition::Damaged => Some("Damaged"),
                RoadCondition::Blocked => Some("Blocked"),
                RoadCondition::Clear | RoadCondition::Congested => None,
            };
            if let Some(label) = segment {
                factors.push(format!(
                    "{label} road segment between {} and {}",
                    edge.from, edge.to
                ));
            }

            let midpoint = nodes[index].position.midpoint(&nodes[index + 1].position);
            if let Some(zone) = self.hazards.containing(&midpoint) {
                if seen_zones.insert(zone.id.clone()) {
                    factors.push(format!(
                        "Passes through {} {} zone {}",
                        zone.severity, zone.hazard_type, zone.id
                    ));
                }
            }
        }
        factors
    }
}

fn hazard_exposure(edges: &[RouteEdge]) -> f64 {
    let exposure: f64 = edges
        .iter()
        .map(|edge| match edge.condition {
            RoadCondition::Flooded => FLOODED_EXPOSURE,
            RoadCondition::Damaged => DAMAGED_EXPOSURE,
            _ => 0.0,
        })
        .sum();
    exposure.clamp(0.0, MAX_SCORE)
}

fn congestion_level(edges: &[RouteEdge]) -> f64 {
    if edges.is_empty() {
        return 0.0;
    }
    let total: f64 = edges.iter().map(|edge| edge.traffic_level).sum();
    (total / edges.len() as f64 * 100.0).clamp(0.0, MAX_SCORE)
}

fn maneuver(
    previous: Option<(&RouteEdge, f64)>,
    edge: &RouteEdge,
    bearing: f64,
) -> (InstructionKind, String) {
    let road = edge.category.label();
    let distance = format_distance(edge.distance_m);

    let Some((previous_edge, previous_bearing)) = previous else {
        return (
            InstructionKind::Continue,
            format!("Head {} on {road} for {distance}", compass_label(bearing)),
        );
    };

    let entering_highway = edge.category == RoadCategory::Highway;
    let leaving_highway = previous_edge.category == RoadCategory::Highway;
    if entering_highway && !leaving_highway {
        return (
            InstructionKind::Merge,
            format!("Merge onto {road} for {distance}"),
        );
    }
    if leaving_highway && !entering_highway {
        return (
            InstructionKind::Exit,
            format!("Exit onto {road} for {distance}"),
        );
    }

    let delta = bearing_delta(previous_bearing, bearing);
    let side = if delta > 0.0 { "right" } else { "left" };
    if delta.abs() < CONTINUE_THRESHOLD_DEG {
        (
            InstructionKind::Continue,
            format!("Continue on {road} for {distance}"),
        )
    } else if delta.abs() < SHARP_TURN_THRESHOLD_DEG {
        let kind = if delta > 0.0 {
            InstructionKind::TurnRight
        } else {
            InstructionKind::TurnLeft
        };
        (kind, format!("Turn {side} onto {road} for {distance}"))
    } else {
        (
            InstructionKind::SharpTurn,
            format!("Make a sharp {side} onto {road} for {distance}"),
        )
    }
}

fn warning_text(edge: &RouteEdge) -> String {
    let road = edge.category.label();
    match edge.condition {
        RoadCondition::Congested => format!("Heavy traffic on the {road} ahead"),
        RoadCondition::Blocked => format!(
            "The {road} from {} to {} is reported blocked",
            edge.from, edge.to
        ),
        RoadCondition::Flooded => format!(
            "Flooding on the {road} between {} and {}; drive slowly and avoid deep water",
            edge.from, edge.to
        ),
        RoadCondition::Damaged => format!(
            "Damaged {road} between {} and {}; watch for debris",
            edge.from, edge.to
        ),
        RoadCondition::Clear => format!("Caution on the {road} ahead"),
    }
}

fn format_distance(distance_m: f64) -> String {
    if distance_m < 1000.0 {
        format!("{distance_m:.0} m")
    } else {
        format!("{:.1} km", distance_m / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NodeKind;

    fn node(id: &str, lat: f64, lon: f64, kind: NodeKind) -> RouteNode {
        RouteNode {
            id: id.to_string(),
            position: Coordinate::new(lat, lon),
            kind,
            capacity: None,
            occupancy: None,
            accessible: true,
            elevation_m: 0.0,
        }
    }

    fn edge(from: &str, to: &str, category: RoadCategory, condition: RoadCondition) -> RouteEdge {
        RouteEdge {
            from: from.to_string(),
            to: to.to_string(),
            distance_m: 1500.0,
            category,
            condition,
            traffic_level: 0.4,
            max_capacity: 500,
            evacuation_route: false,
        }
    }

    /// East along the equator, then north, then back west: a, b, c, d, e.
    fn network(categories: [RoadCategory; 4], conditions: [RoadCondition; 4]) -> (RoadNetwork, SearchPath) {
        let mut network = RoadNetwork::new();
        let points = [
            ("a", 0.0, 0.0, NodeKind::Intersection),
            ("b", 0.0, 0.01, NodeKind::Intersection),
            ("c", 0.01, 0.01, NodeKind::Intersection),
            ("d", 0.0105, 0.02, NodeKind::Intersection),
            ("e", 0.0, 0.02, NodeKind::Shelter),
        ];
        for (id, lat, lon, kind) in points {
            network.add_node(node(id, lat, lon, kind)).unwrap();
        }
        let ids = ["a", "b", "c", "d", "e"];
        let mut edges = Vec::new();
        for i in 0..4 {
            let road = edge(ids[i], ids[i + 1], categories[i], conditions[i]);
            network.add_edge(road.clone()).unwrap();
            edges.push(road);
        }
        let path = SearchPath {
            nodes: ids.iter().map(|id| id.to_string()).collect(),
            edges,
            cost: 42.0,
            expanded: 5,
        };
        (network, path)
    }

    fn kinds(route: &OptimizedRoute) -> Vec<InstructionKind> {
        route.instructions.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn metrics_from_edges() {
        let (network, path) = network(
            [RoadCategory::Main; 4],
            [
                RoadCondition::Clear,
                RoadCondition::Flooded,
                RoadCondition::Damaged,
                RoadCondition::Clear,
            ],
        );
        let hazards = HazardSnapshot::default();
        let route = RouteBuilder::new(&network, &hazards, 30.0)
            .build(&path, RouteAlgorithm::AStar)
            .unwrap();

        assert_eq!(route.total_distance_m, 6000.0);
        assert_eq!(route.hazard_exposure, 50.0);
        assert!((route.congestion_level - 40.0).abs() < 1e-9);
        assert!((route.safety_score - (100.0 - 50.0 - 12.0)).abs() < 1e-9);
        assert!((route.estimated_time_minutes - 12.0).abs() < 1e-9);
        assert_eq!(route.destination.id, "e");
        assert_eq!(route.waypoints.len(), 5);
        assert_eq!(route.search_cost, 42.0);
        assert_eq!(
            route.risk_factors,
            vec![
                "Flooded road segment between b and c".to_string(),
                "Damaged road segment between c and d".to_string(),
            ]
        );
    }

    #[test]
    fn exposure_is_capped_and_safety_floored() {
        let (network, path) = network([RoadCategory::Main; 4], [RoadCondition::Flooded; 4]);
        let hazards = HazardSnapshot::default();
        let route = RouteBuilder::new(&network, &hazards, 30.0)
            .build(&path, RouteAlgorithm::AStar)
            .unwrap();

        assert_eq!(route.hazard_exposure, 100.0);
        assert_eq!(route.safety_score, 0.0);
    }

    #[test]
    fn maneuvers_follow_bearing_changes() {
        let (network, path) = network([RoadCategory::Secondary; 4], [RoadCondition::Clear; 4]);
        let hazards = HazardSnapshot::default();
        let route = RouteBuilder::new(&network, &hazards, 30.0)
            .build(&path, RouteAlgorithm::AStar)
            .unwrap();

        // east, then north (left), then roughly east (right), then south (right).
        assert_eq!(
            kinds(&route),
            vec![
                InstructionKind::Start,
                InstructionKind::Continue,
                InstructionKind::TurnLeft,
                InstructionKind::TurnRight,
                InstructionKind::TurnRight,
                InstructionKind::Arrive,
            ]
        );
        assert!(route.instructions[1].text.starts_with("Head east on secondary road"));
        assert_eq!(route.instructions[5].text, "Arrive at shelter e");
    }

    #[test]
    fn warnings_precede_non_clear_segments() {
        let (network, path) = network(
            [RoadCategory::Main; 4],
            [
                RoadCondition::Clear,
                RoadCondition::Congested,
                RoadCondition::Clear,
                RoadCondition::Clear,
            ],
        );
        let hazards = HazardSnapshot::default();
        let route = RouteBuilder::new(&network, &hazards, 30.0)
            .build(&path, RouteAlgorithm::AStar)
            .unwrap();

        assert_eq!(route.instructions[2].kind, InstructionKind::Warning);
        assert_eq!(route.instructions[3].kind, InstructionKind::TurnLeft);
        assert_eq!(route.instructions.len(), 7);
    }

    #[test]
    fn highway_transitions_are_merge_and_exit() {
        let (network, path) = network(
            [
                RoadCategory::Residential,
                RoadCategory::Highway,
                RoadCategory::Highway,
                RoadCategory::Main,
            ],
            [RoadCondition::Clear; 4],
        );
        let hazards = HazardSnapshot::default();
        let route = RouteBuilder::new(&network, &hazards, 30.0)
            .build(&path, RouteAlgorithm::AStar)
            .unwrap();

        assert_eq!(
            kinds(&route),
            vec![
                InstructionKind::Start,
                InstructionKind::Continue,
                InstructionKind::Merge,
                InstructionKind::TurnRight,
                InstructionKind::Exit,
                InstructionKind::Arrive,
            ]
        );
    }

    #[test]
    fn u_turn_is_a_sharp_turn() {
        let previous = edge("a", "b", RoadCategory::Main, RoadCondition::Clear);
        let next = edge("b", "a", RoadCategory::Main, RoadCondition::Clear);
        let (kind, text) = maneuver(Some((&previous, 90.0)), &next, 270.0);
        assert_eq!(kind, InstructionKind::SharpTurn);
        assert!(text.starts_with("Make a sharp right"));
    }

    #[test]
    fn single_node_path_has_start_and_arrive() {
        let mut network = RoadNetwork::new();
        network
            .add_node(node("s", 0.0, 0.0, NodeKind::Shelter))
            .unwrap();
        let path = SearchPath {
            nodes: vec!["s".to_string()],
            edges: Vec::new(),
            cost: 0.0,
            expanded: 0,
        };
        let hazards = HazardSnapshot::default();
        let route = RouteBuilder::new(&network, &hazards, 5.0)
            .build(&path, RouteAlgorithm::Dijkstra)
            .unwrap();

        assert_eq!(kinds(&route), vec![InstructionKind::Start, InstructionKind::Arrive]);
        assert_eq!(route.congestion_level, 0.0);
        assert_eq!(route.safety_score, 100.0);
        assert_eq!(route.total_distance_m, 0.0);
    }

    #[test]
    fn distance_formatting() {
        assert_eq!(format_distance(730.0), "730 m");
        assert_eq!(format_distance(1320.0), "1.3 km");
    }
}
