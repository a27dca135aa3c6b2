//! Road network graph.
//!
//! Nodes are keyed by id and edges live in a directed adjacency list; a
//! two-way road is stored as two edges. Networks are built once, from a JSON
//! snapshot or the embedded sample, and then shared read-only.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::geo::Coordinate;

/// Identifier for a node in the road network.
pub type NodeId = String;

/// Sample network shipped with the repository for demos, tests and benches.
const SAMPLE_NETWORK_JSON: &str = include_str!("../../../data/sample_network.json");

/// Minimum Jaro-Winkler similarity for an id to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.6;

/// Role a node plays in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Intersection,
    Shelter,
    Hospital,
    Checkpoint,
    Hazard,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Intersection => "intersection",
            NodeKind::Shelter => "shelter",
            NodeKind::Hospital => "hospital",
            NodeKind::Checkpoint => "checkpoint",
            NodeKind::Hazard => "hazard",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Road classification, used for accessibility and instruction text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadCategory {
    Highway,
    Main,
    Secondary,
    Residential,
    Pedestrian,
}

impl RoadCategory {
    pub fn label(self) -> &'static str {
        match self {
            RoadCategory::Highway => "highway",
            RoadCategory::Main => "main road",
            RoadCategory::Secondary => "secondary road",
            RoadCategory::Residential => "residential street",
            RoadCategory::Pedestrian => "pedestrian path",
        }
    }
}

/// Current state of a road segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadCondition {
    Clear,
    Congested,
    Blocked,
    Flooded,
    Damaged,
}

impl RoadCondition {
    pub fn label(self) -> &'static str {
        match self {
            RoadCondition::Clear => "clear",
            RoadCondition::Congested => "congested",
            RoadCondition::Blocked => "blocked",
            RoadCondition::Flooded => "flooded",
            RoadCondition::Damaged => "damaged",
        }
    }
}

impl fmt::Display for RoadCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A location in the road network.
///
/// Shelters and hospitals carry `capacity` and `occupancy`; both are supplied
/// by whoever builds the network and are never modified by the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteNode {
    pub id: NodeId,
    pub position: Coordinate,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupancy: Option<u32>,
    #[serde(default = "default_true")]
    pub accessible: bool,
    #[serde(default)]
    pub elevation_m: f64,
}

impl RouteNode {
    /// Places still free at this node; `None` when the node has no capacity.
    pub fn spare_capacity(&self) -> Option<u32> {
        self.capacity
            .map(|capacity| capacity.saturating_sub(self.occupancy.unwrap_or(0)))
    }
}

/// Directed road segment between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub distance_m: f64,
    pub category: RoadCategory,
    pub condition: RoadCondition,
    #[serde(default)]
    pub traffic_level: f64,
    #[serde(default)]
    pub max_capacity: u32,
    #[serde(default)]
    pub evacuation_route: bool,
}

impl RouteEdge {
    /// The same road traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
            ..self.clone()
        }
    }
}

/// Road record in a network snapshot. Bidirectional roads expand into two
/// directed edges when loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadRecord {
    #[serde(flatten)]
    pub edge: RouteEdge,
    #[serde(default = "default_true")]
    pub bidirectional: bool,
}

/// Serialized form of a road network, as produced by network ingestion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub nodes: Vec<RouteNode>,
    #[serde(default)]
    pub roads: Vec<RoadRecord>,
}

/// In-memory road network: nodes keyed by id plus a directed adjacency list.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    nodes: HashMap<NodeId, RouteNode>,
    adjacency: HashMap<NodeId, Vec<RouteEdge>>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a network from a snapshot, validating every node and edge.
    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Result<Self> {
        let mut network = Self::new();
        for node in snapshot.nodes {
            network.add_node(node)?;
        }
        for road in snapshot.roads {
            if road.bidirectional {
                network.add_road(road.edge)?;
            } else {
                network.add_edge(road.edge)?;
            }
        }
        debug!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            "loaded road network"
        );
        Ok(network)
    }

    /// Add a node. Identifiers must be unique.
    pub fn add_node(&mut self, node: RouteNode) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(Error::DuplicateNode { id: node.id });
        }
        self.adjacency.entry(node.id.clone()).or_default();
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Add a single directed edge. Traffic is clamped into `[0, 1]`.
    pub fn add_edge(&mut self, mut edge: RouteEdge) -> Result<()> {
        for id in [&edge.from, &edge.to] {
            if !self.nodes.contains_key(id) {
                return Err(Error::UnknownNode {
                    id: id.clone(),
                    suggestions: self.fuzzy_node_matches(id, 3),
                });
            }
        }
        if !edge.distance_m.is_finite() || edge.distance_m < 0.0 {
            return Err(Error::InvalidEdge {
                from: edge.from,
                to: edge.to,
                message: format!("distance must be finite and >= 0, got {}", edge.distance_m),
            });
        }
        if !edge.traffic_level.is_finite() {
            return Err(Error::InvalidEdge {
                from: edge.from,
                to: edge.to,
                message: "traffic level must be finite".to_string(),
            });
        }
        edge.traffic_level = edge.traffic_level.clamp(0.0, 1.0);

        self.adjacency.entry(edge.from.clone()).or_default().push(edge);
        Ok(())
    }

    /// Add a two-way road as a pair of directed edges.
    pub fn add_road(&mut self, edge: RouteEdge) -> Result<()> {
        let reverse = edge.reversed();
        self.add_edge(edge)?;
        self.add_edge(reverse)
    }

    /// Change the condition of every directed edge `from -> to`.
    pub fn set_edge_condition(
        &mut self,
        from: &str,
        to: &str,
        condition: RoadCondition,
    ) -> Result<()> {
        let mut updated = false;
        if let Some(edges) = self.adjacency.get_mut(from) {
            for edge in edges.iter_mut().filter(|edge| edge.to == to) {
                edge.condition = condition;
                updated = true;
            }
        }
        if updated {
            Ok(())
        } else {
            Err(Error::EdgeNotFound {
                from: from.to_string(),
                to: to.to_string(),
            })
        }
    }

    pub fn node(&self, id: &str) -> Option<&RouteNode> {
        self.nodes.get(id)
    }

    /// All nodes ordered by id.
    pub fn nodes(&self) -> Vec<&RouteNode> {
        let mut nodes: Vec<&RouteNode> = self.nodes.values().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes
    }

    /// Shelter nodes ordered by id.
    pub fn shelters(&self) -> Vec<&RouteNode> {
        self.nodes()
            .into_iter()
            .filter(|node| node.kind == NodeKind::Shelter)
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Outgoing edges of a node; empty for isolated or unknown nodes.
    pub fn outgoing_edges(&self, id: &str) -> &[RouteEdge] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Shortest directed edge `from -> to`, if any.
    pub fn edge(&self, from: &str, to: &str) -> Option<&RouteEdge> {
        self.outgoing_edges(from)
            .iter()
            .filter(|edge| edge.to == to)
            .min_by(|a, b| a.distance_m.total_cmp(&b.distance_m))
    }

    /// Closest node to `point` by great-circle distance.
    ///
    /// This is a linear scan over every node. Ties go to the smallest id so
    /// the answer does not depend on hash-map iteration order.
    pub fn nearest_node(&self, point: &Coordinate) -> Option<&RouteNode> {
        self.nodes
            .values()
            .map(|node| (node.position.distance_to(point), node))
            .min_by(|(da, a), (db, b)| da.total_cmp(db).then_with(|| a.id.cmp(&b.id)))
            .map(|(_, node)| node)
    }

    /// Node ids similar to `id`, best match first.
    pub fn fuzzy_node_matches(&self, id: &str, limit: usize) -> Vec<String> {
        let mut scored: Vec<(f64, &str)> = self
            .nodes
            .keys()
            .map(|candidate| (strsim::jaro_winkler(id, candidate), candidate.as_str()))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|(sa, a), (sb, b)| sb.total_cmp(sa).then_with(|| a.cmp(b)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }
}

/// Load a network snapshot from a JSON file.
pub fn load_network(path: &Path) -> Result<RoadNetwork> {
    let contents = fs::read_to_string(path)?;
    let snapshot: NetworkSnapshot = serde_json::from_str(&contents)?;
    RoadNetwork::from_snapshot(snapshot)
}

/// The built-in sample network (intersections `n1`..`n5`, shelters `s1`/`s2`,
/// hospital `h1`).
pub fn sample_network() -> Result<RoadNetwork> {
    let snapshot: NetworkSnapshot = serde_json::from_str(SAMPLE_NETWORK_JSON)?;
    RoadNetwork::from_snapshot(snapshot)
}

fn default_true() -> bool {
    true
}
