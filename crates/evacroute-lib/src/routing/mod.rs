//! Route search over the road network.
//!
//! This module provides:
//! - [`RouteAlgorithm`] - Supported search algorithms (A*, Dijkstra)
//! - [`HeuristicMode`] - How A* estimates the remaining cost
//! - [`SearchLimits`] - Expansion budget and deadline for a single search
//! - [`SearchPath`] - The winning node/edge sequence
//! - [`find_path`] - Best-first search from a start node to a goal node
//!
//! # Strategy Pattern
//!
//! Callers pick an algorithm through the [`RoutePlanner`] trait. Both planners
//! share the same best-first core and differ only in the heuristic they plug
//! into it.
//!
//! # Heuristic admissibility
//!
//! The cost model can discount an edge below its length (designated
//! evacuation roads and, for mobility-constrained groups, pedestrian paths),
//! so a raw straight-line heuristic may overestimate the remaining cost. The
//! default [`HeuristicMode::Admissible`] scales the straight-line distance by
//! the smallest multiplier the cost model can produce for the request, which
//! restores the lower bound as long as road lengths are not shorter than the
//! straight line between their endpoints.

mod planner;
pub mod queue;

pub use planner::{select_planner, AStarPlanner, DijkstraPlanner, RoutePlanner};

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cost::CostModel;
use crate::error::{Error, Result};
use crate::hazard::HazardSnapshot;
use crate::network::{NodeId, RoadNetwork, RouteEdge, RouteNode};
use crate::request::EvacuationRequest;

use queue::{FrontierEntry, FrontierQueue};

/// Supported search algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteAlgorithm {
    /// A* search (heuristic guided).
    #[default]
    #[serde(rename = "a-star")]
    AStar,
    /// Dijkstra's algorithm (no heuristic).
    Dijkstra,
}

impl fmt::Display for RouteAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteAlgorithm::AStar => "a-star",
            RouteAlgorithm::Dijkstra => "dijkstra",
        };
        f.write_str(value)
    }
}

/// Remaining-cost estimate used by A*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicMode {
    /// Straight-line distance scaled by the request's minimum cost multiplier.
    #[default]
    Admissible,
    /// Plain straight-line distance. Faster, but may return a costlier path.
    Raw,
    /// No heuristic; the search degenerates to Dijkstra.
    None,
}

impl HeuristicMode {
    /// Factor applied to the straight-line distance for `request`.
    pub fn scale(self, request: &EvacuationRequest) -> f64 {
        match self {
            HeuristicMode::Admissible => CostModel::min_multiplier(request),
            HeuristicMode::Raw => 1.0,
            HeuristicMode::None => 0.0,
        }
    }
}

/// Bounds on a single search.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchLimits {
    /// Maximum number of node expansions.
    pub max_expansions: Option<usize>,
    /// Wall-clock instant after which the search gives up.
    pub deadline: Option<Instant>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Limits derived from an expansion budget and a timeout measured from now.
    pub fn new(max_expansions: Option<usize>, timeout: Option<Duration>) -> Self {
        Self {
            max_expansions,
            deadline: timeout.map(|timeout| Instant::now() + timeout),
        }
    }

    fn exceeded(&self, expanded: usize) -> bool {
        if self.max_expansions.is_some_and(|limit| expanded > limit) {
            return true;
        }
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Everything a planner needs for one search.
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    pub network: &'a RoadNetwork,
    pub hazards: &'a HazardSnapshot,
    pub request: &'a EvacuationRequest,
    pub limits: SearchLimits,
}

/// Result of a successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPath {
    /// Node ids from start to goal, inclusive.
    pub nodes: Vec<NodeId>,
    /// Traversed edges; always `nodes.len() - 1` long.
    pub edges: Vec<RouteEdge>,
    /// Accumulated cost-model cost of the path.
    pub cost: f64,
    /// Number of nodes expanded while searching.
    pub expanded: usize,
}

impl SearchPath {
    pub fn hop_count(&self) -> usize {
        self.edges.len()
    }
}

/// Best-first search from `start` to `goal`.
///
/// `heuristic_scale` multiplies the haversine distance to the goal; `0.0`
/// gives Dijkstra. Stale queue entries are skipped when popped; improvement is
/// decided at relaxation time against the best known g-score.
pub fn find_path(
    context: &SearchContext<'_>,
    start: &str,
    goal: &str,
    heuristic_scale: f64,
) -> Result<SearchPath> {
    let network = context.network;
    let start_node = lookup(network, start)?;
    let goal_node = lookup(network, goal)?;
    let cost_model = CostModel::new(context.hazards);
    let heuristic = |node: &RouteNode| node.position.distance_to(&goal_node.position) * heuristic_scale;

    let mut g_score: HashMap<NodeId, f64> = HashMap::new();
    let mut parents: HashMap<NodeId, (NodeId, usize)> = HashMap::new();
    let mut queue = FrontierQueue::new();
    let mut expanded = 0usize;

    g_score.insert(start_node.id.clone(), 0.0);
    queue.push(FrontierEntry::new(
        start_node.id.clone(),
        0.0,
        heuristic(start_node),
    ));

    while let Some(entry) = queue.pop() {
        let current_score = match g_score.get(&entry.node) {
            Some(score) if entry.cost() > *score => continue,
            Some(score) => *score,
            None => continue,
        };

        if entry.node == goal_node.id {
            debug!(
                start,
                goal,
                cost = current_score,
                expanded,
                "route search reached goal"
            );
            return Ok(reconstruct_path(
                network,
                &parents,
                &start_node.id,
                &goal_node.id,
                current_score,
                expanded,
            ));
        }

        expanded += 1;
        if context.limits.exceeded(expanded) {
            return Err(Error::SearchAborted { expanded });
        }

        let Some(current) = network.node(&entry.node) else {
            continue;
        };

        for (index, edge) in network.outgoing_edges(&entry.node).iter().enumerate() {
            let Some(next) = network.node(&edge.to) else {
                continue;
            };

            let tentative_g =
                current_score + cost_model.edge_cost(edge, current, next, context.request);
            if tentative_g < *g_score.get(&edge.to).unwrap_or(&f64::INFINITY) {
                g_score.insert(edge.to.clone(), tentative_g);
                parents.insert(edge.to.clone(), (entry.node.clone(), index));
                queue.push(FrontierEntry::new(
                    edge.to.clone(),
                    tentative_g,
                    tentative_g + heuristic(next),
                ));
            }
        }
    }

    Err(Error::NoPath {
        start: start_node.id.clone(),
        shelter: goal_node.id.clone(),
    })
}

fn lookup<'a>(network: &'a RoadNetwork, id: &str) -> Result<&'a RouteNode> {
    network.node(id).ok_or_else(|| Error::UnknownNode {
        id: id.to_string(),
        suggestions: network.fuzzy_node_matches(id, 3),
    })
}

fn reconstruct_path(
    network: &RoadNetwork,
    parents: &HashMap<NodeId, (NodeId, usize)>,
    start: &str,
    goal: &str,
    cost: f64,
    expanded: usize,
) -> SearchPath {
    let mut nodes = vec![goal.to_string()];
    let mut edges = Vec::new();
    let mut current = goal;

    while current != start {
        let Some((previous, index)) = parents.get(current) else {
            break;
        };
        if let Some(edge) = network.outgoing_edges(previous).get(*index) {
            edges.push(edge.clone());
        }
        nodes.push(previous.clone());
        current = previous;
    }

    nodes.reverse();
    edges.reverse();
    SearchPath {
        nodes,
        edges,
        cost,
        expanded,
    }
}
