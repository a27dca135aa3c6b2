//! Pluggable search strategies.
//!
//! The engine picks a [`RoutePlanner`] once per request and uses it for the
//! main route and every alternative, so all routes in one response come from
//! the same algorithm.

use crate::error::Result;

use super::{find_path, HeuristicMode, RouteAlgorithm, SearchContext, SearchPath};

/// A search strategy over the road network.
pub trait RoutePlanner: Send + Sync {
    /// Reported back on the built route.
    fn algorithm(&self) -> RouteAlgorithm;

    /// Search for the cheapest path from `start` to `goal`.
    fn find_path(&self, context: &SearchContext<'_>, start: &str, goal: &str)
        -> Result<SearchPath>;
}

/// A* planner guided by straight-line distance to the goal.
#[derive(Debug, Clone, Default)]
pub struct AStarPlanner {
    heuristic: HeuristicMode,
}

impl AStarPlanner {
    pub fn new(heuristic: HeuristicMode) -> Self {
        Self { heuristic }
    }

    pub fn heuristic(&self) -> HeuristicMode {
        self.heuristic
    }
}

impl RoutePlanner for AStarPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::AStar
    }

    fn find_path(
        &self,
        context: &SearchContext<'_>,
        start: &str,
        goal: &str,
    ) -> Result<SearchPath> {
        let scale = self.heuristic.scale(context.request);
        find_path(context, start, goal, scale)
    }
}

/// Dijkstra planner; explores by accumulated cost only.
#[derive(Debug, Clone, Default)]
pub struct DijkstraPlanner;

impl RoutePlanner for DijkstraPlanner {
    fn algorithm(&self) -> RouteAlgorithm {
        RouteAlgorithm::Dijkstra
    }

    fn find_path(
        &self,
        context: &SearchContext<'_>,
        start: &str,
        goal: &str,
    ) -> Result<SearchPath> {
        find_path(context, start, goal, 0.0)
    }
}

/// Select the planner for an algorithm.
pub fn select_planner(algorithm: RouteAlgorithm, heuristic: HeuristicMode) -> Box<dyn RoutePlanner> {
    match algorithm {
        RouteAlgorithm::AStar => Box::new(AStarPlanner::new(heuristic)),
        RouteAlgorithm::Dijkstra => Box::new(DijkstraPlanner),
    }
}
