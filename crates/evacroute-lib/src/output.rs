use std::fmt::Write;

use crate::builder::OptimizedRoute;
use crate::error::Result;

/// Presentation style for turning an [`OptimizedRoute`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteRenderMode {
    #[default]
    PlainText,
    Json,
}

/// Render a route using the requested mode.
pub fn render_route(route: &OptimizedRoute, mode: RouteRenderMode) -> Result<String> {
    match mode {
        RouteRenderMode::PlainText => Ok(render_plain(route)),
        RouteRenderMode::Json => Ok(serde_json::to_string_pretty(route)?),
    }
}

fn render_plain(route: &OptimizedRoute) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "Route: {} -> {} {} ({} hops, algorithm: {})",
        route.start,
        route.destination.kind,
        route.destination.id,
        route.hop_count(),
        route.algorithm
    );
    let _ = writeln!(buffer, "Path: {}", route.path.join(" -> "));
    let _ = writeln!(
        buffer,
        "Distance: {:.0} m, estimated time: {:.1} min",
        route.total_distance_m, route.estimated_time_minutes
    );
    let _ = writeln!(
        buffer,
        "Safety: {:.0}/100, congestion: {:.0}/100, hazard exposure: {:.0}/100",
        route.safety_score, route.congestion_level, route.hazard_exposure
    );
    if let (Some(capacity), Some(occupancy)) =
        (route.destination.capacity, route.destination.occupancy)
    {
        let _ = writeln!(
            buffer,
            "Shelter occupancy: {occupancy}/{capacity}"
        );
    }

    let _ = writeln!(buffer, "Instructions:");
    for (index, instruction) in route.instructions.iter().enumerate() {
        let _ = writeln!(buffer, "{:>3}. {}", index + 1, instruction.text);
    }

    if !route.risk_factors.is_empty() {
        let _ = writeln!(buffer, "Risk factors:");
        for factor in &route.risk_factors {
            let _ = writeln!(buffer, "  - {factor}");
        }
    }

    if !route.alternative_routes.is_empty() {
        let _ = writeln!(buffer, "Alternatives:");
        for alternative in &route.alternative_routes {
            let _ = writeln!(
                buffer,
                "  - {} {}: {:.0} m, safety {:.0}/100 ({})",
                alternative.destination.kind,
                alternative.destination.id,
                alternative.total_distance_m,
                alternative.safety_score,
                alternative.path.join(" -> ")
            );
        }
    }

    buffer
}
