//! Route command handler.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use evacroute_lib::{
    render_route, Coordinate, EvacuationRequest, MobilityConstraint, RouteAlgorithm,
    RouteRenderMode, VehicleType,
};

use crate::commands::SourceArgs;
use crate::OutputFormat;

/// Arguments for the route command.
#[derive(Args, Debug, Clone)]
pub struct RouteCommandArgs {
    /// Latitude of the evacuee, in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,
    /// Longitude of the evacuee, in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,
    /// Number of people travelling together.
    #[arg(long, default_value_t = 1)]
    pub group_size: u32,
    /// Mobility constraint of the group.
    #[arg(long, value_enum, default_value_t = MobilityArg::None)]
    pub mobility: MobilityArg,
    /// How the group travels.
    #[arg(long, value_enum, default_value_t = VehicleArg::Car)]
    pub vehicle: VehicleArg,
    /// Search algorithm; overrides the config file.
    #[arg(long, value_enum)]
    pub algorithm: Option<AlgorithmArg>,
    /// Routes to further shelters to include; overrides the config file.
    #[arg(long)]
    pub alternatives: Option<usize>,
    /// Preferred shelter ids (recorded on the request, not used for selection).
    #[arg(long = "prefer")]
    pub preferred: Vec<String>,
    /// Route straight through hazard zones.
    #[arg(long)]
    pub no_avoid_hazards: bool,
    /// Do not penalise busy roads beyond their congestion cost.
    #[arg(long)]
    pub no_prioritize_safety: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MobilityArg {
    None,
    Wheelchair,
    Elderly,
    Children,
}

impl From<MobilityArg> for MobilityConstraint {
    fn from(value: MobilityArg) -> Self {
        match value {
            MobilityArg::None => MobilityConstraint::None,
            MobilityArg::Wheelchair => MobilityConstraint::Wheelchair,
            MobilityArg::Elderly => MobilityConstraint::Elderly,
            MobilityArg::Children => MobilityConstraint::Children,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VehicleArg {
    Walk,
    Car,
    Bus,
    Emergency,
}

impl From<VehicleArg> for VehicleType {
    fn from(value: VehicleArg) -> Self {
        match value {
            VehicleArg::Walk => VehicleType::Walk,
            VehicleArg::Car => VehicleType::Car,
            VehicleArg::Bus => VehicleType::Bus,
            VehicleArg::Emergency => VehicleType::Emergency,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmArg {
    #[value(name = "a-star", alias = "astar")]
    AStar,
    Dijkstra,
}

impl From<AlgorithmArg> for RouteAlgorithm {
    fn from(value: AlgorithmArg) -> Self {
        match value {
            AlgorithmArg::AStar => RouteAlgorithm::AStar,
            AlgorithmArg::Dijkstra => RouteAlgorithm::Dijkstra,
        }
    }
}

impl RouteCommandArgs {
    /// Convert CLI args to a library request.
    pub fn to_request(&self) -> EvacuationRequest {
        let mut request = EvacuationRequest::new(Coordinate::new(self.lat, self.lon))
            .with_group_size(self.group_size)
            .with_mobility(self.mobility.into())
            .with_vehicle(self.vehicle.into());
        request.preferred_destinations = self.preferred.clone();
        request.avoid_hazards = !self.no_avoid_hazards;
        request.prioritize_safety = !self.no_prioritize_safety;
        request
    }
}

pub fn handle_route(sources: &SourceArgs, args: &RouteCommandArgs, format: OutputFormat) -> Result<()> {
    let mut config = sources.load_config()?;
    if let Some(algorithm) = args.algorithm {
        config.algorithm = algorithm.into();
    }
    if let Some(alternatives) = args.alternatives {
        config.max_alternatives = alternatives;
    }

    let engine = sources.build_engine(config)?;
    let route = engine
        .find_optimal_route(&args.to_request())
        .context("failed to plan evacuation route")?;

    let mode = match format {
        OutputFormat::Text => RouteRenderMode::PlainText,
        OutputFormat::Json => RouteRenderMode::Json,
    };
    let rendered = render_route(&route, mode).context("failed to render route")?;
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> RouteCommandArgs {
        RouteCommandArgs {
            lat: 14.5996,
            lon: 120.9843,
            group_size: 12,
            mobility: MobilityArg::Wheelchair,
            vehicle: VehicleArg::Walk,
            algorithm: None,
            alternatives: None,
            preferred: vec!["s2".to_string()],
            no_avoid_hazards: true,
            no_prioritize_safety: false,
        }
    }

    #[test]
    fn request_reflects_flags() {
        let request = args().to_request();
        assert_eq!(request.group_size, 12);
        assert_eq!(request.mobility, MobilityConstraint::Wheelchair);
        assert_eq!(request.vehicle, VehicleType::Walk);
        assert_eq!(request.preferred_destinations, vec!["s2".to_string()]);
        assert!(!request.avoid_hazards);
        assert!(request.prioritize_safety);
    }
}
