//! Shelter listing command handler.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use evacroute_lib::{Coordinate, EvacuationRequest, RouteNode};

use crate::commands::SourceArgs;
use crate::OutputFormat;

/// Arguments for the shelters command.
#[derive(Args, Debug, Clone)]
pub struct SheltersCommandArgs {
    /// Only list shelters with room for this many people.
    #[arg(long, default_value_t = 0)]
    pub group_size: u32,
    /// Latitude to rank shelters from (requires --lon).
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,
    /// Longitude to rank shelters from (requires --lat).
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

#[derive(Debug, Serialize)]
struct ShelterRow<'a> {
    id: &'a str,
    position: Coordinate,
    capacity: Option<u32>,
    occupancy: Option<u32>,
    spare_capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance_m: Option<f64>,
}

impl<'a> ShelterRow<'a> {
    fn new(node: &'a RouteNode, origin: Option<&Coordinate>) -> Self {
        Self {
            id: &node.id,
            position: node.position,
            capacity: node.capacity,
            occupancy: node.occupancy,
            spare_capacity: node.spare_capacity(),
            distance_m: origin.map(|point| node.position.distance_to(point)),
        }
    }
}

pub fn handle_shelters(
    sources: &SourceArgs,
    args: &SheltersCommandArgs,
    format: OutputFormat,
) -> Result<()> {
    let engine = sources.build_engine(sources.load_config()?)?;
    let origin = args.lat.zip(args.lon).map(|(lat, lon)| Coordinate::new(lat, lon));

    let shelters: Vec<&RouteNode> = match &origin {
        Some(point) => {
            let request = EvacuationRequest::new(*point).with_group_size(args.group_size);
            engine.candidate_shelters(&request)
        }
        None => engine
            .network()
            .shelters()
            .into_iter()
            .filter(|node| {
                node.spare_capacity()
                    .is_some_and(|spare| spare >= args.group_size)
            })
            .collect(),
    };
    let rows: Vec<ShelterRow<'_>> = shelters
        .iter()
        .map(|node| ShelterRow::new(node, origin.as_ref()))
        .collect();

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rows).context("failed to encode shelters")?;
            println!("{json}");
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No shelters with room for {} people.", args.group_size);
            }
            for row in &rows {
                let spare = row
                    .spare_capacity
                    .map_or_else(|| "?".to_string(), |spare| spare.to_string());
                let capacity = row
                    .capacity
                    .map_or_else(|| "?".to_string(), |capacity| capacity.to_string());
                match row.distance_m {
                    Some(distance) => {
                        println!("{:<12} spare {spare}/{capacity}  {distance:.0} m", row.id)
                    }
                    None => println!("{:<12} spare {spare}/{capacity}", row.id),
                }
            }
        }
    }
    Ok(())
}
