//! Subcommand handlers plus the shared engine bootstrap.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use evacroute_lib::{load_hazards, load_network, sample_network, EngineConfig, EvacuationEngine};

pub mod route;
pub mod shelters;

/// Where the engine's inputs come from.
#[derive(Debug, Clone, Default)]
pub struct SourceArgs {
    pub network: Option<PathBuf>,
    pub hazards: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

impl SourceArgs {
    pub fn load_config(&self) -> Result<EngineConfig> {
        match &self.config {
            Some(path) => EngineConfig::from_path(path)
                .with_context(|| format!("failed to load engine config from {}", path.display())),
            None => Ok(EngineConfig::default()),
        }
    }

    /// Build an engine from the configured network and hazard files.
    pub fn build_engine(&self, config: EngineConfig) -> Result<EvacuationEngine> {
        let network = match &self.network {
            Some(path) => load_network(path)
                .with_context(|| format!("failed to load road network from {}", path.display()))?,
            None => sample_network().context("failed to load the built-in sample network")?,
        };
        debug!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            "road network ready"
        );

        let engine = EvacuationEngine::new(Arc::new(network), config);
        if let Some(path) = &self.hazards {
            let zones = load_hazards(path)
                .with_context(|| format!("failed to load hazard zones from {}", path.display()))?;
            engine
                .replace_hazard_zones(zones)
                .context("hazard zone list rejected")?;
        }
        Ok(engine)
    }
}
