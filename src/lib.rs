//! Protoplast: genome codec and cluster connection geometry for an
//! evolvable 2D cell simulator.
//!
//! The heavy lifting lives in the workspace crates; this crate groups their
//! public surface under [`model`] and adds file loading for parameters.

pub mod model;

use model::config::SimulationParameters;
use std::path::Path;

/// Reads simulation parameters from a TOML file, or returns the defaults
/// when the file does not exist.
pub fn load_parameters(path: &Path) -> anyhow::Result<SimulationParameters> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "No parameter file, using defaults");
        return Ok(SimulationParameters::default());
    }
    let content = std::fs::read_to_string(path)?;
    SimulationParameters::from_toml(&content)
}
