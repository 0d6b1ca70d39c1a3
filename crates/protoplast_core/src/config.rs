//! Simulation parameters consumed by the genome codec and description helpers.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impl)
//! 2. A TOML document (overrides defaults per section)
//!
//! ## Example
//!
//! ```toml
//! [cell]
//! max_bonds = 6
//! max_execution_order_numbers = 6
//!
//! [genome]
//! max_nesting_depth = 16
//!
//! [world]
//! width = 1000
//! height = 500
//! wrap_distance_fraction = 0.333
//! ```

use protoplast_data::IntVector2D;
use serde::{Deserialize, Serialize};

/// Limits applied to individual cells.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CellParameters {
    /// Upper bound for `max_connections` of any cell.
    pub max_bonds: u8,
    /// Execution order numbers cycle through `0..max_execution_order_numbers`.
    pub max_execution_order_numbers: u8,
}

impl Default for CellParameters {
    fn default() -> Self {
        Self {
            max_bonds: 6,
            max_execution_order_numbers: 6,
        }
    }
}

/// Limits applied to genome buffers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GenomeParameters {
    /// Deepest nesting `validate` follows into sub-genomes.
    pub max_nesting_depth: usize,
}

impl Default for GenomeParameters {
    fn default() -> Self {
        Self {
            max_nesting_depth: 16,
        }
    }
}

/// World extent and toroidal wrap heuristics.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldParameters {
    pub width: i32,
    pub height: i32,
    /// Connections longer than this fraction of the smaller world side are
    /// treated as wrap-around artifacts by `correct_connections`.
    pub wrap_distance_fraction: f32,
}

impl Default for WorldParameters {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 500,
            wrap_distance_fraction: 1.0 / 3.0,
        }
    }
}

impl WorldParameters {
    #[must_use]
    pub fn size(&self) -> IntVector2D {
        IntVector2D::new(self.width, self.height)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SimulationParameters {
    pub cell: CellParameters,
    pub genome: GenomeParameters,
    pub world: WorldParameters,
}

impl SimulationParameters {
    /// Validates all parameters.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.cell.max_bonds > 0, "Max bonds must be positive");
        anyhow::ensure!(
            self.cell.max_execution_order_numbers > 0,
            "Max execution order numbers must be positive"
        );
        anyhow::ensure!(
            self.genome.max_nesting_depth > 0,
            "Max nesting depth must be positive"
        );
        anyhow::ensure!(self.world.width > 0, "World width must be positive");
        anyhow::ensure!(self.world.height > 0, "World height must be positive");
        anyhow::ensure!(
            self.world.wrap_distance_fraction > 0.0 && self.world.wrap_distance_fraction <= 1.0,
            "Wrap distance fraction must be in (0.0, 1.0]"
        );
        Ok(())
    }

    /// Parses and validates parameters from a TOML document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let params = toml::from_str::<Self>(content)?;
        params.validate()?;
        Ok(params)
    }
}
