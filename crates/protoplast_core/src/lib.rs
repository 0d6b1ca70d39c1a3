//! # Protoplast Core
//!
//! Logic over the value types of `protoplast_data`:
//! - Genome codec: flat byte buffers to and from `GenomeDescription`,
//!   with cursor mapping between byte offsets and cell indices
//! - Connection topology: angle-ordered connection rings per cell
//! - Snapshot transforms (center, shift, rotate, accelerate)
//! - Batch helpers: proximity reconnection, wrap correction, id renewal,
//!   grid/random multiplication and tiling
//!
//! All operations are synchronous and deterministic given a seeded
//! [`IdGenerator`](id_generator::IdGenerator).
//!
//! ## Example
//!
//! ```
//! use protoplast_core::config::SimulationParameters;
//! use protoplast_core::genome;
//! use protoplast_data::{CellFunctionGenome, CellGenomeDescription, NeuronDescription};
//!
//! let genome = vec![CellGenomeDescription::default()
//!     .with_color(1)
//!     .with_cell_function(CellFunctionGenome::Neuron(NeuronDescription::default()))];
//!
//! let bytes = genome::encode(&genome).unwrap();
//! let decoded = genome::decode(&bytes, &SimulationParameters::default()).unwrap();
//! assert_eq!(decoded, genome);
//! ```

/// Simulation parameters read by the codec and helpers
pub mod config;
/// Reconnection, multiplication and id renewal over whole snapshots
pub mod description_helper;
/// Error types and result alias
pub mod error;
/// Byte-buffer genome codec
pub mod genome;
/// Seeded id and random number source
pub mod id_generator;
/// Structured logging setup
pub mod logging;
/// Angles, rotation and tangential velocity
pub mod math;
/// Sparse unit grid for radius queries
pub mod slot_grid;
/// Center of mass and rigid transforms of snapshots
pub mod snapshot;
/// Connection rings and the id to index cache
pub mod topology;

pub use config::SimulationParameters;
pub use error::{DescriptionError, Result};
pub use id_generator::{IdGenerator, IdGeneratorState};
pub use snapshot::SnapshotLogic;
pub use topology::{CellIndexCache, ConnectionLogic};
