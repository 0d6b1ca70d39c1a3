//! Value types describing cells, clusters, particles and genomes.
//!
//! Everything in this crate is plain data: snapshots are created by
//! simulation setup, editors or device readback and transformed by
//! `protoplast_core`.

pub mod data;

pub use data::cell_function::{
    AttackerDescription, CellFunction, CellFunctionType, ConstructorDescription,
    EnergyDistributionMode, InjectorDescription, InjectorMode, MuscleDescription, MuscleMode,
    NerveDescription, NeuronDescription, SensorDescription, TransmitterDescription,
    NEURON_CHANNELS,
};
pub use data::description::{
    CellDescription, CellMetadata, CellOrParticle, ClusterDescription, ClusteredDataDescription,
    ConnectionDescription, DataDescription, LivingState, ParticleDescription, TokenDescription,
};
pub use data::genome::{
    CellFunctionGenome, CellGenomeDescription, ConstructorGenomeDescription, GenomeDescription,
    InjectorGenomeDescription, SubGenome,
};
pub use data::vector::{IntVector2D, Vector2D};
