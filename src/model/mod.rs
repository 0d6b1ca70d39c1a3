pub use protoplast_core::{ConnectionLogic, SnapshotLogic};
pub mod config {
    pub use protoplast_core::config::*;
}
pub mod error {
    pub use protoplast_core::error::*;
}
pub mod genome {
    pub use protoplast_core::genome::*;
}
pub mod topology {
    pub use protoplast_core::topology::*;
}
pub mod snapshot {
    pub use protoplast_core::snapshot::*;
}
pub mod helper {
    pub use protoplast_core::description_helper::*;
}
pub mod ids {
    pub use protoplast_core::id_generator::*;
}
pub mod math {
    pub use protoplast_core::math::*;
}
pub mod slot_grid {
    pub use protoplast_core::slot_grid::*;
}
pub mod logging {
    pub use protoplast_core::logging::*;
}
pub mod description {
    pub use protoplast_data::*;
}
