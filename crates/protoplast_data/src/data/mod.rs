//! Core data structures for the Protoplast description layer.

pub mod cell_function;
pub mod description;
pub mod genome;
pub mod vector;
