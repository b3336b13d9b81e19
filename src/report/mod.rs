//! Rendering of result matrices for the terminal, CSV and JSON.

pub mod generator;

pub use generator::*;
