//! Types and helpers shared by every stage of route planning: graph weights,
//! geometry, configuration, errors and progress reporting.

pub mod bbox;
pub mod config;
pub mod error;
pub mod geometry;
pub mod graph_data;
pub mod progress;
