//! This module focuses on turning a filtered street network into a petgraph
//! graph object, and reducing it to the part which can actually be driven.

pub mod components;
pub mod petgraph;
pub mod structs;
