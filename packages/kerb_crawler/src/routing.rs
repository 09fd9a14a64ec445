//! This module takes a loaded graph and turns it into a single closed route
//! which covers every street, keeping turns against the traffic to a minimum.

pub mod balancing;
pub mod circuit;
pub mod metrics;
pub mod pipeline;
pub mod turns;
