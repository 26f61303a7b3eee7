//! CLI command implementations

pub mod branch;
pub mod case;
pub mod completions;
pub mod export;
pub mod graph;
pub mod step;
