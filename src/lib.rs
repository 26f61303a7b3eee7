//! TCF: Test Case Flow
//!
//! Author test cases as ordered steps with expected outcomes, dependencies
//! and conditional branches, then export them as flow diagrams, spreadsheets,
//! mind-map outlines and self-contained reports.

pub mod cli;
pub mod core;
pub mod entities;
pub mod export;
pub mod yaml;
