//! VoxCommand CLI: prompt for a single command, run it through the NLU
//! pipeline and print the analysis.

pub mod config;
pub mod input;
pub mod report;
pub mod session;
