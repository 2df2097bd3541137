//! VoxCommand API: library crate for the command routing HTTP server.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `vx-e2e-tests`) can access `AppState`, `build_router` and `ApiConfig`.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
