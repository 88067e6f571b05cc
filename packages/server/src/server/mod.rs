//! HTTP facade over the job registry.

pub mod app;
pub mod routes;

pub use app::{build_app, AppState};
