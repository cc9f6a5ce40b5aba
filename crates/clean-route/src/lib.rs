//! Health-weighted exposure scoring and diverse route selection.
//!
//! The [`planning`] module holds the engine: exposure formulas, route metrics, the
//! scoring orchestrator with its local fallback, the diverse route selector and the
//! trip session that dispatches context changes to the right pipeline.

pub mod config;
pub mod error;
pub mod planning;
pub mod telemetry;
