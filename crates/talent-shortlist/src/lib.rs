//! Scoring, filtering, and shortlist selection for uploaded candidate batches.

pub mod candidates;
pub mod config;
pub mod error;
pub mod telemetry;
