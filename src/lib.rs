//! # Seat Projector.
//!
//! Turns a batch of published opinion polls into a weighted moving-average projection of
//! parliamentary seats, a per-seat table for arc charts and the leading party of every state.

pub mod commands;
pub mod error;
pub mod ingest;
pub mod normalize;
pub mod opt;
pub mod prelude;
pub mod prometheus;
pub mod quality;
pub mod seats;
pub mod skew;
pub mod states;
pub mod types;
pub mod utils;
pub mod wma;
