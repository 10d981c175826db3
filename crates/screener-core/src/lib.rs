//! Core types and traits for the screening engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries) with absent-field tolerance
//! - Indicator series and crossover state
//! - Universe metadata and ingestion job types
//! - Core traits for indicators, bar sources and ingestion control

pub mod types;
pub mod traits;
pub mod error;

pub use error::{ScreenerError, ScreenerResult};
pub use types::*;
pub use traits::*;
