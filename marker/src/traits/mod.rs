//!
//! Traits Module
//!
//! This module contains core traits used throughout the marker system for extensibility and abstraction.
//!
//! - [`parser`]: Defines the generic trait for parsing raw report content into Rust types.
//!
//! Implement these traits to support new report formats without touching the aggregation pipeline.

pub mod parser;
