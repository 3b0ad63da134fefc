//! # Writers
//!
//! Output formats for rendered marksheets.
//!
//! - [`xlsx`]: Single-worksheet Office Open XML spreadsheets.

pub mod xlsx;
