//! # Parsers
//!
//! This module is responsible for parsing raw test-run reports produced by the
//! grading pipeline. Each parser implements the [`Parser`](crate::traits::parser::Parser)
//! trait so the grading job can swap formats without changing the fold.
//!
//! The available parsers are:
//! - [`test_run_parser`]: For NUnit-style `test-run` XML documents.

pub mod test_run_parser;
