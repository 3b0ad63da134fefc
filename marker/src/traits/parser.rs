//! Parser Trait
//!
//! This module defines the [`Parser`] trait, which provides a generic interface for parsing
//! various data formats into strongly-typed Rust structures. Implementations of this trait
//! are responsible for validating the input and converting it into the appropriate domain
//! model, returning detailed errors on failure.
//!
//! # Example
//!
//! ```rust
//! use marker::error::MarkerError;
//! use marker::traits::parser::Parser;
//!
//! struct LineCounter;
//!
//! impl<'a> Parser<&'a str, usize> for LineCounter {
//!     fn parse(&self, raw: &'a str) -> Result<usize, MarkerError> {
//!         Ok(raw.lines().count())
//!     }
//! }
//!
//! assert_eq!(LineCounter.parse("a\nb").unwrap(), 2);
//! ```

use crate::error::MarkerError;

/// A generic trait for parsing data into a strongly-typed Rust structure.
///
/// Implementors should validate the input and return a domain-specific type
/// or a [`MarkerError`] on failure.
///
/// # Type Parameters
///
/// * `Input` - The input type to be parsed.
/// * `Output` - The output type produced by the parser.
pub trait Parser<Input, Output> {
    /// Parse an input value into the target type.
    ///
    /// # Errors
    ///
    /// Returns a [`MarkerError`] if the input does not conform to the expected schema
    /// or cannot be parsed.
    fn parse(&self, input: Input) -> Result<Output, MarkerError>;
}
