//! Test-Run Report Parser
//!
//! This module provides the [`TestRunParser`] for turning an NUnit-style `test-run`
//! XML document into a [`ReportOutcomeMap`]: one entry per test case, 1 when the
//! case passed and 0 for every other result label.
//!
//! # Document Shape
//!
//! Test cases are read from a fixed structural depth. With the default depth of
//! three nested suites the parser looks at exactly:
//!
//! ```text
//! test-run
//! └── test-suite        (assembly)
//!     └── test-suite    (namespace)
//!         └── test-suite    (fixture)
//!             └── test-case fullname="..." result="Passed|Failed|Skipped|..."
//! ```
//!
//! Cases at any other depth are ignored. The depth is a contract with the report
//! generator; use [`TestRunParser::with_suite_depth`] when its nesting differs.
//!
//! # Error Handling
//!
//! - Not well-formed XML, or bytes that are not UTF-8: [`MarkerError::MalformedReport`].
//! - A test case without a non-empty `fullname` or without `result`: [`MarkerError::MissingAttribute`].
//! - The same `fullname` twice in one document: [`MarkerError::DuplicateTestCase`].
//!
//! A document with no test cases at the expected depth (including one whose root
//! is not `test-run`) yields an empty map rather than an error.

use crate::error::MarkerError;
use crate::traits::parser::Parser;
use crate::types::ReportOutcomeMap;
use roxmltree::{Document, Node};

/// Number of `test-suite` levels the default report generator emits.
pub const DEFAULT_SUITE_DEPTH: usize = 3;

/// The only result label that counts as a pass. Compared case-sensitively.
const PASSED: &str = "Passed";

/// Parser for `test-run` XML reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestRunParser {
    suite_depth: usize,
}

impl Default for TestRunParser {
    fn default() -> Self {
        Self {
            suite_depth: DEFAULT_SUITE_DEPTH,
        }
    }
}

impl TestRunParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read test cases from below `depth` nested `test-suite` elements.
    pub fn with_suite_depth(depth: usize) -> Self {
        Self { suite_depth: depth }
    }

    /// Parse raw report bytes as fetched from a store.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError::MalformedReport`] if the bytes are not UTF-8, plus
    /// everything [`Parser::parse`] can return.
    pub fn parse_bytes(&self, raw: &[u8]) -> Result<ReportOutcomeMap, MarkerError> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| MarkerError::MalformedReport(format!("report is not UTF-8: {e}")))?;
        self.parse(text)
    }

    /// Walk `suite_depth` levels of `test-suite` children below `root`.
    fn suites_at_depth<'a, 'input>(&self, root: Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
        let mut level = vec![root];
        for _ in 0..self.suite_depth {
            level = level
                .iter()
                .flat_map(|node| node.children().filter(|c| c.has_tag_name("test-suite")))
                .collect();
            if level.is_empty() {
                break;
            }
        }
        level
    }
}

impl<'a> Parser<&'a str, ReportOutcomeMap> for TestRunParser {
    /// Parses a `test-run` document into a [`ReportOutcomeMap`].
    fn parse(&self, raw: &'a str) -> Result<ReportOutcomeMap, MarkerError> {
        let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        let doc = Document::parse(text).map_err(|e| MarkerError::MalformedReport(e.to_string()))?;

        let mut outcomes = ReportOutcomeMap::new();
        let root = doc.root_element();
        if !root.has_tag_name("test-run") {
            return Ok(outcomes);
        }

        let cases = self
            .suites_at_depth(root)
            .into_iter()
            .flat_map(|suite| suite.children().filter(|c| c.has_tag_name("test-case")));

        for case in cases {
            let name = case
                .attribute("fullname")
                .filter(|n| !n.trim().is_empty())
                .ok_or_else(|| MarkerError::MissingAttribute("fullname".to_string()))?;
            let result = case
                .attribute("result")
                .ok_or_else(|| MarkerError::MissingAttribute("result".to_string()))?;

            let outcome = u8::from(result == PASSED);
            if outcomes.insert(name.to_string(), outcome).is_some() {
                return Err(MarkerError::DuplicateTestCase(name.to_string()));
            }
        }

        Ok(outcomes)
    }
}
