//! # Marksheet Module
//!
//! Turns an [`AggregationResult`] into a dense students × tests table and
//! renders it as a spreadsheet.
//!
//! ## Layout
//!
//! | Email | Total | T1 | T2 | T3 |
//! |---|---|---|---|---|
//! | alice@x.edu | 3 | 2 | 0 | 1 |
//! | bob@x.edu | 1 | 0 | 1 | 0 |
//!
//! - Test columns are the union of every student's test names, sorted ascending.
//! - A student with no entry for a test gets `0` in that cell, never a blank.
//! - Row order follows the aggregation (first encounter) unless
//!   [`RowOrder::Identity`] is requested.

use crate::error::MarkerError;
use crate::types::AggregationResult;
use crate::writers::xlsx::{self, Cell};
use serde::Serialize;

/// Name of the single worksheet in every rendered marksheet.
pub const SHEET_NAME: &str = "Marks";

const EMAIL_HEADER: &str = "Email";
const TOTAL_HEADER: &str = "Total";

/// How data rows are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowOrder {
    /// Keep the order students were first seen during aggregation.
    #[default]
    FirstSeen,
    /// Sort rows by identity, ascending.
    Identity,
}

impl RowOrder {
    pub fn from_sort_flag(sort_rows: bool) -> Self {
        if sort_rows {
            RowOrder::Identity
        } else {
            RowOrder::FirstSeen
        }
    }
}

/// One student's row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarksheetRow {
    pub identity: String,
    pub total: u32,
    /// One score per entry of [`Marksheet::tests`], in the same order.
    pub scores: Vec<u32>,
}

/// The rendered table, before serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Marksheet {
    /// Test column names, ascending.
    pub tests: Vec<String>,
    pub rows: Vec<MarksheetRow>,
}

impl Marksheet {
    /// Build the dense table from aggregated scores.
    pub fn from_aggregation(result: &AggregationResult) -> Self {
        let tests = result.test_catalog();
        let rows = result
            .iter()
            .map(|record| MarksheetRow {
                identity: record.identity.clone(),
                total: record.total(),
                scores: tests.iter().map(|t| record.score(t)).collect(),
            })
            .collect();
        Self { tests, rows }
    }

    /// Re-order the data rows.
    pub fn ordered(mut self, order: RowOrder) -> Self {
        if order == RowOrder::Identity {
            self.rows.sort_by(|a, b| a.identity.cmp(&b.identity));
        }
        self
    }

    /// Header row: `Email`, `Total`, then every test name.
    pub fn header(&self) -> Vec<String> {
        [EMAIL_HEADER, TOTAL_HEADER]
            .into_iter()
            .map(str::to_string)
            .chain(self.tests.iter().cloned())
            .collect()
    }

    /// Header plus data rows as spreadsheet cells.
    fn cells(&self) -> Vec<Vec<Cell>> {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(self.header().into_iter().map(Cell::Text).collect());
        for row in &self.rows {
            let mut cells = Vec::with_capacity(self.tests.len() + 2);
            cells.push(Cell::Text(row.identity.clone()));
            cells.push(Cell::Int(row.total));
            cells.extend(row.scores.iter().copied().map(Cell::Int));
            grid.push(cells);
        }
        grid
    }

    /// Serialize to an `.xlsx` package with one worksheet named [`SHEET_NAME`].
    ///
    /// # Errors
    ///
    /// Returns [`MarkerError::SerializationFailure`] when the package cannot be written.
    pub fn to_xlsx(&self) -> Result<Vec<u8>, MarkerError> {
        xlsx::write_single_sheet(SHEET_NAME, &self.cells())
    }
}
