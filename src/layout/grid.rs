//! Table-style cell allocation.
//!
//! Items are placed row-major into a fixed number of columns. A cursor
//! walks forward through the grid and never moves back, so a cell skipped
//! because a wide item wrapped stays empty for the rest of the pass.
//!
//! # Example
//! ```
//! use boxflow::layout::grid::{CellGrid, CellPosition};
//!
//! let mut grid = CellGrid::new(2)?;
//! assert_eq!(grid.place_item(1)?, CellPosition::new(0, 0));
//! assert_eq!(grid.place_item(1)?, CellPosition::new(0, 1));
//! assert_eq!(grid.place_item(2)?, CellPosition::new(1, 0));
//! # Ok::<(), boxflow::layout::grid::GridError>(())
//! ```

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Result;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::LayoutMetrics;

const LOG_TARGET: &str = "boxflow::table";

/// Errors raised while allocating cells.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("table layout needs at least one column")]
    ZeroColumns,
    #[error("cell span {cols}x{rows} covers no cells")]
    EmptySpan { cols: usize, rows: usize },
    #[error("span of {span} columns does not fit in {columns} columns")]
    SpanTooWide { span: usize, columns: usize },
    #[error("placement needs {needed} rows, limit is {limit}")]
    RowLimit { needed: usize, limit: usize },
}

pub type GridResult<T> = std::result::Result<T, GridError>;

/// Number of columns and rows an item covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellSpan {
    pub cols: usize,
    pub rows: usize,
}

impl CellSpan {
    pub const SINGLE: CellSpan = CellSpan::new(1, 1);

    pub const fn new(cols: usize, rows: usize) -> Self {
        Self { cols, rows }
    }

    pub const fn cols(cols: usize) -> Self {
        Self::new(cols, 1)
    }
}

impl Default for CellSpan {
    fn default() -> Self {
        Self::SINGLE
    }
}

/// Top-left anchor of a placed item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Row-major occupancy grid, grown lazily one row at a time.
///
/// Rows are capped at `max_rows` so a bogus row span cannot allocate an
/// unbounded grid.
#[derive(Debug, Clone)]
pub struct CellGrid {
    columns: usize,
    max_rows: usize,
    cells: Vec<Vec<bool>>,
    cursor: CellPosition,
}

impl CellGrid {
    pub const DEFAULT_MAX_ROWS: usize = 65_536;

    pub fn new(columns: usize) -> GridResult<Self> {
        if columns == 0 {
            return Err(GridError::ZeroColumns);
        }
        Ok(Self {
            columns,
            max_rows: Self::DEFAULT_MAX_ROWS,
            cells: Vec::new(),
            cursor: CellPosition::default(),
        })
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Rows allocated so far.
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Place a single-row item spanning `span_cols` columns.
    pub fn place_item(&mut self, span_cols: usize) -> GridResult<CellPosition> {
        self.place(CellSpan::cols(span_cols))
    }

    /// Place an item, marking every cell it covers, and return its anchor.
    pub fn place(&mut self, span: CellSpan) -> GridResult<CellPosition> {
        if span.cols == 0 || span.rows == 0 {
            return Err(GridError::EmptySpan {
                cols: span.cols,
                rows: span.rows,
            });
        }
        if span.cols > self.columns {
            return Err(GridError::SpanTooWide {
                span: span.cols,
                columns: self.columns,
            });
        }

        if span.rows > self.max_rows {
            return Err(GridError::RowLimit {
                needed: span.rows,
                limit: self.max_rows,
            });
        }

        let anchor = self.next_free(span);
        match anchor.row.checked_add(span.rows) {
            Some(needed) if needed <= self.max_rows => {}
            needed => {
                return Err(GridError::RowLimit {
                    needed: needed.unwrap_or(usize::MAX),
                    limit: self.max_rows,
                });
            }
        }
        self.mark(anchor, span);
        self.cursor = CellPosition::new(anchor.row, anchor.col + span.cols);
        Ok(anchor)
    }

    fn next_free(&self, span: CellSpan) -> CellPosition {
        let CellPosition { mut row, mut col } = self.cursor;
        loop {
            if col + span.cols > self.columns {
                row += 1;
                col = 0;
            } else if self.is_free(row, col, span) {
                return CellPosition::new(row, col);
            } else {
                col += 1;
            }
        }
    }

    fn is_free(&self, row: usize, col: usize, span: CellSpan) -> bool {
        (row..row.saturating_add(span.rows))
            .all(|r| (col..col + span.cols).all(|c| !self.is_occupied(r, c)))
    }

    fn mark(&mut self, anchor: CellPosition, span: CellSpan) {
        let columns = self.columns;
        let last_row = anchor.row + span.rows;
        if self.cells.len() < last_row {
            self.cells.resize_with(last_row, || vec![false; columns]);
        }
        for row in &mut self.cells[anchor.row..last_row] {
            for cell in &mut row[anchor.col..anchor.col + span.cols] {
                *cell = true;
            }
        }
    }
}

/// Where one item landed in a table pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellPlacement {
    pub position: CellPosition,
    pub span: CellSpan,
}

/// Placements for a whole table, in item order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TablePlan {
    pub placements: Vec<CellPlacement>,
    pub rows: usize,
}

/// Table layout with a fixed column count.
///
/// Each call to [`TableLayout::layout`] starts from an empty grid.
#[derive(Clone)]
pub struct TableLayout {
    columns: usize,
    max_rows: usize,
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<LayoutMetrics>>>,
}

impl TableLayout {
    pub fn new(columns: usize) -> Result<Self> {
        if columns == 0 {
            return Err(GridError::ZeroColumns.into());
        }
        Ok(Self {
            columns,
            max_rows: CellGrid::DEFAULT_MAX_ROWS,
            logger: None,
            metrics: None,
        })
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Mutex<LayoutMetrics>>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Cap the rows a single pass may allocate.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn layout(&self, spans: &[CellSpan]) -> Result<TablePlan> {
        let mut grid = CellGrid::new(self.columns)?.with_max_rows(self.max_rows);
        let placements = spans
            .iter()
            .map(|&span| {
                grid.place(span)
                    .map(|position| CellPlacement { position, span })
            })
            .collect::<GridResult<Vec<_>>>()?;

        if let Some(metrics) = &self.metrics
            && let Ok(mut metrics) = metrics.lock()
        {
            metrics.record_pass(spans.len());
            metrics.record_cells(placements.len());
        }
        if let Some(logger) = &self.logger {
            let _ = logger.log_event(event_with_fields(
                LogLevel::Trace,
                LOG_TARGET,
                "table.pass",
                [
                    json_kv("items", spans.len()),
                    json_kv("columns", self.columns),
                    json_kv("rows", grid.rows()),
                ],
            ));
        }

        Ok(TablePlan {
            placements,
            rows: grid.rows(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::logging::MemorySink;

    #[test]
    fn zero_columns_rejected() {
        assert_eq!(CellGrid::new(0).unwrap_err(), GridError::ZeroColumns);
        assert!(matches!(
            TableLayout::new(0),
            Err(LayoutError::Grid(GridError::ZeroColumns))
        ));
    }

    #[test]
    fn colspan_row_fills_second_row() {
        let mut grid = CellGrid::new(2).unwrap();
        grid.place_item(1).unwrap();
        grid.place_item(1).unwrap();
        let anchor = grid.place_item(2).unwrap();

        assert_eq!(anchor, CellPosition::new(1, 0));
        assert_eq!(grid.rows(), 2);
        assert!(grid.is_occupied(0, 0));
        assert!(grid.is_occupied(0, 1));
        assert!(grid.is_occupied(1, 0));
        assert!(grid.is_occupied(1, 1));
    }

    #[test]
    fn wide_item_wraps_instead_of_splitting() {
        let mut grid = CellGrid::new(3).unwrap();
        assert_eq!(grid.place_item(1).unwrap(), CellPosition::new(0, 0));
        assert_eq!(grid.place_item(1).unwrap(), CellPosition::new(0, 1));
        assert_eq!(grid.place_item(2).unwrap(), CellPosition::new(1, 0));
        assert!(!grid.is_occupied(0, 2));

        // The skipped cell is never reclaimed.
        assert_eq!(grid.place_item(1).unwrap(), CellPosition::new(1, 2));
        assert_eq!(grid.place_item(1).unwrap(), CellPosition::new(2, 0));
        assert!(!grid.is_occupied(0, 2));
    }

    #[test]
    fn row_span_reserves_cells_below() {
        let mut grid = CellGrid::new(3).unwrap();
        assert_eq!(grid.place(CellSpan::new(1, 2)).unwrap(), CellPosition::new(0, 0));
        grid.place_item(1).unwrap();
        grid.place_item(1).unwrap();

        // (1, 0) is held by the row span.
        assert_eq!(grid.place_item(1).unwrap(), CellPosition::new(1, 1));
        assert_eq!(grid.place_item(2).unwrap(), CellPosition::new(2, 0));
    }

    #[test]
    fn span_must_fit_every_covered_row() {
        let mut grid = CellGrid::new(2).unwrap();
        grid.place(CellSpan::new(1, 1)).unwrap();
        grid.place(CellSpan::new(1, 3)).unwrap();
        // Column 1 is taken for rows 0..3, so a 2-wide item lands on row 3.
        assert_eq!(grid.place_item(1).unwrap(), CellPosition::new(1, 0));
        assert_eq!(grid.place_item(2).unwrap(), CellPosition::new(3, 0));
    }

    #[test]
    fn invalid_spans_rejected() {
        let mut grid = CellGrid::new(2).unwrap();
        assert_eq!(
            grid.place_item(3).unwrap_err(),
            GridError::SpanTooWide {
                span: 3,
                columns: 2
            }
        );
        assert_eq!(
            grid.place(CellSpan::new(1, 0)).unwrap_err(),
            GridError::EmptySpan { cols: 1, rows: 0 }
        );
        assert_eq!(grid.rows(), 0);
    }

    #[test]
    fn huge_row_span_rejected_without_allocating() {
        let mut grid = CellGrid::new(2).unwrap();
        assert_eq!(
            grid.place(CellSpan::new(1, usize::MAX)).unwrap_err(),
            GridError::RowLimit {
                needed: usize::MAX,
                limit: CellGrid::DEFAULT_MAX_ROWS
            }
        );
        assert_eq!(grid.rows(), 0);
        assert_eq!(grid.place_item(2).unwrap(), CellPosition::new(0, 0));
    }

    #[test]
    fn placements_stop_at_row_limit() {
        let mut grid = CellGrid::new(1).unwrap().with_max_rows(2);
        grid.place_item(1).unwrap();
        assert_eq!(
            grid.place(CellSpan::new(1, 2)).unwrap_err(),
            GridError::RowLimit { needed: 3, limit: 2 }
        );
        assert_eq!(grid.place_item(1).unwrap(), CellPosition::new(1, 0));
        assert_eq!(
            grid.place_item(1).unwrap_err(),
            GridError::RowLimit { needed: 3, limit: 2 }
        );
        assert_eq!(grid.rows(), 2);
    }

    #[test]
    fn table_layout_rejects_oversized_row_span_from_json() {
        let spans: Vec<CellSpan> = serde_json::from_str(r#"[{"rows":1099511627776}]"#).unwrap();
        assert!(matches!(
            TableLayout::new(3).unwrap().layout(&spans),
            Err(LayoutError::Grid(GridError::RowLimit { .. }))
        ));

        let capped = TableLayout::new(1).unwrap().with_max_rows(1);
        assert!(matches!(
            capped.layout(&[CellSpan::SINGLE, CellSpan::SINGLE]),
            Err(LayoutError::Grid(GridError::RowLimit { needed: 2, limit: 1 }))
        ));
    }

    #[test]
    fn table_layout_starts_fresh_each_pass() {
        let table = TableLayout::new(2).unwrap();
        let spans = [CellSpan::SINGLE, CellSpan::SINGLE, CellSpan::cols(2)];

        let first = table.layout(&spans).unwrap();
        let second = table.layout(&spans).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.rows, 2);
        assert_eq!(
            first
                .placements
                .iter()
                .map(|p| p.position)
                .collect::<Vec<_>>(),
            vec![
                CellPosition::new(0, 0),
                CellPosition::new(0, 1),
                CellPosition::new(1, 0)
            ]
        );
    }

    #[test]
    fn table_layout_reports_errors_and_diagnostics() {
        let sink = Arc::new(MemorySink::new());
        let metrics = Arc::new(Mutex::new(LayoutMetrics::new()));
        let table = TableLayout::new(2)
            .unwrap()
            .with_logger(Logger::from_shared(sink.clone()))
            .with_metrics(Arc::clone(&metrics));

        let spans: Vec<CellSpan> = serde_json::from_str(r#"[{}, {"cols":2}, {"rows":2}]"#).unwrap();
        let plan = table.layout(&spans).unwrap();
        assert_eq!(plan.rows, 4);
        assert_eq!(plan.placements[2].position, CellPosition::new(2, 0));

        assert!(matches!(
            table.layout(&[CellSpan::cols(5)]),
            Err(LayoutError::Grid(GridError::SpanTooWide { .. }))
        ));

        assert_eq!(sink.messages(), vec!["table.pass"]);
        assert_eq!(sink.events()[0].field("rows"), Some(&serde_json::json!(4)));
        let snapshot = metrics.lock().unwrap().snapshot();
        assert_eq!(snapshot.passes, 1);
        assert_eq!(snapshot.cells_placed, 3);
    }
}
