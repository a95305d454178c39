//! Flexible box layout engine.
//!
//! Given an ordered list of children with size hints, min/max limits, flex
//! weights and margins, [`BoxLayout`] solves every child's box along one
//! primary axis (row or column) and aligns it on the cross axis. A separate
//! [`CellGrid`] allocator places table cells row-major with column and row
//! spans.
//!
//! ```
//! use boxflow::{BoxItem, BoxLayout, Size};
//!
//! let items: Vec<_> = [1.0, 2.0, 3.0, 4.0]
//!     .into_iter()
//!     .map(|flex| BoxItem::new(Size::new(10, 10)).with_flex(flex))
//!     .collect();
//! let result = BoxLayout::hbox().calculate_child_boxes(&items, Size::new(400, 100));
//! let widths: Vec<_> = result.boxes.iter().map(|b| b.width).collect();
//! assert_eq!(widths, vec![40, 80, 120, 160]);
//! ```

pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;

pub use error::{LayoutError, Result};
pub use geometry::{Edges, Rect, Size};
pub use layout::{
    Align, BoxItem, BoxLayout, CellGrid, CellPlacement, CellPosition, CellSpan, Direction,
    EdgeSpec, GridError, LayoutConfig, LayoutMeta, LayoutResult, Measurable, Pack, SizeHint,
    SizeTarget, TableLayout, TablePlan, calculate_child_boxes, parse_edges, update_inner_extent,
};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{LayoutMetrics, MetricSnapshot};
