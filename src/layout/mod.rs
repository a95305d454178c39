//! Layout module orchestrator.
//!
//! Downstream crates import layout types from here while the box solver
//! lives in the private `core` module.

mod align;
mod config;
mod core;
mod edges;
pub mod grid;
mod item;
mod sizing;

pub use align::{CrossPlacement, CrossSlot, align_cross};
pub use config::{Align, Direction, LayoutConfig, LayoutConfigSpec, Pack};
pub use self::core::{BoxLayout, LayoutMeta, LayoutResult, calculate_child_boxes};
pub use edges::{EdgeSpec, parse_edges};
pub use grid::{
    CellGrid, CellPlacement, CellPosition, CellSpan, GridError, TableLayout, TablePlan,
};
pub use item::{BoxItem, Measurable, SizeHint};
pub use sizing::{SizeTarget, update_inner_extent};
