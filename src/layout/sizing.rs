//! Post-layout sizing of the inner wrapping region.

use crate::geometry::Size;

use super::config::{Align, LayoutConfig};
use super::core::{BoxLayout, LayoutResult};

/// Rendering region that can take a computed size.
///
/// Implemented by the owning container; the engine itself only returns data.
pub trait SizeTarget {
    fn apply_computed_size(&mut self, size: Size);
}

/// Size the inner region must take so aligned content is not clipped.
///
/// The primary dimension passes through. On the cross axis the region wraps
/// the tallest child plus cross padding; `stretch` keeps the container's own
/// cross size and `middle` never shrinks below it.
pub fn update_inner_extent(config: &LayoutConfig, last_size: Size, result: &LayoutResult) -> Size {
    let direction = config.direction;
    let container_cross = direction.minor(last_size);
    let wrapped = result
        .meta
        .max_cross_size
        .saturating_add(direction.cross_edges(&config.padding));

    let cross = match config.align {
        Align::Stretch => container_cross,
        Align::Middle => container_cross.max(wrapped),
        Align::Start | Align::StretchMax => wrapped,
    };

    let (width, height) = direction.pack(direction.major(last_size), cross);
    Size::new(width, height)
}

impl BoxLayout {
    pub fn update_inner_extent(&self, last_size: Size, result: &LayoutResult) -> Size {
        update_inner_extent(self.config(), last_size, result)
    }

    /// Compute the inner extent and push it into `target`.
    pub fn apply_inner_extent<T: SizeTarget + ?Sized>(
        &self,
        target: &mut T,
        last_size: Size,
        result: &LayoutResult,
    ) -> Size {
        let size = self.update_inner_extent(last_size, result);
        target.apply_computed_size(size);
        size
    }
}
