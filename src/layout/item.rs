use serde::{Deserialize, Serialize};

use crate::geometry::{Edges, Size};

use super::config::Direction;
use super::edges::deserialize_edges;

/// Capability a child exposes so the engine can read its measured size.
///
/// The engine never measures anything itself; collaborators implement this
/// for whatever component type they lay out.
pub trait Measurable {
    fn measured_size(&self) -> Size;
}

impl Measurable for Size {
    fn measured_size(&self) -> Size {
        *self
    }
}

impl<T: Measurable + ?Sized> Measurable for &T {
    fn measured_size(&self) -> Size {
        (**self).measured_size()
    }
}

/// How an item's primary size is decided for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeHint {
    /// Configured size; wins over flex and the measured size.
    Explicit(i32),
    /// Share of the leftover primary space, by weight.
    Flexible(f64),
    /// Measured size along the primary axis.
    Natural(i32),
}

/// Input description of one child.
///
/// Sizes are kept per physical dimension so the same item can sit in either
/// a row or a column; [`BoxItem::size_hint`] picks the primary one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxItem {
    pub natural: Size,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub flex: f64,
    pub min_width: Option<i32>,
    pub max_width: Option<i32>,
    pub min_height: Option<i32>,
    pub max_height: Option<i32>,
    #[serde(deserialize_with = "deserialize_edges")]
    pub margins: Edges,
}

impl BoxItem {
    pub fn new(natural: Size) -> Self {
        Self {
            natural,
            ..Self::default()
        }
    }

    /// Snapshot a child's measured size through its capability.
    pub fn measure<M: Measurable + ?Sized>(source: &M) -> Self {
        Self::new(source.measured_size())
    }

    pub fn with_flex(mut self, flex: f64) -> Self {
        self.flex = flex;
        self
    }

    pub fn with_width(mut self, width: i32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: i32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_min_width(mut self, min: i32) -> Self {
        self.min_width = Some(min);
        self
    }

    pub fn with_max_width(mut self, max: i32) -> Self {
        self.max_width = Some(max);
        self
    }

    pub fn with_min_height(mut self, min: i32) -> Self {
        self.min_height = Some(min);
        self
    }

    pub fn with_max_height(mut self, max: i32) -> Self {
        self.max_height = Some(max);
        self
    }

    pub fn with_margins(mut self, margins: Edges) -> Self {
        self.margins = margins;
        self
    }

    pub fn is_flexible(&self) -> bool {
        self.flex > 0.0 && self.flex.is_finite()
    }

    /// Resolve the explicit > flex > natural precedence for `direction`.
    pub fn size_hint(&self, direction: Direction) -> SizeHint {
        let explicit = match direction {
            Direction::Row => self.width,
            Direction::Column => self.height,
        };

        match explicit {
            Some(size) => SizeHint::Explicit(size.max(0)),
            None if self.is_flexible() => SizeHint::Flexible(self.flex),
            None => SizeHint::Natural(direction.major(self.natural).max(0)),
        }
    }

    pub fn min_main(&self, direction: Direction) -> Option<i32> {
        match direction {
            Direction::Row => self.min_width,
            Direction::Column => self.min_height,
        }
    }

    pub fn max_main(&self, direction: Direction) -> Option<i32> {
        match direction {
            Direction::Row => self.max_width,
            Direction::Column => self.max_height,
        }
    }

    /// Cross size the item asks for before alignment.
    pub fn cross_size(&self, direction: Direction) -> i32 {
        let explicit = match direction {
            Direction::Row => self.height,
            Direction::Column => self.width,
        };
        explicit
            .unwrap_or_else(|| direction.minor(self.natural))
            .max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Panel {
        width: i32,
        height: i32,
    }

    impl Measurable for Panel {
        fn measured_size(&self) -> Size {
            Size::new(self.width, self.height)
        }
    }

    #[test]
    fn measure_reads_capability() {
        let panel = Panel {
            width: 12,
            height: 30,
        };
        assert_eq!(BoxItem::measure(&panel).natural, Size::new(12, 30));
    }

    #[test]
    fn explicit_size_beats_flex() {
        let item = BoxItem::new(Size::new(10, 10))
            .with_flex(3.0)
            .with_width(250);
        assert_eq!(item.size_hint(Direction::Row), SizeHint::Explicit(250));
        assert_eq!(item.size_hint(Direction::Column), SizeHint::Flexible(3.0));
    }

    #[test]
    fn non_positive_flex_falls_back_to_natural() {
        let item = BoxItem::new(Size::new(15, 20)).with_flex(0.0);
        assert_eq!(item.size_hint(Direction::Row), SizeHint::Natural(15));

        let negative = BoxItem::new(Size::new(15, 20)).with_flex(-2.0);
        assert_eq!(negative.size_hint(Direction::Column), SizeHint::Natural(20));
    }

    #[test]
    fn cross_size_prefers_explicit_dimension() {
        let item = BoxItem::new(Size::new(10, 40)).with_height(25);
        assert_eq!(item.cross_size(Direction::Row), 25);
        assert_eq!(item.cross_size(Direction::Column), 10);
    }

    #[test]
    fn deserializes_with_shorthand_margins() {
        let item: BoxItem = serde_json::from_str(
            r#"{"natural":{"width":10,"height":10},"flex":1,"min_width":40,"margins":"0 10"}"#,
        )
        .unwrap();
        assert!(item.is_flexible());
        assert_eq!(item.min_main(Direction::Row), Some(40));
        assert_eq!(item.margins, Edges::new(0, 10, 0, 10));
    }
}
