//! Cross-axis placement of a single child.

use super::config::Align;

/// Cross-axis space shared by every child of one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossSlot {
    /// Leading cross padding of the container.
    pub origin: i32,
    /// Cross extent inside the container's padding.
    pub extent: i32,
    /// Largest natural cross size (margins included) among the children.
    pub max_cross: i32,
}

/// Solved cross offset and size of one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossPlacement {
    pub offset: i32,
    pub size: i32,
}

/// Position one child on the cross axis.
///
/// `middle` may produce a negative offset when the child is larger than the
/// slot; it is never clamped. Sizes are clamped at zero.
pub fn align_cross(
    align: Align,
    slot: CrossSlot,
    natural: i32,
    margin_leading: i32,
    margin_trailing: i32,
) -> CrossPlacement {
    let offset = slot.origin.saturating_add(margin_leading);
    let margins = margin_leading.saturating_add(margin_trailing);

    match align {
        Align::Start => CrossPlacement {
            offset,
            size: natural,
        },
        Align::Middle => {
            let room = slot.extent.saturating_sub(margins).saturating_sub(natural);
            CrossPlacement {
                offset: offset.saturating_add(room.div_euclid(2)),
                size: natural,
            }
        }
        Align::Stretch => CrossPlacement {
            offset,
            size: slot.extent.saturating_sub(margins).max(0),
        },
        Align::StretchMax => CrossPlacement {
            offset,
            size: slot.max_cross.saturating_sub(margins).max(0),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> CrossSlot {
        CrossSlot {
            origin: 5,
            extent: 100,
            max_cross: 40,
        }
    }

    #[test]
    fn start_keeps_natural_size() {
        let placed = align_cross(Align::Start, slot(), 30, 2, 3);
        assert_eq!(placed, CrossPlacement { offset: 7, size: 30 });
    }

    #[test]
    fn middle_centers_inside_margins() {
        // room = 100 - 4 - 30 = 66, half = 33
        let placed = align_cross(Align::Middle, slot(), 30, 2, 2);
        assert_eq!(placed, CrossPlacement { offset: 40, size: 30 });
    }

    #[test]
    fn middle_floors_odd_room() {
        let placed = align_cross(Align::Middle, slot(), 31, 0, 0);
        assert_eq!(placed.offset, 5 + 34);
    }

    #[test]
    fn middle_allows_negative_offset() {
        let slot = CrossSlot {
            origin: 0,
            extent: 10,
            max_cross: 0,
        };
        let placed = align_cross(Align::Middle, slot, 25, 0, 0);
        assert_eq!(placed, CrossPlacement { offset: -8, size: 25 });
    }

    #[test]
    fn stretch_fills_extent_minus_margins() {
        let placed = align_cross(Align::Stretch, slot(), 10, 4, 6);
        assert_eq!(placed, CrossPlacement { offset: 9, size: 90 });
    }

    #[test]
    fn stretchmax_uses_shared_max() {
        let placed = align_cross(Align::StretchMax, slot(), 10, 0, 0);
        assert_eq!(placed.size, 40);
        let with_margins = align_cross(Align::StretchMax, slot(), 10, 5, 5);
        assert_eq!(with_margins.size, 30);
    }

    #[test]
    fn sizes_never_go_negative() {
        let tiny = CrossSlot {
            origin: 0,
            extent: 4,
            max_cross: 2,
        };
        assert_eq!(align_cross(Align::Stretch, tiny, 10, 3, 3).size, 0);
        assert_eq!(align_cross(Align::StretchMax, tiny, 10, 3, 3).size, 0);
    }
}
