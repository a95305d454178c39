use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::json;

use crate::geometry::{Rect, Size};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::LayoutMetrics;

use super::align::{CrossSlot, align_cross};
use super::config::{Direction, LayoutConfig, Pack};
use super::item::{BoxItem, SizeHint};

const LOG_TARGET: &str = "boxflow::layout";

/// Aggregate data reported alongside the boxes of one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LayoutMeta {
    /// Largest natural cross size (cross margins included) among the items.
    pub max_cross_size: i32,
}

/// Output of one layout pass: one box per item, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LayoutResult {
    pub boxes: Vec<Rect>,
    pub meta: LayoutMeta,
}

/// Box layout calculator for a single container.
///
/// Holds only its configuration plus optional diagnostics handles; every
/// pass is computed from scratch, so one instance can serve nested or
/// concurrent containers.
#[derive(Clone, Default)]
pub struct BoxLayout {
    config: LayoutConfig,
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<LayoutMetrics>>>,
}

impl BoxLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            logger: None,
            metrics: None,
        }
    }

    /// Horizontal box layout with default settings.
    pub fn hbox() -> Self {
        Self::new(LayoutConfig::row())
    }

    /// Vertical box layout with default settings.
    pub fn vbox() -> Self {
        Self::new(LayoutConfig::column())
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Mutex<LayoutMetrics>>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(LayoutMetrics::new())));
        }
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<LayoutMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Compute every child's box inside a container of `container` size.
    pub fn calculate_child_boxes(&self, items: &[BoxItem], container: Size) -> LayoutResult {
        let solved = solve(items, container, &self.config);
        self.record(items.len(), container, &solved);
        solved.result
    }

    fn record(&self, item_count: usize, container: Size, solved: &Solved) {
        if let Some(metrics) = &self.metrics
            && let Ok(mut metrics) = metrics.lock()
        {
            metrics.record_pass(item_count);
            if let Some(shortfall) = solved.shortfall {
                metrics.record_shortfall(shortfall.overflow() > 0);
            }
        }

        let Some(logger) = &self.logger else {
            return;
        };

        let _ = logger.log_event(event_with_fields(
            LogLevel::Trace,
            LOG_TARGET,
            "layout.pass",
            [
                json_kv("items", item_count),
                json_kv("direction", json!(format!("{:?}", self.config.direction))),
                json_kv("width", container.width),
                json_kv("height", container.height),
                json_kv("align", self.config.align.to_string()),
                json_kv("pack", self.config.pack.to_string()),
            ],
        ));

        if let Some(shortfall) = solved.shortfall {
            let _ = logger.log_event(event_with_fields(
                LogLevel::Debug,
                LOG_TARGET,
                "layout.shortfall",
                [
                    json_kv("deficit", shortfall.deficit),
                    json_kv("shrinkable", shortfall.headroom),
                ],
            ));
            if shortfall.overflow() > 0 {
                let _ = logger.log_event(event_with_fields(
                    LogLevel::Debug,
                    LOG_TARGET,
                    "layout.overflow",
                    [json_kv("overflow", shortfall.overflow())],
                ));
            }
        }
    }
}

/// Pure form of [`BoxLayout::calculate_child_boxes`].
pub fn calculate_child_boxes(
    items: &[BoxItem],
    container: Size,
    config: &LayoutConfig,
) -> LayoutResult {
    solve(items, container, config).result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Shortfall {
    deficit: i64,
    headroom: i64,
}

impl Shortfall {
    fn overflow(&self) -> i64 {
        (self.deficit - self.headroom).max(0)
    }
}

struct Solved {
    result: LayoutResult,
    shortfall: Option<Shortfall>,
}

fn solve(items: &[BoxItem], container: Size, config: &LayoutConfig) -> Solved {
    if items.is_empty() {
        return Solved {
            result: LayoutResult::default(),
            shortfall: None,
        };
    }

    let direction = config.direction;
    let padding = &config.padding;
    let available =
        direction.major(container) as i64 - direction.main_edges(padding) as i64;

    let mut segments = build_segments(items, direction);
    let margin_total: i64 = segments.iter().map(Segment::margins).sum();
    let fixed_total: i64 = segments
        .iter()
        .filter(|segment| !segment.is_flexible())
        .map(|segment| segment.length)
        .sum();

    distribute_flex(&mut segments, available - fixed_total - margin_total);

    let mut used: i64 = segments.iter().map(|s| s.length).sum::<i64>() + margin_total;
    let mut shortfall = None;
    if used > available {
        shortfall = Some(shrink_segments(&mut segments, used - available));
        used = segments.iter().map(|s| s.length).sum::<i64>() + margin_total;
    }

    let max_cross_size = items
        .iter()
        .map(|item| {
            item.cross_size(direction)
                .saturating_add(direction.cross_edges(&item.margins))
        })
        .max()
        .unwrap_or(0);

    let slot = CrossSlot {
        origin: direction.cross_leading(padding),
        extent: direction
            .minor(container)
            .saturating_sub(direction.cross_edges(padding)),
        max_cross: max_cross_size,
    };

    let mut cursor = direction.leading(padding) as i64 + pack_offset(config.pack, available, used);
    let boxes = items
        .iter()
        .zip(&segments)
        .map(|(item, segment)| {
            cursor += segment.margin_leading;
            let main_offset = cursor;
            cursor += segment.length + segment.margin_trailing;

            let cross = align_cross(
                config.align,
                slot,
                item.cross_size(direction),
                direction.cross_leading(&item.margins),
                direction.cross_trailing(&item.margins),
            );

            let (left, top) = direction.pack(clamp_i32(main_offset), cross.offset);
            let (width, height) = direction.pack(clamp_i32(segment.length), cross.size);
            Rect::new(left, top, width, height)
        })
        .collect();

    Solved {
        result: LayoutResult {
            boxes,
            meta: LayoutMeta { max_cross_size },
        },
        shortfall,
    }
}

fn pack_offset(pack: Pack, available: i64, used: i64) -> i64 {
    match pack {
        Pack::Start => 0,
        Pack::Center => (available - used).div_euclid(2),
        Pack::End => available - used,
    }
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[derive(Debug, Clone)]
struct Segment {
    length: i64,
    floor: i64,
    min: Option<i64>,
    max: Option<i64>,
    flex: f64,
    margin_leading: i64,
    margin_trailing: i64,
}

impl Segment {
    fn is_flexible(&self) -> bool {
        self.flex > 0.0
    }

    fn margins(&self) -> i64 {
        self.margin_leading + self.margin_trailing
    }

    fn clamp_to_limits(&mut self) {
        if let Some(max) = self.max {
            self.length = self.length.min(max);
        }
        if let Some(min) = self.min {
            self.length = self.length.max(min);
        }
        self.length = self.length.max(0);
    }
}

fn build_segments(items: &[BoxItem], direction: Direction) -> Vec<Segment> {
    items
        .iter()
        .map(|item| {
            let min = item.min_main(direction).map(|min| min.max(0) as i64);
            let floor = min.unwrap_or(0);
            // Fixed sizes sit on their minimum before any space is shared.
            let (length, flex) = match item.size_hint(direction) {
                SizeHint::Explicit(size) | SizeHint::Natural(size) => {
                    ((size as i64).max(floor), 0.0)
                }
                SizeHint::Flexible(weight) => (0, weight),
            };

            Segment {
                length,
                floor,
                min,
                max: item.max_main(direction).map(|max| max.max(0) as i64),
                flex,
                margin_leading: direction.leading(&item.margins) as i64,
                margin_trailing: direction.trailing(&item.margins) as i64,
            }
        })
        .collect()
}

/// Share `slack` between flexible segments by weight.
///
/// Each share is the difference of floored running targets, with the last
/// flexible segment taking the exact remainder, so shares sum to `slack`
/// before min/max clamping. Negative slack hands out nothing.
fn distribute_flex(segments: &mut [Segment], slack: i64) {
    let total_flex: f64 = segments.iter().map(|s| s.flex).sum();
    if total_flex <= 0.0 {
        return;
    }

    let slack = slack.max(0);
    let last = segments.iter().rposition(Segment::is_flexible);
    let mut running = 0.0;
    let mut assigned = 0i64;

    for (idx, segment) in segments.iter_mut().enumerate() {
        if !segment.is_flexible() {
            continue;
        }

        running += segment.flex;
        let target = if Some(idx) == last {
            slack
        } else {
            ((slack as f64) * running / total_flex).floor() as i64
        };

        segment.length = (target - assigned).max(0);
        assigned = assigned.max(target);
        segment.clamp_to_limits();
    }
}

/// Shrink segments by `deficit`, proportionally to their headroom above
/// their floor, never below the floor.
fn shrink_segments(segments: &mut [Segment], deficit: i64) -> Shortfall {
    let headroom: Vec<i64> = segments
        .iter()
        .map(|segment| (segment.length - segment.floor).max(0))
        .collect();
    let total: i64 = headroom.iter().sum();
    let shortfall = Shortfall {
        deficit,
        headroom: total,
    };

    if total == 0 {
        return shortfall;
    }

    if deficit >= total {
        for (segment, room) in segments.iter_mut().zip(&headroom) {
            segment.length -= room;
        }
        return shortfall;
    }

    let last = headroom.iter().rposition(|room| *room > 0);
    let mut running = 0i64;
    let mut taken = 0i64;

    for (idx, (segment, room)) in segments.iter_mut().zip(&headroom).enumerate() {
        if *room == 0 {
            continue;
        }

        running += room;
        let target = if Some(idx) == last {
            deficit
        } else {
            (deficit as i128 * running as i128 / total as i128) as i64
        };

        segment.length -= target - taken;
        taken = target;
    }

    shortfall
}
