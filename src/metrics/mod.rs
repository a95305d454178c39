use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Saturating counters describing the work done by layout passes.
#[derive(Debug, Default, Clone)]
pub struct LayoutMetrics {
    passes: u64,
    items: u64,
    shortfalls: u64,
    overflows: u64,
    cells_placed: u64,
}

impl LayoutMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_pass(&mut self, item_count: usize) {
        self.passes = self.passes.saturating_add(1);
        self.items = self.items.saturating_add(item_count as u64);
    }

    pub fn record_shortfall(&mut self, overflowed: bool) {
        self.shortfalls = self.shortfalls.saturating_add(1);
        if overflowed {
            self.overflows = self.overflows.saturating_add(1);
        }
    }

    pub fn record_cells(&mut self, count: usize) {
        if count > 0 {
            self.cells_placed = self.cells_placed.saturating_add(count as u64);
        }
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            passes: self.passes,
            items: self.items,
            shortfalls: self.shortfalls,
            overflows: self.overflows,
            cells_placed: self.cells_placed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub passes: u64,
    pub items: u64,
    pub shortfalls: u64,
    pub overflows: u64,
    pub cells_placed: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "layout_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("passes".to_string(), json!(self.passes));
        map.insert("items".to_string(), json!(self.items));
        map.insert("shortfalls".to_string(), json!(self.shortfalls));
        map.insert("overflows".to_string(), json!(self.overflows));
        map.insert("cells_placed".to_string(), json!(self.cells_placed));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let mut metrics = LayoutMetrics::new();
        metrics.record_pass(4);
        metrics.record_pass(2);
        metrics.record_shortfall(false);
        metrics.record_shortfall(true);
        metrics.record_cells(0);
        metrics.record_cells(3);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.passes, 2);
        assert_eq!(snapshot.items, 6);
        assert_eq!(snapshot.shortfalls, 2);
        assert_eq!(snapshot.overflows, 1);
        assert_eq!(snapshot.cells_placed, 3);
    }

    #[test]
    fn snapshot_becomes_log_event() {
        let mut metrics = LayoutMetrics::new();
        metrics.record_pass(3);
        let event = metrics.snapshot().to_log_event("boxflow::metrics");
        assert_eq!(event.message, "layout_metrics");
        assert_eq!(event.target, "boxflow::metrics");
        assert_eq!(event.field("items"), Some(&json!(3)));
    }
}
