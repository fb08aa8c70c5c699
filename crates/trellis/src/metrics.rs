//! # Frame Metrics
//!
//! Per-frame timings recorded by the frame loop, plus running totals.
//! [`MetricsHandle`] shares them with other threads behind a
//! `parking_lot` lock; readers only ever see whole frames.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use trellis_ui::RenderStats;

/// Frame timing statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Frame number, starting at 0.
    pub frame: u64,
    /// Pre-frame callbacks, event draining and dispatch, in microseconds.
    pub event_us: u64,
    /// Render traversal and present, in microseconds.
    pub render_us: u64,
    /// Measured frame rate: one over the time since the previous frame
    /// finished rendering. `0.0` for the first frame.
    pub fps: f64,
    /// Input events dispatched this frame.
    pub events_dispatched: usize,
    /// Counters from this frame's render traversal.
    pub render: RenderStats,
}

impl FrameStats {
    /// Event plus render phase, in microseconds.
    #[inline]
    #[must_use]
    pub const fn total_us(&self) -> u64 {
        self.event_us + self.render_us
    }
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Sum of total frame times.
    pub total_us_sum: u64,
    /// Sum of event phase times.
    pub event_us_sum: u64,
    /// Sum of render phase times.
    pub render_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded budget.
    pub frames_over_budget: u64,
    budget_us: u64,
}

impl FrameStatsAccumulator {
    /// Creates an accumulator that counts frames slower than `budget`.
    #[must_use]
    pub fn new(budget: Duration) -> Self {
        Self {
            frames_recorded: 0,
            total_us_sum: 0,
            event_us_sum: 0,
            render_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
            budget_us: u64::try_from(budget.as_micros()).unwrap_or(u64::MAX),
        }
    }

    /// Records a frame's statistics.
    pub fn record(&mut self, stats: &FrameStats) {
        let total = stats.total_us();
        self.frames_recorded += 1;
        self.total_us_sum += total;
        self.event_us_sum += stats.event_us;
        self.render_us_sum += stats.render_us;
        self.min_frame_us = self.min_frame_us.min(total);
        self.max_frame_us = self.max_frame_us.max(total);

        if total > self.budget_us {
            self.frames_over_budget += 1;
        }
    }

    /// Returns average frame time in milliseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Returns the frame rate the average frame time would sustain.
    #[must_use]
    pub fn avg_fps(&self) -> f64 {
        let avg_ms = self.avg_frame_ms();
        if avg_ms <= 0.0 {
            return 0.0;
        }
        1000.0 / avg_ms
    }

    /// Returns the fraction of frames over budget.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }

    /// Logs a one-line summary.
    #[allow(clippy::cast_precision_loss)]
    pub fn log_summary(&self) {
        if self.frames_recorded == 0 {
            tracing::info!("no frames recorded");
            return;
        }
        tracing::info!(
            frames = self.frames_recorded,
            avg_ms = self.avg_frame_ms(),
            min_ms = self.min_frame_us as f64 / 1000.0,
            max_ms = self.max_frame_us as f64 / 1000.0,
            over_budget = self.frames_over_budget,
            "frame statistics"
        );
    }
}

#[derive(Debug)]
struct Metrics {
    last: FrameStats,
    totals: FrameStatsAccumulator,
}

/// Shared, read-mostly view of the frame loop's timings.
#[derive(Clone, Debug)]
pub struct MetricsHandle {
    inner: Arc<RwLock<Metrics>>,
}

impl MetricsHandle {
    pub(crate) fn new(budget: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Metrics {
                last: FrameStats::default(),
                totals: FrameStatsAccumulator::new(budget),
            })),
        }
    }

    pub(crate) fn record(&self, stats: FrameStats) {
        let mut metrics = self.inner.write();
        metrics.totals.record(&stats);
        metrics.last = stats;
    }

    /// The most recent frame.
    #[must_use]
    pub fn last_frame(&self) -> FrameStats {
        self.inner.read().last
    }

    /// Measured frame rate of the most recent frame.
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.inner.read().last.fps
    }

    /// Event phase of the most recent frame.
    #[must_use]
    pub fn event_phase(&self) -> Duration {
        Duration::from_micros(self.inner.read().last.event_us)
    }

    /// Render phase of the most recent frame.
    #[must_use]
    pub fn render_phase(&self) -> Duration {
        Duration::from_micros(self.inner.read().last.render_us)
    }

    /// Frames completed so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.inner.read().totals.frames_recorded
    }

    /// Running totals since start.
    #[must_use]
    pub fn totals(&self) -> FrameStatsAccumulator {
        self.inner.read().totals.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(frame: u64, event_us: u64, render_us: u64) -> FrameStats {
        FrameStats {
            frame,
            event_us,
            render_us,
            ..FrameStats::default()
        }
    }

    #[test]
    fn test_stats_accumulator() {
        let mut acc = FrameStatsAccumulator::new(Duration::from_millis(16));

        for i in 0..100 {
            acc.record(&frame(i, 5_000, 5_000 + i * 100));
        }

        assert_eq!(acc.frames_recorded, 100);
        assert_eq!(acc.min_frame_us, 10_000);
        assert_eq!(acc.max_frame_us, 19_900);
        assert!(acc.avg_fps() > 50.0);
        assert!(acc.avg_fps() < 100.0);
        // 16_100 and up.
        assert_eq!(acc.frames_over_budget, 39);
    }

    #[test]
    fn test_empty_accumulator() {
        let acc = FrameStatsAccumulator::new(Duration::from_millis(16));
        assert!(acc.avg_frame_ms().abs() < f64::EPSILON);
        assert!(acc.avg_fps().abs() < f64::EPSILON);
        assert!(acc.over_budget_ratio().abs() < f64::EPSILON);
    }

    #[test]
    fn test_handle_is_shared_across_threads() {
        let handle = MetricsHandle::new(Duration::from_millis(33));
        let reader = handle.clone();

        handle.record(frame(0, 1_000, 2_000));
        let seen = std::thread::spawn(move || (reader.frame_count(), reader.render_phase()))
            .join()
            .unwrap();

        assert_eq!(seen, (1, Duration::from_micros(2_000)));
        assert_eq!(handle.event_phase(), Duration::from_micros(1_000));
    }
}
