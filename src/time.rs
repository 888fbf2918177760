//! Real-time tick source for the countdown, using an accumulator.
//!
//! `draw_web()` fires at ~60fps with variable delta. `TickClock` folds
//! that into discrete one-second ticks, so the countdown logic never
//! sees wall-clock time and tests can simulate any number of ticks
//! without real delay.

/// Milliseconds per countdown tick (one second).
const MS_PER_TICK: f64 = 1000.0;

/// Largest delta accepted from a single frame. A backgrounded tab stops
/// firing frames; on return the countdown catches up by at most this
/// much instead of dumping minutes of ticks at once.
const MAX_FRAME_DELTA_MS: f64 = 3000.0;

pub struct TickClock {
    /// Accumulated milliseconds not yet consumed as ticks.
    accumulator: f64,
    /// Timestamp of the last update (ms), None before the first frame.
    last_timestamp: Option<f64>,
    /// Total elapsed ticks since creation.
    pub total_ticks: u64,
}

impl TickClock {
    pub fn new() -> Self {
        Self {
            accumulator: 0.0,
            last_timestamp: None,
            total_ticks: 0,
        }
    }

    /// Feed a wall-clock timestamp (from `Date.now()` or similar) and
    /// get back the number of whole seconds to process this frame.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, MAX_FRAME_DELTA_MS),
            None => 0.0, // first frame: no delta
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / MS_PER_TICK) as u32;
        self.accumulator -= ticks as f64 * MS_PER_TICK;
        self.total_ticks += ticks as u64;
        ticks
    }

}
