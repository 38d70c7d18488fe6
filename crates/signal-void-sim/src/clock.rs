//! Fixed-step accumulator that decouples render frames from simulation ticks.

use signal_void_core::constants::{MAX_FRAME_DELTA_TICKS, TICK_SECS};

#[derive(Debug, Clone)]
pub struct FixedStepClock {
    accumulator: f64,
    max_ticks: u32,
    time_scale: f64,
}

impl FixedStepClock {
    pub fn new(max_ticks: u32, time_scale: f64) -> Self {
        Self {
            accumulator: 0.0,
            max_ticks: max_ticks.max(1),
            time_scale: time_scale.max(0.0),
        }
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Feed `delta_secs` of real time; returns how many ticks to run now.
    /// Deltas beyond five tick lengths are clamped, and time beyond the
    /// per-frame cap is dropped rather than carried over.
    pub fn advance(&mut self, delta_secs: f64) -> u32 {
        let delta = delta_secs.clamp(0.0, TICK_SECS * MAX_FRAME_DELTA_TICKS);
        self.accumulator += delta * self.time_scale;

        let mut ticks = 0;
        while self.accumulator >= TICK_SECS && ticks < self.max_ticks {
            self.accumulator -= TICK_SECS;
            ticks += 1;
        }
        if ticks == self.max_ticks {
            self.accumulator %= TICK_SECS;
        }
        ticks
    }

    /// Fraction of a tick left in the accumulator, for render interpolation.
    pub fn alpha(&self) -> f64 {
        self.accumulator / TICK_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FixedStepClock::new(4, 1.0);
        assert_eq!(clock.advance(TICK_SECS * 0.6), 0);
        assert_eq!(clock.advance(TICK_SECS * 0.6), 1);
        assert!((clock.alpha() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_slow_frame_is_capped_and_excess_dropped() {
        let mut clock = FixedStepClock::new(4, 1.0);
        assert_eq!(clock.advance(1.0), 4);
        assert!(clock.alpha() < 1.0, "no backlog after a capped frame");
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_time_scale_stretches_real_time() {
        let mut clock = FixedStepClock::new(4, 2.0);
        assert_eq!(clock.advance(TICK_SECS), 2);
        clock.set_time_scale(0.0);
        assert_eq!(clock.advance(TICK_SECS), 0);
    }
}
