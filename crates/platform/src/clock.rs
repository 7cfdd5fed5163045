//! Wall-clock frame timing. Frame duration is measured, never assumed.

use std::time::Instant;

#[derive(Debug, Default)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous tick; the first tick yields 0.
    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f64 {
        let dt = self
            .last
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f64());
        self.last = Some(now);
        dt
    }
}

/// Frame-rate meter reporting once per second of accumulated `dt`.
#[derive(Debug, Default)]
pub struct FpsMeter {
    frames: u32,
    window: f64,
}

impl FpsMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one frame; returns frames/second when a full second has passed.
    pub fn record(&mut self, dt: f64) -> Option<f64> {
        self.frames += 1;
        self.window += dt;
        if self.window < 1.0 {
            return None;
        }
        let fps = f64::from(self.frames) / self.window;
        self.frames = 0;
        self.window = 0.0;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn first_tick_is_zero_then_measures_gap() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        assert_eq!(clock.tick_at(t0), 0.0);
        let dt = clock.tick_at(t0 + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-9);
        let dt = clock.tick_at(t0 + Duration::from_millis(50));
        assert!((dt - 0.034).abs() < 1e-9);
    }

    #[test]
    fn clock_never_goes_negative() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now() + Duration::from_secs(1);
        clock.tick_at(t0);
        assert_eq!(clock.tick_at(t0 - Duration::from_millis(5)), 0.0);
    }

    #[test]
    fn fps_reported_once_per_second() {
        let mut meter = FpsMeter::new();
        for _ in 0..59 {
            assert!(meter.record(1.0 / 60.0).is_none());
        }
        let fps = meter.record(1.0 / 60.0 + 1e-9).expect("one second elapsed");
        assert!((fps - 60.0).abs() < 1e-3);
        assert!(meter.record(0.5).is_none());
    }
}
