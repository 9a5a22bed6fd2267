//! Fixed-cadence frame driver
//!
//! The host calls [`SimulationClock::advance`] from its frame callback with a
//! monotonic timestamp in milliseconds. At most one update runs per callback:
//! when at least one frame duration has passed, the whole frames are consumed
//! and the sub-frame remainder carries into the next callback.

/// Clock state
#[derive(Debug, Clone)]
pub struct SimulationClock {
    /// Target frame duration (ms)
    frame_ms: f64,
    /// Reference time of the last processed frame
    last_time: Option<f64>,
    running: bool,
    /// Updates run since the clock was created
    ticks: u64,
}

impl SimulationClock {
    pub fn new(target_fps: u32) -> Self {
        Self {
            frame_ms: 1000.0 / target_fps.max(1) as f64,
            last_time: None,
            running: false,
            ticks: 0,
        }
    }

    pub fn frame_ms(&self) -> f64 {
        self.frame_ms
    }

    /// Begin (or resume) processing frames from `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.running = true;
        self.last_time = Some(now_ms);
    }

    /// Stop processing frames until the next `start`
    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Elapsed simulated time to hand the next update, if one is due
    pub fn advance(&mut self, now_ms: f64) -> Option<f64> {
        if !self.running {
            return None;
        }
        let last = *self.last_time.get_or_insert(now_ms);
        let delta = now_ms - last;
        if delta < self.frame_ms {
            return None;
        }

        let remainder = delta % self.frame_ms;
        self.last_time = Some(now_ms - remainder);
        self.ticks += 1;
        Some(delta - remainder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waits_for_a_full_frame() {
        let mut clock = SimulationClock::new(100); // 10ms frames
        clock.start(0.0);
        assert_eq!(clock.advance(4.0), None);
        assert_eq!(clock.advance(9.9), None);
        assert_eq!(clock.advance(10.0), Some(10.0));
        assert_eq!(clock.ticks(), 1);
    }

    #[test]
    fn test_remainder_carries() {
        let mut clock = SimulationClock::new(100);
        clock.start(0.0);
        // 25ms late: two frames consumed, 5ms carried
        assert_eq!(clock.advance(25.0), Some(20.0));
        assert_eq!(clock.advance(29.0), None);
        assert_eq!(clock.advance(30.0), Some(10.0));
    }

    #[test]
    fn test_no_drift_over_many_frames() {
        let mut clock = SimulationClock::new(120);
        clock.start(0.0);
        let mut simulated = 0.0;
        let mut now = 0.0;
        // 60Hz-ish host callbacks with jitter
        for i in 0..6000 {
            now += if i % 3 == 0 { 17.0 } else { 16.5 };
            if let Some(elapsed) = clock.advance(now) {
                simulated += elapsed;
            }
        }
        assert!(now - simulated > -1e-6);
        assert!(now - simulated < clock.frame_ms() + 1e-6);
    }

    #[test]
    fn test_pause_stops_updates() {
        let mut clock = SimulationClock::new(100);
        clock.start(0.0);
        clock.pause();
        assert!(!clock.is_running());
        assert_eq!(clock.advance(500.0), None);

        // Restart resets the reference time
        clock.start(1000.0);
        assert_eq!(clock.advance(1005.0), None);
        assert_eq!(clock.advance(1010.0), Some(10.0));
    }
}
