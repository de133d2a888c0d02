use std::time::Duration;

/// # Clock
/// A fixed-timestep accumulator: wall time goes in, a whole number of ticks comes out and the
/// remainder carries over to the next call.
///
/// At most a tenth of a second of ticks is handed out at once; if the host stalls for longer,
/// the excess is dropped rather than replayed in a burst.
pub struct Clock {
    period: Duration,
    accumulated: Duration,
    max_ticks: u32,
}

impl Clock {
    /// # Arguments
    /// * `hz` ticks per second, at least 1
    pub fn new(hz: u32) -> Self {
        let hz = hz.max(1);
        Clock {
            period: Duration::from_secs(1) / hz,
            accumulated: Duration::ZERO,
            max_ticks: (hz / 10).max(1),
        }
    }

    /// Adds `elapsed` to the clock and returns how many ticks are now due
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;
        let mut ticks = 0;
        while self.accumulated >= self.period {
            self.accumulated -= self.period;
            ticks += 1;
            if ticks == self.max_ticks {
                self.accumulated = self.accumulated.min(self.period);
                break;
            }
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_counts_whole_periods() {
        let mut clock = Clock::new(100);
        assert_eq!(clock.advance(Duration::from_millis(35)), 3);
    }

    #[test]
    fn test_clock_carries_remainder() {
        let mut clock = Clock::new(100);
        assert_eq!(clock.advance(Duration::from_millis(15)), 1);
        assert_eq!(clock.advance(Duration::from_millis(5)), 1);
        assert_eq!(clock.advance(Duration::from_millis(9)), 0);
    }

    #[test]
    fn test_clock_caps_catch_up() {
        let mut clock = Clock::new(400);
        // two seconds behind: only a tenth of a second of ticks is handed out
        assert_eq!(clock.advance(Duration::from_secs(2)), 40);
        // and the rest of the backlog is gone
        assert!(clock.advance(Duration::ZERO) <= 1);
    }

    #[test]
    fn test_slow_clock_still_ticks() {
        let mut clock = Clock::new(1);
        assert_eq!(clock.advance(Duration::from_millis(999)), 0);
        assert_eq!(clock.advance(Duration::from_millis(1)), 1);
    }
}
