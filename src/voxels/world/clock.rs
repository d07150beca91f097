//! Accumulator clock for the fixed-rate logic cadence.
//!
//! The driving loop runs frames as fast as it likes and asks the clock how
//! many whole logic ticks have elapsed since it last asked; after an
//! overrun the clock reports several ticks so the simulation catches up,
//! bounded so one long stall cannot snowball into an ever-growing backlog.

use std::time::Duration;

use log::warn;
use web_time::Instant;

/// Most ticks a single drain may report; the rest of the backlog is shed.
const MAX_CATCHUP_TICKS: u32 = 8;

/// Tracks elapsed wall time and converts it into due logic ticks.
pub struct TickClock {
    interval: Duration,
    last: Instant,
    accumulator: Duration,
}

impl TickClock {
    /// Creates a clock ticking at the given rate.
    pub fn new(tick_hz: u32) -> Self {
        let hz = tick_hz.max(1);
        TickClock {
            interval: Duration::from_nanos(1_000_000_000 / hz as u64),
            last: Instant::now(),
            accumulator: Duration::ZERO,
        }
    }

    /// Duration of one logic tick.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of whole ticks elapsed since the previous call.
    pub fn ticks_due(&mut self) -> u32 {
        let now = Instant::now();
        self.accumulator += now - self.last;
        self.last = now;
        self.drain()
    }

    fn drain(&mut self) -> u32 {
        let mut due = 0;
        while self.accumulator >= self.interval && due < MAX_CATCHUP_TICKS {
            self.accumulator -= self.interval;
            due += 1;
        }
        if self.accumulator >= self.interval {
            warn!(
                "logic tick fell {}ms behind, shedding backlog",
                self.accumulator.as_millis()
            );
            self.accumulator = Duration::ZERO;
        }
        due
    }

    #[cfg(test)]
    fn advance_by(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        self.drain()
    }
}
