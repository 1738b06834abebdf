//! Fixed-window counters.

use std::num::NonZeroU32;
use std::time::Duration;
use tokio::time::Instant;

/// Time window a ceiling applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    /// Per-second ceiling
    Second,
    /// Per-minute ceiling
    Minute,
    /// Per-hour ceiling
    Hour,
    /// Per-day ceiling
    Day,
}

impl Window {
    /// All windows, shortest first.
    pub const ALL: [Window; 4] = [Window::Second, Window::Minute, Window::Hour, Window::Day];

    /// Length of this window.
    pub fn duration(&self) -> Duration {
        match self {
            Window::Second => Duration::from_secs(1),
            Window::Minute => Duration::from_secs(60),
            Window::Hour => Duration::from_secs(3600),
            Window::Day => Duration::from_secs(86400),
        }
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Window::Second => "second",
            Window::Minute => "minute",
            Window::Hour => "hour",
            Window::Day => "day",
        };
        f.write_str(name)
    }
}

/// Counter for a single window.
#[derive(Debug, Clone)]
pub(crate) struct WindowCounter {
    window: Window,
    ceiling: NonZeroU32,
    count: u32,
    window_start: Instant,
}

impl WindowCounter {
    pub(crate) fn new(window: Window, ceiling: NonZeroU32, now: Instant) -> Self {
        Self {
            window,
            ceiling,
            count: 0,
            window_start: now,
        }
    }

    pub(crate) fn window(&self) -> Window {
        self.window
    }

    pub(crate) fn ceiling(&self) -> u32 {
        self.ceiling.get()
    }

    pub(crate) fn count(&self) -> u32 {
        self.count
    }

    /// Start a fresh window once the current one has elapsed.
    pub(crate) fn roll(&mut self, now: Instant) {
        if now.saturating_duration_since(self.window_start) >= self.window.duration() {
            self.count = 0;
            self.window_start = now;
        }
    }

    /// Time until this window resets, measured from `now`.
    pub(crate) fn reset_in(&self, now: Instant) -> Duration {
        (self.window_start + self.window.duration()).saturating_duration_since(now)
    }

    /// `None` when there is room for one more request, otherwise the wait
    /// until the window resets.
    pub(crate) fn wait_needed(&self, now: Instant) -> Option<Duration> {
        if self.count < self.ceiling.get() {
            None
        } else {
            Some(self.reset_in(now))
        }
    }

    pub(crate) fn increment(&mut self) {
        debug_assert!(self.count < self.ceiling.get());
        self.count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ceiling(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_window_durations() {
        assert_eq!(Window::Second.duration(), Duration::from_secs(1));
        assert_eq!(Window::Minute.duration(), Duration::from_secs(60));
        assert_eq!(Window::Hour.duration(), Duration::from_secs(3600));
        assert_eq!(Window::Day.duration(), Duration::from_secs(86400));
    }

    #[test]
    fn test_window_display() {
        assert_eq!(Window::Minute.to_string(), "minute");
    }

    #[tokio::test(start_paused = true)]
    async fn test_counter_fills_and_reports_wait() {
        let start = Instant::now();
        let mut counter = WindowCounter::new(Window::Second, ceiling(2), start);

        assert!(counter.wait_needed(start).is_none());
        counter.increment();
        counter.increment();
        assert_eq!(counter.count(), 2);
        assert_eq!(counter.wait_needed(start), Some(Duration::from_secs(1)));

        let later = start + Duration::from_millis(400);
        assert_eq!(counter.wait_needed(later), Some(Duration::from_millis(600)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_counter_rolls_after_window() {
        let start = Instant::now();
        let mut counter = WindowCounter::new(Window::Second, ceiling(1), start);
        counter.increment();

        counter.roll(start + Duration::from_millis(999));
        assert_eq!(counter.count(), 1);

        counter.roll(start + Duration::from_secs(1));
        assert_eq!(counter.count(), 0);
        assert_eq!(
            counter.reset_in(start + Duration::from_secs(1)),
            Duration::from_secs(1)
        );
    }
}
