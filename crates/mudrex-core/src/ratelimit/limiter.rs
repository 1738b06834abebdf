//! Multi-window limiter with FIFO admission.

use super::window::{Window, WindowCounter};
use parking_lot::Mutex;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::time::Instant;

const fn ceiling(n: u32) -> NonZeroU32 {
    match NonZeroU32::new(n) {
        Some(value) => value,
        None => panic!("ceiling must be non-zero"),
    }
}

/// Request ceilings for every window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quotas {
    /// Requests allowed per second.
    pub per_second: NonZeroU32,
    /// Requests allowed per minute.
    pub per_minute: NonZeroU32,
    /// Requests allowed per hour.
    pub per_hour: NonZeroU32,
    /// Requests allowed per day.
    pub per_day: NonZeroU32,
}

impl Quotas {
    /// Build quotas from plain counts. Returns `None` if any count is zero.
    pub fn from_counts(
        per_second: u32,
        per_minute: u32,
        per_hour: u32,
        per_day: u32,
    ) -> Option<Self> {
        Some(Self {
            per_second: NonZeroU32::new(per_second)?,
            per_minute: NonZeroU32::new(per_minute)?,
            per_hour: NonZeroU32::new(per_hour)?,
            per_day: NonZeroU32::new(per_day)?,
        })
    }

    /// Ceiling for `window`.
    pub fn ceiling(&self, window: Window) -> NonZeroU32 {
        match window {
            Window::Second => self.per_second,
            Window::Minute => self.per_minute,
            Window::Hour => self.per_hour,
            Window::Day => self.per_day,
        }
    }
}

impl Default for Quotas {
    /// 2/second, 50/minute, 1000/hour, 10000/day.
    fn default() -> Self {
        Self {
            per_second: ceiling(2),
            per_minute: ceiling(50),
            per_hour: ceiling(1000),
            per_day: ceiling(10_000),
        }
    }
}

/// Snapshot of one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowUsage {
    /// Which window this is.
    pub window: Window,
    /// Requests admitted in the current window.
    pub count: u32,
    /// Ceiling for the window.
    pub ceiling: u32,
    /// Time until the window resets.
    pub resets_in: Duration,
}

#[derive(Debug)]
struct LimiterState {
    counters: [WindowCounter; 4],
}

impl LimiterState {
    fn new(quotas: &Quotas, now: Instant) -> Self {
        Self {
            counters: Window::ALL.map(|w| WindowCounter::new(w, quotas.ceiling(w), now)),
        }
    }

    /// Admit one request if every window has room. On refusal nothing is
    /// incremented and the wait for the binding window is returned.
    fn try_acquire(&mut self, now: Instant) -> Result<(), Duration> {
        for counter in &mut self.counters {
            counter.roll(now);
        }

        let wait = self
            .counters
            .iter()
            .filter_map(|c| c.wait_needed(now))
            .max();

        match wait {
            Some(wait) => Err(wait),
            None => {
                for counter in &mut self.counters {
                    counter.increment();
                }
                Ok(())
            }
        }
    }

    fn usage(&mut self, now: Instant) -> Vec<WindowUsage> {
        self.counters
            .iter_mut()
            .map(|c| {
                c.roll(now);
                WindowUsage {
                    window: c.window(),
                    count: c.count(),
                    ceiling: c.ceiling(),
                    resets_in: c.reset_in(now),
                }
            })
            .collect()
    }
}

/// Client-side limiter enforcing per-second, per-minute, per-hour and
/// per-day ceilings at once.
///
/// A request is admitted only when it fits under every ceiling, and then
/// counts against all of them. Waiters are served in arrival order.
///
/// `acquire()` is cancellation safe: dropping the future before it
/// resolves leaves every counter untouched.
#[derive(Debug)]
pub struct WindowedRateLimiter {
    quotas: Quotas,
    state: Mutex<LimiterState>,
    queue: tokio::sync::Mutex<()>,
}

impl WindowedRateLimiter {
    /// Create a limiter whose windows start now.
    pub fn new(quotas: Quotas) -> Self {
        Self {
            quotas,
            state: Mutex::new(LimiterState::new(&quotas, Instant::now())),
            queue: tokio::sync::Mutex::new(()),
        }
    }

    /// Configured ceilings.
    pub fn quotas(&self) -> &Quotas {
        &self.quotas
    }

    /// Wait until a request fits under every ceiling, then count it.
    pub async fn acquire(&self) {
        // tokio's mutex hands out the lock in FIFO order
        let _turn = self.queue.lock().await;

        loop {
            let wait = match self.try_acquire() {
                Ok(()) => return,
                Err(wait) => wait,
            };

            #[cfg(feature = "tracing")]
            tracing::debug!(wait_ms = wait.as_millis() as u64, "Rate limiter full, waiting");

            tokio::time::sleep(wait).await;
        }
    }

    /// Admit a request without waiting.
    ///
    /// On refusal returns how long until the binding window resets. This
    /// bypasses the FIFO queue.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        let mut state = self.state.lock();
        state.try_acquire(Instant::now())
    }

    /// Current usage of every window, shortest first.
    pub fn usage(&self) -> Vec<WindowUsage> {
        let mut state = self.state.lock();
        state.usage(Instant::now())
    }
}

impl Default for WindowedRateLimiter {
    fn default() -> Self {
        Self::new(Quotas::default())
    }
}
