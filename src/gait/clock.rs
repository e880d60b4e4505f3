//! Monotonic time for the motion loops.
//!
//! The sequencer never sleeps on its own: it asks a [`TickSource`] for the time,
//! to wait until a deadline (interpolation ticks, holds) or to yield between two
//! oscillator refreshes. On the board this is the embassy timer; in tests a
//! [`SimClock`] advances virtual time instead of sleeping.
use fugit::{MillisDurationU32, TimerInstantU64};

/// Milliseconds since boot.
pub type Instant = TimerInstantU64<1_000>;

#[allow(async_fn_in_trait)]
pub trait TickSource {
    fn now(&self) -> Instant;

    async fn wait_until(&mut self, deadline: Instant);

    /// Lets other work run between two refreshes of a cycle. No minimum delay.
    async fn yield_now(&mut self);

    async fn wait(&mut self, duration: MillisDurationU32) {
        let deadline = self.now() + millis(duration);
        self.wait_until(deadline).await;
    }
}

/// Widens a millisecond duration to the clock's 64 bit representation.
pub fn millis(duration: MillisDurationU32) -> fugit::MillisDurationU64 {
    fugit::MillisDurationU64::from_ticks(duration.ticks() as u64)
}

/// Virtual clock: waiting jumps straight to the deadline and every yield costs
/// `step_ms`.
#[derive(Debug, Clone)]
pub struct SimClock {
    now_ms: u64,
    step_ms: u64,
}

impl SimClock {
    pub fn new(step_ms: u64) -> Self {
        Self {
            now_ms: 0,
            step_ms: step_ms.max(1),
        }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(1)
    }
}

impl TickSource for SimClock {
    fn now(&self) -> Instant {
        Instant::from_ticks(self.now_ms)
    }

    async fn wait_until(&mut self, deadline: Instant) {
        self.now_ms = self.now_ms.max(deadline.ticks());
    }

    async fn yield_now(&mut self) {
        self.now_ms += self.step_ms;
    }
}

/// Embassy time driver backed clock used by the firmware.
#[cfg(feature = "esp32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbassyClock;

#[cfg(feature = "esp32")]
impl TickSource for EmbassyClock {
    fn now(&self) -> Instant {
        Instant::from_ticks(embassy_time::Instant::now().as_millis())
    }

    async fn wait_until(&mut self, deadline: Instant) {
        embassy_time::Timer::at(embassy_time::Instant::from_millis(deadline.ticks())).await;
    }

    async fn yield_now(&mut self) {
        embassy_futures::yield_now().await;
    }
}
