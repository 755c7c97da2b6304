//! Trailing-edge debounce for the search input.

use std::pin::Pin;
use std::time::Duration;

use tokio::time::{Instant, Sleep, sleep_until};

/// Default quiet period before a raw term becomes effective.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Debounces raw search input into an effective search term.
///
/// Every mutation of the raw value re-arms a single owned timer, so a burst
/// of keystrokes produces one update once input has been quiet for the
/// configured period. Dropping the debouncer (or calling [`cancel`]) discards
/// any pending update.
///
/// [`cancel`]: Debouncer::cancel
#[derive(Debug)]
pub struct Debouncer {
    /// Quiet period required before the raw value settles.
    quiet_period: Duration,
    /// Value as typed.
    raw: String,
    /// Last settled value.
    effective: String,
    /// Armed timer, if an update is pending.
    timer: Option<Pin<Box<Sleep>>>,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet period.
    #[must_use]
    pub const fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            raw: String::new(),
            effective: String::new(),
            timer: None,
        }
    }

    /// Returns the configured quiet period.
    #[must_use]
    pub const fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Returns the raw (per-keystroke) value.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the last settled value.
    #[must_use]
    pub fn effective(&self) -> &str {
        &self.effective
    }

    /// Returns `true` while an update is scheduled.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.timer.is_some()
    }

    /// Replaces the raw value and re-arms the timer.
    pub fn set_raw(&mut self, value: impl Into<String>) {
        self.raw = value.into();
        self.arm();
    }

    /// Appends a character to the raw value and re-arms the timer.
    pub fn push(&mut self, c: char) {
        self.raw.push(c);
        self.arm();
    }

    /// Removes the last character of the raw value and re-arms the timer.
    ///
    /// Does nothing when the raw value is already empty.
    pub fn pop(&mut self) {
        if self.raw.pop().is_some() {
            self.arm();
        }
    }

    /// Drops the pending update, if any.
    pub fn cancel(&mut self) {
        self.timer = None;
    }

    /// Waits until the raw value settles and returns the new effective value.
    ///
    /// Never resolves while nothing is pending, or when the settled value
    /// equals the current effective value. Cancel-safe: dropping the future
    /// keeps the timer armed, so it can be polled from `tokio::select!`.
    pub async fn settled(&mut self) -> String {
        loop {
            let Some(timer) = self.timer.as_mut() else {
                return std::future::pending().await;
            };
            timer.as_mut().await;
            self.timer = None;

            if self.raw != self.effective {
                self.effective.clone_from(&self.raw);
                tracing::debug!(term = %self.effective, "search term settled");
                return self.effective.clone();
            }
        }
    }

    /// Schedules an update one quiet period from now.
    #[allow(clippy::arithmetic_side_effects)]
    fn arm(&mut self) {
        let deadline = Instant::now() + self.quiet_period;
        match self.timer.as_mut() {
            Some(timer) => timer.as_mut().reset(deadline),
            None => self.timer = Some(Box::pin(sleep_until(deadline))),
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::arithmetic_side_effects)]

    use tokio::time::{advance, timeout};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_once_with_last_value() {
        // Arrange
        let mut debouncer = Debouncer::default();

        // Act
        for term in ["s", "sp", "spi", "spir"] {
            debouncer.set_raw(term);
            advance(Duration::from_millis(120)).await;
        }
        debouncer.set_raw("spirited");
        let last_input = Instant::now();
        let settled = debouncer.settled().await;

        // Assert
        assert_eq!(settled, "spirited");
        assert!(Instant::now() >= last_input + DEFAULT_QUIET_PERIOD);
        assert_eq!(debouncer.effective(), "spirited");
        assert!(!debouncer.is_pending());
        assert!(
            timeout(Duration::from_secs(5), debouncer.settled())
                .await
                .is_err()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_update_before_quiet_period() {
        // Arrange
        let mut debouncer = Debouncer::default();
        debouncer.set_raw("dune");

        // Act
        let early = timeout(Duration::from_millis(499), debouncer.settled()).await;
        let on_time = timeout(Duration::from_millis(10), debouncer.settled()).await;

        // Assert
        assert!(early.is_err());
        assert_eq!(debouncer.effective(), "dune");
        assert_eq!(on_time.unwrap(), "dune");
    }

    #[tokio::test(start_paused = true)]
    async fn test_mutation_rearms_timer() {
        // Arrange
        let mut debouncer = Debouncer::default();
        debouncer.set_raw("a");
        advance(Duration::from_millis(400)).await;

        // Act
        debouncer.push('b');
        let early = timeout(Duration::from_millis(450), debouncer.settled()).await;
        let settled = debouncer.settled().await;

        // Assert
        assert!(early.is_err());
        assert_eq!(settled, "ab");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending_update() {
        // Arrange
        let mut debouncer = Debouncer::default();
        debouncer.set_raw("alien");

        // Act
        debouncer.cancel();
        let result = timeout(Duration::from_secs(2), debouncer.settled()).await;

        // Assert
        assert!(result.is_err());
        assert!(debouncer.effective().is_empty());
        assert_eq!(debouncer.raw(), "alien");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_value_is_not_reemitted() {
        // Arrange
        let mut debouncer = Debouncer::default();
        debouncer.set_raw("heat");
        debouncer.settled().await;

        // Act
        debouncer.push('s');
        debouncer.pop();
        let result = timeout(Duration::from_secs(2), debouncer.settled()).await;

        // Assert
        assert!(result.is_err());
        assert_eq!(debouncer.effective(), "heat");
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_emit_separately() {
        // Arrange
        let mut debouncer = Debouncer::new(Duration::from_millis(200));

        // Act
        debouncer.set_raw("up");
        let first = debouncer.settled().await;
        debouncer.set_raw("");
        let second = debouncer.settled().await;

        // Assert
        assert_eq!(first, "up");
        assert_eq!(second, "");
    }

    #[test]
    fn test_pop_on_empty_does_not_arm() {
        // Arrange
        let mut debouncer = Debouncer::default();

        // Act
        debouncer.pop();

        // Assert
        assert!(!debouncer.is_pending());
    }
}
