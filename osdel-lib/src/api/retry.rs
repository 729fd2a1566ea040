use std::time::Duration;

/// Bounds on how often, and how patiently, a failed request is repeated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed after the first one.
    pub max_retries: u32,
    /// Wait before the first retry.
    pub wait: Duration,
    /// Cap on any single wait.
    pub max_wait: Duration,
}

impl RetryPolicy {
    /// The wait before retry number `retry` (starting at 0): `wait * 2^retry`, capped at
    /// `max_wait`.
    #[must_use]
    pub fn delay(&self, retry: u32) -> Duration {
        let factor = 2_u32.saturating_pow(retry.min(16));
        self.wait
            .checked_mul(factor)
            .map_or(self.max_wait, |d| d.min(self.max_wait))
    }

    /// Whether another attempt is allowed after `retries` retries have been made.
    #[must_use]
    pub const fn allows(&self, retries: u32) -> bool {
        retries < self.max_retries
    }
}

/// Statuses worth another attempt: rate limiting and server side failures.
#[must_use]
pub(crate) fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..=599).contains(&status)
}
