//! Rate limit policy values and the decisions a limiter hands back.

// self
use crate::{_prelude::*, error::ConfigError};

/// Count-based sliding-window budget applied per identity key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitPolicy {
	/// Maximum admitted requests inside one window.
	pub max_requests: usize,
	/// Trailing window length.
	pub window: Duration,
}
impl RateLimitPolicy {
	/// Three requests per fifteen minutes.
	pub const DEFAULT: Self = Self { max_requests: 3, window: Duration::minutes(15) };

	/// Creates a policy after validating both bounds.
	pub fn new(max_requests: usize, window: Duration) -> Result<Self, ConfigError> {
		let policy = Self { max_requests, window };

		policy.validate()?;

		Ok(policy)
	}

	/// Rejects budgets that could never admit a request.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.max_requests == 0 {
			return Err(ConfigError::ZeroRequestBudget);
		}
		if !self.window.is_positive() {
			return Err(ConfigError::NonPositiveWindow);
		}

		Ok(())
	}
}
impl Default for RateLimitPolicy {
	fn default() -> Self {
		Self::DEFAULT
	}
}

/// Result emitted by [`RateLimiter::check`](crate::rate_limit::RateLimiter::check).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
	/// The request was admitted and recorded.
	Allow,
	/// The request was rejected and should be retried later.
	Delay(RetryDirective),
}
impl RateLimitDecision {
	/// Returns `true` for [`RateLimitDecision::Allow`].
	pub fn is_allowed(&self) -> bool {
		matches!(self, Self::Allow)
	}
}

/// Advises callers when to retry after a [`RateLimitDecision::Delay`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryDirective {
	/// Instant when the oldest recorded request leaves the window.
	pub earliest_retry_at: OffsetDateTime,
	/// Suggested backoff duration.
	pub recommended_backoff: Duration,
	/// Optional descriptive string.
	pub reason: Option<String>,
}
impl RetryDirective {
	/// Creates a new directive with the provided timing metadata.
	pub fn new(earliest_retry_at: OffsetDateTime, recommended_backoff: Duration) -> Self {
		Self { earliest_retry_at, recommended_backoff, reason: None }
	}

	/// Adds a human-readable reason.
	pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
		self.reason = Some(reason.into());

		self
	}

	/// Backoff in whole seconds, truncated and floored at zero.
	pub fn retry_after_secs(&self) -> u64 {
		self.recommended_backoff.whole_seconds().max(0) as u64
	}
}
