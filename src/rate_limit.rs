//! Sliding-window rate limiting keyed by identity.
//!
//! Every key owns the instants of its admitted requests inside the trailing window. A check purges
//! instants at or before `now - window`, rejects without recording once the remaining count hits
//! the budget, and otherwise records `now`. Rejections are not recorded, so a caller hammering a
//! limited key does not push its own retry time back.

pub mod policy;

pub use policy::*;

// self
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
};

type WindowMap = HashMap<String, VecDeque<OffsetDateTime>>;

/// Per-key sliding-window limiter; state is process-local.
pub struct RateLimiter {
	policy: RateLimitPolicy,
	clock: Arc<dyn Clock>,
	windows: Mutex<WindowMap>,
}
impl RateLimiter {
	/// Creates a limiter that reads the system clock.
	pub fn new(policy: RateLimitPolicy) -> Self {
		Self::with_clock(policy, Arc::new(SystemClock))
	}

	/// Creates a limiter that reads the provided clock.
	pub fn with_clock(policy: RateLimitPolicy, clock: Arc<dyn Clock>) -> Self {
		Self { policy, clock, windows: Default::default() }
	}

	/// Returns the policy this limiter enforces.
	pub fn policy(&self) -> RateLimitPolicy {
		self.policy
	}

	/// Admits and records a request for `key`, or rejects it without recording.
	pub fn is_allowed(&self, key: &str) -> bool {
		let now = self.clock.now();
		let mut windows = self.windows.lock();
		let window = windows.entry(key.to_owned()).or_default();

		Self::purge(window, now - self.policy.window);

		Self::admit(window, self.policy.max_requests, now)
	}

	/// Whole seconds until the oldest recorded request leaves the window, floored at zero.
	///
	/// Returns `None` when the key has no recorded requests.
	pub fn retry_after(&self, key: &str) -> Option<u64> {
		let now = self.clock.now();
		let windows = self.windows.lock();
		let oldest = windows.get(key)?.front().copied()?;

		Some(self.backoff(oldest, now).whole_seconds().max(0) as u64)
	}

	/// Admits or delays a request for `key` in one atomic step.
	pub fn check(&self, key: &str) -> RateLimitDecision {
		let now = self.clock.now();
		let mut windows = self.windows.lock();
		let window = windows.entry(key.to_owned()).or_default();

		Self::purge(window, now - self.policy.window);

		if Self::admit(window, self.policy.max_requests, now) {
			return RateLimitDecision::Allow;
		}

		// A full window is never empty.
		let oldest = window.front().copied().unwrap_or(now);
		let backoff = self.backoff(oldest, now);

		RateLimitDecision::Delay(
			RetryDirective::new(oldest + self.policy.window, backoff).with_reason(format!(
				"{} requests already admitted within {} minutes",
				self.policy.max_requests,
				self.policy.window.whole_minutes()
			)),
		)
	}

	/// Drops keys whose windows are empty at the current instant; returns how many went.
	pub fn sweep(&self) -> usize {
		let horizon = self.clock.now() - self.policy.window;
		let mut windows = self.windows.lock();
		let before = windows.len();

		windows.retain(|_, window| {
			Self::purge(window, horizon);

			!window.is_empty()
		});

		before - windows.len()
	}

	/// Number of keys currently tracked.
	pub fn tracked_keys(&self) -> usize {
		self.windows.lock().len()
	}

	fn purge(window: &mut VecDeque<OffsetDateTime>, horizon: OffsetDateTime) {
		while window.front().is_some_and(|instant| *instant <= horizon) {
			window.pop_front();
		}
	}

	fn admit(window: &mut VecDeque<OffsetDateTime>, max: usize, now: OffsetDateTime) -> bool {
		if window.len() >= max {
			return false;
		}

		window.push_back(now);

		true
	}

	fn backoff(&self, oldest: OffsetDateTime, now: OffsetDateTime) -> Duration {
		let remaining = oldest + self.policy.window - now;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}
}
impl Debug for RateLimiter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RateLimiter")
			.field("policy", &self.policy)
			.field("tracked_keys", &self.tracked_keys())
			.finish()
	}
}
