// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for reset flow outcomes.
#[derive(Debug, Default)]
pub struct ResetMetrics {
	requests: AtomicU64,
	throttled: AtomicU64,
	issued: AtomicU64,
	redeemed: AtomicU64,
	rejected: AtomicU64,
}
impl ResetMetrics {
	/// Returns the number of reset requests received, including malformed ones.
	pub fn requests(&self) -> u64 {
		self.requests.load(Ordering::Relaxed)
	}

	/// Returns the number of requests rejected by the rate limiter.
	pub fn throttled(&self) -> u64 {
		self.throttled.load(Ordering::Relaxed)
	}

	/// Returns the number of tokens issued.
	pub fn issued(&self) -> u64 {
		self.issued.load(Ordering::Relaxed)
	}

	/// Returns the number of tokens redeemed.
	pub fn redeemed(&self) -> u64 {
		self.redeemed.load(Ordering::Relaxed)
	}

	/// Returns the number of failed validations and redemptions.
	pub fn rejected(&self) -> u64 {
		self.rejected.load(Ordering::Relaxed)
	}

	pub(crate) fn record_request(&self) {
		self.requests.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_throttled(&self) {
		self.throttled.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_issued(&self) {
		self.issued.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_redeemed(&self) {
		self.redeemed.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_rejected(&self) {
		self.rejected.fetch_add(1, Ordering::Relaxed);
	}
}
