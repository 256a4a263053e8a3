//! Optional observability helpers for broker operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit structured spans named `reset_broker.flow` with the `flow`
//!   (operation) and `stage` (call site) fields, plus audit events for reset requests.
//! - Enable `metrics` to increment the `reset_broker_flow_total` counter for every
//!   attempt/success/failure/throttle, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Broker operations observed at the call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Reset request intake (rate limit, issue, deliver).
	RequestReset,
	/// Read-only token validation.
	ValidateToken,
	/// Token redemption with a replacement credential.
	CompleteReset,
	/// Expired record sweep.
	Cleanup,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::RequestReset => "request_reset",
			FlowKind::ValidateToken => "validate_token",
			FlowKind::CompleteReset => "complete_reset",
			FlowKind::Cleanup => "cleanup",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a broker helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// Request rejected by the rate limiter.
	Throttled,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
			FlowOutcome::Throttled => "throttled",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
