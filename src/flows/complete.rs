//! Token validation, redemption, and cleanup exposed through the broker.

// self
use crate::{
	_prelude::*,
	auth::EmailAddress,
	flows::ResetBroker,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl ResetBroker {
	/// Checks a reset token without consuming it and returns the bound identity.
	pub fn validate_reset(&self, token: &str) -> Result<EmailAddress> {
		const KIND: FlowKind = FlowKind::ValidateToken;

		let _span = FlowSpan::new(KIND, "validate_reset").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.tokens.validate(token);

		self.finish(KIND, &result, false);

		result
	}

	/// Redeems a reset token with the replacement credential and returns the bound identity.
	///
	/// The broker only enforces the credential length policy; storing the credential is the
	/// caller's job once this returns `Ok`.
	pub fn complete_reset(&self, token: &str, new_credential: &str) -> Result<EmailAddress> {
		const KIND: FlowKind = FlowKind::CompleteReset;

		let _span = FlowSpan::new(KIND, "complete_reset").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = self.tokens.consume(token, new_credential);

		self.finish(KIND, &result, true);

		result
	}

	/// Removes expired token records; returns how many were removed.
	pub fn cleanup(&self) -> Result<usize> {
		const KIND: FlowKind = FlowKind::Cleanup;

		let _span = FlowSpan::new(KIND, "cleanup").entered();
		let result = self.tokens.cleanup_expired();

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	fn finish<T>(&self, kind: FlowKind, result: &Result<T>, redeemed: bool) {
		match result {
			Ok(_) => {
				if redeemed {
					self.metrics.record_redeemed();
				}

				obs::record_flow_outcome(kind, FlowOutcome::Success);
			},
			Err(_) => {
				self.metrics.record_rejected();
				obs::record_flow_outcome(kind, FlowOutcome::Failure);
			},
		}
	}
}
