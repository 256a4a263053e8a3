//! Reset request intake: throttle, issue, deliver, audit.
//!
//! Callers get the same [`ResetRequestOutcome::Accepted`] whether or not the address belongs to
//! an account, and whether or not issuance or delivery succeeded, so the response cannot be used
//! to enumerate accounts. Failures behind that answer go to the logs.

// self
use crate::{
	_prelude::*,
	auth::EmailAddress,
	config::DeliveryMode,
	flows::ResetBroker,
	notify::ResetEmail,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	rate_limit::RateLimitDecision,
};

/// Caller-facing answer to a reset request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResetRequestOutcome {
	/// Request accepted; instructions were sent if the account exists.
	Accepted,
	/// Too many requests for this identity inside the window.
	RateLimited {
		/// Whole seconds until a slot frees up.
		retry_after: u64,
	},
}
impl ResetRequestOutcome {
	/// Generic acceptance message shown for registered and unknown addresses alike.
	pub const ACCEPTED_MESSAGE: &'static str =
		"If the email exists in our system, you will receive reset instructions.";

	/// Returns `true` for [`ResetRequestOutcome::Accepted`].
	pub fn is_accepted(&self) -> bool {
		matches!(self, Self::Accepted)
	}

	/// Human-readable message for the caller.
	pub fn message(&self) -> String {
		match self {
			Self::Accepted => Self::ACCEPTED_MESSAGE.into(),
			Self::RateLimited { retry_after } => format!(
				"Too many reset requests. Please try again in {} minutes.",
				retry_after / 60
			),
		}
	}
}

impl ResetBroker {
	/// Handles a reset request for `email`, optionally tagged with the requester's origin.
	///
	/// Fails only when `email` is not email-shaped; every other path yields an outcome.
	pub fn request_reset(&self, email: &str, origin: Option<&str>) -> Result<ResetRequestOutcome> {
		const KIND: FlowKind = FlowKind::RequestReset;

		let _span = FlowSpan::new(KIND, "request_reset").entered();

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.metrics.record_request();

		let email = EmailAddress::new(email).inspect_err(|_| {
			obs::record_flow_outcome(KIND, FlowOutcome::Failure);
		})?;

		if let RateLimitDecision::Delay(directive) = self.limiter.check(&email) {
			let retry_after = directive.retry_after_secs();

			self.metrics.record_throttled();
			obs::report_throttled(&email, retry_after);
			obs::record_flow_outcome(KIND, FlowOutcome::Throttled);

			return Ok(ResetRequestOutcome::RateLimited { retry_after });
		}

		let issued = self.directory.is_registered(&email) && self.issue_and_deliver(&email);

		obs::audit_reset_requested(&email, origin, issued);
		obs::record_flow_outcome(KIND, FlowOutcome::Success);

		Ok(ResetRequestOutcome::Accepted)
	}

	fn issue_and_deliver(&self, email: &EmailAddress) -> bool {
		let issued = match self.tokens.generate(email) {
			Ok(issued) => issued,
			Err(e) => {
				obs::report_issue_failure(email, &e);

				return false;
			},
		};

		self.metrics.record_issued();

		match self.config.delivery {
			DeliveryMode::Live => {
				let message = ResetEmail {
					to: issued.identity.clone(),
					reset_link: issued.reset_link(&self.config.reset_base),
					expires_at: issued.expires_at,
					ttl: self.config.token.ttl,
				};

				if let Err(e) = self.mailer.send(&message) {
					obs::report_delivery_failure(email, &e);
				}
			},
			DeliveryMode::DryRun =>
				obs::report_dry_run(email, &self.config.reset_base, issued.expires_at),
		}

		true
	}
}
