// self
use crate::{_prelude::*, auth::EmailAddress, obs::FlowKind};

/// A span builder used around broker operations.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("reset_broker.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Enters the span for the rest of the synchronous operation.
	pub fn entered(self) -> FlowSpanGuard {
		#[cfg(feature = "tracing")]
		{
			FlowSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			FlowSpanGuard {}
		}
	}
}

/// RAII guard returned by [`FlowSpan::entered`].
pub struct FlowSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for FlowSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FlowSpanGuard(..)")
	}
}

/// Emits the audit record for an accepted reset request.
///
/// `issued` is logged for operators only; callers never see it.
pub fn audit_reset_requested(email: &EmailAddress, origin: Option<&str>, issued: bool) {
	#[cfg(feature = "tracing")]
	{
		tracing::info!(
			target: "reset_broker::audit",
			email = email.as_str(),
			origin = origin.unwrap_or("unknown"),
			issued,
			"password reset requested"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (email, origin, issued);
	}
}

/// Emits a throttling notice for a rate-limited identity.
pub fn report_throttled(email: &EmailAddress, retry_after_secs: u64) {
	#[cfg(feature = "tracing")]
	{
		tracing::info!(email = email.as_str(), retry_after_secs, "reset request throttled");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (email, retry_after_secs);
	}
}

/// Reports a token issuance failure that was hidden from the caller.
pub fn report_issue_failure(email: &EmailAddress, error: &dyn Display) {
	#[cfg(feature = "tracing")]
	{
		tracing::error!(email = email.as_str(), %error, "reset token issuance failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (email, error);
	}
}

/// Reports a delivery failure that was hidden from the caller.
pub fn report_delivery_failure(email: &EmailAddress, error: &dyn Display) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(email = email.as_str(), %error, "reset email delivery failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (email, error);
	}
}

/// Records a message that dry-run mode withheld. The link is logged without its token.
pub fn report_dry_run(email: &EmailAddress, reset_base: &Url, expires_at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	{
		tracing::info!(
			email = email.as_str(),
			reset_base = reset_base.as_str(),
			%expires_at,
			"dry run: reset email not sent"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (email, reset_base, expires_at);
	}
}
