//! Reset token records, lifecycle states, and issuance receipts.

// self
use crate::{
	_prelude::*,
	auth::{EmailAddress, token::secret::TokenSecret},
};

/// Current lifecycle status for a reset token record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenState {
	/// Token is issued, unused, and unexpired.
	Active,
	/// Token has been redeemed and must not be reused.
	Used,
	/// Token reached its expiry instant without being redeemed.
	Expired,
}

/// Reason a token failed validation, in the order checks are applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ThisError)]
#[serde(rename_all = "snake_case")]
pub enum TokenRejection {
	/// No token was supplied.
	#[error("token required")]
	Required,
	/// Token was never issued or has been cleaned up.
	#[error("invalid token")]
	Unknown,
	/// Token was already redeemed.
	#[error("already used")]
	AlreadyUsed,
	/// Token outlived its expiry instant.
	#[error("expired")]
	Expired,
}
impl TokenRejection {
	/// Returns the stable caller-facing reason string.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenRejection::Required => "token required",
			TokenRejection::Unknown => "invalid token",
			TokenRejection::AlreadyUsed => "already used",
			TokenRejection::Expired => "expired",
		}
	}
}

/// Server-side record bound to an issued reset token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetTokenRecord {
	/// Identity the token was issued for.
	pub identity: EmailAddress,
	/// Issuance instant.
	pub issued_at: OffsetDateTime,
	/// Instant at which the token stops validating.
	pub expires_at: OffsetDateTime,
	/// Redemption instant if the token has been consumed.
	pub used_at: Option<OffsetDateTime>,
}
impl ResetTokenRecord {
	/// Creates an active record that expires `ttl` after `issued_at`.
	pub fn new(identity: EmailAddress, issued_at: OffsetDateTime, ttl: Duration) -> Self {
		Self { identity, issued_at, expires_at: issued_at + ttl, used_at: None }
	}

	/// Computes the lifecycle state at a given instant.
	///
	/// A used token reports [`TokenState::Used`] even after its expiry so callers see the
	/// redemption rather than the lapse.
	pub fn state_at(&self, instant: OffsetDateTime) -> TokenState {
		if self.used_at.is_some() {
			return TokenState::Used;
		}
		if self.is_expired_at(instant) {
			return TokenState::Expired;
		}

		TokenState::Active
	}

	/// Returns `true` once `instant` reaches the expiry, regardless of redemption.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}

	/// Returns `true` if the record has been redeemed.
	pub fn is_used(&self) -> bool {
		self.used_at.is_some()
	}

	/// Marks the record as redeemed.
	pub fn mark_used(&mut self, instant: OffsetDateTime) {
		self.used_at = Some(instant);
	}

	/// Maps the state at `instant` onto a validation verdict.
	pub fn verdict_at(&self, instant: OffsetDateTime) -> Result<&EmailAddress, TokenRejection> {
		match self.state_at(instant) {
			TokenState::Active => Ok(&self.identity),
			TokenState::Used => Err(TokenRejection::AlreadyUsed),
			TokenState::Expired => Err(TokenRejection::Expired),
		}
	}
}

/// Receipt handed back to the caller after issuing a token.
///
/// This is the only place the raw secret is ever returned; the store keeps a digest.
#[derive(Clone, Debug, Serialize)]
pub struct IssuedToken {
	/// Opaque secret to deliver to the identity owner.
	pub token: TokenSecret,
	/// Identity the token is bound to.
	pub identity: EmailAddress,
	/// Issuance instant.
	pub issued_at: OffsetDateTime,
	/// Expiry instant.
	pub expires_at: OffsetDateTime,
}
impl IssuedToken {
	/// Builds the link the identity owner follows, appending `token=<secret>` to `base`.
	pub fn reset_link(&self, base: &Url) -> Url {
		let mut url = base.clone();

		url.query_pairs_mut().append_pair("token", self.token.expose());

		url
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn record() -> ResetTokenRecord {
		let identity = EmailAddress::new("a@b.com").expect("Identity fixture should be valid.");

		ResetTokenRecord::new(identity, macros::datetime!(2025-01-01 00:00 UTC), Duration::hours(1))
	}

	#[test]
	fn state_transitions_cover_all_states() {
		let mut record = record();

		assert_eq!(record.expires_at, macros::datetime!(2025-01-01 01:00 UTC));
		assert_eq!(record.state_at(macros::datetime!(2025-01-01 00:30 UTC)), TokenState::Active);
		assert_eq!(record.state_at(macros::datetime!(2025-01-01 01:00 UTC)), TokenState::Expired);

		record.mark_used(macros::datetime!(2025-01-01 00:10 UTC));

		assert!(record.is_used());
		assert_eq!(record.state_at(macros::datetime!(2025-01-01 00:30 UTC)), TokenState::Used);
		assert_eq!(record.state_at(macros::datetime!(2025-01-01 02:00 UTC)), TokenState::Used);
	}

	#[test]
	fn verdicts_map_states_to_rejections() {
		let mut record = record();

		assert_eq!(
			record.verdict_at(macros::datetime!(2025-01-01 00:59 UTC)).map(ToString::to_string),
			Ok("a@b.com".to_owned())
		);
		assert_eq!(
			record.verdict_at(macros::datetime!(2025-01-01 01:01 UTC)),
			Err(TokenRejection::Expired)
		);

		record.mark_used(macros::datetime!(2025-01-01 00:10 UTC));

		assert_eq!(
			record.verdict_at(macros::datetime!(2025-01-01 00:20 UTC)),
			Err(TokenRejection::AlreadyUsed)
		);
	}

	#[test]
	fn rejection_reasons_are_stable() {
		for rejection in [
			TokenRejection::Required,
			TokenRejection::Unknown,
			TokenRejection::AlreadyUsed,
			TokenRejection::Expired,
		] {
			assert_eq!(rejection.to_string(), rejection.as_str());
		}

		let payload = serde_json::to_string(&TokenRejection::AlreadyUsed)
			.expect("TokenRejection should serialize to JSON.");

		assert_eq!(payload, "\"already_used\"");
	}

	#[test]
	fn reset_link_appends_token_query() {
		let identity = EmailAddress::new("a@b.com").expect("Identity fixture should be valid.");
		let issued = IssuedToken {
			token: TokenSecret::new("abc-_123"),
			identity,
			issued_at: macros::datetime!(2025-01-01 00:00 UTC),
			expires_at: macros::datetime!(2025-01-01 01:00 UTC),
		};
		let base = Url::parse("https://example.com/reset?lang=en")
			.expect("Base URL fixture should parse.");

		assert_eq!(
			issued.reset_link(&base).as_str(),
			"https://example.com/reset?lang=en&token=abc-_123"
		);
	}
}
