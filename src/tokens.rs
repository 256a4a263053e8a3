//! Single-use reset token lifecycle: issue, validate, consume, and sweep.
//!
//! Tokens move from `Active` to `Used` (via [`TokenManager::consume`]) or `Expired` (by the clock)
//! and never back. Validation is read-only; redemption is a compare-and-set on the store, so two
//! callers racing on one token see exactly one success.

// self
use crate::{
	_prelude::*,
	auth::{EmailAddress, IssuedToken, ResetTokenRecord, TokenRejection, TokenSecret, TokenState},
	clock::{Clock, SystemClock},
	error::ConfigError,
	store::{MemoryTokenStore, RedeemOutcome, TokenDigest, TokenStore},
};

/// Lifetime and credential rules applied to issued tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPolicy {
	/// How long a token stays valid after issuance.
	pub ttl: Duration,
	/// Minimum character count accepted for the replacement credential.
	pub min_credential_len: usize,
}
impl TokenPolicy {
	/// One-hour tokens, eight-character credentials.
	pub const DEFAULT: Self = Self { ttl: Duration::hours(1), min_credential_len: 8 };

	/// Rejects policies that would issue dead tokens or accept empty credentials.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !self.ttl.is_positive() {
			return Err(ConfigError::NonPositiveTokenTtl);
		}
		if self.min_credential_len == 0 {
			return Err(ConfigError::ZeroCredentialLength);
		}

		Ok(())
	}
}
impl Default for TokenPolicy {
	fn default() -> Self {
		Self::DEFAULT
	}
}

/// Issues and redeems reset tokens against a [`TokenStore`].
pub struct TokenManager {
	store: Arc<dyn TokenStore>,
	clock: Arc<dyn Clock>,
	policy: TokenPolicy,
}
impl TokenManager {
	/// Creates a manager over a fresh in-memory store and the system clock.
	pub fn in_memory() -> Self {
		Self::new(Arc::new(MemoryTokenStore::default()), Arc::new(SystemClock))
	}

	/// Creates a manager over the provided store and clock with the default policy.
	pub fn new(store: Arc<dyn TokenStore>, clock: Arc<dyn Clock>) -> Self {
		Self { store, clock, policy: TokenPolicy::DEFAULT }
	}

	/// Overrides the token policy.
	pub fn with_policy(mut self, policy: TokenPolicy) -> Self {
		self.policy = policy;

		self
	}

	/// Returns the policy applied to new tokens.
	pub fn policy(&self) -> TokenPolicy {
		self.policy
	}

	/// Issues a token bound to `identity`, valid for the policy TTL.
	///
	/// Fails with [`Error::InvalidIdentity`] when the identity is not email-shaped.
	pub fn generate(&self, identity: &str) -> Result<IssuedToken> {
		let identity = EmailAddress::new(identity)?;
		let issued_at = self.clock.now();
		let token = TokenSecret::generate();
		let record = ResetTokenRecord::new(identity.clone(), issued_at, self.policy.ttl);
		let expires_at = record.expires_at;

		self.store.insert(token.digest(), record)?;

		Ok(IssuedToken { token, identity, issued_at, expires_at })
	}

	/// Checks `token` without changing its state and returns the bound identity.
	///
	/// Rejections are checked in order: missing, unknown, already used, expired.
	pub fn validate(&self, token: &str) -> Result<EmailAddress> {
		let digest = Self::digest(token)?;
		let record = self.store.fetch(&digest)?.ok_or(TokenRejection::Unknown)?;
		let identity = record.verdict_at(self.clock.now())?;

		Ok(identity.clone())
	}

	/// Redeems `token`, accepting `new_credential` if it meets the length policy.
	///
	/// A credential that is too short leaves the token active. Once redeemed, every later call
	/// fails with [`TokenRejection::AlreadyUsed`].
	pub fn consume(&self, token: &str, new_credential: &str) -> Result<EmailAddress> {
		self.validate(token)?;

		let min_len = self.policy.min_credential_len;

		if new_credential.chars().count() < min_len {
			return Err(Error::WeakCredential { min_len });
		}

		match self.store.redeem(&TokenDigest::of(token), self.clock.now())? {
			RedeemOutcome::Redeemed(record) => Ok(record.identity),
			RedeemOutcome::AlreadyUsed => Err(TokenRejection::AlreadyUsed.into()),
			RedeemOutcome::Expired => Err(TokenRejection::Expired.into()),
			RedeemOutcome::Missing => Err(TokenRejection::Unknown.into()),
		}
	}

	/// Removes every record past its expiry, used or not; returns how many were removed.
	pub fn cleanup_expired(&self) -> Result<usize> {
		Ok(self.store.purge_expired(self.clock.now())?)
	}

	/// Reports the lifecycle state of `token`, or `None` if it is unknown.
	pub fn state(&self, token: &str) -> Result<Option<TokenState>> {
		let digest = Self::digest(token)?;
		let now = self.clock.now();

		Ok(self.store.fetch(&digest)?.map(|record| record.state_at(now)))
	}

	fn digest(token: &str) -> Result<TokenDigest, TokenRejection> {
		if token.is_empty() {
			return Err(TokenRejection::Required);
		}

		Ok(TokenDigest::of(token))
	}
}
impl Debug for TokenManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager").field("policy", &self.policy).finish()
	}
}
