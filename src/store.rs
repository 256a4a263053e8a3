//! Storage contracts and the built-in store for reset token records.

pub mod memory;

pub use memory::MemoryTokenStore;

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, auth::ResetTokenRecord};

/// Storage backend contract implemented by reset token stores.
///
/// Stores are keyed by [`TokenDigest`] so raw secrets never rest in the backend.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the record under `digest`.
	fn insert(&self, digest: TokenDigest, record: ResetTokenRecord) -> Result<(), StoreError>;

	/// Fetches the record stored under `digest`, if present.
	fn fetch(&self, digest: &TokenDigest) -> Result<Option<ResetTokenRecord>, StoreError>;

	/// Atomically marks the record used if it is still active at `instant`.
	fn redeem(
		&self,
		digest: &TokenDigest,
		instant: OffsetDateTime,
	) -> Result<RedeemOutcome, StoreError>;

	/// Removes every record whose expiry is at or before `instant`; returns how many went.
	fn purge_expired(&self, instant: OffsetDateTime) -> Result<usize, StoreError>;
}

/// Result of a redemption compare-and-set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedeemOutcome {
	/// The record was active and is now marked used; carries the updated record.
	Redeemed(ResetTokenRecord),
	/// The record had already been redeemed.
	AlreadyUsed,
	/// The record expired before redemption.
	Expired,
	/// No record matched the digest.
	Missing,
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// SHA-256 fingerprint (URL-safe base64, no padding) identifying a stored token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenDigest(String);
impl TokenDigest {
	/// Hashes a raw token secret.
	pub fn of(secret: &str) -> Self {
		let mut hasher = Sha256::new();

		hasher.update(secret.as_bytes());

		Self(URL_SAFE_NO_PAD.encode(hasher.finalize()))
	}

	/// Returns the encoded digest.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
