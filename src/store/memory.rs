//! Thread-safe in-memory [`TokenStore`] implementation.

// self
use crate::{
	_prelude::*,
	auth::{ResetTokenRecord, TokenState},
	store::{RedeemOutcome, StoreError, TokenDigest, TokenStore},
};

type StoreMap = RwLock<HashMap<TokenDigest, ResetTokenRecord>>;

/// Process-local storage backend; state is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryTokenStore(StoreMap);
impl MemoryTokenStore {
	/// Number of records currently held, including used and expired ones.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no records are held.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl TokenStore for MemoryTokenStore {
	fn insert(&self, digest: TokenDigest, record: ResetTokenRecord) -> Result<(), StoreError> {
		self.0.write().insert(digest, record);

		Ok(())
	}

	fn fetch(&self, digest: &TokenDigest) -> Result<Option<ResetTokenRecord>, StoreError> {
		Ok(self.0.read().get(digest).cloned())
	}

	fn redeem(
		&self,
		digest: &TokenDigest,
		instant: OffsetDateTime,
	) -> Result<RedeemOutcome, StoreError> {
		let mut guard = self.0.write();
		let outcome = match guard.get_mut(digest) {
			Some(record) => match record.state_at(instant) {
				TokenState::Active => {
					record.mark_used(instant);

					RedeemOutcome::Redeemed(record.clone())
				},
				TokenState::Used => RedeemOutcome::AlreadyUsed,
				TokenState::Expired => RedeemOutcome::Expired,
			},
			None => RedeemOutcome::Missing,
		};

		Ok(outcome)
	}

	fn purge_expired(&self, instant: OffsetDateTime) -> Result<usize, StoreError> {
		let mut guard = self.0.write();
		let before = guard.len();

		guard.retain(|_, record| !record.is_expired_at(instant));

		Ok(before - guard.len())
	}
}
