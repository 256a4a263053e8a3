//! Account lookup contract consulted before issuing reset tokens.

// self
use crate::{_prelude::*, auth::EmailAddress};

/// Answers whether an identity belongs to a known account.
pub trait AccountDirectory
where
	Self: Send + Sync,
{
	/// Returns `true` if the normalized address is registered.
	fn is_registered(&self, email: &EmailAddress) -> bool;
}

/// Thread-safe in-process directory for local development and tests.
#[derive(Debug, Default)]
pub struct MemoryDirectory(RwLock<HashSet<EmailAddress>>);
impl MemoryDirectory {
	/// Builds a directory seeded with the provided addresses.
	pub fn with_accounts<I>(emails: I) -> Self
	where
		I: IntoIterator<Item = EmailAddress>,
	{
		Self(RwLock::new(emails.into_iter().collect()))
	}

	/// Registers an address; returns `false` if it was already present.
	pub fn register(&self, email: EmailAddress) -> bool {
		self.0.write().insert(email)
	}

	/// Removes an address; returns `true` if it was present.
	pub fn unregister(&self, email: &EmailAddress) -> bool {
		self.0.write().remove(email)
	}
}
impl AccountDirectory for MemoryDirectory {
	fn is_registered(&self, email: &EmailAddress) -> bool {
		self.0.read().contains(email)
	}
}
