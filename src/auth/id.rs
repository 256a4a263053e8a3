//! Normalized identity keys enforced across the broker domain.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const EMAIL_MAX_LEN: usize = 254;

/// Error returned when identity validation fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentityError {
	/// The identity was empty or whitespace.
	#[error("Email address cannot be empty.")]
	Empty,
	/// The identity is not shaped like an email address.
	#[error("Email address must contain '@'.")]
	MissingAt,
	/// The identity contains whitespace between its first and last characters.
	#[error("Email address contains whitespace.")]
	ContainsWhitespace,
	/// The identity exceeded the allowed character count.
	#[error("Email address exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Email-shaped identity key, trimmed and lowercased on construction.
///
/// Only the minimal shape is checked (non-empty, contains `@`); deliverability is the mailer's
/// concern. Two inputs that differ in case or surrounding whitespace map to the same key, so
/// rate-limit and token state cannot be split across spellings of one address.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);
impl EmailAddress {
	/// Normalizes and validates a raw address.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentityError> {
		let view = value.as_ref().trim();

		validate_view(view)?;

		Ok(Self(view.to_lowercase()))
	}

	/// Returns the normalized address.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns the local part (before the last `@`).
	pub fn local_part(&self) -> &str {
		self.0.rsplit_once('@').map_or(self.0.as_str(), |(local, _)| local)
	}

	/// Returns the domain part (after the last `@`).
	pub fn domain(&self) -> &str {
		self.0.rsplit_once('@').map_or("", |(_, domain)| domain)
	}
}
impl Deref for EmailAddress {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for EmailAddress {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<EmailAddress> for String {
	fn from(value: EmailAddress) -> Self {
		value.0
	}
}
impl TryFrom<String> for EmailAddress {
	type Error = IdentityError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl Borrow<str> for EmailAddress {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl Debug for EmailAddress {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "EmailAddress({})", self.0)
	}
}
impl Display for EmailAddress {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for EmailAddress {
	type Err = IdentityError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), IdentityError> {
	if view.is_empty() {
		return Err(IdentityError::Empty);
	}
	if !view.contains('@') {
		return Err(IdentityError::MissingAt);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentityError::ContainsWhitespace);
	}
	if view.chars().count() > EMAIL_MAX_LEN {
		return Err(IdentityError::TooLong { max: EMAIL_MAX_LEN });
	}

	Ok(())
}
