//! Broker-level error types shared across the limiter, token manager, stores, and flows.

// self
use crate::_prelude::*;

/// Broker-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical broker error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Identity is empty or not shaped like an email address.
	#[error(transparent)]
	InvalidIdentity(#[from] crate::auth::IdentityError),
	/// Token failed validation; the rejection carries the caller-facing reason.
	#[error(transparent)]
	Rejected(#[from] crate::auth::TokenRejection),

	/// Replacement credential does not meet the length policy.
	#[error("New credential must be at least {min_len} characters.")]
	WeakCredential {
		/// Minimum accepted character count.
		min_len: usize,
	},
}
impl Error {
	/// Returns the token rejection carried by this error, if any.
	pub fn rejection(&self) -> Option<crate::auth::TokenRejection> {
		match self {
			Self::Rejected(rejection) => Some(*rejection),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised while assembling a broker.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Configuration document could not be parsed.
	#[error("Configuration document is malformed.")]
	Parse {
		/// Structured parsing failure including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Reset link base is not served over HTTPS.
	#[error("The reset link base must use HTTPS: {url}.")]
	InsecureResetBase {
		/// Base URL that failed validation.
		url: String,
	},

	/// Rate limit policy admits nothing.
	#[error("Rate limit must admit at least one request per window.")]
	ZeroRequestBudget,
	/// Rate limit window is zero or negative.
	#[error("Rate limit window must be positive.")]
	NonPositiveWindow,
	/// Token lifetime is zero or negative.
	#[error("Token lifetime must be positive.")]
	NonPositiveTokenTtl,
	/// Credential length policy accepts empty credentials.
	#[error("Minimum credential length must be at least one character.")]
	ZeroCredentialLength,
}
impl From<serde_path_to_error::Error<serde_json::Error>> for ConfigError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		Self::Parse { source: e }
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::{
		auth::{IdentityError, TokenRejection},
		store::StoreError,
	};

	#[test]
	fn store_error_converts_into_broker_error_with_source() {
		let store_error = StoreError::Backend { message: "lock poisoned".into() };
		let broker_error: Error = store_error.clone().into();

		assert!(matches!(broker_error, Error::Storage(_)));
		assert!(broker_error.to_string().contains("lock poisoned"));

		let source = StdError::source(&broker_error)
			.expect("Broker error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn rejections_render_caller_facing_reasons() {
		let err: Error = TokenRejection::AlreadyUsed.into();

		assert_eq!(err.to_string(), "already used");
		assert_eq!(err.rejection(), Some(TokenRejection::AlreadyUsed));

		let err: Error = IdentityError::MissingAt.into();

		assert!(err.rejection().is_none());
		assert!(matches!(err, Error::InvalidIdentity(IdentityError::MissingAt)));
	}

	#[test]
	fn weak_credential_reports_the_minimum() {
		let err = Error::WeakCredential { min_len: 8 };

		assert_eq!(err.to_string(), "New credential must be at least 8 characters.");
	}
}
