//! Broker configuration, its builder, and JSON loading.

// self
use crate::{_prelude::*, error::ConfigError, rate_limit::RateLimitPolicy, tokens::TokenPolicy};

/// How reset messages leave the broker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
	#[default]
	/// Hand every message to the configured mailer.
	Live,
	/// Log what would be sent and never touch the mailer.
	DryRun,
}

/// Validated settings consumed by [`ResetBroker`](crate::flows::ResetBroker).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResetConfig {
	/// Per-identity request budget.
	pub rate_limit: RateLimitPolicy,
	/// Token lifetime and credential rules.
	pub token: TokenPolicy,
	/// Page that receives `?token=...` in reset links.
	pub reset_base: Url,
	/// Whether messages are actually delivered.
	pub delivery: DeliveryMode,
}
impl ResetConfig {
	/// Creates a builder seeded with default policies.
	pub fn builder(reset_base: Url) -> ResetConfigBuilder {
		ResetConfigBuilder::new(reset_base)
	}

	/// Parses a flat JSON document and validates it.
	///
	/// Only `reset_base` is required; other keys fall back to the default policies.
	pub fn from_json(payload: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(payload);
		let file: ResetConfigFile = serde_path_to_error::deserialize(&mut de)?;

		file.into_builder().build()
	}
}

/// Builder for [`ResetConfig`] values.
#[derive(Debug)]
pub struct ResetConfigBuilder {
	/// Per-identity request budget.
	pub rate_limit: RateLimitPolicy,
	/// Token lifetime and credential rules.
	pub token: TokenPolicy,
	/// Page that receives `?token=...` in reset links.
	pub reset_base: Url,
	/// Whether messages are actually delivered.
	pub delivery: DeliveryMode,
}
impl ResetConfigBuilder {
	/// Creates a new builder for the provided link base.
	pub fn new(reset_base: Url) -> Self {
		Self {
			rate_limit: RateLimitPolicy::DEFAULT,
			token: TokenPolicy::DEFAULT,
			reset_base,
			delivery: DeliveryMode::default(),
		}
	}

	/// Overrides the rate limit policy.
	pub fn rate_limit(mut self, policy: RateLimitPolicy) -> Self {
		self.rate_limit = policy;

		self
	}

	/// Overrides the token policy.
	pub fn token_policy(mut self, policy: TokenPolicy) -> Self {
		self.token = policy;

		self
	}

	/// Overrides the delivery mode.
	pub fn delivery(mut self, mode: DeliveryMode) -> Self {
		self.delivery = mode;

		self
	}

	/// Shorthand for [`DeliveryMode::DryRun`].
	pub fn dry_run(self) -> Self {
		self.delivery(DeliveryMode::DryRun)
	}

	/// Validates and produces a [`ResetConfig`].
	pub fn build(self) -> Result<ResetConfig, ConfigError> {
		self.rate_limit.validate()?;
		self.token.validate()?;

		if self.reset_base.scheme() != "https" {
			return Err(ConfigError::InsecureResetBase { url: self.reset_base.to_string() });
		}

		Ok(ResetConfig {
			rate_limit: self.rate_limit,
			token: self.token,
			reset_base: self.reset_base,
			delivery: self.delivery,
		})
	}
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResetConfigFile {
	reset_base: Url,
	#[serde(default = "ResetConfigFile::default_max_requests")]
	max_requests: usize,
	#[serde(default = "ResetConfigFile::default_window_minutes")]
	window_minutes: u32,
	#[serde(default = "ResetConfigFile::default_token_ttl_minutes")]
	token_ttl_minutes: u32,
	#[serde(default = "ResetConfigFile::default_min_credential_len")]
	min_credential_len: usize,
	#[serde(default)]
	delivery: DeliveryMode,
}
impl ResetConfigFile {
	fn default_max_requests() -> usize {
		RateLimitPolicy::DEFAULT.max_requests
	}

	fn default_window_minutes() -> u32 {
		RateLimitPolicy::DEFAULT.window.whole_minutes() as u32
	}

	fn default_token_ttl_minutes() -> u32 {
		TokenPolicy::DEFAULT.ttl.whole_minutes() as u32
	}

	fn default_min_credential_len() -> usize {
		TokenPolicy::DEFAULT.min_credential_len
	}

	fn into_builder(self) -> ResetConfigBuilder {
		ResetConfigBuilder::new(self.reset_base)
			.rate_limit(RateLimitPolicy {
				max_requests: self.max_requests,
				window: Duration::minutes(self.window_minutes.into()),
			})
			.token_policy(TokenPolicy {
				ttl: Duration::minutes(self.token_ttl_minutes.into()),
				min_credential_len: self.min_credential_len,
			})
			.delivery(self.delivery)
	}
}
