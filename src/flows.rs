//! Reset flow orchestration over the limiter, token manager, directory, and mailer.

pub mod complete;
pub mod request;

mod metrics;

pub use metrics::ResetMetrics;
pub use request::*;

// self
use crate::{
	_prelude::*,
	auth::AccountDirectory,
	clock::{Clock, SystemClock},
	config::ResetConfig,
	notify::Mailer,
	rate_limit::RateLimiter,
	store::{MemoryTokenStore, TokenStore},
	tokens::TokenManager,
};

/// Coordinates password-reset requests and completions for one deployment.
///
/// The broker owns the rate limiter and token manager built from its [`ResetConfig`], and
/// borrows the account directory and mailer supplied by the caller. It has no transport of its
/// own; an HTTP handler, CLI, or job maps its outcomes onto whatever surface it exposes.
#[derive(Clone)]
pub struct ResetBroker {
	/// Validated configuration the broker was built from.
	pub config: ResetConfig,
	/// Per-identity request limiter.
	pub limiter: Arc<RateLimiter>,
	/// Token lifecycle manager.
	pub tokens: Arc<TokenManager>,
	/// Account lookup consulted before issuing tokens.
	pub directory: Arc<dyn AccountDirectory>,
	/// Delivery channel used in [`DeliveryMode::Live`](crate::config::DeliveryMode::Live).
	pub mailer: Arc<dyn Mailer>,
	/// Shared counters for flow outcomes.
	pub metrics: Arc<ResetMetrics>,
}
impl ResetBroker {
	/// Creates a broker over an in-memory token store and the system clock.
	pub fn new(
		config: ResetConfig,
		directory: Arc<dyn AccountDirectory>,
		mailer: Arc<dyn Mailer>,
	) -> Self {
		Self::with_parts(
			config,
			Arc::new(MemoryTokenStore::default()),
			Arc::new(SystemClock),
			directory,
			mailer,
		)
	}

	/// Creates a broker over caller-provided storage and clock.
	pub fn with_parts(
		config: ResetConfig,
		store: Arc<dyn TokenStore>,
		clock: Arc<dyn Clock>,
		directory: Arc<dyn AccountDirectory>,
		mailer: Arc<dyn Mailer>,
	) -> Self {
		let limiter = Arc::new(RateLimiter::with_clock(config.rate_limit, clock.clone()));
		let tokens = Arc::new(TokenManager::new(store, clock).with_policy(config.token));

		Self { config, limiter, tokens, directory, mailer, metrics: Default::default() }
	}
}
impl Debug for ResetBroker {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ResetBroker")
			.field("config", &self.config)
			.field("limiter", &self.limiter)
			.field("tokens", &self.tokens)
			.finish()
	}
}
