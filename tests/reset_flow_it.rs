// crates.io
use color_eyre::Result;
use time::{Duration, macros};
// self
use reset_broker::{
	auth::{EmailAddress, MemoryDirectory, TokenRejection},
	clock::ManualClock,
	config::{ResetConfig, ResetConfigBuilder},
	error::Error,
	flows::{ResetBroker, ResetRequestOutcome},
	notify::{MailError, Mailer, OutboxMailer, ResetEmail},
	store::MemoryTokenStore,
	url::Url,
};
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};

struct FailingMailer(AtomicUsize);
impl Mailer for FailingMailer {
	fn send(&self, _message: &ResetEmail) -> Result<(), MailError> {
		self.0.fetch_add(1, Ordering::Relaxed);

		Err(MailError::Delivery { message: "smtp relay unavailable".into() })
	}
}

struct Harness {
	broker: ResetBroker,
	outbox: Arc<OutboxMailer>,
	clock: Arc<ManualClock>,
}

fn email(value: &str) -> EmailAddress {
	EmailAddress::new(value).expect("Email fixture should be valid.")
}

fn config_builder() -> ResetConfigBuilder {
	let base = Url::parse("https://example.com/reset").expect("Reset base fixture should parse.");

	ResetConfig::builder(base)
}

fn build_harness(builder: ResetConfigBuilder) -> Harness {
	let config = builder.build().expect("Config fixture should be valid.");
	let directory = Arc::new(MemoryDirectory::with_accounts([
		email("user@example.com"),
		email("admin@example.com"),
	]));
	let outbox = Arc::new(OutboxMailer::default());
	let clock = Arc::new(ManualClock::new(macros::datetime!(2025-11-10 12:00 UTC)));
	let broker = ResetBroker::with_parts(
		config,
		Arc::new(MemoryTokenStore::default()),
		clock.clone(),
		directory,
		outbox.clone(),
	);

	Harness { broker, outbox, clock }
}

fn token_from(message: &ResetEmail) -> String {
	message
		.reset_link
		.query_pairs()
		.find(|(key, _)| key == "token")
		.map(|(_, value)| value.into_owned())
		.expect("Reset link should carry a token.")
}

#[test]
fn registered_user_receives_a_working_link() -> Result<()> {
	let Harness { broker, outbox, .. } = build_harness(config_builder());
	let outcome = broker.request_reset("User@Example.com ", Some("192.168.1.1"))?;

	assert_eq!(outcome, ResetRequestOutcome::Accepted);

	let message =
		outbox.last_to(&email("user@example.com")).expect("Registered user should get mail.");

	assert!(message.reset_link.as_str().starts_with("https://example.com/reset?token="));
	assert!(message.body().contains(message.reset_link.as_str()));
	assert_eq!(message.expires_at, macros::datetime!(2025-11-10 13:00 UTC));

	let token = token_from(&message);

	assert_eq!(broker.validate_reset(&token)?, email("user@example.com"));
	assert_eq!(broker.complete_reset(&token, "longenough1")?, email("user@example.com"));

	let err = broker.validate_reset(&token).expect_err("Redeemed token must not validate.");

	assert_eq!(err.rejection(), Some(TokenRejection::AlreadyUsed));
	assert_eq!(broker.metrics.issued(), 1);
	assert_eq!(broker.metrics.redeemed(), 1);
	assert_eq!(broker.metrics.rejected(), 1);

	Ok(())
}

#[test]
fn unknown_addresses_get_the_same_answer_and_no_mail() -> Result<()> {
	let Harness { broker, outbox, .. } = build_harness(config_builder());
	let known = broker.request_reset("user@example.com", None)?;
	let unknown = broker.request_reset("unknown@example.com", None)?;

	assert_eq!(known, unknown);
	assert_eq!(known.message(), unknown.message());
	assert_eq!(outbox.sent().len(), 1);
	assert_eq!(broker.metrics.issued(), 1);

	Ok(())
}

#[test]
fn malformed_addresses_fail_fast() {
	let Harness { broker, outbox, .. } = build_harness(config_builder());
	let err = broker.request_reset("notanemail", None).expect_err("Missing '@' must fail.");

	assert!(matches!(err, Error::InvalidIdentity(_)));
	assert!(outbox.sent().is_empty());
	assert_eq!(broker.metrics.requests(), 1);
}

#[test]
fn fourth_request_is_throttled_then_recovers() -> Result<()> {
	let Harness { broker, outbox, clock } = build_harness(config_builder());

	for _ in 0..3 {
		assert!(broker.request_reset("user@example.com", None)?.is_accepted());

		clock.advance(Duration::minutes(1));
	}

	let outcome = broker.request_reset("user@example.com", None)?;

	// Oldest request at 12:00, now 12:03.
	assert_eq!(outcome, ResetRequestOutcome::RateLimited { retry_after: 12 * 60 });
	assert_eq!(outcome.message(), "Too many reset requests. Please try again in 12 minutes.");
	assert_eq!(outbox.sent().len(), 3);
	assert_eq!(broker.metrics.throttled(), 1);

	// Spelling variants share one budget.
	assert!(!broker.request_reset(" USER@example.com", None)?.is_accepted());

	clock.set(macros::datetime!(2025-11-10 12:15 UTC));

	assert!(broker.request_reset("user@example.com", None)?.is_accepted());
	assert_eq!(outbox.sent().len(), 4);

	Ok(())
}

#[test]
fn unregistered_addresses_are_throttled_too() -> Result<()> {
	let Harness { broker, .. } = build_harness(config_builder());

	for _ in 0..3 {
		broker.request_reset("ghost@example.com", None)?;
	}

	assert!(matches!(
		broker.request_reset("ghost@example.com", None)?,
		ResetRequestOutcome::RateLimited { .. }
	));

	Ok(())
}

#[test]
fn dry_run_issues_tokens_without_mail() -> Result<()> {
	let Harness { broker, outbox, .. } = build_harness(config_builder().dry_run());

	assert!(broker.request_reset("user@example.com", None)?.is_accepted());
	assert!(outbox.sent().is_empty());
	assert_eq!(broker.metrics.issued(), 1);

	Ok(())
}

#[test]
fn delivery_failures_are_hidden_from_the_caller() -> Result<()> {
	let config = config_builder().build()?;
	let mailer = Arc::new(FailingMailer(AtomicUsize::new(0)));
	let broker = ResetBroker::new(
		config,
		Arc::new(MemoryDirectory::with_accounts([email("user@example.com")])),
		mailer.clone(),
	);

	assert_eq!(broker.request_reset("user@example.com", None)?, ResetRequestOutcome::Accepted);
	assert_eq!(mailer.0.load(Ordering::Relaxed), 1);

	Ok(())
}

#[test]
fn cleanup_sweeps_lapsed_links() -> Result<()> {
	let Harness { broker, outbox, clock } = build_harness(config_builder());

	broker.request_reset("user@example.com", None)?;
	broker.request_reset("admin@example.com", None)?;
	clock.advance(Duration::minutes(61));

	let token = token_from(&outbox.sent()[0]);
	let err = broker.complete_reset(&token, "longenough1").expect_err("Lapsed link must fail.");

	assert_eq!(err.rejection(), Some(TokenRejection::Expired));
	assert_eq!(broker.cleanup()?, 2);

	let err = broker.validate_reset(&token).expect_err("Swept token must be unknown.");

	assert_eq!(err.rejection(), Some(TokenRejection::Unknown));

	Ok(())
}

#[test]
fn json_config_drives_the_broker() -> Result<()> {
	let config = ResetConfig::from_json(
		r#"{
			"reset_base": "https://accounts.example.com/recover",
			"max_requests": 1,
			"window_minutes": 5,
			"token_ttl_minutes": 10,
			"min_credential_len": 12
		}"#,
	)?;
	let outbox = Arc::new(OutboxMailer::default());
	let broker = ResetBroker::new(
		config,
		Arc::new(MemoryDirectory::with_accounts([email("user@example.com")])),
		outbox.clone(),
	);

	assert!(broker.request_reset("user@example.com", None)?.is_accepted());
	assert!(!broker.request_reset("user@example.com", None)?.is_accepted());

	let message = outbox.sent().pop().expect("One message should have been sent.");

	assert!(message.reset_link.as_str().starts_with("https://accounts.example.com/recover?token="));
	assert!(message.body().contains("expire in 10 minutes"));

	let err = broker
		.complete_reset(&token_from(&message), "elevenchars")
		.expect_err("Credential policy from config must apply.");

	assert!(matches!(err, Error::WeakCredential { min_len: 12 }));

	Ok(())
}
