//! Outbound reset messages and the mailer contract that delivers them.

// self
use crate::{_prelude::*, auth::EmailAddress};

/// Delivery failure reported by a [`Mailer`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum MailError {
	/// The transport rejected or dropped the message.
	#[error("Reset email could not be delivered: {message}.")]
	Delivery {
		/// Transport-supplied reason.
		message: String,
	},
}

/// Sends reset messages to identity owners.
pub trait Mailer
where
	Self: Send + Sync,
{
	/// Delivers one message.
	fn send(&self, message: &ResetEmail) -> Result<(), MailError>;
}

/// Reset instructions addressed to one identity.
#[derive(Clone, Serialize)]
pub struct ResetEmail {
	/// Recipient.
	pub to: EmailAddress,
	/// Link carrying the reset token.
	pub reset_link: Url,
	/// Instant after which the link stops working.
	pub expires_at: OffsetDateTime,
	/// Lifetime of the link, rendered into the body.
	pub ttl: Duration,
}
impl ResetEmail {
	/// Subject line.
	pub fn subject(&self) -> &'static str {
		"Reset your password"
	}

	/// Plain-text body.
	pub fn body(&self) -> String {
		format!(
			"Dear User,\n\n\
			You recently requested to reset your password for your account.\n\n\
			Click the link below to reset your password:\n{link}\n\n\
			If you did not request this password reset, please ignore this email or contact \
			support if you have concerns.\n\n\
			For security reasons:\n\
			- This link will expire in {lifetime}\n\
			- Do not share this link with anyone\n\
			- We will never ask for your password via email\n",
			link = self.reset_link,
			lifetime = describe_lifetime(self.ttl),
		)
	}
}
impl Debug for ResetEmail {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ResetEmail")
			.field("to", &self.to)
			.field("reset_link", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Mailer that keeps every message in memory, for tests and local development.
#[derive(Debug, Default)]
pub struct OutboxMailer(Mutex<Vec<ResetEmail>>);
impl OutboxMailer {
	/// Returns a snapshot of the messages sent so far.
	pub fn sent(&self) -> Vec<ResetEmail> {
		self.0.lock().clone()
	}

	/// Returns the most recent message for `to`, if any.
	pub fn last_to(&self, to: &EmailAddress) -> Option<ResetEmail> {
		self.0.lock().iter().rev().find(|message| &message.to == to).cloned()
	}
}
impl Mailer for OutboxMailer {
	fn send(&self, message: &ResetEmail) -> Result<(), MailError> {
		self.0.lock().push(message.clone());

		Ok(())
	}
}

fn describe_lifetime(ttl: Duration) -> String {
	let hours = ttl.whole_hours();
	let minutes = ttl.whole_minutes();

	match (hours, minutes) {
		(1, 60) => "1 hour".into(),
		(h, m) if h > 1 && m == h * 60 => format!("{h} hours"),
		(_, 1) => "1 minute".into(),
		(_, m) => format!("{m} minutes"),
	}
}
