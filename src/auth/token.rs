//! Reset token secrets and the records bound to them.

pub mod record;
pub mod secret;
