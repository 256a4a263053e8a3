//! Rate-limited, single-use reset tokens: sliding-window admission per identity, CAS-guarded
//! redemption, and call-site observability for account recovery flows.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod flows;
pub mod notify;
pub mod obs;
pub mod rate_limit;
pub mod store;
pub mod tokens;

mod _prelude {
	pub use std::{
		collections::{HashMap, HashSet, VecDeque},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
#[cfg(test)] use {color_eyre as _, tokio as _};
