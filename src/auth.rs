//! Identity keys, account lookup, and reset token models.

pub mod directory;
pub mod id;
pub mod token;

pub use directory::*;
pub use id::*;
pub use token::{record::*, secret::*};
