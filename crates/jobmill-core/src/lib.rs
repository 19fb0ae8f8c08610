//! `jobmill-core` — shared configuration, owner types, and constants.
//!
//! Every other jobmill crate depends on this one; it depends on nothing
//! but the config/serde stack. The [`config::JobmillConfig`] object is
//! constructed once at process start and passed by reference to the
//! subsystems that need it — there is no ambient global lookup.

pub mod config;
pub mod error;
pub mod types;

pub use config::JobmillConfig;
pub use error::{CoreError, Result};
pub use types::Owner;
