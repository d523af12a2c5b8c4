//! Session module for sessionscribe.
//!
//! Finds transcript files on disk, parses their line-delimited records, and
//! collapses them into normalized messages.

pub mod discovery;
pub mod error;
pub mod loader;
pub mod models;
pub mod normalize;
pub mod record;

pub use discovery::{discover, SessionNaming, StoreConfig};
pub use error::SessionError;
pub use loader::{load, SessionStore};
pub use models::*;
pub use normalize::normalize;
pub use record::parse_record;
