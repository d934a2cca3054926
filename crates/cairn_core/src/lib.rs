//! Core types for the Cairn resource registry: resource identifiers and the
//! shared error type.

pub mod errors;
pub mod hash;

pub use errors::{CairnError, ErrorKind, Result};
pub use hash::{compute_hash, HashId};
