//! Error type shared by the checked entry points of both maps.

use thiserror::Error;

/// Errors reported by map operations.
///
/// Absence of a key is never an error; lookups and removals report it as
/// `None`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// The caller passed no key where one is required.
    #[error("invalid key: a key must be present")]
    InvalidKey,
}

/// Result alias for map operations that can fail.
pub type Result<T> = core::result::Result<T, MapError>;
