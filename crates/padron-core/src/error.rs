//! Error types for `padron-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The route/CLI identifier was zero, empty, or not a positive integer.
  /// Raised before any load is attempted.
  #[error("invalid citizen identifier: {0:?}")]
  InvalidId(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
