//! The `CitizenDirectory` trait — the seam to the registry backend.
//!
//! Implemented by the HTTP client in `padron-cli`; tests use an in-memory
//! double. Higher layers depend on this abstraction, not on any transport.

use std::future::Future;

use crate::citizen::{Citizen, CitizenId, CitizenUpdate};

/// Abstraction over the citizen read/write API.
///
/// All methods return `Send` futures so the trait can be used from a tokio
/// runtime without extra boxing.
pub trait CitizenDirectory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch one citizen by id. `None` means the registry has no such
  /// record.
  fn get_citizen(
    &self,
    id: CitizenId,
  ) -> impl Future<Output = Result<Option<Citizen>, Self::Error>> + Send + '_;

  /// Fetch every citizen. Feeds the partner-candidate derivation.
  fn list_citizens(
    &self,
  ) -> impl Future<Output = Result<Vec<Citizen>, Self::Error>> + Send + '_;

  /// Apply an update to the citizen identified by `id`.
  fn update_citizen<'a>(
    &'a self,
    id: CitizenId,
    update: &'a CitizenUpdate,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
