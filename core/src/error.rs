// core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Faults raised by a resource store.
///
/// These are never folded into an `Outcome`: a missing order is an answer,
/// a broken connection is not.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage backend failure. Source: {source}")]
    Backend {
        #[source]
        source: AnyhowError,
    },
}

impl From<AnyhowError> for StoreError {
  fn from(err: AnyhowError) -> Self {
    StoreError::Backend { source: err }
  }
}

pub type StoreResult<T, E = StoreError> = std::result::Result<T, E>;
