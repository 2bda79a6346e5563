use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

/// Top-level error type for a statistics-collection run.
///
/// Every failure is fatal at this level: there is no partial-success mode
/// and no retry. A failed run may leave partially accumulated transition
/// counts behind (flushes can commit mid-stream, depending on the
/// configured durability), and the caller decides whether to re-run or
/// discard.
#[derive(Error, Debug)]
pub enum StatsError {
	/// The corpus file does not exist. Raised before any store
	/// interaction, so no partial state is created.
	#[error("corpus file not found: '{path}'")]
	InputNotFound { path: PathBuf },

	/// Reading the corpus stream failed (including invalid UTF-8).
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// The configuration was rejected by validation or failed to parse.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// A store-level failure (connection, schema, or batched write).
	#[error(transparent)]
	Store(#[from] StoreError),
}
