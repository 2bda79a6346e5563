//! The persistent counter store.
//!
//! The pipeline only ever talks to [`TransitionStore`]; the backends here
//! (`SqliteStore` for persistence, `MemoryStore` for in-process use and
//! tests) are interchangeable behind that seam.

/// HashMap-backed store, no persistence.
mod memory;

/// SQLite-backed store with schema provisioning and transactional writes.
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use serde::Deserialize;
use thiserror::Error;

/// One additive count delta for a (prefix, next_symbol) pair of a given
/// order, produced by collapsing a batch of raw observations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionDelta {
	pub prefix: String,
	pub next_symbol: char,
	pub delta: u64,
}

/// One row of the persisted global frequency snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalFrequency {
	pub symbol: char,
	pub count: u64,
	pub probability: f64,
}

/// Commit policy for batched transition writes.
///
/// # Variants
/// - `PerBatch`: every flush commits its own transaction. A mid-run crash
///   keeps all previously flushed batches, so partial counts are possible
///   and the caller decides whether to re-run or discard.
/// - `EndOfRun`: one run-long transaction, committed by
///   [`TransitionStore::finish`]. All-or-nothing for the run, at the cost
///   of losing every flushed batch on a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushDurability {
	PerBatch,
	EndOfRun,
}

/// Store-level failures. All fatal for the current run; never retried.
#[derive(Error, Debug)]
pub enum StoreError {
	/// The store connection could not be established or maintained.
	#[error("store connection failed: {0}")]
	Connection(String),

	/// Tables are missing, malformed, or outside the provisioned range.
	#[error("store schema error: {0}")]
	Schema(String),

	/// A batched write failed.
	#[error("batched write failed: {0}")]
	Flush(String),

	/// A read-back query failed.
	#[error("store query failed: {0}")]
	Query(String),
}

/// Abstract per-order counter store consumed by the pipeline.
///
/// # Contract
/// - `upsert_deltas` is an additive upsert: an existing
///   (prefix, next_symbol) row of the given order has its count increased
///   by the delta; a missing row is created at the delta. It is safe to
///   call repeatedly with the same key over the lifetime of the process;
///   counts accumulate. Replaying the same corpus twice doubles counts:
///   the tables model cumulative corpus statistics.
/// - `replace_global_freqs` replaces the global snapshot wholesale
///   (delete-all then insert); it never merges with a prior snapshot.
/// - `finish` runs once, after the full pass; backends holding a run-long
///   transaction commit it here.
pub trait TransitionStore {
	/// Applies one pre-summed batch of deltas for a single order.
	fn upsert_deltas(&mut self, order: usize, deltas: &[TransitionDelta]) -> Result<(), StoreError>;

	/// Replaces the entire global frequency table with `rows`.
	fn replace_global_freqs(&mut self, rows: &[GlobalFrequency]) -> Result<(), StoreError>;

	/// End-of-run hook. The default does nothing.
	fn finish(&mut self) -> Result<(), StoreError> {
		Ok(())
	}
}
