use std::io::BufRead;

use log::{debug, info};

use super::batch::BatchAccumulator;
use super::context_window::ContextWindow;
use super::global_freqs::GlobalFrequencyAccumulator;
use super::normalizer::Normalizer;
use crate::config::Config;
use crate::error::StatsError;
use crate::io::CharStream;
use crate::store::TransitionStore;

/// Counters describing a completed collection run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
	/// Raw characters read from the corpus.
	pub chars_read: u64,
	/// Characters that survived normalization.
	pub symbols_accepted: u64,
	/// Characters dropped by normalization.
	pub symbols_dropped: u64,
	/// Transition observations emitted by the window.
	pub observations: u64,
	/// Batches flushed to the store (including the final short one).
	pub flushes: u64,
}

/// The streaming statistics pipeline.
///
/// # Responsibilities
/// - Feed each corpus character through normalization, the context
///   window, and the batch accumulator, in strict input order
/// - Flush collapsed batches to the store at the configured threshold
///   and once more, unconditionally, at end of stream
/// - Tally global symbol frequencies over the same normalized stream and
///   commit the snapshot once, after the full pass
///
/// # Invariants
/// - Memory stays bounded by `max_order`, the batch threshold, and the
///   alphabet size, independent of corpus length.
/// - All state is owned here; a pipeline is built per run and consumed
///   by [`run`](Self::run).
///
/// # Notes
/// Any store failure aborts the run. Flushed batches may already be
/// committed at that point (see `FlushDurability`), so a failed run is
/// treated as possibly-partial by the caller.
pub struct StatsPipeline<S> {
	normalizer: Normalizer,
	window: ContextWindow,
	batch: BatchAccumulator,
	global: GlobalFrequencyAccumulator,
	store: S,
}

impl<S: TransitionStore> StatsPipeline<S> {
	/// Builds a pipeline from a validated configuration and a store.
	pub fn new(config: &Config, store: S) -> Self {
		Self {
			normalizer: Normalizer::new(config.allowed_chars.chars()),
			window: ContextWindow::new(config.max_order),
			batch: BatchAccumulator::new(config.batch_size),
			global: GlobalFrequencyAccumulator::new(),
			store,
		}
	}

	/// Runs the full sequential pass over `corpus`.
	///
	/// Returns the run summary together with the store, so callers can
	/// keep using (or inspecting) it after the run.
	///
	/// # Errors
	/// Propagates stream read failures and store failures unchanged;
	/// there is no retry and no partial-success mode.
	pub fn run<R: BufRead>(mut self, corpus: R) -> Result<(RunSummary, S), StatsError> {
		let mut summary = RunSummary::default();

		for ch in CharStream::new(corpus) {
			let raw = ch?;
			summary.chars_read += 1;

			let Some(symbol) = self.normalizer.normalize(raw) else {
				summary.symbols_dropped += 1;
				continue;
			};
			summary.symbols_accepted += 1;

			self.global.record(symbol);
			for observation in self.window.observe(symbol) {
				summary.observations += 1;
				self.batch.push(observation);
			}

			if self.batch.is_full() {
				Self::flush(&mut self.batch, &mut self.store, &mut summary)?;
			}
		}

		// End of stream: the last short batch is never dropped.
		if !self.batch.is_empty() {
			Self::flush(&mut self.batch, &mut self.store, &mut summary)?;
		}

		let rows = self.global.finish();
		info!("committing global snapshot ({} symbols)", rows.len());
		self.store.replace_global_freqs(&rows)?;
		self.store.finish()?;

		Ok((summary, self.store))
	}

	fn flush(
		batch: &mut BatchAccumulator,
		store: &mut S,
		summary: &mut RunSummary,
	) -> Result<(), StatsError> {
		for (order, deltas) in batch.collapse() {
			debug!("flushing {} deltas for order {order}", deltas.len());
			store.upsert_deltas(order, &deltas)?;
		}
		summary.flushes += 1;
		Ok(())
	}
}
