//! Top-level module for the statistics-collection system.
//!
//! This module provides the streaming corpus-statistics pipeline,
//! including:
//! - Character normalization (`Normalizer`)
//! - Sliding-context transition extraction (`ContextWindow`)
//! - In-memory batch aggregation (`BatchAccumulator`)
//! - Global character frequency tallying (`GlobalFrequencyAccumulator`)
//! - The sequential pipeline driver (`StatsPipeline`)

/// In-memory batch of pending observations, collapsed into per-order
/// count deltas before each store write.
pub mod batch;

/// Bounded sliding window over the most recent accepted symbols.
///
/// Derives every (order, prefix, next-symbol) observation implied by a
/// new symbol, without padding or wraparound.
pub mod context_window;

/// Whole-stream symbol tally and its conversion into the persisted
/// global frequency snapshot.
pub mod global_freqs;

/// Pure mapping from raw corpus characters onto the canonical alphabet.
pub mod normalizer;

/// The single-pass pipeline: normalization, context tracking, batching,
/// flushing, and the end-of-stream global commit.
pub mod pipeline;
