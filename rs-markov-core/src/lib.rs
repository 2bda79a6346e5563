//! Order-k Markov character statistics collection library.
//!
//! This crate provides a streaming corpus-statistics system including:
//! - Character normalization onto a fixed, configurable alphabet
//! - Sliding-context transition extraction for every order up to a maximum
//! - Batched, conflict-resolving persistence of transition counts
//! - Global character frequency snapshots
//!
//! The high-level entry point is [`stats::pipeline::StatsPipeline`], which
//! runs a single sequential pass over a corpus and writes its results
//! through the [`store::TransitionStore`] seam. Everything persisted is
//! meant for later consumption by a generator/sampler, which is not part
//! of this crate.

/// Runtime configuration: alphabet, maximum order, batching, store location.
pub mod config;

/// Error types for the pipeline and its collaborators.
pub mod error;

/// Corpus input utilities (file opening, character streaming).
pub mod io;

/// Core statistics-collection components and the pipeline driver.
///
/// This module exposes the streaming pipeline interface while keeping
/// each stage (normalization, context tracking, batching, tallying)
/// individually testable.
pub mod stats;

/// The persistent counter store: abstract seam plus the shipped backends.
pub mod store;
