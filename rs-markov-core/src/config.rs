use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::StatsError;
use crate::store::FlushDurability;

/// Alphabet used when no configuration file overrides it:
/// lowercase ASCII letters, space, and light punctuation.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz .,!?-'";

/// Runtime configuration for a statistics-collection run.
///
/// # Responsibilities
/// - Define the allowed alphabet the normalizer folds input onto
/// - Bound the context tracking (`max_order`) and batching (`batch_size`)
/// - Locate the persistent store and select its flush durability
///
/// # Notes
/// - Deserializable from a JSON file; every field falls back to its
///   default when absent, so a partial file is valid.
/// - `validate` must be called before the configuration is used to build
///   a pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
	/// Characters admitted into the normalized stream, given as one string.
	pub allowed_chars: String,

	/// Maximum context length tracked; transition tables exist for
	/// every order in `1..=max_order`.
	pub max_order: usize,

	/// Number of pending observations that triggers a flush.
	pub batch_size: usize,

	/// Path of the SQLite store file.
	pub store_path: PathBuf,

	/// Commit policy for batched transition writes.
	pub durability: FlushDurability,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			allowed_chars: DEFAULT_ALPHABET.to_owned(),
			max_order: 5,
			batch_size: 5000,
			store_path: PathBuf::from("markov_stats.db"),
			durability: FlushDurability::PerBatch,
		}
	}
}

impl Config {
	/// Loads a configuration from a JSON file.
	///
	/// # Errors
	/// Returns `StatsError::Io` if the file cannot be read and
	/// `StatsError::InvalidConfig` if it does not parse.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, StatsError> {
		let text = fs::read_to_string(path)?;
		serde_json::from_str(&text).map_err(|err| StatsError::InvalidConfig(err.to_string()))
	}

	/// Checks the configuration invariants.
	///
	/// # Errors
	/// Returns `StatsError::InvalidConfig` if `max_order` or `batch_size`
	/// is zero, or if the alphabet is empty.
	pub fn validate(&self) -> Result<(), StatsError> {
		if self.max_order == 0 {
			return Err(StatsError::InvalidConfig("max_order must be at least 1".to_owned()));
		}
		if self.batch_size == 0 {
			return Err(StatsError::InvalidConfig("batch_size must be at least 1".to_owned()));
		}
		if self.allowed_chars.is_empty() {
			return Err(StatsError::InvalidConfig("allowed_chars must not be empty".to_owned()));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_config_is_valid() {
		assert!(Config::default().validate().is_ok());
	}

	#[test]
	fn zero_max_order_rejected() {
		let config = Config { max_order: 0, ..Config::default() };
		assert!(matches!(config.validate(), Err(StatsError::InvalidConfig(_))));
	}

	#[test]
	fn zero_batch_size_rejected() {
		let config = Config { batch_size: 0, ..Config::default() };
		assert!(matches!(config.validate(), Err(StatsError::InvalidConfig(_))));
	}

	#[test]
	fn empty_alphabet_rejected() {
		let config = Config { allowed_chars: String::new(), ..Config::default() };
		assert!(matches!(config.validate(), Err(StatsError::InvalidConfig(_))));
	}

	#[test]
	fn partial_json_falls_back_to_defaults() {
		let config: Config = serde_json::from_str(r#"{"max_order": 3}"#).unwrap();
		assert_eq!(config.max_order, 3);
		assert_eq!(config.batch_size, 5000);
		assert_eq!(config.allowed_chars, DEFAULT_ALPHABET);
	}

	#[test]
	fn durability_parses_from_snake_case() {
		let config: Config = serde_json::from_str(r#"{"durability": "end_of_run"}"#).unwrap();
		assert_eq!(config.durability, FlushDurability::EndOfRun);
	}
}
