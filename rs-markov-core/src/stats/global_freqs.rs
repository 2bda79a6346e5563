use std::collections::HashMap;

use crate::store::GlobalFrequency;

/// Tallies total occurrences per symbol across the whole stream.
///
/// The map grows with the alphabet, not the corpus, so it stays bounded.
/// At end of stream [`finish`](Self::finish) converts counts into the
/// global frequency snapshot that replaces the persisted table wholesale.
#[derive(Debug, Default)]
pub struct GlobalFrequencyAccumulator {
	counts: HashMap<char, u64>,
}

impl GlobalFrequencyAccumulator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of an accepted symbol.
	pub fn record(&mut self, symbol: char) {
		*self.counts.entry(symbol).or_insert(0) += 1;
	}

	/// Total number of recorded occurrences.
	pub fn total(&self) -> u64 {
		self.counts.values().sum()
	}

	/// Converts the tally into snapshot rows, sorted by symbol.
	///
	/// Probability is count / total, computed once here. An empty stream
	/// yields an empty snapshot.
	pub fn finish(self) -> Vec<GlobalFrequency> {
		let total: u64 = self.counts.values().sum();
		if total == 0 {
			return Vec::new();
		}

		let mut rows: Vec<GlobalFrequency> = self
			.counts
			.into_iter()
			.filter(|(_, count)| *count > 0)
			.map(|(symbol, count)| GlobalFrequency {
				symbol,
				count,
				probability: count as f64 / total as f64,
			})
			.collect();
		rows.sort_by_key(|row| row.symbol);
		rows
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn counts_sum_to_recorded_symbols() {
		let mut accumulator = GlobalFrequencyAccumulator::new();
		for symbol in "aabab".chars() {
			accumulator.record(symbol);
		}
		assert_eq!(accumulator.total(), 5);

		let rows = accumulator.finish();
		let total: u64 = rows.iter().map(|row| row.count).sum();
		assert_eq!(total, 5);
	}

	#[test]
	fn probabilities_sum_to_one() {
		let mut accumulator = GlobalFrequencyAccumulator::new();
		for symbol in "ab ab".chars() {
			accumulator.record(symbol);
		}

		let rows = accumulator.finish();
		let sum: f64 = rows.iter().map(|row| row.probability).sum();
		assert!((sum - 1.0).abs() < 1e-9);
	}

	#[test]
	fn rows_are_sorted_by_symbol() {
		let mut accumulator = GlobalFrequencyAccumulator::new();
		for symbol in "cba".chars() {
			accumulator.record(symbol);
		}

		let symbols: Vec<char> = accumulator.finish().into_iter().map(|row| row.symbol).collect();
		assert_eq!(symbols, vec!['a', 'b', 'c']);
	}

	#[test]
	fn empty_stream_yields_empty_snapshot() {
		let accumulator = GlobalFrequencyAccumulator::new();
		assert!(accumulator.finish().is_empty());
	}
}
