use std::collections::BTreeMap;

use super::context_window::Observation;
use crate::store::TransitionDelta;

/// In-memory buffer of pending observations, bounding store round-trips.
///
/// # Responsibilities
/// - Queue raw observations until the configured threshold is reached
/// - Collapse a batch into per-order deltas: identical (prefix, next)
///   pairs inside one batch become a single summed delta per key
///
/// # Notes
/// - Pre-summation is purely an optimization; the store's additive-upsert
///   contract makes it equivalent to one increment per raw observation.
/// - Collapse output is sorted by order, then by (prefix, next), so the
///   write order is stable.
/// - The final, possibly short batch at end of stream must still be
///   flushed by the caller; nothing is dropped here.
#[derive(Debug)]
pub struct BatchAccumulator {
	pending: Vec<Observation>,
	threshold: usize,
}

impl BatchAccumulator {
	/// Creates an accumulator that reports full at `threshold` pending
	/// observations.
	pub fn new(threshold: usize) -> Self {
		Self { pending: Vec::new(), threshold }
	}

	/// Queues one observation.
	pub fn push(&mut self, observation: Observation) {
		self.pending.push(observation);
	}

	/// True once the pending count has reached the flush threshold.
	pub fn is_full(&self) -> bool {
		self.pending.len() >= self.threshold
	}

	pub fn len(&self) -> usize {
		self.pending.len()
	}

	pub fn is_empty(&self) -> bool {
		self.pending.is_empty()
	}

	/// Drains the pending batch into per-order, pre-summed deltas.
	///
	/// Returns one `(order, deltas)` entry per order present in the
	/// batch, ascending; deltas within an order are sorted by
	/// (prefix, next_symbol).
	pub fn collapse(&mut self) -> Vec<(usize, Vec<TransitionDelta>)> {
		let mut grouped: BTreeMap<usize, BTreeMap<(String, char), u64>> = BTreeMap::new();
		for observation in self.pending.drain(..) {
			let key = (observation.prefix, observation.next);
			*grouped.entry(observation.order).or_default().entry(key).or_insert(0) += 1;
		}

		grouped
			.into_iter()
			.map(|(order, deltas)| {
				let deltas = deltas
					.into_iter()
					.map(|((prefix, next_symbol), delta)| TransitionDelta { prefix, next_symbol, delta })
					.collect();
				(order, deltas)
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn observation(order: usize, prefix: &str, next: char) -> Observation {
		Observation { order, prefix: prefix.to_owned(), next }
	}

	#[test]
	fn reports_full_at_threshold() {
		let mut batch = BatchAccumulator::new(2);
		assert!(!batch.is_full());
		batch.push(observation(1, "a", 'b'));
		assert!(!batch.is_full());
		batch.push(observation(1, "b", 'c'));
		assert!(batch.is_full());
	}

	#[test]
	fn collapse_pre_sums_identical_pairs() {
		let mut batch = BatchAccumulator::new(100);
		batch.push(observation(1, "a", 'b'));
		batch.push(observation(1, "a", 'b'));
		batch.push(observation(1, "a", 'c'));

		let collapsed = batch.collapse();
		assert_eq!(collapsed.len(), 1);
		let (order, deltas) = &collapsed[0];
		assert_eq!(*order, 1);
		assert_eq!(
			deltas,
			&vec![
				TransitionDelta { prefix: "a".to_owned(), next_symbol: 'b', delta: 2 },
				TransitionDelta { prefix: "a".to_owned(), next_symbol: 'c', delta: 1 },
			]
		);
	}

	#[test]
	fn collapse_groups_by_order_ascending() {
		let mut batch = BatchAccumulator::new(100);
		batch.push(observation(2, "ab", 'c'));
		batch.push(observation(1, "b", 'c'));

		let orders: Vec<usize> = batch.collapse().into_iter().map(|(order, _)| order).collect();
		assert_eq!(orders, vec![1, 2]);
	}

	#[test]
	fn collapse_orders_deltas_deterministically() {
		let mut batch = BatchAccumulator::new(100);
		batch.push(observation(1, "z", 'a'));
		batch.push(observation(1, "a", 'z'));
		batch.push(observation(1, "a", 'b'));

		let collapsed = batch.collapse();
		let keys: Vec<(String, char)> = collapsed[0]
			.1
			.iter()
			.map(|d| (d.prefix.clone(), d.next_symbol))
			.collect();
		assert_eq!(
			keys,
			vec![
				("a".to_owned(), 'b'),
				("a".to_owned(), 'z'),
				("z".to_owned(), 'a'),
			]
		);
	}

	#[test]
	fn collapse_drains_the_batch() {
		let mut batch = BatchAccumulator::new(1);
		batch.push(observation(1, "a", 'b'));
		assert!(batch.is_full());
		let _ = batch.collapse();
		assert!(batch.is_empty());
		assert!(!batch.is_full());
	}

	#[test]
	fn collapse_of_empty_batch_is_empty() {
		let mut batch = BatchAccumulator::new(10);
		assert!(batch.collapse().is_empty());
	}
}
