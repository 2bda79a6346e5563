/// One occurrence of `next` following the `order`-symbol context `prefix`.
///
/// `prefix` holds exactly `order` symbols, concatenated oldest to most
/// recent, taken from the stream immediately before `next`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
	pub order: usize,
	pub prefix: String,
	pub next: char,
}

/// Sliding window over the most recent accepted symbols.
///
/// The window is a fixed-capacity ring buffer of length `max_order`:
/// storage never grows past the capacity, and once full, accepting a new
/// symbol overwrites the oldest slot in place (FIFO eviction).
///
/// # Responsibilities
/// - Hold the up-to-`max_order` symbols preceding the current stream
///   position
/// - For each new symbol, derive every (order, prefix, next) observation
///   the current window implies
///
/// # Invariants
/// - An order-n observation is emitted only when the window already holds
///   at least n symbols; prefixes are never padded or wrapped.
/// - Emission order is order 1 up to the highest active order, so flush
///   contents are reproducible.
#[derive(Debug, Clone)]
pub struct ContextWindow {
	capacity: usize,
	buf: Vec<char>,
	head: usize,
}

impl ContextWindow {
	/// Creates an empty window holding at most `max_order` symbols.
	pub fn new(max_order: usize) -> Self {
		Self { capacity: max_order, buf: Vec::with_capacity(max_order), head: 0 }
	}

	/// Number of symbols currently held.
	pub fn len(&self) -> usize {
		self.buf.len()
	}

	pub fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}

	/// Derives all observations implied by `next`, then appends it.
	///
	/// The observations are computed against the window contents BEFORE
	/// `next` is appended; the very first symbol of a stream therefore
	/// emits nothing and only seeds the window.
	pub fn observe(&mut self, next: char) -> Vec<Observation> {
		let context = self.ordered();
		let mut out = Vec::with_capacity(context.len());
		for order in 1..=context.len() {
			let prefix: String = context[context.len() - order..].iter().collect();
			out.push(Observation { order, prefix, next });
		}

		self.push(next);
		out
	}

	/// Window contents oldest to most recent.
	fn ordered(&self) -> Vec<char> {
		let len = self.buf.len();
		(0..len).map(|i| self.buf[(self.head + i) % len]).collect()
	}

	fn push(&mut self, symbol: char) {
		if self.buf.len() < self.capacity {
			self.buf.push(symbol);
		} else if self.capacity > 0 {
			self.buf[self.head] = symbol;
			self.head = (self.head + 1) % self.capacity;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn pairs(observations: &[Observation]) -> Vec<(usize, &str, char)> {
		observations
			.iter()
			.map(|o| (o.order, o.prefix.as_str(), o.next))
			.collect()
	}

	#[test]
	fn first_symbol_only_seeds_the_window() {
		let mut window = ContextWindow::new(3);
		assert!(window.observe('a').is_empty());
		assert_eq!(window.len(), 1);
	}

	#[test]
	fn emits_one_observation_per_active_order() {
		let mut window = ContextWindow::new(3);
		window.observe('a');
		window.observe('b');
		let observations = window.observe('c');
		assert_eq!(pairs(&observations), vec![(1, "b", 'c'), (2, "ab", 'c')]);
	}

	#[test]
	fn prefixes_are_oldest_to_most_recent() {
		let mut window = ContextWindow::new(4);
		for symbol in ['w', 'x', 'y'] {
			window.observe(symbol);
		}
		let observations = window.observe('z');
		assert_eq!(
			pairs(&observations),
			vec![(1, "y", 'z'), (2, "xy", 'z'), (3, "wxy", 'z')]
		);
	}

	#[test]
	fn evicts_oldest_once_at_capacity() {
		let mut window = ContextWindow::new(2);
		for symbol in ['a', 'b', 'c'] {
			window.observe(symbol);
		}
		// Window now holds "bc"; 'a' has been evicted.
		let observations = window.observe('d');
		assert_eq!(pairs(&observations), vec![(1, "c", 'd'), (2, "bc", 'd')]);
		assert_eq!(window.len(), 2);
	}

	#[test]
	fn stream_shorter_than_max_order_emits_only_low_orders() {
		let mut window = ContextWindow::new(5);
		window.observe('a');
		let observations = window.observe('b');
		assert_eq!(pairs(&observations), vec![(1, "a", 'b')]);
	}

	#[test]
	fn window_stays_bounded_over_long_streams() {
		let mut window = ContextWindow::new(3);
		for _ in 0..1000 {
			for symbol in ['a', 'b', 'c', 'd'] {
				window.observe(symbol);
			}
		}
		assert_eq!(window.len(), 3);
		let observations = window.observe('e');
		assert_eq!(
			pairs(&observations),
			vec![(1, "d", 'e'), (2, "cd", 'e'), (3, "bcd", 'e')]
		);
	}
}
