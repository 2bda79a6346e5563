use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::StatsError;

/// Opens the corpus file for streaming.
///
/// A missing file maps to `StatsError::InputNotFound`; callers check the
/// corpus before touching the store, so a bad path creates no state.
pub fn open_corpus<P: AsRef<Path>>(path: P) -> Result<BufReader<File>, StatsError> {
	let path = path.as_ref();
	if !path.is_file() {
		return Err(StatsError::InputNotFound { path: path.to_path_buf() });
	}
	Ok(BufReader::new(File::open(path)?))
}

/// Streaming character iterator over any buffered reader.
///
/// Reads line-wise but keeps the line terminators: `\n` and `\r` are
/// normalization input (they collapse to a space), not separators to be
/// stripped. Yields `io::Result<char>` so a mid-stream read failure
/// (including invalid UTF-8) surfaces at the exact position it occurred.
pub struct CharStream<R: BufRead> {
	reader: R,
	pending: std::vec::IntoIter<char>,
}

impl<R: BufRead> CharStream<R> {
	pub fn new(reader: R) -> Self {
		Self { reader, pending: Vec::new().into_iter() }
	}
}

impl<R: BufRead> Iterator for CharStream<R> {
	type Item = io::Result<char>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			if let Some(c) = self.pending.next() {
				return Some(Ok(c));
			}

			let mut line = String::new();
			match self.reader.read_line(&mut line) {
				Ok(0) => return None,
				Ok(_) => self.pending = line.chars().collect::<Vec<_>>().into_iter(),
				Err(err) => return Some(Err(err)),
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use super::*;

	fn collect(input: &str) -> String {
		CharStream::new(Cursor::new(input.to_owned()))
			.map(|c| c.unwrap())
			.collect()
	}

	#[test]
	fn yields_every_char_including_terminators() {
		assert_eq!(collect("ab\ncd\r\nef"), "ab\ncd\r\nef");
	}

	#[test]
	fn empty_input_yields_nothing() {
		assert_eq!(collect(""), "");
	}

	#[test]
	fn handles_multibyte_chars() {
		assert_eq!(collect("héllo\nщи"), "héllo\nщи");
	}

	#[test]
	fn missing_corpus_reports_input_not_found() {
		let result = open_corpus("definitely/not/a/real/corpus.txt");
		assert!(matches!(result, Err(StatsError::InputNotFound { .. })));
	}
}
