use serde::{Deserialize, Serialize};

use crate::corpus::{Corpus, Line, Token};

/// Reserved tokens framing a line during training and generation.
///
/// Sentinels never reach the caller: they only seed the context of a
/// sentence-in-progress (`line_start_1`, `line_start_2`) or mark its
/// completion (`line_end`).
///
/// # Invariants
/// - The three tokens are pairwise distinct
/// - None of them can be produced by the corpus cleaner (they contain
///   punctuation the cleaner strips)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Sentinels {
	pub line_start_1: Token,
	pub line_start_2: Token,
	pub line_end: Token,
}

impl Default for Sentinels {
	fn default() -> Self {
		Self {
			line_start_1: "^::^".to_owned(),
			line_start_2: "^:::^".to_owned(),
			line_end: "$:::$".to_owned(),
		}
	}
}

impl Sentinels {
	/// Returns `true` for either of the two start sentinels.
	pub fn is_start(&self, token: &str) -> bool {
		token == self.line_start_1 || token == self.line_start_2
	}

	pub fn is_end(&self, token: &str) -> bool {
		token == self.line_end
	}

	pub fn is_sentinel(&self, token: &str) -> bool {
		self.is_start(token) || self.is_end(token)
	}
}

/// Direction in which a model was trained and in which a sentence grows.
///
/// - `Forward`: sentences grow by appending, from the start of a line.
/// - `Reverse`: sentences grow by prepending, from the end of a line.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
	Forward,
	Reverse,
}

/// Wraps corpus lines with sentinels for training.
///
/// Prepared lines are always returned in *generation order*: forward lines
/// read start to end, reverse lines read end to start. Models can then
/// count n-grams left to right regardless of their direction.
pub struct TokenCorpusPrep<'a> {
	sentinels: &'a Sentinels,
}

impl<'a> TokenCorpusPrep<'a> {
	pub fn new(sentinels: &'a Sentinels) -> Self {
		Self { sentinels }
	}

	/// `[LINE_START_1, LINE_START_2, ...tokens..., LINE_END]`
	pub fn forward_line(&self, line: &[Token]) -> Line {
		let mut prepared = Vec::with_capacity(line.len() + 3);
		prepared.push(self.sentinels.line_start_1.clone());
		prepared.push(self.sentinels.line_start_2.clone());
		prepared.extend(line.iter().cloned());
		prepared.push(self.sentinels.line_end.clone());
		prepared
	}

	/// `[LINE_END, ...tokens..., LINE_END]`, in reading order.
	pub fn reverse_line(&self, line: &[Token]) -> Line {
		let mut prepared = Vec::with_capacity(line.len() + 2);
		prepared.push(self.sentinels.line_end.clone());
		prepared.extend(line.iter().cloned());
		prepared.push(self.sentinels.line_end.clone());
		prepared
	}

	/// Prepares every non-empty line of `corpus` for a model of the given
	/// direction, in generation order.
	///
	/// The corpus is never mutated: each prepared line is a fresh copy.
	pub fn prepare(&self, corpus: &Corpus, direction: Direction) -> Vec<Line> {
		corpus
			.lines()
			.iter()
			.filter(|line| !line.is_empty())
			.map(|line| match direction {
				Direction::Forward => self.forward_line(line),
				Direction::Reverse => {
					let mut prepared = self.reverse_line(line);
					prepared.reverse();
					prepared
				}
			})
			.collect()
	}

	/// Number of leading tokens that only seed the context of a prepared line
	/// (two start sentinels forward, one end sentinel in reverse).
	pub fn seed_len(direction: Direction) -> usize {
		match direction {
			Direction::Forward => 2,
			Direction::Reverse => 1,
		}
	}

	/// Removes every sentinel from a prepared line.
	pub fn strip(&self, prepared: &[Token]) -> Line {
		prepared
			.iter()
			.filter(|token| !self.sentinels.is_sentinel(token))
			.cloned()
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn corpus() -> Corpus {
		Corpus::from_lines(vec![vec!["hello", "goodbye"], vec![], vec!["let", "it", "be"]])
	}

	#[test]
	fn forward_wraps_with_both_start_sentinels() {
		let sentinels = Sentinels::default();
		let prep = TokenCorpusPrep::new(&sentinels);
		let lines = prep.prepare(&corpus(), Direction::Forward);
		assert_eq!(lines.len(), 2);
		assert_eq!(lines[0], vec!["^::^", "^:::^", "hello", "goodbye", "$:::$"]);
	}

	#[test]
	fn reverse_is_in_generation_order() {
		let sentinels = Sentinels::default();
		let prep = TokenCorpusPrep::new(&sentinels);
		let lines = prep.prepare(&corpus(), Direction::Reverse);
		assert_eq!(lines[1], vec!["$:::$", "be", "it", "let", "$:::$"]);
	}

	#[test]
	fn strip_round_trips_every_line() {
		let sentinels = Sentinels::default();
		let prep = TokenCorpusPrep::new(&sentinels);
		let corpus = corpus();
		for line in corpus.lines().iter().filter(|l| !l.is_empty()) {
			assert_eq!(&prep.strip(&prep.forward_line(line)), line);
			assert_eq!(&prep.strip(&prep.reverse_line(line)), line);
		}
	}

	#[test]
	fn prepare_leaves_the_corpus_untouched() {
		let sentinels = Sentinels::default();
		let prep = TokenCorpusPrep::new(&sentinels);
		let corpus = corpus();
		let before = corpus.clone();
		let _ = prep.prepare(&corpus, Direction::Forward);
		let _ = prep.prepare(&corpus, Direction::Reverse);
		assert_eq!(corpus, before);
	}
}
