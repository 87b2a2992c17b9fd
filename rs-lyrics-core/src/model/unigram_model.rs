use crate::corpus::Token;
use super::ngram_model::NGramIndex;
use super::prep::{Direction, Sentinels, TokenCorpusPrep};
use super::state::{Candidates, State};

/// Context-free model: global token frequencies.
///
/// Seeds are skipped, so the table holds every word plus `LINE_END` but
/// never a start sentinel. Once trained on a non-empty corpus it can always
/// extend, which is what terminates every backoff chain.
#[derive(Debug)]
pub struct UnigramModel {
	direction: Direction,
	counts: State,
}

impl UnigramModel {
	pub fn new(direction: Direction) -> Self {
		Self { direction, counts: State::new() }
	}
}

impl NGramIndex for UnigramModel {
	fn order(&self) -> usize {
		1
	}

	fn direction(&self) -> Direction {
		self.direction
	}

	fn add_line(&mut self, prepared: &[Token], sentinels: &Sentinels) {
		let seed = TokenCorpusPrep::seed_len(self.direction).min(prepared.len());
		for token in &prepared[seed..] {
			if !sentinels.is_start(token) {
				self.counts.add_transition(token);
			}
		}
	}

	fn can_extend(&self, _context: &[&str]) -> bool {
		!self.counts.is_empty()
	}

	fn candidates(&self, _context: &[&str]) -> Candidates<'_> {
		self.counts.candidates()
	}

	fn len(&self) -> usize {
		self.counts.len()
	}

	/// Global frequencies say nothing about which words end lines.
	fn supports_rhyme(&self) -> bool {
		false
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::corpus::Corpus;

	fn corpus() -> Corpus {
		Corpus::from_lines(vec![vec!["the", "quick", "brown", "fox"], vec!["the", "lazy", "dog"]])
	}

	#[test]
	fn counts_words_and_line_end_only() {
		let sentinels = Sentinels::default();
		let mut model = UnigramModel::new(Direction::Forward);
		model.train(&corpus(), &sentinels);
		let candidates = model.candidates(&[]);
		assert!(candidates.contains(&("the", 2)));
		assert!(candidates.contains(&("$:::$", 2)));
		assert!(candidates.iter().all(|(token, _)| !sentinels.is_start(token)));
		assert_eq!(candidates.len(), 7);
	}

	#[test]
	fn reverse_counts_line_end_once_per_line() {
		let sentinels = Sentinels::default();
		let mut model = UnigramModel::new(Direction::Reverse);
		model.train(&corpus(), &sentinels);
		assert!(model.candidates(&["dog"]).contains(&("$:::$", 2)));
	}

	#[test]
	fn untrained_cannot_extend() {
		let model = UnigramModel::new(Direction::Forward);
		assert!(!model.can_extend(&["the"]));
		assert!(model.candidates(&["the"]).is_empty());
	}
}
