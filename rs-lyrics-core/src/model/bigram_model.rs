use rustc_hash::FxHashMap;

use crate::corpus::Token;
use super::ngram_model::NGramIndex;
use super::prep::{Direction, Sentinels};
use super::state::{Candidates, State};

/// Order-2 model keyed by the token nearest to the growing edge.
///
/// Trained on reverse lines, a bigram maps each token to the tokens that
/// precede it, which lets a sentence grow leftward from its last word.
///
/// # Invariants
/// - Start sentinels never appear as candidates
#[derive(Debug)]
pub struct BigramModel {
	direction: Direction,
	table: FxHashMap<Token, State>,
}

impl BigramModel {
	pub fn new(direction: Direction) -> Self {
		Self { direction, table: FxHashMap::default() }
	}
}

impl NGramIndex for BigramModel {
	fn order(&self) -> usize {
		2
	}

	fn direction(&self) -> Direction {
		self.direction
	}

	fn add_line(&mut self, prepared: &[Token], sentinels: &Sentinels) {
		for pair in prepared.windows(2) {
			if sentinels.is_start(&pair[1]) {
				continue;
			}
			self.table.entry(pair[0].clone()).or_default().add_transition(&pair[1]);
		}
	}

	fn can_extend(&self, context: &[&str]) -> bool {
		context.last().is_some_and(|last| self.table.contains_key(*last))
	}

	fn candidates(&self, context: &[&str]) -> Candidates<'_> {
		context
			.last()
			.and_then(|last| self.table.get(*last))
			.map(State::candidates)
			.unwrap_or_default()
	}

	fn len(&self) -> usize {
		self.table.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::corpus::Corpus;
	use rustc_hash::FxHashSet;
	use crate::model::ngram_model::RhymeFilter;

	fn corpus() -> Corpus {
		Corpus::from_lines(vec![vec!["the", "quick", "brown", "fox"], vec!["the", "lazy", "dog"]])
	}

	fn trained(direction: Direction) -> BigramModel {
		let mut model = BigramModel::new(direction);
		model.train(&corpus(), &Sentinels::default());
		model
	}

	#[test]
	fn candidates_after_the() {
		let model = trained(Direction::Forward);
		assert_eq!(model.candidates(&["the"]), vec![("quick", 1), ("lazy", 1)]);
	}

	#[test]
	fn repeated_bigrams_increment() {
		let mut model = BigramModel::new(Direction::Forward);
		let corpus = Corpus::from_lines(vec![vec!["the", "quick"], vec!["the", "quick"], vec!["the", "end"]]);
		model.train(&corpus, &Sentinels::default());
		assert_eq!(model.candidates(&["the"]), vec![("quick", 2), ("end", 1)]);
	}

	#[test]
	fn candidates_non_empty_iff_can_extend() {
		let model = trained(Direction::Forward);
		for word in ["the", "quick", "brown", "fox", "lazy", "dog", "cat", "$:::$", "^:::^"] {
			let context = [word];
			assert_eq!(model.can_extend(&context), !model.candidates(&context).is_empty(), "{word}");
			assert!(model.candidates(&context).iter().all(|(_, count)| *count >= 1));
		}
	}

	#[test]
	fn start_sentinels_are_never_candidates() {
		let sentinels = Sentinels::default();
		let model = trained(Direction::Forward);
		assert!(!model.can_extend(&["$:::$"]));
		let first_words = model.candidates(&["^:::^"]);
		assert_eq!(first_words, vec![("the", 2)]);
		for context in ["^::^", "the", "fox"] {
			assert!(model.candidates(&[context]).iter().all(|(token, _)| !sentinels.is_start(token)));
		}
	}

	#[test]
	fn reverse_extends_leftward() {
		let model = trained(Direction::Reverse);
		assert_eq!(model.candidates(&["$:::$"]), vec![("fox", 1), ("dog", 1)]);
		assert_eq!(model.candidates(&["quick"]), vec![("the", 1)]);
		assert_eq!(model.candidates(&["the"]), vec![("$:::$", 2)]);
	}

	#[test]
	fn rhyming_candidates_apply_the_filter() {
		let model = trained(Direction::Reverse);
		let rhymes: FxHashSet<Token> = ["fox", "box", "$:::$"].iter().map(|s| s.to_string()).collect();
		let exclude: FxHashSet<Token> = ["$:::$".to_string()].into_iter().collect();
		let filter = RhymeFilter { rhymes: &rhymes, exclude: &exclude };
		assert_eq!(model.rhyming_candidates(&["$:::$"], &filter), vec![("fox", 1)]);
		assert!(model.can_rhyme(&["$:::$"], &filter));
		assert!(!model.can_rhyme(&["the"], &filter));
	}
}
