use std::fmt::Debug;

use rustc_hash::FxHashSet;

use crate::corpus::{Corpus, Token};
use super::prep::{Direction, Sentinels, TokenCorpusPrep};
use super::state::Candidates;

/// Constraint applied to candidates when a line must end on a rhyme.
///
/// A candidate is accepted when it belongs to `rhymes` and not to `exclude`.
/// Callers put the end sentinel (and, for final lines, weak endings) into
/// `exclude`.
#[derive(Clone, Copy, Debug)]
pub struct RhymeFilter<'a> {
	pub rhymes: &'a FxHashSet<Token>,
	pub exclude: &'a FxHashSet<Token>,
}

impl RhymeFilter<'_> {
	pub fn accepts(&self, token: &str) -> bool {
		self.rhymes.contains(token) && !self.exclude.contains(token)
	}
}

/// Common interface of the unigram, bigram and trigram models.
///
/// A model answers two questions about a sentence-in-progress:
/// can it choose the next token (`can_extend`), and with which weights
/// (`candidates`).
///
/// # Context
/// `context` is the sentence-in-progress in *generation order*: its last
/// element is the token nearest to the growing edge. For a forward sentence
/// this is simply the sentence; for a reverse sentence the caller reverses
/// the leading tokens (see `Sentence::context`). Models only look at the last
/// `order() - 1` tokens.
///
/// # Invariants
/// - `candidates(context)` is non-empty iff `can_extend(context)` is true
/// - Every candidate count is >= 1
/// - Tables are immutable once training returns
pub trait NGramIndex: Debug + Send + Sync {
	/// Number of tokens in one n-gram (1, 2 or 3).
	fn order(&self) -> usize;

	fn direction(&self) -> Direction;

	/// Records one prepared line, given in generation order.
	fn add_line(&mut self, prepared: &[Token], sentinels: &Sentinels);

	fn can_extend(&self, context: &[&str]) -> bool;

	/// Candidate next tokens with their counts, empty if the context was
	/// never observed.
	fn candidates(&self, context: &[&str]) -> Candidates<'_>;

	/// Number of distinct contexts (or tokens, for a unigram) in the table.
	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Whether this model's candidates are meaningful as line-final words.
	fn supports_rhyme(&self) -> bool {
		true
	}

	/// Candidates of `context` accepted by `filter`.
	fn rhyming_candidates(&self, context: &[&str], filter: &RhymeFilter<'_>) -> Candidates<'_> {
		if !self.supports_rhyme() {
			return Vec::new();
		}
		self.candidates(context)
			.into_iter()
			.filter(|(token, _)| filter.accepts(token))
			.collect()
	}

	fn can_rhyme(&self, context: &[&str], filter: &RhymeFilter<'_>) -> bool {
		!self.rhyming_candidates(context, filter).is_empty()
	}

	/// Populates the table from `corpus`.
	///
	/// Lines are copied and wrapped with sentinels before counting; the
	/// corpus itself is never modified.
	fn train(&mut self, corpus: &Corpus, sentinels: &Sentinels) {
		let prep = TokenCorpusPrep::new(sentinels);
		for line in prep.prepare(corpus, self.direction()) {
			self.add_line(&line, sentinels);
		}
	}
}
