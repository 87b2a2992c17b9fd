use rustc_hash::FxHashMap;

use crate::corpus::Token;
use super::ngram_model::NGramIndex;
use super::prep::{Direction, Sentinels};
use super::state::{Candidates, State};

/// Order-3 model stored as a two-level trie: `first -> second -> State`.
#[derive(Debug)]
pub struct TrigramModel {
	direction: Direction,
	table: FxHashMap<Token, FxHashMap<Token, State>>,
}

impl TrigramModel {
	pub fn new(direction: Direction) -> Self {
		Self { direction, table: FxHashMap::default() }
	}

	fn state(&self, context: &[&str]) -> Option<&State> {
		let [.., first, second] = context else {
			return None;
		};
		self.table.get(*first)?.get(*second)
	}
}

impl NGramIndex for TrigramModel {
	fn order(&self) -> usize {
		3
	}

	fn direction(&self) -> Direction {
		self.direction
	}

	fn add_line(&mut self, prepared: &[Token], _sentinels: &Sentinels) {
		for window in prepared.windows(3) {
			self.table
				.entry(window[0].clone())
				.or_default()
				.entry(window[1].clone())
				.or_default()
				.add_transition(&window[2]);
		}
	}

	fn can_extend(&self, context: &[&str]) -> bool {
		self.state(context).is_some()
	}

	fn candidates(&self, context: &[&str]) -> Candidates<'_> {
		self.state(context).map(State::candidates).unwrap_or_default()
	}

	fn len(&self) -> usize {
		self.table.values().map(FxHashMap::len).sum()
	}
}
