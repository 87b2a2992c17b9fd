use rustc_hash::FxHashMap;

use crate::corpus::Token;

/// Candidate continuations as `(token, count)` pairs, in insertion order.
pub type Candidates<'a> = Vec<(&'a str, usize)>;

/// Terminal node of an n-gram table: every token observed after one
/// context, with its number of observations.
///
/// Conceptually this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during training
/// - Expose candidates in a stable (insertion) order for sampling
///
/// ## Invariants
/// - Each transition occurrence count is strictly positive
/// - `index[token]` is the position of `token` in `transitions`
#[derive(Clone, Debug, Default)]
pub struct State {
	/// Outgoing transitions, in the order they were first observed.
	/// Example: [("love", 42), ("me", 3)]
	transitions: Vec<(Token, usize)>,
	/// Position of each token inside `transitions`.
	index: FxHashMap<Token, usize>,
}

impl State {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records an occurrence of a transition toward `next`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is created with an initial count of 1.
	pub fn add_transition(&mut self, next: &str) {
		match self.index.get(next) {
			Some(&position) => self.transitions[position].1 += 1,
			None => {
				self.index.insert(next.to_owned(), self.transitions.len());
				self.transitions.push((next.to_owned(), 1));
			}
		}
	}

	pub fn contains(&self, token: &str) -> bool {
		self.index.contains_key(token)
	}

	/// Occurrence count of `token`, 0 if it was never observed.
	pub fn count(&self, token: &str) -> usize {
		self.index.get(token).map_or(0, |&position| self.transitions[position].1)
	}

	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	/// Iterates over observed tokens in insertion order.
	pub fn tokens(&self) -> impl Iterator<Item = &str> {
		self.transitions.iter().map(|(token, _)| token.as_str())
	}

	/// Borrows every transition as a candidate list.
	pub fn candidates(&self) -> Candidates<'_> {
		self.transitions.iter().map(|(token, count)| (token.as_str(), *count)).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn counts_start_at_one_and_increment() {
		let mut state = State::new();
		state.add_transition("quick");
		state.add_transition("lazy");
		state.add_transition("quick");
		assert_eq!(state.count("quick"), 2);
		assert_eq!(state.count("lazy"), 1);
		assert_eq!(state.count("fox"), 0);
	}

	#[test]
	fn candidates_keep_first_seen_order() {
		let mut state = State::new();
		for token in ["b", "a", "c", "a", "b"] {
			state.add_transition(token);
		}
		assert_eq!(state.candidates(), vec![("b", 2), ("a", 2), ("c", 1)]);
	}
}
