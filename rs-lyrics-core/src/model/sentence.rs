use std::collections::VecDeque;

use crate::corpus::{Line, Token};
use super::prep::{Direction, Sentinels};

/// Context width used by the highest-order model (trigram).
const CONTEXT_WIDTH: usize = 2;

/// A line under construction.
///
/// Forward sentences start as `[LINE_START_1, LINE_START_2]` and grow at
/// the back; reverse sentences start as `[LINE_END]` and grow at the front.
/// The sentence is exclusively owned by the call generating it.
///
/// # Invariants
/// - Sentinels are present during construction, absent from `finish()`
/// - Forward start sentinels are dropped lazily: the first after the first
///   word, the second after the second word
#[derive(Debug, Clone)]
pub struct Sentence<'s> {
	tokens: VecDeque<Token>,
	direction: Direction,
	sentinels: &'s Sentinels,
}

impl<'s> Sentence<'s> {
	pub fn forward(sentinels: &'s Sentinels) -> Self {
		let tokens = VecDeque::from([sentinels.line_start_1.clone(), sentinels.line_start_2.clone()]);
		Self { tokens, direction: Direction::Forward, sentinels }
	}

	pub fn reverse(sentinels: &'s Sentinels) -> Self {
		let tokens = VecDeque::from([sentinels.line_end.clone()]);
		Self { tokens, direction: Direction::Reverse, sentinels }
	}

	pub fn direction(&self) -> Direction {
		self.direction
	}

	/// The tokens nearest to the growing edge, in generation order.
	pub fn context(&self) -> Vec<&str> {
		let mut context: Vec<&str> = match self.direction {
			Direction::Forward => self.tokens.iter().rev().take(CONTEXT_WIDTH).map(String::as_str).collect(),
			Direction::Reverse => self.tokens.iter().take(CONTEXT_WIDTH).map(String::as_str).collect(),
		};
		context.reverse();
		context
	}

	/// Adds `token` at the growing edge.
	pub fn push(&mut self, token: Token) {
		match self.direction {
			Direction::Forward => {
				self.tokens.push_back(token);
				if self.tokens.len() > CONTEXT_WIDTH
					&& self.tokens.front().is_some_and(|front| self.sentinels.is_start(front))
				{
					self.tokens.pop_front();
				}
			}
			Direction::Reverse => self.tokens.push_front(token),
		}
	}

	/// Replaces the token at the growing edge, keeping sentinels in place.
	pub fn replace_edge(&mut self, token: Token) {
		let edge = match self.direction {
			Direction::Forward => self.tokens.back_mut(),
			Direction::Reverse => self.tokens.front_mut(),
		};
		if let Some(edge) = edge {
			*edge = token;
		}
	}

	/// Number of real words (sentinels excluded).
	pub fn word_count(&self) -> usize {
		self.tokens.iter().filter(|token| !self.sentinels.is_sentinel(token)).count()
	}

	/// Last real word in reading order.
	pub fn last_word(&self) -> Option<&str> {
		self.tokens.iter().rev().find(|token| !self.sentinels.is_sentinel(token)).map(String::as_str)
	}

	/// Strips every sentinel and hands the line back in reading order.
	pub fn finish(self) -> Line {
		let sentinels = self.sentinels;
		self.tokens.into_iter().filter(|token| !sentinels.is_sentinel(token)).collect()
	}
}
