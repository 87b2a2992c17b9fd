use rand::Rng;

use crate::corpus::Token;
use crate::error::{LyricsError, Result};
use super::prep::Sentinels;

/// Draws one token from weighted candidates.
///
/// The probability of selecting a token grows with its occurrence count.
///
/// This method performs:
/// - an O(n) scan to build cumulative weights, in the candidates' order
/// - a uniform draw `x` in `[min(cumulative), max(cumulative)]`
///   (the sole candidate is returned without drawing)
/// - a scan for the first cumulative weight `>= x`
///
/// Start sentinels are never returned: they only seed context. The end
/// sentinel is a valid pick and terminates a line.
///
/// # Errors
/// `EmptyCandidateSet` when nothing is left once start sentinels are removed.
/// Backoff should make this unreachable.
pub fn choose<R: Rng + ?Sized>(candidates: &[(&str, usize)], sentinels: &Sentinels, rng: &mut R) -> Result<Token> {
	let mut cumulative: Vec<(&str, usize)> = Vec::with_capacity(candidates.len());
	let mut total = 0;
	for &(token, weight) in candidates {
		if sentinels.is_start(token) || weight == 0 {
			continue;
		}
		total += weight;
		cumulative.push((token, total));
	}

	let (first, last) = match (cumulative.first(), cumulative.last()) {
		(Some(first), Some(last)) => (first.1, last.1),
		_ => return Err(LyricsError::EmptyCandidateSet),
	};

	let x = if cumulative.len() > 1 { rng.random_range(first..=last) } else { first };

	cumulative
		.iter()
		.find(|(_, weight)| *weight >= x)
		.map(|(token, _)| (*token).to_owned())
		.ok_or(LyricsError::EmptyCandidateSet)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use std::collections::HashMap;

	#[test]
	fn single_candidate_always_wins() {
		let sentinels = Sentinels::default();
		let mut rng = StdRng::seed_from_u64(7);
		for _ in 0..100 {
			assert_eq!(choose(&[("x", 5)], &sentinels, &mut rng).unwrap(), "x");
		}
	}

	#[test]
	fn equal_weights_are_uniform() {
		let sentinels = Sentinels::default();
		let mut rng = StdRng::seed_from_u64(42);
		let candidates = [("a", 1), ("b", 1), ("c", 1)];
		let trials = 10_000;
		let mut seen: HashMap<Token, usize> = HashMap::new();
		for _ in 0..trials {
			*seen.entry(choose(&candidates, &sentinels, &mut rng).unwrap()).or_insert(0) += 1;
		}
		for key in ["a", "b", "c"] {
			let frequency = seen[key] as f64 / trials as f64;
			assert!((frequency - 1.0 / 3.0).abs() < 0.03, "{key}: {frequency}");
		}
	}

	#[test]
	fn start_sentinels_are_never_chosen() {
		let sentinels = Sentinels::default();
		let mut rng = StdRng::seed_from_u64(1);
		let candidates = [("^::^", 50), ("^:::^", 50), ("$:::$", 1), ("word", 1)];
		for _ in 0..500 {
			let token = choose(&candidates, &sentinels, &mut rng).unwrap();
			assert!(!sentinels.is_start(&token));
		}
	}

	#[test]
	fn empty_candidates_are_an_error() {
		let sentinels = Sentinels::default();
		let mut rng = StdRng::seed_from_u64(1);
		assert!(matches!(choose(&[], &sentinels, &mut rng), Err(LyricsError::EmptyCandidateSet)));
		assert!(matches!(
			choose(&[("^::^", 3)], &sentinels, &mut rng),
			Err(LyricsError::EmptyCandidateSet)
		));
	}

	#[test]
	fn line_end_can_be_chosen() {
		let sentinels = Sentinels::default();
		let mut rng = StdRng::seed_from_u64(3);
		assert_eq!(choose(&[("$:::$", 2)], &sentinels, &mut rng).unwrap(), "$:::$");
	}
}
