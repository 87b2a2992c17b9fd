use log::{debug, warn};
use rand::Rng;
use rustc_hash::FxHashSet;

use crate::corpus::{Line, Token};
use crate::error::{LyricsError, Result};
use crate::rhyme::RhymeLookup;
use super::generation_config::GenerationConfig;
use super::line_generator::extend_sentence;
use super::lyrics_models::LyricsModels;
use super::ngram_model::RhymeFilter;
use super::sampler::choose;
use super::selector::select_rhyming_model;
use super::sentence::Sentence;

/// Builds a line backward from a last word that rhymes with a reference line.
///
/// Algorithm:
/// 1. Seed a reverse sentence with `LINE_END`.
/// 2. Pick the last word among the reverse chain's line-final candidates
///    that rhyme with the reference's last word (weak endings excluded on
///    the final line of a stanza).
/// 3. Prepend tokens through the reverse backoff chain until `LINE_END` or
///    the length check, restarting lines shorter than two words.
/// 4. Re-check the rhyme on the finished line, retrying a bounded number of
///    times. Reverse growth only prepends, so the word picked in step 2 stays
///    last and the check never fails with the models of this crate.
///
/// Failures are reported, never hidden: the caller decides on the fallback.
pub struct RhymeLineGenerator<'a> {
	models: &'a LyricsModels,
	lookup: &'a dyn RhymeLookup,
	config: &'a GenerationConfig,
}

impl<'a> RhymeLineGenerator<'a> {
	pub fn new(models: &'a LyricsModels, lookup: &'a dyn RhymeLookup, config: &'a GenerationConfig) -> Self {
		Self { models, lookup, config }
	}

	/// Generates a line whose last word rhymes with the last word of `reference`.
	///
	/// # Errors
	/// - `NoRhymeCandidate` if no line-final word rhymes with the reference
	/// - `GenerationExhausted` if the short-line or rhyme-mismatch bound is hit
	///
	/// Both are recoverable: fall back to `LineGenerator` for this line.
	pub fn generate<R: Rng + ?Sized>(
		&self,
		reference: &[Token],
		final_line: bool,
		desired_length: usize,
		rng: &mut R,
	) -> Result<Line> {
		let sentinels = self.models.sentinels();
		let target = reference
			.iter()
			.rev()
			.find(|token| !sentinels.is_sentinel(token))
			.ok_or_else(|| LyricsError::NoRhymeCandidate { word: String::new() })?;

		let rhymes = self.lookup.rhymes_of(target);
		let mut exclude: FxHashSet<Token> = FxHashSet::default();
		exclude.insert(sentinels.line_end.clone());
		if final_line {
			exclude.extend(self.config.weak_ending_set());
		}
		let filter = RhymeFilter { rhymes: &rhymes, exclude: &exclude };

		let mut restarts = 0;
		let mut mismatches = 0;
		loop {
			let mut sentence = Sentence::reverse(sentinels);
			let last_word = {
				let context = sentence.context();
				let model = select_rhyming_model(self.models.reverse(), &context, &filter)
					.ok_or_else(|| LyricsError::NoRhymeCandidate { word: target.clone() })?;
				choose(&model.rhyming_candidates(&context, &filter), sentinels, rng)?
			};
			debug!("rhyming '{}' with '{}'", last_word, target);
			sentence.push(last_word);

			let grown = extend_sentence(
				self.models.reverse(),
				&mut sentence,
				sentinels,
				self.config,
				desired_length,
				2,
				rng,
			)?;
			if grown.is_none() {
				restarts += 1;
				debug!("rhyming line ended before 2 words ({}/{})", restarts, self.config.max_restarts);
				if restarts >= self.config.max_restarts {
					return Err(LyricsError::GenerationExhausted { attempts: restarts });
				}
				continue;
			}

			let line = sentence.finish();
			if line.last().is_some_and(|last| rhymes.contains(last)) {
				return Ok(line);
			}
			mismatches += 1;
			warn!(
				"line {:?} lost its rhyme with '{}' ({}/{})",
				line, target, mismatches, self.config.max_rhyme_attempts
			);
			if mismatches >= self.config.max_rhyme_attempts {
				return Err(LyricsError::GenerationExhausted { attempts: mismatches });
			}
		}
	}
}
