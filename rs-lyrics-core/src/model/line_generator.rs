use log::debug;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use rustc_hash::FxHashSet;

use crate::corpus::{Line, Token};
use crate::error::{LyricsError, Result};
use crate::rhyme::RhymeLookup;
use super::generation_config::GenerationConfig;
use super::lyrics_models::LyricsModels;
use super::ngram_model::NGramIndex;
use super::prep::Sentinels;
use super::sampler::choose;
use super::selector::select_model;
use super::sentence::Sentence;
use super::state::Candidates;

/// Stochastic "long enough" check.
///
/// Draws from a Gaussian centred on `current_length` with standard
/// deviation `stddev` and reports whether the draw exceeds `desired_length`.
/// The longer the line, the likelier it stops.
pub fn sentence_too_long<R: Rng + ?Sized>(
	desired_length: usize,
	current_length: usize,
	stddev: f64,
	rng: &mut R,
) -> Result<bool> {
	let normal = Normal::new(current_length as f64, stddev)
		.map_err(|e| LyricsError::InvalidConfig(format!("length stddev {stddev}: {e}")))?;
	Ok(normal.sample(rng) > desired_length as f64)
}

/// A sentence that reached an acceptable end.
pub(crate) struct Grown<'m> {
	/// Candidates that produced the word at the growing edge.
	pub(crate) edge_candidates: Candidates<'m>,
	/// `true` when `LINE_END` closed the line, `false` when it was cut.
	pub(crate) closed: bool,
}

/// Grows `sentence` until `LINE_END` is sampled or the line is cut.
///
/// A line is cut by the hard word cap, or by the length check once it holds
/// `min_words` words. Returns `None` when `LINE_END` came before `min_words`
/// words: the caller must discard the sentence and restart.
pub(crate) fn extend_sentence<'m, R: Rng + ?Sized>(
	chain: &'m [Box<dyn NGramIndex>],
	sentence: &mut Sentence<'_>,
	sentinels: &Sentinels,
	config: &GenerationConfig,
	desired_length: usize,
	min_words: usize,
	rng: &mut R,
) -> Result<Option<Grown<'m>>> {
	let mut edge_candidates: Candidates<'m> = Vec::new();
	loop {
		let context = sentence.context();
		let model = select_model(chain, &context).ok_or(LyricsError::NoModelAvailable)?;
		let candidates = model.candidates(&context);
		let token = choose(&candidates, sentinels, rng)?;

		if sentinels.is_end(&token) {
			if sentence.word_count() < min_words {
				return Ok(None);
			}
			return Ok(Some(Grown { edge_candidates, closed: true }));
		}

		sentence.push(token);
		edge_candidates = candidates;

		let words = sentence.word_count();
		if words >= config.max_line_words
			|| (words >= min_words && sentence_too_long(desired_length, words, config.length_stddev, rng)?)
		{
			return Ok(Some(Grown { edge_candidates, closed: false }));
		}
	}
}

/// Tells whether a word can later be answered by a rhyming line.
///
/// A word is rhymable when at least one of its rhymes was observed ending
/// a line in the corpus, i.e. when `RhymeLineGenerator` would find a
/// candidate for it. Rhymes in `exclude` do not count.
pub struct RhymeSetup<'a> {
	lookup: &'a dyn RhymeLookup,
	endings: &'a FxHashSet<Token>,
	exclude: FxHashSet<Token>,
}

impl<'a> RhymeSetup<'a> {
	pub fn new(lookup: &'a dyn RhymeLookup, models: &'a LyricsModels) -> Self {
		Self { lookup, endings: models.line_endings(), exclude: FxHashSet::default() }
	}

	/// Setup for a word answered by the final line of a stanza, where weak
	/// endings are never used.
	pub fn for_final_line(lookup: &'a dyn RhymeLookup, models: &'a LyricsModels, config: &GenerationConfig) -> Self {
		Self { lookup, endings: models.line_endings(), exclude: config.weak_ending_set() }
	}

	pub fn is_rhymable(&self, word: &str) -> bool {
		self.lookup
			.rhymes_of(word)
			.iter()
			.any(|rhyme| self.endings.contains(rhyme) && !self.exclude.contains(rhyme))
	}
}

/// Forward, token-by-token line construction.
///
/// # Responsibilities
/// - Walk the forward backoff chain from `[LINE_START_1, LINE_START_2]`
/// - Stop on `LINE_END` or on the stochastic length check
/// - Discard and restart lines that end before two words, a bounded
///   number of times
/// - Optionally bias the last word toward a rhymable one
pub struct LineGenerator<'a> {
	models: &'a LyricsModels,
	config: &'a GenerationConfig,
}

impl<'a> LineGenerator<'a> {
	pub fn new(models: &'a LyricsModels, config: &'a GenerationConfig) -> Self {
		Self { models, config }
	}

	/// Generates one plain line of about `desired_length` words.
	///
	/// # Errors
	/// - `GenerationExhausted` after `max_restarts` lines ended too short
	/// - `EmptyCandidateSet` / `NoModelAvailable` on a broken backoff chain
	pub fn generate<R: Rng + ?Sized>(&self, desired_length: usize, rng: &mut R) -> Result<Line> {
		self.generate_line(desired_length, None, 2, rng)
	}

	/// Same as `generate`, but the last word is steered toward one that a
	/// later line can rhyme with.
	pub fn generate_rhymable<R: Rng + ?Sized>(
		&self,
		desired_length: usize,
		setup: &RhymeSetup<'_>,
		rng: &mut R,
	) -> Result<Line> {
		self.generate_line(desired_length, Some(setup), 2, rng)
	}

	/// Accepts one-word lines. Used once the regular bound is exhausted.
	pub fn generate_degraded<R: Rng + ?Sized>(&self, desired_length: usize, rng: &mut R) -> Result<Line> {
		self.generate_line(desired_length, None, 1, rng)
	}

	fn generate_line<R: Rng + ?Sized>(
		&self,
		desired_length: usize,
		setup: Option<&RhymeSetup<'_>>,
		min_words: usize,
		rng: &mut R,
	) -> Result<Line> {
		let sentinels = self.models.sentinels();
		for attempt in 1..=self.config.max_restarts {
			let mut sentence = Sentence::forward(sentinels);
			let grown = extend_sentence(
				self.models.forward(),
				&mut sentence,
				sentinels,
				self.config,
				desired_length,
				min_words,
				rng,
			)?;
			match grown {
				Some(grown) => {
					if let Some(setup) = setup {
						self.ensure_rhymable(&mut sentence, &grown, setup, rng)?;
					}
					return Ok(sentence.finish());
				}
				None => debug!(
					"line ended before {} words, restarting ({}/{})",
					min_words, attempt, self.config.max_restarts
				),
			}
		}
		Err(LyricsError::GenerationExhausted { attempts: self.config.max_restarts })
	}

	/// Makes the last word rhymable when the corpus allows it.
	///
	/// 1. Swap the last word for a rhymable candidate of the same context.
	/// 2. Otherwise, if the line was cut rather than closed, keep growing it
	///    by at most `max_rhyme_extension` words, stopping on the first
	///    rhymable candidate.
	///
	/// The sampled line is kept as is when neither step finds a rhymable word.
	fn ensure_rhymable<R: Rng + ?Sized>(
		&self,
		sentence: &mut Sentence<'_>,
		grown: &Grown<'_>,
		setup: &RhymeSetup<'_>,
		rng: &mut R,
	) -> Result<()> {
		let Some(last) = sentence.last_word().map(str::to_owned) else {
			return Ok(());
		};
		if setup.is_rhymable(&last) {
			return Ok(());
		}

		if let Some(forced) = self.pick_rhymable(&grown.edge_candidates, setup, rng)? {
			debug!("forcing rhymable last word '{}' instead of '{}'", forced, last);
			sentence.replace_edge(forced);
			return Ok(());
		}

		if !grown.closed {
			let sentinels = self.models.sentinels();
			for _ in 0..self.config.max_rhyme_extension {
				if sentence.word_count() >= self.config.max_line_words {
					break;
				}
				let context = sentence.context();
				let model = select_model(self.models.forward(), &context).ok_or(LyricsError::NoModelAvailable)?;
				let candidates = model.candidates(&context);
				if let Some(forced) = self.pick_rhymable(&candidates, setup, rng)? {
					debug!("extending the line after '{}' to end on '{}'", last, forced);
					sentence.push(forced);
					return Ok(());
				}
				let token = choose(&candidates, sentinels, rng)?;
				if sentinels.is_end(&token) {
					break;
				}
				sentence.push(token);
			}
		}

		debug!("no rhymable ending reachable after '{}', keeping the line", last);
		Ok(())
	}

	/// A weighted choice among the rhymable candidates, if there is any.
	fn pick_rhymable<R: Rng + ?Sized>(
		&self,
		candidates: &[(&str, usize)],
		setup: &RhymeSetup<'_>,
		rng: &mut R,
	) -> Result<Option<Token>> {
		let sentinels = self.models.sentinels();
		let rhymable: Vec<(&str, usize)> = candidates
			.iter()
			.filter(|(token, _)| !sentinels.is_sentinel(token) && setup.is_rhymable(token))
			.copied()
			.collect();
		if rhymable.is_empty() {
			return Ok(None);
		}
		choose(&rhymable, sentinels, rng).map(Some)
	}
}
