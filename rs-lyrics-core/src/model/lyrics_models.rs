use log::info;
use rustc_hash::FxHashSet;

use crate::corpus::{Corpus, Token};
use crate::error::{LyricsError, Result};
use super::bigram_model::BigramModel;
use super::ngram_model::NGramIndex;
use super::prep::{Direction, Sentinels};
use super::selector::{ModelChain, select_model};
use super::trigram_model::TrigramModel;
use super::unigram_model::UnigramModel;

/// The trained model bundle every generator reads from.
///
/// This struct manages:
/// - `forward`: trigram, bigram and unigram trained on forward lines.
/// - `reverse`: the same chain trained on reversed lines, for rhyming lines
///   built from their last word backward.
/// - `sentinels`: the reserved tokens used to train both chains.
/// - `line_endings`: every word observed as the last word of a line.
///
/// Built once by `train` and read-only afterwards.
#[derive(Debug)]
pub struct LyricsModels {
	sentinels: Sentinels,
	forward: ModelChain,
	reverse: ModelChain,
	line_endings: FxHashSet<Token>,
}

impl LyricsModels {
	/// Trains both backoff chains on `corpus`.
	///
	/// # Errors
	/// `EmptyCorpus` if the corpus holds no token at all: without a
	/// vocabulary the unigram could not close the backoff chain.
	pub fn train(corpus: &Corpus, sentinels: Sentinels) -> Result<Self> {
		if corpus.token_count() == 0 {
			return Err(LyricsError::EmptyCorpus);
		}

		let forward = Self::train_chain(corpus, &sentinels, Direction::Forward);
		let reverse = Self::train_chain(corpus, &sentinels, Direction::Reverse);

		// The reverse chain's candidates right after LINE_END are the words
		// that end lines.
		let end_context = [sentinels.line_end.as_str()];
		let line_endings = select_model(&reverse, &end_context)
			.map(|model| {
				model
					.candidates(&end_context)
					.into_iter()
					.filter(|(token, _)| !sentinels.is_sentinel(token))
					.map(|(token, _)| token.to_owned())
					.collect()
			})
			.unwrap_or_default();

		let models = Self { sentinels, forward, reverse, line_endings };
		info!(
			"trained on {} lines: vocabulary {}, forward tables {:?}, {} line endings",
			corpus.len(),
			corpus.vocabulary_size(),
			models.forward.iter().map(|model| model.len()).collect::<Vec<_>>(),
			models.line_endings.len()
		);
		Ok(models)
	}

	fn train_chain(corpus: &Corpus, sentinels: &Sentinels, direction: Direction) -> ModelChain {
		let mut chain: ModelChain = vec![
			Box::new(TrigramModel::new(direction)),
			Box::new(BigramModel::new(direction)),
			Box::new(UnigramModel::new(direction)),
		];
		for model in chain.iter_mut() {
			model.train(corpus, sentinels);
		}
		chain
	}

	pub fn sentinels(&self) -> &Sentinels {
		&self.sentinels
	}

	/// Forward backoff chain, highest order first.
	pub fn forward(&self) -> &[Box<dyn NGramIndex>] {
		&self.forward
	}

	/// Reverse backoff chain, highest order first.
	pub fn reverse(&self) -> &[Box<dyn NGramIndex>] {
		&self.reverse
	}

	/// Words observed as the last word of at least one line.
	pub fn line_endings(&self) -> &FxHashSet<Token> {
		&self.line_endings
	}
}
