use log::debug;

use super::ngram_model::{NGramIndex, RhymeFilter};

/// A backoff chain: models sorted highest order first (trigram, bigram,
/// unigram), all trained in the same direction.
pub type ModelChain = Vec<Box<dyn NGramIndex>>;

/// Returns the first model of `models` able to extend `context`.
///
/// Works the same for forward and reverse chains, since `context` is always
/// given in generation order.
///
/// Returns `None` if no model qualifies. With a trained unigram last in the
/// chain this cannot happen, so callers turn `None` into
/// `LyricsError::NoModelAvailable`.
pub fn select_model<'m>(models: &'m [Box<dyn NGramIndex>], context: &[&str]) -> Option<&'m dyn NGramIndex> {
	let model = models.iter().find(|model| model.can_extend(context)).map(|model| model.as_ref());
	if let Some(model) = model {
		debug!("backoff: order {} ({:?}) for context {:?}", model.order(), model.direction(), context);
	}
	model
}

/// Returns the first model of `models` that offers at least one candidate
/// accepted by `filter` after `context`.
pub fn select_rhyming_model<'m>(
	models: &'m [Box<dyn NGramIndex>],
	context: &[&str],
	filter: &RhymeFilter<'_>,
) -> Option<&'m dyn NGramIndex> {
	models
		.iter()
		.find(|model| model.supports_rhyme() && model.can_rhyme(context, filter))
		.map(|model| model.as_ref())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::corpus::{Corpus, Token};
	use crate::model::bigram_model::BigramModel;
	use crate::model::prep::{Direction, Sentinels};
	use crate::model::trigram_model::TrigramModel;
	use crate::model::unigram_model::UnigramModel;
	use rustc_hash::FxHashSet;

	fn chain(direction: Direction) -> ModelChain {
		let corpus = Corpus::from_lines(vec![vec!["the", "quick", "brown", "fox"], vec!["the", "lazy", "dog"]]);
		let sentinels = Sentinels::default();
		let mut models: ModelChain = vec![
			Box::new(TrigramModel::new(direction)),
			Box::new(BigramModel::new(direction)),
			Box::new(UnigramModel::new(direction)),
		];
		for model in models.iter_mut() {
			model.train(&corpus, &sentinels);
		}
		models
	}

	#[test]
	fn prefers_the_highest_order() {
		let models = chain(Direction::Forward);
		assert_eq!(select_model(&models, &["the", "quick"]).map(|m| m.order()), Some(3));
		assert_eq!(select_model(&models, &["fox", "the"]).map(|m| m.order()), Some(2));
		assert_eq!(select_model(&models, &["unseen", "words"]).map(|m| m.order()), Some(1));
	}

	#[test]
	fn empty_chain_has_no_model() {
		let models: ModelChain = Vec::new();
		assert!(select_model(&models, &["the"]).is_none());
	}

	#[test]
	fn untrained_chain_has_no_model() {
		let models: ModelChain = vec![Box::new(UnigramModel::new(Direction::Forward))];
		assert!(select_model(&models, &["the"]).is_none());
	}

	#[test]
	fn rhyming_selection_skips_the_unigram() {
		let models = chain(Direction::Reverse);
		let rhymes: FxHashSet<Token> = ["fox".to_string()].into_iter().collect();
		let nothing: FxHashSet<Token> = ["frog".to_string()].into_iter().collect();
		let exclude = FxHashSet::default();
		let filter = RhymeFilter { rhymes: &rhymes, exclude: &exclude };
		assert_eq!(select_rhyming_model(&models, &["$:::$"], &filter).map(|m| m.order()), Some(2));
		let filter = RhymeFilter { rhymes: &nothing, exclude: &exclude };
		assert!(select_rhyming_model(&models, &["$:::$"], &filter).is_none());
	}
}
