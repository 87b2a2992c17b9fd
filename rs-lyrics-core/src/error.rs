//! Error types for lyric generation.

use thiserror::Error;

/// Result type for lyric generation operations.
pub type Result<T> = std::result::Result<T, LyricsError>;

/// Errors that can occur while training models or generating lyrics.
///
/// Two families live here:
/// - recoverable conditions (`NoRhymeCandidate`, `GenerationExhausted`),
///   caused by a sparse corpus and handled by falling back to plain generation;
/// - fatal conditions, which indicate a broken invariant or bad input and
///   abort the run.
#[derive(Error, Debug)]
pub enum LyricsError {
	/// The sampler received no usable candidate.
	#[error("Sampler invoked with an empty candidate set")]
	EmptyCandidateSet,

	/// The backoff chain was exhausted without finding a usable model.
	#[error("No model available for the current context")]
	NoModelAvailable,

	/// No vocabulary word rhymes with `word` and can end a line.
	#[error("No rhyming candidate for '{word}'")]
	NoRhymeCandidate { word: String },

	/// A bounded retry loop ran out of attempts.
	#[error("Generation exhausted after {attempts} attempts")]
	GenerationExhausted { attempts: usize },

	/// Training was attempted on a corpus without a single token.
	#[error("Corpus contains no tokens")]
	EmptyCorpus,

	#[error("Invalid rhyme scheme: {0}")]
	InvalidScheme(String),

	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Codec error: {0}")]
	Codec(#[from] postcard::Error),
}

impl LyricsError {
	/// Returns `true` for the conditions callers are expected to absorb
	/// by falling back to plain generation.
	pub fn is_recoverable(&self) -> bool {
		matches!(self, LyricsError::NoRhymeCandidate { .. } | LyricsError::GenerationExhausted { .. })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn recoverable_classification() {
		assert!(LyricsError::NoRhymeCandidate { word: "love".into() }.is_recoverable());
		assert!(LyricsError::GenerationExhausted { attempts: 3 }.is_recoverable());
		assert!(!LyricsError::EmptyCandidateSet.is_recoverable());
		assert!(!LyricsError::NoModelAvailable.is_recoverable());
		assert!(!LyricsError::EmptyCorpus.is_recoverable());
	}

	#[test]
	fn messages_name_the_word() {
		let err = LyricsError::NoRhymeCandidate { word: "orange".into() };
		assert_eq!(err.to_string(), "No rhyming candidate for 'orange'");
	}
}
