use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::corpus::Token;
use crate::error::{LyricsError, Result};

/// Words that make a weak last word for the final line of a stanza.
pub const DEFAULT_WEAK_ENDINGS: [&str; 17] = [
	"and", "but", "or", "nor", "so", "yet", "for", "that", "which", "who", "whom", "whose", "where", "when",
	"while", "because", "if",
];

/// Parameters shared by every line and stanza generator.
///
/// `GenerationConfig` contains the **length control** (desired length and
/// the spread of the stochastic stop), the **retry bounds** that guarantee
/// termination on sparse corpora, and the **seed** of the run's single
/// random generator.
///
/// # Invariants
/// - `desired_length >= 1`
/// - `length_stddev` is finite and strictly positive
/// - every retry bound is >= 1
///
/// Public fields may be set directly; the setters validate.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct GenerationConfig {
	/// Target number of words per line.
	pub desired_length: usize,

	/// Standard deviation of the Gaussian "long enough" check.
	pub length_stddev: f64,

	/// Bound on discard-and-restart after a line ended too short.
	pub max_restarts: usize,

	/// Bound on retries after a rhyming line lost its rhyme.
	pub max_rhyme_attempts: usize,

	/// Extra words a line may grow by to end on a rhymable word.
	pub max_rhyme_extension: usize,

	/// Hard cap on words per line.
	pub max_line_words: usize,

	/// Words never used to end the final line of a stanza.
	pub weak_endings: Vec<Token>,

	/// Seed of the run's random generator, `None` for an OS-seeded run.
	pub seed: Option<u64>,
}

impl Default for GenerationConfig {
	fn default() -> Self {
		Self {
			desired_length: 8,
			length_stddev: 1.0,
			max_restarts: 32,
			max_rhyme_attempts: 8,
			max_rhyme_extension: 6,
			max_line_words: 32,
			weak_endings: DEFAULT_WEAK_ENDINGS.iter().map(|word| (*word).to_owned()).collect(),
			seed: None,
		}
	}
}

impl GenerationConfig {
	/// Sets the desired line length.
	///
	/// # Errors
	/// Returns an error if `desired_length` is 0 or exceeds `max_line_words`.
	pub fn set_desired_length(&mut self, desired_length: usize) -> Result<()> {
		if desired_length == 0 || desired_length > self.max_line_words {
			return Err(LyricsError::InvalidConfig(format!(
				"desired length must be between 1 and {}, got {}",
				self.max_line_words, desired_length
			)));
		}
		self.desired_length = desired_length;
		Ok(())
	}

	/// Sets the standard deviation of the length check.
	///
	/// # Errors
	/// Returns an error if the value is not finite or not strictly positive.
	pub fn set_length_stddev(&mut self, length_stddev: f64) -> Result<()> {
		if !length_stddev.is_finite() || length_stddev <= 0.0 {
			return Err(LyricsError::InvalidConfig(format!(
				"length stddev must be finite and > 0, got {}",
				length_stddev
			)));
		}
		self.length_stddev = length_stddev;
		Ok(())
	}

	/// Checks every invariant, for configs built field by field or deserialized.
	pub fn validate(&self) -> Result<()> {
		if self.desired_length == 0 {
			return Err(LyricsError::InvalidConfig("desired length must be >= 1".to_owned()));
		}
		if !self.length_stddev.is_finite() || self.length_stddev <= 0.0 {
			return Err(LyricsError::InvalidConfig("length stddev must be finite and > 0".to_owned()));
		}
		if self.max_restarts == 0 || self.max_rhyme_attempts == 0 || self.max_line_words == 0 {
			return Err(LyricsError::InvalidConfig("retry bounds and max line words must be >= 1".to_owned()));
		}
		Ok(())
	}

	pub fn weak_ending_set(&self) -> FxHashSet<Token> {
		self.weak_endings.iter().cloned().collect()
	}

	/// Builds the run's random generator from `seed`.
	pub fn make_rng(&self) -> StdRng {
		match self.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		}
	}
}
