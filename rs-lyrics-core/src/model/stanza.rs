use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use rand::Rng;

use crate::corpus::Line;
use crate::error::{LyricsError, Result};
use crate::rhyme::RhymeLookup;
use super::generation_config::GenerationConfig;
use super::line_generator::{LineGenerator, RhymeSetup};
use super::lyrics_models::LyricsModels;
use super::rhyme_generator::RhymeLineGenerator;

/// One label per line; lines sharing a label must rhyme.
///
/// Parsed from strings such as `"AABB"`, `"abab"` or `"A B B A"`:
/// labels are case insensitive and whitespace is ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RhymeScheme {
	labels: Vec<char>,
}

impl RhymeScheme {
	/// # Errors
	/// `InvalidScheme` for an empty scheme or a non-alphabetic label.
	pub fn parse(scheme: &str) -> Result<Self> {
		let mut labels = Vec::new();
		for label in scheme.chars().filter(|c| !c.is_whitespace()) {
			if !label.is_alphabetic() {
				return Err(LyricsError::InvalidScheme(format!("label '{}' in '{}' is not a letter", label, scheme)));
			}
			labels.extend(label.to_uppercase());
		}
		if labels.is_empty() {
			return Err(LyricsError::InvalidScheme("scheme has no lines".to_owned()));
		}
		Ok(Self { labels })
	}

	pub fn aabb() -> Self {
		Self { labels: vec!['A', 'A', 'B', 'B'] }
	}

	pub fn abab() -> Self {
		Self { labels: vec!['A', 'B', 'A', 'B'] }
	}

	pub fn abba() -> Self {
		Self { labels: vec!['A', 'B', 'B', 'A'] }
	}

	pub fn labels(&self) -> &[char] {
		&self.labels
	}

	pub fn len(&self) -> usize {
		self.labels.len()
	}

	pub fn is_empty(&self) -> bool {
		self.labels.is_empty()
	}

	/// Index of the most recent line before `index` sharing its label.
	pub fn reference_of(&self, index: usize) -> Option<usize> {
		let label = self.labels.get(index)?;
		self.labels[..index].iter().rposition(|other| other == label)
	}

	/// Index of the first line after `index` sharing its label, i.e. the
	/// line that will rhyme with it.
	pub fn next_of(&self, index: usize) -> Option<usize> {
		let label = self.labels.get(index)?;
		self.labels[index + 1..].iter().position(|other| other == label).map(|offset| index + 1 + offset)
	}

	/// Whether a later line shares the label of line `index`.
	pub fn recurs_after(&self, index: usize) -> bool {
		self.next_of(index).is_some()
	}
}

impl FromStr for RhymeScheme {
	type Err = LyricsError;

	fn from_str(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}

impl fmt::Display for RhymeScheme {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.labels.iter().try_for_each(|label| write!(f, "{label}"))
	}
}

/// Ordered lines of one verse or chorus.
pub type Stanza = Vec<Line>;

/// A generated song: two verses sharing one chorus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Song {
	pub verse_one: Stanza,
	pub verse_two: Stanza,
	pub chorus: Stanza,
}

/// Applies a rhyme scheme across the lines of a stanza.
///
/// # Behavior
/// - A line whose label appeared before is generated backward to rhyme with
///   the most recent such line.
/// - Any other line is generated forward; if its label recurs later, its
///   last word is steered toward a rhymable one.
/// - Recoverable failures (`NoRhymeCandidate`, `GenerationExhausted`)
///   degrade the line to plain generation, then to a degraded line, so a
///   stanza is always produced. Fatal errors propagate.
pub struct StanzaComposer<'a> {
	models: &'a LyricsModels,
	lookup: &'a dyn RhymeLookup,
	config: &'a GenerationConfig,
}

impl<'a> StanzaComposer<'a> {
	pub fn new(models: &'a LyricsModels, lookup: &'a dyn RhymeLookup, config: &'a GenerationConfig) -> Self {
		Self { models, lookup, config }
	}

	/// Generates one stanza, one line per label of `scheme`.
	///
	/// # Errors
	/// `InvalidConfig` for an invalid config, or any fatal generation error.
	pub fn compose<R: Rng + ?Sized>(&self, scheme: &RhymeScheme, rng: &mut R) -> Result<Stanza> {
		self.config.validate()?;
		let lines = LineGenerator::new(self.models, self.config);
		let rhyming = RhymeLineGenerator::new(self.models, self.lookup, self.config);
		let setup = RhymeSetup::new(self.lookup, self.models);
		let final_setup = RhymeSetup::for_final_line(self.lookup, self.models, self.config);
		let desired_length = self.config.desired_length;
		let last_index = scheme.len().saturating_sub(1);

		let mut stanza: Stanza = Vec::with_capacity(scheme.len());
		for index in 0..scheme.len() {
			let line = match scheme.reference_of(index) {
				Some(reference) => {
					let final_line = index == last_index;
					match rhyming.generate(&stanza[reference], final_line, desired_length, rng) {
						Ok(line) => line,
						Err(e) if e.is_recoverable() => {
							warn!("line {} of {}: {}, falling back to plain generation", index + 1, scheme, e);
							self.plain(&lines, None, rng)?
						}
						Err(e) => return Err(e),
					}
				}
				None => match scheme.next_of(index) {
					Some(next) if next == last_index => self.plain(&lines, Some(&final_setup), rng)?,
					Some(_) => self.plain(&lines, Some(&setup), rng)?,
					None => self.plain(&lines, None, rng)?,
				},
			};
			debug!("line {} of {}: {:?}", index + 1, scheme, line);
			stanza.push(line);
		}
		Ok(stanza)
	}

	/// Generates verse one, verse two and the chorus.
	pub fn compose_song<R: Rng + ?Sized>(
		&self,
		verse_scheme: &RhymeScheme,
		chorus_scheme: &RhymeScheme,
		rng: &mut R,
	) -> Result<Song> {
		let verse_one = self.compose(verse_scheme, rng)?;
		let verse_two = self.compose(verse_scheme, rng)?;
		let chorus = self.compose(chorus_scheme, rng)?;
		Ok(Song { verse_one, verse_two, chorus })
	}

	fn plain<R: Rng + ?Sized>(
		&self,
		lines: &LineGenerator<'_>,
		setup: Option<&RhymeSetup<'_>>,
		rng: &mut R,
	) -> Result<Line> {
		let desired_length = self.config.desired_length;
		let attempt = match setup {
			Some(setup) => lines.generate_rhymable(desired_length, setup, rng),
			None => lines.generate(desired_length, rng),
		};
		match attempt {
			Err(e) if e.is_recoverable() => {
				warn!("{}, accepting a degraded line", e);
				lines.generate_degraded(desired_length, rng)
			}
			other => other,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::corpus::Corpus;
	use crate::model::prep::Sentinels;
	use crate::rhyme::RhymeLibrary;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn parses_schemes() {
		assert_eq!(RhymeScheme::parse("aabb").unwrap(), RhymeScheme::aabb());
		assert_eq!("A B A B".parse::<RhymeScheme>().unwrap(), RhymeScheme::abab());
		assert_eq!(RhymeScheme::abba().to_string(), "ABBA");
		assert!(matches!(RhymeScheme::parse("  "), Err(LyricsError::InvalidScheme(_))));
		assert!(matches!(RhymeScheme::parse("A1"), Err(LyricsError::InvalidScheme(_))));
	}

	#[test]
	fn references_point_to_the_latest_match() {
		let scheme = RhymeScheme::parse("ABAAB").unwrap();
		assert_eq!(scheme.reference_of(0), None);
		assert_eq!(scheme.reference_of(1), None);
		assert_eq!(scheme.reference_of(2), Some(0));
		assert_eq!(scheme.reference_of(3), Some(2));
		assert_eq!(scheme.reference_of(4), Some(1));
		assert!(scheme.recurs_after(0));
		assert!(!scheme.recurs_after(4));
		assert!(!scheme.recurs_after(9));
		assert_eq!(scheme.next_of(0), Some(2));
		assert_eq!(scheme.next_of(1), Some(4));
		assert_eq!(scheme.next_of(3), None);
	}

	fn corpus() -> Corpus {
		Corpus::from_text(
			"i got a feeling deep inside\n\
			 nothing left for me to hide\n\
			 walking down the road tonight\n\
			 everything will be alright\n\
			 hold me close and hold me tight\n\
			 you are the one who makes it right\n\
			 we can run and we can ride\n\
			 stay with me and be my guide",
		)
	}

	fn rhymes() -> RhymeLibrary {
		let mut rhymes = RhymeLibrary::default();
		rhymes.add_group(&["inside", "hide", "ride", "guide"]);
		rhymes.add_group(&["tonight", "alright", "tight", "right"]);
		rhymes
	}

	#[test]
	fn aabb_pairs_rhyme() {
		let models = LyricsModels::train(&corpus(), Sentinels::default()).unwrap();
		let rhymes = rhymes();
		let config = GenerationConfig { desired_length: 5, ..GenerationConfig::default() };
		let composer = StanzaComposer::new(&models, &rhymes, &config);
		let mut rng = StdRng::seed_from_u64(21);
		let mut rhymed = 0;
		for _ in 0..20 {
			let stanza = composer.compose(&RhymeScheme::aabb(), &mut rng).unwrap();
			assert_eq!(stanza.len(), 4);
			for (a, b) in [(0, 1), (2, 3)] {
				let first = stanza[a].last().unwrap();
				let second = stanza[b].last().unwrap();
				// A rhymable first line always gets its rhyme in this corpus.
				if rhymes.rhymes_of(first).iter().any(|r| models.line_endings().contains(r)) {
					assert!(rhymes.rhymes_with(first, second), "{stanza:?}");
				}
				if rhymes.rhymes_with(first, second) {
					rhymed += 1;
				}
			}
		}
		// At least a quarter of the 40 pairs.
		assert!(rhymed >= 10, "{rhymed}");
	}

	#[test]
	fn falls_back_when_nothing_rhymes() {
		let models = LyricsModels::train(&corpus(), Sentinels::default()).unwrap();
		let rhymes = RhymeLibrary::default();
		let config = GenerationConfig::default();
		let composer = StanzaComposer::new(&models, &rhymes, &config);
		let mut rng = StdRng::seed_from_u64(5);
		let stanza = composer.compose(&RhymeScheme::abab(), &mut rng).unwrap();
		assert_eq!(stanza.len(), 4);
		for line in &stanza {
			assert!(!line.is_empty());
			assert!(line.iter().all(|token| !models.sentinels().is_sentinel(token)));
		}
	}

	#[test]
	fn sparse_corpus_still_yields_a_song() {
		let corpus = Corpus::from_text("hey\nhey");
		let models = LyricsModels::train(&corpus, Sentinels::default()).unwrap();
		let mut rhymes = RhymeLibrary::default();
		rhymes.add_group(&["hey", "day"]);
		let config = GenerationConfig { max_restarts: 3, ..GenerationConfig::default() };
		let composer = StanzaComposer::new(&models, &rhymes, &config);
		let mut rng = StdRng::seed_from_u64(9);
		let song = composer.compose_song(&RhymeScheme::abab(), &RhymeScheme::aabb(), &mut rng).unwrap();
		for stanza in [&song.verse_one, &song.verse_two, &song.chorus] {
			assert_eq!(stanza.len(), 4);
			assert!(stanza.iter().all(|line| line == &vec!["hey".to_string()]));
		}
	}

	#[test]
	fn exhausted_rhymes_still_fill_the_stanza() {
		let corpus = Corpus::from_text("me\nbe\nlet it go now");
		let models = LyricsModels::train(&corpus, Sentinels::default()).unwrap();
		let mut rhymes = RhymeLibrary::default();
		rhymes.add_group(&["me", "be"]);
		let config = GenerationConfig { max_restarts: 5, ..GenerationConfig::default() };
		let composer = StanzaComposer::new(&models, &rhymes, &config);
		let mut rng = StdRng::seed_from_u64(6);
		for _ in 0..20 {
			let stanza = composer.compose(&RhymeScheme::aabb(), &mut rng).unwrap();
			assert_eq!(stanza.len(), 4);
			for line in &stanza {
				assert!(!line.is_empty());
				assert!(line.iter().all(|token| !models.sentinels().is_sentinel(token)));
			}
		}
	}

	#[test]
	fn line_answered_by_the_last_line_avoids_weak_rhymes() {
		let corpus = Corpus::from_text(
			"take my hand\n\
			 you and me and\n\
			 take my stand\n\
			 under the sky we own the land",
		);
		let models = LyricsModels::train(&corpus, Sentinels::default()).unwrap();
		let mut rhymes = RhymeLibrary::default();
		rhymes.insert("hand", ["and"]);
		rhymes.insert("stand", ["land"]);
		rhymes.insert("land", ["stand"]);
		let config = GenerationConfig { desired_length: 4, ..GenerationConfig::default() };
		let composer = StanzaComposer::new(&models, &rhymes, &config);
		let mut rng = StdRng::seed_from_u64(12);
		for _ in 0..20 {
			let stanza = composer.compose(&RhymeScheme::abab(), &mut rng).unwrap();
			// Line 2 sets up the rhyme of the last line. "hand" can only be
			// answered by the weak "and", so "stand" replaces it.
			assert_ne!(stanza[1].last().map(String::as_str), Some("hand"), "{stanza:?}");
		}
	}
}
