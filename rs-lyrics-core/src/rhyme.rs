use std::path::Path;

use log::{info, warn};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::corpus::Token;
use crate::error::Result;
use crate::io::{build_output_path, get_filename, read_file};

/// Read-only source of rhymes, perfect and slant alike.
///
/// Lookups are treated as cheap and pure. Unknown words have no rhyme:
/// that is an empty set, not an error.
pub trait RhymeLookup: Send + Sync {
	fn rhymes_of(&self, word: &str) -> FxHashSet<Token>;

	/// Whether `other` is one of the rhymes of `word`.
	fn rhymes_with(&self, word: &str, other: &str) -> bool {
		self.rhymes_of(word).contains(other)
	}
}

/// Precomputed `word -> rhymes` table.
///
/// The text form holds one entry per line, `word: rhyme rhyme ...`.
/// Blank lines and `#` comments are ignored.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct RhymeLibrary {
	rhymes: FxHashMap<Token, FxHashSet<Token>>,
}

impl RhymeLibrary {
	/// Loads a rhyme library from its text file.
	///
	/// - If `<stem>.bin` exists beside the file, it is decoded with postcard.
	/// - Otherwise the text file is parsed and the `.bin` cache is written.
	///
	/// # Errors
	/// Returns an error on I/O failure or on a corrupt cache.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let binary_path = build_output_path(path, "bin")?;
		let library = if binary_path.exists() {
			let bytes = std::fs::read(&binary_path)?;
			postcard::from_bytes(&bytes)?
		} else {
			let library = Self::parse(&read_file(path)?.join("\n"));
			std::fs::write(&binary_path, postcard::to_stdvec(&library)?)?;
			library
		};
		info!("rhyme library '{}': {} words", get_filename(path)?, library.len());
		Ok(library)
	}

	/// Parses the text form. Malformed lines are skipped.
	pub fn parse(text: &str) -> Self {
		let mut library = Self::default();
		for (number, line) in text.lines().enumerate() {
			let line = line.trim();
			if line.is_empty() || line.starts_with('#') {
				continue;
			}
			match line.split_once(':') {
				Some((word, rhymes)) if !word.trim().is_empty() => {
					library.insert(word.trim(), rhymes.split_whitespace());
				}
				_ => warn!("rhyme library line {}: expected 'word: rhymes...', got '{}'", number + 1, line),
			}
		}
		library
	}

	/// Adds `rhymes` to the rhymes of `word`. Words are lowercased.
	pub fn insert<I, S>(&mut self, word: &str, rhymes: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let entry = self.rhymes.entry(word.to_lowercase()).or_default();
		entry.extend(rhymes.into_iter().map(|rhyme| rhyme.as_ref().to_lowercase()));
	}

	/// Makes every word of `words` rhyme with every other one.
	pub fn add_group<S: AsRef<str>>(&mut self, words: &[S]) {
		for word in words {
			let others = words.iter().map(AsRef::as_ref).filter(|other| *other != word.as_ref());
			self.insert(word.as_ref(), others);
		}
	}

	/// Number of words with an entry.
	pub fn len(&self) -> usize {
		self.rhymes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rhymes.is_empty()
	}
}

impl RhymeLookup for RhymeLibrary {
	fn rhymes_of(&self, word: &str) -> FxHashSet<Token> {
		self.rhymes.get(word).cloned().unwrap_or_default()
	}

	fn rhymes_with(&self, word: &str, other: &str) -> bool {
		self.rhymes.get(word).is_some_and(|rhymes| rhymes.contains(other))
	}
}
