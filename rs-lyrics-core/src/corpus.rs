use std::path::Path;
use std::sync::mpsc;
use std::thread;

use log::info;
use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::io::{list_files, read_file};

/// An opaque word (or sentinel) string.
pub type Token = String;

/// Ordered tokens of one lyric line.
pub type Line = Vec<Token>;

/// Characters removed from lyric lines before tokenization.
const PUNCTUATION: &[char] = &[',', '.', ';', ':', '!', '*', '?', '\\', '/', '(', ')', '\'', '"', '-', '_'];

/// Ordered lyric lines, already normalized (lowercase, no punctuation).
///
/// The corpus is what the models are trained on. It carries no sentinel:
/// those are added to copies at training time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Corpus {
	lines: Vec<Line>,
}

impl Corpus {
	/// Builds a corpus from already tokenized lines, kept as given.
	pub fn from_lines<I, L, T>(lines: I) -> Self
	where
		I: IntoIterator<Item = L>,
		L: IntoIterator<Item = T>,
		T: AsRef<str>,
	{
		let lines = lines
			.into_iter()
			.map(|line| line.into_iter().map(|token| token.as_ref().to_owned()).collect())
			.collect();
		Self { lines }
	}

	/// Builds a corpus from raw text, one lyric line per text line.
	///
	/// Every line goes through `clean_line`; lines left empty are dropped.
	pub fn from_text(text: &str) -> Self {
		Self { lines: text.lines().map(clean_line).filter(|line| !line.is_empty()).collect() }
	}

	/// Loads every file of `dir` (one song per file), in file-name order.
	///
	/// Files are read sequentially, then their lines are cleaned in chunks on
	/// worker threads. Chunks are reassembled in their original order, so
	/// the resulting corpus does not depend on thread scheduling.
	///
	/// # Errors
	/// Returns an error if the directory or one of its files cannot be read.
	pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
		let dir = dir.as_ref();
		let mut raw = Vec::new();
		for file in list_files(dir, None)? {
			raw.extend(read_file(dir.join(&file))?);
		}

		let corpus = Self { lines: Self::clean_parallel(raw) };
		info!(
			"loaded {} lines ({} distinct words) from {}",
			corpus.len(),
			corpus.vocabulary_size(),
			dir.display()
		);
		Ok(corpus)
	}

	fn clean_parallel(raw: Vec<String>) -> Vec<Line> {
		if raw.is_empty() {
			return Vec::new();
		}
		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = raw.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		let mut spawned = 0;
		for (index, chunk) in raw.chunks(chunk_size).enumerate() {
			let tx = tx.clone();
			let chunk: Vec<String> = chunk.to_vec();
			spawned += 1;

			thread::spawn(move || {
				let cleaned: Vec<Line> = chunk
					.iter()
					.map(|line| clean_line(line))
					.filter(|line| !line.is_empty())
					.collect();
				// The receiver outlives every worker.
				let _ = tx.send((index, cleaned));
			});
		}
		drop(tx);

		let mut parts: Vec<(usize, Vec<Line>)> = rx.iter().collect();
		if parts.len() != spawned {
			// A worker panicked: fall back to cleaning on this thread.
			return raw.iter().map(|line| clean_line(line)).filter(|line| !line.is_empty()).collect();
		}
		parts.sort_by_key(|(index, _)| *index);
		parts.into_iter().flat_map(|(_, lines)| lines).collect()
	}

	pub fn lines(&self) -> &[Line] {
		&self.lines
	}

	/// Number of lines.
	pub fn len(&self) -> usize {
		self.lines.len()
	}

	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}

	/// Total number of tokens over all lines.
	pub fn token_count(&self) -> usize {
		self.lines.iter().map(Vec::len).sum()
	}

	/// Number of distinct tokens.
	pub fn vocabulary_size(&self) -> usize {
		self.lines.iter().flatten().collect::<FxHashSet<_>>().len()
	}
}

/// Normalizes one raw lyric line into tokens.
///
/// - Drops bracketed annotations such as `[Chorus]`
/// - Strips punctuation
/// - Lowercases
/// - Splits on whitespace
pub fn clean_line(raw: &str) -> Line {
	let mut text = String::with_capacity(raw.len());
	let mut in_brackets = false;
	for c in raw.chars() {
		match c {
			'[' => in_brackets = true,
			']' => in_brackets = false,
			_ if in_brackets => {}
			c if PUNCTUATION.contains(&c) => {}
			c => text.extend(c.to_lowercase()),
		}
	}
	// An unclosed bracket is not an annotation: keep what followed it.
	if in_brackets {
		return clean_line(&raw.replace('[', " "));
	}
	text.split_whitespace().map(str::to_owned).collect()
}
