//! N-gram-based lyric generation library.
//!
//! This crate provides a rhyme-aware lyric generation system including:
//! - Word-level unigram, bigram and trigram models, trained forward and in reverse
//! - Backoff model selection and weighted sampling
//! - Forward line generation with stochastic length control
//! - Backward, rhyme-constrained line generation
//! - Stanza and song assembly over rhyme schemes (`AABB`, `ABAB`, ...)
//!
//! The generation core (`model`) never touches the filesystem. Corpus
//! loading, the rhyme library and rendering are separate modules used by
//! the binaries.

/// Core n-gram models and generation logic.
pub mod model;

/// Crate-wide error type.
pub mod error;

/// Tokenized corpus and the lyric line cleaner.
pub mod corpus;

/// Rhyme lookup contract and its word -> rhymes table implementation.
pub mod rhyme;

/// Text rendering of generated lines and songs.
pub mod render;

/// I/O utilities (file loading, path helpers).
pub mod io;

pub use corpus::{Corpus, Line, Token};
pub use error::{LyricsError, Result};
pub use model::generation_config::GenerationConfig;
pub use model::lyrics_models::LyricsModels;
pub use model::prep::Sentinels;
pub use model::stanza::{RhymeScheme, Song, Stanza, StanzaComposer};
pub use rhyme::{RhymeLibrary, RhymeLookup};
