//! Top-level module for the lyric generation system.
//!
//! This module provides a rhyme-aware n-gram lyric generator, including:
//! - Sentinel wrapping of corpus lines (`TokenCorpusPrep`)
//! - Unigram, bigram and trigram models behind one trait (`NGramIndex`)
//! - Weighted sampling and backoff model selection
//! - Forward line generation (`LineGenerator`)
//! - Backward rhyme-constrained generation (`RhymeLineGenerator`)
//! - Stanza and song assembly over a rhyme scheme (`StanzaComposer`)

/// Sentinels, generation direction and corpus preparation for training.
pub mod prep;

/// Insertion-ordered candidate table for one context.
///
/// Tracks outgoing transitions and their occurrence counts.
pub mod state;

/// The `NGramIndex` trait shared by every model order.
pub mod ngram_model;

/// Context-free global frequencies; the last resort of every backoff chain.
pub mod unigram_model;

/// Order-2 model keyed by one token of context.
pub mod bigram_model;

/// Order-3 model keyed by two tokens of context.
pub mod trigram_model;

/// Weighted random choice over candidates.
pub mod sampler;

/// Backoff across a chain of models sorted by descending order.
pub mod selector;

/// A line under construction, growing forward or backward.
pub mod sentence;

/// Generation parameters: length control, retry bounds and seed.
pub mod generation_config;

/// Forward and reverse backoff chains trained on one corpus.
pub mod lyrics_models;

/// Forward line generation with length control and restarts.
pub mod line_generator;

/// Backward line generation ending on a rhyme.
pub mod rhyme_generator;

/// Rhyme schemes, stanzas and songs.
pub mod stanza;
