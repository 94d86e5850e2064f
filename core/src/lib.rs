//! Positional inverted index over scenes grouped into plays, with term frequency,
//! disjunctive, phrase and play-level queries plus corpus length statistics.

pub mod error;
pub mod index;
pub mod query;
pub mod source;
pub mod stats;
pub mod tokenizer;

pub use error::{IndexError, Result};
pub use index::{DocId, Document, IndexBuilder, InvertedIndex, Posting, GROUP_DELIMITER};
pub use source::SceneRecord;
pub use stats::CorpusStats;
pub use tokenizer::Tokenizer;
