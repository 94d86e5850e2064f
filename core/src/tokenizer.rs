use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::{IndexError, Result};

lazy_static! {
    static ref RE: Regex = Regex::new(r"\S+").expect("valid regex");
}

/// Tokenize text into (term, position) pairs. Terms are maximal runs of non-whitespace,
/// positions are 1-based.
pub fn tokenize(text: &str) -> Vec<(String, u32)> {
    RE.find_iter(text)
        .zip(1u32..)
        .map(|(mat, pos)| (mat.as_str().to_string(), pos))
        .collect()
}

/// Splits corpus text and query strings the same way, so both sides of a lookup agree on terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    /// Apply NFKC normalization and lowercasing before splitting.
    pub normalize: bool,
}

impl Tokenizer {
    pub fn new(normalize: bool) -> Self {
        Self { normalize }
    }

    pub fn tokenize(&self, text: &str) -> Vec<(String, u32)> {
        if self.normalize {
            let normalized = text.nfkc().collect::<String>().to_lowercase();
            tokenize(&normalized)
        } else {
            tokenize(text)
        }
    }

    /// Terms only, in order. Used for phrase and multi-term queries.
    pub fn terms(&self, text: &str) -> Vec<String> {
        self.tokenize(text).into_iter().map(|(t, _)| t).collect()
    }

    /// The single term in `text`. Fails with `InvalidArgument` when `text` holds no term or more than one.
    pub fn single_term(&self, text: &str) -> Result<String> {
        let mut terms = self.terms(text);
        if terms.len() != 1 {
            return Err(IndexError::InvalidArgument(format!(
                "expected exactly one term, got {} in {text:?}",
                terms.len()
            )));
        }
        Ok(terms.remove(0))
    }
}
