use serde::Serialize;
use std::collections::HashMap;

use crate::error::{IndexError, Result};
use crate::source::SceneRecord;
use crate::tokenizer::Tokenizer;

/// 1-based rank of a document in source order.
pub type DocId = u32;

/// Separates the group id from the local scene id in a display name, e.g. `hamlet:5.1`.
pub const GROUP_DELIMITER: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub id: DocId,
    pub group_id: String,
    pub display_name: String,
    pub term_count: u32,
}

/// All occurrences of one term within one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Posting {
    pub doc_id: DocId,
    /// Strictly increasing, 1-based token offsets.
    pub positions: Vec<u32>,
}

impl Posting {
    fn new(doc_id: DocId, pos: u32) -> Self {
        Self { doc_id, positions: vec![pos] }
    }

    pub fn frequency(&self) -> usize {
        self.positions.len()
    }

    pub fn contains(&self, pos: u32) -> bool {
        self.positions.binary_search(&pos).is_ok()
    }
}

/// Positional inverted index plus the metadata of the documents it was built from.
///
/// Built once through [`IndexBuilder`] and read-only afterwards; postings for every term are
/// sorted ascending by `doc_id` with at most one posting per document.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<Posting>>,
    docs: Vec<Document>,
}

impl InvertedIndex {
    /// Tokenizes and indexes every record in order. Record `i` becomes document `i + 1`.
    pub fn build<'a, I>(records: I, tokenizer: &Tokenizer) -> Result<Self>
    where
        I: IntoIterator<Item = &'a SceneRecord>,
    {
        let mut builder = IndexBuilder::new();
        for rec in records {
            let tokens = tokenizer.tokenize(&rec.text).into_iter().map(|(t, _)| t);
            builder.add_document(&rec.play_id, &rec.scene_id, tokens)?;
        }
        Ok(builder.finish())
    }

    /// Posting list for `term`, empty for unknown terms.
    pub fn postings(&self, term: &str) -> &[Posting] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.postings.contains_key(term)
    }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        let idx = doc_id.checked_sub(1)? as usize;
        self.docs.get(idx)
    }

    /// Documents in id order.
    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    /// Indexed terms, in no particular order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }

    /// Display name of a document referenced by a posting. Postings only ever reference
    /// documents of the same index.
    pub(crate) fn display_name(&self, doc_id: DocId) -> &str {
        self.document(doc_id).map(|d| d.display_name.as_str()).unwrap_or_default()
    }
}

/// Accumulates documents in stream order. The only way to populate an [`InvertedIndex`].
#[derive(Debug, Default)]
pub struct IndexBuilder {
    postings: HashMap<String, Vec<Posting>>,
    docs: Vec<Document>,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes one document's terms and returns its assigned id. Fails once the corpus holds
    /// `DocId::MAX` documents.
    pub fn add_document<I, S>(&mut self, group_id: &str, display_name: &str, tokens: I) -> Result<DocId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let doc_id = next_doc_id(self.docs.len())?;
        let mut term_count = 0u32;
        for (term, pos) in tokens.into_iter().zip(1u32..) {
            term_count = pos;
            let list = self.postings.entry(term.into()).or_default();
            // Documents arrive in ascending id order, so a posting for this document
            // can only be the last one in the list.
            match list.last_mut() {
                Some(last) if last.doc_id == doc_id => last.positions.push(pos),
                _ => list.push(Posting::new(doc_id, pos)),
            }
        }
        self.docs.push(Document {
            id: doc_id,
            group_id: group_id.to_string(),
            display_name: display_name.to_string(),
            term_count,
        });
        Ok(doc_id)
    }

    pub fn finish(self) -> InvertedIndex {
        tracing::info!(num_docs = self.docs.len(), num_terms = self.postings.len(), "built inverted index");
        InvertedIndex { postings: self.postings, docs: self.docs }
    }
}

/// Id of the document that follows `existing` documents.
fn next_doc_id(existing: usize) -> Result<DocId> {
    DocId::try_from(existing)
        .ok()
        .and_then(|n| n.checked_add(1))
        .ok_or_else(|| IndexError::InvalidArgument(format!("corpus exceeds {} documents", DocId::MAX)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InvertedIndex {
        let mut b = IndexBuilder::new();
        b.add_document("A", "A:1", "the quick fox the".split_whitespace()).unwrap();
        b.add_document("A", "A:2", "quick brown fox".split_whitespace()).unwrap();
        b.finish()
    }

    #[test]
    fn assigns_contiguous_ids() {
        let idx = sample();
        assert_eq!(idx.num_docs(), 2);
        assert_eq!(idx.document(1).unwrap().display_name, "A:1");
        assert_eq!(idx.document(2).unwrap().term_count, 3);
        assert!(idx.document(0).is_none());
        assert!(idx.document(3).is_none());
    }

    #[test]
    fn records_positions_per_document() {
        let idx = sample();
        assert_eq!(
            idx.postings("quick"),
            &[
                Posting { doc_id: 1, positions: vec![2] },
                Posting { doc_id: 2, positions: vec![1] },
            ]
        );
        assert_eq!(idx.postings("the"), &[Posting { doc_id: 1, positions: vec![1, 4] }]);
        assert!(idx.postings("absent").is_empty());
    }

    #[test]
    fn empty_document_contributes_no_postings() {
        let mut b = IndexBuilder::new();
        b.add_document("A", "A:1", Vec::<String>::new()).unwrap();
        let id = b.add_document("A", "A:2", vec!["word"]).unwrap();
        let idx = b.finish();
        assert_eq!(id, 2);
        assert_eq!(idx.num_terms(), 1);
        assert_eq!(idx.document(1).unwrap().term_count, 0);
        assert_eq!(idx.postings("word")[0].doc_id, 2);
    }

    #[test]
    fn doc_ids_stop_at_u32_max() {
        assert_eq!(next_doc_id(0).unwrap(), 1);
        assert_eq!(next_doc_id(DocId::MAX as usize - 1).unwrap(), DocId::MAX);
        assert!(matches!(next_doc_id(DocId::MAX as usize), Err(IndexError::InvalidArgument(_))));
        assert!(matches!(next_doc_id(usize::MAX), Err(IndexError::InvalidArgument(_))));
    }

    #[test]
    fn builds_from_records() {
        let recs = vec![
            SceneRecord::new("hamlet", "hamlet:5.1", "Alas poor Yorick"),
            SceneRecord::new("lear", "lear:1.1", "goneril"),
        ];
        let idx = InvertedIndex::build(&recs, &Tokenizer::new(true)).unwrap();
        assert_eq!(idx.postings("yorick")[0].positions, vec![3]);
        assert_eq!(idx.document(2).unwrap().group_id, "lear");
    }
}
