//! Positional queries over a built [`InvertedIndex`].
//!
//! Every result list is explicitly sorted before it is returned; nothing depends on the
//! iteration order of the term map.

use std::collections::{BTreeSet, HashSet};

use crate::error::{IndexError, Result};
use crate::index::{DocId, InvertedIndex, Posting, GROUP_DELIMITER};

impl InvertedIndex {
    /// Number of occurrences of `term` in document `doc_id`; 0 for unknown terms or documents.
    pub fn term_frequency(&self, term: &str, doc_id: DocId) -> usize {
        let postings = self.postings(term);
        match postings.binary_search_by_key(&doc_id, |p| p.doc_id) {
            Ok(i) => postings[i].frequency(),
            Err(_) => 0,
        }
    }

    /// Display names of documents containing any of `terms`, one entry per (term, document)
    /// hit. Not deduplicated: a document matching two terms appears twice.
    pub fn search_any<I, S>(&self, terms: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: HashSet<String> = terms.into_iter().map(|t| t.as_ref().to_string()).collect();
        let mut hits: Vec<String> = unique
            .iter()
            .flat_map(|term| self.postings(term))
            .map(|p| self.display_name(p.doc_id).to_string())
            .collect();
        hits.sort();
        hits
    }

    /// Display names of documents containing `phrase` as a contiguous run of terms,
    /// deduplicated and sorted. Empty if any phrase term is unknown.
    pub fn search_phrase<S: AsRef<str>>(&self, phrase: &[S]) -> Result<Vec<String>> {
        let Some((head, rest)) = phrase.split_first() else {
            return Err(IndexError::InvalidArgument("phrase must contain at least one term".into()));
        };
        if let Some(missing) = phrase.iter().find(|t| !self.contains_term(t.as_ref())) {
            tracing::debug!(term = missing.as_ref(), "phrase term not indexed");
            return Ok(Vec::new());
        }

        let first = self.postings(head.as_ref());
        let lists: Vec<&[Posting]> = rest.iter().map(|t| self.postings(t.as_ref())).collect();
        // One forward-only cursor per following term; documents are visited in ascending id order.
        let mut cursors = vec![0usize; lists.len()];
        let mut matches = BTreeSet::new();

        'docs: for anchor in first {
            let mut same_doc: Vec<&Posting> = Vec::with_capacity(lists.len());
            for (list, cursor) in lists.iter().zip(cursors.iter_mut()) {
                while *cursor < list.len() && list[*cursor].doc_id < anchor.doc_id {
                    *cursor += 1;
                }
                match list.get(*cursor) {
                    Some(p) if p.doc_id == anchor.doc_id => same_doc.push(p),
                    Some(_) => continue 'docs,
                    // This term has no postings left, so no later document can match either.
                    None => break 'docs,
                }
            }
            if chain_starts(anchor, &same_doc).next().is_some() {
                matches.insert(self.display_name(anchor.doc_id));
            }
        }
        Ok(matches.into_iter().map(str::to_string).collect())
    }

    /// Groups whose documents contain `term`, deduplicated and sorted.
    pub fn search_group(&self, term: &str) -> Result<Vec<String>> {
        let mut groups = BTreeSet::new();
        for p in self.postings(term) {
            let name = self.display_name(p.doc_id);
            let (group, _) = name
                .split_once(GROUP_DELIMITER)
                .ok_or_else(|| IndexError::MalformedDisplayName(name.to_string()))?;
            groups.insert(group);
        }
        Ok(groups.into_iter().map(str::to_string).collect())
    }

    /// Display names, sorted, of documents where at least one of `candidates` occurs strictly
    /// more often than `baseline`.
    pub fn documents_where_more_frequent<S: AsRef<str>>(&self, candidates: &[S], baseline: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .documents()
            .iter()
            .filter(|doc| {
                let base = self.term_frequency(baseline, doc.id);
                candidates.iter().any(|c| self.term_frequency(c.as_ref(), doc.id) > base)
            })
            .map(|doc| doc.display_name.clone())
            .collect();
        names.sort();
        names
    }

    /// Per document in id order, the frequency of each of `terms`.
    pub fn frequency_series<S: AsRef<str>>(&self, terms: &[S]) -> Vec<(DocId, Vec<usize>)> {
        self.documents()
            .iter()
            .map(|doc| (doc.id, terms.iter().map(|t| self.term_frequency(t.as_ref(), doc.id)).collect()))
            .collect()
    }
}

/// Start positions `s` in `anchor` such that the i-th following posting contains `s + i`.
/// Each candidate keeps its own start; it is never re-anchored on a later term's occurrence.
fn chain_starts<'a>(anchor: &'a Posting, following: &'a [&'a Posting]) -> impl Iterator<Item = u32> + 'a {
    anchor.positions.iter().copied().filter(move |&start| {
        following.iter().zip(1u32..).all(|(p, offset)| p.contains(start + offset))
    })
}
