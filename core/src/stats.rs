use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::error::{IndexError, Result};
use crate::index::Document;

/// Aggregate length statistics over documents and groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub num_docs: usize,
    /// Mean terms per document, rounded down.
    pub avg_length: u64,
    pub longest_doc: String,
    pub shortest_doc: String,
    /// Every group tied for the largest summed length, sorted.
    pub longest_groups: Vec<String>,
    /// Every group tied for the smallest summed length, sorted.
    pub shortest_groups: Vec<String>,
    pub group_lengths: BTreeMap<String, u64>,
}

impl CorpusStats {
    /// Fails with `PreconditionViolation` on an empty corpus. Ties between documents keep the
    /// first one in stream order; ties between groups report all of them.
    pub fn compute(docs: &[Document]) -> Result<Self> {
        let Some(first) = docs.first() else {
            return Err(IndexError::PreconditionViolation("corpus statistics need at least one document".into()));
        };

        let mut total: u64 = 0;
        let (mut longest, mut shortest) = (first, first);
        let mut group_lengths: HashMap<&str, u64> = HashMap::new();
        for doc in docs {
            total += u64::from(doc.term_count);
            if doc.term_count > longest.term_count {
                longest = doc;
            }
            if doc.term_count < shortest.term_count {
                shortest = doc;
            }
            *group_lengths.entry(doc.group_id.as_str()).or_insert(0) += u64::from(doc.term_count);
        }

        let group_lengths: BTreeMap<String, u64> =
            group_lengths.into_iter().map(|(g, len)| (g.to_string(), len)).collect();
        let max = group_lengths.values().copied().max().unwrap_or_default();
        let min = group_lengths.values().copied().min().unwrap_or_default();
        let with_length = |target: u64| -> Vec<String> {
            group_lengths.iter().filter(|(_, &len)| len == target).map(|(g, _)| g.clone()).collect()
        };

        Ok(Self {
            num_docs: docs.len(),
            avg_length: total / docs.len() as u64,
            longest_doc: longest.display_name.clone(),
            shortest_doc: shortest.display_name.clone(),
            longest_groups: with_length(max),
            shortest_groups: with_length(min),
            group_lengths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: u32, group: &str, len: u32) -> Document {
        Document { id, group_id: group.into(), display_name: format!("{group}:{id}"), term_count: len }
    }

    #[test]
    fn empty_corpus_is_rejected() {
        assert!(matches!(CorpusStats::compute(&[]), Err(IndexError::PreconditionViolation(_))));
    }

    #[test]
    fn extremes_keep_first_tied_document() {
        let docs = vec![doc(1, "A", 5), doc(2, "A", 9), doc(3, "B", 9), doc(4, "B", 2), doc(5, "C", 2)];
        let s = CorpusStats::compute(&docs).unwrap();
        assert_eq!(s.longest_doc, "A:2");
        assert_eq!(s.shortest_doc, "B:4");
        assert_eq!(s.avg_length, 27 / 5);
    }

    #[test]
    fn first_document_seeds_both_extremes() {
        // A corpus of short documents must not report an empty longest name.
        let docs = vec![doc(1, "A", 3), doc(2, "A", 1)];
        let s = CorpusStats::compute(&docs).unwrap();
        assert_eq!(s.longest_doc, "A:1");
        assert_eq!(s.shortest_doc, "A:2");
    }

    #[test]
    fn reports_all_tied_groups() {
        let docs = vec![doc(1, "B", 4), doc(2, "A", 4), doc(3, "C", 1)];
        let s = CorpusStats::compute(&docs).unwrap();
        assert_eq!(s.longest_groups, vec!["A", "B"]);
        assert_eq!(s.shortest_groups, vec!["C"]);
    }

    #[test]
    fn single_group_is_both_longest_and_shortest() {
        let s = CorpusStats::compute(&[doc(1, "A", 2)]).unwrap();
        assert_eq!(s.longest_groups, s.shortest_groups);
        assert_eq!(s.group_lengths.get("A"), Some(&2));
    }
}
