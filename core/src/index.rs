use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type DocId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub artist: Option<String>,
}

/// One playlist as it lives inside an index generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: DocId,
    pub external_id: String,
    pub name: String,
    pub description: Option<String>,
    pub tracks: Vec<Track>,
}

impl Document {
    /// Fields that feed the inverted index.
    pub fn indexed_text(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.description.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub count: u32, // occurrences of the term in this document
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct InvertedIndex {
    pub postings: HashMap<String, Vec<Posting>>, // postings sorted by doc_id
    pub num_docs: u32,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Index a document. Ids must be handed out in increasing order so that
    /// posting lists stay sorted without a final sort pass.
    pub fn add_document(&mut self, doc: &Document) {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for field in doc.indexed_text() {
            for term in tokenize(field) {
                *counts.entry(term).or_insert(0) += 1;
            }
        }
        for (term, count) in counts {
            self.postings.entry(term).or_default().push(Posting { doc_id: doc.doc_id, count });
        }
        self.num_docs += 1;
    }

    /// Document frequency of a term.
    pub fn df(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, Vec::len)
    }

    pub fn get(&self, term: &str) -> &[Posting] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drop every term the predicate rejects.
    pub fn retain_terms<F: FnMut(&str) -> bool>(&mut self, mut keep: F) {
        self.postings.retain(|term, _| keep(term));
    }

    pub fn num_terms(&self) -> usize { self.postings.len() }
}

#[cfg(test)]
pub(crate) fn doc(doc_id: DocId, name: &str) -> Document {
    Document { doc_id, external_id: format!("p{doc_id}"), name: name.to_string(), description: None, tracks: Vec::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_terms_are_counted() {
        let mut idx = InvertedIndex::new();
        idx.add_document(&doc(0, "rock rock rock mix"));
        assert_eq!(idx.num_docs, 1);
        assert_eq!(idx.get("rock"), &[Posting { doc_id: 0, count: 3 }]);
        assert_eq!(idx.get("mix"), &[Posting { doc_id: 0, count: 1 }]);
    }

    #[test]
    fn description_is_indexed() {
        let mut idx = InvertedIndex::new();
        let mut d = doc(0, "Workout");
        d.description = Some("gym beats".into());
        idx.add_document(&d);
        assert_eq!(idx.df("gym"), 1);
        assert_eq!(idx.df("workout"), 1);
    }

    #[test]
    fn postings_are_sorted_by_doc() {
        let mut idx = InvertedIndex::new();
        for i in 0..4 {
            idx.add_document(&doc(i, "road trip"));
        }
        let ids: Vec<DocId> = idx.get("road").iter().map(|p| p.doc_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(idx.df("trip"), 4);
    }
}
