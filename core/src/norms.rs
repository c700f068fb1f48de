use crate::idf::IdfTable;
use crate::index::{DocId, InvertedIndex};
use serde::{Deserialize, Serialize};

/// Per-document vector length under the IDF weighting, addressed by `DocId`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocNorms {
    norms: Vec<f64>,
}

impl DocNorms {
    /// Each occurrence of a weighted term adds `idf^2` to its document, so a
    /// term seen `k` times contributes `k * idf^2` before the square root.
    pub fn compute(index: &InvertedIndex, idf: &IdfTable) -> Self {
        let mut norms = vec![0.0f64; index.num_docs as usize];
        for (term, postings) in &index.postings {
            let Some(w) = idf.get(term) else { continue };
            let w2 = w * w;
            for p in postings {
                norms[p.doc_id as usize] += p.count as f64 * w2;
            }
        }
        for n in norms.iter_mut() {
            *n = n.sqrt();
        }
        Self { norms }
    }

    /// Zero for documents without weighted terms or ids outside the generation.
    pub fn get(&self, doc_id: DocId) -> f64 {
        self.norms.get(doc_id as usize).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize { self.norms.len() }

    pub fn is_empty(&self) -> bool { self.norms.is_empty() }

    pub fn as_slice(&self) -> &[f64] { &self.norms }
}
