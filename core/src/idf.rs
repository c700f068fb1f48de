use crate::config::{IdfVariant, SearchConfig};
use crate::index::InvertedIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Term weights for every term that survived the document-frequency filter.
/// Terms that are absent weigh nothing.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdfTable {
    weights: HashMap<String, f64>,
}

impl IdfTable {
    pub fn get(&self, term: &str) -> Option<f64> {
        self.weights.get(term).copied()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.weights.contains_key(term)
    }

    pub fn len(&self) -> usize { self.weights.len() }

    pub fn is_empty(&self) -> bool { self.weights.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(t, w)| (t.as_str(), *w))
    }
}

pub fn idf_weight(num_docs: u32, df: u32, variant: IdfVariant) -> f64 {
    let ratio = num_docs as f64 / (1.0 + df as f64);
    match variant {
        IdfVariant::Standard => ratio.log2(),
        IdfVariant::Smoothed => (1.0 + ratio).log2(),
    }
}

/// Weigh every term with `min_df <= df` and `df / N <= max_df_ratio`.
/// A term in every document would weigh `log2(N / (N + 1)) < 0`; it is
/// dropped so weights stay non-negative.
pub fn compute_idf(index: &InvertedIndex, config: &SearchConfig) -> IdfTable {
    let n = index.num_docs;
    let mut weights = HashMap::new();
    if n == 0 {
        return IdfTable { weights };
    }
    for (term, postings) in &index.postings {
        let df = postings.len() as u32;
        if df < config.min_df || df as f64 / n as f64 > config.max_df_ratio {
            continue;
        }
        let w = idf_weight(n, df, config.idf_variant);
        if w >= 0.0 {
            weights.insert(term.clone(), w);
        }
    }
    tracing::debug!(num_docs = n, kept = weights.len(), total = index.num_terms(), "computed idf");
    IdfTable { weights }
}

/// Remove from the index every term the table does not weigh.
pub fn prune_index(index: &mut InvertedIndex, idf: &IdfTable) {
    index.retain_terms(|term| idf.contains(term));
}
