use crate::idf::IdfTable;
use crate::index::{DocId, InvertedIndex};
use crate::norms::DocNorms;
use crate::tokenizer::tokenize;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f64,
}

/// Term counts of a query, restricted to terms the IDF table weighs. Kept
/// ordered so float sums come out bit-identical on every run.
fn query_counts(query: &str, idf: &IdfTable) -> BTreeMap<String, u32> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for term in tokenize(query) {
        if idf.contains(&term) {
            *counts.entry(term).or_insert(0) += 1;
        }
    }
    counts
}

/// Cosine similarity of `query` against every document sharing a weighted
/// term with it. Sorted by descending score, ties by ascending `doc_id`.
/// Documents scoring zero are left out.
pub fn score_query(query: &str, index: &InvertedIndex, idf: &IdfTable, norms: &DocNorms) -> Vec<ScoredDoc> {
    let counts = query_counts(query, idf);
    if counts.is_empty() {
        return Vec::new();
    }

    let mut q_norm = 0.0f64;
    let mut dots: HashMap<DocId, f64> = HashMap::new();
    for (term, &q_count) in &counts {
        let Some(w) = idf.get(term) else { continue };
        let q_w = q_count as f64 * w;
        q_norm += q_w * q_w;
        for p in index.get(term) {
            *dots.entry(p.doc_id).or_insert(0.0) += p.count as f64 * w * q_w;
        }
    }
    let q_norm = q_norm.sqrt();

    let mut scored: Vec<ScoredDoc> = dots
        .into_iter()
        .filter(|(_, dot)| *dot != 0.0)
        .map(|(doc_id, dot)| ScoredDoc { doc_id, score: cosine(dot, q_norm, norms.get(doc_id)) })
        .filter(|s| s.score != 0.0)
        .collect();
    sort_scored(&mut scored);
    scored
}

fn cosine(dot: f64, q_norm: f64, d_norm: f64) -> f64 {
    let denom = q_norm * d_norm;
    if denom == 0.0 {
        return 0.0;
    }
    let sim = dot / denom;
    if sim.is_finite() { sim } else { 0.0 }
}

pub(crate) fn sort_scored(scored: &mut [ScoredDoc]) {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.doc_id.cmp(&b.doc_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IdfVariant, SearchConfig};
    use crate::idf::{compute_idf, prune_index};
    use crate::index::doc;

    fn build(names: &[&str], cfg: &SearchConfig) -> (InvertedIndex, IdfTable, DocNorms) {
        let mut idx = InvertedIndex::new();
        for (i, name) in names.iter().enumerate() {
            idx.add_document(&doc(i as u32, name));
        }
        let idf = compute_idf(&idx, cfg);
        prune_index(&mut idx, &idf);
        let norms = DocNorms::compute(&idx, &idf);
        (idx, idf, norms)
    }

    fn loose() -> SearchConfig {
        SearchConfig { min_df: 1, max_df_ratio: 1.0, idf_variant: IdfVariant::Smoothed, ..SearchConfig::default() }
    }

    #[test]
    fn matching_docs_only() {
        let (idx, idf, norms) = build(&["running shoes", "running gear", "hiking boots"], &loose());
        let hits = score_query("running", &idx, &idf, &norms);
        let ids: Vec<DocId> = hits.iter().map(|h| h.doc_id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&0) && ids.contains(&1));
        assert!(hits.iter().all(|h| h.score > 0.0));
    }

    #[test]
    fn equal_scores_break_by_doc_id() {
        let (idx, idf, norms) = build(&["jazz", "rock", "jazz", "jazz"], &loose());
        let hits = score_query("jazz", &idx, &idf, &norms);
        let ids: Vec<DocId> = hits.iter().map(|h| h.doc_id).collect();
        assert_eq!(ids, vec![0, 2, 3]);
        assert!((hits[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn shorter_match_ranks_higher() {
        let (idx, idf, norms) = build(&["jazz soul funk", "jazz", "rock"], &loose());
        let hits = score_query("jazz", &idx, &idf, &norms);
        assert_eq!(hits[0].doc_id, 1);
        assert_eq!(hits[1].doc_id, 0);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn empty_and_unknown_queries() {
        let (idx, idf, norms) = build(&["jazz", "rock"], &loose());
        assert!(score_query("", &idx, &idf, &norms).is_empty());
        assert!(score_query("   ?! 42", &idx, &idf, &norms).is_empty());
        assert!(score_query("polka", &idx, &idf, &norms).is_empty());
    }

    #[test]
    fn zero_norm_guard() {
        assert_eq!(cosine(1.0, 0.0, 2.0), 0.0);
        assert_eq!(cosine(1.0, 2.0, 0.0), 0.0);
        assert!((cosine(2.0, 1.0, 2.0) - 1.0).abs() < 1e-12);
    }
}
