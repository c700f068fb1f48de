use crate::index::{DocId, Document};
use crate::scorer::ScoredDoc;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackScore {
    pub name: String,
    pub score: f64,
}

/// Fold the best `top_playlists` documents into per-track scores.
///
/// Every occurrence of a track adds its playlist's score once, so a track
/// listed twice in one playlist counts twice. Documents the lookup cannot
/// resolve are logged and skipped. Returns at most `top_tracks` entries,
/// highest first, ties by ascending name.
pub fn aggregate_tracks<'a, F>(scored: &[ScoredDoc], lookup: F, top_playlists: usize, top_tracks: usize) -> Vec<TrackScore>
where
    F: Fn(DocId) -> Option<&'a Document>,
{
    let mut acc: HashMap<&str, f64> = HashMap::new();
    for hit in scored.iter().take(top_playlists) {
        let Some(doc) = lookup(hit.doc_id) else {
            tracing::warn!(doc_id = hit.doc_id, "scored document missing from store, skipping");
            continue;
        };
        for track in &doc.tracks {
            *acc.entry(track.name.as_str()).or_insert(0.0) += hit.score;
        }
    }

    let mut ranked: Vec<TrackScore> = acc
        .into_iter()
        .map(|(name, score)| TrackScore { name: name.to_string(), score })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.truncate(top_tracks);
    ranked
}
