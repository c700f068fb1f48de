use serde::{Deserialize, Serialize};

/// Which weighting formula the IDF table uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdfVariant {
    /// `log2(N / (1 + df))`
    #[default]
    Standard,
    /// `log2(1 + N / (1 + df))`, stays positive on tiny corpora
    Smoothed,
}

/// Knobs for building an index generation and ranking against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Terms in fewer documents than this are dropped.
    pub min_df: u32,
    /// Terms in a larger share of documents than this are dropped.
    pub max_df_ratio: f64,
    pub idf_variant: IdfVariant,
    /// Playlists considered when aggregating tracks.
    pub top_playlists: usize,
    /// Tracks returned from aggregation.
    pub top_tracks: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { min_df: 2, max_df_ratio: 0.2, idf_variant: IdfVariant::Standard, top_playlists: 50, top_tracks: 15 }
    }
}
