use crate::config::SearchConfig;
use crate::corpus::{RawPlaylist, RecordResult};
use crate::error::SearchError;
use crate::idf::{compute_idf, prune_index, IdfTable};
use crate::index::{DocId, Document, InvertedIndex, Track};
use crate::norms::DocNorms;
use crate::ranker::{aggregate_tracks, TrackScore};
use crate::scorer::{score_query, ScoredDoc};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

/// Documents, pruned inverted index, IDF table and norm cache of one build.
/// Never mutated after `build` returns; a reindex produces a new one.
#[derive(Debug, Clone)]
pub struct IndexGeneration {
    config: SearchConfig,
    docs: Vec<Document>,
    index: InvertedIndex,
    idf: IdfTable,
    norms: DocNorms,
}

impl IndexGeneration {
    /// Build a generation in one pass over `records`.
    ///
    /// Records that failed to parse, lack an id, or repeat an id already seen
    /// are logged and skipped. Accepted records get contiguous ids from 0.
    pub fn build<I>(records: I, config: SearchConfig) -> Self
    where
        I: IntoIterator<Item = RecordResult>,
    {
        let mut docs: Vec<Document> = Vec::new();
        let mut index = InvertedIndex::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut skipped = 0usize;

        for record in records {
            let raw = match record {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed playlist");
                    skipped += 1;
                    continue;
                }
            };
            let external_id = raw.id.clone().into_string();
            if external_id.trim().is_empty() {
                tracing::warn!(name = %raw.name, "skipping playlist with an empty id");
                skipped += 1;
                continue;
            }
            if !seen.insert(external_id.clone()) {
                tracing::warn!(%external_id, "skipping duplicate playlist id");
                skipped += 1;
                continue;
            }
            // Ids are only handed out to accepted playlists.
            let doc = to_document(raw, external_id, docs.len() as DocId);
            index.add_document(&doc);
            docs.push(doc);
        }

        let idf = compute_idf(&index, &config);
        prune_index(&mut index, &idf);
        let norms = DocNorms::compute(&index, &idf);
        tracing::info!(num_docs = docs.len(), skipped, num_terms = idf.len(), "built index generation");
        Self { config, docs, index, idf, norms }
    }

    /// Reassemble a generation from persisted parts. Returns an error when
    /// the parts disagree on the number of documents.
    pub fn from_parts(
        config: SearchConfig,
        docs: Vec<Document>,
        index: InvertedIndex,
        idf: IdfTable,
        norms: DocNorms,
    ) -> anyhow::Result<Self> {
        let n = docs.len();
        if index.num_docs as usize != n || norms.len() != n {
            anyhow::bail!(
                "inconsistent index parts: {n} docs, index counts {}, {} norms",
                index.num_docs,
                norms.len()
            );
        }
        if let Some((i, d)) = docs.iter().enumerate().find(|(i, d)| d.doc_id as usize != *i) {
            anyhow::bail!("document at position {i} carries id {}", d.doc_id);
        }
        Ok(Self { config, docs, index, idf, norms })
    }

    /// All matching documents, best first.
    pub fn search(&self, query: &str) -> Vec<ScoredDoc> {
        let hits = score_query(query, &self.index, &self.idf, &self.norms);
        tracing::debug!(query, hits = hits.len(), "scored query");
        hits
    }

    /// Tracks ranked by the summed scores of the best matching playlists.
    pub fn top_tracks(&self, query: &str) -> Vec<TrackScore> {
        self.top_tracks_with(query, self.config.top_playlists, self.config.top_tracks)
    }

    pub fn top_tracks_with(&self, query: &str, top_playlists: usize, top_tracks: usize) -> Vec<TrackScore> {
        let hits = self.search(query);
        aggregate_tracks(&hits, |id| self.document(id), top_playlists, top_tracks)
    }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        self.docs.get(doc_id as usize)
    }

    pub fn documents(&self) -> &[Document] { &self.docs }

    pub fn num_docs(&self) -> u32 { self.docs.len() as u32 }

    pub fn config(&self) -> &SearchConfig { &self.config }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn idf(&self) -> &IdfTable { &self.idf }

    pub fn norms(&self) -> &DocNorms { &self.norms }
}

fn to_document(raw: RawPlaylist, external_id: String, doc_id: DocId) -> Document {
    let tracks = raw
        .tracks
        .into_iter()
        .map(|t| Track { name: t.name, artist: t.artist })
        .collect();
    Document { doc_id, external_id, name: raw.name, description: raw.description, tracks }
}

/// Shared pointer to the active generation. Empty until the first build
/// lands; reads fail with [`SearchError::NotReady`] until then.
#[derive(Debug, Default)]
pub struct IndexHandle {
    active: RwLock<Option<Arc<IndexGeneration>>>,
}

impl IndexHandle {
    pub fn new() -> Self { Self::default() }

    pub fn with_generation(generation: IndexGeneration) -> Self {
        Self { active: RwLock::new(Some(Arc::new(generation))) }
    }

    /// The active generation. The lock is released before this returns, so
    /// callers score without holding it.
    pub fn current(&self) -> Result<Arc<IndexGeneration>, SearchError> {
        self.active.read().clone().ok_or(SearchError::NotReady)
    }

    pub fn is_ready(&self) -> bool {
        self.active.read().is_some()
    }

    /// Install a fully built generation, returning the one it replaced.
    pub fn replace(&self, generation: IndexGeneration) -> Option<Arc<IndexGeneration>> {
        let num_docs = generation.num_docs();
        let prev = self.active.write().replace(Arc::new(generation));
        tracing::info!(num_docs, "swapped index generation");
        prev
    }
}
