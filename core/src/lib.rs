pub mod config;
pub mod corpus;
pub mod error;
pub mod generation;
pub mod idf;
pub mod index;
pub mod norms;
pub mod persist;
pub mod ranker;
pub mod scorer;
pub mod tokenizer;

pub use config::{IdfVariant, SearchConfig};
pub use error::SearchError;
pub use generation::{IndexGeneration, IndexHandle};
pub use idf::IdfTable;
pub use index::{DocId, Document, InvertedIndex, Posting, Track};
pub use norms::DocNorms;
pub use ranker::TrackScore;
pub use scorer::ScoredDoc;
