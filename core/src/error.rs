use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("index is still building")]
    NotReady,
    #[error("corpus unreadable: {0}")]
    Corpus(String),
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
