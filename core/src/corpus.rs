use crate::error::SearchError;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    pub fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawTrack {
    #[serde(alias = "track_name")]
    pub name: String,
    #[serde(default, alias = "artist_name")]
    pub artist: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPlaylist {
    #[serde(alias = "pid")]
    pub id: RawId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tracks: Vec<RawTrack>,
}

pub type RecordResult = Result<RawPlaylist, SearchError>;

/// Load every record under `path`, a single file or a directory walked for
/// `.json` / `.jsonl` files in name order.
///
/// Accepts one record per JSONL line, a JSON array of records, or slice
/// files of the form `{ "playlists": [...] }`. Each record comes back as its
/// own `Result`; a bad line or record never drops its neighbours.
pub fn load_corpus(path: &Path) -> Result<Vec<RecordResult>, SearchError> {
    let files = corpus_files(path)?;
    let mut records = Vec::new();
    let mut readable = 0usize;
    for file in &files {
        match read_file(file) {
            Ok(mut recs) => {
                readable += 1;
                records.append(&mut recs);
            }
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "skipping unreadable corpus file");
                records.push(Err(e));
            }
        }
    }
    if !files.is_empty() && readable == 0 {
        return Err(SearchError::Corpus(format!("no readable files under {}", path.display())));
    }
    tracing::info!(files = files.len(), records = records.len(), "loaded corpus");
    Ok(records)
}

fn corpus_files(path: &Path) -> Result<Vec<PathBuf>, SearchError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(SearchError::Corpus(format!("{} does not exist", path.display())));
    }
    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")))
        .collect();
    files.sort();
    Ok(files)
}

fn read_file(file: &Path) -> Result<Vec<RecordResult>, SearchError> {
    let f = File::open(file)?;
    let reader = BufReader::new(f);
    if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        return Ok(read_jsonl(file, reader));
    }
    let json: serde_json::Value = serde_json::from_reader(reader)
        .map_err(|e| SearchError::Corpus(format!("{}: {e}", file.display())))?;
    Ok(records_from_value(json))
}

/// One record per line. Lines that are not UTF-8 or not valid records become
/// per-line errors. A failed read ends the file but keeps what came before.
fn read_jsonl<R: BufRead>(file: &Path, reader: R) -> Vec<RecordResult> {
    let mut out = Vec::new();
    for (lineno, line) in reader.split(b'\n').enumerate() {
        let malformed = |msg: String| SearchError::MalformedDocument(format!("{}:{}: {msg}", file.display(), lineno + 1));
        let bytes = match line {
            Ok(bytes) => bytes,
            Err(e) => {
                out.push(Err(malformed(e.to_string())));
                break;
            }
        };
        let text = match std::str::from_utf8(&bytes) {
            Ok(text) => text.trim(),
            Err(e) => {
                out.push(Err(malformed(e.to_string())));
                continue;
            }
        };
        if text.is_empty() { continue; }
        out.push(serde_json::from_str::<RawPlaylist>(text).map_err(|e| malformed(e.to_string())));
    }
    out
}

/// Split one parsed JSON document into playlist records.
pub fn records_from_value(json: serde_json::Value) -> Vec<RecordResult> {
    use serde_json::Value;
    let items = match json {
        Value::Array(arr) => arr,
        Value::Object(mut obj) => match obj.remove("playlists") {
            Some(Value::Array(arr)) => arr,
            Some(other) => {
                return vec![Err(SearchError::MalformedDocument(format!("\"playlists\" is not an array: {other}")))];
            }
            None => vec![Value::Object(obj)],
        },
        other => return vec![Err(SearchError::MalformedDocument(format!("unexpected top-level value: {other}")))],
    };
    items
        .into_iter()
        .map(|v| serde_json::from_value::<RawPlaylist>(v).map_err(|e| SearchError::MalformedDocument(e.to_string())))
        .collect()
}
