use crate::{DocNorms, Document, IdfTable, IndexGeneration, InvertedIndex, SearchConfig};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: u32,
    pub created_at: String,
    pub version: u32,
    pub config: SearchConfig,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn docs(&self) -> PathBuf { self.root.join("docs.bin") }
    fn postings(&self) -> PathBuf { self.root.join("postings.bin") }
    fn idf(&self) -> PathBuf { self.root.join("idf.bin") }
    fn norms(&self) -> PathBuf { self.root.join("norms.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

fn save_bin<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut f = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut f, value)?;
    f.flush()?;
    Ok(())
}

fn load_bin<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let value = bincode::deserialize_from(BufReader::new(f))
        .with_context(|| format!("decoding {}", path.display()))?;
    Ok(value)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta()).with_context(|| format!("opening {}", paths.meta().display()))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Write every part of a generation under `paths.root`.
pub fn save_generation(paths: &IndexPaths, generation: &IndexGeneration) -> Result<()> {
    create_dir_all(&paths.root)?;
    save_bin(&paths.docs(), &generation.documents())?;
    save_bin(&paths.postings(), generation.index())?;
    save_bin(&paths.idf(), generation.idf())?;
    save_bin(&paths.norms(), generation.norms())?;
    let meta = MetaFile {
        num_docs: generation.num_docs(),
        num_terms: generation.idf().len() as u32,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default(),
        version: FORMAT_VERSION,
        config: generation.config().clone(),
    };
    save_meta(paths, &meta)?;
    tracing::info!(root = %paths.root.display(), num_docs = meta.num_docs, "saved index");
    Ok(())
}

/// Load a generation written by [`save_generation`].
pub fn load_generation(paths: &IndexPaths) -> Result<IndexGeneration> {
    let meta = load_meta(paths)?;
    if meta.version != FORMAT_VERSION {
        anyhow::bail!("unsupported index version {} (expected {FORMAT_VERSION})", meta.version);
    }
    let docs: Vec<Document> = load_bin(&paths.docs())?;
    let index: InvertedIndex = load_bin(&paths.postings())?;
    let idf: IdfTable = load_bin(&paths.idf())?;
    let norms: DocNorms = load_bin(&paths.norms())?;
    if docs.len() != meta.num_docs as usize {
        anyhow::bail!("meta.json lists {} docs but docs.bin holds {}", meta.num_docs, docs.len());
    }
    let generation = IndexGeneration::from_parts(meta.config, docs, index, idf, norms)?;
    tracing::info!(root = %paths.root.display(), num_docs = generation.num_docs(), "loaded index");
    Ok(generation)
}
