use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use mixdex_core::corpus::load_corpus;
use mixdex_core::persist::{load_generation, save_generation, IndexPaths};
use mixdex_core::{IdfVariant, IndexGeneration, SearchConfig};
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and query the playlist TF-IDF index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IdfArgs {
    /// Drop terms found in fewer playlists than this
    #[arg(long, default_value_t = 2)]
    min_df: u32,
    /// Drop terms found in a larger share of playlists than this
    #[arg(long, default_value_t = 0.2)]
    max_df_ratio: f64,
    /// Use smoothed IDF = log2(1 + N/(1+df)) instead of log2(N/(1+df))
    #[arg(long, default_value_t = false)]
    smoothed_idf: bool,
}

impl IdfArgs {
    fn config(&self) -> SearchConfig {
        SearchConfig {
            min_df: self.min_df,
            max_df_ratio: self.max_df_ratio,
            idf_variant: if self.smoothed_idf { IdfVariant::Smoothed } else { IdfVariant::Standard },
            ..SearchConfig::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from input JSON/JSONL files or a directory
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long)]
        output: String,
        #[command(flatten)]
        idf: IdfArgs,
    },
    /// Run a query against a built index
    Search {
        /// Index directory
        #[arg(long, default_value = "./index")]
        index: String,
        /// Query text
        #[arg(long)]
        q: String,
        /// Number of results to print
        #[arg(long, default_value_t = 10)]
        k: usize,
        /// Rank tracks aggregated over the matching playlists instead
        #[arg(long, default_value_t = false)]
        tracks: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, idf } => build_index(&input, &output, idf.config()),
        Commands::Search { index, q, k, tracks } => search(&index, &q, k, tracks),
    }
}

fn build_index(input: &str, output: &str, config: SearchConfig) -> Result<()> {
    let records = load_corpus(Path::new(input))?;
    let generation = IndexGeneration::build(records, config);
    save_generation(&IndexPaths::new(output), &generation)?;
    tracing::info!(output, num_docs = generation.num_docs(), "index build complete");
    Ok(())
}

fn search(index: &str, q: &str, k: usize, tracks: bool) -> Result<()> {
    let generation = load_generation(&IndexPaths::new(index))?;
    if tracks {
        let top_playlists = generation.config().top_playlists;
        for (rank, t) in generation.top_tracks_with(q, top_playlists, k).iter().enumerate() {
            println!("{:>3}. {:.4}  {}", rank + 1, t.score, t.name);
        }
        return Ok(());
    }
    for (rank, hit) in generation.search(q).iter().take(k).enumerate() {
        let Some(doc) = generation.document(hit.doc_id) else { continue };
        println!("{:>3}. {:.4}  [{}] {}", rank + 1, hit.score, doc.external_id, doc.name);
    }
    Ok(())
}
