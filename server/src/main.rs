use anyhow::Result;
use clap::Parser;
use mixdex_core::{IdfVariant, SearchConfig};
use server::{build_app, rebuild, AppState, IndexSource};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Index directory written by `indexer build`
    #[arg(long)]
    index: Option<PathBuf>,
    /// Playlist corpus (file or directory) to build from at startup; takes
    /// precedence over --index
    #[arg(long)]
    corpus: Option<PathBuf>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Minimum document frequency for corpus builds
    #[arg(long, default_value_t = 2)]
    min_df: u32,
    /// Maximum document-frequency ratio for corpus builds
    #[arg(long, default_value_t = 0.2)]
    max_df_ratio: f64,
    /// Use smoothed IDF for corpus builds
    #[arg(long, default_value_t = false)]
    smoothed_idf: bool,
    /// Playlists folded into track rankings
    #[arg(long, default_value_t = 50)]
    top_playlists: usize,
    /// Tracks returned by /tracks
    #[arg(long, default_value_t = 15)]
    top_tracks: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    if args.index.is_none() && args.corpus.is_none() {
        anyhow::bail!("one of --index or --corpus is required");
    }

    let config = SearchConfig {
        min_df: args.min_df,
        max_df_ratio: args.max_df_ratio,
        idf_variant: if args.smoothed_idf { IdfVariant::Smoothed } else { IdfVariant::Standard },
        top_playlists: args.top_playlists,
        top_tracks: args.top_tracks,
    };
    let state = AppState::new(IndexSource { index_dir: args.index, corpus: args.corpus }, config)?;

    if !state.handle.is_ready() {
        // Searches answer 503 until the first generation is installed.
        let warm = state.clone();
        tokio::spawn(async move {
            match rebuild(&warm).await {
                Ok(num_docs) => tracing::info!(num_docs, "index ready"),
                Err(e) => tracing::error!(error = %e, "initial index build failed"),
            }
        });
    }

    let app = build_app(state);
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
