use anyhow::{ensure, Result};
use axum::Router;
use clap::Parser;
use search_core::store::SledStore;
use server::{build_app, DEFAULT_PAGE_SIZE};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Index directory path
    #[arg(long, default_value = "./index")]
    index: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 3333)]
    port: u16,
    /// Results per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    ensure!(args.page_size >= 1, "--page-size must be at least 1");

    let store = Arc::new(SledStore::open(&args.index, args.page_size)?);
    match store.load_meta()? {
        Some(meta) => tracing::info!(
            index = %args.index,
            num_pages = meta.num_pages,
            created_at = %meta.created_at,
            "index opened"
        ),
        None => tracing::warn!(index = %args.index, "index has no metadata record, was it built?"),
    }
    let app: Router = build_app(store.clone());

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, page_size = args.page_size, "server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let flushed = store.flush()?;
    tracing::info!(flushed, "index flushed, shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
