use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use search_core::page::{CrawledPage, IndexedPage};
use search_core::store::{IndexMeta, SledStore};
use tracing_subscriber::{EnvFilter, fmt};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

const INDEX_VERSION: u32 = 1;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build the weighted keyword index from crawled pages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from crawled-page JSON/JSONL files or a directory of them
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long)]
        output: String,
    },
}

#[derive(Debug, Default, PartialEq, Eq)]
struct BuildStats {
    pages: u64,
    words: u64,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output } => {
            // lookups are not served from here, page size only matters to the server
            let store = SledStore::open(&output, 1)
                .with_context(|| format!("opening index at {output}"))?;
            let stats = build_index(&store, Path::new(&input))?;
            tracing::info!(
                pages = stats.pages,
                words = stats.words,
                output = %output,
                "index build complete"
            );
            Ok(())
        }
    }
}

/// Indexes every crawled page under `input` into `store`, then records the
/// index metadata and flushes.
fn build_index(store: &SledStore, input: &Path) -> Result<BuildStats> {
    let files = input_files(input);
    if files.is_empty() {
        bail!("no .json or .jsonl input found at {}", input.display());
    }

    let mut stats = BuildStats::default();
    for file in files {
        let pages = read_pages(&file).with_context(|| format!("reading {}", file.display()))?;
        tracing::debug!(file = %file.display(), pages = pages.len(), "parsed input file");
        for page in pages {
            stats.words += index_page(store, page)? as u64;
            stats.pages += 1;
        }
    }

    let created_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".into());
    let meta = IndexMeta {
        num_pages: store.page_count() as u64,
        created_at,
        version: INDEX_VERSION,
    };
    store.write_meta(&meta)?;
    store.flush()?;
    Ok(stats)
}

fn input_files(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && is_json(p) {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

fn is_json(path: &Path) -> bool {
    matches!(path.extension().and_then(|s| s.to_str()), Some("json" | "jsonl"))
}

fn read_pages(file: &Path) -> Result<Vec<CrawledPage>> {
    let reader = BufReader::new(File::open(file)?);
    if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        let mut pages = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() { continue; }
            pages.push(serde_json::from_str(&line)?);
        }
        return Ok(pages);
    }
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            Ok(arr.into_iter().map(serde_json::from_value).collect::<Result<Vec<_>, _>>()?)
        }
        json @ serde_json::Value::Object(_) => Ok(vec![serde_json::from_value(json)?]),
        _ => Ok(Vec::new()),
    }
}

fn index_page(store: &SledStore, page: CrawledPage) -> Result<usize> {
    let indexed = IndexedPage::from_crawled_page(page);
    store.write_indexed_page(&indexed.url, &indexed.title, &indexed.description)?;
    let written = store.write_indexed_words(&indexed.url, indexed.words)?;
    tracing::debug!(url = %indexed.url, words = written, "indexed page");
    Ok(written)
}
