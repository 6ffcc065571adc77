use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use corpus_qa_core::{
    list_documents, AnswerSynthesizer, AppConfig, Embedder, HfTextGenerator, IndexBuilder,
    OpenAiEmbedder, QdrantStore, Retriever,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "corpus-qa", version)]
struct Cli {
    /// Directory holding the corpus files (.txt / .md / .docx).
    #[arg(long, default_value = "data", env = "CORPUS_DIR")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the corpus files eligible for indexing.
    List,
    /// Copy a file into the corpus directory.
    Add {
        #[arg(long)]
        file: PathBuf,
        /// Rebuild the index right after the copy.
        #[arg(long, default_value_t = false)]
        rebuild: bool,
    },
    /// Delete a corpus file. Its vectors stay searchable until the next rebuild.
    Remove {
        #[arg(long)]
        name: String,
    },
    /// Rebuild the vector index from the current corpus.
    Rebuild,
    /// Ask a question against the indexed corpus.
    Ask {
        #[arg(long)]
        question: String,
    },
    /// Raw similarity search, printed as source/score pairs.
    Search {
        #[arg(long)]
        text: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "corpus-qa boot"
    );

    match cli.command {
        Command::List => {
            for name in list_documents(&cli.data_dir) {
                println!("{name}");
            }
        }
        Command::Add { file, rebuild } => {
            let name = file
                .file_name()
                .and_then(|name| name.to_str())
                .with_context(|| format!("path has no file name: {}", file.display()))?
                .to_string();
            tokio::fs::create_dir_all(&cli.data_dir).await?;
            tokio::fs::copy(&file, cli.data_dir.join(&name))
                .await
                .with_context(|| {
                    format!("copying {} into {}", file.display(), cli.data_dir.display())
                })?;
            println!("added {name}");
            if rebuild {
                run_rebuild(&cli.data_dir).await?;
            }
        }
        Command::Remove { name } => {
            tokio::fs::remove_file(cli.data_dir.join(&name))
                .await
                .with_context(|| format!("deleting {name}"))?;
            println!("deleted {name}; run rebuild to drop its vectors from the index");
        }
        Command::Rebuild => run_rebuild(&cli.data_dir).await?,
        Command::Ask { question } => {
            let config = AppConfig::from_env()?;
            let generator = HfTextGenerator::new(
                &config.generation_endpoint,
                config.generation_api_key.clone(),
            );
            let synthesizer = AnswerSynthesizer::new(build_retriever(&config), generator);

            let answer = synthesizer.answer(&question).await?;
            println!("{}", answer.text);
            for source in answer.sources {
                println!("source: {source}");
            }
        }
        Command::Search { text } => {
            let config = AppConfig::from_env()?;
            let retriever = build_retriever(&config);
            for hit in retriever.debug_search(&text).await? {
                println!("{} score={:.4}", hit.source_id, hit.score);
            }
        }
    }

    Ok(())
}

fn build_retriever(config: &AppConfig) -> Retriever<OpenAiEmbedder, QdrantStore> {
    let embedder = OpenAiEmbedder::new(&config.openai_api_key);
    let store = QdrantStore::new(
        &config.qdrant_url,
        &config.index_name,
        embedder.dimensions(),
    );
    Retriever::new(embedder, store)
}

async fn run_rebuild(data_dir: &Path) -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    let embedder = OpenAiEmbedder::new(&config.openai_api_key);
    let store = QdrantStore::new(
        &config.qdrant_url,
        &config.index_name,
        embedder.dimensions(),
    );

    let builder = IndexBuilder::new(data_dir, embedder, store);
    let report = builder.rebuild().await?;

    if !report.skipped.is_empty() {
        warn!(
            "skipped_files={} in {}",
            report.skipped.len(),
            data_dir.display()
        );
        for skipped in &report.skipped {
            warn!(file = %skipped.name, reason = %skipped.reason, "skipped corpus file");
        }
    }

    println!(
        "{} chunks indexed at {}",
        report.chunk_count,
        report.rebuilt_at.to_rfc3339()
    );
    Ok(())
}
