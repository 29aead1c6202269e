use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use typed_solr::{
    config::SolrConfig,
    document::{Document, FieldMeta},
    error::{SolrError, SolrResult},
    protocol::Protocol,
    search::{DocumentCollection, RequestPayload, Transport},
};

#[derive(Parser)]
#[command(name = "typed-solr")]
#[command(about = "Inspect saved search engine responses", long_about = None)]
struct Cli {
    /// Response format of the saved file (defaults to the configured protocol)
    #[arg(short, long)]
    protocol: Option<Protocol>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the hit count and query time
    Stats {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print query and spatial facet counts
    Facets {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print field facet buckets
    FacetFields {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Commands {
    fn file(&self) -> &PathBuf {
        match self {
            Commands::Stats { file } | Commands::Facets { file } | Commands::FacetFields { file } => {
                file
            }
        }
    }
}

/// Documents are never mapped here, so no fields are declared
#[derive(Debug, Deserialize)]
struct Untyped {}

impl Document for Untyped {
    fn fields() -> &'static [FieldMeta] {
        &[]
    }
}

/// Answers every search with the contents of one saved response
struct FileTransport {
    path: PathBuf,
}

#[async_trait]
impl Transport for FileTransport {
    async fn search(&self, _handler: &str, _payload: RequestPayload) -> SolrResult<Value> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SolrError::Transport(format!("{}: {}", self.path.display(), e)))?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn update(&self, _handler: &str, _body: String) -> SolrResult<Value> {
        Err(SolrError::Transport(
            "saved responses cannot be updated".to_string(),
        ))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "typed_solr=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = SolrConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load configuration: {}", e);
        SolrConfig::default()
    });
    if let Some(protocol) = cli.protocol {
        config.protocol = protocol;
    }
    tracing::debug!(protocol = %config.protocol, "Using protocol");

    let transport = Arc::new(FileTransport {
        path: cli.command.file().clone(),
    });
    let collection = DocumentCollection::<Untyped>::new(config, transport);
    let response = collection
        .select()
        .execute()
        .await
        .with_context(|| format!("failed to read {}", cli.command.file().display()))?;

    match cli.command {
        Commands::Stats { .. } => {
            let statistic = response.statistics()?;
            println!("documents: {}", statistic.document_count);
            println!("empty:     {}", statistic.is_empty);
            println!("elapsed:   {}ms", statistic.elapsed_time.as_millis());
        }
        Commands::Facets { .. } => {
            let mut facets: Vec<_> = response.facet_queries()?.into_iter().collect();
            facets.sort();
            if facets.is_empty() {
                println!("no facet queries");
            }
            for (alias, count) in facets {
                println!("{}: {}", alias, count);
            }
        }
        Commands::FacetFields { .. } => {
            let fields = response.facet_fields()?;
            if fields.is_empty() {
                println!("no facet fields");
            }
            for field in fields {
                println!("{}", field.name);
                for item in field.items {
                    println!("  {}: {}", item.value, item.count);
                }
            }
        }
    }

    Ok(())
}
