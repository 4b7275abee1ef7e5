//! Index-Search-RS command line entry point
//!
//! Runs one query and prints the reshaped hits as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use index_search::{
    config,
    engines::{AzureSearch, Engine, StaticEngine},
    network::HttpClient,
    Search,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Query a search index and reshape the hits into flat JSON records
///
/// Service settings can be overridden with INDEX_SEARCH_ENDPOINT,
/// INDEX_SEARCH_INDEX_NAME, INDEX_SEARCH_API_KEY, INDEX_SEARCH_API_VERSION,
/// INDEX_SEARCH_TOP and INDEX_SEARCH_FIELD_MAP. RUST_LOG sets the log filter.
#[derive(Parser, Debug)]
#[command(name = "index-search", version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "INDEX_SEARCH_SETTINGS_PATH")]
    config: Option<PathBuf>,

    /// Replay captured hits from a JSON file instead of querying
    #[arg(long, value_name = "FILE")]
    hits: Option<PathBuf>,

    /// Number of hits to skip
    #[arg(long)]
    skip: Option<u32>,

    /// Maximum number of hits
    #[arg(long)]
    top: Option<u32>,

    /// Search text
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Index-Search-RS v{}", index_search::VERSION);

    // Load configuration
    let settings = config::load(args.config.as_deref())?;

    let engine: Arc<dyn Engine> = match args.hits {
        Some(ref path) => {
            let engine = StaticEngine::from_json_file(path)?;
            info!("Replaying {} hits from {}", engine.len(), path.display());
            Arc::new(engine)
        }
        None => {
            let client = HttpClient::with_settings(&settings.outgoing)
                .context("failed to initialize HTTP client")?;
            Arc::new(AzureSearch::new(client, &settings.service)?)
        }
    };

    let search = Search::new(engine, settings.transform.build()?);

    let mut params = settings.search.parameters();
    if args.skip.is_some() {
        params.skip = args.skip;
    }
    if args.top.is_some() {
        params.top = args.top;
    }

    let query = args.query.join(" ");
    let records = search.execute(&query, &params).await?;

    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_parse_query_and_options() {
        let args =
            Args::try_parse_from(["index-search", "--top", "5", "-c", "s.yml", "pet", "travel"])
                .unwrap();
        assert_eq!(args.top, Some(5));
        assert_eq!(args.config, Some(PathBuf::from("s.yml")));
        assert_eq!(args.query, vec!["pet", "travel"]);
        assert!(args.hits.is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(Args::try_parse_from(["index-search", "--top"]).is_err());
        assert!(Args::try_parse_from(["index-search", "--top", "many"]).is_err());
        assert!(Args::try_parse_from(["index-search", "--bogus"]).is_err());

        let help = Args::try_parse_from(["index-search", "--help"]).unwrap_err();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_args_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
