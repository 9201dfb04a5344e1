use crate::{
    commands::{Commands, FilterArgs},
    env::EnvManager,
    error::CliError,
    host::LogHost,
};
use clap::Parser;
use connectors::{file::jsonl, memory::MemoryLog};
use engine_core::{
    config::QueryConfig,
    service::{Query, QueryService},
};
use futures_util::TryStreamExt;
use model::filter::node::{FilterInput, FilterNode, ROOT_PATH};
use planner::{FilterCompiler, OperatorRegistry, PredicateCompiler};
use serde_json::json;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod env;
mod error;
mod host;
mod output;

#[derive(Parser)]
#[command(
    name = "feedq",
    version,
    about = "Filter queries over an append-only message log"
)]
struct Cli {
    #[arg(long, global = true, help = "Load settings from this .env file")]
    env_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Pretty-print JSON output")]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut env = EnvManager::from_process();
    if let Some(path) = &cli.env_file {
        env.load_from_file(path)?;
    }
    let config = env.query_config()?;

    match cli.command {
        Commands::Query {
            log,
            filter,
            paginate,
            posts,
            output,
        } => {
            let filter = read_filter(&filter).await?;
            let service = open_service(&log, config).await?;
            let query = Query { filter, paginate };

            let messages = if posts {
                service.query_posts(&query).await?
            } else {
                service.query_messages(&query).await?
            };
            info!("Query matched {} messages", messages.len());

            match output {
                Some(path) => output::write_json(&messages, &path, cli.pretty).await?,
                None => output::print_json(&messages, cli.pretty)?,
            }
        }
        Commands::Posts {
            log,
            author,
            stream,
        } => {
            if author.is_none() && config.self_id.is_none() {
                return Err(CliError::Config(
                    "no --author given and FEEDQ_SELF_ID is not set".into(),
                ));
            }
            let service = open_service(&log, config).await?;

            if stream {
                let mut feed = service.user_posts_stream(author.as_deref());
                while let Some(msg) = feed.try_next().await? {
                    output::print_json(&msg, false)?;
                }
            } else {
                let posts = service.user_posts(author.as_deref()).await?;
                output::print_json(&posts, cli.pretty)?;
            }
        }
        Commands::Check { filter } => {
            let input = read_filter(&filter).await?;
            let node = FilterNode::from_input(&input, ROOT_PATH)
                .map_err(engine_core::error::QueryError::from)?;

            let registry = OperatorRegistry::new();
            let builder = MemoryLog::new();
            PredicateCompiler::new(&registry, &builder)
                .compile(&node)
                .map_err(engine_core::error::QueryError::from)?;

            let report = json!({
                "valid": true,
                "leaves": node.leaf_count(),
                "depth": node.depth(),
                "where": node,
            });
            output::print_json(&report, cli.pretty)?;
        }
        Commands::Operators => {
            let registry = OperatorRegistry::new();
            for entry in registry.operators() {
                println!(
                    "{:<14} {:<16} {}",
                    entry.name.as_str(),
                    entry.arity.to_string(),
                    entry.bound_field.unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}

async fn open_service(
    path: &Path,
    config: QueryConfig,
) -> Result<QueryService<MemoryLog>, CliError> {
    let log = jsonl::load_log(path).await?;
    let host = LogHost { log: Arc::new(log) };
    Ok(QueryService::init(&host, config)?)
}

async fn read_filter(args: &FilterArgs) -> Result<FilterInput, CliError> {
    let source = match (&args.filter, &args.filter_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path).await?,
        (None, None) => return Err(CliError::MissingFilter),
    };
    serde_json::from_str(&source).map_err(CliError::FilterParse)
}
