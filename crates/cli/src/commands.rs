use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct FilterArgs {
    #[arg(long, help = "Filter tree as inline JSON")]
    pub filter: Option<String>,

    #[arg(
        long,
        conflicts_with = "filter",
        help = "Path to a file holding the filter tree as JSON"
    )]
    pub filter_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a filter query against a message log
    Query {
        #[arg(long, help = "Message log in JSON-lines format")]
        log: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, help = "Drain results in pages of this size")]
        paginate: Option<usize>,

        #[arg(long, help = "Only return posts matching the filter")]
        posts: bool,

        #[arg(
            long,
            help = "If specified, writes the results to this file instead of stdout"
        )]
        output: Option<PathBuf>,
    },
    /// List posts written by a feed
    Posts {
        #[arg(long, help = "Message log in JSON-lines format")]
        log: PathBuf,

        #[arg(long, help = "Feed id; defaults to FEEDQ_SELF_ID")]
        author: Option<String>,

        #[arg(long, help = "Print posts one per line as they are read")]
        stream: bool,
    },
    /// Compile a filter without running it
    Check {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// List the supported filter operators
    Operators,
}
