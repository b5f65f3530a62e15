//! Command-line interface definitions.
//!
//! Base urls fall back to `NEWSDESK_API_URL` / `NEWSDESK_DIGEST_URL` (see
//! [`crate::config`]) when the flags are not given.

use clap::{Parser, Subcommand, ValueEnum};

use crate::data_models::SummaryLength;

#[derive(Parser, Debug)]
#[command(author, version, about = "Fetch, search and summarize news from a remote news service")]
pub struct Cli {
    /// Base url of the desk api (/fetch-news, /search, /summarize)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Base url of the digest api (/api/fetch-and-summarize, /api/categories)
    #[arg(long, global = true)]
    pub digest_url: Option<String>,

    /// How fetched results are printed
    #[arg(long, value_enum, default_value_t = OutputFormat::Html, global = true)]
    pub format: OutputFormat,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the desk and digest pages
    Serve {
        /// Address to listen on
        #[arg(long)]
        bind: Option<String>,

        /// Directory served under /static
        #[arg(long)]
        static_dir: Option<String>,
    },

    /// Fetch news cards (every category when none is given)
    Fetch {
        #[arg(short, long = "category")]
        categories: Vec<String>,

        #[arg(short = 'n', long, default_value_t = 10)]
        max_articles: i64,
    },

    /// Search previously fetched articles
    Search {
        query: String,

        #[arg(short, default_value_t = 5)]
        k: i64,
    },

    /// Summarize a passage ("-" reads it from stdin)
    Summarize {
        text: String,

        #[arg(long, value_enum, default_value_t = SummaryLength::Medium)]
        length: SummaryLength,
    },

    /// Fetch and summarize articles through the digest api
    Digest {
        #[arg(short, long = "category")]
        categories: Vec<String>,

        #[arg(short = 'n', long, default_value_t = 10)]
        max_articles: i64,
    },

    /// List the categories offered by the digest api
    Categories,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Html,
    Text,
}
