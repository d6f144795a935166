//! Command-line argument definitions.

use clap::{Parser, Subcommand};

/// Ethereum standards documents: catalog, reference graph, pages, and the cast bot.
#[derive(Parser, Debug)]
#[command(name = "eiptools", version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        /// Address host, overriding the config
        #[arg(long)]
        host: Option<String>,

        /// Port, overriding the config
        #[arg(short, long)]
        port: Option<u16>,

        /// Read markdown from the local checkouts instead of upstream
        #[arg(long)]
        local: bool,
    },

    /// Update the catalog files from the local checkouts
    Index {
        /// Checkout root, overriding the config
        #[arg(long)]
        checkouts: Option<String>,

        /// Also add work-in-progress documents from open GitHub pull requests
        #[arg(long)]
        prs: bool,

        /// GitHub API token; unauthenticated requests are heavily rate limited
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        github_token: Option<String>,
    },

    /// Dependency graph operations
    Graph {
        #[command(subcommand)]
        action: GraphAction,
    },

    /// Print one document
    Show {
        /// Document reference: 1559, eip-1559, erc-20, rip-7212, caip-2
        reference: String,

        /// Print the markdown body instead of a summary
        #[arg(long, conflicts_with = "html")]
        raw: bool,

        /// Print the rendered HTML body
        #[arg(long)]
        html: bool,

        /// Read from the local checkouts instead of upstream
        #[arg(long)]
        local: bool,
    },

    /// Reading-list bookmarks
    Bookmarks {
        #[command(subcommand)]
        action: BookmarkAction,
    },

    /// Cast webhook helpers
    Webhook {
        #[command(subcommand)]
        action: WebhookAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum GraphAction {
    /// Build the graph artifact
    Build {
        /// Use catalog `requires` lists instead of reading every document
        #[arg(long)]
        from_catalog: bool,

        /// Stop at the first unreadable document
        #[arg(long)]
        fail_fast: bool,
    },

    /// Summarize the graph artifact
    Stats {
        /// Number of most-referenced documents to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Show what a document requires and what references it
    Deps {
        /// EIP number or id
        id: String,

        /// Include indirect requirements, dependencies first
        #[arg(long)]
        transitive: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum BookmarkAction {
    /// List bookmarks
    List,

    /// Bookmark a document
    Add {
        /// Document reference
        reference: String,
    },

    /// Remove a bookmark
    Remove {
        /// Document reference
        reference: String,
    },

    /// Remove all bookmarks
    Clear,

    /// Print a shareable link for the list
    Share,

    /// Add the documents from a shared link or query string
    Import {
        /// e.g. `https://eip.tools/shared?eip=1559,4844,rip=7212` or `eip=1559,4844`
        link: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum WebhookAction {
    /// Send a signed sample cast to a running server
    Test {
        /// Webhook endpoint
        #[arg(long)]
        url: Option<String>,

        /// Cast text
        #[arg(long, default_value = "Have you read EIP-1559 and ERC-20?")]
        text: String,
    },

    /// Register the webhook with the social API
    Register {
        /// Public webhook URL, overriding config and WEBHOOK_URL
        #[arg(long)]
        url: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,

    /// Get a value by dotted key
    Get { key: String },

    /// Set a value by dotted key
    Set { key: String, value: String },

    /// Create a default config file
    Init {
        /// Write to this path instead of the default
        #[arg(long)]
        file: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration as environment variables
    Export {
        /// Format as `--env KEY=value` for docker
        #[arg(long)]
        docker_env: bool,
    },
}
