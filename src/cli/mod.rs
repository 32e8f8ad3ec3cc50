pub mod commands;
pub mod context;
pub mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Shop mention quotas, audit log and a word cipher bot for Discord.
#[derive(Parser, Debug)]
#[command(name = "shopkeeper", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding config.toml, shops.json and the audit log
    #[arg(long, global = true, env = "SHOPKEEPER_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the dashboard, JSON API and Discord interactions endpoint
    Serve(ServeArgs),

    /// Register the slash commands with Discord
    RegisterCommands {
        /// Discord application id
        #[arg(long, env = "CLIENT_ID")]
        client_id: String,
        /// Bot token
        #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Apply the word cipher to text
    Encrypt {
        /// Text to encrypt
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Reverse the word cipher
    Decrypt {
        /// Text to decrypt
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Manage shops and their mention quotas
    Shop {
        #[command(subcommand)]
        action: ShopAction,
    },

    /// Show the audit log, newest first
    Log {
        /// Show last N entries
        #[arg(long, default_value_t = 50)]
        last: usize,
        /// Filter by actor name or id (substring, case-insensitive)
        #[arg(long)]
        actor: Option<String>,
        /// Filter by shop name (substring, case-insensitive)
        #[arg(long)]
        store: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ShopAction {
    /// Create a shop seeded with its tier's allotment
    Create {
        /// Display name
        #[arg(long)]
        name: String,
        /// PLATINUM, GOLD or VIP
        #[arg(long = "type")]
        tier: String,
    },
    /// List all shops
    List,
    /// Show one shop's counters
    Show { id: u64 },
    /// Deduct mentions from one counter
    Use {
        id: u64,
        /// mentionEveryone, mentionHere or mentionStores
        field: String,
        amount: u32,
    },
    /// Add the tier allotment to every counter
    Renew { id: u64 },
    /// Rename a shop or change its tier
    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "type")]
        tier: Option<String>,
    },
    /// Delete a shop
    Delete { id: u64 },
}

/// Settings for `shopkeeper serve`. Secrets come from the environment.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind (overrides [server] bind)
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on (overrides [server] port)
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Dashboard username
    #[arg(long, env = "ADMIN_USER")]
    pub admin_user: Option<String>,

    /// Dashboard password
    #[arg(long, env = "ADMIN_PASS", hide_env_values = true)]
    pub admin_pass: Option<String>,

    /// Discord application id
    #[arg(long, env = "CLIENT_ID")]
    pub client_id: Option<String>,

    /// Discord OAuth2 client secret
    #[arg(long, env = "DISCORD_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// OAuth2 redirect URI registered with Discord
    #[arg(long, env = "REDIRECT_URI")]
    pub redirect_uri: Option<String>,

    /// Application public key; enables POST /interactions
    #[arg(long, env = "DISCORD_PUBLIC_KEY")]
    pub public_key: Option<String>,

    /// Bot token; slash commands are registered at startup when set
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    /// Keep shops and the audit log in memory only
    #[arg(long)]
    pub ephemeral: bool,
}
