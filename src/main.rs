use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;

use freightdesk::auth::{EnvToken, TokenProvider};
use freightdesk::http::{ApiClient, RequestOptions};

/// freightdesk - FreightDesk platform API client
///
/// Query the FreightDesk freight-brokerage API from the command line.
///
/// If the FREIGHTDESK_TOKEN environment variable is set, it is sent as a
/// bearer token with every request.
///
/// Examples:
///   freightdesk get /loads
///   freightdesk post /documents --data '{"type":"cdl"}'
#[derive(Parser, Debug)]
#[command(author, version = env!("FREIGHTDESK_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base API URL (also via FREIGHTDESK_API_URL)
    #[arg(
        long = "api-url",
        env = "FREIGHTDESK_API_URL",
        value_name = "URL",
        global = true
    )]
    pub api_url: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long = "timeout-ms", value_name = "MS", global = true)]
    pub timeout_ms: Option<u64>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Perform a GET request against the API
    Get(GetArgs),

    /// Perform a POST request with a JSON payload
    Post(PostArgs),
}

#[derive(clap::Args, Debug)]
pub struct GetArgs {
    /// Request path, e.g. "/loads"
    #[arg(value_name = "PATH")]
    pub path: String,
}

#[derive(clap::Args, Debug)]
pub struct PostArgs {
    /// Request path, e.g. "/documents"
    #[arg(value_name = "PATH")]
    pub path: String,

    /// JSON payload (defaults to an empty object)
    #[arg(long = "data", short = 'd', value_name = "JSON")]
    pub data: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let api_url = cli
        .api_url
        .unwrap_or_else(|| "https://api.freightdesk.io".to_string());
    let client = reqwest::Client::builder()
        .user_agent("freightdesk-cli")
        .build()?;
    let tokens: Arc<dyn TokenProvider> = Arc::new(EnvToken::new("FREIGHTDESK_TOKEN"));
    let api = ApiClient::new(client, api_url, tokens);

    let mut options = RequestOptions::default();
    if let Some(ms) = cli.timeout_ms {
        options = options.timeout(Duration::from_millis(ms));
    }

    let value = match cli.command {
        Commands::Get(args) => api.get_json(&args.path, options).await?,
        Commands::Post(args) => {
            let data: serde_json::Value = match args.data {
                Some(raw) => serde_json::from_str(&raw).context("Invalid --data JSON")?,
                None => serde_json::json!({}),
            };
            api.post_json(&args.path, &data, options).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
