use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Management CLI for the inmo gateway", long_about = None)]
struct Cli {
    /// Admin API base URL
    #[arg(short, long, default_value = "http://127.0.0.1:3001")]
    url: String,

    /// Admin API key
    #[arg(short, long, env = "GATEWAY_ADMIN_KEY", default_value = "CHANGE_ME_IN_PRODUCTION")]
    key: String,

    /// Public gateway base URL (for catalog queries)
    #[arg(short, long, default_value = "http://127.0.0.1:3000")]
    gateway: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway status
    Status,
    /// List services and lookups with their target URLs
    Services,
    /// Re-read configuration and swap it in
    Reload,
    /// Inspect the catalog cache
    Cache {
        /// Drop every cached page
        #[arg(long)]
        clear: bool,
    },
    /// Fetch one page of a catalog through the gateway
    Catalog {
        /// Catalog slug, e.g. tipos-propiedad
        kind: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        per_page: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let res = match cli.command {
        Commands::Status => {
            client
                .get(format!("{}/admin/status", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Services => {
            client
                .get(format!("{}/admin/services", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Reload => {
            client
                .post(format!("{}/admin/reload", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Cache { clear: false } => {
            client
                .get(format!("{}/admin/cache", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Cache { clear: true } => {
            client
                .delete(format!("{}/admin/cache", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Catalog {
            kind,
            page,
            per_page,
        } => {
            client
                .get(format!("{}/api/catalogs/{}", cli.gateway, kind))
                .query(&[("page", page), ("perPage", per_page)])
                .send()
                .await?
        }
    };
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
