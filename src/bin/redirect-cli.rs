use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "redirect-cli")]
#[command(about = "Management CLI for the redirect mapper", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    #[arg(short, long)]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service status
    Status,
    /// List rules in editing form (from/to)
    List,
    /// List rules as the matcher sees them (key/destination)
    Compiled,
    /// Replace all rules with the contents of a JSON file
    Import {
        /// JSON file holding a list of {"from", "to"} records
        file: PathBuf,
    },
    /// Show where a path would redirect
    Check {
        /// Request path, optionally with query string
        path: String,
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
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let res = match cli.command {
        Commands::Status => {
            client.get(format!("{}/admin/status", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::List => {
            client.get(format!("{}/admin/rules", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Compiled => {
            client.get(format!("{}/admin/rules/compiled", cli.url))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Import { file } => {
            let content = std::fs::read_to_string(&file)?;
            // Fail locally on broken JSON instead of sending it.
            let rules: Value = serde_json::from_str(&content)?;
            client.put(format!("{}/admin/rules", cli.url))
                .headers(headers)
                .body(rules.to_string())
                .send()
                .await?
        }
        Commands::Check { path } => {
            client.post(format!("{}/admin/lookup", cli.url))
                .headers(headers)
                .body(json!({ "path": path }).to_string())
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
