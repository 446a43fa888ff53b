use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN};
use serde_json::Value;
use url::Url;

#[derive(Parser)]
#[command(name = "scan-cli")]
#[command(about = "Query a running dust-scanner", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Origin header to send, for checking CORS responses
    #[arg(long)]
    origin: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan an EVM wallet across every configured chain
    Evm { addr: String },
    /// Scan a Solana wallet
    Solana { addr: String },
    /// Check server health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    if let Some(origin) = &cli.origin {
        headers.insert(ORIGIN, HeaderValue::from_str(origin)?);
    }

    let url = match &cli.command {
        Commands::Evm { addr } => {
            Url::parse_with_params(&format!("{}/api/evm-tokens", base), [("addr", addr)])?
        }
        Commands::Solana { addr } => {
            Url::parse_with_params(&format!("{}/api/tokens", base), [("addr", addr)])?
        }
        Commands::Health => Url::parse(&format!("{}/health", base))?,
    };

    let res = client.get(url).headers(headers).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if let Some(origin) = res.headers().get("access-control-allow-origin") {
        eprintln!("Access-Control-Allow-Origin: {}", origin.to_str().unwrap_or("<binary>"));
    }
    if !status.is_success() {
        eprintln!("Error: scanner returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);

    if let Some(error) = json.get("error").and_then(Value::as_str) {
        eprintln!("Upstream error: {}", error);
    }
    Ok(())
}
