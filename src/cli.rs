use clap::{Parser, Subcommand};
use warp::http::header::{ACCEPT, HOST, HeaderValue};
use warp::http::{HeaderMap, Method};

use crate::config::Settings;
use crate::models::response::{HistoryRequest, HistoryResponse};
use crate::runtime;

#[derive(Parser)]
#[command(name = "history-frame", about = "Today in History as JSON or a Farcaster Frame")]
pub struct Cli {
    /// dotenv-style config file; falls back to CONFIG_FILE
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve,
    /// Fetch today's events once and print the response body
    Today {
        /// Print the JSON payload (default)
        #[arg(long, conflicts_with = "html")]
        json: bool,
        /// Render the Frame HTML instead of JSON
        #[arg(long)]
        html: bool,
        /// Host used in Frame URLs
        #[arg(long)]
        host: Option<String>,
    },
}

pub async fn run(command: Commands, settings: Settings) -> Result<(), String> {
    match command {
        Commands::Serve => {
            runtime::run_api(settings).await;
            Ok(())
        }
        Commands::Today { json, html, host } => {
            let response = fetch_today(&settings, html && !json, host.as_deref()).await?;
            println!("{}", response.body);
            if response.status.is_success() {
                Ok(())
            } else {
                Err(format!("history request failed with status {}", response.status))
            }
        }
    }
}

async fn fetch_today(
    settings: &Settings,
    html: bool,
    host: Option<&str>,
) -> Result<HistoryResponse, String> {
    let handler = runtime::build_handler(settings);
    let mut headers = HeaderMap::new();
    let accept = if html { "text/html" } else { "application/json" };
    headers.insert(ACCEPT, HeaderValue::from_static(accept));
    if let Some(host) = host {
        let value = HeaderValue::from_str(host).map_err(|e| format!("Invalid host {host}: {e}"))?;
        headers.insert(HOST, value);
    }
    let method = if html { Method::POST } else { Method::GET };
    Ok(handler.handle(&HistoryRequest::new(method, headers)).await)
}
