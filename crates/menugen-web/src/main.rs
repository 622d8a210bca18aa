//! Restaurant and menu generator with a browser form.
//!
//! # Usage
//!
//! ```bash
//! OPENROUTER_KEY=sk-... cargo run -p menugen-web
//! OPENROUTER_KEY=sk-... cargo run -p menugen-web -- --model google/gemini-2.0-flash-001
//! OPENROUTER_KEY=sk-... cargo run -p menugen-web -- --port 8080 --cache-ttl-secs 600
//! ```
//!
//! A `.env` file in the working directory is read for `OPENROUTER_KEY` too.
//! Then open the printed URL in a browser.

use std::net::IpAddr;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use menugen_rs::prelude::*;
use menugen_web::{WebConfig, spawn_web};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Restaurant name and menu generator.
#[derive(Parser)]
#[command(about = "Restaurant name and menu generator with a browser-based form")]
struct Args {
    /// LLM model to use.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Address to bind the web server to.
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port for the web server.
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// Maximum tokens per reply.
    #[arg(long, default_value_t = 2048)]
    max_tokens: u32,

    /// Sampling temperature.
    #[arg(long, default_value_t = 0.9)]
    temperature: f32,

    /// How long a generated reply is reused, in seconds.
    #[arg(long, default_value_t = DEFAULT_TTL.as_secs())]
    cache_ttl_secs: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), String> {
    let api_key = api_key_from_env()?;

    let config = GeneratorConfig {
        model: args.model,
        max_tokens: args.max_tokens,
        temperature: args.temperature,
        cache_ttl: Duration::from_secs(args.cache_ttl_secs),
    };
    let client = OpenRouterClient::new(api_key)?;
    let generator = Arc::new(MenuGenerator::new(
        Arc::new(config.build_generator(client)),
        Arc::new(config.build_cache()),
    ));
    info!(
        model = generator.model_name(),
        cache_ttl_secs = args.cache_ttl_secs,
        "Generator ready"
    );

    let web_config = WebConfig {
        bind_addr: (args.host, args.port).into(),
    };
    let addr = spawn_web(generator, web_config)
        .await
        .map_err(|e| format!("failed to start web server: {e}"))?;
    println!("Web UI: http://{addr}");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("failed to listen for shutdown signal: {e}"))?;
    info!("Shutting down");
    Ok(())
}
