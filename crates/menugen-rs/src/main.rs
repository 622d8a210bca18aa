//! Generate a restaurant name and menu from the command line.
//!
//! Reads the API key from the `OPENROUTER_KEY` environment variable (a `.env`
//! file in the working directory is loaded first).
//!
//! # Examples
//!
//! ```sh
//! # Name and sectioned menu
//! menugen --country Japan --style "Street Food"
//!
//! # Preset labels are accepted too
//! menugen --country "🇮🇹 Italy" --style "✨ Modern"
//!
//! # Save the download file and print the raw menu instead of sections
//! menugen --country Mexico --style Fusion --out-dir . --raw
//!
//! # List the preset countries and styles
//! menugen --list
//! ```

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use menugen_rs::prelude::*;
use tracing_subscriber::EnvFilter;

/// Generate a restaurant name and menu for a country and style.
///
/// Reads the API key from the OPENROUTER_KEY environment variable.
#[derive(Parser)]
#[command(name = "menugen")]
struct Cli {
    /// Country of the restaurant (free text or a preset label)
    #[arg(long, required_unless_present = "list")]
    country: Option<String>,

    /// Restaurant style (free text or a preset label)
    #[arg(long, required_unless_present = "list")]
    style: Option<String>,

    /// Model to use
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum tokens per reply
    #[arg(long, default_value_t = 2048)]
    max_tokens: u32,

    /// Sampling temperature
    #[arg(long, default_value_t = 0.9)]
    temperature: f32,

    /// Write `<name>_menu.txt` into this directory
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Print the menu exactly as generated instead of sectioned
    #[arg(long)]
    raw: bool,

    /// Print the preset countries and styles and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list {
        print_presets();
        return;
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let api_key = api_key_from_env()?;

    let config = GeneratorConfig {
        model: cli.model,
        max_tokens: cli.max_tokens,
        temperature: cli.temperature,
        cache_ttl: DEFAULT_TTL,
    };
    let client = OpenRouterClient::new(api_key)?;
    let generator = MenuGenerator::new(
        Arc::new(config.build_generator(client)),
        Arc::new(config.build_cache()),
    );

    let country = country_from_label(cli.country.as_deref().unwrap_or_default());
    let style = strip_label_icon(cli.style.as_deref().unwrap_or_default());

    let restaurant = generator
        .generate_with_progress(country, style, |phase| {
            eprintln!("[{:>3}%] {}", phase.percent(), phase.message())
        })
        .await
        .map_err(|e| e.to_string())?;

    println!("🍽️  {}\n", restaurant.name);
    if cli.raw {
        println!("{}", restaurant.menu_text);
    } else if restaurant.sections.is_empty() {
        // Nothing recognizable as a section; show what the model said.
        println!("{}", restaurant.menu_text);
    } else {
        println!("{}", restaurant.render_markdown());
    }

    if let Some(dir) = cli.out_dir {
        let path = restaurant
            .export()
            .write_to(&dir)
            .map_err(|e| format!("failed to write menu file in '{}': {e}", dir.display()))?;
        eprintln!("Saved {}", path.display());
    }

    Ok(())
}

fn print_presets() {
    println!("Countries:");
    for label in POPULAR_COUNTRIES {
        println!("  {label}");
    }
    println!("\nStyles:");
    for label in RESTAURANT_STYLES {
        println!("  {label}");
    }
}
