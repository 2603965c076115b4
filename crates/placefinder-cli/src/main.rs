//! Placefinder CLI - place search from the terminal
//!
//! Autocomplete, full search and street-level previews on top of
//! OpenStreetMap Nominatim and Mapillary.

mod config;
mod render;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Input, Password, Select};
use placefinder::{
    Coordinate, NoPreviewScenes, OrchestratorState, PlaceResult, PreviewOutcome,
    PreviewSceneProvider, SearchOrchestrator, SearchOutcome,
};
use placefinder_osm::{MapillaryPreview, NominatimProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::Config;

type Orchestrator = SearchOrchestrator<NominatimProvider, Box<dyn PreviewSceneProvider>>;

/// Upper bound on waiting for a suggestion round
const COMPLETION_WAIT: Duration = Duration::from_secs(15);

#[derive(Parser)]
#[command(name = "placefinder")]
#[command(about = "Placefinder CLI - place search, autocomplete and previews", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for places
    Search {
        /// Search query (e.g., "coffee near Mint Plaza")
        query: String,
        /// Also return street addresses
        #[arg(short, long)]
        addresses: bool,
        /// Print the resulting state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest completions for a partial query
    Complete {
        /// Partial query
        fragment: String,
        /// Print suggestions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive search session
    Interactive,

    /// Look up a street-level preview near a coordinate
    Preview {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
        /// Print the scene as JSON
        #[arg(long)]
        json: bool,
    },

    /// Store a Mapillary access token for previews
    Login {
        /// Access token (will prompt if not provided)
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { query, addresses, json } => cmd_search(query, addresses, json).await,
        Commands::Complete { fragment, json } => cmd_complete(fragment, json).await,
        Commands::Interactive => cmd_interactive().await,
        Commands::Preview { latitude, longitude, json } => {
            cmd_preview(latitude, longitude, json).await
        }
        Commands::Login { token } => cmd_login(token).await,
        Commands::Config => cmd_config(),
    }
}

/// Logs go to stderr so stdout stays clean for piping
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let geo = NominatimProvider::new(config.nominatim_config())
        .context("Failed to create Nominatim client")?;

    let preview: Box<dyn PreviewSceneProvider> = match config.mapillary_config() {
        Some(mapillary) => Box::new(
            MapillaryPreview::new(mapillary).context("Failed to create Mapillary client")?,
        ),
        None => Box::new(NoPreviewScenes),
    };

    debug!(
        nominatim = %config.nominatim_url,
        previews = config.mapillary_token.is_some(),
        "Search session configured"
    );

    Ok(SearchOrchestrator::new(
        Arc::new(geo),
        preview,
        config.orchestrator_config(),
    ))
}

/// Send a fragment and wait until its suggestions have settled
async fn complete_fragment(orchestrator: &Orchestrator, fragment: &str) -> Result<OrchestratorState> {
    let mut rx = orchestrator.subscribe();
    orchestrator.update_fragment(fragment);

    let settled = tokio::time::timeout(COMPLETION_WAIT, rx.wait_for(|state| !state.completing))
        .await
        .context("Timed out waiting for suggestions")?
        .context("Search session closed")?
        .clone();

    Ok(settled)
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_search(query: String, addresses: bool, json: bool) -> Result<()> {
    let mut config = Config::load()?;
    config.include_addresses |= addresses;
    let orchestrator = build_orchestrator(&config)?;

    let outcome = orchestrator.search(&query).await;
    let state = orchestrator.state();

    if json {
        let report = serde_json::json!({
            "query": query,
            "results": state.results,
            "viewport": state.viewport,
            "error": state.error,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match outcome {
            SearchOutcome::Applied { count } if count > 0 => {
                render::print_results(&query, &state.results, state.viewport.as_ref());
            }
            SearchOutcome::Cleared => println!("Nothing to search for."),
            SearchOutcome::Failed | SearchOutcome::Superseded => {}
            _ => println!("No places found for '{}'", query),
        }
    }

    if let Some(error) = state.error {
        bail!(error);
    }

    Ok(())
}

async fn cmd_complete(fragment: String, json: bool) -> Result<()> {
    if fragment.trim().is_empty() {
        bail!("Fragment must not be empty");
    }

    let config = Config::load()?;
    let orchestrator = build_orchestrator(&config)?;
    let state = complete_fragment(&orchestrator, &fragment).await?;

    if let Some(error) = state.error {
        bail!(error);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&state.completions)?);
    } else {
        render::print_completions(&fragment, &state.completions);
    }

    Ok(())
}

async fn cmd_interactive() -> Result<()> {
    let config = Config::load()?;
    let orchestrator = build_orchestrator(&config)?;

    if config.mapillary_config().is_none() {
        println!(
            "{}",
            "Tip: run 'placefinder login' to enable street-level previews.".yellow()
        );
    }
    println!("{}", "Type a place to search, or leave empty to quit.".dimmed());

    loop {
        let text: String = Input::new()
            .with_prompt("Search")
            .allow_empty(true)
            .interact_text()
            .context("Failed to read input")?;

        if text.trim().is_empty() {
            break;
        }

        let state = complete_fragment(&orchestrator, &text).await?;
        if let Some(error) = &state.error {
            println!("{} {}", "✗".red(), error);
            orchestrator.dismiss_error();
            continue;
        }

        let mut choices = vec![format!("Search \"{}\"", text)];
        choices.extend(state.completions.iter().map(render::completion_label));

        let choice = Select::new()
            .with_prompt("Pick a suggestion")
            .items(&choices)
            .default(0)
            .interact()
            .context("Failed to read selection")?;

        let (query, outcome) = match choice {
            0 => (text.clone(), orchestrator.search(&text).await),
            n => {
                let completion = &state.completions[n - 1];
                (
                    completion.query(),
                    orchestrator.search_from_completion(completion).await,
                )
            }
        };

        let state = orchestrator.state();
        match outcome {
            SearchOutcome::Applied { count } if count > 0 => {
                render::print_results(&query, &state.results, state.viewport.as_ref());
            }
            SearchOutcome::Failed => {
                if let Some(error) = &state.error {
                    println!("{} {}", "✗".red(), error);
                }
                orchestrator.dismiss_error();
                continue;
            }
            _ => {
                println!("No places found for '{}'", query);
                continue;
            }
        }

        let Some(selected) = pick_result(&state.results)? else {
            continue;
        };

        match orchestrator.select(Some(&selected)).await {
            PreviewOutcome::Found => {
                if let Some(scene) = &orchestrator.state().preview {
                    render::print_scene(scene);
                }
            }
            PreviewOutcome::NoScene => println!("No preview available for {}", selected.name),
            PreviewOutcome::Failed => {
                println!("{} Preview unavailable for {}", "!".yellow(), selected.name)
            }
            _ => {}
        }
    }

    Ok(())
}

/// A single result is selected without asking
fn pick_result(results: &[PlaceResult]) -> Result<Option<PlaceResult>> {
    match results {
        [] => Ok(None),
        [only] => Ok(Some(only.clone())),
        _ => {
            let mut names: Vec<String> = results.iter().map(|r| r.name.clone()).collect();
            names.push("Back".dimmed().to_string());

            let index = Select::new()
                .with_prompt("Pick a place")
                .items(&names)
                .default(0)
                .interact()
                .context("Failed to read selection")?;

            Ok(results.get(index).cloned())
        }
    }
}

async fn cmd_preview(latitude: f64, longitude: f64, json: bool) -> Result<()> {
    let coordinate = Coordinate::new(latitude, longitude);
    if !coordinate.is_valid() {
        bail!("Invalid coordinate: {}, {}", latitude, longitude);
    }

    let config = Config::load()?;
    let mapillary = config
        .mapillary_config()
        .context("No Mapillary token. Run 'placefinder login' first.")?;
    let preview = MapillaryPreview::new(mapillary).context("Failed to create Mapillary client")?;

    let scene = preview
        .lookup_scene(coordinate)
        .await
        .context("Preview lookup failed")?;

    match (scene, json) {
        (scene, true) => println!("{}", serde_json::to_string_pretty(&scene)?),
        (Some(scene), false) => render::print_scene(&scene),
        (None, false) => println!("No preview available near {}", coordinate),
    }

    Ok(())
}

async fn cmd_login(token: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let token = match token {
        Some(t) => t,
        None => Password::new()
            .with_prompt("Mapillary access token")
            .interact()
            .context("Failed to read access token")?,
    };

    config.set_mapillary_token(token);
    let mapillary = config
        .mapillary_config()
        .context("Access token must not be empty")?;

    // Test the token with a lookup near a well-covered spot
    let preview = MapillaryPreview::new(mapillary).context("Failed to create Mapillary client")?;
    print!("Testing token... ");

    match preview.lookup_scene(Coordinate::new(48.8584, 2.2945)).await {
        Ok(_) => println!("{}", "OK".green()),
        Err(e) => {
            println!("{}", "Failed".red());
            bail!("Could not query Mapillary: {}", e);
        }
    }

    config.save()?;
    println!(
        "{} Access token saved to {:?}",
        "✓".green(),
        Config::config_path()?
    );

    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Nominatim URL: {}", config.nominatim_url);
    println!("  User-Agent: {}", config.user_agent);
    println!("  Email: {}", config.email.as_deref().unwrap_or("None").cyan());
    println!("  Mapillary URL: {}", config.mapillary_url);
    println!(
        "  Mapillary Token: {}",
        if config.mapillary_token.is_some() {
            "Set".green()
        } else {
            "Not set".red()
        }
    );
    println!("  Preview Radius: {} m", config.preview_radius_meters);
    println!("  Debounce: {} ms", config.debounce_ms);
    println!(
        "  Limits: {} results, {} suggestions",
        config.search_limit, config.completion_limit
    );
    println!(
        "  Result Types: {}",
        config
            .result_types()
            .types()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(())
}
