use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueHint};
use route_viz::chart::{plan_series, write_csv, write_json};
use route_viz::core::{EventKind, Route};
use route_viz::input::{load_routes, load_table};
use route_viz::playback::{PlaybackConfig, PlaybackEngine, PlaybackEvent};
use route_viz::settings::ViewerSettings;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tokio::runtime::Handle;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Route playback and chart planning", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a compact summary of every route in a fixture
    Routes {
        #[arg(value_hint = ValueHint::FilePath)]
        fixture: PathBuf,
    },
    /// Play one route back, printing a line per frame
    Play {
        #[arg(value_hint = ValueHint::FilePath)]
        fixture: PathBuf,
        /// Route id (defaults to the first route)
        route_id: Option<String>,
        /// Speed multiplier
        #[arg(long)]
        speed: Option<f64>,
    },
    /// Classify a table as line or bar and compute its y-axis range
    Chart {
        /// CSV file or JSON array of row objects
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        /// Independent (x axis) column
        x_key: String,
        /// Dependent columns; all other columns when omitted
        y_keys: Vec<String>,
    },
    /// Convert a table to JSON, or to CSV when the output ends in .csv
    Convert {
        #[arg(value_hint = ValueHint::FilePath)]
        input: PathBuf,
        #[arg(value_hint = ValueHint::FilePath)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Routes { fixture } => list_routes(&fixture),
        Command::Play { fixture, route_id, speed } => play_route(&fixture, route_id.as_deref(), speed),
        Command::Chart { input, x_key, y_keys } => plan(&input, &x_key, &y_keys),
        Command::Convert { input, output } => convert(&input, &output),
    }
}

fn list_routes(path: &Path) -> Result<()> {
    let catalog = load_routes(path).with_context(|| format!("Failed to load {}", path.display()))?;
    println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "routes": catalog.summaries() }))?);
    Ok(())
}

fn play_route(path: &Path, route_id: Option<&str>, speed: Option<f64>) -> Result<()> {
    let catalog = load_routes(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let route = match route_id {
        Some(id) => catalog.find(id).with_context(|| format!("no route with id {}", id))?,
        None => catalog.first().context("fixture has no routes")?,
    };
    if !route.is_playable() {
        bail!("route {} has no waypoints", route.id);
    }

    let settings = ViewerSettings::load();
    log_events(route, &settings);

    // Create tokio runtime for the playback timer
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(async {
        let (mut engine, mut events) = PlaybackEngine::new(PlaybackConfig::from(&settings), Handle::current());
        if let Some(speed) = speed {
            engine.set_speed(speed);
        }
        engine.reset(route);
        engine.play();

        while let Some(event) = events.recv().await {
            match event {
                PlaybackEvent::Frame(frame) => println!(
                    "{:>4}  {:>10.5} {:>11.5}  {}  [{}]",
                    frame.index, frame.lat, frame.lng, frame.label, frame.progress
                ),
                PlaybackEvent::Started { interval } => info!("Playing {} every {:?}", route.name, interval),
                PlaybackEvent::Finished | PlaybackEvent::Stopped => break,
            }
        }
    });

    Ok(())
}

fn log_events(route: &Route, settings: &ViewerSettings) {
    for kind in EventKind::ALL {
        if !settings.events.is_visible(kind) {
            continue;
        }
        for event in route.events_of(kind) {
            let severity = event.severity.as_ref().map(|s| s.to_string()).unwrap_or_else(|| "n/a".to_string());
            info!(
                "{} at ({:.5}, {:.5}) {} severity {}{}",
                kind.as_str().to_uppercase(),
                event.lat,
                event.lng,
                event.time.to_rfc3339(),
                severity,
                event.note.as_deref().map(|n| format!(" - {}", n)).unwrap_or_default()
            );
        }
    }
}

fn plan(path: &Path, x_key: &str, y_keys: &[String]) -> Result<()> {
    let series = load_table(path).with_context(|| format!("Failed to load {}", path.display()))?;
    if !series.is_empty() && !series.columns.iter().any(|c| c == x_key) {
        return Err(route_viz::VizError::MissingColumn(x_key.to_string()).into());
    }

    let plan = plan_series(&series, x_key, Some(y_keys));
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

fn convert(input: &Path, output: &Path) -> Result<()> {
    let series = load_table(input).with_context(|| format!("Failed to load {}", input.display()))?;

    let writer = BufWriter::new(File::create(output).with_context(|| format!("Failed to create {}", output.display()))?);
    let is_csv = output.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        write_csv(&series, writer)?;
    } else {
        write_json(&series, writer)?;
    }

    info!("Wrote {} rows to {}", series.len(), output.display());
    Ok(())
}
