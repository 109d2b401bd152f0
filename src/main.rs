mod client;
mod config;
mod error;
mod replay;

use std::path::{Path, PathBuf};

use canvas::doc::Snapshot;
use canvas::engine::EngineCore;
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

use crate::client::BookClient;
use crate::error::CliError;
use crate::replay::{Replayer, parse_script};

#[derive(Parser, Debug)]
#[command(name = "marginalia", about = "Inspect, replay and sync book canvas annotations")]
struct Cli {
    #[arg(long, env = "MARGINALIA_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a snapshot and report binding problems.
    Inspect { snapshot: PathBuf },
    /// List elements inside the viewport of a window.
    Visible {
        snapshot: PathBuf,
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        #[arg(long, default_value_t = 800.0)]
        height: f64,
    },
    /// Run a JSON Lines gesture script against a snapshot.
    Replay {
        snapshot: PathBuf,
        script: PathBuf,
        /// Write the resulting snapshot here.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Download a book's canvas.
    Pull {
        book_id: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Upload a snapshot as a book's canvas.
    Push { book_id: String, snapshot: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Inspect { snapshot } => inspect(&snapshot),
        Command::Visible { snapshot, width, height } => visible(&snapshot, width, height),
        Command::Replay { snapshot, script, out } => run_replay(&snapshot, &script, out.as_deref()),
        Command::Pull { book_id, out } => {
            let snapshot = BookClient::new(&cli.base_url).pull(&book_id).await?;
            tracing::info!(%book_id, shapes = snapshot.shape_elements.len(), arrows = snapshot.curve_elements.len(), "pulled canvas");
            match out {
                Some(path) => write_snapshot(&path, &snapshot),
                None => print_json(&serde_json::to_value(&snapshot)?),
            }
        }
        Command::Push { book_id, snapshot } => {
            let snapshot = read_snapshot(&snapshot)?;
            BookClient::new(&cli.base_url).push(&book_id, &snapshot).await?;
            tracing::info!(%book_id, "pushed canvas");
            Ok(())
        }
    }
}

fn inspect(path: &Path) -> Result<(), CliError> {
    let core = load_core(path)?;
    let issues = core.store.integrity_issues();
    if !issues.is_empty() {
        tracing::warn!(count = issues.len(), "snapshot has integrity issues");
    }
    let camera = core.camera();
    print_json(&json!({
        "shapes": core.store.list_shapes().len(),
        "arrows": core.store.list_arrows().len(),
        "offset": { "x": camera.pan_x, "y": camera.pan_y },
        "scale": camera.zoom,
        "issues": serde_json::to_value(&issues)?,
    }))
}

fn visible(path: &Path, width: f64, height: f64) -> Result<(), CliError> {
    let mut core = load_core(path)?;
    core.set_viewport(width, height, 1.0);
    let shapes: Vec<Value> =
        core.visible_shapes().iter().map(|s| json!({ "id": s.id, "type": s.kind.name() })).collect();
    let arrows: Vec<&str> = core.visible_arrows().iter().map(|a| a.id.as_str()).collect();
    print_json(&json!({
        "viewport": core.viewport.rect(),
        "shapes": shapes,
        "arrows": arrows,
    }))
}

fn run_replay(snapshot: &Path, script: &Path, out: Option<&Path>) -> Result<(), CliError> {
    let core = load_core(snapshot)?;
    let events = parse_script(&read_file(script)?)?;
    let mut replayer = Replayer::new(core);
    replayer.run(&events)?;
    if let Some(out) = out {
        write_snapshot(out, &replayer.core.snapshot())?;
    }
    print_json(&serde_json::to_value(replayer.summary())?)
}

fn load_core(path: &Path) -> Result<EngineCore, CliError> {
    let mut core = EngineCore::with_config(config::engine_config_from_env());
    core.load_snapshot(read_snapshot(path)?);
    Ok(core)
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.display().to_string(), source })
}

fn read_snapshot(path: &Path) -> Result<Snapshot, CliError> {
    Ok(Snapshot::from_json(&read_file(path)?)?)
}

fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), CliError> {
    std::fs::write(path, snapshot.to_json()?)
        .map_err(|source| CliError::Write { path: path.display().to_string(), source })?;
    tracing::info!(path = %path.display(), "wrote snapshot");
    Ok(())
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
