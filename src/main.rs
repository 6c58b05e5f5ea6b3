use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use noteboard::board::Board;
use noteboard::config::BoardConfig;
use noteboard::geometry::{GestureOutcome, Layout, Point};
use noteboard::{ingest, render};

#[derive(Parser)]
#[command(name = "noteboard")]
#[command(about = "Weekly note board: load, inspect and reposition notes")]
struct Cli {
    /// Admin query (`admin=1&key=...`) granting the editing capability
    #[arg(long, global = true, env = "NOTEBOARD_ADMIN")]
    admin: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the feed and print the board
    Show {
        /// Print the snapshot as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the CSV export form of a sheet link
    Normalize { url: String },
    /// Compute the image box and note scale for a container size
    Layout {
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
    },
    /// Drag a note from one pointer position to another (admin only)
    Drag {
        id: String,
        /// Press position as X,Y in container pixels
        #[arg(long, value_parser = parse_point)]
        from: Point,
        /// Release position as X,Y in container pixels
        #[arg(long, value_parser = parse_point)]
        to: Point,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
    },
    /// Export positions as CSV plus a JSON backup
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Inspect or clear locally stored overrides (admin only)
    Overrides {
        #[command(subcommand)]
        action: OverridesAction,
    },
}

#[derive(Subcommand)]
enum OverridesAction {
    List,
    Clear,
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got `{}`", s))?;
    let x = x.trim().parse().map_err(|e| format!("invalid X: {}", e))?;
    let y = y.trim().parse().map_err(|e| format!("invalid Y: {}", e))?;
    Ok(Point::new(x, y))
}

/// Initialize tracing on stderr so stdout stays clean for output
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "noteboard=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = BoardConfig::load();
    let capability = config.capability(cli.admin.as_deref());
    let mut board = Board::new(config.clone(), capability);

    // Default: show the board
    match cli.command.unwrap_or(Commands::Show { json: false }) {
        Commands::Show { json } => {
            let snapshot = board.load().await;
            if json {
                println!("{}", serde_json::to_string_pretty(snapshot)?);
            } else {
                print!("{}", render::render_board(snapshot));
            }
        }
        Commands::Normalize { url } => {
            println!("{}", ingest::normalize(&url));
        }
        Commands::Layout { width, height } => {
            match Layout::compute(width, height, config.aspect_ratio, &config.scale) {
                Some(layout) => println!("{}", serde_json::to_string_pretty(&layout)?),
                None => anyhow::bail!("Container {}x{} has no area", width, height),
            }
        }
        Commands::Drag {
            id,
            from,
            to,
            width,
            height,
        } => {
            if !capability.is_privileged() {
                anyhow::bail!("Dragging requires the admin capability");
            }
            board.load().await;
            board.resize(width, height);
            if board.frame().is_none() {
                anyhow::bail!("Container {}x{} has no area", width, height);
            }
            if !board.pointer_down(&id, from) {
                anyhow::bail!("No note with id `{}`", id);
            }
            board.pointer_move(to);
            match board.pointer_up(to) {
                Some(GestureOutcome::Moved { id, position }) => println!(
                    "Moved #{} to ({:.2}, {:.2}) {}°",
                    id, position.x, position.y, position.rotation
                ),
                Some(GestureOutcome::Click { id }) => println!("#{} was clicked, not moved", id),
                None => println!("Nothing to do"),
            }
        }
        Commands::Export { out } => {
            board.load().await;
            let export = board.export()?;
            match out {
                Some(path) => {
                    std::fs::write(&path, export)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!("Wrote export to {}", path.display());
                }
                None => print!("{}", export),
            }
        }
        Commands::Overrides { action } => {
            if !capability.is_privileged() {
                anyhow::bail!("Overrides are only available with the admin capability");
            }
            match action {
                OverridesAction::List => {
                    let overrides = board.store().load();
                    println!("{}", serde_json::to_string_pretty(&overrides)?);
                }
                OverridesAction::Clear => {
                    board.store().clear()?;
                    println!("Cleared overrides in {}", board.store().path().display());
                }
            }
        }
    }

    Ok(())
}
