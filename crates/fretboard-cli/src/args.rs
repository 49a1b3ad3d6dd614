//! Command-line arguments for the fretboard binary.

use std::{net::IpAddr, path::PathBuf};

use clap::{Parser, Subcommand};

/// Render guitar fretboard diagrams
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render one diagram to an image file
    Render(RenderArgs),

    /// Serve diagrams over HTTP
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct RenderArgs {
    /// Diagram title, also used to name the output file
    #[arg(short, long)]
    pub title: Option<String>,

    /// Number of frets below the nut
    #[arg(short, long, allow_negative_numbers = true)]
    pub frets: Option<i64>,

    /// Note naming mode (sharp or flat)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Marker positions as STRING=FRET[,FRET...], e.g. `A=0,2` or `e=3`
    #[arg(short, long = "position", value_name = "STRING=FRETS", value_parser = parse_position)]
    pub positions: Vec<(String, Vec<i64>)>,

    /// JSON request file; flags override its fields
    #[arg(short, long, conflicts_with = "from_snapshot")]
    pub request: Option<PathBuf>,

    /// Re-render the snapshot saved under this title
    #[arg(
        long,
        value_name = "TITLE",
        conflicts_with_all = ["title", "frets", "mode", "positions"]
    )]
    pub from_snapshot: Option<String>,

    /// Output image path (default: <save_dir>/<title>.<ext>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also store a snapshot of the diagram
    #[arg(long)]
    pub save_snapshot: bool,
}

/// Parses `STRING=FRET[,FRET...]`. An empty fret list is allowed.
fn parse_position(value: &str) -> Result<(String, Vec<i64>), String> {
    let (key, frets) = value
        .split_once('=')
        .ok_or_else(|| format!("expected STRING=FRETS, got `{value}`"))?;

    let frets = frets
        .split(',')
        .map(str::trim)
        .filter(|fret| !fret.is_empty())
        .map(|fret| {
            fret.parse::<i64>()
                .map_err(|_| format!("invalid fret `{fret}` for string `{key}`"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((key.trim().to_string(), frets))
}

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = 5000)]
    pub port: u16,
}
