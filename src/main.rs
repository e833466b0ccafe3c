//! flowboard CLI entry point.
//!
//! Replays a command script against the editor and prints the resulting
//! diagram as JSON. Logs go to stderr so stdout stays machine-readable.

use std::fs;
use std::io::{self, Read, Write};
use std::process;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use flowboard::viewport::Bounds;
use flowboard::{Direction, EditorConfig, EditorError, Edge, Node, replay_script};

/// Replay diagram-editor commands and print the resulting graph as JSON.
#[derive(Parser, Debug)]
#[command(
    name = "flowboard",
    version = env!("FLOWBOARD_VERSION"),
    about = "Replay diagram-editor commands and print the resulting graph as JSON"
)]
struct Cli {
    /// Script file (reads from stdin if not provided)
    input: Option<String>,

    /// Start from the preset three-node diagram
    #[arg(short = 's', long = "sample")]
    sample: bool,

    /// Run a final layout (TB or LR) after the script
    #[arg(short = 'd', long = "direction")]
    direction: Option<String>,

    /// JSON config file
    #[arg(short = 'c', long = "config")]
    config: Option<String>,

    /// Single-line JSON instead of pretty-printed
    #[arg(long = "compact")]
    compact: bool,

    /// Write output to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Debug logging on stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    nodes: &'a [Node],
    edges: &'a [Edge],
    /// Bounds of the last viewport fit, if a layout ran.
    fit: Option<Bounds>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "flowboard=debug" } else { "flowboard=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<String, EditorError> {
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    let text = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let (mut editor, replay) = replay_script(&text, config, cli.sample)?;
    if let Some(dir) = &cli.direction {
        editor.layout(Direction::parse(dir)?);
    }
    tracing::info!(
        commands = replay.commands,
        layouts = replay.layouts,
        nodes = editor.store().node_count(),
        edges = editor.store().edge_count(),
        "script replayed"
    );

    let fit = editor.take_fit_request().or_else(|| replay.fits.last().copied());
    let output = Output {
        nodes: editor.store().nodes(),
        edges: editor.store().edges(),
        fit,
    };
    let json = if cli.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    Ok(json)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let rendered = match run(&cli) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    if let Some(ref path) = cli.output {
        if let Err(e) = fs::write(path, rendered + "\n") {
            eprintln!("error: cannot write '{}': {}", path, e);
            process::exit(1);
        }
    } else {
        println!("{}", rendered);
        if let Err(e) = io::stdout().flush() {
            eprintln!("error: cannot flush stdout: {}", e);
            process::exit(1);
        }
    }
}
