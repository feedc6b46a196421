//! orgchart CLI
//!
//! Usage:
//!   orgchart render [OPTIONS] [FILE]
//!   orgchart generate [OPTIONS]
//!
//! `render` reads a TOML tree document (stdin when no file is given), applies
//! any toggles, lays it out and writes SVG. `generate` writes a random tree
//! document that `render` accepts.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use log::{debug, info, LevelFilter};

use orgchart::{
    generate, render_tree, GeneratorConfig, OrgTree, RenderConfig, Stylesheet, TreeError,
    PLACEMENT_LOG_TARGET,
};

#[derive(Parser, Debug)]
#[command(name = "orgchart")]
#[command(about = "Lay out org trees and render them as SVG")]
struct Cli {
    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a tree document to SVG
    Render(RenderArgs),
    /// Write a random tree document
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Tree document (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Config file with [layout] and [svg] sections (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stylesheet file for color palette (TOML format)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Toggle a node's expansion before layout; repeatable, applied in order
    #[arg(short, long = "toggle", value_name = "ID")]
    toggles: Vec<String>,

    /// Output file (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log every node placement to stderr
    #[arg(short, long)]
    debug: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Random seed; a fresh one is drawn when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Levels below the root
    #[arg(long, default_value_t = 5)]
    depth: usize,

    /// Nodes shallower than this start expanded
    #[arg(long, default_value_t = 2)]
    expanded_depth: usize,

    /// Output file (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    let mut logger = env_logger::Builder::from_env(env_logger::Env::default());
    logger.filter_level(log_level);
    // --debug shows the placement table whatever the global level is
    let debug_placements = matches!(&cli.command, Command::Render(args) if args.debug);
    if debug_placements && log_level < LevelFilter::Debug {
        logger.filter_module(PLACEMENT_LOG_TARGET, LevelFilter::Debug);
    }
    logger.init();
    debug!(command:? = cli.command; "Parsed arguments");

    let result = match &cli.command {
        Command::Render(args) => run_render(args),
        Command::Generate(args) => run_generate(args),
    };

    if let Err(message) = result {
        eprintln!("{message}");
        process::exit(1);
    }
    info!("Completed successfully");
}

fn run_render(args: &RenderArgs) -> Result<(), String> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::from_file(path)
            .map_err(|e| format!("Error loading config '{}': {}", path.display(), e))?,
        None => RenderConfig::default(),
    };
    if let Some(path) = &args.stylesheet {
        let stylesheet = Stylesheet::from_file(path)
            .map_err(|e| format!("Error loading stylesheet '{}': {}", path.display(), e))?;
        config = config.with_stylesheet(stylesheet);
    }
    config = config.with_debug(args.debug);

    let (source, filename) = read_input(args.input.as_deref())?;
    let mut tree = OrgTree::from_toml_str(&source, config.default_card_size())
        .map_err(|e| e.format(&source, &filename))?;

    for key in &args.toggles {
        let expanded = tree
            .toggle(key)
            .map_err(|e| format!("Error toggling '{}': {}", key, e))?;
        info!(key = key.as_str(), expanded; "Toggled node");
    }

    let svg = render_tree(&tree, &config).map_err(|e| format!("Error: {}", e))?;
    write_output(args.output.as_deref(), &svg)
}

fn run_generate(args: &GenerateArgs) -> Result<(), String> {
    let seed = args.seed.unwrap_or_else(rand::random::<u64>);
    info!(seed; "Generating tree");

    let config = GeneratorConfig::new(seed)
        .with_max_depth(args.depth)
        .with_expanded_depth(args.expanded_depth);
    let document = generate(&config)
        .and_then(|tree| tree.to_toml_string())
        .map_err(|e: TreeError| format!("Error: {}", e))?;
    write_output(args.output.as_deref(), &document)
}

fn read_input(path: Option<&Path>) -> Result<(String, String), String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .map(|content| (content, path.display().to_string()))
            .map_err(|e| format!("Error reading file '{}': {}", path.display(), e)),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("Error reading from stdin: {}", e))?;
            Ok((buffer, "<stdin>".to_string()))
        }
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), String> {
    match path {
        Some(path) => fs::write(path, content)
            .map_err(|e| format!("Error writing file '{}': {}", path.display(), e)),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
