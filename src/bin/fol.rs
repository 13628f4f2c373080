use clap::{Parser, ValueEnum};
use fol_parser::{FormulaError, FormulaNode, FormulaParser, ParserConfig};
use std::io::{self, BufRead};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Pretty-printed formula
    Text,
    /// Syntax tree as JSON
    Json,
    /// Syntax tree in Rust debug notation
    Debug,
}

#[derive(Parser)]
#[command(author, version, about = "Parse first-order logic formulas", long_about = None)]
struct Cli {
    /// Path to parser config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Enable debug mode
    #[arg(short, long)]
    verbose: bool,

    /// Formulas to parse; one per line from stdin when omitted
    formulas: Vec<String>,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("{0}")]
    Formula(#[from] FormulaError),
    #[error("Failed to read stdin: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to serialize formula: {0}")]
    Json(#[from] serde_json::Error),
}

fn render(node: &FormulaNode, format: Format) -> Result<String, CliError> {
    Ok(match format {
        Format::Text => node.to_string(),
        Format::Json => serde_json::to_string_pretty(node)?,
        Format::Debug => format!("{:#?}", node),
    })
}

fn load_config(cli: &Cli) -> Result<ParserConfig, CliError> {
    let config = match &cli.config {
        Some(path) => ParserConfig::from_file(path)?,
        None => ParserConfig::default(),
    };
    debug!("config: {:?}", config);
    Ok(config)
}

fn read_sources(cli: &Cli) -> Result<Vec<String>, CliError> {
    if !cli.formulas.is_empty() {
        return Ok(cli.formulas.clone());
    }
    let mut sources = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            sources.push(line);
        }
    }
    Ok(sources)
}

/// Returns how many sources failed to parse.
fn run(cli: &Cli) -> Result<usize, CliError> {
    let parser = FormulaParser::new(load_config(cli)?);
    let sources = read_sources(cli)?;
    info!(count = sources.len(), "parsing formulas");

    let mut failures = 0;
    for source in &sources {
        match parser.parse(source) {
            Ok(node) => println!("{}", render(&node, cli.format)?),
            Err(e) => {
                failures += 1;
                eprintln!("{}", e);
            }
        }
    }
    Ok(failures)
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into())
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    match run(&cli) {
        Ok(0) => {}
        Ok(failures) => {
            debug!(failures, "some formulas failed to parse");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
