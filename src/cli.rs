use std::collections::BTreeSet;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use crate::config::load_config;
use crate::error::SungearError;
use crate::ir::SetRegistry;
use crate::layout::compute_layout;
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::parser::{parse_filter, parse_lists};

#[derive(Parser, Debug)]
#[command(name = "sgr", version, about = "Sungear intersection-diagram layout in Rust")]
pub struct Args {
    /// Input file (.json/.gmt/.tsv/.csv) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output layout JSON. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Restrict the gene universe: a file of identifiers, a JSON genes
    /// body, or an inline comma-separated list
    #[arg(short = 'f', long = "filter")]
    pub filter: Option<String>,

    /// Config JSON file overriding the layout constants
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Seed for the relaxation jitter (reproducible layouts)
    #[arg(short = 's', long = "seed")]
    pub seed: Option<u64>,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    let input = read_input(args.input.as_deref())?;
    let parsed = parse_lists(&input)?;
    let filter = args
        .filter
        .as_deref()
        .map(read_filter)
        .transpose()?;

    let mut registry = SetRegistry::with_filter(parsed.lists, filter.as_ref())?;
    registry.set_metadata(parsed.metadata);
    let layout = compute_layout(&registry, &config)?;

    match args.output.as_deref() {
        Some(path) => write_layout_dump(path, &layout)?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, &LayoutDump::from_layout(&layout))?;
            handle.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        if !path.exists() {
            // The stored-input boundary: a missing source is not-found,
            // not an I/O failure.
            return Err(SungearError::SourceUnavailable.into());
        }
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// A filter argument is a path when one exists, otherwise an inline list.
fn read_filter(arg: &str) -> Result<BTreeSet<String>> {
    let path = Path::new(arg);
    if path.is_file() {
        return parse_filter(&std::fs::read_to_string(path)?);
    }
    parse_filter(arg)
}
