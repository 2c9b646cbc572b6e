//! Command line tool to inspect, validate and subset TrueType fonts.
//!
//! Logging is configured with the `RUST_LOG` environment variable.

use clap::{Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::path::PathBuf;
use subfont::{validate_file, Font};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tables, glyph count and cmap subtables of a font.
    Info {
        /// The input font file.
        path: PathBuf,
    },
    /// Check the checksums and structure of a font.
    Validate {
        /// The input font file.
        path: PathBuf,
    },
    /// Write a reduced version of a font.
    Subset(SubsetArgs),
}

#[derive(clap::Args, Debug)]
struct SubsetArgs {
    /// The input font file.
    #[arg(short, long)]
    path: PathBuf,

    /// The output font file
    #[arg(short, long)]
    output_file: PathBuf,

    /// Text whose characters should be kept
    #[arg(short, long)]
    text: Option<String>,

    /// List of unicode codepoints in hex, e.g. "41-5A,1F600"
    #[arg(short, long)]
    unicodes: Option<String>,

    /// List of glyph ids to keep without renumbering, e.g. "0-10,42"
    #[arg(short, long)]
    gids: Option<String>,

    /// Only keep the first N glyphs
    #[arg(long)]
    first: Option<u16>,

    /// How to keep the glyphs of the requested characters
    #[arg(short, long, value_enum, default_value_t = Mode::Exact)]
    mode: Mode,

    /// Comma separated tables to remove (cmap, post, name)
    #[arg(long, value_delimiter = ',')]
    prune: Vec<String>,

    /// Collapse redundant horizontal metrics
    #[arg(long)]
    optimize: bool,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum Mode {
    /// Keep exactly the requested glyphs and renumber them.
    Exact,
    /// Keep glyph ids and composite glyph components.
    Keep,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(args.command) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Info { path } => info(&Font::parse_file(path)?),
        Command::Validate { path } => {
            validate_file(&path)?;
            println!("{}: ok", path.display());
        }
        Command::Subset(args) => subset(args)?,
    }
    Ok(())
}

fn info(font: &Font) {
    println!("glyphs: {}", font.num_glyphs());
    println!("units per em: {}", font.units_per_em());
    if let Some(n) = font.number_of_h_metrics() {
        println!("horizontal metrics: {n}");
    }

    let tags: Vec<String> = font.table_tags().iter().map(ToString::to_string).collect();
    println!("tables: {}", tags.join(", "));

    for subtable in font.cmap_subtables() {
        println!(
            "cmap ({}, {}): {:?}, {} mappings",
            subtable.platform_id, subtable.encoding_id, subtable.format, subtable.num_mappings,
        );
    }
}

fn subset(args: SubsetArgs) -> Result<(), Box<dyn Error>> {
    let mut runes: Vec<char> = args.text.iter().flat_map(|text| text.chars()).collect();
    runes.extend(parse_unicodes(&args.unicodes.unwrap_or_default())?);
    let gids = args.gids.as_deref().map(parse_gids).transpose()?;

    let mut font = Font::parse_file(&args.path)?;

    if let Some(gids) = &gids {
        font = font.subset_keep_indices(gids)?;
    } else if !runes.is_empty() {
        font = match args.mode {
            Mode::Exact => font.subset(&runes)?,
            Mode::Keep => font.subset_keep_runes(&runes)?,
        };
    }

    if let Some(n) = args.first {
        font = font.subset_first(n)?;
    }

    let prune: Vec<&str> = args.prune.iter().map(String::as_str).collect();
    font.prune_tables(&prune);

    if args.optimize {
        font.optimize();
    }

    font.write_file(&args.output_file)?;
    Ok(())
}

/// Parse a list of hex code points and code point ranges.
fn parse_unicodes(input: &str) -> Result<Vec<char>, String> {
    let mut result = vec![];
    for cp in input.split([',', ' ']).filter(|raw| !raw.is_empty()) {
        let parse = |s: &str| {
            let s = s.trim_start_matches("U+").trim_start_matches("u+");
            u32::from_str_radix(s, 16).map_err(|_| format!("invalid unicode: {s}"))
        };

        let (start, end) = match cp.split_once('-') {
            Some((start, end)) => (parse(start)?, parse(end)?),
            None => (parse(cp)?, parse(cp)?),
        };

        if start > end {
            return Err(format!("invalid unicode range: {start:X}-{end:X}"));
        }

        result.extend((start..=end).filter_map(char::from_u32));
    }
    Ok(result)
}

/// Parse a list of glyph ids and glyph id ranges.
fn parse_gids(input: &str) -> Result<Vec<u16>, String> {
    let mut result = vec![];
    for gid in input.split([',', ' ']).filter(|raw| !raw.is_empty()) {
        let parse = |s: &str| s.parse::<u16>().map_err(|_| format!("invalid glyph id: {s}"));

        let (start, end) = match gid.split_once('-') {
            Some((start, end)) => (parse(start)?, parse(end)?),
            None => (parse(gid)?, parse(gid)?),
        };

        if start > end {
            return Err(format!("invalid glyph id range: {start}-{end}"));
        }

        result.extend(start..=end);
    }
    Ok(result)
}
