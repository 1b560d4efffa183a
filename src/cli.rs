//! `afmb` command line: JSON files in, JSON out.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::convert::{AttributesMap, round_trip, to_afm, to_vis_obj};
use crate::model::{Afm, ChartKind, ResultHeader, Transformation, VisualizationObject};

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "AFMB_LOG";

#[derive(Parser, Debug)]
#[command(name = "afmb")]
#[command(about = "Convert between Visualization Objects and AFM executions")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, value_name = "PATH", env = "AFMB_CONFIG", help = "Config file to use instead of the default location")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "More logging on stderr (-v debug, -vv trace)")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Convert a Visualization Object into an AFM and Transformation")]
    ToAfm {
        #[arg(value_name = "VIS_OBJ", help = "Visualization Object JSON file")]
        vis_obj: PathBuf,
        #[arg(long, value_name = "PATH", help = "Attribute to display-form table (JSON object)")]
        attributes: Option<PathBuf>,
        #[arg(long, help = "Pretty-print the output")]
        pretty: bool,
    },
    #[command(about = "Rebuild a Visualization Object from an AFM execution")]
    ToVisObj {
        #[arg(long = "type", value_name = "KIND", help = "Chart type of the result")]
        kind: Option<ChartKind>,
        #[arg(long, value_name = "PATH", help = "AFM JSON file")]
        afm: PathBuf,
        #[arg(long, value_name = "PATH", help = "Transformation JSON file")]
        transformation: Option<PathBuf>,
        #[arg(long, value_name = "PATH", help = "Result headers JSON file")]
        headers: Option<PathBuf>,
        #[arg(long, value_name = "PATH", help = "Attribute to display-form table (JSON object)")]
        attributes: Option<PathBuf>,
        #[arg(long, help = "Pretty-print the output")]
        pretty: bool,
    },
    #[command(about = "Convert there and back and report what was lost")]
    RoundTrip {
        #[arg(value_name = "VIS_OBJ", help = "Visualization Object JSON file")]
        vis_obj: PathBuf,
        #[arg(long, value_name = "PATH", help = "Attribute to display-form table (JSON object)")]
        attributes: Option<PathBuf>,
    },
}

/// How a successful command ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// `round-trip` found entries that did not survive.
    Mismatch,
}

/// Execute `cli.command`, writing JSON to `out`.
pub fn run(cli: &Cli, config: &Config, out: &mut impl Write) -> Result<Outcome> {
    match &cli.command {
        Commands::ToAfm {
            vis_obj,
            attributes,
            pretty,
        } => {
            let vis_obj: VisualizationObject = read_json(vis_obj)?;
            let attributes = load_attributes(attributes.as_deref(), config)?;
            let bundle = to_afm(&vis_obj, &attributes);
            write_json(out, &bundle, *pretty || config.pretty)?;
            Ok(Outcome::Success)
        }
        Commands::ToVisObj {
            kind,
            afm,
            transformation,
            headers,
            attributes,
            pretty,
        } => {
            let kind = kind.unwrap_or(config.default_chart);
            let afm: Afm = read_json(afm)?;
            let transformation: Transformation = read_optional_json(transformation.as_deref())?;
            let headers: Vec<ResultHeader> = read_optional_json(headers.as_deref())?;
            let attributes = load_attributes(attributes.as_deref(), config)?;
            let vis_obj = to_vis_obj(kind, &afm, &transformation, &headers, &attributes)
                .context("AFM cannot be turned into a visualization object")?;
            write_json(out, &vis_obj, *pretty || config.pretty)?;
            Ok(Outcome::Success)
        }
        Commands::RoundTrip {
            vis_obj,
            attributes,
        } => {
            let vis_obj: VisualizationObject = read_json(vis_obj)?;
            let attributes = load_attributes(attributes.as_deref(), config)?;
            let report = round_trip(&vis_obj, &attributes)
                .context("round trip failed on the reverse conversion")?;
            for mismatch in &report.mismatches {
                warn!(%mismatch, "entry did not survive the round trip");
            }
            write_json(out, &report, config.pretty)?;
            Ok(if report.is_lossless() {
                Outcome::Success
            } else {
                Outcome::Mismatch
            })
        }
    }
}

/// The `--attributes` table, else the configured one, else an empty table.
fn load_attributes(flag: Option<&Path>, config: &Config) -> Result<AttributesMap> {
    match flag.or(config.attributes.as_deref()) {
        Some(path) => {
            let attributes: AttributesMap = read_json(path)?;
            debug!(path = %path.display(), entries = attributes.len(), "loaded attribute table");
            Ok(attributes)
        }
        None => Ok(AttributesMap::new()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn read_optional_json<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    path.map_or_else(|| Ok(T::default()), read_json)
}

fn write_json(out: &mut impl Write, value: &impl Serialize, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}
