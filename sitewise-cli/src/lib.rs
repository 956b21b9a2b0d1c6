//! Command-line interface for the Sitewise site recommender.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;

mod error;
mod fs;
mod recommend;
mod score;

pub use error::CliError;
use recommend::{RecommendArgs, run_recommend};
use score::{ScoreArgs, run_score};

pub(crate) const ARG_REQUEST: &str = "request";
pub(crate) const ARG_DATASET: &str = "dataset";
pub(crate) const ARG_METHOD: &str = "method";
pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_LON: &str = "lon";
pub(crate) const ARG_BUSINESS_TYPE: &str = "business-type";
pub(crate) const ARG_COMPETITOR: &str = "competitor";
pub(crate) const ARG_SUPPORT: &str = "support";
pub(crate) const ENV_REQUEST: &str = "SITEWISE_CMDS_RECOMMEND_REQUEST_PATH";
pub(crate) const ENV_LAT: &str = "SITEWISE_CMDS_SCORE_LAT";
pub(crate) const ENV_LON: &str = "SITEWISE_CMDS_SCORE_LON";

/// Dataset path used when neither flags, files nor environment name one.
pub(crate) const DEFAULT_DATASET: &str = "poi.geojson";

/// Run the Sitewise CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Recommend(args) => run_recommend(args),
        Command::Score(args) => run_score(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "sitewise",
    about = "Rank candidate business locations from a static POI dataset",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank the alternatives of a JSON recommendation request.
    Recommend(RecommendArgs),
    /// Score a single location against competitor and support tags.
    Score(ScoreArgs),
}

/// Response wrapper written by `recommend`.
#[derive(Debug, Serialize)]
pub(crate) struct Envelope<T> {
    code: u16,
    status: &'static str,
    message: &'static str,
    data: T,
}

impl<T> Envelope<T> {
    pub(crate) const fn success(message: &'static str, data: T) -> Self {
        Self {
            code: 200,
            status: "success",
            message,
            data,
        }
    }
}

/// Pretty-print `value` as JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(writer: &mut dyn Write, value: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
