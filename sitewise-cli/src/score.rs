//! Score command implementation for the Sitewise CLI.

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sitewise_core::{GeoEngine, TagSet};
use sitewise_scorer::{BusinessCatalog, DEFAULT_BUSINESS_TYPE};
use std::io::Write;

use crate::fs::require_existing;
use crate::{
    ARG_BUSINESS_TYPE, ARG_COMPETITOR, ARG_DATASET, ARG_LAT, ARG_LON, ARG_SUPPORT, CliError,
    DEFAULT_DATASET, ENV_LAT, ENV_LON, write_json,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score one location. Tags come from a built-in business \
                 type, or from explicit comma-separated competitor and \
                 support lists, which take precedence.",
    about = "Score a single location"
)]
#[ortho_config(prefix = "SITEWISE")]
pub(crate) struct ScoreArgs {
    /// Latitude in degrees.
    #[arg(long = ARG_LAT, value_name = "deg", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude in degrees.
    #[arg(long = ARG_LON, value_name = "deg", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Built-in business type supplying the tags.
    #[arg(long = ARG_BUSINESS_TYPE, value_name = "type")]
    #[serde(default)]
    pub(crate) business_type: Option<String>,
    /// Comma-separated competitor tags.
    #[arg(long = ARG_COMPETITOR, value_name = "tags")]
    #[serde(default)]
    pub(crate) competitor: Option<String>,
    /// Comma-separated support tags.
    #[arg(long = ARG_SUPPORT, value_name = "tags")]
    #[serde(default)]
    pub(crate) support: Option<String>,
    /// Path to the GeoJSON POI dataset.
    #[arg(long = ARG_DATASET, value_name = "path")]
    #[serde(default)]
    pub(crate) dataset: Option<Utf8PathBuf>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoreConfig {
    pub(crate) lat: f64,
    pub(crate) lon: f64,
    pub(crate) competitor: TagSet,
    pub(crate) support: TagSet,
    pub(crate) dataset: Utf8PathBuf,
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let lat = args.lat.ok_or(CliError::MissingArgument {
            field: ARG_LAT,
            env: ENV_LAT,
        })?;
        let lon = args.lon.ok_or(CliError::MissingArgument {
            field: ARG_LON,
            env: ENV_LON,
        })?;
        let (competitor, support) = if args.competitor.is_some() || args.support.is_some() {
            (
                split_tags(args.competitor.as_deref()),
                split_tags(args.support.as_deref()),
            )
        } else {
            profile_tags(args.business_type.as_deref())?
        };
        Ok(Self {
            lat,
            lon,
            competitor,
            support,
            dataset: args
                .dataset
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATASET)),
        })
    }
}

fn split_tags(list: Option<&str>) -> TagSet {
    list.map(|tags| tags.split(',').collect())
        .unwrap_or_default()
}

fn profile_tags(business_type: Option<&str>) -> Result<(TagSet, TagSet), CliError> {
    let catalog = BusinessCatalog::default();
    let name = business_type.unwrap_or(DEFAULT_BUSINESS_TYPE);
    let profile = catalog
        .get(name)
        .ok_or_else(|| CliError::UnknownBusinessType {
            business_type: name.to_owned(),
            known: catalog.names().collect::<Vec<_>>().join(", "),
        })?;
    Ok((profile.competitor.clone(), profile.support.clone()))
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_score_with(args, &mut stdout)
}

pub(crate) fn run_score_with(args: ScoreArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.dataset, ARG_DATASET)?;
    let engine = GeoEngine::load(&config.dataset)?;
    let result = engine.score(config.lat, config.lon, &config.competitor, &config.support)?;
    write_json(writer, &result)
}
