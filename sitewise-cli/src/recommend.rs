//! Recommend command implementation for the Sitewise CLI.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sitewise_core::GeoEngine;
use sitewise_scorer::{RankingMethod, RecommendRequest, Recommender};
use std::io::{BufReader, Write};

use crate::fs::{open_utf8_file, require_existing};
use crate::{
    ARG_DATASET, ARG_METHOD, ARG_REQUEST, CliError, DEFAULT_DATASET, ENV_REQUEST, Envelope,
    write_json,
};

/// CLI arguments for the `recommend` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Rank candidate locations for a business type. The request \
                 is a JSON file with a business_type and a map of \
                 alternatives (lat, lon, reviews, rent_cost). The POI \
                 dataset is a GeoJSON FeatureCollection of points.",
    about = "Rank candidate business locations"
)]
#[ortho_config(prefix = "SITEWISE")]
pub(crate) struct RecommendArgs {
    /// Path to a JSON file containing a recommendation request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Path to the GeoJSON POI dataset.
    #[arg(long = ARG_DATASET, value_name = "path")]
    #[serde(default)]
    pub(crate) dataset: Option<Utf8PathBuf>,
    /// Ranking method: weighted-sum, topsis or saw.
    #[arg(long = ARG_METHOD, value_name = "method")]
    #[serde(default)]
    pub(crate) method: Option<RankingMethod>,
}

impl RecommendArgs {
    pub(crate) fn into_config(self) -> Result<RecommendConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RecommendConfig::try_from(merged)
    }
}

/// Resolved `recommend` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecommendConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Path to the GeoJSON dataset.
    pub(crate) dataset: Utf8PathBuf,
    /// How alternatives are ranked.
    pub(crate) method: RankingMethod,
}

impl RecommendConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.request_path, ARG_REQUEST)?;
        require_existing(&self.dataset, ARG_DATASET)?;
        Ok(())
    }
}

impl TryFrom<RecommendArgs> for RecommendConfig {
    type Error = CliError;

    fn try_from(args: RecommendArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_REQUEST,
        })?;
        Ok(Self {
            request_path,
            dataset: args
                .dataset
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATASET)),
            method: args.method.unwrap_or_default(),
        })
    }
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_recommend_with(args, &mut stdout)
}

pub(crate) fn run_recommend_with(
    args: RecommendArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    execute_recommend(&config, writer)
}

pub(crate) fn execute_recommend(
    config: &RecommendConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let request = load_request(&config.request_path)?;
    let engine = GeoEngine::load(&config.dataset)?;
    let recommender = Recommender::new(engine).with_method(config.method);
    let ranked = recommender.recommend(&request)?;
    info!(
        "wrote {} recommendations from {}",
        ranked.len(),
        config.request_path
    );
    write_json(
        writer,
        &Envelope::success("Recommendations computed.", ranked),
    )
}

/// Loads a JSON-encoded [`RecommendRequest`] from disk.
pub(crate) fn load_request(path: &Utf8Path) -> Result<RecommendRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseRequest {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RecommendConfig, CliError> {
    let merged = RecommendArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RecommendConfig::try_from(merged)
}
