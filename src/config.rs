use anyhow::{Context, Result};
use common::{Feature, TimeBucket};
use compute::RenderOptions;
use compute::charts::DEFAULT_RADAR_FEATURES;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use crate::cli::DataArgs;
use crate::schemas::AppState;

/// Default config file looked up in the working directory.
const DEFAULT_CONFIG_FILE: &str = "segdash";

/// Application settings.
///
/// Layered lowest to highest: built-in defaults, `segdash.toml` (or the file
/// given with `--config`), `SEGDASH_*` environment variables, CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Settings {
    /// CSV file with one row per purchase
    pub transactions_path: PathBuf,
    /// CSV file with one row per customer, cluster label included
    pub features_path: PathBuf,
    pub bind_address: String,
    /// Default time series granularity
    pub time_bucket: TimeBucket,
    /// Default number of histogram bins
    #[validate(range(min = 2, max = 200))]
    pub histogram_bins: usize,
    /// Features compared on the radar chart
    #[validate(length(min = 1))]
    pub radar_features: Vec<Feature>,
    #[validate(range(min = 1, max = 3600))]
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            transactions_path: PathBuf::from("data/transactions.csv"),
            features_path: PathBuf::from("data/customer_features_clustered.csv"),
            bind_address: "0.0.0.0:3000".to_string(),
            time_bucket: TimeBucket::Month,
            histogram_bins: 30,
            radar_features: DEFAULT_RADAR_FEATURES.to_vec(),
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Loads the layered settings. `bind_address` comes from the `serve`
    /// subcommand only.
    pub fn load(args: &DataArgs, bind_address: Option<&str>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let file = match &args.config {
            Some(path) => File::from(path.as_path()).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("SEGDASH")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("radar_features"),
            )
            .set_override_option("transactions_path", path_override(args.transactions.as_deref()))?
            .set_override_option("features_path", path_override(args.features.as_deref()))?
            .set_override_option("bind_address", bind_address.map(str::to_string))?
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.validate().context("Invalid configuration")?;
        debug!(?settings, "Settings loaded");
        Ok(settings)
    }

    /// Chart options used when a request does not override them.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            feature: Feature::Monetary,
            bins: self.histogram_bins,
            bucket: self.time_bucket,
            radar_features: self.radar_features.clone(),
        }
    }
}

fn path_override(path: Option<&Path>) -> Option<String> {
    path.map(|path| path.to_string_lossy().into_owned())
}

/// Load both tables and build the shared application state.
pub fn initialize_app_state(settings: Settings) -> Result<AppState> {
    info!(
        "Loading data from {} and {}",
        settings.transactions_path.display(),
        settings.features_path.display()
    );

    let data = model::load_segmentation_data(&settings.transactions_path, &settings.features_path)
        .context("Failed to load segmentation data")?;

    Ok(AppState {
        data: Arc::new(data),
        settings: Arc::new(settings),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.bind_address, "0.0.0.0:3000");
        assert_eq!(settings.histogram_bins, 30);
        assert_eq!(settings.time_bucket, TimeBucket::Month);
        assert_eq!(settings.radar_features.len(), 4);
    }

    #[test]
    fn test_bins_out_of_range_are_rejected() {
        let settings = Settings {
            histogram_bins: 1,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_config_file_and_cli_layers() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("segdash.toml");
        std::fs::write(
            &config_path,
            "histogram_bins = 12\ntime_bucket = \"week\"\nradar_features = [\"monetary\", \"recency\"]\ntransactions_path = \"from-file.csv\"\n",
        )
        .unwrap();

        let args = DataArgs {
            transactions: Some(PathBuf::from("from-cli.csv")),
            features: None,
            config: Some(config_path),
        };
        let settings = Settings::load(&args, Some("127.0.0.1:8080")).unwrap();

        assert_eq!(settings.histogram_bins, 12);
        assert_eq!(settings.time_bucket, TimeBucket::Week);
        assert_eq!(
            settings.radar_features,
            vec![Feature::Monetary, Feature::Recency]
        );
        assert_eq!(settings.transactions_path, PathBuf::from("from-cli.csv"));
        assert_eq!(settings.bind_address, "127.0.0.1:8080");
        assert_eq!(settings.request_timeout_secs, 30);
    }

    #[test]
    fn test_missing_data_is_an_error() {
        let settings = Settings {
            transactions_path: PathBuf::from("/nonexistent/transactions.csv"),
            ..Settings::default()
        };
        assert!(initialize_app_state(settings).is_err());
    }
}
