use crate::data::RecordFilter;
use crate::{AbShopError, AbShopResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// TODO: allow comparing the groups of several stores in one run
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct AnalysisConfig {
    #[serde(alias = "dataPath")]
    pub data_path: String,

    #[serde(default)]
    pub filter: RecordFilter,

    /// Significance level of the t-test and of the bootstrap interval.
    alpha: Option<f64>,

    #[serde(alias = "histogramBins")]
    histogram_bins: Option<usize>,

    #[serde(alias = "numberBootstrapSamples")]
    #[serde(alias = "nBootstrapSamples")]
    n_bootstrap_samples: Option<usize>,

    seed: Option<u64>,

    #[serde(alias = "reportDirectory")]
    pub report_directory: Option<String>,

    #[serde(alias = "showPlots")]
    show_plots: Option<bool>,
}

const DEFAULT_ALPHA: f64 = 0.05;
const DEFAULT_BOOTSTRAP_SAMPLES: usize = 1_000;
const DEFAULT_SEED: u64 = 42;
const ALL_STORES_BINS: usize = 50;
const SINGLE_STORE_BINS: usize = 40;

impl AnalysisConfig {
    pub fn new(data_path: String, filter: RecordFilter) -> Self {
        Self {
            data_path,
            filter,
            ..Self::default()
        }
    }

    pub fn with_report_directory(mut self, report_directory: Option<String>) -> Self {
        self.report_directory = report_directory;
        self
    }

    pub fn with_show_plots(mut self, show_plots: bool) -> Self {
        self.show_plots = Some(show_plots);
        self
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_path)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha.unwrap_or(DEFAULT_ALPHA)
    }

    /// Fewer bins for a single store, which has fewer observations.
    pub fn histogram_bins(&self) -> usize {
        let default_bins = match self.filter.store_id {
            Some(_) => SINGLE_STORE_BINS,
            None => ALL_STORES_BINS,
        };
        self.histogram_bins.unwrap_or(default_bins).max(1)
    }

    pub fn n_bootstrap_samples(&self) -> usize {
        self.n_bootstrap_samples.unwrap_or(DEFAULT_BOOTSTRAP_SAMPLES)
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or(DEFAULT_SEED)
    }

    pub fn show_plots(&self) -> bool {
        self.show_plots.unwrap_or(true)
    }

    pub fn validate(&self) -> AbShopResult<()> {
        if self.data_path.trim().is_empty() {
            return Err(AbShopError::InvalidConfig {
                issue: "no data path given".to_string(),
            });
        }
        let alpha = self.alpha();
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(AbShopError::InvalidConfig {
                issue: format!("alpha has to be in (0, 1), got {}", alpha),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::new("sales.csv".to_string(), RecordFilter::all());
        assert_eq!(config.alpha(), 0.05);
        assert_eq!(config.histogram_bins(), 50);
        assert_eq!(config.n_bootstrap_samples(), 1_000);
        assert_eq!(config.seed(), 42);
        assert!(config.show_plots());
        assert!(config.validate().is_ok());

        let config = AnalysisConfig::new("sales.csv".to_string(), RecordFilter::usual_days(1));
        assert_eq!(config.histogram_bins(), 40);
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{
            "dataPath": "store_sales.csv",
            "filter": { "storeId": 3, "excludeHolidays": true },
            "alpha": 0.01,
            "histogramBins": 25,
            "reportDirectory": "report"
        }"#;
        let config: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.filter, RecordFilter::usual_days(3));
        assert_eq!(config.alpha(), 0.01);
        assert_eq!(config.histogram_bins(), 25);
        assert_eq!(config.report_directory.as_deref(), Some("report"));
    }

    #[test]
    fn test_validate() {
        let config = AnalysisConfig::new(" ".to_string(), RecordFilter::all());
        assert!(matches!(
            config.validate(),
            Err(AbShopError::InvalidConfig { .. })
        ));

        let mut config = AnalysisConfig::new("sales.csv".to_string(), RecordFilter::all());
        config.alpha = Some(1.5);
        assert!(config.validate().is_err());
    }
}
