use crate::config::AnalysisConfig;
use crate::data::{Dataset, Promo, RecordFilter};
use crate::stats::{
    bootstrap_mean, check_sample, confidence_interval, summarize, welch_t_test, BootstrapSampler,
    GroupStats, PromoEffect, SummaryRow, SummaryTable, TestResult,
};
use crate::AbShopResult;
use chrono::{DateTime, Utc};
use log::{info, trace, warn};
use serde::Serialize;
use std::{collections::BTreeMap, fmt::Display};

#[derive(Debug, Clone, Serialize)]
pub struct BootstrapSummary {
    #[serde(skip_serializing)]
    pub mean_differences: Vec<f64>,
    pub n_samples: usize,
    pub seed: u64,
    pub alpha: f64,
    pub mean: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Outcome of comparing the sales with and without promotion.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub filter: RecordFilter,
    pub alpha: f64,

    /// The filtered records, kept for the plots.
    #[serde(skip_serializing)]
    pub dataset: Dataset,

    pub summary: Vec<SummaryRow<Promo>>,
    pub group_stats: BTreeMap<Promo, GroupStats>,
    /// With promo (A) against without promo (B).
    pub test_result: TestResult,
    pub effect: PromoEffect,
    pub bootstrap: Option<BootstrapSummary>,
}

impl Display for AnalysisSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "_______SUMMARY_[{}]___________", self.filter)?;
        write!(f, "{}", SummaryTable(&self.summary))?;

        for (promo, stats) in self.group_stats.iter() {
            writeln!(f, "_______PROMO_{}_({})_______", promo, promo.description())?;
            writeln!(f, "{}", stats)?;
        }

        writeln!(f, "_______WELCH_T-TEST_[with - without promo]______")?;
        writeln!(f, "{}", self.test_result)?;
        writeln!(f, "Outcome            | {}", self.effect)?;

        if let Some(bootstrap) = &self.bootstrap {
            writeln!(
                f,
                "_______BOOTSTRAP_[{} samples]__________________",
                bootstrap.n_samples
            )?;
            writeln!(f, "Mean difference    | {:.2}", bootstrap.mean)?;
            writeln!(
                f,
                "{:.0}% interval       | [{:.2}, {:.2}]",
                (1.0 - bootstrap.alpha) * 100.0,
                bootstrap.lower_bound,
                bootstrap.upper_bound
            )?;
        }

        writeln!(f, "_______________________________________________")
    }
}

pub struct Analysis<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> Analysis<'a> {
    pub fn init(config: &'a AnalysisConfig) -> AbShopResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Loads the configured data file and compares the promotion groups.
    pub fn run(&self) -> AbShopResult<AnalysisSummary> {
        let start_time = Utc::now();
        let dataset = Dataset::load(&self.config.data_path())?;
        self.analyze(&dataset, start_time)
    }

    pub fn analyze(
        &self,
        dataset: &Dataset,
        start_time: DateTime<Utc>,
    ) -> AbShopResult<AnalysisSummary> {
        let filter = self.config.filter.clone();
        let dataset = dataset.filter(&filter);
        if dataset.is_empty() {
            warn!("No records left after applying the filter '{}'", filter);
        }

        info!("Comparing {} records ({})", dataset.len(), filter);
        let groups = dataset.sales_by_promo();
        let summary = summarize(&groups)?;

        let with_promo = groups.get(&Promo::With).map(Vec::as_slice).unwrap_or(&[]);
        let without_promo = groups.get(&Promo::Without).map(Vec::as_slice).unwrap_or(&[]);
        check_sample(Promo::With.description(), with_promo)?;
        check_sample(Promo::Without.description(), without_promo)?;

        let test_result = welch_t_test(with_promo, without_promo)?;
        let alpha = self.config.alpha();
        let effect = test_result.effect(alpha);
        trace!("Welch's t-test: {:?}", test_result);

        let group_stats = groups
            .iter()
            .filter_map(|(promo, sales)| Some((*promo, GroupStats::calculate(sales)?)))
            .collect();

        let bootstrap = self.bootstrap(with_promo, without_promo);

        Ok(AnalysisSummary {
            start_time,
            end_time: Utc::now(),
            filter,
            alpha,
            dataset,
            summary,
            group_stats,
            test_result,
            effect,
            bootstrap,
        })
    }

    fn bootstrap(&self, with_promo: &[f64], without_promo: &[f64]) -> Option<BootstrapSummary> {
        let n_samples = self.config.n_bootstrap_samples();
        if n_samples == 0 {
            return None;
        }

        let seed = self.config.seed();
        let alpha = self.config.alpha();
        info!("Drawing {} bootstrap samples", n_samples);
        let mean_differences =
            BootstrapSampler::new(with_promo, without_promo, seed).mean_differences(n_samples);
        let (lower_bound, upper_bound) = confidence_interval(&mean_differences, alpha)?;
        let mean = bootstrap_mean(&mean_differences)?;

        Some(BootstrapSummary {
            mean_differences,
            n_samples,
            seed,
            alpha,
            mean,
            lower_bound,
            upper_bound,
        })
    }
}
