use super::descriptive::{mean, percentile, sorted, standard_deviation, sum};
use crate::{AbShopError, AbShopResult};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};

/// Per group mean, median and count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow<L> {
    pub label: L,
    pub mean: f64,
    pub median: f64,
    pub count: usize,
}

/// Summarizes every group of `samples`, ordered by label.
///
/// Fails with [`AbShopError::EmptyGroup`] if any group has no observations,
/// in which case no rows are returned.
pub fn summarize<L>(samples: &BTreeMap<L, Vec<f64>>) -> AbShopResult<Vec<SummaryRow<L>>>
where
    L: Ord + Clone + Display,
{
    samples
        .iter()
        .map(|(label, values)| -> AbShopResult<SummaryRow<L>> {
            let stats = GroupStats::calculate(values).ok_or_else(|| AbShopError::EmptyGroup {
                label: label.to_string(),
            })?;
            Ok(SummaryRow {
                label: label.clone(),
                mean: stats.mean,
                median: stats.median,
                count: stats.count,
            })
        })
        .collect()
}

/// Renders rows as a plain table, e.g. for the console summary.
pub struct SummaryTable<'a, L>(pub &'a [SummaryRow<L>]);

impl<L: Display> Display for SummaryTable<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>6} | {:>14} | {:>14} | {:>8}", "Promo", "mean", "median", "count")?;
        for row in self.0.iter() {
            writeln!(
                f,
                "{:>6} | {:>14.2} | {:>14.2} | {:>8}",
                row.label, row.mean, row.median, row.count
            )?;
        }
        Ok(())
    }
}

/// Descriptive statistics of one group, as shown in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub quartile_fst: f64,
    pub median: f64,
    pub quartile_trd: f64,
    pub max: f64,
}

impl GroupStats {
    pub fn calculate(samples: &[f64]) -> Option<Self> {
        let mean = mean(samples)?;
        let std = standard_deviation(samples, mean);

        // sort the samples for quantiles
        let samples = sorted(samples);
        let n = samples.len();

        Some(GroupStats {
            count: n,
            total: sum(&samples),
            mean,
            std,
            min: samples[0],
            quartile_fst: percentile(&samples, 0.25),
            median: percentile(&samples, 0.5),
            quartile_trd: percentile(&samples, 0.75),
            max: samples[n - 1],
        })
    }
}

impl Display for GroupStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Count        | {}", self.count)?;
        writeln!(f, "Total        | {:.2}", self.total)?;
        writeln!(f, "Mean         | {:.2}", self.mean)?;
        if let Some(std) = self.std {
            writeln!(f, "StdDev       | {:.2}", std)?;
        }
        writeln!(f, "Min          | {:.2}", self.min)?;
        writeln!(f, "Quartile 1st | {:.2}", self.quartile_fst)?;
        writeln!(f, "Median       | {:.2}", self.median)?;
        writeln!(f, "Quartile 3rd | {:.2}", self.quartile_trd)?;
        write!(f, "Max          | {:.2}", self.max)
    }
}
