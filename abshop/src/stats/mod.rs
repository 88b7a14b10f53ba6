//! Group comparison: descriptive statistics per group and Welch's t-test,
//! plus the kernel density estimate drawn over the sales histograms.
//!
//! Everything in here is a pure function of its inputs, nothing logs.

mod bootstrap;
mod descriptive;
mod kde;
mod summary;
mod welch;

pub use bootstrap::{bootstrap_mean, confidence_interval, BootstrapSampler};
pub use descriptive::{mean, median, percentile, sorted, standard_deviation, sum, variance};
pub use kde::{scott_bandwidth, GaussianKde};
pub use summary::{summarize, GroupStats, SummaryRow, SummaryTable};
pub(crate) use welch::check_sample;
pub use welch::{two_tailed_p_value, welch_t_test, PromoEffect, TestResult};
