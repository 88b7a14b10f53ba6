use crate::ComponentWriter;
use abshop::data::Promo;
use abshop::stats::GaussianKde;
use abshop::AbShopResult;
use chrono::NaiveDate;
use plotly::box_plot::{BoxMean, BoxPoints};
use plotly::common::{Line, Marker, Mode, Title};
use plotly::histogram::Bins;
use plotly::layout::{Axis, BarMode};
use plotly::{BoxPlot, Histogram, Layout, NamedColor, Plot, Rgb, Scatter};
use std::collections::BTreeMap;
use std::ops::Deref;
use std::path::Path;

/// NOTE: due to the orphan rule, we need the `PlotComponent` bound
/// for implementing ComponentWriter generically rather than for `Plot` directly
pub trait PlotComponent: Deref<Target = Plot> {}
impl<T> PlotComponent for T where T: Deref<Target = Plot> {}

impl<T> ComponentWriter for T
where
    T: PlotComponent,
{
    fn write(&self, file: &Path) -> AbShopResult<()> {
        self.deref().to_html(file);
        Ok(())
    }
}

// https://igiagkiozis.github.io/plotly/content/recipes/statistical_charts/box_plots.html

fn promo_color(promo: &Promo) -> Rgb {
    match promo {
        Promo::Without => Rgb::new(55, 126, 184),
        Promo::With => Rgb::new(228, 26, 28),
    }
}

fn promo_name(promo: &Promo) -> String {
    format!("Promo = {}", promo)
}

fn date_label(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Equally sized bins covering `[min, max]`, `None` for a degenerate range.
pub(crate) fn equal_bins(min: f64, max: f64, n_bins: usize) -> Option<Bins> {
    if !(max > min) || n_bins == 0 {
        return None;
    }
    Some(Bins::new(min, max, (max - min) / n_bins as f64))
}

const KDE_POINTS: usize = 200;

/// Kernel density of `samples` over `[min, max]`, scaled from a density to the
/// expected number of observations per bin of width `bin_width`.
/// Empty if no bandwidth can be estimated.
pub(crate) fn kde_counts(
    samples: &[f64],
    min: f64,
    max: f64,
    bin_width: f64,
) -> Vec<(f64, f64)> {
    match GaussianKde::new(samples) {
        Some(kde) => {
            let scale = samples.len() as f64 * bin_width;
            kde.curve(min, max, KDE_POINTS)
                .into_iter()
                .map(|(x, density)| (x, density * scale))
                .collect()
        }
        None => Vec::with_capacity(0),
    }
}

/// The count of the fullest of `n_bins` equal bins over `[min, max]`.
/// The last bin is closed, values outside the range are not counted.
pub(crate) fn max_bin_count(values: &[f64], min: f64, max: f64, n_bins: usize) -> usize {
    if !(max > min) || n_bins == 0 {
        return values.len();
    }
    let width = (max - min) / n_bins as f64;
    let mut counts = vec![0; n_bins];
    for v in values.iter().filter(|v| (min..=max).contains(*v)) {
        let idx = (((v - min) / width) as usize).min(n_bins - 1);
        counts[idx] += 1;
    }
    counts.into_iter().max().unwrap_or_default()
}

pub struct HistogramComponent {
    plot: Plot,
    bins: Option<Bins>,
    // (start, end, bin width) of `bins`
    bin_range: Option<(f64, f64, f64)>,
}

impl Deref for HistogramComponent {
    type Target = Plot;
    fn deref(&self) -> &Self::Target {
        &self.plot
    }
}

impl HistogramComponent {
    pub fn new(title: &str) -> Self {
        let mut histogram = HistogramComponent {
            plot: Plot::new(),
            bins: None,
            bin_range: None,
        };
        histogram.set_layout(title);
        histogram
    }

    fn set_layout(&mut self, title: &str) {
        let layout = Layout::new()
            .bar_mode(BarMode::Overlay)
            .title(Title::new(title))
            .x_axis(Axis::new().title(Title::new("sales")).show_grid(true))
            .y_axis(
                Axis::new()
                    .title(Title::new("number of days"))
                    .show_grid(true),
            );
        self.plot.set_layout(layout);
    }

    /// Shared bins, so that the overlaid groups stay comparable.
    pub fn set_bins(&mut self, min: f64, max: f64, n_bins: usize) {
        self.bins = equal_bins(min, max, n_bins);
        self.bin_range = self
            .bins
            .as_ref()
            .map(|_| (min, max, (max - min) / n_bins as f64));
    }

    /// One histogram per group, each with its density curve on the count scale.
    pub fn add_groups(&mut self, sales_by_promo: &BTreeMap<Promo, Vec<f64>>) {
        for (promo, sales) in sales_by_promo.iter() {
            let histogram = Histogram::new(sales.clone())
                .name(promo_name(promo).as_str())
                .opacity(0.6)
                .marker(Marker::new().color(promo_color(promo)));

            if let Some(bins) = &self.bins {
                self.plot.add_trace(histogram.x_bins(bins.clone()));
            } else {
                self.plot.add_trace(histogram);
            }

            // without shared bins there is no bin width to scale the density to
            if let Some((min, max, bin_width)) = self.bin_range {
                let (xs, ys): (Vec<f64>, Vec<f64>) =
                    kde_counts(sales, min, max, bin_width).into_iter().unzip();
                if xs.is_empty() {
                    continue;
                }
                let kde_trace = Scatter::new(xs, ys)
                    .name(format!("{} (density)", promo_name(promo)).as_str())
                    .mode(Mode::Lines)
                    .line(Line::new().color(promo_color(promo)).width(2.0));
                self.plot.add_trace(kde_trace);
            }
        }
    }
}

pub struct BoxPlotComponent {
    plot: Plot,
}

impl Deref for BoxPlotComponent {
    type Target = Plot;
    fn deref(&self) -> &Self::Target {
        &self.plot
    }
}

impl BoxPlotComponent {
    pub fn new(title: &str) -> Self {
        let mut box_plot = BoxPlotComponent { plot: Plot::new() };
        box_plot.set_layout(title);
        box_plot
    }

    fn set_layout(&mut self, title: &str) {
        let layout = Layout::new()
            .title(Title::new(title))
            .x_axis(Axis::new().title(Title::new("Promo (0 = without, 1 = with promotion)")))
            .y_axis(
                Axis::new()
                    .title(Title::new("sales"))
                    .show_grid(true)
                    .zero_line(true)
                    .grid_width(1)
                    .zero_line_width(2),
            );
        self.plot.set_layout(layout);
    }

    pub fn add_groups(&mut self, sales_by_promo: &BTreeMap<Promo, Vec<f64>>) {
        for (promo, sales) in sales_by_promo.iter() {
            let box_plot = BoxPlot::new(sales.clone())
                .name(promo_name(promo).as_str())
                .marker(Marker::new().color(promo_color(promo)).size(4))
                .box_mean(BoxMean::StandardDeviation)
                .box_points(BoxPoints::Outliers)
                .line(Line::new().width(2.0));

            self.plot.add_trace(box_plot);
        }
    }
}

pub struct TimeSeriesComponent {
    plot: Plot,
}

impl Deref for TimeSeriesComponent {
    type Target = Plot;
    fn deref(&self) -> &Self::Target {
        &self.plot
    }
}

impl TimeSeriesComponent {
    pub fn new(title: &str) -> Self {
        let mut time_series = TimeSeriesComponent { plot: Plot::new() };
        time_series.set_layout(title);
        time_series
    }

    fn set_layout(&mut self, title: &str) {
        let ts_layout = Layout::new()
            .title(Title::new(title))
            .x_axis(Axis::new().title(Title::new("date")).show_grid(true))
            .y_axis(
                Axis::new()
                    .title(Title::new("mean sales per day"))
                    .show_grid(true),
            );
        self.plot.set_layout(ts_layout);
    }

    pub fn add(&mut self, daily_sales: &BTreeMap<Promo, Vec<(NaiveDate, f64)>>) {
        for (promo, ts) in daily_sales.iter() {
            let mut ts_dates = Vec::with_capacity(ts.len());
            let mut ts_values = Vec::with_capacity(ts.len());

            for (date, v) in ts.iter() {
                ts_dates.push(date_label(date));
                ts_values.push(*v);
            }

            let trace_ts = Scatter::new(ts_dates, ts_values)
                .name(promo_name(promo).as_str())
                .mode(Mode::LinesMarkers)
                .marker(Marker::new().color(promo_color(promo)).size(4));
            self.plot.add_trace(trace_ts);
        }
    }
}

pub struct BootstrapHistogramComponent {
    plot: Plot,
    // count of the fullest bin, the height of the interval lines
    max_count: usize,
}

impl Deref for BootstrapHistogramComponent {
    type Target = Plot;
    fn deref(&self) -> &Self::Target {
        &self.plot
    }
}

impl BootstrapHistogramComponent {
    pub fn new() -> Self {
        let mut histogram = BootstrapHistogramComponent {
            plot: Plot::new(),
            max_count: 0,
        };
        histogram.set_layout();
        histogram
    }

    fn set_layout(&mut self) {
        let layout = Layout::new()
            .bar_mode(BarMode::Overlay)
            .title(Title::new("Bootstrap distribution of the mean difference"))
            .x_axis(
                Axis::new()
                    .title(Title::new("mean sales with - without promo"))
                    .zero_line(true),
            )
            .y_axis(Axis::new().title(Title::new("frequency")).zero_line(true));
        self.plot.set_layout(layout);
    }

    /// Histogram of the bootstrap values in `n_bins` equal bins.
    pub fn add_total(&mut self, mean_differences: &[f64], n_bins: usize) {
        let (min, max) = mean_differences
            .iter()
            .fold((f64::MAX, f64::MIN), |(min, max), v| (min.min(*v), max.max(*v)));
        self.max_count = max_bin_count(mean_differences, min, max, n_bins);

        let total_histogram = Histogram::new(mean_differences.to_owned())
            .name("mean difference")
            .marker(Marker::new().color(NamedColor::Blue));
        match equal_bins(min, max, n_bins) {
            Some(bins) => self.plot.add_trace(total_histogram.x_bins(bins)),
            None => self.plot.add_trace(total_histogram),
        }
    }

    /// Vertical lines at the interval bounds, as high as the fullest bin.
    pub fn add_confidence_interval(&mut self, lower_bound: f64, upper_bound: f64) {
        let height = self.max_count.max(1) as f64;
        let ys_vertical = vec![0.0, height];
        let lb = vec![lower_bound, lower_bound];
        let ub = vec![upper_bound, upper_bound];
        let lb_trace = Scatter::new(lb, ys_vertical.clone())
            .name("lower confidence bound")
            .mode(Mode::Lines);
        self.plot.add_trace(lb_trace);
        let ub_trace = Scatter::new(ub, ys_vertical)
            .name("upper confidence bound")
            .mode(Mode::Lines);
        self.plot.add_trace(ub_trace);
    }
}
