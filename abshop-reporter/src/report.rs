use crate::plots::{
    BootstrapHistogramComponent, BoxPlotComponent, HistogramComponent, TimeSeriesComponent,
};
use crate::{write_summary_html, ComponentWriter};
use abshop::{AbShopResult, AnalysisConfig, AnalysisSummary};
use chrono::Utc;
use log::{info, warn};
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

const BOOTSTRAP_BINS: usize = 50;
const COMPONENTS_DIR: &str = "components";
const DATA_DIR: &str = "data";
const FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const HIST_PATH: &str = "hist";

#[derive(Serialize)]
struct ReportMeta {
    start_time: String,
    end_time: String,
    config: AnalysisConfig,
}

impl<'a> From<&ReportFactory<'a>> for ReportMeta {
    fn from(rf: &ReportFactory<'a>) -> Self {
        Self {
            start_time: format!("{}", rf.summary.start_time.format(FORMAT)),
            end_time: format!("{}", rf.summary.end_time.format(FORMAT)),
            config: rf.config.clone(),
        }
    }
}

fn create_dir(dir: &Path) -> AbShopResult<()> {
    if dir.exists() && dir.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Moves the files of a previous run into `hist/<timestamp>`.
fn hist_results(from_dir: &Path) -> AbShopResult<()> {
    if !from_dir.exists() {
        return Ok(());
    }

    let copy_dir = from_dir
        .join(HIST_PATH)
        .join(Utc::now().format("%Y-%m-%d__%H_%M_%S").to_string());

    create_dir(&copy_dir)?;

    for entry in fs::read_dir(from_dir)? {
        let entry = entry?;
        let src_path = entry.path();
        if !src_path.is_dir() {
            let target_file = copy_dir.join(entry.file_name());
            fs::rename(src_path.as_os_str(), target_file)?;
        }
    }

    Ok(())
}

fn setup_report_structure(path: &Path) -> AbShopResult<(PathBuf, PathBuf)> {
    create_dir(path)?;

    let report_file = path.join("report.html");
    if !report_file.exists() {
        let template = include_str!("./templates/report_template.html");
        fs::write(report_file, template)?;
    }

    let components_dir = path.join(COMPONENTS_DIR);
    create_dir(&components_dir)?;

    let data_dir = path.join(DATA_DIR);
    create_dir(&data_dir)?;

    info!("Creating report in {:?}", path.as_os_str());
    Ok((components_dir, data_dir))
}

/// Serializes the data, creates or updates the file and its contents.
fn write_or_update<D: Serialize>(serializable_data: &D, file: PathBuf) -> AbShopResult<()> {
    let json = serde_json::to_string_pretty(serializable_data)?;
    fs::write(file, json)?;
    Ok(())
}

pub struct ReportFactory<'a> {
    config: &'a AnalysisConfig,
    summary: &'a AnalysisSummary,
}

impl<'a> ReportFactory<'a> {
    pub fn new(config: &'a AnalysisConfig, summary: &'a AnalysisSummary) -> Self {
        Self { config, summary }
    }

    fn dump_data(&self, dir: PathBuf) -> AbShopResult<()> {
        let summary_file = dir.join("summary.json");
        let meta_file = dir.join("meta.json");

        if summary_file.exists() | meta_file.exists() {
            if let Err(err) = hist_results(&dir) {
                warn!("Overwriting existing results: {}", err);
            }
        }

        let report_meta = ReportMeta::from(self);

        // creates or updates the files and its contents
        write_or_update(self.summary, summary_file)?;
        write_or_update(&report_meta, meta_file)?;

        Ok(())
    }

    fn create_components(&self, components_dir: Option<PathBuf>) -> AbShopResult<()> {
        let summary = self.summary;
        let dataset = &summary.dataset;
        let sales_by_promo = dataset.sales_by_promo();
        let scope = summary.filter.to_string();

        let mut histogram = HistogramComponent::new(&format!("Sales distribution ({})", scope));
        let mut box_plot = BoxPlotComponent::new(&format!("Sales box plot ({})", scope));
        let mut time_series_plot =
            TimeSeriesComponent::new(&format!("Sales over time ({})", scope));
        let mut bs_histogram = BootstrapHistogramComponent::new();

        let all_sales = sales_by_promo.values().flatten().copied();
        let (min, max) = all_sales.fold((f64::MAX, f64::MIN), |(min, max), v| {
            (min.min(v), max.max(v))
        });
        histogram.set_bins(min, max, self.config.histogram_bins());
        histogram.add_groups(&sales_by_promo);
        box_plot.add_groups(&sales_by_promo);
        time_series_plot.add(&dataset.daily_mean_sales());

        if let Some(bootstrap) = &summary.bootstrap {
            bs_histogram.add_total(&bootstrap.mean_differences, BOOTSTRAP_BINS);
            bs_histogram.add_confidence_interval(bootstrap.lower_bound, bootstrap.upper_bound);
        }

        match &components_dir {
            Some(dir) => {
                write_summary_html(summary, &dir.join("summary.html"))?;
                histogram.write(&dir.join("sales_histogram.html"))?;
                box_plot.write(&dir.join("sales_box_plot.html"))?;
                time_series_plot.write(&dir.join("sales_time_series.html"))?;
                bs_histogram.write(&dir.join("bootstrap_histogram.html"))?;
            }
            None => {
                histogram.show();
                box_plot.show();
                time_series_plot.show();
            }
        }

        Ok(())
    }

    pub fn create_report(&self) -> AbShopResult<()> {
        if let Some(report_path) = &self.config.report_directory {
            let path = Path::new(report_path);
            let (components_dir, data_dir) = setup_report_structure(path)?;

            self.dump_data(data_dir)?;
            self.create_components(Some(components_dir))?;
        } else if self.config.show_plots() {
            self.create_components(None)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abshop::data::{Dataset, RecordFilter};
    use abshop::Analysis;

    const CSV: &str = "date,store,sales,promo,holiday
2023-01-01,1,205.0,1,0
2023-01-02,1,221.0,1,0
2023-01-03,1,198.0,1,0
2023-01-04,1,182.0,0,0
2023-01-05,1,179.0,0,0
2023-01-06,1,195.0,0,0
";

    #[test]
    fn test_create_report() {
        let report_dir = std::env::temp_dir().join(format!("abshop-report-{}", std::process::id()));
        let _ = fs::remove_dir_all(&report_dir);

        let config = AnalysisConfig::new("store_sales.csv".to_string(), RecordFilter::all())
            .with_report_directory(Some(report_dir.to_string_lossy().to_string()));
        let dataset = Dataset::from_reader(CSV.as_bytes()).unwrap();
        let summary = Analysis::init(&config)
            .unwrap()
            .analyze(&dataset, Utc::now())
            .unwrap();

        let factory = ReportFactory::new(&config, &summary);
        factory.create_report().unwrap();

        assert!(report_dir.join("report.html").exists());
        assert!(report_dir.join(COMPONENTS_DIR).join("summary.html").exists());
        assert!(report_dir
            .join(COMPONENTS_DIR)
            .join("sales_histogram.html")
            .exists());

        let json = fs::read_to_string(report_dir.join(DATA_DIR).join("summary.json")).unwrap();
        let dumped: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(dumped["test_result"]["sample_size_a"], 3);

        // a second run archives the previous data files
        factory.create_report().unwrap();
        assert!(report_dir.join(DATA_DIR).join(HIST_PATH).is_dir());

        fs::remove_dir_all(&report_dir).unwrap();
    }
}
