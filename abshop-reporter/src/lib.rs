mod html_report;
mod plots;
mod report;

pub(crate) use html_report::write_summary_html;
pub use plots::{
    BootstrapHistogramComponent, BoxPlotComponent, HistogramComponent, TimeSeriesComponent,
};
pub use report::ReportFactory;

use abshop::AbShopResult;
use std::path::Path;

pub trait ComponentWriter {
    fn write(&self, file: &Path) -> AbShopResult<()>;
}
