extern crate clap;

mod parser;

use abshop::data::RecordFilter;
use abshop::{AbShopResult, Analysis, AnalysisConfig};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{error, info, trace};
use parser::{from_data_path, parse_toml, ParseError};
use std::error::Error;

const LOG_LEVEL: &str = "LOG_LEVEL";
const DEFAULT_LEVEL: &str = "INFO";

#[derive(Subcommand, Debug)]
enum AnalysisArg {
    /// Read in an `analysis.toml` file at the location `file_name`.
    FromToml,
    /// Compare the sales of all stores on all days.
    All,
    /// Compare the sales of a single store on days without holiday.
    UsualDays {
        #[clap(short, long, default_value_t = 1)]
        store_id: u32,
    },
}

/// CLI to compare store sales with and without promotion.
#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct CliArgs {
    #[clap(subcommand)]
    cmd: AnalysisArg,
    /// The path to the analysis file.<br>
    /// Example: 'analysis_dir/analysis.toml'<br>
    /// Default value: 'analysis.toml' in current dir
    #[clap(short, long)]
    file_name: Option<String>,
    /// The sales CSV file, default 'store_sales.csv'.
    #[clap(short, long)]
    data: Option<String>,
    /// Write the report into this directory instead of opening the plots.
    #[clap(short, long)]
    report_dir: Option<String>,
    #[clap(long)]
    no_plots: bool,
}

const DEFAULT_TOML: &str = "analysis.toml";
const DEFAULT_DATA: &str = "store_sales.csv";

fn config_from_args(args: CliArgs) -> Result<AnalysisConfig, ParseError> {
    let data = args.data.unwrap_or_else(|| DEFAULT_DATA.to_string());
    let config = match args.cmd {
        AnalysisArg::FromToml => {
            trace!("Parsing TOML");
            let file_name = args.file_name.unwrap_or_else(|| DEFAULT_TOML.to_string());
            parse_toml(&file_name).map_err(|err| {
                error!("Unable to parse the analysis file: {}", err);
                err
            })?
        }
        AnalysisArg::All => from_data_path(data, RecordFilter::all()),
        AnalysisArg::UsualDays { store_id } => {
            from_data_path(data, RecordFilter::usual_days(store_id))
        }
    };

    let config = match args.report_dir {
        Some(dir) => config.with_report_directory(Some(dir)),
        None => config,
    };
    if args.no_plots {
        return Ok(config.with_show_plots(false));
    }
    Ok(config)
}

/// Runs the analysis and writes the report. A failed report is only logged,
/// a failed analysis is returned.
fn run(config: &AnalysisConfig) -> AbShopResult<()> {
    trace!("Initializing analysis with {:?}", config);
    let analysis = Analysis::init(config)?;
    let summary = analysis.run().map_err(|err| {
        error!("Analysis failed: {}", err);
        err
    })?;
    info!("{}", summary);

    let report = abshop_reporter::ReportFactory::new(config, &summary);
    if let Err(err) = report.create_report() {
        error!("Report creation failed: {}", err);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let log_level = std::env::var(LOG_LEVEL).unwrap_or_else(|_| DEFAULT_LEVEL.to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(&log_level)).init();

    let args = CliArgs::parse();
    let config = config_from_args(args)?;
    run(&config)?;

    trace!("Finished");
    Ok(())
}
