use abshop::data::RecordFilter;
use abshop::AnalysisConfig;
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("File {0} does not exist")]
    MissingFile(String),

    #[error("Unable to read the file: {0}")]
    IO(#[from] std::io::Error),

    #[error("Unable to parse the TOML structure: {0}")]
    Toml(#[from] toml::de::Error),
}

pub fn parse_toml(file_name: &str) -> Result<AnalysisConfig, ParseError> {
    let file = Path::new(file_name);
    if !file.exists() {
        return Err(ParseError::MissingFile(file_name.to_string()));
    }

    let file_content = fs::read_to_string(file)?;
    from_toml_str(&file_content)
}

pub fn from_toml_str(content: &str) -> Result<AnalysisConfig, ParseError> {
    let config: AnalysisConfig = toml::from_str(content)?;
    Ok(config)
}

pub fn from_data_path(data_path: String, filter: RecordFilter) -> AnalysisConfig {
    AnalysisConfig::new(data_path, filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_str() {
        let content = r#"
dataPath = "store_sales.csv"
alpha = 0.01
histogramBins = 30
reportDirectory = "report"

[filter]
storeId = 1
excludeHolidays = true
"#;
        let config = from_toml_str(content).unwrap();
        assert_eq!(config.data_path, "store_sales.csv");
        assert_eq!(config.filter, RecordFilter::usual_days(1));
        assert_eq!(config.alpha(), 0.01);
        assert_eq!(config.histogram_bins(), 30);
        assert_eq!(config.report_directory.as_deref(), Some("report"));
    }

    #[test]
    fn test_sample_file() {
        let config = from_toml_str(include_str!("../../analysis.toml")).unwrap();
        assert_eq!(config.filter, RecordFilter::usual_days(1));
        assert_eq!(config.n_bootstrap_samples(), 1000);
        assert_eq!(config.seed(), 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = from_toml_str("data_path = \"sales.csv\"").unwrap();
        assert_eq!(config.filter, RecordFilter::all());
        assert_eq!(config.histogram_bins(), 50);
        assert!(config.report_directory.is_none());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            from_toml_str("alpha = 0.05"),
            Err(ParseError::Toml(_))
        ));
        assert!(matches!(
            parse_toml("does/not/exist.toml"),
            Err(ParseError::MissingFile(_))
        ));
    }
}
