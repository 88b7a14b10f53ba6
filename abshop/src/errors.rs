use thiserror::Error;

#[derive(Error, Debug)]
pub enum AbShopError {
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerDe(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid record in line {line}: {issue}")]
    InvalidRecord { line: u64, issue: String },

    #[error("Invalid configuration: {issue}")]
    InvalidConfig { issue: String },

    #[error("Group '{label}' has no observations")]
    EmptyGroup { label: String },

    #[error("Group '{label}' has {size} observation(s), at least 2 are required")]
    InsufficientSampleSize { label: String, size: usize },

    #[error("Both groups have zero variance, the t-statistic is undefined")]
    DegenerateVariance,

    #[error("Group '{label}' contains a non-finite observation")]
    NonFiniteObservation { label: String },

    #[error("Distribution error: {0}")]
    Distribution(String),
}

pub type AbShopResult<T> = Result<T, AbShopError>;
