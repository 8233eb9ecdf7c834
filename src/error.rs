use polars::prelude::PolarsError;
use thiserror::Error;

/// Failures of the statistical pipeline and the dataset writer.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("dataframe operation failed: {0}")]
    Polars(#[from] PolarsError),
    #[error("csv i/o failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("model fitting failed: {0}")]
    Model(#[from] smartcore::error::Failed),
    #[error("invalid distribution parameters: {0}")]
    Distribution(#[from] statrs::StatsError),
    #[error("invalid value {value:?} in column {column} at row {row}")]
    InvalidRecord {
        column: &'static str,
        row: usize,
        value: Option<String>,
    },
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    #[error("could not fetch dataset: {0}")]
    Fetch(#[from] crate::scrape::fetch::FetchError),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
