use std::path::PathBuf;
use std::time::Duration;

pub static INSURANCE_URL: &str =
    "https://raw.githubusercontent.com/stedy/Machine-Learning-with-R-datasets/master/insurance.csv";
pub static CDC_PREVALENCE_URL: &str =
    "https://www.cdc.gov/tobacco/data_statistics/fact_sheets/adult_data/cig_smoking/index.htm";
/// Suggested when the CDC page cannot be reached.
pub static CDC_BULK_DATA_HINT: &str =
    "download the NHIS adult tobacco tables from https://www.cdc.gov/nchs/nhis/ instead";
pub static PREVALENCE_FILE_NAME: &str = "cdc_smoking_prevalence.csv";
pub static BLOCK_SELECTOR: &str = "div.card";
pub static LOG_ENV: &str = "SMOKING_REPORT_LOG";

pub const FETCH_TIMEOUT_SECS: u64 = 30;
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;
pub const TEST_FRACTION: f64 = 0.2;
pub const N_TREES: u16 = 500;
pub const SEED: u64 = 42;

/// Where the insurance CSV comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    Url(String),
    Path(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub url: String,
    pub block_selector: String,
    pub output_path: PathBuf,
    pub timeout: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            url: CDC_PREVALENCE_URL.to_string(),
            block_selector: BLOCK_SELECTOR.to_string(),
            output_path: PathBuf::from(PREVALENCE_FILE_NAME),
            timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForestConfig {
    pub n_trees: u16,
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: N_TREES,
            test_fraction: TEST_FRACTION,
            seed: SEED,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub source: DatasetSource,
    pub alpha: f64,
    pub forest: ForestConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            source: DatasetSource::Url(INSURANCE_URL.to_string()),
            alpha: SIGNIFICANCE_LEVEL,
            forest: ForestConfig::default(),
        }
    }
}
