use std::path::Path;

use log::{info, warn};
use polars::prelude::DataFrame;
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::hypothesis::{region_charges_test, smoker_charges_test, AnovaTest, WelchTest};
use crate::loader::load_insurance;
use crate::prevalence::{write_prevalence_file, PrevalenceDataset};
use crate::records::InsuranceRecord;
use crate::regression::{train, ChargesForest, FeatureImportance, ModelMetrics};
use crate::scrape::fetch::PageSource;
use crate::summary::{summarize, ExploratorySummary};

/// Everything the statistical half of the report shows.
#[derive(Serialize)]
pub struct AnalysisReport {
    pub summary: ExploratorySummary,
    pub smoker_test: WelchTest,
    pub region_test: AnovaTest,
    pub model: ModelMetrics,
    pub importance: Vec<FeatureImportance>,
    #[serde(skip)]
    pub forest: ChargesForest,
}

pub fn run_analysis(df: &DataFrame, config: &AnalysisConfig) -> Result<AnalysisReport> {
    let summary = summarize(df)?;
    let records = InsuranceRecord::from_frame(df)?;

    let smoker_test = smoker_charges_test(&records, config.alpha)?;
    info!(
        "Welch t = {:.3}, df = {:.1}, p = {:.3e}",
        smoker_test.statistic, smoker_test.degrees_of_freedom, smoker_test.p_value
    );
    let region_test = region_charges_test(&records, config.alpha)?;
    info!(
        "ANOVA F = {:.3}, p = {:.3e}",
        region_test.f_statistic, region_test.p_value
    );

    let outcome = train(&records, &config.forest)?;
    info!(
        "Forest of {} trees: RMSE = {:.2}, R² = {:?}",
        config.forest.n_trees, outcome.metrics.rmse, outcome.metrics.r_squared
    );

    Ok(AnalysisReport {
        summary,
        smoker_test,
        region_test,
        model: outcome.metrics,
        importance: outcome.importance,
        forest: outcome.model,
    })
}

/// Pipeline A: load the insurance dataset and analyse it.
pub async fn analyze_insurance<S: PageSource>(
    source: &S,
    config: &AnalysisConfig,
) -> Result<AnalysisReport> {
    let df = load_insurance(source, &config.source).await?;
    info!("Loaded {} insurance records", df.height());
    run_analysis(&df, config)
}

/// Final step of pipeline B. Returns how many rows were written, or `None`
/// when there was nothing to publish.
pub fn publish_prevalence<P: AsRef<Path>>(
    dataset: &PrevalenceDataset,
    path: P,
) -> Result<Option<usize>> {
    let written = write_prevalence_file(&path, dataset)?;
    match written {
        Some(rows) => info!("Wrote {} row(s) to {}", rows, path.as_ref().display()),
        None => warn!("No prevalence data; {} not written", path.as_ref().display()),
    }
    Ok(written)
}
