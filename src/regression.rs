use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::config::ForestConfig;
use crate::error::{AnalysisError, Result};
use crate::records::{InsuranceRecord, Region, Sex, Smoker};
use crate::stats::{mean_squared_error, pearson};

pub type ChargesForest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

pub const FEATURES: [&str; 6] = ["age", "sex", "bmi", "children", "smoker", "region"];

type FeatureRow = [f64; FEATURES.len()];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelMetrics {
    pub train_size: usize,
    pub test_size: usize,
    pub rmse: f64,
    /// Squared Pearson correlation between held-out predictions and actuals.
    pub r_squared: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: &'static str,
    pub mse_increase: f64,
    pub percent_increase: f64,
}

pub struct RegressionOutcome {
    pub model: ChargesForest,
    pub metrics: ModelMetrics,
    /// Sorted by descending importance.
    pub importance: Vec<FeatureImportance>,
}

pub fn encode(record: &InsuranceRecord) -> FeatureRow {
    [
        record.age as f64,
        match record.sex {
            Sex::Female => 0.0,
            Sex::Male => 1.0,
        },
        record.bmi,
        record.children as f64,
        match record.smoker {
            Smoker::No => 0.0,
            Smoker::Yes => 1.0,
        },
        Region::ALL
            .iter()
            .position(|r| *r == record.region)
            .unwrap_or_default() as f64,
    ]
}

/// Fits the charges forest on a seeded train split and scores it on the rest.
pub fn train(records: &[InsuranceRecord], config: &ForestConfig) -> Result<RegressionOutcome> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let (train_idx, test_idx) = split_indices(records.len(), config.test_fraction, &mut rng)?;

    let rows = |idx: &[usize]| -> Vec<FeatureRow> {
        idx.iter().map(|&i| encode(&records[i])).collect()
    };
    let targets =
        |idx: &[usize]| -> Vec<f64> { idx.iter().map(|&i| records[i].charges).collect() };

    let x_train = rows(&train_idx);
    let y_train = targets(&train_idx);
    let x_test = rows(&test_idx);
    let y_test = targets(&test_idx);

    let parameters = RandomForestRegressorParameters::default()
        .with_n_trees(config.n_trees.into())
        .with_seed(config.seed);
    let model: ChargesForest =
        RandomForestRegressor::fit(&to_matrix(&x_train), &y_train, parameters)?;

    let predictions = model.predict(&to_matrix(&x_test))?;
    let base_mse = mse(&y_test, &predictions)?;
    let r_squared = pearson(&y_test, &predictions).map(|r| r * r);

    let mut importance = Vec::with_capacity(FEATURES.len());
    for (column, &feature) in FEATURES.iter().enumerate() {
        let mut permuted = x_test.clone();
        let mut values: Vec<f64> = permuted.iter().map(|row| row[column]).collect();
        values.shuffle(&mut rng);
        for (row, value) in permuted.iter_mut().zip(values) {
            row[column] = value;
        }
        let permuted_mse = mse(&y_test, &model.predict(&to_matrix(&permuted))?)?;
        let mse_increase = permuted_mse - base_mse;
        importance.push(FeatureImportance {
            feature,
            mse_increase,
            percent_increase: if base_mse > 0.0 {
                100.0 * mse_increase / base_mse
            } else {
                0.0
            },
        });
    }
    importance.sort_by(|a, b| b.mse_increase.total_cmp(&a.mse_increase));

    Ok(RegressionOutcome {
        model,
        metrics: ModelMetrics {
            train_size: train_idx.len(),
            test_size: test_idx.len(),
            rmse: base_mse.sqrt(),
            r_squared,
        },
        importance,
    })
}

fn split_indices(
    n: usize,
    test_fraction: f64,
    rng: &mut StdRng,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let test_n = ((n as f64 * test_fraction).round() as usize).max(1);
    if n < test_n + 2 {
        return Err(AnalysisError::InsufficientData(format!(
            "{} records cannot be split {:.0}/{:.0}",
            n,
            100.0 * (1.0 - test_fraction),
            100.0 * test_fraction
        )));
    }
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    let train = indices.split_off(test_n);
    Ok((train, indices))
}

fn to_matrix(rows: &[FeatureRow]) -> DenseMatrix<f64> {
    let values: Vec<f64> = rows.iter().flat_map(|row| row.iter().copied()).collect();
    DenseMatrix::new(rows.len(), FEATURES.len(), values, false)
}

fn mse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    mean_squared_error(actual, predicted).ok_or_else(|| {
        AnalysisError::InsufficientData("no held-out predictions to score".to_string())
    })
}
