use serde::Serialize;
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

use crate::error::{AnalysisError, Result};
use crate::records::{InsuranceRecord, Region, Smoker};
use crate::stats::{mean, variance};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WelchTest {
    pub smoker_mean: f64,
    pub non_smoker_mean: f64,
    pub statistic: f64,
    pub degrees_of_freedom: f64,
    pub p_value: f64,
    pub reject_equal_means: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaTest {
    pub f_statistic: f64,
    pub df_between: f64,
    pub df_within: f64,
    pub p_value: f64,
    pub reject_equal_means: bool,
}

/// Welch's unequal-variance t-test of charges, smokers against non-smokers.
pub fn smoker_charges_test(records: &[InsuranceRecord], alpha: f64) -> Result<WelchTest> {
    let (smokers, non_smokers): (Vec<&InsuranceRecord>, Vec<&InsuranceRecord>) =
        records.iter().partition(|r| r.smoker == Smoker::Yes);
    let smokers: Vec<f64> = smokers.iter().map(|r| r.charges).collect();
    let non_smokers: Vec<f64> = non_smokers.iter().map(|r| r.charges).collect();
    welch_t_test(&smokers, &non_smokers, alpha)
}

/// One-way ANOVA of charges across the census regions present in `records`.
pub fn region_charges_test(records: &[InsuranceRecord], alpha: f64) -> Result<AnovaTest> {
    let groups: Vec<Vec<f64>> = Region::ALL
        .iter()
        .map(|region| {
            records
                .iter()
                .filter(|r| r.region == *region)
                .map(|r| r.charges)
                .collect::<Vec<f64>>()
        })
        .filter(|group| !group.is_empty())
        .collect();
    one_way_anova(&groups, alpha)
}

pub fn welch_t_test(a: &[f64], b: &[f64], alpha: f64) -> Result<WelchTest> {
    let (mean_a, var_a) = moments(a)?;
    let (mean_b, var_b) = moments(b)?;
    let se_a = var_a / a.len() as f64;
    let se_b = var_b / b.len() as f64;
    let se = se_a + se_b;
    if se == 0.0 {
        return Err(AnalysisError::InsufficientData(
            "both samples have zero variance".to_string(),
        ));
    }

    let statistic = (mean_a - mean_b) / se.sqrt();
    let degrees_of_freedom =
        se * se / (se_a * se_a / (a.len() - 1) as f64 + se_b * se_b / (b.len() - 1) as f64);
    let dist = StudentsT::new(0.0, 1.0, degrees_of_freedom)?;
    let p_value = (2.0 * dist.sf(statistic.abs())).min(1.0);

    Ok(WelchTest {
        smoker_mean: mean_a,
        non_smoker_mean: mean_b,
        statistic,
        degrees_of_freedom,
        p_value,
        reject_equal_means: p_value < alpha,
    })
}

pub fn one_way_anova(groups: &[Vec<f64>], alpha: f64) -> Result<AnovaTest> {
    if groups.len() < 2 {
        return Err(AnalysisError::InsufficientData(format!(
            "anova needs at least two groups, got {}",
            groups.len()
        )));
    }
    let all: Vec<f64> = groups.iter().flatten().copied().collect();
    let k = groups.len();
    let n = all.len();
    if n <= k {
        return Err(AnalysisError::InsufficientData(format!(
            "anova needs more observations ({}) than groups ({})",
            n, k
        )));
    }
    let grand_mean = mean(&all).unwrap_or_default();

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in groups {
        let group_mean = mean(group).unwrap_or_default();
        ss_between += group.len() as f64 * (group_mean - grand_mean).powi(2);
        ss_within += group.iter().map(|v| (v - group_mean).powi(2)).sum::<f64>();
    }
    if ss_within == 0.0 {
        return Err(AnalysisError::InsufficientData(
            "no variance within groups".to_string(),
        ));
    }

    let df_between = (k - 1) as f64;
    let df_within = (n - k) as f64;
    let f_statistic = (ss_between / df_between) / (ss_within / df_within);
    let dist = FisherSnedecor::new(df_between, df_within)?;
    let p_value = dist.sf(f_statistic);

    Ok(AnovaTest {
        f_statistic,
        df_between,
        df_within,
        p_value,
        reject_equal_means: p_value < alpha,
    })
}

fn moments(sample: &[f64]) -> Result<(f64, f64)> {
    match (mean(sample), variance(sample)) {
        (Some(m), Some(v)) => Ok((m, v)),
        _ => Err(AnalysisError::InsufficientData(format!(
            "sample of {} observations is too small",
            sample.len()
        ))),
    }
}
