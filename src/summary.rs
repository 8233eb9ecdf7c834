use polars::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::stats::pearson;

/// Charges statistics for one level of a grouping column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub group: String,
    pub count: u64,
    pub mean: f64,
    pub median: f64,
    /// `None` when the group is too small for a sample standard deviation.
    pub std_dev: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Correlation {
    pub feature: String,
    pub with_charges: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExploratorySummary {
    pub records: usize,
    pub by_smoker: Vec<GroupStats>,
    pub by_region: Vec<GroupStats>,
    pub correlations: Vec<Correlation>,
}

impl ExploratorySummary {
    pub fn group(&self, smoker: &str) -> Option<&GroupStats> {
        self.by_smoker.iter().find(|g| g.group == smoker)
    }
}

pub fn summarize(df: &DataFrame) -> Result<ExploratorySummary> {
    let charges = float_column(df, "charges")?;
    let correlations = ["age", "bmi", "children"]
        .iter()
        .map(|feature| {
            let values = float_column(df, feature)?;
            let (xs, ys): (Vec<f64>, Vec<f64>) = values
                .iter()
                .zip(&charges)
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .unzip();
            Ok(Correlation {
                feature: feature.to_string(),
                with_charges: pearson(&xs, &ys),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ExploratorySummary {
        records: df.height(),
        by_smoker: charges_by(df, "smoker")?,
        by_region: charges_by(df, "region")?,
        correlations,
    })
}

fn charges_by(df: &DataFrame, key: &str) -> Result<Vec<GroupStats>> {
    let grouped = df
        .clone()
        .lazy()
        .groupby([col(key)])
        .agg([
            col("charges").count().cast(DataType::UInt64).alias("count"),
            col("charges").mean().alias("mean"),
            col("charges").median().alias("median"),
            col("charges").std(1).alias("std"),
        ])
        .sort(key, SortOptions::default())
        .collect()?;

    let groups = grouped.column(key)?.utf8()?;
    let counts = grouped.column("count")?.u64()?;
    let means = grouped.column("mean")?.f64()?;
    let medians = grouped.column("median")?.f64()?;
    let stds = grouped.column("std")?.f64()?;

    Ok((0..grouped.height())
        .map(|i| GroupStats {
            group: groups.get(i).unwrap_or_default().to_string(),
            count: counts.get(i).unwrap_or_default(),
            mean: means.get(i).unwrap_or(f64::NAN),
            median: medians.get(i).unwrap_or(f64::NAN),
            std_dev: stds.get(i).filter(|s| s.is_finite()),
        })
        .collect())
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df.column(name)?.cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}
