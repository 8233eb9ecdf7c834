use std::fmt::{self, Write};

use serde::Serialize;

use crate::pipeline::AnalysisReport;
use crate::prevalence::{PrevalenceDataset, PrevalenceRow};
use crate::summary::GroupStats;

const BAR_WIDTH: f64 = 40.0;

#[derive(Serialize)]
struct ReportDocument<'a> {
    analysis: Option<&'a AnalysisReport>,
    prevalence: &'a [PrevalenceRow],
}

pub fn render_json(
    analysis: Option<&AnalysisReport>,
    prevalence: &PrevalenceDataset,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ReportDocument {
        analysis,
        prevalence: prevalence.rows(),
    })
}

pub fn render_text(
    analysis: Option<&AnalysisReport>,
    prevalence: &PrevalenceDataset,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_report(&mut out, analysis, prevalence)?;
    Ok(out)
}

pub fn write_report<W: Write>(
    out: &mut W,
    analysis: Option<&AnalysisReport>,
    prevalence: &PrevalenceDataset,
) -> fmt::Result {
    writeln!(out, "== Smoking and medical insurance charges ==\n")?;
    match analysis {
        Some(report) => write_analysis(out, report)?,
        None => writeln!(out, "No insurance data available.")?,
    }
    writeln!(out, "\n== Adult cigarette smoking prevalence (CDC) ==\n")?;
    write_prevalence(out, prevalence)
}

fn write_analysis<W: Write>(out: &mut W, report: &AnalysisReport) -> fmt::Result {
    writeln!(out, "Records: {}\n", report.summary.records)?;
    write_groups(out, "Charges by smoking status", &report.summary.by_smoker)?;
    write_groups(out, "Charges by region", &report.summary.by_region)?;

    writeln!(out, "Correlation with charges:")?;
    for c in &report.summary.correlations {
        writeln!(out, "  {:<10} {:>7}", c.feature, or_na(c.with_charges, 3))?;
    }

    let welch = &report.smoker_test;
    writeln!(
        out,
        "\nWelch t-test (smokers vs non-smokers): t = {:.3}, df = {:.1}, p = {:.3e}",
        welch.statistic, welch.degrees_of_freedom, welch.p_value
    )?;
    writeln!(out, "  {}", conclusion(welch.reject_equal_means))?;

    let anova = &report.region_test;
    writeln!(
        out,
        "One-way ANOVA (region): F({:.0}, {:.0}) = {:.3}, p = {:.3e}",
        anova.df_between, anova.df_within, anova.f_statistic, anova.p_value
    )?;
    writeln!(out, "  {}", conclusion(anova.reject_equal_means))?;

    let model = &report.model;
    writeln!(
        out,
        "\nRandom forest ({} train / {} test): RMSE = {:.2}, R² = {}",
        model.train_size,
        model.test_size,
        model.rmse,
        or_na(model.r_squared, 3)
    )?;
    writeln!(out, "Feature importance (% increase in MSE when permuted):")?;
    for item in &report.importance {
        writeln!(out, "  {:<10} {:>8.1}", item.feature, item.percent_increase)?;
    }
    Ok(())
}

fn write_groups<W: Write>(out: &mut W, title: &str, groups: &[GroupStats]) -> fmt::Result {
    writeln!(out, "{}:", title)?;
    writeln!(
        out,
        "  {:<12} {:>6} {:>12} {:>12} {:>12}",
        "group", "n", "mean", "median", "sd"
    )?;
    for g in groups {
        writeln!(
            out,
            "  {:<12} {:>6} {:>12.2} {:>12.2} {:>12}",
            g.group,
            g.count,
            g.mean,
            g.median,
            or_na(g.std_dev, 2)
        )?;
    }
    writeln!(out)
}

fn write_prevalence<W: Write>(out: &mut W, dataset: &PrevalenceDataset) -> fmt::Result {
    if dataset.is_empty() {
        return writeln!(out, "No prevalence data available.");
    }
    for (category, rows) in dataset.by_category() {
        writeln!(out, "{}:", category)?;
        for row in rows {
            let bar = row
                .prevalence
                .map(|p| "#".repeat((p.clamp(0.0, 100.0) / 100.0 * BAR_WIDTH).round() as usize))
                .unwrap_or_default();
            writeln!(out, "  {:<32} {:>8} {}", row.group, row.percentage_text, bar)?;
        }
    }
    Ok(())
}

/// Fixed-precision number, or "n/a" when missing or not finite.
fn or_na(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", precision, v),
        _ => "n/a".to_string(),
    }
}

fn conclusion(reject: bool) -> &'static str {
    if reject {
        "Reject equal means at the 5% level."
    } else {
        "Cannot reject equal means at the 5% level."
    }
}
