use super::classify::Category;
use super::table::{RawTable, TableSkip};
use crate::prevalence::PrevalenceRow;

/// `"18.7%"` → `18.7`. Anything that is not a finite number once the percent
/// signs are gone yields `None`.
pub fn parse_percentage(text: &str) -> Option<f64> {
    text.replace('%', "")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Turns the data rows of a classified table into prevalence rows, in order.
pub fn extract_rows(table: &RawTable, category: Category) -> Result<Vec<PrevalenceRow>, TableSkip> {
    let rows: Vec<PrevalenceRow> = table
        .rows
        .iter()
        .filter_map(|cells| {
            let group = cells.first()?.trim();
            if group.is_empty() {
                return None;
            }
            let percentage_text = cells.get(1).cloned().unwrap_or_default();
            Some(PrevalenceRow {
                category,
                group: group.to_string(),
                prevalence: parse_percentage(&percentage_text),
                percentage_text,
            })
        })
        .collect();

    if rows.iter().all(|row| row.prevalence.is_none()) {
        return Err(TableSkip::NoParsablePercentages { rows: rows.len() });
    }
    Ok(rows)
}
