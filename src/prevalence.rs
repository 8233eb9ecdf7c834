use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::scrape::classify::Category;

pub static POPULATION_PLACEHOLDER: &str = "Not reported";

/// Smoking prevalence for one group of one scraped table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrevalenceRow {
    pub category: Category,
    pub group: String,
    pub percentage_text: String,
    pub prevalence: Option<f64>,
}

/// Rows from every accepted table, in page order. Never deduplicated.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PrevalenceDataset {
    rows: Vec<PrevalenceRow>,
}

impl PrevalenceDataset {
    pub fn append(&mut self, rows: Vec<PrevalenceRow>) {
        self.rows.extend(rows);
    }

    pub fn rows(&self) -> &[PrevalenceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Categories in order of first appearance, each with its rows.
    pub fn by_category(&self) -> Vec<(Category, Vec<&PrevalenceRow>)> {
        let mut groups: Vec<(Category, Vec<&PrevalenceRow>)> = Vec::new();
        for row in &self.rows {
            match groups.iter_mut().find(|(category, _)| *category == row.category) {
                Some((_, rows)) => rows.push(row),
                None => groups.push((row.category, vec![row])),
            }
        }
        groups
    }
}

/// Column layout of the published file.
#[derive(Debug, Serialize, Deserialize)]
struct PrevalenceRecord {
    #[serde(rename = "Category")]
    category: Category,
    #[serde(rename = "Group")]
    group: String,
    #[serde(rename = "Percentage")]
    percentage: String,
    #[serde(rename = "Population")]
    population: String,
    #[serde(rename = "Prevalence")]
    prevalence: Option<f64>,
}

pub fn write_prevalence<W: Write>(writer: W, dataset: &PrevalenceDataset) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in dataset.rows() {
        csv_writer.serialize(PrevalenceRecord {
            category: row.category,
            group: row.group.clone(),
            percentage: row.percentage_text.clone(),
            population: POPULATION_PLACEHOLDER.to_string(),
            prevalence: row.prevalence,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn read_prevalence<R: Read>(reader: R) -> Result<PrevalenceDataset> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut dataset = PrevalenceDataset::default();
    for record in csv_reader.deserialize() {
        let record: PrevalenceRecord = record?;
        dataset.rows.push(PrevalenceRow {
            category: record.category,
            group: record.group,
            percentage_text: record.percentage,
            prevalence: record.prevalence,
        });
    }
    Ok(dataset)
}

/// Writes `dataset` to `path`. Returns `None` without touching the file system
/// when there is nothing to write.
pub fn write_prevalence_file<P: AsRef<Path>>(
    path: P,
    dataset: &PrevalenceDataset,
) -> Result<Option<usize>> {
    if dataset.is_empty() {
        return Ok(None);
    }
    let file = File::create(path)?;
    write_prevalence(file, dataset)?;
    Ok(Some(dataset.len()))
}

pub fn read_prevalence_file<P: AsRef<Path>>(path: P) -> Result<PrevalenceDataset> {
    read_prevalence(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(category: Category, group: &str, text: &str, prevalence: Option<f64>) -> PrevalenceRow {
        PrevalenceRow {
            category,
            group: group.to_string(),
            percentage_text: text.to_string(),
            prevalence,
        }
    }

    fn dataset() -> PrevalenceDataset {
        let mut dataset = PrevalenceDataset::default();
        dataset.append(vec![
            row(Category::Sex, "Men", "13.1%", Some(13.1)),
            row(Category::Sex, "Women", "10.1%", Some(10.1)),
        ]);
        dataset.append(vec![
            row(Category::CensusRegion, "Northeast", "20.1%", Some(20.1)),
            row(Category::CensusRegion, "West, Pacific", "n/a", None),
        ]);
        dataset.append(vec![row(Category::Sex, "Men", "13.1%", Some(13.1))]);
        dataset
    }

    #[test]
    fn header_and_placeholder_are_fixed() {
        let mut buffer = Vec::new();
        write_prevalence(&mut buffer, &dataset()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Category,Group,Percentage,Population,Prevalence")
        );
        assert_eq!(lines.next(), Some("By Sex,Men,13.1%,Not reported,13.1"));
        assert!(text.contains("By U.S. Census Region,\"West, Pacific\",n/a,Not reported,\n"));
    }

    #[test]
    fn round_trip_keeps_pairs_in_order() {
        let original = dataset();
        let mut buffer = Vec::new();
        write_prevalence(&mut buffer, &original).unwrap();
        let reread = read_prevalence(buffer.as_slice()).unwrap();
        assert_eq!(reread, original);
        let pairs: Vec<(Category, &str)> = reread
            .rows()
            .iter()
            .map(|r| (r.category, r.group.as_str()))
            .collect();
        assert_eq!(pairs[2], (Category::CensusRegion, "Northeast"));
        assert_eq!(pairs.len(), 5);
    }

    #[test]
    fn rows_are_grouped_without_merging() {
        let data = dataset();
        let grouped = data.by_category();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, Category::Sex);
        assert_eq!(grouped[0].1.len(), 3);
        assert_eq!(grouped[1].1.len(), 2);
    }

    #[test]
    fn empty_dataset_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let written = write_prevalence_file(&path, &PrevalenceDataset::default()).unwrap();
        assert_eq!(written, None);
        assert!(!path.exists());
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        assert_eq!(write_prevalence_file(&path, &dataset()).unwrap(), Some(5));
        assert_eq!(read_prevalence_file(&path).unwrap(), dataset());
    }
}
