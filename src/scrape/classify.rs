use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::table::{RawTable, TableSkip};

/// Demographic or coverage grouping a prevalence table reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "By Sex")]
    Sex,
    #[serde(rename = "By Age Group")]
    AgeGroup,
    #[serde(rename = "By Race/Ethnicity")]
    RaceEthnicity,
    #[serde(rename = "By U.S. Census Region")]
    CensusRegion,
    #[serde(rename = "By Education")]
    Education,
    #[serde(rename = "By Health Insurance Coverage")]
    InsuranceCoverage,
}

lazy_static! {
    /// Checked in order; the first pattern that matches wins.
    static ref HEADER_PATTERNS: Vec<(Category, Regex)> = [
        (Category::Sex, r"(?i)(^|[^a-z])(sex|gender)([^a-z]|$)"),
        (Category::AgeGroup, r"(?i)age[\s_-]*group"),
        (Category::RaceEthnicity, r"(?i)race|ethnicity"),
        (Category::CensusRegion, r"(?i)census[\s_.-]*region"),
        (Category::Education, r"(?i)education"),
        (Category::InsuranceCoverage, r"(?i)insurance|coverage"),
    ]
    .into_iter()
    .map(|(category, pattern)| (category, Regex::new(pattern).expect("static pattern")))
    .collect();
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Sex,
        Category::AgeGroup,
        Category::RaceEthnicity,
        Category::CensusRegion,
        Category::Education,
        Category::InsuranceCoverage,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Sex => "By Sex",
            Category::AgeGroup => "By Age Group",
            Category::RaceEthnicity => "By Race/Ethnicity",
            Category::CensusRegion => "By U.S. Census Region",
            Category::Education => "By Education",
            Category::InsuranceCoverage => "By Health Insurance Coverage",
        }
    }

    /// Maps a header cell to its category; `None` is the "Other" bucket.
    pub fn from_header(text: &str) -> Option<Category> {
        HEADER_PATTERNS
            .iter()
            .find(|(_, pattern)| pattern.is_match(text))
            .map(|(category, _)| *category)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| format!("unknown category {:?}", s))
    }
}

/// Decides whether `table` is a prevalence table and which category it covers.
pub fn classify_table(table: &RawTable) -> Result<Category, TableSkip> {
    let columns = table.columns();
    if columns < 2 {
        return Err(TableSkip::TooFewColumns { columns });
    }
    if table.rows.is_empty() {
        return Err(TableSkip::NoDataRows);
    }
    let first = table.header.first().map(String::as_str).unwrap_or_default();
    Category::from_header(first).ok_or_else(|| TableSkip::Unrecognized {
        header: first.to_string(),
    })
}
