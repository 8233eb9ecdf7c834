use polars::prelude::{DataFrame, DataType, Field, NamedFrom, Schema, Series, TakeRandom, TakeRandomUtf8};

use crate::error::{AnalysisError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Female,
    Male,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Smoker {
    No,
    Yes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Sex {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "female" => Some(Self::Female),
            "male" => Some(Self::Male),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }
}

impl Smoker {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "no" => Some(Self::No),
            "yes" => Some(Self::Yes),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::No => "no",
            Self::Yes => "yes",
        }
    }
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Northeast,
        Region::Northwest,
        Region::Southeast,
        Region::Southwest,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|region| region.label() == label)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Northeast => "northeast",
            Self::Northwest => "northwest",
            Self::Southeast => "southeast",
            Self::Southwest => "southwest",
        }
    }
}

/// One row of the insurance dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct InsuranceRecord {
    pub age: i64,
    pub sex: Sex,
    pub bmi: f64,
    pub children: i64,
    pub smoker: Smoker,
    pub region: Region,
    pub charges: f64,
}

impl InsuranceRecord {
    pub fn raw_schema() -> Schema {
        Schema::from_iter(vec![
            Field::new("age", DataType::Int64),
            Field::new("sex", DataType::Utf8),
            Field::new("bmi", DataType::Float64),
            Field::new("children", DataType::Int64),
            Field::new("smoker", DataType::Utf8),
            Field::new("region", DataType::Utf8),
            Field::new("charges", DataType::Float64),
        ])
    }

    /// Converts a frame read with [`InsuranceRecord::raw_schema`] into typed records.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<InsuranceRecord>> {
        let age = df.column("age")?.i64()?;
        let sex = df.column("sex")?.utf8()?;
        let bmi = df.column("bmi")?.f64()?;
        let children = df.column("children")?.i64()?;
        let smoker = df.column("smoker")?.utf8()?;
        let region = df.column("region")?.utf8()?;
        let charges = df.column("charges")?.f64()?;

        (0..df.height())
            .map(|row| {
                Ok(InsuranceRecord {
                    age: required(age.get(row), "age", row)?,
                    sex: labelled(sex.get(row), Sex::from_label, "sex", row)?,
                    bmi: required(bmi.get(row), "bmi", row)?,
                    children: required(children.get(row), "children", row)?,
                    smoker: labelled(smoker.get(row), Smoker::from_label, "smoker", row)?,
                    region: labelled(region.get(row), Region::from_label, "region", row)?,
                    charges: required(charges.get(row), "charges", row)?,
                })
            })
            .collect()
    }

    pub fn to_frame(records: &[InsuranceRecord]) -> Result<DataFrame> {
        let frame = DataFrame::new(vec![
            Series::new("age", records.iter().map(|r| r.age).collect::<Vec<_>>()),
            Series::new("sex", records.iter().map(|r| r.sex.label()).collect::<Vec<_>>()),
            Series::new("bmi", records.iter().map(|r| r.bmi).collect::<Vec<_>>()),
            Series::new(
                "children",
                records.iter().map(|r| r.children).collect::<Vec<_>>(),
            ),
            Series::new(
                "smoker",
                records.iter().map(|r| r.smoker.label()).collect::<Vec<_>>(),
            ),
            Series::new(
                "region",
                records.iter().map(|r| r.region.label()).collect::<Vec<_>>(),
            ),
            Series::new(
                "charges",
                records.iter().map(|r| r.charges).collect::<Vec<_>>(),
            ),
        ])?;
        Ok(frame)
    }
}

fn required<T>(value: Option<T>, column: &'static str, row: usize) -> Result<T> {
    value.ok_or(AnalysisError::InvalidRecord {
        column,
        row,
        value: None,
    })
}

fn labelled<T>(
    value: Option<&str>,
    parse: fn(&str) -> Option<T>,
    column: &'static str,
    row: usize,
) -> Result<T> {
    let raw = required(value, column, row)?;
    parse(raw).ok_or_else(|| AnalysisError::InvalidRecord {
        column,
        row,
        value: Some(raw.to_string()),
    })
}
