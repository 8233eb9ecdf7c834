use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use polars::prelude::*;

use crate::config::DatasetSource;
use crate::error::Result;
use crate::records::InsuranceRecord;
use crate::scrape::fetch::PageSource;

pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let file = File::open(path)?;

    Ok(CsvReader::new(file)
        .has_header(true)
        .with_dtypes(Some(Arc::new(InsuranceRecord::raw_schema())))
        .finish()?)
}

pub fn parse_csv(text: String) -> Result<DataFrame> {
    Ok(CsvReader::new(Cursor::new(text.into_bytes()))
        .has_header(true)
        .with_dtypes(Some(Arc::new(InsuranceRecord::raw_schema())))
        .finish()?)
}

/// Loads the insurance frame from a URL through `source`, or from disk.
pub async fn load_insurance<S: PageSource>(source: &S, from: &DatasetSource) -> Result<DataFrame> {
    match from {
        DatasetSource::Url(url) => parse_csv(source.fetch(url).await?),
        DatasetSource::Path(path) => read_csv(path),
    }
}
