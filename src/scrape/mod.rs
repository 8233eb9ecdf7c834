//! Prevalence scraping: fetch the CDC page, classify its tables, extract rows.
//!
//! Every step below the driver returns values; [`scrape_prevalence`] is the only
//! place that logs, and it never fails. A page that cannot be fetched becomes
//! [`ScrapeOutcome::Unavailable`] with an empty dataset.

pub mod classify;
pub mod extract;
pub mod fetch;
pub mod table;

use log::{debug, error, info, warn};
use scraper::Selector;
use thiserror::Error;

use crate::config::{ScrapeConfig, CDC_BULK_DATA_HINT};
use crate::prevalence::PrevalenceDataset;
use classify::{classify_table, Category};
use extract::extract_rows;
use fetch::{fetch_page, FetchError, PageSource};
use table::{page_tables, RawTable, TableSkip};

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("invalid block selector {selector:?}: {message}")]
    Selector { selector: String, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTable {
    /// Position of the block on the page.
    pub block: usize,
    pub reason: TableSkip,
}

#[derive(Debug)]
pub enum ScrapeOutcome {
    Collected {
        dataset: PrevalenceDataset,
        skipped: Vec<SkippedTable>,
    },
    Unavailable(ScrapeError),
}

impl ScrapeOutcome {
    pub fn dataset(&self) -> Option<&PrevalenceDataset> {
        match self {
            ScrapeOutcome::Collected { dataset, .. } => Some(dataset),
            ScrapeOutcome::Unavailable(_) => None,
        }
    }

    /// Empty when the page was unavailable.
    pub fn into_dataset(self) -> PrevalenceDataset {
        match self {
            ScrapeOutcome::Collected { dataset, .. } => dataset,
            ScrapeOutcome::Unavailable(_) => PrevalenceDataset::default(),
        }
    }
}

/// Classifies one table and, when accepted, appends its rows to `dataset`.
pub fn collect_table(
    table: &RawTable,
    dataset: &mut PrevalenceDataset,
) -> Result<(Category, usize), TableSkip> {
    let category = classify_table(table)?;
    let rows = extract_rows(table, category)?;
    let count = rows.len();
    dataset.append(rows);
    Ok((category, count))
}

pub async fn scrape_prevalence<S: PageSource>(source: &S, config: &ScrapeConfig) -> ScrapeOutcome {
    let selector = match Selector::parse(&config.block_selector) {
        Ok(selector) => selector,
        Err(e) => {
            let err = ScrapeError::Selector {
                selector: config.block_selector.clone(),
                message: e.to_string(),
            };
            error!("{}", err);
            return ScrapeOutcome::Unavailable(err);
        }
    };

    let page = match fetch_page(source, &config.url).await {
        Ok(page) => page,
        Err(e) => {
            error!("Prevalence page unavailable: {}", e);
            warn!("Hint: {}", CDC_BULK_DATA_HINT);
            return ScrapeOutcome::Unavailable(e.into());
        }
    };

    let mut dataset = PrevalenceDataset::default();
    let mut skipped = Vec::new();
    for (block, table) in page_tables(&page, &selector).into_iter().enumerate() {
        match table.and_then(|table| collect_table(&table, &mut dataset)) {
            Ok((category, rows)) => info!("Block {}: {} row(s) {}", block, rows, category),
            Err(reason) => {
                match &reason {
                    TableSkip::Unrecognized { .. } => debug!("Block {} skipped: {}", block, reason),
                    _ => warn!("Block {} skipped: {}", block, reason),
                }
                skipped.push(SkippedTable { block, reason });
            }
        }
    }
    info!(
        "Collected {} prevalence row(s); {} block(s) skipped",
        dataset.len(),
        skipped.len()
    );

    ScrapeOutcome::Collected { dataset, skipped }
}
