//! Medical insurance charges versus smoking, plus a scraped table of CDC adult
//! smoking prevalence.
//!
//! Two independent pipelines:
//! - statistical report: [`loader`] → [`summary`] → [`hypothesis`] → [`regression`]
//! - prevalence scraper: [`scrape`] → [`prevalence`]
//!
//! Both end in [`report`]. The two datasets are never joined.

pub mod config;
pub mod error;
pub mod hypothesis;
pub mod loader;
pub mod pipeline;
pub mod prevalence;
pub mod records;
pub mod regression;
pub mod report;
pub mod scrape;
pub mod stats;
pub mod summary;
