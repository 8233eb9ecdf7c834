use smoking_cost_report::config::ScrapeConfig;
use smoking_cost_report::pipeline::publish_prevalence;
use smoking_cost_report::prevalence::read_prevalence_file;
use smoking_cost_report::scrape::classify::Category;
use smoking_cost_report::scrape::fetch::{FetchError, PageSource};
use smoking_cost_report::scrape::table::TableSkip;
use smoking_cost_report::scrape::{scrape_prevalence, ScrapeError, ScrapeOutcome};

const PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<div class="card"><h3>By Sex</h3>
  <table><thead><tr><th>Sex</th><th>Percentage</th></tr></thead>
  <tbody><tr><td>Men</td><td>13.1%</td></tr><tr><td>Women</td><td>10.1%</td></tr></tbody></table>
</div>
<div class="card"><p>Figures are age-adjusted.</p></div>
<div class="card">
  <table><tr><th>Annual Household Income</th><th>Percentage</th></tr>
  <tr><td>Less than $35,000</td><td>18.3%</td></tr></table>
</div>
<div class="card">
  <table><tr><th>AGE GROUP</th><th>Sex</th></tr>
  <tr><td>18–24 years</td><td>5.3%</td></tr><tr><td>25–44 years</td><td>12.6%</td></tr></table>
</div>
<div class="card">
  <table><tr><th>Education</th><th>Percentage</th></tr></table>
</div>
<div class="card">
  <table><tr><th>Census_Region</th><th>Percentage</th></tr>
  <tr><td>Northeast</td><td>20.1%</td></tr><tr><td>South</td><td>22.4%</td></tr></table>
</div>
<div class="card">
  <table><tr><th>Race/Ethnicity</th><th>Percentage</th></tr>
  <tr><td>Hispanic</td><td>suppressed</td></tr></table>
</div>
<div class="card">
  <table><tr><th>Sex</th><th>Percentage</th></tr>
  <tr><td>Men</td><td>13.1%</td></tr><tr><td>Unknown</td><td>—</td></tr></table>
</div>
</body></html>"#;

struct Fixture(&'static str);

impl PageSource for Fixture {
    async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
        Ok(self.0.to_string())
    }
}

struct Offline;

impl PageSource for Offline {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        Err(FetchError::Status {
            url: url.to_string(),
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        })
    }
}

fn config(dir: &tempfile::TempDir) -> ScrapeConfig {
    ScrapeConfig {
        output_path: dir.path().join("cdc_smoking_prevalence.csv"),
        ..ScrapeConfig::default()
    }
}

#[tokio::test]
async fn page_blocks_become_rows_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = scrape_prevalence(&Fixture(PAGE), &config(&dir)).await;

    let (dataset, skipped) = match outcome {
        ScrapeOutcome::Collected { dataset, skipped } => (dataset, skipped),
        ScrapeOutcome::Unavailable(e) => panic!("unexpected failure: {}", e),
    };

    let pairs: Vec<(Category, &str)> = dataset
        .rows()
        .iter()
        .map(|r| (r.category, r.group.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (Category::Sex, "Men"),
            (Category::Sex, "Women"),
            (Category::AgeGroup, "18–24 years"),
            (Category::AgeGroup, "25–44 years"),
            (Category::CensusRegion, "Northeast"),
            (Category::CensusRegion, "South"),
            (Category::Sex, "Men"),
            (Category::Sex, "Unknown"),
        ]
    );
    assert_eq!(dataset.rows()[4].prevalence, Some(20.1));
    assert_eq!(dataset.rows()[5].prevalence, Some(22.4));
    assert_eq!(dataset.rows()[7].prevalence, None);

    let reasons: Vec<(usize, &TableSkip)> = skipped.iter().map(|s| (s.block, &s.reason)).collect();
    assert_eq!(reasons.len(), 4);
    assert_eq!(reasons[0], (1, &TableSkip::NoTable));
    assert!(matches!(reasons[1], (2, TableSkip::Unrecognized { .. })));
    assert_eq!(reasons[2], (4, &TableSkip::NoDataRows));
    assert_eq!(reasons[3], (6, &TableSkip::NoParsablePercentages { rows: 1 }));
}

#[tokio::test]
async fn scraped_rows_round_trip_through_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let dataset = scrape_prevalence(&Fixture(PAGE), &config)
        .await
        .into_dataset();

    assert_eq!(
        publish_prevalence(&dataset, &config.output_path).unwrap(),
        Some(8)
    );
    let reread = read_prevalence_file(&config.output_path).unwrap();
    assert_eq!(reread, dataset);
}

#[tokio::test]
async fn fetch_failure_yields_no_data_and_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let outcome = scrape_prevalence(&Offline, &config).await;
    assert!(matches!(
        outcome,
        ScrapeOutcome::Unavailable(ScrapeError::Fetch(FetchError::Status { .. }))
    ));

    let dataset = outcome.into_dataset();
    assert!(dataset.is_empty());
    assert_eq!(publish_prevalence(&dataset, &config.output_path).unwrap(), None);
    assert!(!config.output_path.exists());
}

#[tokio::test]
async fn non_html_body_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = scrape_prevalence(&Fixture("Service temporarily down"), &config(&dir)).await;
    assert!(matches!(
        outcome,
        ScrapeOutcome::Unavailable(ScrapeError::Fetch(FetchError::Malformed { .. }))
    ));
}

#[tokio::test]
async fn invalid_block_selector_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let config = ScrapeConfig {
        block_selector: "div[".to_string(),
        ..config(&dir)
    };
    let outcome = scrape_prevalence(&Fixture(PAGE), &config).await;
    assert!(matches!(
        outcome,
        ScrapeOutcome::Unavailable(ScrapeError::Selector { .. })
    ));
}
