use std::time::Instant;

use env_logger::{Builder, Env};
use log::{debug, error, info, LevelFilter};
use sysinfo::{get_current_pid, ProcessExt, System, SystemExt};

use smoking_cost_report::config::{AnalysisConfig, ScrapeConfig, LOG_ENV};
use smoking_cost_report::pipeline::{analyze_insurance, publish_prevalence};
use smoking_cost_report::report::{render_json, render_text};
use smoking_cost_report::scrape::fetch::HttpFetcher;
use smoking_cost_report::scrape::scrape_prevalence;

/// Resident memory of this process in bytes, 0 when unavailable.
fn monitor_memory() -> u64 {
    let mut system = System::new();
    match get_current_pid() {
        Ok(pid) if system.refresh_process(pid) => {
            system.process(pid).map(|p| p.memory()).unwrap_or(0)
        }
        _ => 0,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env = Env::new().filter(LOG_ENV);
    Builder::new()
        .filter(Some("smoking_cost_report"), LevelFilter::Info)
        .parse_env(env)
        .init();

    let start_time = Instant::now();
    let start_memory = monitor_memory();

    let analysis_config = AnalysisConfig::default();
    let scrape_config = ScrapeConfig::default();
    let fetcher = HttpFetcher::new(scrape_config.timeout)?;

    let analysis = match analyze_insurance(&fetcher, &analysis_config).await {
        Ok(report) => Some(report),
        Err(e) => {
            error!("Insurance analysis unavailable: {}", e);
            None
        }
    };

    let dataset = scrape_prevalence(&fetcher, &scrape_config)
        .await
        .into_dataset();
    if let Err(e) = publish_prevalence(&dataset, &scrape_config.output_path) {
        error!("Could not write prevalence dataset: {}", e);
    }

    match render_text(analysis.as_ref(), &dataset) {
        Ok(text) => println!("{}", text),
        Err(e) => error!("Could not render text report: {}", e),
    }
    match render_json(analysis.as_ref(), &dataset) {
        Ok(json) => debug!("{}", json),
        Err(e) => error!("Could not render json report: {}", e),
    }

    let end_memory = monitor_memory();
    info!("Time elapsed: {:?}", start_time.elapsed());
    info!("Memory used: {} bytes", end_memory.saturating_sub(start_memory));

    Ok(())
}
