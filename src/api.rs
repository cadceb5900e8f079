use crate::engine::{host_of, Engine, EngineOptions, Fetcher, Scraper};
use crate::error::Result;
use crate::services::fetch::ReqwestFetcher;
use crate::services::log::ActivityLogger;
use crate::services::scrape::ProductScraper;
use crate::services::store::RecordSink;
use crate::types::ProductRecord;
use std::time::Instant;

// Helper functions for logging - ignore errors to not break main operations
fn log_info(host: Option<&str>, event: &str, details: Option<&str>) {
    if let Ok(logger) = ActivityLogger::new() {
        let _ = logger.info(host, event, details);
    }
}

fn log_error(host: Option<&str>, event: &str, details: Option<&str>) {
    if let Ok(logger) = ActivityLogger::new() {
        let _ = logger.error(host, event, details);
    }
}

/* ------------ public facade components ------------ */

pub struct Components {
    pub fetcher: Box<dyn Fetcher>,
    pub scraper: Box<dyn Scraper>,
    pub opts: EngineOptions,
}
impl Default for Components {
    fn default() -> Self {
        let fetcher = ReqwestFetcher::new().expect("failed to init reqwest client");
        Self {
            fetcher: Box::new(fetcher),
            scraper: Box::new(ProductScraper),
            opts: EngineOptions::default(),
        }
    }
}

pub fn make_engine<'a>(components: &'a Components) -> Engine<'a> {
    Engine::new(
        &*components.fetcher,
        &*components.scraper,
        components.opts.clone(),
    )
}

/* ------------ extraction entrypoints ------------ */

pub fn scrape_url(url: &str, components: &Components) -> Result<ProductRecord> {
    let start_time = Instant::now();
    let engine = make_engine(components);
    let result = engine.scrape_one(url);
    let duration = start_time.elapsed();

    let host = host_of(url);
    match &result {
        Ok(_) => {
            let details = format!("succeeded in {}ms", duration.as_millis());
            log_info(host.as_deref(), "scrape_url", Some(&details));
        }
        Err(_) => {
            let details = format!("failed in {}ms", duration.as_millis());
            log_error(host.as_deref(), "scrape_url", Some(&details));
        }
    }

    result
}

pub async fn scrape_url_async(url: &str, components: &Components) -> Result<ProductRecord> {
    let start_time = Instant::now();
    let engine = make_engine(components);
    let result = engine.scrape_one_async(url).await;
    let duration = start_time.elapsed();

    let host = host_of(url);
    match &result {
        Ok(_) => {
            let details = format!("succeeded in {}ms", duration.as_millis());
            log_info(host.as_deref(), "scrape_url_async", Some(&details));
        }
        Err(_) => {
            let details = format!("failed in {}ms", duration.as_millis());
            log_error(host.as_deref(), "scrape_url_async", Some(&details));
        }
    }

    result
}

/// Scrape a whole URL list into `sink`, appending incrementally. Per-URL
/// failures are logged and skipped inside the engine; only sink failures
/// surface here.
pub fn scrape_batch(
    urls: &[String],
    components: &Components,
    sink: &mut dyn RecordSink,
) -> Result<Vec<ProductRecord>> {
    let start_time = Instant::now();
    let engine = make_engine(components);
    let result = engine.run(urls, sink);
    let duration = start_time.elapsed();

    match &result {
        Ok(records) => {
            let details = format!(
                "{} of {} urls in {}ms",
                records.len(),
                urls.len(),
                duration.as_millis()
            );
            log_info(None, "scrape_batch", Some(&details));
        }
        Err(_) => {
            let details = format!("failed in {}ms", duration.as_millis());
            log_error(None, "scrape_batch", Some(&details));
        }
    }

    result
}
