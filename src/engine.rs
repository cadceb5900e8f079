use crate::error::{GleanError, Result};
use crate::services::log::ActivityLogger;
use crate::services::store::RecordSink;
use crate::types::{FetchConfig, ProductRecord};
use async_trait::async_trait;
use url::Url;

/// Fetch collaborator: given a URL, return rendered page markup. Impls must
/// let client-side rendering settle before returning; a fixed delay is the
/// minimum acceptable policy, adaptive wait-for-element is better.
#[async_trait]
pub trait Fetcher: Send + Sync {
    fn name(&self) -> &'static str;
    fn fetch_blocking(&self, url: &str, cfg: &FetchConfig) -> Result<String>;
    async fn fetch_async(&self, url: &str, cfg: &FetchConfig) -> Result<String>;
}

/// Scrape collaborator: one rendered page in, one product record out.
/// Heuristic misses are sentinels in the record, never errors.
pub trait Scraper: Send + Sync {
    fn name(&self) -> &'static str;
    fn scrape(&self, url: &str, html: &str) -> Result<ProductRecord>;
}

#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub fetch: FetchConfig,
}

pub struct Engine<'a> {
    pub fetcher: &'a dyn Fetcher,
    pub scraper: &'a dyn Scraper,
    pub opts: EngineOptions,
}

impl<'a> Engine<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, scraper: &'a dyn Scraper, opts: EngineOptions) -> Self {
        Self {
            fetcher,
            scraper,
            opts,
        }
    }

    pub fn scrape_one(&self, url: &str) -> Result<ProductRecord> {
        Url::parse(url).map_err(|_| GleanError::InvalidUrl(url.into()))?;
        let html = self.fetcher.fetch_blocking(url, &self.opts.fetch)?;
        self.scraper.scrape(url, &html)
    }

    pub async fn scrape_one_async(&self, url: &str) -> Result<ProductRecord> {
        Url::parse(url).map_err(|_| GleanError::InvalidUrl(url.into()))?;
        let html = self.fetcher.fetch_async(url, &self.opts.fetch).await?;
        self.scraper.scrape(url, &html)
    }

    /// Batch runner with per-URL failure isolation: a URL that fails to
    /// fetch or scrape is logged and skipped, the rest of the batch runs.
    /// Each success is appended to the sink (and flushed) before the next
    /// URL starts, so partial progress is already durable if a later URL
    /// brings the process down. Sink failures do abort, since continuing without
    /// persistence would silently drop records.
    pub fn run(&self, urls: &[String], sink: &mut dyn RecordSink) -> Result<Vec<ProductRecord>> {
        let logger = ActivityLogger::new().ok();
        let mut results = Vec::new();

        for url in urls {
            match self.scrape_one(url) {
                Ok(record) => {
                    sink.append(&record)?;
                    if let Some(l) = &logger {
                        let _ = l.info(host_of(url).as_deref(), "scrape_url", None);
                    }
                    results.push(record);
                }
                Err(e) => {
                    if let Some(l) = &logger {
                        let _ = l.error(host_of(url).as_deref(), "scrape_url", Some(&e.to_string()));
                    }
                }
            }
        }

        Ok(results)
    }
}

pub(crate) fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
}
