//! Default fetch collaborator: plain HTTP via reqwest, blocking and async.
//!
//! Pages that render client-side need a real browser behind the [`Fetcher`]
//! trait instead; this impl honors the render-settle contract with the
//! fixed-delay minimum (`FetchConfig::settle_ms`).

use crate::engine::Fetcher as FetcherT;
use crate::error::{GleanError, Result};
use crate::types::FetchConfig;
use async_trait::async_trait;
use reqwest::blocking::Client;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, USER_AGENT,
};
use reqwest::Client as AsyncClient;
use reqwest::StatusCode;
use std::time::Duration;

pub struct ReqwestFetcher;

impl ReqwestFetcher {
    pub fn new() -> Result<Self> {
        Ok(Self)
    }

    fn build_client(&self, cfg: &FetchConfig) -> Result<Client> {
        Ok(Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?)
    }

    fn build_async_client(&self, cfg: &FetchConfig) -> Result<AsyncClient> {
        Ok(AsyncClient::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?)
    }

    fn browser_headers(ua: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(
            HeaderName::from_static("upgrade-insecure-requests"),
            HeaderValue::from_static("1"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(ua).unwrap_or(HeaderValue::from_static("Mozilla/5.0")),
        );
        headers
    }

    fn user_agents(cfg: &FetchConfig) -> Vec<&str> {
        if cfg.user_agents.is_empty() {
            vec!["Mozilla/5.0"]
        } else {
            cfg.user_agents.iter().map(|s| s.as_str()).collect()
        }
    }

    fn accept(url: &str, status: StatusCode, text: String) -> Result<String> {
        if status.is_success() && !text.trim().is_empty() {
            Ok(text)
        } else {
            Err(GleanError::fetch(url, format!("HTTP status {}", status)))
        }
    }
}

#[async_trait]
impl FetcherT for ReqwestFetcher {
    fn name(&self) -> &'static str {
        "reqwest"
    }

    fn fetch_blocking(&self, url: &str, cfg: &FetchConfig) -> Result<String> {
        let client = self.build_client(cfg)?;
        let mut last_err = GleanError::fetch(url, "no user agent succeeded");

        for ua in Self::user_agents(cfg) {
            let attempt = client
                .get(url)
                .headers(Self::browser_headers(ua))
                .send()
                .map_err(GleanError::from)
                .and_then(|resp| {
                    let status = resp.status();
                    let text = resp.text()?;
                    Self::accept(url, status, text)
                });
            match attempt {
                Ok(text) => {
                    if cfg.settle_ms > 0 {
                        std::thread::sleep(Duration::from_millis(cfg.settle_ms));
                    }
                    return Ok(text);
                }
                Err(e) => last_err = e,
            }
        }
        Err(last_err)
    }

    async fn fetch_async(&self, url: &str, cfg: &FetchConfig) -> Result<String> {
        let client = self.build_async_client(cfg)?;
        let mut last_err = GleanError::fetch(url, "no user agent succeeded");

        for ua in Self::user_agents(cfg) {
            let resp = client.get(url).headers(Self::browser_headers(ua)).send().await;
            let attempt = match resp {
                Ok(resp) => {
                    let status = resp.status();
                    match resp.text().await {
                        Ok(text) => Self::accept(url, status, text),
                        Err(e) => Err(GleanError::from(e)),
                    }
                }
                Err(e) => Err(GleanError::from(e)),
            };
            match attempt {
                Ok(text) => {
                    if cfg.settle_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(cfg.settle_ms)).await;
                    }
                    return Ok(text);
                }
                Err(e) => last_err = e,
            }
        }
        Err(last_err)
    }
}
