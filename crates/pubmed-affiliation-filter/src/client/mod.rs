//! PubMed E-utilities client.
//!
//! Provides an async HTTP client with:
//! - Retry middleware with exponential backoff
//! - Rate limiting (3 req/s, 10 req/s with an API key)
//! - Batched efetch (200 PMIDs per request)
//!
//! Endpoints used:
//!   esearch: `{base}/esearch.fcgi` (JSON)
//!   efetch:  `{base}/efetch.fcgi` (XML)

pub mod parser;

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::PaperRecord;

pub use parser::parse_pubmed_xml;

/// Anything that can turn a query into fetched paper records.
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Search for `query` and fetch metadata for up to `max_results` papers.
    async fn fetch_papers(&self, query: &str, max_results: usize)
    -> ClientResult<Vec<PaperRecord>>;
}

#[derive(Debug, Deserialize)]
struct ESearchResponse {
    #[serde(default)]
    esearchresult: ESearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct ESearchResult {
    #[serde(default)]
    count: Option<String>,

    #[serde(default)]
    idlist: Vec<String>,

    #[serde(rename = "ERROR", default)]
    error: Option<String>,
}

/// PubMed E-utilities client.
#[derive(Clone)]
pub struct PubMedClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Shared request limiter; `None` disables throttling.
    limiter: Option<Arc<DefaultDirectRateLimiter>>,

    /// Contact e-mail sent with every request.
    email: String,

    /// API key (optional).
    api_key: Option<String>,

    /// Tool name sent with every request.
    tool: String,

    /// E-utilities base URL.
    eutils_base_url: String,

    /// Maximum PMIDs per efetch request.
    fetch_batch_size: usize,
}

impl PubMedClient {
    /// Create a new client with the given configuration.
    pub fn new(config: Config) -> ClientResult<Self> {
        let client = Client::builder()
            .user_agent(format!("{}/{}", config.tool, env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(30))
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        let limiter = config
            .requests_per_second
            .and_then(NonZeroU32::new)
            .map(|rps| Arc::new(RateLimiter::direct(Quota::per_second(rps))));

        Ok(Self {
            client,
            limiter,
            email: config.email,
            api_key: config.api_key,
            tool: config.tool,
            eutils_base_url: config.eutils_base_url,
            fetch_batch_size: config.fetch_batch_size.max(1),
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search PubMed and return up to `max_results` PMIDs.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, max_results: usize) -> ClientResult<Vec<String>> {
        let url = format!("{}/esearch.fcgi", self.eutils_base_url);

        let mut params = self.base_params();
        params.push(("term".to_string(), query.to_string()));
        params.push(("retmax".to_string(), max_results.to_string()));
        params.push(("retmode".to_string(), "json".to_string()));

        let body = self.get_text(&url, &params).await?;
        let response: ESearchResponse = serde_json::from_str(&body)?;
        let result = response.esearchresult;

        if let Some(error) = result.error {
            return Err(ClientError::bad_request(error));
        }

        debug!(count = ?result.count, returned = result.idlist.len(), "esearch complete");
        Ok(result.idlist)
    }

    /// Fetch and parse records for `pmids`, in batches.
    #[instrument(skip(self, pmids), fields(pmids = pmids.len()))]
    pub async fn fetch(&self, pmids: &[String]) -> ClientResult<Vec<PaperRecord>> {
        let mut papers = Vec::with_capacity(pmids.len());
        for batch in pmids.chunks(self.fetch_batch_size) {
            papers.extend(self.fetch_batch(batch).await?);
        }
        Ok(papers)
    }

    async fn fetch_batch(&self, pmids: &[String]) -> ClientResult<Vec<PaperRecord>> {
        if pmids.is_empty() {
            return Ok(vec![]);
        }

        let url = format!("{}/efetch.fcgi", self.eutils_base_url);

        let mut params = self.base_params();
        params.push(("id".to_string(), pmids.join(",")));
        params.push(("rettype".to_string(), "abstract".to_string()));
        params.push(("retmode".to_string(), "xml".to_string()));

        let xml = self.get_text(&url, &params).await?;
        parse_pubmed_xml(&xml)
    }

    /// Parameters sent with every request.
    fn base_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("db".to_string(), "pubmed".to_string()),
            ("tool".to_string(), self.tool.clone()),
            ("email".to_string(), self.email.clone()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key".to_string(), key.clone()));
        }
        params
    }

    /// Make a rate-limited GET request and return the body.
    async fn get_text(&self, url: &str, params: &[(String, String)]) -> ClientResult<String> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        debug!(url, "GET");
        let response = self.client.get(url).query(params).send().await?;
        let response = Self::handle_response(response).await?;
        Ok(response.text().await?)
    }

    /// Handle API response status codes.
    async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            429 => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1);

                Err(ClientError::rate_limited(retry_after))
            }
            404 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::not_found(text))
            }
            400 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::bad_request(text))
            }
            500..=599 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::server(status.as_u16(), text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
            }
        }
    }
}

#[async_trait]
impl PaperSource for PubMedClient {
    async fn fetch_papers(
        &self,
        query: &str,
        max_results: usize,
    ) -> ClientResult<Vec<PaperRecord>> {
        info!(query, max_results, "Searching PubMed");
        let pmids = self.search(query, max_results).await?;
        if pmids.is_empty() {
            info!("No PubMed results");
            return Ok(vec![]);
        }
        let papers = self.fetch(&pmids).await?;
        info!(fetched = papers.len(), "Fetched PubMed records");
        Ok(papers)
    }
}

impl std::fmt::Debug for PubMedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PubMedClient")
            .field("email", &self.email)
            .field("has_api_key", &self.has_api_key())
            .finish_non_exhaustive()
    }
}
