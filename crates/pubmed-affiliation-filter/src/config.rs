//! Configuration for the PubMed client and the affiliation filter.

use std::time::Duration;

use crate::error::{AppError, AppResult};

/// E-utilities configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for NCBI E-utilities.
    pub const EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

    /// Tool name reported to NCBI with every request.
    pub const TOOL_NAME: &str = "PubMedAffiliationFilter";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Requests per second without an API key (NCBI guideline).
    pub const REQUESTS_PER_SECOND: u32 = 3;

    /// Requests per second with an API key.
    pub const REQUESTS_PER_SECOND_WITH_KEY: u32 = 10;

    /// Maximum PMIDs per efetch request.
    pub const FETCH_BATCH_SIZE: usize = 200;

    /// Upper bound esearch accepts for `retmax`.
    pub const MAX_RESULTS_LIMIT: usize = 10_000;

    /// Maximum retries for transient failures.
    pub const MAX_RETRIES: u32 = 3;
}

/// Client configuration.
#[derive(Clone)]
pub struct Config {
    /// Contact e-mail required by NCBI.
    pub email: String,

    /// NCBI API key (optional).
    pub api_key: Option<String>,

    /// Tool name sent as the `tool` parameter.
    pub tool: String,

    /// Base URL for E-utilities (for testing with mock servers).
    pub eutils_base_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Requests per second; `None` disables rate limiting.
    pub requests_per_second: Option<u32>,

    /// Maximum PMIDs per efetch request.
    pub fetch_batch_size: usize,

    /// Maximum retries for transient failures.
    pub max_retries: u32,
}

impl Config {
    /// Create a new configuration.
    ///
    /// The rate limit follows NCBI guidance: 3 req/s without a key, 10 req/s with one.
    pub fn new(email: impl Into<String>, api_key: Option<String>) -> AppResult<Self> {
        let email = email.into().trim().to_string();
        if email.is_empty() {
            return Err(AppError::validation(
                "email",
                "an e-mail address is required by NCBI (use --email or NCBI_EMAIL)",
            ));
        }

        let api_key = api_key.filter(|k| !k.trim().is_empty());
        let requests_per_second = if api_key.is_some() {
            api::REQUESTS_PER_SECOND_WITH_KEY
        } else {
            api::REQUESTS_PER_SECOND
        };

        Ok(Self {
            email,
            api_key,
            tool: api::TOOL_NAME.to_string(),
            eutils_base_url: api::EUTILS_BASE_URL.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            requests_per_second: Some(requests_per_second),
            fetch_batch_size: api::FETCH_BATCH_SIZE,
            max_retries: api::MAX_RETRIES,
        })
    }

    /// Create a test configuration pointing at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            email: "test@example.com".to_string(),
            api_key: None,
            tool: api::TOOL_NAME.to_string(),
            eutils_base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            requests_per_second: None, // No throttling in tests
            fetch_batch_size: api::FETCH_BATCH_SIZE,
            max_retries: 0,
        }
    }

    /// Create configuration from environment variables (`NCBI_EMAIL`, `NCBI_API_KEY`).
    pub fn from_env() -> AppResult<Self> {
        let email = std::env::var("NCBI_EMAIL").unwrap_or_default();
        let api_key = std::env::var("NCBI_API_KEY").ok();
        Self::new(email, api_key)
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("email", &self.email)
            .field("has_api_key", &self.has_api_key())
            .field("eutils_base_url", &self.eutils_base_url)
            .field("requests_per_second", &self.requests_per_second)
            .finish_non_exhaustive()
    }
}

/// What to search for and how strictly to filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    /// PubMed query term.
    pub query: String,

    /// Minimum distinct companies per paper (0 is treated as 1).
    pub min_companies: usize,

    /// Maximum number of PMIDs to fetch.
    pub max_results: usize,
}

impl FilterOptions {
    /// Create options with the defaults of the command-line tool.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), min_companies: 1, max_results: 100 }
    }

    /// Check the options before any request is made.
    pub fn validate(&self) -> AppResult<()> {
        if self.query.trim().is_empty() {
            return Err(AppError::validation("query", "cannot be empty"));
        }
        if self.max_results == 0 || self.max_results > api::MAX_RESULTS_LIMIT {
            return Err(AppError::validation(
                "max_results",
                format!("must be between 1 and {}", api::MAX_RESULTS_LIMIT),
            ));
        }
        Ok(())
    }
}
