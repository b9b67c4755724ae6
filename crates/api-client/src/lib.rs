use crate::error::ApiError;
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use configuration::ProviderSettings;
use core_types::{BenchmarkLookup, ExecutiveRecord, IndustryBenchmark, Listing};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub mod error;
pub mod responses;
pub mod retry;
// --- Public API ---
pub use responses::{ExecutiveResponse, IndustryBenchmarkResponse, StockInfoResponse};
pub use reqwest::StatusCode;

/// The abstract interface for the remote company info service.
/// This trait is the contract that the cache and the engine use, allowing the
/// underlying implementation (live, cached or a test double) to be swapped out.
#[async_trait]
pub trait CompanyInfoProvider: Send + Sync {
    /// Fetches every company listed on the given exchange.
    async fn get_listings(
        &self,
        exchange_symbol: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Listing>, ApiError>;

    /// Fetches the executives of one company. An empty list is a valid answer.
    async fn get_executives(
        &self,
        company_symbol: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ExecutiveRecord>, ApiError>;

    /// Fetches the compensation benchmark of one industry, or `NotFound` when the
    /// service has none.
    async fn get_benchmark(
        &self,
        industry_title: &str,
        cancel: &CancellationToken,
    ) -> Result<BenchmarkLookup, ApiError>;
}

#[async_trait]
impl<P: CompanyInfoProvider + ?Sized> CompanyInfoProvider for Arc<P> {
    async fn get_listings(
        &self,
        exchange_symbol: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Listing>, ApiError> {
        (**self).get_listings(exchange_symbol, cancel).await
    }

    async fn get_executives(
        &self,
        company_symbol: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ExecutiveRecord>, ApiError> {
        (**self).get_executives(company_symbol, cancel).await
    }

    async fn get_benchmark(
        &self,
        industry_title: &str,
        cancel: &CancellationToken,
    ) -> Result<BenchmarkLookup, ApiError> {
        (**self).get_benchmark(industry_title, cancel).await
    }
}

/// The live implementation of `CompanyInfoProvider` over HTTP.
#[derive(Clone)]
pub struct CompanyInfoClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
    retry: RetryPolicy,
}

impl CompanyInfoClient {
    pub fn new(settings: &ProviderSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|_| ApiError::InvalidBaseUrl(settings.base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(settings.base_url.clone()));
        }

        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(settings.timeout())
                .build()?,
            base_url,
            api_key: settings.api_key.clone(),
            retry: RetryPolicy::from_settings(settings),
        })
    }

    /// Builds `{base}/api/{segments...}?code={key}`, percent-encoding every segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        url.query_pairs_mut().append_pair("code", &self.api_key);
        Ok(url)
    }

    /// Sends a GET, retrying transient failures according to the retry policy.
    /// Returns the final response whatever its status.
    async fn get_with_retry(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response, ApiError> {
        let mut attempt = 0;
        loop {
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ApiError::Cancelled),
                result = self.client.get(url.clone()).send() => result,
            };

            let retryable = match &outcome {
                Ok(response) => RetryPolicy::is_retryable_status(response.status()),
                Err(e) => RetryPolicy::is_retryable_error(e),
            };
            if !retryable || attempt >= self.retry.max_retries {
                return outcome.map_err(ApiError::from);
            }

            let delay = self.retry.delay_for(attempt);
            match &outcome {
                Ok(response) => tracing::warn!(
                    status = %response.status(),
                    attempt = attempt + 1,
                    ?delay,
                    "Transient response from company info service, retrying."
                ),
                Err(e) => tracing::warn!(
                    error = %e,
                    attempt = attempt + 1,
                    ?delay,
                    "Request to company info service failed, retrying."
                ),
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ApiError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
            attempt += 1;
        }
    }

    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        let decoded = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ApiError::Cancelled),
            decoded = response.json::<T>() => decoded,
        };
        decoded.map_err(|e| {
            if e.is_decode() {
                ApiError::Deserialization(e.to_string())
            } else {
                ApiError::Request(e)
            }
        })
    }

    fn ensure_success(response: &reqwest::Response, resource: String) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Status { status, resource })
        }
    }
}

#[async_trait]
impl CompanyInfoProvider for CompanyInfoClient {
    async fn get_listings(
        &self,
        exchange_symbol: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Listing>, ApiError> {
        let url = self.endpoint(&["exchanges", exchange_symbol, "companies"])?;
        let response = self.get_with_retry(&url, cancel).await?;
        Self::ensure_success(&response, format!("exchange {}", exchange_symbol))?;

        let stocks: Vec<StockInfoResponse> = Self::read_json(response, cancel).await?;
        tracing::debug!(exchange = exchange_symbol, count = stocks.len(), "Fetched listings.");
        Ok(stocks.into_iter().map(Listing::from).collect())
    }

    async fn get_executives(
        &self,
        company_symbol: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ExecutiveRecord>, ApiError> {
        let url = self.endpoint(&["companies", company_symbol, "executives"])?;
        let response = self.get_with_retry(&url, cancel).await?;
        Self::ensure_success(&response, format!("company {}", company_symbol))?;

        let executives: Vec<ExecutiveResponse> = Self::read_json(response, cancel).await?;
        tracing::debug!(company = company_symbol, count = executives.len(), "Fetched executives.");
        Ok(executives.into_iter().map(ExecutiveRecord::from).collect())
    }

    async fn get_benchmark(
        &self,
        industry_title: &str,
        cancel: &CancellationToken,
    ) -> Result<BenchmarkLookup, ApiError> {
        let url = self.endpoint(&["industries", industry_title, "benchmark"])?;
        let response = self.get_with_retry(&url, cancel).await?;
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(industry = industry_title, "No benchmark for industry.");
            return Ok(BenchmarkLookup::NotFound);
        }
        Self::ensure_success(&response, format!("industry {}", industry_title))?;

        let benchmark: Option<IndustryBenchmarkResponse> = Self::read_json(response, cancel).await?;
        Ok(benchmark.map(IndustryBenchmark::from).into())
    }
}
