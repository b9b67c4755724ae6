//! # Compensation Engine
//!
//! Answers "which executives on an exchange earn materially more than their industry's
//! benchmark?" by fanning out over the company info service in three stages:
//!
//! 1. listings of the exchange,
//! 2. executives of every distinct company (concurrently),
//! 3. benchmarks of every distinct industry (concurrently),
//!
//! and joining the results with [`filter_by_benchmark`].
//!
//! ## Concurrency
//!
//! Every provider call passes through one admission gate (a semaphore owned by the engine
//! and shared by all runs), so no more than `max_concurrent_requests` calls are ever in
//! flight. Permits are RAII guards and are returned on every exit path.
//!
//! A failed fetch aborts the whole run: `try_join_all` drops the sibling futures, which
//! cancels their requests. The same happens when the caller's cancellation token fires.

use crate::error::Fetch;
use api_client::CompanyInfoProvider;
use configuration::EngineSettings;
use core_types::{BenchmarkLookup, ExecutiveCompensationResult, ExecutiveRecord, Listing};
use futures::future::try_join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Semaphore, SemaphorePermit};
use tokio_util::sync::CancellationToken;

pub mod error;
pub mod filter;

pub use error::{EngineError, ErrorKind};
pub use filter::{filter_by_benchmark, DEFAULT_COMPENSATION_MULTIPLE};

pub struct CompensationEngine {
    provider: Arc<dyn CompanyInfoProvider>,
    gate: Semaphore,
    compensation_multiple: f64,
}

impl CompensationEngine {
    pub fn new(provider: Arc<dyn CompanyInfoProvider>, settings: &EngineSettings) -> Self {
        Self {
            provider,
            gate: Semaphore::new(settings.max_concurrent_requests.max(1)),
            compensation_multiple: settings.compensation_multiple,
        }
    }

    /// Permits currently free in the admission gate.
    pub fn available_permits(&self) -> usize {
        self.gate.available_permits()
    }

    /// Finds the executives on `exchange` whose compensation clears their industry benchmark.
    ///
    /// Results are ordered by occurrence: companies in listing order, executives in the
    /// order the provider returned them. No partial result is ever returned on error.
    pub async fn run(
        &self,
        exchange: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ExecutiveCompensationResult>, EngineError> {
        tracing::info!(exchange, "Starting compensation run.");

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(EngineError::Cancelled),
            result = self.run_stages(exchange, cancel) => result,
        };

        match &outcome {
            Ok(results) => tracing::info!(exchange, matches = results.len(), "Compensation run complete."),
            Err(EngineError::Cancelled) => tracing::info!(exchange, "Compensation run cancelled."),
            Err(e) => tracing::warn!(exchange, error = %e, "Compensation run aborted."),
        }
        outcome
    }

    async fn run_stages(
        &self,
        exchange: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ExecutiveCompensationResult>, EngineError> {
        let listings = self.fetch_listings(exchange, cancel).await?;
        if listings.is_empty() {
            // Every real exchange has listings; zero almost certainly means the backend is unhealthy.
            return Err(EngineError::NoListingsFound(exchange.to_string()));
        }

        let symbols = distinct_non_empty(listings.iter().map(|l| l.symbol.as_str()));
        tracing::debug!(exchange, listings = listings.len(), companies = symbols.len(), "Fetching executives.");
        let executives: Vec<ExecutiveRecord> =
            try_join_all(symbols.iter().map(|symbol| self.fetch_executives(symbol, cancel)))
                .await?
                .into_iter()
                .flatten()
                .collect();

        let industries = distinct_non_empty(executives.iter().map(|e| e.industry_title.as_str()));
        tracing::debug!(exchange, executives = executives.len(), industries = industries.len(), "Fetching benchmarks.");
        let lookups =
            try_join_all(industries.iter().map(|industry| self.fetch_benchmark(industry, cancel)))
                .await?;

        let benchmark_by_industry: HashMap<String, f64> = lookups
            .into_iter()
            .filter_map(|lookup| match lookup {
                BenchmarkLookup::Found(b) => Some((b.industry_title, b.average_compensation)),
                BenchmarkLookup::NotFound => None,
            })
            .collect();

        Ok(filter_by_benchmark(
            &executives,
            &benchmark_by_industry,
            self.compensation_multiple,
        ))
    }

    /// Waits for a slot in the admission gate. The permit is released when dropped.
    async fn admit(&self) -> Result<SemaphorePermit<'_>, EngineError> {
        // The gate is never closed, so this only fails while the engine is being torn down.
        self.gate.acquire().await.map_err(|_| EngineError::Cancelled)
    }

    async fn fetch_listings(
        &self,
        exchange: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Listing>, EngineError> {
        let listings = {
            let _permit = self.admit().await?;
            self.provider
                .get_listings(exchange, cancel)
                .await
                .map_err(|e| EngineError::from_provider(Fetch::Listings(exchange.to_string()), e))?
        };

        for listing in &listings {
            if !listing.kind.is_equity() {
                return Err(EngineError::ContractViolation(format!(
                    "Unexpected stock type: {}",
                    listing.kind.as_str()
                )));
            }
            if listing.exchange != exchange {
                return Err(EngineError::ContractViolation(format!(
                    "Unexpected stock exchange symbol: {} (requested {})",
                    listing.exchange, exchange
                )));
            }
        }
        Ok(listings)
    }

    async fn fetch_executives(
        &self,
        company_symbol: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ExecutiveRecord>, EngineError> {
        let executives = {
            let _permit = self.admit().await?;
            self.provider
                .get_executives(company_symbol, cancel)
                .await
                .map_err(|e| {
                    EngineError::from_provider(Fetch::Executives(company_symbol.to_string()), e)
                })?
        };

        if let Some(stray) = executives.iter().find(|e| e.company_symbol != company_symbol) {
            return Err(EngineError::ContractViolation(format!(
                "Unexpected executive company symbol: {} (requested {})",
                stray.company_symbol, company_symbol
            )));
        }
        if let Some(bad) = executives
            .iter()
            .find(|e| e.total_compensation.is_nan() || e.total_compensation < 0.0)
        {
            return Err(EngineError::ContractViolation(format!(
                "Unexpected compensation for {}: {}",
                bad.name_and_position, bad.total_compensation
            )));
        }
        Ok(executives)
    }

    async fn fetch_benchmark(
        &self,
        industry_title: &str,
        cancel: &CancellationToken,
    ) -> Result<BenchmarkLookup, EngineError> {
        let lookup = {
            let _permit = self.admit().await?;
            self.provider
                .get_benchmark(industry_title, cancel)
                .await
                .map_err(|e| {
                    EngineError::from_provider(Fetch::Benchmark(industry_title.to_string()), e)
                })?
        };

        if let Some(benchmark) = lookup.found() {
            if benchmark.industry_title != industry_title {
                return Err(EngineError::ContractViolation(format!(
                    "Unexpected benchmark industry title: {} (requested {})",
                    benchmark.industry_title, industry_title
                )));
            }
        }
        Ok(lookup)
    }
}

/// Distinct non-empty values, in order of first appearance.
fn distinct_non_empty<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .map(str::to_string)
        .collect()
}
