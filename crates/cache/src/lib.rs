//! # Read-through cache for the company info service
//!
//! `CachingProvider` wraps any `CompanyInfoProvider` and serves repeated calls from memory
//! until their time-to-live runs out. Each of the three operations has its own
//! `moka` cache, keyed by the call argument.
//!
//! - Successful results are stored wholesale and expire `ttl` after insertion.
//! - Failures (including cancellation) are never stored.
//! - A missing benchmark is a successful result and is cached like any other.
//! - Each cache holds at most `max_capacity` entries; moka evicts beyond that.
//!
//! Two concurrent misses for the same key may both reach the provider; the last write wins.

use api_client::CompanyInfoProvider;
use api_client::error::ApiError;
use async_trait::async_trait;
use configuration::CacheSettings;
use core_types::{BenchmarkLookup, ExecutiveRecord, Listing};
use moka::future::Cache;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Entry counts per operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub listings: u64,
    pub executives: u64,
    pub benchmarks: u64,
}

impl CacheStats {
    pub fn total(&self) -> u64 {
        self.listings + self.executives + self.benchmarks
    }
}

pub struct CachingProvider<P> {
    inner: P,
    listings: Cache<String, Vec<Listing>>,
    executives: Cache<String, Vec<ExecutiveRecord>>,
    benchmarks: Cache<String, BenchmarkLookup>,
}

fn build_cache<V>(ttl: Duration, max_capacity: u64) -> Cache<String, V>
where
    V: Clone + Send + Sync + 'static,
{
    Cache::builder()
        .time_to_live(ttl)
        .max_capacity(max_capacity)
        .build()
}

impl<P: CompanyInfoProvider> CachingProvider<P> {
    pub fn new(inner: P, ttl: Duration, max_capacity: u64) -> Self {
        Self {
            inner,
            listings: build_cache(ttl, max_capacity),
            executives: build_cache(ttl, max_capacity),
            benchmarks: build_cache(ttl, max_capacity),
        }
    }

    pub fn from_settings(inner: P, settings: &CacheSettings) -> Self {
        Self::new(inner, settings.ttl(), settings.max_capacity)
    }

    /// Live entry counts. Pending maintenance (expiry, eviction) is applied first.
    pub async fn stats(&self) -> CacheStats {
        self.listings.run_pending_tasks().await;
        self.executives.run_pending_tasks().await;
        self.benchmarks.run_pending_tasks().await;
        CacheStats {
            listings: self.listings.entry_count(),
            executives: self.executives.entry_count(),
            benchmarks: self.benchmarks.entry_count(),
        }
    }
}

#[async_trait]
impl<P: CompanyInfoProvider> CompanyInfoProvider for CachingProvider<P> {
    async fn get_listings(
        &self,
        exchange_symbol: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Listing>, ApiError> {
        if let Some(cached) = self.listings.get(exchange_symbol).await {
            tracing::debug!(exchange = exchange_symbol, "Serving listings from cache.");
            return Ok(cached);
        }
        let listings = self.inner.get_listings(exchange_symbol, cancel).await?;
        tracing::debug!(exchange = exchange_symbol, "Inserting listings into cache.");
        self.listings
            .insert(exchange_symbol.to_string(), listings.clone())
            .await;
        Ok(listings)
    }

    async fn get_executives(
        &self,
        company_symbol: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ExecutiveRecord>, ApiError> {
        if let Some(cached) = self.executives.get(company_symbol).await {
            tracing::debug!(company = company_symbol, "Serving executives from cache.");
            return Ok(cached);
        }
        let executives = self.inner.get_executives(company_symbol, cancel).await?;
        tracing::debug!(company = company_symbol, "Inserting executives into cache.");
        self.executives
            .insert(company_symbol.to_string(), executives.clone())
            .await;
        Ok(executives)
    }

    async fn get_benchmark(
        &self,
        industry_title: &str,
        cancel: &CancellationToken,
    ) -> Result<BenchmarkLookup, ApiError> {
        if let Some(cached) = self.benchmarks.get(industry_title).await {
            tracing::debug!(industry = industry_title, "Serving benchmark from cache.");
            return Ok(cached);
        }
        let benchmark = self.inner.get_benchmark(industry_title, cancel).await?;
        tracing::debug!(industry = industry_title, "Inserting benchmark into cache.");
        self.benchmarks
            .insert(industry_title.to_string(), benchmark.clone())
            .await;
        Ok(benchmark)
    }
}
