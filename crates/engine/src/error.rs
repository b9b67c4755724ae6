use api_client::error::ApiError;
use std::fmt;
use thiserror::Error;

/// Identifies which provider call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    Listings(String),
    Executives(String),
    Benchmark(String),
}

impl fmt::Display for Fetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fetch::Listings(exchange) => write!(f, "listings for exchange {}", exchange),
            Fetch::Executives(company) => write!(f, "executives for company {}", company),
            Fetch::Benchmark(industry) => write!(f, "benchmark for industry {}", industry),
        }
    }
}

/// The coarse class of an `EngineError`, used to pick a response at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ProviderFailure,
    ContractViolation,
    NoListingsFound,
    Cancelled,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Fetching {fetch} failed: {source}")]
    ProviderFailure {
        fetch: Fetch,
        #[source]
        source: ApiError,
    },

    #[error("Provider returned inconsistent data: {0}")]
    ContractViolation(String),

    #[error("Found 0 stocks on the {0}")]
    NoListingsFound(String),

    #[error("The run was cancelled")]
    Cancelled,
}

impl EngineError {
    /// Wraps a provider error, keeping cancellation distinct from failure.
    pub(crate) fn from_provider(fetch: Fetch, source: ApiError) -> Self {
        if source.is_cancelled() {
            EngineError::Cancelled
        } else {
            EngineError::ProviderFailure { fetch, source }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::ProviderFailure { .. } => ErrorKind::ProviderFailure,
            EngineError::ContractViolation(_) => ErrorKind::ContractViolation,
            EngineError::NoListingsFound(_) => ErrorKind::NoListingsFound,
            EngineError::Cancelled => ErrorKind::Cancelled,
        }
    }
}
