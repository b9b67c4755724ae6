use crate::enums::ListingKind;
use serde::{Deserialize, Serialize};

/// A tradeable instrument listed on an exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub symbol: String,
    pub exchange: String,
    pub kind: ListingKind,
}

/// A single executive of a listed company, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveRecord {
    pub company_symbol: String,
    /// May be empty when the provider has no industry classification.
    pub industry_title: String,
    pub name_and_position: String,
    pub total_compensation: f64,
}

/// The average total compensation paid in an industry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryBenchmark {
    pub industry_title: String,
    pub average_compensation: f64,
}

/// An executive whose compensation clears their industry benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveCompensationResult {
    pub name_and_position: String,
    pub compensation: f64,
    pub average_industry_compensation: f64,
}
