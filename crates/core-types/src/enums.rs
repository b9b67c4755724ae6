use crate::structs::IndustryBenchmark;
use serde::{Deserialize, Serialize};

/// The instrument type of a listing. The provider reports common stock as `"stock"`;
/// everything else (funds, warrants, ...) is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ListingKind {
    Equity,
    Other(String),
}

impl ListingKind {
    pub const EQUITY_WIRE_NAME: &'static str = "stock";

    pub fn is_equity(&self) -> bool {
        matches!(self, ListingKind::Equity)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ListingKind::Equity => Self::EQUITY_WIRE_NAME,
            ListingKind::Other(kind) => kind,
        }
    }
}

impl From<String> for ListingKind {
    fn from(value: String) -> Self {
        if value == Self::EQUITY_WIRE_NAME {
            ListingKind::Equity
        } else {
            ListingKind::Other(value)
        }
    }
}

impl From<&str> for ListingKind {
    fn from(value: &str) -> Self {
        ListingKind::from(value.to_string())
    }
}

impl From<ListingKind> for String {
    fn from(value: ListingKind) -> Self {
        match value {
            ListingKind::Equity => ListingKind::EQUITY_WIRE_NAME.to_string(),
            ListingKind::Other(kind) => kind,
        }
    }
}

/// The outcome of a successful benchmark lookup.
///
/// A missing benchmark is a valid answer from the provider, not a failure, so it is
/// modelled as its own variant rather than as `Option` to keep it distinct from a cache miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BenchmarkLookup {
    Found(IndustryBenchmark),
    NotFound,
}

impl BenchmarkLookup {
    pub fn found(&self) -> Option<&IndustryBenchmark> {
        match self {
            BenchmarkLookup::Found(benchmark) => Some(benchmark),
            BenchmarkLookup::NotFound => None,
        }
    }
}

impl From<Option<IndustryBenchmark>> for BenchmarkLookup {
    fn from(value: Option<IndustryBenchmark>) -> Self {
        match value {
            Some(benchmark) => BenchmarkLookup::Found(benchmark),
            None => BenchmarkLookup::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_maps_to_equity() {
        assert_eq!(ListingKind::from("stock"), ListingKind::Equity);
        assert_eq!(
            ListingKind::from("mutual_fund"),
            ListingKind::Other("mutual_fund".to_string())
        );
    }

    #[test]
    fn listing_kind_keeps_wire_name() {
        let kind: ListingKind = serde_json::from_str("\"etf\"").unwrap();
        assert_eq!(kind.as_str(), "etf");
        assert_eq!(serde_json::to_string(&ListingKind::Equity).unwrap(), "\"stock\"");
    }

    #[test]
    fn benchmark_lookup_from_option() {
        let benchmark = IndustryBenchmark {
            industry_title: "BOARD SERVICES".to_string(),
            average_compensation: 100000.0,
        };
        assert_eq!(
            BenchmarkLookup::from(Some(benchmark.clone())).found(),
            Some(&benchmark)
        );
        assert_eq!(BenchmarkLookup::from(None), BenchmarkLookup::NotFound);
    }
}
