use core_types::{ExecutiveRecord, IndustryBenchmark, Listing, ListingKind};
use serde::{Deserialize, Serialize};

// Using `#[serde(rename_all = "camelCase")]` to automatically map from JSON camelCase to Rust snake_case.
// The service leaves fields out or sends `null` freely, so every string is optional on the wire
// and collapses to "" once converted.

/// One entry of `GET api/exchanges/{exchange}/companies`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockInfoResponse {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub exchange_short_name: Option<String>,
    #[serde(rename = "type", default)]
    pub stock_type: Option<String>,
}

/// One entry of `GET api/companies/{symbol}/executives`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveResponse {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub industry_title: Option<String>,
    #[serde(default)]
    pub name_and_position: Option<String>,
    #[serde(default)]
    pub total: f64,
}

/// The body of `GET api/industries/{industry}/benchmark`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryBenchmarkResponse {
    #[serde(default)]
    pub industry_title: Option<String>,
    #[serde(default)]
    pub average_compensation: f64,
}

impl From<StockInfoResponse> for Listing {
    fn from(raw: StockInfoResponse) -> Self {
        Listing {
            symbol: raw.symbol.unwrap_or_default(),
            exchange: raw.exchange_short_name.unwrap_or_default(),
            kind: ListingKind::from(raw.stock_type.unwrap_or_default()),
        }
    }
}

impl From<ExecutiveResponse> for ExecutiveRecord {
    fn from(raw: ExecutiveResponse) -> Self {
        ExecutiveRecord {
            company_symbol: raw.symbol.unwrap_or_default(),
            industry_title: raw.industry_title.unwrap_or_default(),
            name_and_position: raw.name_and_position.unwrap_or_default(),
            total_compensation: raw.total,
        }
    }
}

impl From<IndustryBenchmarkResponse> for IndustryBenchmark {
    fn from(raw: IndustryBenchmarkResponse) -> Self {
        IndustryBenchmark {
            industry_title: raw.industry_title.unwrap_or_default(),
            average_compensation: raw.average_compensation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_become_empty() {
        let raw: ExecutiveResponse =
            serde_json::from_str(r#"{"symbol":"GOOG","industryTitle":null,"nameAndPosition":"Scott Silver VP","total":200000.0}"#)
                .unwrap();
        let record = ExecutiveRecord::from(raw);
        assert_eq!(record.company_symbol, "GOOG");
        assert_eq!(record.industry_title, "");
        assert_eq!(record.total_compensation, 200000.0);
    }

    #[test]
    fn stock_type_maps_to_listing_kind() {
        let raw: StockInfoResponse =
            serde_json::from_str(r#"{"symbol":"BRDL","exchangeShortName":"ASX","type":"mutual_fund"}"#).unwrap();
        let listing = Listing::from(raw);
        assert_eq!(listing.exchange, "ASX");
        assert_eq!(listing.kind, ListingKind::Other("mutual_fund".to_string()));
    }
}
