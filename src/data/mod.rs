//! Client for the upstream market-data REST backend.
//!
//! Every call is a single request/response with a bearer token; there is
//! no retry or caching here. Rows come back as loosely-typed JSON (the
//! SMA feed serves its numeric columns as strings) and are mapped to the
//! typed rows the table utilities work over.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::{Cell, TableRow};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status} for {endpoint}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },
}

/// One constituent of the index listing served by `/data/n-50`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexRow {
    pub symbol: String,
    pub company_name: String,
    pub industry: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexSortKey {
    Symbol,
    CompanyName,
    Industry,
}

impl TableRow for IndexRow {
    type SortKey = IndexSortKey;

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.symbol, &self.company_name, &self.industry]
    }

    fn cell(&self, key: IndexSortKey) -> Cell<'_> {
        match key {
            IndexSortKey::Symbol => Cell::Text(&self.symbol),
            IndexSortKey::CompanyName => Cell::Text(&self.company_name),
            IndexSortKey::Industry => Cell::Text(&self.industry),
        }
    }
}

/// One row of the SMA proximity feed. The backend serves the numeric
/// columns as pre-formatted strings; they are parsed only when a numeric
/// sort asks for them, with unparseable values treated as NaN.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SmaRow {
    pub symbol: String,
    pub close: String,
    pub sma: String,
    pub proximity_pct: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SmaSortKey {
    Symbol,
    Close,
    Sma,
    #[serde(alias = "proximity_pct")]
    ProximityPct,
}

impl TableRow for SmaRow {
    type SortKey = SmaSortKey;

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.symbol]
    }

    fn cell(&self, key: SmaSortKey) -> Cell<'_> {
        match key {
            SmaSortKey::Symbol => Cell::Text(&self.symbol),
            SmaSortKey::Close => Cell::Number(parse_numeric(&self.close)),
            SmaSortKey::Sma => Cell::Number(parse_numeric(&self.sma)),
            SmaSortKey::ProximityPct => Cell::Number(parse_numeric(&self.proximity_pct)),
        }
    }
}

fn parse_numeric(raw: &str) -> f64 {
    raw.trim()
        .trim_end_matches('%')
        .parse()
        .unwrap_or(f64::NAN)
}

#[derive(Debug, Serialize)]
struct SmaRequest<'a> {
    tp: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<&'a str>,
}

/// Authenticated client for the market-data backend.
#[derive(Debug, Clone)]
pub struct MarketDataClient {
    http: Client,
    base_url: String,
    token: String,
}

impl MarketDataClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
            token: token.into(),
        }
    }

    /// Fetch the Nifty 50 constituent listing.
    pub async fn nifty50(&self) -> Result<Vec<IndexRow>, DataError> {
        self.get("/data/n-50").await
    }

    /// Fetch stocks near their `tp`-day simple moving average.
    pub async fn sma(&self, tp: u32) -> Result<Vec<SmaRow>, DataError> {
        self.post("/data/sma", &SmaRequest { tp, date: None }).await
    }

    /// Dates for which historical SMA snapshots are available.
    pub async fn sma_dates(&self) -> Result<Vec<String>, DataError> {
        self.get("/data/sma/dates").await
    }

    /// Fetch the `tp`-day SMA snapshot as of a specific date.
    pub async fn sma_by_date(&self, tp: u32, date: &str) -> Result<Vec<SmaRow>, DataError> {
        self.post(
            "/data/sma/by-date",
            &SmaRequest {
                tp,
                date: Some(date),
            },
        )
        .await
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &'static str) -> Result<T, DataError> {
        debug!(endpoint, "fetching from backend");
        let response = self
            .http
            .get(format!("{}{}", self.base_url, endpoint))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Self::decode(endpoint, response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> Result<T, DataError> {
        debug!(endpoint, "fetching from backend");
        let response = self
            .http
            .post(format!("{}{}", self.base_url, endpoint))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Self::decode(endpoint, response).await
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> Result<T, DataError> {
        let status = response.status();
        if !status.is_success() {
            warn!(endpoint, %status, "backend rejected request");
            return Err(DataError::Status { endpoint, status });
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::core::{SortConfig, SortOrder, sort_rows};

    #[test]
    fn index_row_parses_backend_wire_shape() {
        let json = r#"{
            "symbol": "RELIANCE",
            "companyName": "Reliance Industries Ltd.",
            "industry": "Oil Gas & Consumable Fuels"
        }"#;
        let row: IndexRow = serde_json::from_str(json).expect("valid row");
        assert_eq!(
            row,
            IndexRow {
                symbol: "RELIANCE".to_string(),
                company_name: "Reliance Industries Ltd.".to_string(),
                industry: "Oil Gas & Consumable Fuels".to_string(),
            }
        );
    }

    #[test]
    fn index_row_serializes_back_to_camel_case() {
        let row = IndexRow {
            symbol: "TCS".to_string(),
            company_name: "Tata Consultancy Services Ltd.".to_string(),
            industry: "Information Technology".to_string(),
        };
        let json = serde_json::to_value(&row).expect("serializable");
        assert_eq!(json["companyName"], "Tata Consultancy Services Ltd.");
    }

    #[test]
    fn sma_row_keeps_string_columns_verbatim() {
        let json = r#"{
            "symbol": "INFY",
            "close": "1520.35",
            "sma": "1498.10",
            "proximity_pct": "1.49"
        }"#;
        let row: SmaRow = serde_json::from_str(json).expect("valid row");
        assert_eq!(row.close, "1520.35");
        assert_eq!(row.proximity_pct, "1.49");
    }

    #[test]
    fn sma_sort_key_accepts_wire_and_camel_case_spellings() {
        let camel: SmaSortKey = serde_json::from_str(r#""proximityPct""#).expect("camel");
        let wire: SmaSortKey = serde_json::from_str(r#""proximity_pct""#).expect("snake");
        assert_eq!(camel, SmaSortKey::ProximityPct);
        assert_eq!(wire, SmaSortKey::ProximityPct);
    }

    #[test]
    fn sma_rows_sort_numerically_not_lexically() {
        let mut rows = vec![
            SmaRow {
                symbol: "A".to_string(),
                close: "900.0".to_string(),
                sma: "0".to_string(),
                proximity_pct: "0".to_string(),
            },
            SmaRow {
                symbol: "B".to_string(),
                close: "1520.0".to_string(),
                sma: "0".to_string(),
                proximity_pct: "0".to_string(),
            },
        ];
        // Lexical order would put "1520.0" before "900.0".
        sort_rows(
            &mut rows,
            SortConfig {
                key: Some(SmaSortKey::Close),
                order: SortOrder::Ascending,
            },
        );
        assert_eq!(rows[0].symbol, "A");
        assert_eq!(rows[1].symbol, "B");
    }

    #[test]
    fn unparseable_numeric_column_becomes_nan() {
        let row = SmaRow {
            symbol: "X".to_string(),
            close: "n/a".to_string(),
            sma: "100".to_string(),
            proximity_pct: "2.5%".to_string(),
        };
        match row.cell(SmaSortKey::Close) {
            Cell::Number(v) => assert!(v.is_nan()),
            Cell::Text(_) => panic!("close must be numeric"),
        }
        // A trailing percent sign still parses.
        match row.cell(SmaSortKey::ProximityPct) {
            Cell::Number(v) => assert_eq!(v, 2.5),
            Cell::Text(_) => panic!("proximity must be numeric"),
        }
    }

    #[test]
    fn sma_request_omits_date_when_absent() {
        let body = serde_json::to_value(SmaRequest {
            tp: 50,
            date: None,
        })
        .expect("serializable");
        assert_eq!(body, serde_json::json!({ "tp": 50 }));

        let dated = serde_json::to_value(SmaRequest {
            tp: 200,
            date: Some("2025-06-30"),
        })
        .expect("serializable");
        assert_eq!(
            dated,
            serde_json::json!({ "tp": 200, "date": "2025-06-30" })
        );
    }
}
