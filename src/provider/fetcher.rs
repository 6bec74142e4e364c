use crate::model::{
    BalanceSheet, CashFlowStatement, EnterpriseValue, FetchError, IncomeStatement, PricePoint,
};
use crate::provider::MarketData;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct HistoricalResponse {
    #[serde(default)]
    historical: Vec<PricePoint>,
}

/// Blocking client for the financialmodelingprep REST API.
pub struct FmpClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FmpClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) Stockfolio/0.1")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// The ticker is sent as given; the provider expects upper-case symbols.
    fn build_url(&self, endpoint: &str, ticker: &str) -> String {
        format!("{}/{}/{}", self.base_url, endpoint, ticker)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        ticker: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = self.build_url(endpoint, ticker);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("apikey", self.api_key.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    fn get_statements<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        ticker: &str,
        limit: &str,
    ) -> Result<Vec<T>, FetchError> {
        let records: Vec<T> = self.get_json(endpoint, ticker, &[("limit", limit)])?;
        if records.is_empty() {
            return Err(FetchError::UnknownTicker(ticker.to_string()));
        }
        Ok(records)
    }
}

impl MarketData for FmpClient {
    fn historical_prices(&self, ticker: &str) -> Result<Vec<PricePoint>, FetchError> {
        let response: HistoricalResponse =
            self.get_json("historical-price-full", ticker, &[("serietype", "line")])?;
        if response.historical.is_empty() {
            return Err(FetchError::UnknownTicker(ticker.to_string()));
        }
        Ok(response.historical)
    }

    fn income_statements(&self, ticker: &str) -> Result<Vec<IncomeStatement>, FetchError> {
        self.get_statements("income-statement", ticker, "120")
    }

    fn balance_sheets(&self, ticker: &str) -> Result<Vec<BalanceSheet>, FetchError> {
        self.get_statements("balance-sheet-statement", ticker, "120")
    }

    fn cash_flows(&self, ticker: &str) -> Result<Vec<CashFlowStatement>, FetchError> {
        self.get_statements("cash-flow-statement", ticker, "120")
    }

    fn enterprise_values(&self, ticker: &str) -> Result<Vec<EnterpriseValue>, FetchError> {
        self.get_statements("enterprise-values", ticker, "40")
    }
}
