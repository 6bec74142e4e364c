// Core structs: price history, financial statements, errors
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

/// One closing price of a ticker on a trading day.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Closing prices of one ticker, most recent first.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    pub ticker: String,
    pub points: Vec<PricePoint>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    pub date: NaiveDate,
    pub revenue: f64,
    pub ebitda: f64,
    pub depreciation_and_amortization: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    pub date: NaiveDate,
    pub common_stock: f64,
    pub cash_and_cash_equivalents: f64,
    pub total_debt: f64,
    pub total_equity: f64,
    pub total_current_assets: f64,
    pub total_current_liabilities: f64,
    pub total_stockholders_equity: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowStatement {
    pub date: NaiveDate,
    pub free_cash_flow: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseValue {
    pub date: NaiveDate,
    pub market_capitalization: f64,
    pub enterprise_value: f64,
    pub stock_price: f64,
}

/// Everything the DCF worksheet needs for one ticker, newest period first.
#[derive(Debug, Clone)]
pub struct FinancialStatements {
    pub income: Vec<IncomeStatement>,
    pub balance: Vec<BalanceSheet>,
    pub cash_flow: Vec<CashFlowStatement>,
    pub values: Vec<EnterpriseValue>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned status {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },
    #[error("unknown ticker: {0}")]
    UnknownTicker(String),
    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("{ticker}: requested {requested} days but only {available} available")]
    InsufficientHistory {
        ticker: String,
        requested: usize,
        available: usize,
    },
    #[error("{weights} weights given for {tickers} tickers")]
    WeightMismatch { weights: usize, tickers: usize },
    #[error("invalid portfolio: {0}")]
    InvalidPortfolio(String),
    #[error("chart output failed: {0}")]
    Chart(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum WorksheetError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("{statement}: need {required} periods, provider returned {available}")]
    InsufficientPeriods {
        statement: &'static str,
        required: usize,
        available: usize,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("correlation matrix not loaded")]
    NotLoaded,
    #[error("cannot read correlation file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("malformed correlation matrix: {0}")]
    Malformed(String),
    #[error("need at least {required} assets, have {available}")]
    TooFewAssets { required: usize, available: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no API key configured (set api.api_key or FMP_API_KEY)")]
    MissingApiKey,
}
