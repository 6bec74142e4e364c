//! Portfolio statistics and correlation networks from market data.
//!
//! - [`analyzer::PortfolioAnalyzer`]: price table, cumulative return,
//!   covariance risk and the DCF worksheet for a weighted set of tickers
//! - [`network::FiedlerGraph`]: Laplacian, edge list, DOT rendering and
//!   Fiedler partition of an asset-correlation matrix
//!
//! Loading this crate has no side effects; the `stockfolio` binary runs the
//! jobs listed in `config.json`.

pub mod analyzer;
pub mod chart;
pub mod config;
pub mod model;
pub mod network;
pub mod provider;
pub mod utils;
pub mod worksheet;

pub use analyzer::PortfolioAnalyzer;
pub use network::FiedlerGraph;
pub use provider::{FmpClient, MarketData};
