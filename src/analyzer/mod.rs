// Analyzer module: price tables, return series and covariance risk.

pub mod portfolio;
pub mod returns;
pub mod risk;
pub mod table;

// Re-export the main analyzer for ease of use.
pub use portfolio::PortfolioAnalyzer;
pub use returns::CumulativeReturns;
pub use table::PortfolioTable;
