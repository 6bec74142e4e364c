// Market-data provider: trait seam plus the HTTP implementation.

pub mod fetcher;
pub mod traits;
#[cfg(test)]
pub mod stub;

pub use fetcher::FmpClient;
pub use traits::MarketData;
