use crate::analyzer::returns::{self, CumulativeReturns};
use crate::analyzer::risk::portfolio_risk;
use crate::analyzer::table::PortfolioTable;
use crate::chart::ChartSink;
use crate::model::{AnalysisError, PriceSeries, WorksheetError};
use crate::provider::MarketData;
use crate::worksheet::{DcfWorksheet, write_dcf_csv};
use nalgebra::DVector;
use std::path::Path;
use tracing::info;

/// Price history and derived statistics for a weighted set of tickers.
///
/// Everything is fetched at construction; later calls only read the stored
/// tables, so operations can be called in any order and any number of times.
pub struct PortfolioAnalyzer<M: MarketData> {
    provider: M,
    weights: DVector<f64>,
    days: usize,
    prices: PortfolioTable,
    returns: PortfolioTable,
}

impl<M: MarketData> PortfolioAnalyzer<M> {
    pub fn new(
        provider: M,
        tickers: &[String],
        weights: &[f64],
        days: usize,
    ) -> Result<Self, AnalysisError> {
        if tickers.is_empty() {
            return Err(AnalysisError::InvalidPortfolio("no tickers given".into()));
        }
        if weights.len() != tickers.len() {
            return Err(AnalysisError::WeightMismatch {
                weights: weights.len(),
                tickers: tickers.len(),
            });
        }
        if days < 2 {
            return Err(AnalysisError::InvalidPortfolio(format!(
                "need at least 2 days of prices, got {}",
                days
            )));
        }

        let mut series = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            info!("Fetching {} days of prices for {}...", days, ticker);
            let mut points = provider.historical_prices(ticker)?;
            if points.len() < days {
                return Err(AnalysisError::InsufficientHistory {
                    ticker: ticker.clone(),
                    requested: days,
                    available: points.len(),
                });
            }
            points.truncate(days);
            series.push(PriceSeries {
                ticker: ticker.clone(),
                points,
            });
        }

        let prices = PortfolioTable::from_series(&series);
        let returns = prices.reverse_pct_change();
        info!(
            "Portfolio ready: {} tickers, {} price rows, {} return rows",
            tickers.len(),
            prices.len(),
            returns.len()
        );

        Ok(Self {
            provider,
            weights: DVector::from_column_slice(weights),
            days,
            prices,
            returns,
        })
    }

    pub fn tickers(&self) -> &[String] {
        self.prices.tickers()
    }

    pub fn weights(&self) -> &DVector<f64> {
        &self.weights
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn prices(&self) -> &PortfolioTable {
        &self.prices
    }

    pub fn returns(&self) -> &PortfolioTable {
        &self.returns
    }

    pub fn cumulative_returns(&self) -> CumulativeReturns {
        returns::cumulative_returns(&self.returns, &self.weights)
    }

    /// Sends the cumulative return series to `sink`, most recent date leftmost.
    pub fn graph_return<S: ChartSink>(
        &self,
        sink: &mut S,
    ) -> Result<CumulativeReturns, AnalysisError> {
        let cumulative = self.cumulative_returns();
        sink.plot_series("cum_return", &cumulative.points(), true)?;
        Ok(cumulative)
    }

    pub fn average_daily_return(&self) -> f64 {
        returns::average_daily_return(&self.returns, &self.weights)
    }

    /// Risk computed on closing prices.
    pub fn calc_risk(&self) -> f64 {
        portfolio_risk(&self.prices, &self.weights, self.days)
    }

    /// Risk computed on daily percentage returns.
    pub fn calc_pct_risk(&self) -> f64 {
        portfolio_risk(&self.returns, &self.weights, self.days)
    }

    pub fn write_dcf_csv(
        &self,
        path: impl AsRef<Path>,
        ticker: &str,
    ) -> Result<DcfWorksheet, WorksheetError> {
        write_dcf_csv(&self.provider, path.as_ref(), ticker)
    }
}
