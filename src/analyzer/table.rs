use crate::model::PriceSeries;
use crate::utils::nan_mean;
use chrono::NaiveDate;
use nalgebra::DMatrix;
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

/// Date-indexed table with one column per ticker, most recent row first.
///
/// Cells missing from a ticker's history are `NaN`; dates are never
/// reconciled across tickers.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioTable {
    tickers: Vec<String>,
    dates: Vec<NaiveDate>,
    values: DMatrix<f64>,
}

impl PortfolioTable {
    pub fn new(tickers: Vec<String>, dates: Vec<NaiveDate>, values: DMatrix<f64>) -> Self {
        debug_assert_eq!(values.nrows(), dates.len());
        debug_assert_eq!(values.ncols(), tickers.len());
        Self {
            tickers,
            dates,
            values,
        }
    }

    /// Outer-joins the series on date.
    pub fn from_series(series: &[PriceSeries]) -> Self {
        let dates: Vec<NaiveDate> = series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .rev()
            .collect();

        let mut values = DMatrix::from_element(dates.len(), series.len(), f64::NAN);
        let mut gaps = 0;
        for (col, s) in series.iter().enumerate() {
            let by_date: HashMap<NaiveDate, f64> =
                s.points.iter().map(|p| (p.date, p.close)).collect();
            for (row, date) in dates.iter().enumerate() {
                match by_date.get(date) {
                    Some(&close) => values[(row, col)] = close,
                    None => gaps += 1,
                }
            }
        }
        if gaps > 0 {
            warn!("Price table has {} missing cells; trading days differ between tickers", gaps);
        }

        Self {
            tickers: series.iter().map(|s| s.ticker.clone()).collect(),
            dates,
            values,
        }
    }

    /// Day-over-day change against the *following* (older) row:
    /// `r[i] = p[i] / p[i + 1] - 1`. The oldest row has no successor and is dropped.
    pub fn reverse_pct_change(&self) -> Self {
        let rows = self.values.nrows().saturating_sub(1);
        let values = DMatrix::from_fn(rows, self.values.ncols(), |r, c| {
            self.values[(r, c)] / self.values[(r + 1, c)] - 1.0
        });

        Self {
            tickers: self.tickers.clone(),
            dates: self.dates[..rows].to_vec(),
            values,
        }
    }

    /// Copy of the values with each column's mean subtracted.
    pub fn demeaned(&self) -> DMatrix<f64> {
        let mut centred = self.values.clone();
        for mut column in centred.column_iter_mut() {
            let mean = nan_mean(column.iter().copied());
            column.add_scalar_mut(-mean);
        }
        centred
    }

    pub fn column_means(&self) -> Vec<f64> {
        self.values
            .column_iter()
            .map(|c| nan_mean(c.iter().copied()))
            .collect()
    }

    pub fn column(&self, ticker: &str) -> Option<Vec<f64>> {
        let idx = self.tickers.iter().position(|t| t == ticker)?;
        Some(self.values.column(idx).iter().copied().collect())
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
