//! Covariance-based portfolio risk.

use crate::analyzer::table::PortfolioTable;
use nalgebra::{DMatrix, DVector};

/// `(XᵀX) / days` over an already demeaned table.
pub fn covariance(demeaned: &DMatrix<f64>, days: usize) -> DMatrix<f64> {
    demeaned.transpose() * demeaned / days as f64
}

/// `w · Σ · wᵀ`
pub fn portfolio_variance(weights: &DVector<f64>, covariance: &DMatrix<f64>) -> f64 {
    weights.dot(&(covariance * weights))
}

/// Standard deviation of the weighted portfolio over `table`.
///
/// Works on a demeaned copy; `table` is not modified, so repeated calls agree.
pub fn portfolio_risk(table: &PortfolioTable, weights: &DVector<f64>, days: usize) -> f64 {
    let cov = covariance(&table.demeaned(), days);
    portfolio_variance(weights, &cov).sqrt()
}
