use crate::analyzer::table::PortfolioTable;
use chrono::NaiveDate;
use nalgebra::DVector;

/// Portfolio returns, most recent first.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeReturns {
    pub dates: Vec<NaiveDate>,
    pub daily: Vec<f64>,
    pub cumulative: Vec<f64>,
}

impl CumulativeReturns {
    pub fn points(&self) -> Vec<(NaiveDate, f64)> {
        self.dates
            .iter()
            .copied()
            .zip(self.cumulative.iter().copied())
            .collect()
    }
}

/// Weighted sum of each day's per-ticker returns.
pub fn portfolio_daily_returns(returns: &PortfolioTable, weights: &DVector<f64>) -> Vec<f64> {
    (returns.values() * weights).iter().copied().collect()
}

/// Compounds `(1 + r)` from the oldest day forward. Input and output are
/// most-recent-first, so `out[last] = 1 + daily[last]`.
pub fn compound(daily: &[f64]) -> Vec<f64> {
    let mut acc = 1.0;
    let mut cumulative: Vec<f64> = daily
        .iter()
        .rev()
        .map(|r| {
            acc *= 1.0 + r;
            acc
        })
        .collect();
    cumulative.reverse();
    cumulative
}

pub fn cumulative_returns(returns: &PortfolioTable, weights: &DVector<f64>) -> CumulativeReturns {
    let daily = portfolio_daily_returns(returns, weights);
    let cumulative = compound(&daily);
    CumulativeReturns {
        dates: returns.dates().to_vec(),
        daily,
        cumulative,
    }
}

/// `Σ wᵢ · mean(returnsᵢ)`
pub fn average_daily_return(returns: &PortfolioTable, weights: &DVector<f64>) -> f64 {
    returns
        .column_means()
        .iter()
        .zip(weights.iter())
        .map(|(mean, w)| mean * w)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    #[test]
    fn compounding_runs_oldest_to_newest() {
        let daily = [0.03, -0.02, 0.01, 0.05];
        let cum = compound(&daily);

        let oldest = daily.len() - 1;
        assert_relative_eq!(cum[oldest], 1.0 + daily[oldest]);
        for i in (0..oldest).rev() {
            assert_relative_eq!(cum[i], cum[i + 1] * (1.0 + daily[i]), epsilon = 1e-15);
        }
        assert_relative_eq!(cum[0], 1.05 * 1.01 * 0.98 * 1.03, epsilon = 1e-12);
    }

    #[test]
    fn daily_returns_are_weighted() {
        let dates = (1..=2)
            .map(|d| NaiveDate::from_ymd_opt(2021, 1, d).unwrap())
            .collect();
        let table = PortfolioTable::new(
            vec!["A".into(), "B".into()],
            dates,
            DMatrix::from_row_slice(2, 2, &[0.1, 0.2, -0.1, 0.0]),
        );
        let w = DVector::from_vec(vec![0.5, 0.25]);

        let daily = portfolio_daily_returns(&table, &w);
        assert_relative_eq!(daily[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(daily[1], -0.05, epsilon = 1e-12);

        // means: A = 0.0, B = 0.1
        assert_relative_eq!(average_daily_return(&table, &w), 0.025, epsilon = 1e-12);
    }

    #[test]
    fn empty_input_compounds_to_nothing() {
        assert!(compound(&[]).is_empty());
    }
}
