// Utility functions
use chrono::Datelike;
use chrono::NaiveDate;

/// Fiscal-year label for a statement period.
pub fn fiscal_year_label(date: NaiveDate) -> String {
    date.year().to_string()
}

/// Ratio that yields `None` instead of inf/NaN on a zero denominator.
pub fn safe_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Arithmetic mean that skips missing (NaN) cells.
pub fn nan_mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { f64::NAN } else { sum / count as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_guards_zero() {
        assert_eq!(safe_ratio(1.0, 4.0), Some(0.25));
        assert_eq!(safe_ratio(1.0, 0.0), None);
    }

    #[test]
    fn mean_skips_gaps() {
        assert_eq!(nan_mean([1.0, f64::NAN, 3.0]), 2.0);
        assert!(nan_mean([f64::NAN]).is_nan());
    }

    #[test]
    fn year_label() {
        let date = NaiveDate::from_ymd_opt(2020, 9, 26).unwrap();
        assert_eq!(fiscal_year_label(date), "2020");
    }
}
