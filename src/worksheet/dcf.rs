//! Discounted-cash-flow input worksheet.
//!
//! Row order and labels are fixed; spreadsheet templates downstream read
//! cells by position.

use crate::model::{FinancialStatements, WorksheetError};
use crate::provider::MarketData;
use crate::utils::{fiscal_year_label, safe_ratio};
use std::io;
use std::path::Path;
use tracing::info;

/// Number of historical periods on the sheet.
pub const PERIODS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct WorksheetRow {
    pub label: &'static str,
    /// One cell per period, oldest first. `None` is written as an empty cell.
    pub cells: Vec<Option<f64>>,
}

impl WorksheetRow {
    fn new(label: &'static str, cells: Vec<Option<f64>>) -> Self {
        Self { label, cells }
    }

    fn values(label: &'static str, values: Vec<f64>) -> Self {
        Self::new(label, values.into_iter().map(Some).collect())
    }

    fn blank() -> Self {
        Self::new("", Vec::new())
    }

    pub fn is_blank(&self) -> bool {
        self.label.is_empty() && self.cells.is_empty()
    }
}

/// Header is `["", y1, .., y5, "<y5 + 1> (TTM)"]`. The year labels are the
/// fiscal years of the income statements on the sheet, not a fixed range, so
/// a template keyed on year text must be regenerated when the data rolls.
#[derive(Debug, Clone)]
pub struct DcfWorksheet {
    pub header: Vec<String>,
    pub rows: Vec<WorksheetRow>,
}

fn require(statement: &'static str, available: usize) -> Result<(), WorksheetError> {
    if available < PERIODS {
        return Err(WorksheetError::InsufficientPeriods {
            statement,
            required: PERIODS,
            available,
        });
    }
    Ok(())
}

impl DcfWorksheet {
    /// Builds the sheet from statements served newest-first.
    pub fn from_statements(st: &FinancialStatements) -> Result<Self, WorksheetError> {
        require("income statement", st.income.len())?;
        require("balance sheet", st.balance.len())?;
        require("cash flow statement", st.cash_flow.len())?;
        require("enterprise values", st.values.len())?;

        // Oldest period first.
        let income: Vec<_> = st.income[..PERIODS].iter().rev().collect();
        let balance: Vec<_> = st.balance[..PERIODS].iter().rev().collect();
        let cash_flow: Vec<_> = st.cash_flow[..PERIODS].iter().rev().collect();
        let values: Vec<_> = st.values[..PERIODS].iter().rev().collect();

        let revenue: Vec<f64> = income.iter().map(|s| s.revenue).collect();
        let ebit: Vec<f64> = income
            .iter()
            .map(|s| s.ebitda - s.depreciation_and_amortization)
            .collect();
        let fcf: Vec<f64> = cash_flow.iter().map(|s| s.free_cash_flow).collect();
        let ev: Vec<f64> = values.iter().map(|v| v.enterprise_value).collect();

        let growth = std::iter::once(None)
            .chain(revenue.windows(2).map(|w| safe_ratio(w[1], w[0]).map(|g| g - 1.0)))
            .collect();

        let rows = vec![
            WorksheetRow::values("Total Revenue", revenue.clone()),
            WorksheetRow::new("Growth", growth),
            WorksheetRow::blank(),
            WorksheetRow::values("EBIT", ebit.clone()),
            WorksheetRow::new("Margin", ratios(&ebit, &revenue)),
            WorksheetRow::blank(),
            WorksheetRow::values("FCF", fcf.clone()),
            WorksheetRow::new("FCF as % of EBIT", ratios(&fcf, &ebit)),
            WorksheetRow::blank(),
            WorksheetRow::values("Shares Outstanding", column(&balance, |b| b.common_stock)),
            WorksheetRow::blank(),
            WorksheetRow::values(
                "Cash & Cash Equivalents",
                column(&balance, |b| b.cash_and_cash_equivalents),
            ),
            WorksheetRow::new("Non-Operating Cash", Vec::new()),
            WorksheetRow::values("Total Debt", column(&balance, |b| b.total_debt)),
            WorksheetRow::blank(),
            WorksheetRow::values(
                "Invested Capital",
                column(&balance, |b| b.total_debt + b.total_equity),
            ),
            WorksheetRow::values(
                "Working Capital",
                column(&balance, |b| b.total_current_assets - b.total_current_liabilities),
            ),
            WorksheetRow::values("Current Assets", column(&balance, |b| b.total_current_assets)),
            WorksheetRow::values(
                "Current Liabilities",
                column(&balance, |b| b.total_current_liabilities),
            ),
            WorksheetRow::values(
                "Shareholder Equity",
                column(&balance, |b| b.total_stockholders_equity),
            ),
            WorksheetRow::blank(),
            WorksheetRow::values(
                "Market Cap",
                values.iter().map(|v| v.market_capitalization).collect(),
            ),
            WorksheetRow::values("Enterprise Value", ev.clone()),
            WorksheetRow::values("Share Price", values.iter().map(|v| v.stock_price).collect()),
            WorksheetRow::new("EV/EBIT", ratios(&ev, &ebit)),
        ];

        Ok(Self {
            header: header_for(&income.iter().map(|s| s.date).collect::<Vec<_>>()),
            rows,
        })
    }

    pub fn write_csv<W: io::Write>(&self, out: W) -> Result<(), WorksheetError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::CRLF)
            .from_writer(out);

        writer.write_record(&self.header)?;
        for row in &self.rows {
            let mut record = vec![row.label.to_string()];
            record.extend(
                row.cells
                    .iter()
                    .map(|c| c.map(|v| v.to_string()).unwrap_or_default()),
            );
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_to_path(&self, path: &Path) -> Result<(), WorksheetError> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }
}

fn ratios(num: &[f64], den: &[f64]) -> Vec<Option<f64>> {
    num.iter().zip(den).map(|(n, d)| safe_ratio(*n, *d)).collect()
}

fn column<T>(periods: &[&T], f: impl Fn(&T) -> f64) -> Vec<f64> {
    periods.iter().map(|p| f(*p)).collect()
}

/// `["", y1, .., y5, "<y5 + 1> (TTM)"]`
fn header_for(dates: &[chrono::NaiveDate]) -> Vec<String> {
    let mut header = vec![String::new()];
    header.extend(dates.iter().map(|d| fiscal_year_label(*d)));
    if let Some(last) = dates.last() {
        let ttm = last
            .checked_add_months(chrono::Months::new(12))
            .unwrap_or(*last);
        header.push(format!("{} (TTM)", fiscal_year_label(ttm)));
    }
    header
}

/// Fetches the statements for `ticker` and writes the sheet to `path`.
pub fn write_dcf_csv<M: MarketData>(
    provider: &M,
    path: &Path,
    ticker: &str,
) -> Result<DcfWorksheet, WorksheetError> {
    info!("Fetching statements for {}...", ticker);
    let statements = provider.financial_statements(ticker)?;
    let sheet = DcfWorksheet::from_statements(&statements)?;
    sheet.write_to_path(path)?;
    info!("DCF worksheet written: {}", path.display());
    Ok(sheet)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{BalanceSheet, CashFlowStatement, EnterpriseValue, IncomeStatement};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    /// Five fiscal years, newest first, as the provider returns them.
    pub(crate) fn synthetic_statements() -> FinancialStatements {
        let years = [2020, 2019, 2018, 2017, 2016];
        let date = |y| NaiveDate::from_ymd_opt(y, 9, 30).unwrap();
        let revenue = [150.0, 125.0, 120.0, 110.0, 100.0];

        FinancialStatements {
            income: years
                .iter()
                .zip(revenue)
                .map(|(&y, r)| IncomeStatement {
                    date: date(y),
                    revenue: r,
                    ebitda: r * 0.4,
                    depreciation_and_amortization: r * 0.1,
                })
                .collect(),
            balance: years
                .iter()
                .map(|&y| BalanceSheet {
                    date: date(y),
                    common_stock: 1000.0,
                    cash_and_cash_equivalents: 50.0,
                    total_debt: 80.0,
                    total_equity: 200.0,
                    total_current_assets: 90.0,
                    total_current_liabilities: 60.0,
                    total_stockholders_equity: 190.0,
                })
                .collect(),
            cash_flow: years
                .iter()
                .zip(revenue)
                .map(|(&y, r)| CashFlowStatement {
                    date: date(y),
                    free_cash_flow: r * 0.15,
                })
                .collect(),
            values: years
                .iter()
                .zip(revenue)
                .map(|(&y, r)| EnterpriseValue {
                    date: date(y),
                    market_capitalization: r * 10.0,
                    enterprise_value: r * 12.0,
                    stock_price: r / 10.0,
                })
                .collect(),
        }
    }

    fn labels(sheet: &DcfWorksheet) -> Vec<&'static str> {
        sheet.rows.iter().map(|r| r.label).collect()
    }

    #[test]
    fn rows_follow_fixed_layout() {
        let sheet = DcfWorksheet::from_statements(&synthetic_statements()).unwrap();

        assert_eq!(
            labels(&sheet),
            vec![
                "Total Revenue",
                "Growth",
                "",
                "EBIT",
                "Margin",
                "",
                "FCF",
                "FCF as % of EBIT",
                "",
                "Shares Outstanding",
                "",
                "Cash & Cash Equivalents",
                "Non-Operating Cash",
                "Total Debt",
                "",
                "Invested Capital",
                "Working Capital",
                "Current Assets",
                "Current Liabilities",
                "Shareholder Equity",
                "",
                "Market Cap",
                "Enterprise Value",
                "Share Price",
                "EV/EBIT",
            ]
        );
        assert_eq!(
            sheet.header,
            vec!["", "2016", "2017", "2018", "2019", "2020", "2021 (TTM)"]
        );
    }

    #[test]
    fn growth_is_revenue_ratio_minus_one() {
        let sheet = DcfWorksheet::from_statements(&synthetic_statements()).unwrap();
        let growth = &sheet.rows[1].cells;
        let revenue = [100.0, 110.0, 120.0, 125.0, 150.0];

        assert_eq!(growth.len(), PERIODS);
        assert_eq!(growth[0], None);
        for i in 1..PERIODS {
            assert_relative_eq!(
                growth[i].unwrap(),
                revenue[i] / revenue[i - 1] - 1.0,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn header_years_follow_statement_dates() {
        let mut st = synthetic_statements();
        for (i, s) in st.income.iter_mut().enumerate() {
            s.date = NaiveDate::from_ymd_opt(2023 - i as i32, 12, 31).unwrap();
        }
        let sheet = DcfWorksheet::from_statements(&st).unwrap();

        assert_eq!(
            sheet.header,
            vec!["", "2019", "2020", "2021", "2022", "2023", "2024 (TTM)"]
        );
    }

    #[test]
    fn derived_metrics() {
        let sheet = DcfWorksheet::from_statements(&synthetic_statements()).unwrap();
        let row = |label: &str| sheet.rows.iter().find(|r| r.label == label).unwrap();

        assert_relative_eq!(row("EBIT").cells[0].unwrap(), 30.0, epsilon = 1e-12);
        assert_relative_eq!(row("Margin").cells[4].unwrap(), 0.3, epsilon = 1e-12);
        assert_relative_eq!(row("FCF as % of EBIT").cells[0].unwrap(), 0.5, epsilon = 1e-12);
        assert_eq!(row("Invested Capital").cells[2], Some(280.0));
        assert_eq!(row("Working Capital").cells[2], Some(30.0));
        assert_relative_eq!(row("EV/EBIT").cells[1].unwrap(), 40.0, epsilon = 1e-12);
        assert!(row("Non-Operating Cash").cells.is_empty());
    }

    #[test]
    fn zero_ebit_leaves_ratio_cells_empty() {
        let mut st = synthetic_statements();
        st.income[0].ebitda = st.income[0].depreciation_and_amortization;
        let sheet = DcfWorksheet::from_statements(&st).unwrap();
        let ev_ebit = sheet.rows.iter().find(|r| r.label == "EV/EBIT").unwrap();

        assert_eq!(ev_ebit.cells[4], None);
    }

    #[test]
    fn short_history_is_rejected() {
        let mut st = synthetic_statements();
        st.cash_flow.truncate(3);
        let err = DcfWorksheet::from_statements(&st).unwrap_err();

        assert!(matches!(
            err,
            WorksheetError::InsufficientPeriods { available: 3, .. }
        ));
    }

    #[test]
    fn csv_output_has_blank_separators() {
        let sheet = DcfWorksheet::from_statements(&synthetic_statements()).unwrap();
        let mut buf = Vec::new();
        sheet.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.split("\r\n").collect();

        assert_eq!(lines[0], ",2016,2017,2018,2019,2020,2021 (TTM)");
        assert_eq!(lines[1], "Total Revenue,100,110,120,125,150");
        assert!(lines[2].starts_with("Growth,,0.1"));
        assert_eq!(lines[3], "\"\"");
        assert_eq!(lines[13], "Non-Operating Cash");
        assert_eq!(lines.len(), 1 + sheet.rows.len() + 1);
    }
}
