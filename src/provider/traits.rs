use crate::model::{
    BalanceSheet, CashFlowStatement, EnterpriseValue, FetchError, FinancialStatements,
    IncomeStatement, PricePoint,
};

/// Source of historical prices and financial statements.
///
/// Every method returns records newest-first, as the provider serves them.
pub trait MarketData {
    fn historical_prices(&self, ticker: &str) -> Result<Vec<PricePoint>, FetchError>;
    fn income_statements(&self, ticker: &str) -> Result<Vec<IncomeStatement>, FetchError>;
    fn balance_sheets(&self, ticker: &str) -> Result<Vec<BalanceSheet>, FetchError>;
    fn cash_flows(&self, ticker: &str) -> Result<Vec<CashFlowStatement>, FetchError>;
    fn enterprise_values(&self, ticker: &str) -> Result<Vec<EnterpriseValue>, FetchError>;

    /// Fetches the four statement endpoints one after another.
    fn financial_statements(&self, ticker: &str) -> Result<FinancialStatements, FetchError> {
        Ok(FinancialStatements {
            income: self.income_statements(ticker)?,
            balance: self.balance_sheets(ticker)?,
            cash_flow: self.cash_flows(ticker)?,
            values: self.enterprise_values(ticker)?,
        })
    }
}
