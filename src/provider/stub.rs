// In-memory provider for tests.
use crate::model::{
    BalanceSheet, CashFlowStatement, EnterpriseValue, FetchError, FinancialStatements,
    IncomeStatement, PricePoint,
};
use crate::provider::MarketData;
use std::collections::HashMap;

#[derive(Default)]
pub struct StubMarket {
    pub prices: HashMap<String, Vec<PricePoint>>,
    pub statements: HashMap<String, FinancialStatements>,
}

impl StubMarket {
    pub fn with_prices(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.prices.insert(ticker.to_string(), points);
        self
    }

    pub fn with_statements(mut self, ticker: &str, statements: FinancialStatements) -> Self {
        self.statements.insert(ticker.to_string(), statements);
        self
    }

    fn statements(&self, ticker: &str) -> Result<&FinancialStatements, FetchError> {
        self.statements
            .get(ticker)
            .ok_or_else(|| FetchError::UnknownTicker(ticker.to_string()))
    }
}

impl MarketData for StubMarket {
    fn historical_prices(&self, ticker: &str) -> Result<Vec<PricePoint>, FetchError> {
        self.prices
            .get(ticker)
            .cloned()
            .ok_or_else(|| FetchError::UnknownTicker(ticker.to_string()))
    }

    fn income_statements(&self, ticker: &str) -> Result<Vec<IncomeStatement>, FetchError> {
        Ok(self.statements(ticker)?.income.clone())
    }

    fn balance_sheets(&self, ticker: &str) -> Result<Vec<BalanceSheet>, FetchError> {
        Ok(self.statements(ticker)?.balance.clone())
    }

    fn cash_flows(&self, ticker: &str) -> Result<Vec<CashFlowStatement>, FetchError> {
        Ok(self.statements(ticker)?.cash_flow.clone())
    }

    fn enterprise_values(&self, ticker: &str) -> Result<Vec<EnterpriseValue>, FetchError> {
        Ok(self.statements(ticker)?.values.clone())
    }
}
