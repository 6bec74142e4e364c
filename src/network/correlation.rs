use crate::model::GraphError;
use nalgebra::DMatrix;
use std::collections::HashMap;
use std::path::Path;

/// Square asset-correlation table; rows are stored in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    tickers: Vec<String>,
    values: DMatrix<f64>,
}

/// Parallel endpoint sequences; `sources[i]` connects to `targets[i]`
/// with correlation `weights[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeList {
    pub sources: Vec<String>,
    pub targets: Vec<String>,
    pub weights: Vec<f64>,
}

impl EdgeList {
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sources
            .iter()
            .zip(self.targets.iter())
            .map(|(s, t)| (s.as_str(), t.as_str()))
    }
}

impl CorrelationMatrix {
    pub fn new(tickers: Vec<String>, values: DMatrix<f64>) -> Result<Self, GraphError> {
        if !values.is_square() || values.nrows() != tickers.len() {
            return Err(GraphError::Malformed(format!(
                "{} tickers for a {}x{} matrix",
                tickers.len(),
                values.nrows(),
                values.ncols()
            )));
        }
        Ok(Self { tickers, values })
    }

    /// Reads a CSV whose header lists the tickers after a blank corner cell
    /// and whose first column holds the row labels. Empty cells read as NaN.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let read_err = |source| GraphError::Read {
            path: path.display().to_string(),
            source,
        };

        let mut reader = csv::Reader::from_path(path).map_err(read_err)?;
        let tickers: Vec<String> = reader
            .headers()
            .map_err(read_err)?
            .iter()
            .skip(1)
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows: HashMap<String, Vec<f64>> = HashMap::new();
        for record in reader.records() {
            let record = record.map_err(read_err)?;
            let mut fields = record.iter();
            let label = fields.next().unwrap_or_default().trim().to_string();
            let row = fields.map(parse_cell).collect::<Result<Vec<_>, _>>()?;
            if row.len() != tickers.len() {
                return Err(GraphError::Malformed(format!(
                    "row {} has {} values, expected {}",
                    label,
                    row.len(),
                    tickers.len()
                )));
            }
            rows.insert(label, row);
        }

        let n = tickers.len();
        let mut values = DMatrix::zeros(n, n);
        for (i, ticker) in tickers.iter().enumerate() {
            let row = rows
                .get(ticker)
                .ok_or_else(|| GraphError::Malformed(format!("no row for {}", ticker)))?;
            values.row_mut(i).copy_from_slice(row);
        }

        Self::new(tickers, values)
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    /// Display position of each ticker, counted from 1 in column order.
    pub fn ticker_index(&self) -> HashMap<String, usize> {
        self.tickers
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i + 1))
            .collect()
    }

    pub fn node_label(&self, i: usize) -> String {
        format!("{}: {}", i + 1, self.tickers[i])
    }

    /// One edge per ordered pair of distinct assets with a nonzero value.
    ///
    /// Columns are the outer loop and rows the inner one; a symmetric matrix
    /// therefore yields every undirected pair twice, once per direction.
    pub fn edges(&self) -> EdgeList {
        let mut edges = EdgeList::default();
        for col in 0..self.len() {
            for row in 0..self.len() {
                let value = self.values[(row, col)];
                if col != row && value != 0.0 {
                    edges.sources.push(self.node_label(row));
                    edges.targets.push(self.node_label(col));
                    edges.weights.push(value);
                }
            }
        }
        edges
    }

    /// `D - A` with `D` the diagonal of row sums.
    pub fn laplacian(&self) -> DMatrix<f64> {
        let degrees = self.values.column_sum();
        DMatrix::from_diagonal(&degrees) - &self.values
    }
}

fn parse_cell(cell: &str) -> Result<f64, GraphError> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse()
        .map_err(|_| GraphError::Malformed(format!("not a number: {:?}", cell)))
}
