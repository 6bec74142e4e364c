//! Correlation network and its Fiedler partition.
//!
//! A [`FiedlerGraph`] starts `Empty`; only a successful
//! [`FiedlerGraph::build_matrix`] moves it to `Loaded`, and every derived view
//! (Laplacian, edge list, rendered graph, partition) requires that state.

use crate::model::GraphError;
use crate::network::correlation::{CorrelationMatrix, EdgeList};
use nalgebra::{DMatrix, DVector, SymmetricEigen};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

const NODE_STYLE: &str = "style=filled, fillcolor=skyblue, fontsize=10";

#[derive(Debug, Clone, Default)]
pub enum GraphState {
    #[default]
    Empty,
    Loaded {
        matrix: CorrelationMatrix,
        edges: EdgeList,
    },
}

/// Split of the assets by the sign of the Fiedler vector.
#[derive(Debug, Clone)]
pub struct FiedlerPartition {
    /// Second-smallest Laplacian eigenvalue.
    pub algebraic_connectivity: f64,
    pub vector: DVector<f64>,
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

#[derive(Debug, Default)]
pub struct FiedlerGraph {
    state: GraphState,
}

impl FiedlerGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GraphState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, GraphState::Loaded { .. })
    }

    /// Reads the correlation file and derives the edge list.
    ///
    /// On failure the graph is left `Empty` (any previous matrix is dropped)
    /// and the error is returned to the caller.
    pub fn build_matrix(&mut self, path: impl AsRef<Path>) -> Result<(), GraphError> {
        let path = path.as_ref();
        match CorrelationMatrix::from_path(path) {
            Ok(matrix) => {
                self.load(matrix);
                Ok(())
            }
            Err(e) => {
                warn!("Invalid correlation file {}: {}", path.display(), e);
                self.state = GraphState::Empty;
                Err(e)
            }
        }
    }

    pub fn load(&mut self, matrix: CorrelationMatrix) {
        let edges = matrix.edges();
        info!(
            "Correlation matrix loaded: {} assets, {} edges",
            matrix.len(),
            edges.len()
        );
        self.state = GraphState::Loaded { matrix, edges };
    }

    fn loaded(&self) -> Result<(&CorrelationMatrix, &EdgeList), GraphError> {
        match &self.state {
            GraphState::Loaded { matrix, edges } => Ok((matrix, edges)),
            GraphState::Empty => Err(GraphError::NotLoaded),
        }
    }

    pub fn matrix(&self) -> Result<&CorrelationMatrix, GraphError> {
        self.loaded().map(|(m, _)| m)
    }

    pub fn edges(&self) -> Result<&EdgeList, GraphError> {
        self.loaded().map(|(_, e)| e)
    }

    pub fn ticker_index(&self) -> Result<HashMap<String, usize>, GraphError> {
        Ok(self.matrix()?.ticker_index())
    }

    pub fn laplace_matrix(&self) -> Result<DMatrix<f64>, GraphError> {
        Ok(self.matrix()?.laplacian())
    }

    /// Undirected graph over the edge list; mirrored edges collapse into one.
    pub fn build_graph(&self) -> Result<UnGraph<String, f64>, GraphError> {
        let edges = self.edges()?;
        let mut graph = UnGraph::new_undirected();
        let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();

        for ((source, target), &weight) in edges.pairs().zip(edges.weights.iter()) {
            let a = *nodes
                .entry(source)
                .or_insert_with(|| graph.add_node(source.to_string()));
            let b = *nodes
                .entry(target)
                .or_insert_with(|| graph.add_node(target.to_string()));
            graph.update_edge(a, b, weight);
        }
        Ok(graph)
    }

    /// Graphviz DOT text with every node labelled.
    pub fn render_dot(&self) -> Result<String, GraphError> {
        let graph = self.build_graph()?;
        let dot = Dot::with_attr_getters(
            &graph,
            &[Config::EdgeNoLabel],
            &|_, _| String::new(),
            &|_, _| NODE_STYLE.to_string(),
        );
        Ok(format!("{}", dot))
    }

    pub fn fiedler_partition(&self) -> Result<FiedlerPartition, GraphError> {
        let matrix = self.matrix()?;
        if matrix.len() < 2 {
            return Err(GraphError::TooFewAssets {
                required: 2,
                available: matrix.len(),
            });
        }
        // Empty cells load as NaN; the eigen-decomposition has no meaning then.
        if let Some(pos) = matrix.values().iter().position(|v| !v.is_finite()) {
            let n = matrix.len();
            return Err(GraphError::Malformed(format!(
                "non-finite correlation between {} and {}",
                matrix.tickers()[pos % n],
                matrix.tickers()[pos / n]
            )));
        }

        let eigen = SymmetricEigen::new(matrix.laplacian());
        let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));
        let second = order[1];

        let mut vector: DVector<f64> = eigen.eigenvectors.column(second).into_owned();
        // Eigenvectors are sign-ambiguous; fix the first nonzero component positive.
        let flip = vector
            .iter()
            .find(|v| v.abs() > 1e-12)
            .is_some_and(|v| *v < 0.0);
        if flip {
            vector.neg_mut();
        }

        let (mut positive, mut negative) = (Vec::new(), Vec::new());
        for (ticker, component) in matrix.tickers().iter().zip(vector.iter()) {
            if *component >= 0.0 {
                positive.push(ticker.clone());
            } else {
                negative.push(ticker.clone());
            }
        }

        Ok(FiedlerPartition {
            algebraic_connectivity: eigen.eigenvalues[second],
            vector,
            positive,
            negative,
        })
    }
}
