// Correlation network: matrix loading, Laplacian, edge list and rendering.

pub mod correlation;
pub mod fiedler;

pub use correlation::{CorrelationMatrix, EdgeList};
pub use fiedler::{FiedlerGraph, FiedlerPartition, GraphState};
