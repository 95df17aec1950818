//! Benchmark parameter types rendered into Criterion ids.

use std::fmt;

/// Size of a generated graph.
#[derive(Clone, Copy, Debug)]
pub struct GraphBenchParams {
    /// Number of nodes.
    pub node_count: usize,
    /// Edges per new node (Barabási–Albert) or lattice degree
    /// (Watts–Strogatz).
    pub degree: usize,
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},k={}", self.node_count, self.degree)
    }
}

/// One similarity measure over a graph of a given size.
#[derive(Clone, Copy, Debug)]
pub struct PredictionBenchParams {
    /// Number of nodes.
    pub node_count: usize,
    /// Similarity measure name.
    pub measure: &'static str,
}

impl fmt::Display for PredictionBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/n={}", self.measure, self.node_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn graph_params_render_size_and_degree() {
        let params = GraphBenchParams {
            node_count: 500,
            degree: 4,
        };
        assert_eq!(params.to_string(), "n=500,k=4");
    }

    #[rstest]
    fn prediction_params_lead_with_the_measure() {
        let params = PredictionBenchParams {
            node_count: 200,
            measure: "jaccard",
        };
        assert_eq!(params.to_string(), "jaccard/n=200");
    }
}
