//! Declarative filter selection.
//!
//! A [`FilterConfig`] names one filter or transform plus its parameters. It
//! deserializes from any serde format, tagged by `method`:
//!
//! ```json
//! { "method": "knn", "k": 5 }
//! { "method": "threshold", "level": 0.3, "binary": true }
//! ```
//!
//! Omitted parameters take the defaults documented on each variant.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::Result;
use crate::filter::{knn, maximum_spanning_tree, pmfg, tmfg};
use crate::graph::CorrelationGraph;
use crate::transform::{ThresholdOptions, dependency_network, partial_correlation, threshold};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum FilterConfig {
    /// Triangulated maximally filtered graph.
    Tmfg {
        /// Select nodes by `|corr|`. Default: false.
        #[serde(default)]
        absolute: bool,
    },
    /// Planar maximally filtered graph.
    Pmfg,
    /// Maximum-weight spanning tree.
    Mst,
    /// k-nearest-neighbour graph.
    Knn {
        /// Neighbours per node. Default: 3.
        #[serde(default = "default_k")]
        k: usize,
    },
    /// Elementwise threshold.
    Threshold {
        level: f64,
        /// Default: false.
        #[serde(default)]
        binary: bool,
        /// Default: true.
        #[serde(default = "default_true")]
        absolute: bool,
    },
    /// Precision-based partial correlation.
    PartialCorrelation,
    /// Directed dependency network.
    DependencyNetwork,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::Tmfg { absolute: false }
    }
}

const fn default_k() -> usize {
    3
}

const fn default_true() -> bool {
    true
}

/// Output of [`FilterConfig::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Filtered {
    Graph(CorrelationGraph),
    Matrix(DMatrix<f64>),
}

impl Filtered {
    #[must_use]
    pub fn into_graph(self) -> Option<CorrelationGraph> {
        match self {
            Self::Graph(graph) => Some(graph),
            Self::Matrix(_) => None,
        }
    }

    #[must_use]
    pub fn into_matrix(self) -> Option<DMatrix<f64>> {
        match self {
            Self::Matrix(matrix) => Some(matrix),
            Self::Graph(_) => None,
        }
    }
}

impl FilterConfig {
    /// Short method name, matching the serialized `method` tag.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Tmfg { .. } => "tmfg",
            Self::Pmfg => "pmfg",
            Self::Mst => "mst",
            Self::Knn { .. } => "knn",
            Self::Threshold { .. } => "threshold",
            Self::PartialCorrelation => "partial_correlation",
            Self::DependencyNetwork => "dependency_network",
        }
    }

    /// Run the configured filter on `corr`.
    ///
    /// # Errors
    ///
    /// Propagates the error of the selected filter.
    #[instrument(skip(self, corr), fields(method = self.method(), p = corr.nrows()))]
    pub fn apply(&self, corr: &DMatrix<f64>) -> Result<Filtered> {
        let filtered = match *self {
            Self::Tmfg { absolute } => Filtered::Graph(tmfg(corr, absolute)?),
            Self::Pmfg => Filtered::Graph(pmfg(corr)?),
            Self::Mst => Filtered::Graph(maximum_spanning_tree(corr)?),
            Self::Knn { k } => Filtered::Graph(knn(corr, k)?),
            Self::Threshold {
                level,
                binary,
                absolute,
            } => Filtered::Matrix(threshold(corr, level, ThresholdOptions { binary, absolute })),
            Self::PartialCorrelation => Filtered::Matrix(partial_correlation(corr)?),
            Self::DependencyNetwork => Filtered::Matrix(dependency_network(corr)?),
        };
        debug!("filter applied");
        Ok(filtered)
    }
}
