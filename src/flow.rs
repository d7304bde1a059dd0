use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::scalar::{ColumnType, Formatters, Scalar, format_scalar};
use crate::table::Row;

/// One hop of accumulated flow between two categories. Direction matters:
/// (A, B) and (B, A) are distinct edges. Rows producing the same pair merge
/// by summing `value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowEdge {
    pub source: String,
    pub target: String,
    pub value: f64,
    pub source_share: f64,
    pub target_share: f64,
}

/// The directed multigraph built from per-row category paths.
///
/// `nodes` and `edges` iterate in first-seen order; that order is part of the
/// output contract. Each graph is built fresh from one set of rows and holds
/// no state beyond that call's accumulation.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    pub nodes: Vec<String>,
    pub edges: Vec<FlowEdge>,
    totals: IndexMap<String, f64>,
}

impl FlowGraph {
    /// The combined running total accumulated for a node during aggregation.
    /// Nodes touched by no metric report `0`.
    pub fn node_total(&self, name: &str) -> f64 {
        self.totals.get(name).copied().unwrap_or(0.0)
    }

    /// Fill in `source_share`/`target_share` as percentages of the node
    /// totals. Must run only after aggregation is complete; a zero total
    /// yields a `0` share, never NaN or infinity.
    pub fn annotate_shares(&mut self) {
        for edge in &mut self.edges {
            let source_total = self.totals.get(&edge.source).copied().unwrap_or(0.0);
            let target_total = self.totals.get(&edge.target).copied().unwrap_or(0.0);
            edge.source_share = share(edge.value, source_total);
            edge.target_share = share(edge.value, target_total);
        }
    }
}

fn share(value: f64, total: f64) -> f64 {
    if total == 0.0 { 0.0 } else { 100.0 * value / total }
}

/// Build a [`FlowGraph`] from rows.
///
/// Each row contributes the formatted value sequence of `path_columns` as a
/// path; every consecutive pair becomes (or merges into) an edge carrying the
/// row's metric value. Fewer than two path columns yield nodes without edges.
/// Missing columns format to the null sentinel and a non-numeric metric cell
/// contributes zero, so no row shape can abort the aggregation.
///
/// Node totals follow the combined-counter rule: every hop adds the metric to
/// its source's total, and the path's final hop also adds it to the target's
/// total. Interior nodes of longer paths therefore mix in- and out-flow;
/// downstream shares divide by this combined figure.
pub fn aggregate(
    rows: &[Row],
    path_columns: &[String],
    metric_column: &str,
    coltypes: &HashMap<String, ColumnType>,
    fmt: &Formatters,
) -> FlowGraph {
    let mut nodes: IndexSet<String> = IndexSet::new();
    let mut totals: IndexMap<String, f64> = IndexMap::new();
    let mut edges: IndexMap<(String, String), f64> = IndexMap::new();

    for row in rows {
        let path: Vec<String> = path_columns
            .iter()
            .map(|col| {
                format_scalar(
                    row.get(col).unwrap_or(&Scalar::Null),
                    coltypes.get(col).copied(),
                    fmt,
                )
            })
            .collect();
        let metric = row
            .get(metric_column)
            .and_then(Scalar::as_f64)
            .unwrap_or(0.0);

        let Some(first) = path.first() else { continue };
        nodes.insert(first.clone());
        totals.entry(first.clone()).or_insert(0.0);

        for i in 0..path.len() - 1 {
            let source = path[i].clone();
            let target = path[i + 1].clone();
            nodes.insert(target.clone());
            totals.entry(target.clone()).or_insert(0.0);

            *edges.entry((source.clone(), target.clone())).or_insert(0.0) += metric;
            *totals.entry(source).or_insert(0.0) += metric;
            if i + 1 == path.len() - 1 {
                *totals.entry(target).or_insert(0.0) += metric;
            }
        }
    }

    FlowGraph {
        nodes: nodes.into_iter().collect(),
        edges: edges
            .into_iter()
            .map(|((source, target), value)| FlowEdge {
                source,
                target,
                value,
                source_share: 0.0,
                target_share: 0.0,
            })
            .collect(),
        totals,
    }
}
