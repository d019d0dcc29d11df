//! Path reconstruction over the solution-induced subgraph.
//!
//! Only edges whose flow exceeds [`ACTIVITY_EPSILON`] take part. Edges
//! are visited in network edge order, so output is deterministic for a
//! fixed edge list.
//!
//! # Strategies
//!
//! - [`PathStrategy::DepthFirst`]: from the source, follow active edges
//!   without revisiting a node already on the current path, carrying
//!   `min(incoming remaining, edge flow)`. A path is emitted on reaching
//!   the sink with positive remaining flow. Paths may share edges, so
//!   their flows need not add up to the total. Worst-case cost is
//!   exponential on dense subgraphs.
//! - [`PathStrategy::Decomposition`]: repeatedly take the fewest-hop
//!   active path, emit it with its bottleneck flow and subtract that
//!   flow. Each round empties at least one edge, so there are at most
//!   as many rounds as active edges, and emitted flows add up.
//!
//! Both stop after `limit` paths. The limit is a presentation limit:
//! it does not guarantee that every flow-carrying path is listed.
//!
//! # Reference
//! Ahuja, Magnanti & Orlin (1993), "Network Flows", Ch. 3.5 (Flow Decomposition)

use log::trace;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;

use crate::lp::ACTIVITY_EPSILON;
use crate::models::FlowNetwork;

/// Default number of reported paths.
pub const DEFAULT_PATH_LIMIT: usize = 5;

/// A source-to-sink path and the flow attributed to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowPath {
    /// Node ids from source to sink.
    pub nodes: Vec<String>,
    pub flow: f64,
}

impl fmt::Display for FlowPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | flow {:.2}", self.nodes.join(" → "), self.flow)
    }
}

/// Path enumeration algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStrategy {
    #[default]
    DepthFirst,
    Decomposition,
}

/// Graph view restricted to edges carrying flow.
struct ActiveView<'a> {
    graph: DiGraph<String, usize>,
    index: HashMap<String, NodeIndex>,
    flows: &'a [f64],
}

impl<'a> ActiveView<'a> {
    fn new(network: &FlowNetwork, flows: &'a [f64]) -> Self {
        let (graph, index) = network.graph();
        Self { graph, index, flows }
    }

    fn flow(&self, edge: usize) -> f64 {
        self.flows.get(edge).copied().unwrap_or(0.0)
    }

    /// Active out-edges of `node` as `(head, edge index)`, in edge order.
    ///
    /// petgraph lists adjacency newest-first, hence the sort.
    fn active_out(&self, node: NodeIndex, residual: &[f64]) -> Vec<(NodeIndex, usize)> {
        let mut out: Vec<(NodeIndex, usize)> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|e| (e.target(), *e.weight()))
            .filter(|&(_, i)| residual.get(i).copied().unwrap_or(0.0) > ACTIVITY_EPSILON)
            .collect();
        out.sort_by_key(|&(_, i)| i);
        out
    }

    fn path(&self, nodes: &[NodeIndex], flow: f64) -> FlowPath {
        FlowPath {
            nodes: nodes.iter().map(|&n| self.graph[n].clone()).collect(),
            flow,
        }
    }
}

/// Enumerates source-to-sink paths carrying flow.
///
/// `flows` is indexed like [`FlowNetwork::edges`]. `supply` seeds the
/// remaining flow of the depth-first strategy. Unknown endpoints yield no
/// paths.
pub fn reconstruct_paths(
    network: &FlowNetwork,
    flows: &[f64],
    source: &str,
    sink: &str,
    supply: f64,
    strategy: PathStrategy,
    limit: usize,
) -> Vec<FlowPath> {
    let view = ActiveView::new(network, flows);
    let (Some(&from), Some(&to)) = (view.index.get(source), view.index.get(sink)) else {
        return Vec::new();
    };

    let mut paths = Vec::new();
    if limit == 0 {
        return paths;
    }
    match strategy {
        PathStrategy::DepthFirst => {
            let mut stack = vec![from];
            depth_first(&view, to, supply, &mut stack, &mut paths, limit);
        }
        PathStrategy::Decomposition => decompose(&view, from, to, &mut paths, limit),
    }
    for path in &paths {
        trace!("path {path}");
    }
    paths
}

fn depth_first(
    view: &ActiveView<'_>,
    sink: NodeIndex,
    remaining: f64,
    stack: &mut Vec<NodeIndex>,
    paths: &mut Vec<FlowPath>,
    limit: usize,
) {
    let Some(&at) = stack.last() else {
        return;
    };
    if at == sink {
        if remaining > ACTIVITY_EPSILON {
            paths.push(view.path(stack, remaining));
        }
        return;
    }

    for (next, edge) in view.active_out(at, view.flows) {
        if stack.contains(&next) {
            continue;
        }
        stack.push(next);
        depth_first(view, sink, remaining.min(view.flow(edge)), stack, paths, limit);
        stack.pop();
        if paths.len() >= limit {
            return;
        }
    }
}

fn decompose(view: &ActiveView<'_>, source: NodeIndex, sink: NodeIndex, paths: &mut Vec<FlowPath>, limit: usize) {
    let mut residual = view.flows.to_vec();

    while paths.len() < limit {
        // Fewest-hop path on the residual; parent edge per reached node.
        let mut parent: HashMap<NodeIndex, (NodeIndex, usize)> = HashMap::new();
        let mut queue = VecDeque::from([source]);
        while let Some(node) = queue.pop_front() {
            if node == sink {
                break;
            }
            for (next, edge) in view.active_out(node, &residual) {
                if next != source && !parent.contains_key(&next) {
                    parent.insert(next, (node, edge));
                    queue.push_back(next);
                }
            }
        }
        if !parent.contains_key(&sink) {
            break;
        }

        let mut nodes = vec![sink];
        let mut edges = Vec::new();
        let mut at = sink;
        while let Some(&(prev, edge)) = parent.get(&at) {
            nodes.push(prev);
            edges.push(edge);
            at = prev;
        }
        nodes.reverse();

        let bottleneck = edges
            .iter()
            .map(|&e| residual[e])
            .fold(f64::INFINITY, f64::min);
        for &e in &edges {
            residual[e] -= bottleneck;
        }
        paths.push(view.path(&nodes, bottleneck));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Edge, Node};

    fn diamond() -> FlowNetwork {
        FlowNetwork::new()
            .with_node(Node::source("s", 0.0))
            .with_node(Node::intermediate("a"))
            .with_node(Node::intermediate("b"))
            .with_node(Node::sink("t"))
            .with_edge(Edge::new("s", "a", 10.0))
            .with_edge(Edge::new("s", "b", 10.0))
            .with_edge(Edge::new("a", "t", 10.0))
            .with_edge(Edge::new("b", "t", 10.0))
            .with_edge(Edge::new("a", "b", 10.0))
    }

    #[test]
    fn test_single_line_path() {
        let net = FlowNetwork::new()
            .with_node(Node::source("source", 0.0))
            .with_node(Node::intermediate("mid"))
            .with_node(Node::sink("sink"))
            .with_edge(Edge::new("source", "mid", 10.0))
            .with_edge(Edge::new("mid", "sink", 5.0));
        let paths = reconstruct_paths(&net, &[5.0, 5.0], "source", "sink", 5.0, PathStrategy::DepthFirst, 5);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].to_string(), "source → mid → sink | flow 5.00");
    }

    #[test]
    fn test_depth_first_in_edge_order() {
        // s->a 6, s->b 4, a->t 4, b->t 6, a->b 2
        let flows = [6.0, 4.0, 4.0, 6.0, 2.0];
        let paths = reconstruct_paths(&diamond(), &flows, "s", "t", 10.0, PathStrategy::DepthFirst, 5);
        let rendered: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "s → a → t | flow 4.00",
                "s → a → b → t | flow 2.00",
                "s → b → t | flow 4.00",
            ]
        );
    }

    #[test]
    fn test_limit_is_respected() {
        let flows = [6.0, 4.0, 4.0, 6.0, 2.0];
        let paths = reconstruct_paths(&diamond(), &flows, "s", "t", 10.0, PathStrategy::DepthFirst, 2);
        assert_eq!(paths.len(), 2);
        assert!(reconstruct_paths(&diamond(), &flows, "s", "t", 10.0, PathStrategy::DepthFirst, 0).is_empty());
    }

    #[test]
    fn test_decomposition_flows_add_up() {
        let flows = [6.0, 4.0, 4.0, 6.0, 2.0];
        let paths = reconstruct_paths(&diamond(), &flows, "s", "t", 10.0, PathStrategy::Decomposition, 5);
        let total: f64 = paths.iter().map(|p| p.flow).sum();
        assert!((total - 10.0).abs() < 1e-9);
        assert_eq!(paths[0].to_string(), "s → a → t | flow 4.00");
        assert_eq!(paths.len(), 3);
    }

    #[test]
    fn test_flow_cycle_does_not_loop() {
        let net = FlowNetwork::new()
            .with_node(Node::source("s", 0.0))
            .with_node(Node::intermediate("a"))
            .with_node(Node::intermediate("b"))
            .with_node(Node::sink("t"))
            .with_edge(Edge::new("s", "a", 5.0))
            .with_edge(Edge::new("a", "b", 5.0))
            .with_edge(Edge::new("b", "a", 5.0))
            .with_edge(Edge::new("b", "t", 5.0));
        let flows = [3.0, 5.0, 2.0, 3.0];
        for strategy in [PathStrategy::DepthFirst, PathStrategy::Decomposition] {
            let paths = reconstruct_paths(&net, &flows, "s", "t", 3.0, strategy, 5);
            assert_eq!(paths.len(), 1);
            assert_eq!(paths[0].nodes, vec!["s", "a", "b", "t"]);
            assert!((paths[0].flow - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_inactive_and_unknown() {
        let flows = [0.005, 0.0, 0.0, 0.0, 0.0];
        assert!(reconstruct_paths(&diamond(), &flows, "s", "t", 10.0, PathStrategy::DepthFirst, 5).is_empty());
        assert!(reconstruct_paths(&diamond(), &flows, "x", "t", 10.0, PathStrategy::DepthFirst, 5).is_empty());
    }
}
