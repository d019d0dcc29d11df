//! Flow network model.
//!
//! A directed network of named nodes and capacitated edges, shared by the
//! routing and evacuation formulations.
//!
//! # Reference
//! Ahuja, Magnanti & Orlin (1993), "Network Flows", Ch. 1

use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of a node in a flow instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRole {
    /// Injects flow (routing origin, evacuation zone).
    Source,
    /// Absorbs flow (routing destination, exit).
    Sink,
    /// Transit node; conserves flow.
    Intermediate,
}

/// A network node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique node identifier.
    pub id: String,
    /// Role in the instance.
    pub role: NodeRole,
    /// Units available at a source (evacuation headcount). Zero elsewhere.
    pub supply: f64,
}

impl Node {
    /// Creates a source with the given supply.
    pub fn source(id: impl Into<String>, supply: f64) -> Self {
        Self {
            id: id.into(),
            role: NodeRole::Source,
            supply,
        }
    }

    /// Creates a sink.
    pub fn sink(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: NodeRole::Sink,
            supply: 0.0,
        }
    }

    /// Creates an intermediate node.
    pub fn intermediate(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: NodeRole::Intermediate,
            supply: 0.0,
        }
    }
}

/// A directed, capacitated edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Tail node id.
    pub from: String,
    /// Head node id.
    pub to: String,
    /// Maximum flow.
    pub capacity: f64,
    /// Cost per unit of flow.
    pub cost: f64,
    /// Latency (routing) or traversal time (evacuation). Zero when unused.
    pub time: f64,
}

impl Edge {
    /// Creates an edge with zero cost and time.
    pub fn new(from: impl Into<String>, to: impl Into<String>, capacity: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            capacity,
            cost: 0.0,
            time: 0.0,
        }
    }

    /// Sets the unit cost.
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    /// Sets the latency / traversal time.
    pub fn with_time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }
}

/// A flow network.
///
/// Edge order is significant: models, metrics and path enumeration
/// iterate edges in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowNetwork {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl FlowNetwork {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Network over nodes `0..num_nodes` with source `0` and sink
    /// `num_nodes - 1`.
    ///
    /// Edges are `(from, to, capacity, cost, latency)` tuples.
    pub fn numbered(num_nodes: usize, edges: &[(usize, usize, f64, f64, f64)]) -> Self {
        let last = num_nodes.saturating_sub(1);
        let nodes = (0..num_nodes)
            .map(|n| match n {
                0 => Node::source("0", 0.0),
                n if n == last => Node::sink(n.to_string()),
                n => Node::intermediate(n.to_string()),
            })
            .collect();
        let edges = edges
            .iter()
            .map(|&(from, to, capacity, cost, time)| {
                Edge::new(from.to_string(), to.to_string(), capacity)
                    .with_cost(cost)
                    .with_time(time)
            })
            .collect();
        Self { nodes, edges }
    }

    /// Adds a node.
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Adds an edge.
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Looks up a node.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Nodes with the given role, in declaration order.
    pub fn nodes_with_role(&self, role: NodeRole) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.role == role)
    }

    /// Indices of edges leaving `id`, in edge order.
    pub fn outgoing(&self, id: &str) -> Vec<usize> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.from == id)
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of edges entering `id`, in edge order.
    pub fn incoming(&self, id: &str) -> Vec<usize> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.to == id)
            .map(|(i, _)| i)
            .collect()
    }

    /// Sum of source supplies.
    pub fn total_supply(&self) -> f64 {
        self.nodes_with_role(NodeRole::Source).map(|n| n.supply).sum()
    }

    /// Sum of edge capacities.
    pub fn total_capacity(&self) -> f64 {
        self.edges.iter().map(|e| e.capacity).sum()
    }

    /// Graph view: node weights are node ids, edge weights are indices
    /// into [`FlowNetwork::edges`].
    ///
    /// Edges whose endpoints are not declared nodes are skipped; validate
    /// the network first.
    pub fn graph(&self) -> (DiGraph<String, usize>, HashMap<String, NodeIndex>) {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let mut index = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let ix = graph.add_node(node.id.clone());
            index.insert(node.id.clone(), ix);
        }
        for (i, edge) in self.edges.iter().enumerate() {
            if let (Some(&a), Some(&b)) = (index.get(&edge.from), index.get(&edge.to)) {
                graph.add_edge(a, b, i);
            }
        }
        (graph, index)
    }
}
