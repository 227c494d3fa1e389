//! Task graph construction over petgraph.
//!
//! This module builds directed graphs of pipeline tasks and exposes the
//! structural queries that validation and ordering run on top of.

use crate::{Error, Result};
use petgraph::Direction;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single task in a pipeline graph.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskNode {
    /// Short identifier of the task, unique within its graph.
    pub id: String,
    /// Declared task kind; empty for nodes introduced only by edges.
    pub kind: String,
    /// Remaining attributes from the task declaration, keyed by name.
    pub attributes: BTreeMap<String, String>,
}

impl TaskNode {
    /// Create a node with the given id and kind and no attributes.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            attributes: BTreeMap::new(),
        }
    }
}

/// Directed graph of pipeline tasks and their dependency edges.
///
/// An edge `from -> to` means `to` depends on `from`: `from` is ordered
/// before `to`. Nodes are addressed by id; edges are unweighted and
/// deduplicated.
///
/// A graph is built up with [`add_node`](Self::add_node) and
/// [`add_edge`](Self::add_edge), checked with
/// [`validate`](Self::validate), and consumed through
/// [`tasks_in_dependency_order`](Self::tasks_in_dependency_order). Once
/// validation has passed the graph is meant to be used read-only.
pub struct TaskGraph {
    /// The directed graph of tasks.
    pub(crate) graph: DiGraph<TaskNode, ()>,
    /// Map from task ids to node indices.
    pub(crate) id_to_node: HashMap<String, NodeIndex>,
}

impl TaskGraph {
    /// Create a new empty task graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            id_to_node: HashMap::new(),
        }
    }

    /// Add a task node, or update the kind of an existing one.
    ///
    /// Node ids are unique: declaring an id twice yields a single node and
    /// returns the same index both times. A redeclaration with a non-empty
    /// kind overwrites the stored kind (last declaration wins); a
    /// redeclaration with an empty kind leaves the stored kind in place, so
    /// referencing a task by bare id never erases what an earlier
    /// declaration said about it. Attributes survive redeclaration and are
    /// edited through [`node_mut`](Self::node_mut).
    pub fn add_node(&mut self, id: &str, kind: &str) -> NodeIndex {
        if let Some(&node) = self.id_to_node.get(id) {
            if !kind.is_empty() {
                self.graph[node].kind = kind.to_string();
                debug!("Updated task node '{}' to kind '{}'", id, kind);
            }
            return node;
        }

        let node = self.graph.add_node(TaskNode::new(id, kind));
        self.id_to_node.insert(id.to_string(), node);
        debug!("Added task node '{}' with kind '{}'", id, kind);

        node
    }

    /// Add a dependency edge from `from` to `to` (`to` depends on `from`).
    ///
    /// Both endpoints must already exist; this method never creates nodes,
    /// so a typo in an endpoint surfaces as an error instead of a silent
    /// extra node. Adding the same edge twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] if either endpoint was never declared,
    /// and [`Error::Cycle`] if `from` and `to` are the same node (a
    /// self-loop is the smallest possible cycle).
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<()> {
        let from_node = self.node_index(from).ok_or_else(|| Error::UnknownNode {
            from: from.to_string(),
            to: to.to_string(),
            node: from.to_string(),
        })?;
        let to_node = self.node_index(to).ok_or_else(|| Error::UnknownNode {
            from: from.to_string(),
            to: to.to_string(),
            node: to.to_string(),
        })?;

        if from_node == to_node {
            return Err(Error::Cycle {
                cycle: vec![from.to_string(), to.to_string()],
            });
        }

        if self.graph.find_edge(from_node, to_node).is_none() {
            self.graph.add_edge(from_node, to_node, ());
            debug!("Added dependency edge '{}' -> '{}'", from, to);
        }

        Ok(())
    }

    /// Get a reference to a task node by id.
    #[must_use]
    pub fn node_by_id(&self, id: &str) -> Option<&TaskNode> {
        self.id_to_node
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Get a mutable reference to a task node by id.
    ///
    /// The `id` field must not be changed through this reference; the graph
    /// indexes nodes by the id they were declared with.
    pub fn node_mut(&mut self, id: &str) -> Option<&mut TaskNode> {
        let idx = *self.id_to_node.get(id)?;
        self.graph.node_weight_mut(idx)
    }

    /// Get the node index for a task by id.
    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.id_to_node.get(id).copied()
    }

    /// Check if a task exists in the graph.
    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.id_to_node.contains_key(id)
    }

    /// Get the number of tasks in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of dependency edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check if the graph contains no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// All task ids in ascending order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.id_to_node.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Ids of the tasks `id` directly depends on, in ascending order.
    ///
    /// Returns an empty list for an unknown id.
    #[must_use]
    pub fn dependencies_of(&self, id: &str) -> Vec<&str> {
        self.neighbor_ids(id, Direction::Incoming)
    }

    /// Ids of the tasks that directly depend on `id`, in ascending order.
    ///
    /// Returns an empty list for an unknown id.
    #[must_use]
    pub fn dependents_of(&self, id: &str) -> Vec<&str> {
        self.neighbor_ids(id, Direction::Outgoing)
    }

    fn neighbor_ids(&self, id: &str, direction: Direction) -> Vec<&str> {
        let Some(node) = self.node_index(id) else {
            return vec![];
        };

        let mut ids: Vec<&str> = self
            .graph
            .neighbors_directed(node, direction)
            .map(|idx| self.graph[idx].id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Check if the graph has cycles.
    ///
    /// This is the cheap yes/no form; [`validate`](Self::validate) also
    /// reports which cycle was found.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }
}

impl Default for TaskGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaskGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskGraph")
            .field("nodes", &self.graph.node_count())
            .field("edges", &self.graph.edge_count())
            .finish()
    }
}
