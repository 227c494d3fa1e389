//! Dependency ordering for task graphs.
//!
//! The orderer produces the sequence consumers hand to downstream stages:
//! dependencies first, dependents after, ties broken by id.

use crate::{Error, Result, TaskGraph, TaskNode};
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

impl TaskGraph {
    /// All tasks in dependency order: every task appears after every task
    /// it depends on.
    ///
    /// Whenever several tasks are eligible at the same time, the one with
    /// the lexicographically smallest id is emitted next, so the result is
    /// fully determined by the graph. A graph with no edges comes out in
    /// ascending id order. Callers that want the conventional listing-style
    /// display, roots first, should iterate the result in reverse.
    ///
    /// The order is computed fresh on every call; nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cycle`] with one offending cycle if the graph is
    /// not acyclic. The result is never truncated: either all tasks are
    /// ordered or the call fails.
    pub fn tasks_in_dependency_order(&self) -> Result<Vec<&TaskNode>> {
        let mut indegree = vec![0_usize; self.graph.node_count()];
        for node in self.graph.node_indices() {
            indegree[node.index()] = self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .count();
        }

        // Min-heap keyed on id; ids are unique so the index never decides
        let mut ready: BinaryHeap<Reverse<(&str, NodeIndex)>> = self
            .graph
            .node_indices()
            .filter(|node| indegree[node.index()] == 0)
            .map(|node| Reverse((self.graph[node].id.as_str(), node)))
            .collect();

        let mut ordered: Vec<&TaskNode> = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse((_, node))) = ready.pop() {
            ordered.push(&self.graph[node]);

            for succ in self.graph.neighbors_directed(node, Direction::Outgoing) {
                indegree[succ.index()] -= 1;
                if indegree[succ.index()] == 0 {
                    ready.push(Reverse((self.graph[succ].id.as_str(), succ)));
                }
            }
        }

        if ordered.len() < self.graph.node_count() {
            // Unordered leftovers sit on or behind a cycle
            let cycle = self.find_cycle().unwrap_or_default();
            return Err(Error::Cycle { cycle });
        }

        Ok(ordered)
    }
}
