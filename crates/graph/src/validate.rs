//! Cycle validation for task graphs.
//!
//! Validation walks the graph depth-first and, when a cycle exists, recovers
//! the concrete closed walk so the error names the nodes involved instead of
//! just reporting that ordering failed.

use crate::{Error, Result, TaskGraph};
use petgraph::Direction;
use petgraph::graph::NodeIndex;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    New,
    InProgress,
    Done,
}

enum Frame {
    Enter(NodeIndex),
    Leave,
}

impl TaskGraph {
    /// Check that the graph is acyclic.
    ///
    /// On failure the error carries one offending cycle as a closed walk:
    /// every consecutive pair is an edge of the graph and the first id is
    /// repeated at the end, e.g. `[X, Y, Z, X]`. Roots and successors are
    /// explored in ascending id order, so identical graphs always report
    /// the identical cycle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cycle`] if the graph contains a dependency cycle.
    pub fn validate(&self) -> Result<()> {
        match self.find_cycle() {
            Some(cycle) => Err(Error::Cycle { cycle }),
            None => Ok(()),
        }
    }

    /// Find one directed cycle as a closed walk of ids, if any exists.
    pub(crate) fn find_cycle(&self) -> Option<Vec<String>> {
        let mut marks = vec![Mark::New; self.graph.node_count()];
        // Nodes on the path of the walk currently being explored
        let mut path: Vec<NodeIndex> = Vec::new();

        let mut roots: Vec<NodeIndex> = self.graph.node_indices().collect();
        roots.sort_unstable_by(|a, b| self.graph[*a].id.cmp(&self.graph[*b].id));

        for root in roots {
            if marks[root.index()] != Mark::New {
                continue;
            }

            let mut stack = vec![Frame::Enter(root)];
            while let Some(frame) = stack.pop() {
                match frame {
                    Frame::Enter(node) => match marks[node.index()] {
                        Mark::Done => {}
                        Mark::InProgress => {
                            return Some(self.close_walk(&path, node));
                        }
                        Mark::New => {
                            marks[node.index()] = Mark::InProgress;
                            path.push(node);
                            stack.push(Frame::Leave);

                            let mut successors: Vec<NodeIndex> = self
                                .graph
                                .neighbors_directed(node, Direction::Outgoing)
                                .collect();
                            successors
                                .sort_unstable_by(|a, b| self.graph[*a].id.cmp(&self.graph[*b].id));
                            // Reversed so the smallest id is explored first
                            for &succ in successors.iter().rev() {
                                stack.push(Frame::Enter(succ));
                            }
                        }
                    },
                    Frame::Leave => {
                        if let Some(node) = path.pop() {
                            marks[node.index()] = Mark::Done;
                        }
                    }
                }
            }
        }

        None
    }

    /// Cut the suffix of `path` that starts at `node` and close it into a
    /// cycle by repeating the first id.
    fn close_walk(&self, path: &[NodeIndex], node: NodeIndex) -> Vec<String> {
        let start = path.iter().position(|&n| n == node).unwrap_or(0);
        let mut cycle: Vec<String> = path[start..]
            .iter()
            .map(|&n| self.graph[n].id.clone())
            .collect();
        cycle.push(self.graph[node].id.clone());
        cycle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty_graph() {
        let graph = TaskGraph::new();
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_validate_acyclic_graph() {
        let mut graph = TaskGraph::new();
        graph.add_node("fetch", "http");
        graph.add_node("parse", "jsonparse");
        graph.add_node("submit", "bridge");
        graph.add_edge("fetch", "parse").unwrap();
        graph.add_edge("parse", "submit").unwrap();

        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_three_cycle() {
        let mut graph = TaskGraph::new();
        graph.add_node("x", "");
        graph.add_node("y", "");
        graph.add_node("z", "");
        graph.add_edge("x", "y").unwrap();
        graph.add_edge("y", "z").unwrap();
        graph.add_edge("z", "x").unwrap();

        let err = graph.validate().unwrap_err();
        assert_eq!(
            err,
            Error::Cycle {
                cycle: vec![
                    "x".to_string(),
                    "y".to_string(),
                    "z".to_string(),
                    "x".to_string(),
                ],
            }
        );
    }

    #[test]
    fn test_validate_reports_two_cycle() {
        let mut graph = TaskGraph::new();
        graph.add_node("a", "");
        graph.add_node("b", "");
        graph.add_edge("a", "b").unwrap();
        graph.add_edge("b", "a").unwrap();

        let err = graph.validate().unwrap_err();
        assert_eq!(
            err,
            Error::Cycle {
                cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
            }
        );
    }

    #[test]
    fn test_validate_picks_cycle_from_smallest_root() {
        // Two disjoint cycles; exploration starts at the smallest id, so the
        // (a, b) cycle is the one reported.
        let mut graph = TaskGraph::new();
        for id in ["a", "b", "y", "z"] {
            graph.add_node(id, "");
        }
        graph.add_edge("y", "z").unwrap();
        graph.add_edge("z", "y").unwrap();
        graph.add_edge("a", "b").unwrap();
        graph.add_edge("b", "a").unwrap();

        let err = graph.validate().unwrap_err();
        assert_eq!(
            err,
            Error::Cycle {
                cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
            }
        );
    }

    #[test]
    fn test_validate_cycle_behind_acyclic_prefix() {
        // The cycle is only reachable through a chain; the reported walk
        // must contain just the cycle, not the approach path.
        let mut graph = TaskGraph::new();
        for id in ["a", "b", "c", "d"] {
            graph.add_node(id, "");
        }
        graph.add_edge("a", "b").unwrap();
        graph.add_edge("b", "c").unwrap();
        graph.add_edge("c", "d").unwrap();
        graph.add_edge("d", "b").unwrap();

        let err = graph.validate().unwrap_err();
        assert_eq!(
            err,
            Error::Cycle {
                cycle: vec![
                    "b".to_string(),
                    "c".to_string(),
                    "d".to_string(),
                    "b".to_string(),
                ],
            }
        );
    }

    #[test]
    fn test_validate_diamond_is_not_a_cycle() {
        let mut graph = TaskGraph::new();
        for id in ["a", "b", "c", "d"] {
            graph.add_node(id, "");
        }
        graph.add_edge("a", "b").unwrap();
        graph.add_edge("a", "c").unwrap();
        graph.add_edge("b", "d").unwrap();
        graph.add_edge("c", "d").unwrap();

        assert!(graph.validate().is_ok());
    }
}
