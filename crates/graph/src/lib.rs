//! Directed task graphs for pipeline dependency resolution.
//!
//! This crate builds directed graphs of pipeline tasks over petgraph,
//! validates that they are acyclic, and computes a deterministic
//! dependency order: dependencies first, ties broken by ascending id.
//!
//! # Key Types
//!
//! - [`TaskGraph`]: the graph of tasks and dependency edges
//! - [`TaskNode`]: a single task with its id, kind, and attributes
//! - [`Error`]: construction, validation, and ordering failures
//!
//! # Example
//!
//! ```
//! use pipedag_graph::TaskGraph;
//!
//! # fn main() -> Result<(), pipedag_graph::Error> {
//! let mut graph = TaskGraph::new();
//! graph.add_node("fetch", "http");
//! graph.add_node("parse", "jsonparse");
//! graph.add_node("submit", "bridge");
//! graph.add_edge("fetch", "parse")?;
//! graph.add_edge("parse", "submit")?;
//!
//! graph.validate()?;
//!
//! let ordered = graph.tasks_in_dependency_order()?;
//! let ids: Vec<&str> = ordered.iter().map(|node| node.id.as_str()).collect();
//! assert_eq!(ids, ["fetch", "parse", "submit"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `serde`: Enable serde serialization/deserialization for [`TaskNode`]

mod error;
mod graph;
mod order;
mod validate;

pub use error::{Error, Result};
pub use graph::{TaskGraph, TaskNode};
