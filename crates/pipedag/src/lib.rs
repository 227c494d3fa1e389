//! DOT-style pipeline graph parsing with deterministic dependency ordering
//!
//! This crate turns the graph notation used in pipeline definitions into a
//! validated task graph and lists its tasks so that every dependency comes
//! before the tasks that need it. Parsing, graph construction, and
//! ordering are exposed separately for callers that want the intermediate
//! [`TaskGraph`]; [`ordered_task_descriptors`] runs the whole chain.
//!
//! # Example
//!
//! ```
//! use pipedag::ordered_task_descriptors;
//!
//! let tasks = ordered_task_descriptors(
//!     "ds1 [type=http];
//!      ds1_parse [type=jsonparse];
//!      ds1_multiply [type=multiply];
//!      ds1 -> ds1_parse -> ds1_multiply",
//! )?;
//!
//! let ids: Vec<&str> = tasks.iter().map(|task| task.id.as_str()).collect();
//! assert_eq!(ids, ["ds1", "ds1_parse", "ds1_multiply"]);
//! # Ok::<(), pipedag::Error>(())
//! ```
//!
//! # Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` for [`TaskDescriptor`] and
//!   the graph types.

mod descriptor;
mod error;
mod parse;
mod scan;

pub use descriptor::TaskDescriptor;
pub use error::{Error, ParseError, ParseErrorKind, Result};
pub use parse::{NodePolicy, Parser, parse};
pub use pipedag_graph::{Error as GraphError, TaskGraph, TaskNode};

/// Parse graph text and list every task in dependency order.
///
/// Each task appears after all of its dependencies, with ties broken by
/// ascending task id, so a given graph always lists the same way. An
/// empty text yields an empty listing. Callers that want roots-first
/// display should reverse the result themselves.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the text is malformed and
/// [`Error::Graph`] when the graph contains a dependency cycle; the cycle
/// error carries the closed walk that proves it. No partial or placeholder
/// listing is ever produced on failure.
pub fn ordered_task_descriptors(text: &str) -> Result<Vec<TaskDescriptor>> {
    let graph = parse(text)?;
    let ordered = graph.tasks_in_dependency_order()?;
    Ok(ordered.into_iter().map(TaskDescriptor::from).collect())
}
