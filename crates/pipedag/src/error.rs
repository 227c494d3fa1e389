//! Error types for graph text parsing and the descriptor pipeline.

/// Result type for the parse-validate-order pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// A statement in the graph text that could not be processed.
///
/// Carries the 1-based line number and the offending statement text so the
/// failure can be pointed at in the source, plus the [`ParseErrorKind`]
/// saying what was wrong with it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {kind} in statement '{text}'")]
pub struct ParseError {
    /// 1-based line number where the offending statement starts.
    pub line: usize,
    /// The offending statement text, trimmed.
    pub text: String,
    /// What was wrong with the statement.
    pub kind: ParseErrorKind,
}

/// Reasons a statement fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// A quoted value never sees its closing quote.
    #[error("unterminated quoted string")]
    UnterminatedString,

    /// An attribute list never sees its closing `]`.
    #[error("unterminated attribute list")]
    UnterminatedAttributes,

    /// An edge statement is missing a node identifier around `->`.
    #[error("edge is missing a node identifier")]
    MissingIdentifier,

    /// An attribute has no `=` or no value after it.
    #[error("attribute '{0}' is missing a value")]
    MissingAttributeValue(String),

    /// Attribute lists are only supported on node statements.
    #[error("attribute lists are not supported on edges")]
    EdgeAttributes,

    /// A token that does not fit the grammar at this position.
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),

    /// The statement parsed cleanly but was rejected by the graph.
    #[error(transparent)]
    Graph(#[from] pipedag_graph::Error),
}

/// Errors from the parse-validate-order pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The graph text is malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The graph is structurally invalid: an unknown node or a cycle.
    #[error(transparent)]
    Graph(#[from] pipedag_graph::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_carries_location() {
        let err = ParseError {
            line: 3,
            text: "fetch ->".to_string(),
            kind: ParseErrorKind::MissingIdentifier,
        };
        assert_eq!(
            err.to_string(),
            "line 3: edge is missing a node identifier in statement 'fetch ->'"
        );
    }

    #[test]
    fn test_graph_error_is_transparent() {
        let err = Error::Graph(pipedag_graph::Error::Cycle {
            cycle: vec!["x".to_string(), "x".to_string()],
        });
        assert_eq!(err.to_string(), "dependency cycle detected: x -> x");
    }
}
