//! Parsing of DOT-style graph text into a [`TaskGraph`].

use crate::error::{ParseError, ParseErrorKind};
use crate::scan::{Statement, split_statements};
use pipedag_graph::{Error as GraphError, TaskGraph};
use std::fmt;
use tracing::debug;

/// How the parser treats edge endpoints that no node statement declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NodePolicy {
    /// Create missing endpoints as nodes with an empty kind. This is the
    /// usual DOT behavior: mentioning a node in an edge is enough to bring
    /// it into existence.
    #[default]
    Implicit,
    /// Reject edges whose endpoints were never declared by a node
    /// statement anywhere in the text.
    DeclaredOnly,
}

/// Parser for DOT-style pipeline graph text.
///
/// # Notation
///
/// - Statements are separated by newlines, semicolons, and braces; `//`
///   and `#` start a comment that runs to the end of the line.
/// - A node statement is an identifier, optionally followed by an
///   attribute list: `ds1 [type=http, url="https://example.com"]`. The
///   `type` attribute becomes the node's kind; everything else lands in
///   its attribute map. Redeclaring a node merges attributes, with the
///   last written value winning per key.
/// - An edge statement chains identifiers with arrows: `a -> b -> c`
///   declares one edge per consecutive pair. Attribute lists on edges are
///   rejected, not ignored.
/// - Identifiers are ASCII alphanumerics and underscores. `digraph` is a
///   reserved word: a `digraph` or `digraph name` statement (the text a
///   `digraph name { ... }` wrapper leaves behind) is skipped.
/// - Quoted attribute values may contain any text; `\"` and `\\` are the
///   recognized escapes.
///
/// The resulting graph is fully built but not cycle-checked; run
/// [`TaskGraph::validate`] or order it to find cycles.
///
/// # Example
///
/// ```
/// use pipedag::{NodePolicy, Parser};
///
/// let graph = Parser::new()
///     .node_policy(NodePolicy::DeclaredOnly)
///     .parse("fetch [type=http]; parse [type=jsonparse]; fetch -> parse")?;
/// assert_eq!(graph.node_count(), 2);
/// # Ok::<(), pipedag::ParseError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    node_policy: NodePolicy,
}

impl Parser {
    /// Create a parser with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how edge endpoints without a node declaration are treated.
    #[must_use]
    pub fn node_policy(mut self, policy: NodePolicy) -> Self {
        self.node_policy = policy;
        self
    }

    /// Parse graph text into a [`TaskGraph`].
    ///
    /// Node declarations take effect before edges regardless of where they
    /// appear in the text, so a node statement after the edges that use it
    /// still counts as declared.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] locating the first offending statement:
    /// malformed syntax, an edge endpoint missing under
    /// [`NodePolicy::DeclaredOnly`], or a self-loop edge.
    pub fn parse(&self, text: &str) -> Result<TaskGraph, ParseError> {
        let statements = split_statements(text)?;

        let mut parsed = Vec::with_capacity(statements.len());
        for statement in statements {
            let body = parse_statement(&statement.text).map_err(|kind| at(&statement, kind))?;
            parsed.push((statement, body));
        }

        let mut graph = TaskGraph::new();

        for (_, body) in &parsed {
            if let StatementBody::Node { id, attrs } = body {
                declare_node(&mut graph, id, attrs);
            }
        }

        for (statement, body) in &parsed {
            if let StatementBody::Edges { ids } = body {
                for pair in ids.windows(2) {
                    self.apply_edge(&mut graph, &pair[0], &pair[1])
                        .map_err(|kind| at(statement, kind))?;
                }
            }
        }

        debug!(
            "Parsed graph text into {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    fn apply_edge(
        &self,
        graph: &mut TaskGraph,
        from: &str,
        to: &str,
    ) -> Result<(), ParseErrorKind> {
        match self.node_policy {
            NodePolicy::Implicit => {
                graph.add_node(from, "");
                graph.add_node(to, "");
            }
            NodePolicy::DeclaredOnly => {
                for node in [from, to] {
                    if !graph.contains_node(node) {
                        return Err(ParseErrorKind::Graph(GraphError::UnknownNode {
                            from: from.to_string(),
                            to: to.to_string(),
                            node: node.to_string(),
                        }));
                    }
                }
            }
        }

        graph.add_edge(from, to).map_err(ParseErrorKind::Graph)
    }
}

/// Parse graph text with the default parser configuration.
///
/// # Errors
///
/// Returns a [`ParseError`] locating the first offending statement.
pub fn parse(text: &str) -> Result<TaskGraph, ParseError> {
    Parser::new().parse(text)
}

fn at(statement: &Statement, kind: ParseErrorKind) -> ParseError {
    ParseError {
        line: statement.line,
        text: statement.text.clone(),
        kind,
    }
}

/// Apply one node declaration: the `type` attribute becomes the kind, the
/// rest merge into the attribute map.
fn declare_node(graph: &mut TaskGraph, id: &str, attrs: &[(String, String)]) {
    let mut kind = String::new();
    for (key, value) in attrs {
        if key == "type" {
            kind = value.clone();
        }
    }
    graph.add_node(id, &kind);

    if let Some(node) = graph.node_mut(id) {
        for (key, value) in attrs {
            if key != "type" {
                node.attributes.insert(key.clone(), value.clone());
            }
        }
    }
}

/// The graph content of one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
enum StatementBody {
    /// `ident` or `ident [key=value ...]`
    Node {
        id: String,
        attrs: Vec<(String, String)>,
    },
    /// `a -> b -> c`: one edge per consecutive pair
    Edges { ids: Vec<String> },
    /// A wrapper line with nothing to add to the graph
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Quoted(String),
    Arrow,
    OpenBracket,
    CloseBracket,
    Equals,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(ident) => write!(f, "{ident}"),
            Self::Quoted(value) => write!(f, "\"{value}\""),
            Self::Arrow => write!(f, "->"),
            Self::OpenBracket => write!(f, "["),
            Self::CloseBracket => write!(f, "]"),
            Self::Equals => write!(f, "="),
            Self::Comma => write!(f, ","),
        }
    }
}

fn parse_statement(text: &str) -> Result<StatementBody, ParseErrorKind> {
    let tokens = tokenize(text)?;

    let Some(first) = tokens.first() else {
        return Ok(StatementBody::Skip);
    };

    match first {
        Token::Ident(id) if id == "digraph" => match &tokens[1..] {
            [] | [Token::Ident(_)] => Ok(StatementBody::Skip),
            // Skip past an optional wrapper name so the error names the
            // token that breaks the form, not the name before it
            [Token::Ident(_), unexpected, ..] | [unexpected, ..] => {
                Err(ParseErrorKind::UnexpectedToken(unexpected.to_string()))
            }
        },
        Token::Ident(id) => match tokens.get(1) {
            None => Ok(StatementBody::Node {
                id: id.clone(),
                attrs: vec![],
            }),
            Some(Token::OpenBracket) => Ok(StatementBody::Node {
                id: id.clone(),
                attrs: parse_attributes(&tokens[2..])?,
            }),
            Some(Token::Arrow) => Ok(StatementBody::Edges {
                ids: parse_edge_chain(&tokens)?,
            }),
            Some(unexpected) => Err(ParseErrorKind::UnexpectedToken(unexpected.to_string())),
        },
        Token::Arrow => Err(ParseErrorKind::MissingIdentifier),
        unexpected => Err(ParseErrorKind::UnexpectedToken(unexpected.to_string())),
    }
}

/// Parse `key=value` pairs up to the closing `]`, which must also end the
/// statement. Commas between pairs are optional.
fn parse_attributes(tokens: &[Token]) -> Result<Vec<(String, String)>, ParseErrorKind> {
    let mut attrs = Vec::new();
    let mut index = 0;

    loop {
        match tokens.get(index) {
            None => return Err(ParseErrorKind::UnterminatedAttributes),
            Some(Token::CloseBracket) => {
                index += 1;
                break;
            }
            Some(Token::Comma) => {
                index += 1;
            }
            Some(Token::Ident(key)) => {
                if !matches!(tokens.get(index + 1), Some(Token::Equals)) {
                    return Err(ParseErrorKind::MissingAttributeValue(key.clone()));
                }
                let value = match tokens.get(index + 2) {
                    Some(Token::Ident(value) | Token::Quoted(value)) => value.clone(),
                    _ => return Err(ParseErrorKind::MissingAttributeValue(key.clone())),
                };
                attrs.push((key.clone(), value));
                index += 3;
            }
            Some(unexpected) => {
                return Err(ParseErrorKind::UnexpectedToken(unexpected.to_string()));
            }
        }
    }

    match tokens.get(index) {
        None => Ok(attrs),
        Some(trailing) => Err(ParseErrorKind::UnexpectedToken(trailing.to_string())),
    }
}

/// Parse `a -> b -> c` into the chained ids.
fn parse_edge_chain(tokens: &[Token]) -> Result<Vec<String>, ParseErrorKind> {
    let mut ids = Vec::new();
    let mut expect_ident = true;

    for token in tokens {
        match (expect_ident, token) {
            (true, Token::Ident(id)) => {
                ids.push(id.clone());
                expect_ident = false;
            }
            (true, Token::Arrow) => return Err(ParseErrorKind::MissingIdentifier),
            (false, Token::Arrow) => expect_ident = true,
            (false, Token::OpenBracket) => return Err(ParseErrorKind::EdgeAttributes),
            (_, unexpected) => {
                return Err(ParseErrorKind::UnexpectedToken(unexpected.to_string()));
            }
        }
    }

    if expect_ident {
        // Trailing arrow with nothing after it
        return Err(ParseErrorKind::MissingIdentifier);
    }

    Ok(ids)
}

fn tokenize(text: &str) -> Result<Vec<Token>, ParseErrorKind> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            '[' => tokens.push(Token::OpenBracket),
            ']' => tokens.push(Token::CloseBracket),
            '=' => tokens.push(Token::Equals),
            ',' => tokens.push(Token::Comma),
            '-' => {
                if chars.peek() == Some(&'>') {
                    chars.next();
                    tokens.push(Token::Arrow);
                } else {
                    return Err(ParseErrorKind::UnexpectedToken("-".to_string()));
                }
            }
            '"' => {
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped @ ('"' | '\\')) => value.push(escaped),
                            Some(other) => {
                                value.push('\\');
                                value.push(other);
                            }
                            None => return Err(ParseErrorKind::UnterminatedString),
                        },
                        Some(other) => value.push(other),
                        None => return Err(ParseErrorKind::UnterminatedString),
                    }
                }
                tokens.push(Token::Quoted(value));
            }
            c if c.is_ascii_alphanumeric() || c == '_' => {
                let mut ident = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        ident.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            unexpected => {
                return Err(ParseErrorKind::UnexpectedToken(unexpected.to_string()));
            }
        }
    }

    Ok(tokens)
}
