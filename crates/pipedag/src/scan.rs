//! Statement scanning for graph text.
//!
//! The scanner cuts raw graph text into trimmed statements before any
//! tokenizing happens: it strips `//` and `#` comments, splits on newlines,
//! semicolons, and braces, and keeps track of the 1-based line each
//! statement starts on. Quoted strings are opaque to it, so separators and
//! comment markers inside quotes survive into the statement text.

use crate::error::{ParseError, ParseErrorKind};

/// One non-empty statement of graph text with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Statement {
    /// 1-based line the statement starts on.
    pub(crate) line: usize,
    /// Trimmed statement text.
    pub(crate) text: String,
}

/// Split graph text into statements.
///
/// Statements are separated by newlines, `;`, `{`, and `}` outside quoted
/// strings; empty statements are dropped. Backslash escapes inside quotes
/// (`\"` and `\\`) are carried through verbatim for the tokenizer to
/// resolve.
pub(crate) fn split_statements(text: &str) -> Result<Vec<Statement>, ParseError> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut start_line: Option<usize> = None;
    let mut line = 1_usize;
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                push(&mut current, &mut start_line, line, c);
            }
            '\\' if in_quotes => {
                push(&mut current, &mut start_line, line, c);
                if let Some(escaped) = chars.next() {
                    if escaped == '\n' {
                        line += 1;
                    }
                    push(&mut current, &mut start_line, line, escaped);
                }
            }
            '\n' => {
                if in_quotes {
                    push(&mut current, &mut start_line, line, c);
                } else {
                    flush(&mut statements, &mut current, &mut start_line);
                }
                line += 1;
            }
            ';' | '{' | '}' if !in_quotes => {
                flush(&mut statements, &mut current, &mut start_line);
            }
            '#' if !in_quotes => {
                skip_comment(&mut chars);
            }
            '/' if !in_quotes && chars.peek() == Some(&'/') => {
                skip_comment(&mut chars);
            }
            _ => {
                push(&mut current, &mut start_line, line, c);
            }
        }
    }

    if in_quotes {
        return Err(ParseError {
            line: start_line.unwrap_or(line),
            text: current.trim().to_string(),
            kind: ParseErrorKind::UnterminatedString,
        });
    }

    flush(&mut statements, &mut current, &mut start_line);
    Ok(statements)
}

/// Append a character, recording the line of the first non-whitespace one.
fn push(current: &mut String, start_line: &mut Option<usize>, line: usize, c: char) {
    if start_line.is_none() && !c.is_whitespace() {
        *start_line = Some(line);
    }
    current.push(c);
}

/// Emit the buffered statement if it has any content.
fn flush(statements: &mut Vec<Statement>, current: &mut String, start_line: &mut Option<usize>) {
    let text = current.trim();
    if !text.is_empty() {
        statements.push(Statement {
            line: start_line.unwrap_or(1),
            text: text.to_string(),
        });
    }
    current.clear();
    *start_line = None;
}

/// Consume up to, but not including, the next newline.
fn skip_comment(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while let Some(&next) = chars.peek() {
        if next == '\n' {
            break;
        }
        chars.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(statements: &[Statement]) -> Vec<&str> {
        statements.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_empty_text_has_no_statements() {
        assert!(split_statements("").unwrap().is_empty());
        assert!(split_statements("   \n\n  \t ").unwrap().is_empty());
    }

    #[test]
    fn test_split_on_semicolons() {
        let statements = split_statements("a; b; a -> b").unwrap();
        assert_eq!(texts(&statements), vec!["a", "b", "a -> b"]);
        assert_eq!(statements[0].line, 1);
        assert_eq!(statements[2].line, 1);
    }

    #[test]
    fn test_split_on_newlines_tracks_lines() {
        let statements = split_statements("a\nb\n\nc -> d\n").unwrap();
        assert_eq!(texts(&statements), vec!["a", "b", "c -> d"]);
        assert_eq!(statements[0].line, 1);
        assert_eq!(statements[1].line, 2);
        assert_eq!(statements[2].line, 4);
    }

    #[test]
    fn test_leading_whitespace_does_not_shift_line() {
        let statements = split_statements("\n\n   a").unwrap();
        assert_eq!(statements[0].line, 3);
    }

    #[test]
    fn test_line_comments_are_stripped() {
        let statements =
            split_statements("a // declares a\nb # declares b\n// only a comment\nc").unwrap();
        assert_eq!(texts(&statements), vec!["a", "b", "c"]);
        assert_eq!(statements[2].line, 4);
    }

    #[test]
    fn test_comment_markers_inside_quotes_survive() {
        let statements = split_statements("a [url=\"https://example.com#frag\"]").unwrap();
        assert_eq!(
            texts(&statements),
            vec!["a [url=\"https://example.com#frag\"]"]
        );
    }

    #[test]
    fn test_separators_inside_quotes_survive() {
        let statements = split_statements("a [path=\"x;y{z}\"]; b").unwrap();
        assert_eq!(texts(&statements), vec!["a [path=\"x;y{z}\"]", "b"]);
    }

    #[test]
    fn test_braces_split_statements() {
        let statements = split_statements("digraph g {a; a -> b}").unwrap();
        assert_eq!(texts(&statements), vec!["digraph g", "a", "a -> b"]);
    }

    #[test]
    fn test_escaped_quote_does_not_close_string() {
        let statements = split_statements(r#"a [note="say \"hi\"; ok"]"#).unwrap();
        assert_eq!(texts(&statements), vec![r#"a [note="say \"hi\"; ok"]"#]);
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let err = split_statements("a [note=\"oops]\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_multi_line_statement_keeps_start_line() {
        let statements = split_statements("a;\nb [note=\"one\ntwo\"]").unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1].line, 2);
        assert_eq!(statements[1].text, "b [note=\"one\ntwo\"]");
    }
}
