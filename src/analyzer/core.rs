//! # Core Parser Definitions
//!
//! This module defines the fundamental parser interface, the input cursor and
//! the failure type that form the foundation of the combinator system.

use thiserror::Error;

/// Cursor over the source text: the input plus a read position.
///
/// Cursors are immutable values. A parse step never moves the caller's
/// cursor, it reports the next position in its result instead.
///
/// Offsets are byte offsets into the UTF-8 source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    pub source: &'a str,
    pub offset: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the beginning of `source`.
    pub fn new(source: &'a str) -> Self {
        Self { source, offset: 0 }
    }

    /// Creates a cursor at the given offset of `source`.
    pub fn at(source: &'a str, offset: usize) -> Self {
        Self { source, offset }
    }

    /// The same source read from another position.
    pub fn advance_to(self, offset: usize) -> Self {
        Self {
            source: self.source,
            offset,
        }
    }

    /// The unread part of the source.
    ///
    /// Empty when the offset lies past the end or inside a multi-byte character.
    pub fn rest(&self) -> &'a str {
        self.source.get(self.offset..).unwrap_or("")
    }

    pub fn is_at_end(&self) -> bool {
        self.rest().is_empty()
    }
}

/// Parser trait defines the core parsing interface.
///
/// A parser is a pure function of its cursor: it holds no mutable state, so
/// the same parser may be called repeatedly and from several threads.
///
/// # Type Parameters
///
/// * `O` - The output value type
pub trait Parser<O> {
    /// Attempts to parse the input starting at the cursor.
    ///
    /// # Returns
    ///
    /// * `Ok((next_pos, output))` - the position after the match and the parsed value
    /// * `Err(error)` - a [`ParseError`] describing why nothing matched
    fn parse(&self, cursor: Cursor<'_>) -> ParseResult<O>;
}

impl<O, P: Parser<O> + ?Sized> Parser<O> for &P {
    fn parse(&self, cursor: Cursor<'_>) -> ParseResult<O> {
        (**self).parse(cursor)
    }
}

impl<O, P: Parser<O> + ?Sized> Parser<O> for Box<P> {
    fn parse(&self, cursor: Cursor<'_>) -> ParseResult<O> {
        (**self).parse(cursor)
    }
}

/// Result type for parsing operations.
///
/// On success, returns a tuple of the next position and the parsed value.
/// On failure, returns a ParseError.
pub type ParseResult<O> = Result<(usize, O), ParseError>;

/// Error type for parsing operations.
///
/// `reason` is an append-only, human readable trace; `position` is rewritten
/// by every enclosing sequence or rule to the offset where that scope began.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A single primitive or rule did not match
    #[error("{reason}")]
    Local { reason: String, position: usize },
    /// Every alternative of an ordered choice failed
    #[error("{reason}")]
    Aggregate {
        reason: String,
        position: usize,
        alternatives: Vec<ParseError>,
    },
}

impl ParseError {
    pub fn local(reason: impl Into<String>, position: usize) -> Self {
        ParseError::Local {
            reason: reason.into(),
            position,
        }
    }

    /// Combines the failures of all alternatives tried at `position`.
    pub fn aggregate(alternatives: Vec<ParseError>, position: usize) -> Self {
        let reason = alternatives.iter().fold(
            String::from("All of the following parsers have failed:"),
            |mut acc, alternative| {
                acc.push_str("\n  * ");
                acc.push_str(alternative.reason());
                acc
            },
        );
        ParseError::Aggregate {
            reason,
            position,
            alternatives,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            ParseError::Local { reason, .. } => reason,
            ParseError::Aggregate { reason, .. } => reason,
        }
    }

    pub fn position(&self) -> usize {
        match self {
            ParseError::Local { position, .. } => *position,
            ParseError::Aggregate { position, .. } => *position,
        }
    }

    /// Re-reports the failure from a named sequence that started at `start`.
    pub fn within(self, name: &str, start: usize) -> Self {
        let suffix = format!(",\nwhen trying to parse \"{}\" at position {}", name, start);
        self.rewrite(|reason| reason.push_str(&suffix), start)
    }

    /// Re-reports the failure from a named rule that started at `start` and
    /// had advanced to `current` when the failure escaped it.
    pub fn in_rule(self, name: &str, current: usize, start: usize) -> Self {
        let suffix = format!(
            " at position {},\nwhen trying to parse \"{}\" at position {}",
            current, name, start
        );
        self.rewrite(|reason| reason.push_str(&suffix), start)
    }

    fn rewrite(self, extend: impl FnOnce(&mut String), start: usize) -> Self {
        match self {
            ParseError::Local { mut reason, .. } => {
                extend(&mut reason);
                ParseError::Local {
                    reason,
                    position: start,
                }
            }
            ParseError::Aggregate {
                mut reason,
                alternatives,
                ..
            } => {
                extend(&mut reason);
                ParseError::Aggregate {
                    reason,
                    position: start,
                    alternatives,
                }
            }
        }
    }
}
