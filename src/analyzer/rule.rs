//! # Rule Builder
//!
//! A [`Rule`] lets a grammar rule be written as straight-line code instead
//! of nested tuples. The rule's script receives a [`Steps`] handle and runs
//! one sub-parser per step:
//!
//! ```
//! use fol_parser::analyzer::prelude::*;
//! use fol_parser::analyzer::{Cursor, Parser};
//!
//! let greeting = rule("greeting", |steps| {
//!     steps.run(constant("hello"))?;
//!     let spaced = steps.run(whitespace())?;
//!     if !spaced {
//!         return Err(steps.raise("Expected space after 'hello'"));
//!     }
//!     // optional step: a failure is caught and the script carries on
//!     let name = steps.run(constant("world")).ok();
//!     Ok(name.is_some())
//! });
//!
//! assert_eq!(greeting.parse(Cursor::new("hello world")), Ok((11, true)));
//! assert_eq!(greeting.parse(Cursor::new("hello there")), Ok((6, false)));
//! ```
//!
//! Steps run strictly one after another. A successful step advances the
//! cursor, a failed step leaves it untouched and hands its failure back to
//! the script, which either catches it locally or propagates it with `?`.

use super::core::{Cursor, ParseError, ParseResult, Parser};

/// Interpreter state of one rule invocation.
#[derive(Debug)]
pub struct Steps<'a> {
    cursor: Cursor<'a>,
    start: usize,
}

impl<'a> Steps<'a> {
    fn new(cursor: Cursor<'a>) -> Self {
        Self {
            cursor,
            start: cursor.offset,
        }
    }

    /// Runs one step against the current cursor.
    ///
    /// On success the cursor moves to the step's next position. On failure
    /// the cursor is left as it was.
    pub fn run<O, P>(&mut self, parser: P) -> Result<O, ParseError>
    where
        P: Parser<O>,
    {
        let (next_pos, value) = parser.parse(self.cursor)?;
        self.cursor = self.cursor.advance_to(next_pos);
        Ok(value)
    }

    /// Builds a grammar-level failure at the current position.
    ///
    /// Returned from the script it propagates exactly like a failed step.
    pub fn raise(&self, message: impl Into<String>) -> ParseError {
        ParseError::local(message, self.cursor.offset)
    }

    /// The offset reached by the last successful step.
    pub fn position(&self) -> usize {
        self.cursor.offset
    }

    /// The offset the rule started from.
    pub fn start(&self) -> usize {
        self.start
    }
}

/// Rule: A named parser whose body is a script of steps
#[derive(Clone)]
pub struct Rule<F> {
    name: String,
    script: F,
}

impl<F> Rule<F> {
    pub fn new(name: impl Into<String>, script: F) -> Self {
        Self {
            name: name.into(),
            script,
        }
    }
}

impl<R, F> Parser<R> for Rule<F>
where
    F: Fn(&mut Steps<'_>) -> Result<R, ParseError>,
{
    fn parse(&self, cursor: Cursor<'_>) -> ParseResult<R> {
        let mut steps = Steps::new(cursor);
        match (self.script)(&mut steps) {
            Ok(value) => Ok((steps.position(), value)),
            Err(e) => Err(e.in_rule(&self.name, steps.position(), steps.start())),
        }
    }
}
