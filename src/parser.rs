//! Document-level entry point.
//!
//! [`parse_formula`](crate::analyzer::parsers::parse_formula) reads a formula
//! from any offset and leaves whatever follows it. [`FormulaParser`] treats
//! the source as a whole document: it checks the parenthesis nesting up
//! front, trims surrounding whitespace and, unless configured otherwise,
//! rejects input left over after the formula.

use std::str::FromStr;

use tracing::debug;

use crate::analyzer::parsers::parse_formula;
use crate::analyzer::prelude::whitespace;
use crate::analyzer::{Cursor, Parser};
use crate::ast::FormulaNode;
use crate::config::ParserConfig;
use crate::error::{FormulaError, FormulaResult};

#[derive(Debug, Clone, Default)]
pub struct FormulaParser {
    config: ParserConfig,
}

impl FormulaParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses `source` as a single formula.
    ///
    /// # Errors
    ///
    /// * [`FormulaError::NestingTooDeep`] before any parsing when parentheses
    ///   nest deeper than `max_nesting_depth`
    /// * [`FormulaError::Syntax`] with the failure trace of the grammar
    /// * [`FormulaError::TrailingInput`] when the formula ends early
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn parse(&self, source: &str) -> FormulaResult<FormulaNode> {
        let depth = nesting_depth(source);
        if depth > self.config.max_nesting_depth {
            return Err(FormulaError::NestingTooDeep {
                depth,
                limit: self.config.max_nesting_depth,
            });
        }

        let mut start = 0;
        if self.config.allow_surrounding_whitespace {
            start = skip_whitespace(Cursor::new(source));
        }
        let (mut next, node) = parse_formula().parse(Cursor::at(source, start))?;

        if self.config.allow_trailing_input {
            debug!(kind = %node.kind(), next, "formula parsed, trailing input allowed");
            return Ok(node);
        }
        if self.config.allow_surrounding_whitespace {
            next = skip_whitespace(Cursor::at(source, next));
        }
        let end = Cursor::at(source, next);
        if !end.is_at_end() {
            return Err(FormulaError::TrailingInput {
                position: next,
                remaining: end.rest().to_string(),
            });
        }

        debug!(kind = %node.kind(), "formula parsed");
        Ok(node)
    }
}

/// Parses `source` with the default configuration.
pub fn parse(source: &str) -> FormulaResult<FormulaNode> {
    FormulaParser::default().parse(source)
}

impl FromStr for FormulaNode {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

fn skip_whitespace(cursor: Cursor<'_>) -> usize {
    whitespace()
        .parse(cursor)
        .map(|(next, _)| next)
        .unwrap_or(cursor.offset)
}

// 閉じ括弧の過不足は文法側でエラーになる
fn nesting_depth(source: &str) -> usize {
    let (_, deepest) = source
        .chars()
        .fold((0usize, 0usize), |(depth, deepest), c| match c {
            '(' => (depth + 1, deepest.max(depth + 1)),
            ')' => (depth.saturating_sub(1), deepest),
            _ => (depth, deepest),
        });
    deepest
}
