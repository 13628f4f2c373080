use super::combinators::*;
use super::core::{Cursor, ParseError, ParseResult, Parser};
use super::rule::{Rule, Steps};
use lazy_static::lazy_static;

lazy_static! {
    static ref WHITESPACE: Pattern = Pattern::new(r"\s*").expect("whitespace pattern is valid");
}

pub fn constant(value: impl Into<String>) -> Constant {
    Constant::new(value)
}

pub fn pattern(regex: &str) -> Result<Pattern, regex::Error> {
    Pattern::new(regex)
}

/// Zero or more whitespace characters; never fails.
///
/// The result tells whether at least one character was consumed.
pub fn whitespace() -> Map<Pattern, fn(String) -> bool, String> {
    map(WHITESPACE.clone(), consumed as fn(String) -> bool)
}

fn consumed(matched: String) -> bool {
    !matched.is_empty()
}

pub fn succeed<O: Clone>(value: O) -> Succeed<O> {
    Succeed::new(value)
}

pub fn fail<O>(reason: impl Into<String>) -> Fail<O> {
    Fail::new(reason)
}

pub fn concat<T>(name: impl Into<String>, parsers: T) -> Concat<T> {
    Concat::new(name, parsers)
}

pub fn choice<O>(parsers: Vec<Box<dyn Parser<O>>>) -> Choice<O> {
    Choice::new(parsers)
}

pub fn map<P, F, A, B>(parser: P, f: F) -> Map<P, F, A>
where
    P: Parser<A>,
    F: Fn(A) -> B,
{
    Map::new(parser, f)
}

pub fn probe<P, O>(parser: P) -> Probe<P, O>
where
    P: Parser<O>,
{
    Probe::new(parser)
}

pub fn from_fn<O, F>(f: F) -> FromFn<F>
where
    F: Fn(Cursor<'_>) -> ParseResult<O>,
{
    FromFn::new(f)
}

/// Caches `parser`'s results per offset under `name` for one top-level call.
pub fn memo<P>(name: &'static str, parser: P) -> Memo<P> {
    Memo::new(name, parser)
}

pub fn rule<R, F>(name: impl Into<String>, script: F) -> Rule<F>
where
    F: Fn(&mut Steps<'_>) -> Result<R, ParseError>,
{
    Rule::new(name, script)
}
