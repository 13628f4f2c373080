//! # Parser Combinators
//!
//! This module implements the combinators that form the building blocks of
//! the formula parser. Each combinator is a small struct implementing
//! [`Parser`]; the [`prelude`](super::prelude) module offers a constructor
//! function for each of them.
//!
//! ## Combinator Types
//!
//! * **Primitive Parsers**: `Constant`, `Pattern`, `Succeed`, `Fail`
//! * **Sequential Combinators**: `Concat` (tuples of one to six parsers)
//! * **Alternative Combinators**: `Choice`
//! * **Transformation Combinators**: `Map`, `Probe`
//! * **Construction Helpers**: `FromFn`
//! * **Caching**: `Memo`
//!
//! The step-by-step rule builder lives in [`rule`](super::rule).

use super::core::{Cursor, ParseError, ParseResult, Parser};
use regex::Regex;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

/// Constant: Matches an exact string at the cursor
///
/// The comparison is case-sensitive and nothing is trimmed. On success the
/// result is the string itself and the cursor advances by its length.
#[derive(Clone, Debug)]
pub struct Constant {
    value: String,
}

impl Constant {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl Parser<String> for Constant {
    fn parse(&self, cursor: Cursor<'_>) -> ParseResult<String> {
        if cursor.rest().starts_with(self.value.as_str()) {
            Ok((cursor.offset + self.value.len(), self.value.clone()))
        } else {
            Err(ParseError::local(
                format!(
                    "Could not read string \"{}\" at position {}",
                    self.value, cursor.offset
                ),
                cursor.offset,
            ))
        }
    }
}

/// Pattern: Matches a regular expression anchored at the cursor
///
/// Unlike a plain regex search, the match has to start exactly at the
/// cursor. The result is the matched text.
#[derive(Clone, Debug)]
pub struct Pattern {
    source: String,
    anchored: Regex,
}

impl Pattern {
    /// Compiles `pattern` into a parser.
    ///
    /// # Errors
    ///
    /// Returns the regex compilation error when `pattern` is not a valid expression.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let anchored = Regex::new(&format!("^(?:{})", pattern))?;
        Ok(Self {
            source: pattern.to_string(),
            anchored,
        })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source)
    }
}

impl Parser<String> for Pattern {
    fn parse(&self, cursor: Cursor<'_>) -> ParseResult<String> {
        match self.anchored.find(cursor.rest()) {
            Some(found) => Ok((cursor.offset + found.end(), found.as_str().to_string())),
            None => Err(ParseError::local(
                format!(
                    "Could not read regular expression {} at position {}",
                    self, cursor.offset
                ),
                cursor.offset,
            )),
        }
    }
}

/// Succeed: Always succeeds with the given value without consuming input
#[derive(Clone, Debug)]
pub struct Succeed<O> {
    value: O,
}

impl<O> Succeed<O> {
    pub fn new(value: O) -> Self {
        Self { value }
    }
}

impl<O: Clone> Parser<O> for Succeed<O> {
    fn parse(&self, cursor: Cursor<'_>) -> ParseResult<O> {
        Ok((cursor.offset, self.value.clone()))
    }
}

/// Fail: Always fails at the cursor with the given reason
#[derive(Clone, Debug)]
pub struct Fail<O> {
    reason: String,
    _phantom: PhantomData<O>,
}

impl<O> Fail<O> {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            _phantom: PhantomData,
        }
    }
}

impl<O> Parser<O> for Fail<O> {
    fn parse(&self, cursor: Cursor<'_>) -> ParseResult<O> {
        Err(ParseError::local(self.reason.clone(), cursor.offset))
    }
}

/// Concat: Applies a fixed tuple of parsers in sequence
///
/// The parsers run left to right against one advancing cursor and their
/// results are collected into a tuple of the same arity. The first failure
/// stops the sequence; it is re-reported under the sequence's name with its
/// position moved to where the sequence started.
#[derive(Clone)]
pub struct Concat<T> {
    name: String,
    parsers: T,
}

impl<T> Concat<T> {
    /// Creates a new Concat parser
    ///
    /// # Arguments
    ///
    /// * `name` - The name reported in failure traces
    /// * `parsers` - A tuple of parsers to apply in order
    pub fn new(name: impl Into<String>, parsers: T) -> Self {
        Self {
            name: name.into(),
            parsers,
        }
    }
}

macro_rules! impl_concat {
    ($(($P:ident, $O:ident, $p:ident, $v:ident)),+) => {
        impl<$($P,)+ $($O,)+> Parser<($($O,)+)> for Concat<($($P,)+)>
        where
            $($P: Parser<$O>,)+
        {
            fn parse(&self, cursor: Cursor<'_>) -> ParseResult<($($O,)+)> {
                let ($($p,)+) = &self.parsers;
                let mut pos = cursor.offset;
                $(
                    let (next, $v) = $p
                        .parse(cursor.advance_to(pos))
                        .map_err(|e| e.within(&self.name, cursor.offset))?;
                    pos = next;
                )+
                Ok((pos, ($($v,)+)))
            }
        }
    };
}

impl_concat!((P1, O1, p1, v1));
impl_concat!((P1, O1, p1, v1), (P2, O2, p2, v2));
impl_concat!((P1, O1, p1, v1), (P2, O2, p2, v2), (P3, O3, p3, v3));
impl_concat!(
    (P1, O1, p1, v1),
    (P2, O2, p2, v2),
    (P3, O3, p3, v3),
    (P4, O4, p4, v4)
);
impl_concat!(
    (P1, O1, p1, v1),
    (P2, O2, p2, v2),
    (P3, O3, p3, v3),
    (P4, O4, p4, v4),
    (P5, O5, p5, v5)
);
impl_concat!(
    (P1, O1, p1, v1),
    (P2, O2, p2, v2),
    (P3, O3, p3, v3),
    (P4, O4, p4, v4),
    (P5, O5, p5, v5),
    (P6, O6, p6, v6)
);

/// Choice: Tries multiple parsers and succeeds with the first successful one
///
/// Every parser is tried against the same cursor, in order. Earlier parsers
/// win even when a later one would also match. If all parsers fail, the
/// result is an aggregate failure listing each attempt.
pub struct Choice<O> {
    /// The list of parsers to try
    parsers: Vec<Box<dyn Parser<O>>>,
}

impl<O> Choice<O> {
    /// Creates a new Choice parser
    ///
    /// # Arguments
    ///
    /// * `parsers` - A vector of boxed parsers to try in order
    pub fn new(parsers: Vec<Box<dyn Parser<O>>>) -> Self {
        Self { parsers }
    }
}

impl<O> Parser<O> for Choice<O> {
    fn parse(&self, cursor: Cursor<'_>) -> ParseResult<O> {
        let mut failures = Vec::with_capacity(self.parsers.len());
        for parser in &self.parsers {
            match parser.parse(cursor) {
                Ok(result) => return Ok(result),
                Err(e) => {
                    tracing::trace!(
                        target: "parser::choice",
                        alternative = failures.len(),
                        position = cursor.offset,
                        "alternative failed, trying next"
                    );
                    failures.push(e);
                }
            }
        }
        Err(ParseError::aggregate(failures, cursor.offset))
    }
}

/// Map: Transforms the output of a parser using a function
///
/// Failures pass through untouched and the next position is preserved.
#[derive(Clone)]
pub struct Map<P, F, A> {
    /// The parser whose output will be transformed
    parser: P,
    /// The transformation function
    f: F,
    _phantom: PhantomData<A>,
}

impl<P, F, A> Map<P, F, A> {
    /// Creates a new Map parser
    ///
    /// # Arguments
    ///
    /// * `parser` - The parser whose output will be transformed
    /// * `f` - The transformation function to apply to the parser's output
    pub fn new(parser: P, f: F) -> Self {
        Self {
            parser,
            f,
            _phantom: PhantomData,
        }
    }
}

impl<A, B, P, F> Parser<B> for Map<P, F, A>
where
    P: Parser<A>,
    F: Fn(A) -> B,
{
    fn parse(&self, cursor: Cursor<'_>) -> ParseResult<B> {
        self.parser
            .parse(cursor)
            .map(|(pos, value)| (pos, (self.f)(value)))
    }
}

/// Probe: Runs a parser without ever failing
///
/// On success the value is wrapped in `Some` at the inner parser's next
/// position. On failure the result is `None` and the cursor stays where it was.
#[derive(Clone)]
pub struct Probe<P, O> {
    parser: P,
    _phantom: PhantomData<O>,
}

impl<P, O> Probe<P, O> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<O, P> Parser<Option<O>> for Probe<P, O>
where
    P: Parser<O>,
{
    fn parse(&self, cursor: Cursor<'_>) -> ParseResult<Option<O>> {
        match self.parser.parse(cursor) {
            Ok((next_pos, value)) => Ok((next_pos, Some(value))),
            Err(e) => {
                tracing::trace!(
                    target: "parser::probe",
                    error = %e,
                    position = cursor.offset,
                    "Probe parser suppressed an error"
                );
                Ok((cursor.offset, None))
            }
        }
    }
}

/// FromFn: Uses a plain function of the cursor as a parser
#[derive(Clone)]
pub struct FromFn<F> {
    f: F,
}

impl<F> FromFn<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<O, F> Parser<O> for FromFn<F>
where
    F: Fn(Cursor<'_>) -> ParseResult<O>,
{
    fn parse(&self, cursor: Cursor<'_>) -> ParseResult<O> {
        (self.f)(cursor)
    }
}

/// Rule name, source address, source length, offset.
type MemoKey = (&'static str, usize, usize, usize);

#[derive(Default)]
struct MemoTable {
    depth: usize,
    entries: HashMap<MemoKey, Box<dyn Any>>,
}

thread_local! {
    // 最も外側の Memo 呼び出しが終わるまでの間だけ有効
    static MEMO_TABLE: RefCell<MemoTable> = RefCell::new(MemoTable::default());
}

struct MemoSession;

impl MemoSession {
    fn enter() -> Self {
        MEMO_TABLE.with(|table| table.borrow_mut().depth += 1);
        MemoSession
    }
}

impl Drop for MemoSession {
    fn drop(&mut self) {
        MEMO_TABLE.with(|table| {
            let mut table = table.borrow_mut();
            table.depth -= 1;
            if table.depth == 0 {
                table.entries.clear();
            }
        });
    }
}

/// Memo: Caches the result of a named rule per offset (packrat parsing)
///
/// Results, failures included, are stored under the rule name and cursor
/// and replayed unchanged when the same rule is asked again at the same
/// offset. Entries live until the outermost `Memo` call on the thread
/// returns, so one top-level parse shares a table and separate parses never
/// see each other's results.
#[derive(Clone)]
pub struct Memo<P> {
    name: &'static str,
    parser: P,
}

impl<P> Memo<P> {
    pub fn new(name: &'static str, parser: P) -> Self {
        Self { name, parser }
    }
}

impl<O, P> Parser<O> for Memo<P>
where
    P: Parser<O>,
    O: Clone + 'static,
{
    fn parse(&self, cursor: Cursor<'_>) -> ParseResult<O> {
        let _session = MemoSession::enter();
        let key = (
            self.name,
            cursor.source.as_ptr() as usize,
            cursor.source.len(),
            cursor.offset,
        );
        let cached = MEMO_TABLE.with(|table| {
            table
                .borrow()
                .entries
                .get(&key)
                .and_then(|entry| entry.downcast_ref::<ParseResult<O>>())
                .cloned()
        });
        if let Some(result) = cached {
            tracing::trace!(
                target: "parser::memo",
                rule = self.name,
                position = cursor.offset,
                "replaying cached result"
            );
            return result;
        }
        let result = self.parser.parse(cursor);
        MEMO_TABLE.with(|table| {
            table
                .borrow_mut()
                .entries
                .insert(key, Box::new(result.clone()));
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::super::prelude::*;
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::cell::Cell;

    #[test]
    fn test_constant() {
        let parse_asd = constant("asd");
        let parse_rfl = constant("rfl");
        let source = "asd xwz rfl ntr";

        assert_eq!(
            parse_asd.parse(Cursor::at(source, 0)),
            Ok((3, "asd".to_string()))
        );
        assert_eq!(
            parse_asd.parse(Cursor::at(source, 3)),
            Err(ParseError::local(
                "Could not read string \"asd\" at position 3",
                3
            ))
        );
        assert_eq!(
            parse_rfl.parse(Cursor::at(source, 8)),
            Ok((11, "rfl".to_string()))
        );

        // 途中のオフセットからも読める
        let parse_asd = constant("asdasd");
        assert_eq!(
            parse_asd.parse(Cursor::at("rs ajk asdasdfsjld", 7)),
            Ok((13, "asdasd".to_string()))
        );

        // 大文字小文字を区別する
        assert!(constant("and").parse(Cursor::new("AND")).is_err());
    }

    #[test]
    fn test_pattern() {
        let parse_email = pattern(r"([a-zA-Z0-9\.]+@)([a-zA-Z0-9]+)\.[a-zA-Z]+").unwrap();

        assert_eq!(
            parse_email.parse(Cursor::new("asd213.sda@ds.com Mohammed Ababou")),
            Ok((17, "asd213.sda@ds.com".to_string()))
        );
        assert_eq!(
            parse_email.parse(Cursor::at("Mohammed Ababou asd213.sda@ds.com", 16)),
            Ok((33, "asd213.sda@ds.com".to_string()))
        );
        assert!(parse_email
            .parse(Cursor::new("asd213.sdads.com Mohammed Ababou"))
            .is_err());
    }

    #[test]
    fn test_pattern_is_anchored() {
        let parser = pattern("[a-z]+").unwrap();
        assert_eq!(
            parser.parse(Cursor::new("AB cd")),
            Err(ParseError::local(
                "Could not read regular expression /[a-z]+/ at position 0",
                0
            ))
        );
        assert_eq!(parser.parse(Cursor::at("AB cd", 3)), Ok((5, "cd".to_string())));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(pattern("[a-z").is_err());
    }

    #[test]
    fn test_whitespace() {
        let source = "hi \t ds";
        assert_eq!(whitespace().parse(Cursor::at(source, 2)), Ok((5, true)));
        assert_eq!(whitespace().parse(Cursor::at(source, 0)), Ok((0, false)));
        assert_eq!(
            whitespace().parse(Cursor::new("thereisnowhitespacehere")),
            Ok((0, false))
        );
        assert_eq!(whitespace().parse(Cursor::new("")), Ok((0, false)));
    }

    #[test]
    fn test_succeed() {
        let parser = succeed(vec![1, 2, 3]);
        assert_eq!(parser.parse(Cursor::at("asdasd", 3)), Ok((3, vec![1, 2, 3])));
    }

    #[test]
    fn test_fail() {
        let parser = fail::<()>("some reason");
        assert_eq!(
            parser.parse(Cursor::at("asdasd", 3)),
            Err(ParseError::local("some reason", 3))
        );
    }

    #[test]
    fn test_concat() {
        let parse_important_words = concat(
            "important words",
            (
                constant("some"),
                whitespace(),
                constant("important"),
                whitespace(),
                constant("words"),
            ),
        );

        assert_eq!(
            parse_important_words.parse(Cursor::new("some important words")),
            Ok((
                20,
                (
                    "some".to_string(),
                    true,
                    "important".to_string(),
                    true,
                    "words".to_string()
                )
            ))
        );

        assert_eq!(
            parse_important_words.parse(Cursor::new("some nonimportant words")),
            Err(ParseError::local(
                "Could not read string \"important\" at position 5,\nwhen trying to parse \"important words\" at position 0",
                0
            ))
        );
    }

    #[test]
    fn test_concat_reports_sequence_start() {
        let parser = concat("pair", (constant("a"), constant("b")));
        let error = parser.parse(Cursor::at("xxab ac", 5)).unwrap_err();
        assert_eq!(error.position(), 5);
        assert_eq!(
            error.reason(),
            "Could not read string \"b\" at position 6,\nwhen trying to parse \"pair\" at position 5"
        );
    }

    #[test]
    fn test_concat_is_fail_fast() {
        let calls = Cell::new(0);
        let counting = from_fn(|cursor: Cursor<'_>| {
            calls.set(calls.get() + 1);
            Ok((cursor.offset, ()))
        });
        let parser = concat("fail fast", (constant("x"), fail::<()>("stop"), &counting));

        assert!(parser.parse(Cursor::new("x")).is_err());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_choice() {
        let parse_number = choice(vec![
            Box::new(constant("one")),
            Box::new(constant("two")),
            Box::new(constant("three")),
            Box::new(constant("four")),
        ]);

        assert_eq!(
            parse_number.parse(Cursor::new("three")),
            Ok((5, "three".to_string()))
        );

        let error = parse_number.parse(Cursor::new("five")).unwrap_err();
        assert_eq!(
            error.reason(),
            "All of the following parsers have failed:\n  * Could not read string \"one\" at position 0\n  * Could not read string \"two\" at position 0\n  * Could not read string \"three\" at position 0\n  * Could not read string \"four\" at position 0"
        );
        match error {
            ParseError::Aggregate {
                position,
                alternatives,
                ..
            } => {
                assert_eq!(position, 0);
                assert_eq!(alternatives.len(), 4);
            }
            other => panic!("expected aggregate failure, got {:?}", other),
        }
    }

    #[test]
    fn test_choice_prefers_earlier_alternative() {
        let parser = choice(vec![Box::new(constant("on")), Box::new(constant("one"))]);
        assert_eq!(parser.parse(Cursor::new("one")), Ok((2, "on".to_string())));
    }

    #[test]
    fn test_map() {
        let parser = map(constant("asdx"), |s: String| s.len());
        assert_eq!(parser.parse(Cursor::new("asdx asf")), Ok((4, 4)));

        let failing = map(constant("zzz"), |s: String| s.len());
        assert_eq!(
            failing.parse(Cursor::new("asdx asf")),
            Err(ParseError::local(
                "Could not read string \"zzz\" at position 0",
                0
            ))
        );
    }

    #[test]
    fn test_probe() {
        let always = probe(fail::<()>("I FAIL"));
        assert_eq!(always.parse(Cursor::new("")), Ok((0, None)));

        let hello = probe(constant("hello"));
        assert_eq!(
            hello.parse(Cursor::new("hello")),
            Ok((5, Some("hello".to_string())))
        );
        assert_eq!(hello.parse(Cursor::at("no hello", 0)), Ok((0, None)));
    }

    #[test]
    fn test_memo_replays_within_one_call() {
        let calls = Cell::new(0);
        let counting = from_fn(|cursor: Cursor<'_>| {
            calls.set(calls.get() + 1);
            constant("ab").parse(cursor)
        });
        let cached = memo("ab", &counting);
        let parser = memo(
            "outer",
            rule("ab then c or d", |steps| {
                if let Ok(value) = steps.run(concat("ab then c", (&cached, constant("c")))) {
                    return Ok(value);
                }
                steps.run(concat("ab then d", (&cached, constant("d"))))
            }),
        );

        assert_eq!(
            parser.parse(Cursor::new("abd")),
            Ok((3, ("ab".to_string(), "d".to_string())))
        );
        assert_eq!(calls.get(), 1);

        // 呼び出しごとに表は空になる
        assert!(parser.parse(Cursor::new("abx")).is_err());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_memo_replays_failures_unchanged() {
        let parser = memo("number", constant("1"));
        let source = "x";
        let outer = from_fn(|cursor: Cursor<'_>| {
            let first = parser.parse(cursor);
            let second = parser.parse(cursor);
            assert_eq!(first, second);
            first
        });
        assert_eq!(
            memo("outer", outer).parse(Cursor::new(source)),
            Err(ParseError::local(
                "Could not read string \"1\" at position 0",
                0
            ))
        );
    }

    proptest! {
        #[test]
        fn constant_matches_iff_slice_equals(
            source in "[ab ]{0,12}",
            token in "[ab]{1,3}",
            offset in 0usize..13,
        ) {
            let offset = offset.min(source.len());
            let result = constant(token.as_str()).parse(Cursor::at(&source, offset));
            let expected = source.get(offset..offset + token.len()) == Some(token.as_str());
            prop_assert_eq!(result.is_ok(), expected);
            if let Ok((next, value)) = result {
                prop_assert_eq!(next, offset + token.len());
                prop_assert_eq!(value, token);
            }
        }

        #[test]
        fn whitespace_never_fails(source in "\\PC{0,20}", offset in 0usize..24) {
            let offset = offset.min(source.len());
            let result = whitespace().parse(Cursor::at(&source, offset));
            prop_assert!(result.is_ok());
            if let Ok((next, _)) = result {
                prop_assert!(next >= offset);
            }
        }

        #[test]
        fn choice_returns_first_matching_alternative(source in "(one|two|three)[a-z ]{0,5}") {
            let parser = choice(vec![
                Box::new(map(constant("t"), |_| 0)),
                Box::new(map(constant("one"), |_| 1)),
                Box::new(map(constant("two"), |_| 2)),
                Box::new(map(constant("three"), |_| 3)),
            ]);
            let (_, chosen) = parser.parse(Cursor::new(&source)).unwrap();
            let expected = if source.starts_with('t') { 0 } else { 1 };
            prop_assert_eq!(chosen, expected);
        }
    }
}
