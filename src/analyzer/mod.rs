//! # Analyzer (Parser) System
//!
//! The Analyzer module turns formula source text into an Abstract Syntax Tree
//! using a Parser Combinator pattern.
//!
//! ## Core Components
//!
//! * **Parser Trait**: Defines the core parsing interface over a [`Cursor`]
//! * **Combinators**: Building blocks for creating complex parsers
//! * **Rule Builder**: Grammar rules written as a script of parse steps
//! * **Specialized Parsers**: The formula grammar itself
//!
//! ## Architecture Design
//!
//! 1. **Core Parser Interface**: The `Parser` trait defines the parsing contract
//! 2. **Combinators**: Small, composable parser units that can be combined
//! 3. **Rules**: Named, step-by-step parsers for the grammar's composite forms
//! 4. **Error Handling**: Failure traces that name every enclosing rule
//!
//! Every parser is a pure function of `(source, offset)`. The only state
//! touched while parsing is the per-thread memo table behind `Memo`, which
//! is emptied when the outermost memoized call returns.
//!
//! ## Usage Example
//!
//! ```
//! use fol_parser::analyzer::prelude::*;
//! use fol_parser::analyzer::{Cursor, Parser};
//!
//! let parser = concat("greeting", (constant("hello"), whitespace(), constant("world")));
//! let (next, (hello, _, world)) = parser.parse(Cursor::new("hello world")).unwrap();
//! assert_eq!(next, 11);
//! assert_eq!((hello.as_str(), world.as_str()), ("hello", "world"));
//! ```

pub mod combinators;
pub mod core;
pub mod parsers;
pub mod prelude;
pub mod rule;

pub use self::core::Cursor;
pub use self::core::ParseError;
pub use self::core::ParseResult;
pub use self::core::Parser;

pub use crate::ast;
