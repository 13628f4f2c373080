//! # fol-parser
//!
//! Parser for a small first-order logic formula language built on a
//! hand-written parser-combinator library.
//!
//! ```
//! use fol_parser::{FormulaNode, Term};
//!
//! let formula: FormulaNode = "forall x, y. R(x, y, false)".parse().unwrap();
//! assert_eq!(
//!     formula,
//!     FormulaNode::forall(
//!         vec!["x", "y"],
//!         FormulaNode::relation(
//!             "R",
//!             vec![Term::variable("x"), Term::variable("y"), Term::constant(false)],
//!         ),
//!     )
//! );
//! assert_eq!(formula.to_string(), "forall x, y. R(x, y, false)");
//! ```
//!
//! * [`analyzer`]: cursor, parser trait, combinators, rule builder and the
//!   formula grammar
//! * [`ast`]: the formula tree
//! * [`parser`]: whole-document parsing on top of the grammar
//! * [`config`]: options of the document-level parser

pub mod analyzer;
pub mod ast;
pub mod config;
pub mod error;
pub mod parser;

// Re-exports
pub use ast::*;
pub use config::ParserConfig;
pub use error::*;
pub use parser::{parse, FormulaParser};
