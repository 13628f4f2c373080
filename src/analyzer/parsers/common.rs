use super::super::{combinators::*, core::*, prelude::*};
use crate::ast::{FormulaNode, Term};
use lazy_static::lazy_static;

lazy_static! {
    static ref VARIABLE_SYMBOL: Pattern =
        Pattern::new("[a-z]+").expect("variable symbol pattern is valid");
    static ref RELATION_SYMBOL: Pattern =
        Pattern::new("[A-Z]+").expect("relation symbol pattern is valid");
}

// 基本的なパーサー
pub fn parse_variable_symbol() -> impl Parser<String> {
    &*VARIABLE_SYMBOL
}

pub fn parse_relation_symbol() -> impl Parser<String> {
    &*RELATION_SYMBOL
}

fn parse_truth() -> impl Parser<String> {
    choice(vec![
        Box::new(constant("T")),
        Box::new(constant("1")),
        Box::new(constant("true")),
    ])
}

fn parse_falsity() -> impl Parser<String> {
    choice(vec![
        Box::new(constant("F")),
        Box::new(constant("0")),
        Box::new(constant("false")),
    ])
}

fn parse_truth_value() -> impl Parser<bool> {
    choice(vec![
        Box::new(map(parse_truth(), |_| true)),
        Box::new(map(parse_falsity(), |_| false)),
    ])
}

/// `T`, `1`, `true` or `F`, `0`, `false`.
pub fn parse_constant() -> impl Parser<FormulaNode> {
    map(parse_truth_value(), FormulaNode::constant)
}

/// One or more lowercase letters.
pub fn parse_variable() -> impl Parser<FormulaNode> {
    map(parse_variable_symbol(), |name| FormulaNode::Variable { name })
}

/// Relation argument: a constant or a variable.
pub fn parse_term() -> impl Parser<Term> {
    choice(vec![
        Box::new(map(parse_truth_value(), Term::constant)),
        Box::new(map(parse_variable_symbol(), |name| Term::Variable { name })),
    ])
}

/// One or more `item`s separated by `separator`, with optional whitespace
/// around each separator.
///
/// The join stops before the first separator that is not followed by an
/// item, leaving trailing whitespace unconsumed. With `at_least_two`, a
/// single item fails with `more than one value required`.
pub fn whitespace_join<P, T>(item: P, separator: &str, at_least_two: bool) -> impl Parser<Vec<T>>
where
    P: Parser<T>,
{
    let separator = separator.to_string();
    rule(
        format!("whitespace join of \"{}\"", separator),
        move |steps| {
            let mut items = vec![steps.run(&item)?];
            loop {
                let next_item = map(
                    concat(
                        "next item",
                        (
                            whitespace(),
                            constant(separator.as_str()),
                            whitespace(),
                            &item,
                        ),
                    ),
                    |(_, _, _, value)| value,
                );
                match steps.run(next_item) {
                    Ok(value) => items.push(value),
                    Err(e) => {
                        tracing::trace!(
                            target: "parser::whitespace_join",
                            error = %e,
                            position = steps.position(),
                            items_collected = items.len(),
                            "join stopped at first missing item"
                        );
                        break;
                    }
                }
            }
            if at_least_two && items.len() == 1 {
                return Err(steps.raise("more than one value required"));
            }
            Ok(items)
        },
    )
}
