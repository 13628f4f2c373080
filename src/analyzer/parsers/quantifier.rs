//! Quantified formulas: `forall x, y. body` and `exist x. body`.
//!
//! A quantifier keyword must be followed by whitespace, then one or more
//! bound variables separated by commas, a `.` and the body. The body is
//! another quantification, a relation application or an operand
//! (constant, variable or parenthesized formula); connectives in the body
//! need parentheses.

use super::{
    super::{combinators::*, core::*, prelude::*},
    *,
};
use crate::ast::FormulaNode;

/// `forall x, y. body`
pub fn parse_universal_quantification() -> impl Parser<FormulaNode> {
    parse_quantification(
        "forall",
        "universal quantification",
        |bound_variables, expression| FormulaNode::UniversalQuantification {
            bound_variables,
            expression: Box::new(expression),
        },
    )
}

/// `exist x, y. body`
pub fn parse_existential_quantification() -> impl Parser<FormulaNode> {
    parse_quantification(
        "exist",
        "existential quantification",
        |bound_variables, expression| FormulaNode::ExistentialQuantification {
            bound_variables,
            expression: Box::new(expression),
        },
    )
}

/// Body of a quantification.
pub fn parse_quantifier_scope() -> Choice<FormulaNode> {
    choice(vec![
        Box::new(parse_existential_quantification()),
        Box::new(parse_universal_quantification()),
        Box::new(parse_relation_application()),
        Box::new(parse_subformula()),
    ])
}

fn parse_quantification<F>(
    keyword: &'static str,
    name: &'static str,
    build: F,
) -> impl Parser<FormulaNode>
where
    F: Fn(Vec<String>, FormulaNode) -> FormulaNode,
{
    rule(name, move |steps| {
        steps.run(constant(keyword))?;
        if !steps.run(whitespace())? {
            return Err(steps.raise(format!("Expected space after '{}' token", keyword)));
        }
        let bound_variables = steps.run(whitespace_join(parse_variable_symbol(), ",", false))?;
        steps.run(whitespace())?;
        steps.run(constant("."))?;
        steps.run(whitespace())?;
        // 本体は量化子自身を含むので実行時に組み立てる
        let expression = steps.run(parse_quantifier_scope())?;
        Ok(build(bound_variables, expression))
    })
}
