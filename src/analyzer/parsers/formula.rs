use super::{
    super::{combinators::*, core::*, prelude::*},
    *,
};
use crate::ast::FormulaNode;

thread_local! {
    // 文法は一度だけ組み立て、再帰はこの共有パーサーを通す
    static FORMULA: Memo<Choice<FormulaNode>> = memo("formula", formula_alternatives());
}

fn formula_alternatives() -> Choice<FormulaNode> {
    choice(vec![
        Box::new(parse_existential_quantification()),
        Box::new(parse_universal_quantification()),
        Box::new(parse_relation_application()),
        Box::new(parse_conjunction()),
        Box::new(parse_disjunction()),
        Box::new(parse_implication()),
        Box::new(parse_equivalence()),
        Box::new(parse_constant()),
        Box::new(parse_variable()),
    ])
}

/// Any formula.
///
/// Alternatives are tried in a fixed order and the first match wins:
/// existential quantification, universal quantification, relation
/// application, conjunction, disjunction, implication, equivalence,
/// constant, variable. The formula does not have to extend to the end of
/// the input.
///
/// Formulas and subformulas are memoized per offset for the duration of
/// one call, so nested parentheses are parsed once each.
pub fn parse_formula() -> impl Parser<FormulaNode> {
    from_fn(parse_formula_at)
}

/// Parses a formula starting at the cursor.
pub fn parse_formula_at(cursor: Cursor<'_>) -> ParseResult<FormulaNode> {
    FORMULA.with(|formula| formula.parse(cursor))
}

/// Operand of connectives: a constant, a variable or a parenthesized
/// formula.
///
/// Keeping operands this narrow is what stops the connective rules from
/// recursing into themselves without consuming input.
pub fn parse_subformula() -> impl Parser<FormulaNode> {
    memo(
        "subformula",
        rule("subformula", |steps| {
            if let Ok(constant) = steps.run(parse_constant()) {
                return Ok(constant);
            }
            if let Ok(variable) = steps.run(parse_variable()) {
                return Ok(variable);
            }
            steps.run(parse_parenthesized())
        }),
    )
}

fn parse_parenthesized() -> impl Parser<FormulaNode> {
    map(
        concat(
            "subformula",
            (
                constant("("),
                whitespace(),
                from_fn(parse_formula_at),
                whitespace(),
                constant(")"),
            ),
        ),
        |(_, _, formula, _, _)| formula,
    )
}

// 二項演算子 (=>, <=>)
pub fn parse_implication() -> impl Parser<FormulaNode> {
    map(
        concat(
            "implication",
            (
                parse_subformula(),
                whitespace(),
                constant("=>"),
                whitespace(),
                parse_subformula(),
            ),
        ),
        |(precedent, _, _, _, antecedent)| FormulaNode::implication(precedent, antecedent),
    )
}

pub fn parse_equivalence() -> impl Parser<FormulaNode> {
    map(
        concat(
            "equivalence",
            (
                parse_subformula(),
                whitespace(),
                constant("<=>"),
                whitespace(),
                parse_subformula(),
            ),
        ),
        |(lhs, _, _, _, rhs)| FormulaNode::equivalence(lhs, rhs),
    )
}

/// Two or more operands joined by `and`.
pub fn parse_conjunction() -> impl Parser<FormulaNode> {
    map(
        whitespace_join(parse_subformula(), "and", true),
        FormulaNode::conjunction,
    )
}

/// Two or more operands joined by `or`.
pub fn parse_disjunction() -> impl Parser<FormulaNode> {
    map(
        whitespace_join(parse_subformula(), "or", true),
        FormulaNode::disjunction,
    )
}

/// `R(x, y, false)`: an uppercase symbol applied to one or more constants
/// or variables.
///
/// The parentheses and at least one argument are required, so a nullary
/// application such as `R()` or a bare `R` is rejected.
pub fn parse_relation_application() -> impl Parser<FormulaNode> {
    rule("relation application", |steps| {
        let relation_symbol = steps.run(parse_relation_symbol())?;
        steps.run(constant("("))?;
        steps.run(whitespace())?;
        let args = steps.run(whitespace_join(parse_term(), ",", false))?;
        steps.run(whitespace())?;
        steps.run(constant(")"))?;
        Ok(FormulaNode::RelationApplication {
            relation_symbol,
            args,
        })
    })
}
