use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Formula AST Definition
///
/// A parsed first-order formula. The tree is built bottom-up by a single
/// parse call and is never mutated afterwards; each node owns its children.
///
/// # Variants
/// - `Constant`: `T`, `1`, `true` or `F`, `0`, `false`
/// - `Variable`: lowercase identifier
/// - `Conjunction` / `Disjunction`: two or more operands joined by `and` / `or`
/// - `Implication`: `precedent => antecedent`
/// - `Equivalence`: `lhs <=> rhs`
/// - `RelationApplication`: uppercase symbol applied to constants and variables
/// - `UniversalQuantification` / `ExistentialQuantification`: `forall` / `exist`
///   followed by bound variables, a dot and the quantified expression
///
/// # Serialization
/// Nodes serialize with an internal `type` tag and camelCase field names:
/// ```text
/// { "type": "relation_application", "relationSymbol": "R",
///   "args": [{ "type": "variable", "name": "x" }] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormulaNode {
    Constant {
        value: bool,
    },
    Variable {
        name: String,
    },
    Conjunction {
        children: Vec<FormulaNode>,
    },
    Disjunction {
        children: Vec<FormulaNode>,
    },
    Implication {
        precedent: Box<FormulaNode>,
        antecedent: Box<FormulaNode>,
    },
    Equivalence {
        lhs: Box<FormulaNode>,
        rhs: Box<FormulaNode>,
    },
    #[serde(rename_all = "camelCase")]
    RelationApplication {
        relation_symbol: String,
        args: Vec<Term>,
    },
    #[serde(rename_all = "camelCase")]
    UniversalQuantification {
        bound_variables: Vec<String>,
        expression: Box<FormulaNode>,
    },
    #[serde(rename_all = "camelCase")]
    ExistentialQuantification {
        bound_variables: Vec<String>,
        expression: Box<FormulaNode>,
    },
}

/// Argument of a relation application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Term {
    Constant { value: bool },
    Variable { name: String },
}

/// Node type tag, spelled the way the serialized `type` field spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum FormulaKind {
    Constant,
    Variable,
    Conjunction,
    Disjunction,
    Implication,
    Equivalence,
    RelationApplication,
    UniversalQuantification,
    ExistentialQuantification,
}

impl FormulaNode {
    pub fn constant(value: bool) -> Self {
        FormulaNode::Constant { value }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        FormulaNode::Variable { name: name.into() }
    }

    pub fn conjunction(children: Vec<FormulaNode>) -> Self {
        FormulaNode::Conjunction { children }
    }

    pub fn disjunction(children: Vec<FormulaNode>) -> Self {
        FormulaNode::Disjunction { children }
    }

    pub fn implication(precedent: FormulaNode, antecedent: FormulaNode) -> Self {
        FormulaNode::Implication {
            precedent: Box::new(precedent),
            antecedent: Box::new(antecedent),
        }
    }

    pub fn equivalence(lhs: FormulaNode, rhs: FormulaNode) -> Self {
        FormulaNode::Equivalence {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn relation(relation_symbol: impl Into<String>, args: Vec<Term>) -> Self {
        FormulaNode::RelationApplication {
            relation_symbol: relation_symbol.into(),
            args,
        }
    }

    pub fn forall<S: Into<String>>(bound_variables: Vec<S>, expression: FormulaNode) -> Self {
        FormulaNode::UniversalQuantification {
            bound_variables: bound_variables.into_iter().map(Into::into).collect(),
            expression: Box::new(expression),
        }
    }

    pub fn exists<S: Into<String>>(bound_variables: Vec<S>, expression: FormulaNode) -> Self {
        FormulaNode::ExistentialQuantification {
            bound_variables: bound_variables.into_iter().map(Into::into).collect(),
            expression: Box::new(expression),
        }
    }

    pub fn kind(&self) -> FormulaKind {
        match self {
            FormulaNode::Constant { .. } => FormulaKind::Constant,
            FormulaNode::Variable { .. } => FormulaKind::Variable,
            FormulaNode::Conjunction { .. } => FormulaKind::Conjunction,
            FormulaNode::Disjunction { .. } => FormulaKind::Disjunction,
            FormulaNode::Implication { .. } => FormulaKind::Implication,
            FormulaNode::Equivalence { .. } => FormulaKind::Equivalence,
            FormulaNode::RelationApplication { .. } => FormulaKind::RelationApplication,
            FormulaNode::UniversalQuantification { .. } => FormulaKind::UniversalQuantification,
            FormulaNode::ExistentialQuantification { .. } => {
                FormulaKind::ExistentialQuantification
            }
        }
    }

    /// Constants and variables; the only nodes written without parentheses
    /// in operand position.
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            FormulaNode::Constant { .. } | FormulaNode::Variable { .. }
        )
    }

    /// Direct sub-formulas, left to right. Relation arguments are terms, not
    /// sub-formulas, and are not included.
    pub fn children(&self) -> Vec<&FormulaNode> {
        match self {
            FormulaNode::Constant { .. }
            | FormulaNode::Variable { .. }
            | FormulaNode::RelationApplication { .. } => vec![],
            FormulaNode::Conjunction { children } | FormulaNode::Disjunction { children } => {
                children.iter().collect()
            }
            FormulaNode::Implication {
                precedent,
                antecedent,
            } => vec![precedent.as_ref(), antecedent.as_ref()],
            FormulaNode::Equivalence { lhs, rhs } => vec![lhs.as_ref(), rhs.as_ref()],
            FormulaNode::UniversalQuantification { expression, .. }
            | FormulaNode::ExistentialQuantification { expression, .. } => {
                vec![expression.as_ref()]
            }
        }
    }

    /// Every relation application as `(symbol, argument count)`, in order of
    /// appearance.
    ///
    /// Symbols are not interpreted here; checking them against declared
    /// relations and arities is left to the caller.
    pub fn relation_symbols(&self) -> Vec<(&str, usize)> {
        let mut found = Vec::new();
        self.collect_relations(&mut found);
        found
    }

    fn collect_relations<'a>(&'a self, found: &mut Vec<(&'a str, usize)>) {
        if let FormulaNode::RelationApplication {
            relation_symbol,
            args,
        } = self
        {
            found.push((relation_symbol.as_str(), args.len()));
        }
        for child in self.children() {
            child.collect_relations(found);
        }
    }

    /// Every variable name that occurs in the formula, bound or not.
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut found = BTreeSet::new();
        self.collect_variables(&mut found);
        found
    }

    fn collect_variables<'a>(&'a self, found: &mut BTreeSet<&'a str>) {
        match self {
            FormulaNode::Variable { name } => {
                found.insert(name.as_str());
            }
            FormulaNode::RelationApplication { args, .. } => {
                found.extend(args.iter().filter_map(Term::variable_name));
            }
            FormulaNode::UniversalQuantification {
                bound_variables, ..
            }
            | FormulaNode::ExistentialQuantification {
                bound_variables, ..
            } => {
                found.extend(bound_variables.iter().map(String::as_str));
            }
            _ => {}
        }
        for child in self.children() {
            child.collect_variables(found);
        }
    }
}

impl Term {
    pub fn constant(value: bool) -> Self {
        Term::Constant { value }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Term::Variable { name: name.into() }
    }

    pub fn variable_name(&self) -> Option<&str> {
        match self {
            Term::Variable { name } => Some(name),
            Term::Constant { .. } => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Constant { value } => write!(f, "{}", value),
            Term::Variable { name } => f.write_str(name),
        }
    }
}

/// Operand of a connective: atoms stay bare, everything else is parenthesized.
struct Operand<'a>(&'a FormulaNode);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_atom() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "({})", self.0)
        }
    }
}

/// Body of a quantifier: connectives are parenthesized.
struct Scope<'a>(&'a FormulaNode);

impl fmt::Display for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            FormulaNode::Conjunction { .. }
            | FormulaNode::Disjunction { .. }
            | FormulaNode::Implication { .. }
            | FormulaNode::Equivalence { .. } => write!(f, "({})", self.0),
            other => write!(f, "{}", other),
        }
    }
}

fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter,
    items: impl IntoIterator<Item = T>,
    separator: &str,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for FormulaNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormulaNode::Constant { value } => write!(f, "{}", value),
            FormulaNode::Variable { name } => f.write_str(name),
            FormulaNode::Conjunction { children } => {
                write_joined(f, children.iter().map(Operand), " and ")
            }
            FormulaNode::Disjunction { children } => {
                write_joined(f, children.iter().map(Operand), " or ")
            }
            FormulaNode::Implication {
                precedent,
                antecedent,
            } => write!(f, "{} => {}", Operand(precedent), Operand(antecedent)),
            FormulaNode::Equivalence { lhs, rhs } => {
                write!(f, "{} <=> {}", Operand(lhs), Operand(rhs))
            }
            FormulaNode::RelationApplication {
                relation_symbol,
                args,
            } => {
                write!(f, "{}(", relation_symbol)?;
                write_joined(f, args, ", ")?;
                f.write_str(")")
            }
            FormulaNode::UniversalQuantification {
                bound_variables,
                expression,
            } => {
                write!(f, "forall ")?;
                write_joined(f, bound_variables, ", ")?;
                write!(f, ". {}", Scope(expression))
            }
            FormulaNode::ExistentialQuantification {
                bound_variables,
                expression,
            } => {
                write!(f, "exist ")?;
                write_joined(f, bound_variables, ", ")?;
                write!(f, ". {}", Scope(expression))
            }
        }
    }
}
