use thiserror::Error;

use crate::analyzer::ParseError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("{0}")]
    Syntax(#[from] ParseError),

    #[error("Unexpected input at position {position}: \"{remaining}\"")]
    TrailingInput { position: usize, remaining: String },

    #[error("Parentheses nested {depth} deep, the limit is {limit}")]
    NestingTooDeep { depth: usize, limit: usize },

    #[error("Config error: {0}")]
    Config(String),
}

pub type FormulaResult<T> = Result<T, FormulaError>;

// エラー作成用のヘルパー関数
impl FormulaError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        FormulaError::Config(message.into())
    }

    /// Offset in the source the failure refers to, if any.
    pub fn position(&self) -> Option<usize> {
        match self {
            FormulaError::Syntax(e) => Some(e.position()),
            FormulaError::TrailingInput { position, .. } => Some(*position),
            FormulaError::NestingTooDeep { .. } | FormulaError::Config(_) => None,
        }
    }
}
