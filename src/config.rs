use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::{FormulaError, FormulaResult};

/// Options of the document-level parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Accept input left over after the formula instead of failing.
    #[serde(default)]
    pub allow_trailing_input: bool,

    /// Skip whitespace before and after the formula.
    #[serde(default = "default_true")]
    pub allow_surrounding_whitespace: bool,

    /// Deepest parenthesis nesting accepted before parsing starts.
    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            allow_trailing_input: false,
            allow_surrounding_whitespace: default_true(),
            max_nesting_depth: default_max_nesting_depth(),
        }
    }
}

impl ParserConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> FormulaResult<Self> {
        let file = File::open(path)
            .map_err(|e| FormulaError::config(format!("Failed to open config file: {}", e)))?;
        let reader = BufReader::new(file);
        let config = serde_json::from_reader(reader)
            .map_err(|e| FormulaError::config(format!("Failed to parse config file: {}", e)))?;
        Ok(config)
    }

    pub fn from_json(s: &str) -> FormulaResult<Self> {
        let config = serde_json::from_str(s)
            .map_err(|e| FormulaError::config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }
}

fn default_true() -> bool {
    true
}

// 失敗時の理由文字列は括弧の深さに対して指数的に伸びる
fn default_max_nesting_depth() -> usize {
    6
}
