pub mod common;
pub use common::*;

pub mod formula;
pub mod quantifier;
pub use formula::*;
pub use quantifier::*;
