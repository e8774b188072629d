//! CLI command implementations.

pub mod evaluate;
pub mod run;
pub mod validate;
