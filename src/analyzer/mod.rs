//! Semantic analysis module.
//!
//! This module resolves identifiers and checks types over a parsed program:
//!
//! - `context`: the chain of lexical scopes used for name resolution
//! - `analyzer`: the tree walk and its shared helpers
//! - `stmt` / `expr`: the rules for each statement and expression kind
//! - `stdlib`: standard library functions bound in the root scope

pub mod analyzer;
pub mod context;
pub mod expr;
pub mod stdlib;
pub mod stmt;

#[cfg(test)]
mod tests;
