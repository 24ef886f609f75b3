//! JavaScript generation.
//!
//! Walks an analyzed tree and emits one JavaScript statement per line. The
//! generator trusts the analyzer: it reads the types attached to expression
//! nodes to pick the runtime form of indexing, length and division.

pub mod expr;
pub mod generator;
pub mod stmt;
