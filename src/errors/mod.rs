//! Error types and error handling for the compiler.
//!
//! This module defines the error type shared by every phase of the
//! pipeline. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for lexing, parsing and semantic analysis
//! - Error naming and suggestion tips used by the error renderer

pub mod errors;

#[cfg(test)]
mod tests;
