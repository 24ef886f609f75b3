/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The node arena, node kinds and the Program wrapper
/// - entities: Variables and functions created during analysis
/// - expressions: Operators and typed literals
/// - pretty: Numbered tree dump used by the command line driver
/// - types: The type system and its equivalence rules
pub mod ast;
pub mod entities;
pub mod expressions;
pub mod pretty;
pub mod types;
