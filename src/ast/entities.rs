//! Declaration entities.
//!
//! Entities are created by the analyzer, never by the parser. Each one is
//! stored as its own node in the arena and every identifier that resolves to
//! it is replaced by that node's id.

use super::types::{FunctionType, Type, INT, STRING, VOID};

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub var_type: Type,
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub fn_type: FunctionType,
    /// Set for standard library functions, which have no declaration node.
    pub builtin: Option<Builtin>,
}

impl Function {
    pub fn ty(&self) -> Type {
        Type::Function(self.fn_type.clone())
    }
}

/// Functions bound in the root scope before analysis starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Print,
    Length,
}

impl Builtin {
    pub const ALL: [Builtin; 2] = [Builtin::Print, Builtin::Length];

    /// Canonical configuration key of the builtin.
    pub fn key(&self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Length => "length",
        }
    }

    pub fn fn_type(&self) -> FunctionType {
        match self {
            Builtin::Print => FunctionType {
                parameters: vec![STRING],
                return_type: Box::new(VOID),
            },
            Builtin::Length => FunctionType {
                parameters: vec![Type::array(Type::Any)],
                return_type: Box::new(INT),
            },
        }
    }
}
