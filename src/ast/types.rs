//! Type system definitions for the AST.
//!
//! This module defines the type system used in the language, including:
//!
//! - Primitive types (booleans, integers, floats, strings, void)
//! - Composite types (arrays, sets, dictionaries, functions)
//! - The `any` wildcard used by built-ins and empty literals
//! - Equivalence and assignability rules
//!
//! Types are attached to the AST as annotations by the parser and to
//! expression nodes by the analyzer. They are immutable once built.

use std::fmt::Display;

/// The built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Integer,
    Float,
    String,
    Void,
}

/// A function signature: parameter types plus a return type.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub parameters: Vec<Type>,
    pub return_type: Box<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(Primitive),
    Array(Box<Type>),
    Set(Box<Type>),
    Dict(Box<Type>, Box<Type>),
    Function(FunctionType),
    Any,
}

pub const BOOL: Type = Type::Primitive(Primitive::Boolean);
pub const INT: Type = Type::Primitive(Primitive::Integer);
pub const FLOAT: Type = Type::Primitive(Primitive::Float);
pub const STRING: Type = Type::Primitive(Primitive::String);
pub const VOID: Type = Type::Primitive(Primitive::Void);

impl Type {
    pub fn array(base: Type) -> Type {
        Type::Array(Box::new(base))
    }

    pub fn set(base: Type) -> Type {
        Type::Set(Box::new(base))
    }

    pub fn dict(key: Type, value: Type) -> Type {
        Type::Dict(Box::new(key), Box::new(value))
    }

    pub fn function(parameters: Vec<Type>, return_type: Type) -> Type {
        Type::Function(FunctionType {
            parameters,
            return_type: Box::new(return_type),
        })
    }

    /// The canonical display name, e.g. `[int]` or `<string, float>`.
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Structural equivalence. `any` is equivalent to every type, at any depth.
    pub fn is_equivalent(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Any, _) | (_, Type::Any) => true,
            (Type::Primitive(a), Type::Primitive(b)) => a == b,
            (Type::Array(a), Type::Array(b)) | (Type::Set(a), Type::Set(b)) => a.is_equivalent(b),
            (Type::Dict(ak, av), Type::Dict(bk, bv)) => ak.is_equivalent(bk) && av.is_equivalent(bv),
            (Type::Function(a), Type::Function(b)) => {
                a.parameters.len() == b.parameters.len()
                    && a.return_type.is_equivalent(&b.return_type)
                    && a
                        .parameters
                        .iter()
                        .zip(&b.parameters)
                        .all(|(a, b)| a.is_equivalent(b))
            }
            _ => false,
        }
    }

    /// Whether a value of type `self` may be stored where `target` is expected.
    ///
    /// Equivalence, except for functions: return types are covariant and
    /// parameter types contravariant.
    pub fn is_assignable(&self, target: &Type) -> bool {
        match (self, target) {
            (Type::Function(source), Type::Function(target)) => {
                source.parameters.len() == target.parameters.len()
                    && source.return_type.is_assignable(&target.return_type)
                    && target
                        .parameters
                        .iter()
                        .zip(&source.parameters)
                        .all(|(target, source)| target.is_assignable(source))
            }
            _ => self.is_equivalent(target),
        }
    }

    /// Merges two equivalent types, keeping the more specific side wherever
    /// one of them is `any`.
    pub fn unify(&self, other: &Type) -> Type {
        match (self, other) {
            (Type::Any, other) => other.clone(),
            (Type::Array(a), Type::Array(b)) => Type::array(a.unify(b)),
            (Type::Set(a), Type::Set(b)) => Type::set(a.unify(b)),
            (Type::Dict(ak, av), Type::Dict(bk, bv)) => Type::dict(ak.unify(bk), av.unify(bv)),
            _ => self.clone(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Primitive(Primitive::Integer | Primitive::Float))
    }

    pub fn is_numeric_or_string(&self) -> bool {
        matches!(
            self,
            Type::Primitive(Primitive::Integer | Primitive::Float | Primitive::String)
        )
    }

    pub fn is_boolean(&self) -> bool {
        *self == BOOL
    }

    pub fn is_integer(&self) -> bool {
        *self == INT
    }

    pub fn is_void(&self) -> bool {
        *self == VOID
    }

    /// Element type of an array or set.
    pub fn element_type(&self) -> Option<&Type> {
        match self {
            Type::Array(base) | Type::Set(base) => Some(base),
            _ => None,
        }
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Primitive::Boolean => "bool",
            Primitive::Integer => "int",
            Primitive::Float => "float",
            Primitive::String => "string",
            Primitive::Void => "void",
        };
        write!(f, "{}", name)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Primitive(primitive) => write!(f, "{}", primitive),
            Type::Array(base) => write!(f, "[{}]", base),
            Type::Set(base) => write!(f, "{{{}}}", base),
            Type::Dict(key, value) => write!(f, "<{}, {}>", key, value),
            Type::Function(function) => {
                let parameters = function
                    .parameters
                    .iter()
                    .map(Type::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "({}) -> {}", parameters, function.return_type)
            }
            Type::Any => write!(f, "any"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(Type::array(INT).name(), "[int]");
        assert_eq!(Type::set(STRING).name(), "{string}");
        assert_eq!(Type::dict(INT, STRING).name(), "<int, string>");
        assert_eq!(Type::function(vec![INT, FLOAT], BOOL).name(), "(int, float) -> bool");
        assert_eq!(Type::array(Type::set(Type::Any)).name(), "[{any}]");
    }

    #[test]
    fn test_equivalence_is_reflexive_and_symmetric() {
        let types = vec![
            BOOL,
            INT,
            FLOAT,
            STRING,
            VOID,
            Type::array(INT),
            Type::set(FLOAT),
            Type::dict(STRING, Type::array(INT)),
            Type::function(vec![INT], STRING),
        ];

        for a in &types {
            assert!(a.is_equivalent(a));
            for b in &types {
                assert_eq!(a.is_equivalent(b), b.is_equivalent(a));
            }
        }
    }

    #[test]
    fn test_different_constructors_are_not_equivalent() {
        assert!(!Type::array(INT).is_equivalent(&Type::set(INT)));
        assert!(!Type::dict(INT, INT).is_equivalent(&Type::array(INT)));
        assert!(!INT.is_equivalent(&FLOAT));
        assert!(!Type::array(INT).is_equivalent(&Type::array(FLOAT)));
    }

    #[test]
    fn test_any_is_equivalent_to_everything() {
        assert!(Type::Any.is_equivalent(&INT));
        assert!(Type::dict(STRING, INT).is_equivalent(&Type::Any));
        assert!(Type::array(Type::Any).is_equivalent(&Type::array(Type::dict(INT, INT))));
    }

    #[test]
    fn test_function_assignability_is_contravariant() {
        let takes_any = Type::function(vec![Type::array(Type::Any)], INT);
        let takes_ints = Type::function(vec![Type::array(INT)], INT);
        let returns_string = Type::function(vec![Type::array(INT)], STRING);

        assert!(takes_any.is_assignable(&takes_ints));
        assert!(takes_ints.is_assignable(&takes_ints));
        assert!(!returns_string.is_assignable(&takes_ints));
        assert!(!Type::function(vec![], INT).is_assignable(&takes_ints));
    }

    #[test]
    fn test_unify_prefers_specific_types() {
        assert_eq!(Type::array(Type::Any).unify(&Type::array(INT)), Type::array(INT));
        assert_eq!(Type::Any.unify(&Type::set(STRING)), Type::set(STRING));
        assert_eq!(INT.unify(&Type::Any), INT);
    }

    #[test]
    fn test_classification() {
        assert!(INT.is_numeric());
        assert!(FLOAT.is_numeric());
        assert!(!STRING.is_numeric());
        assert!(STRING.is_numeric_or_string());
        assert!(!Type::Any.is_numeric());
        assert!(BOOL.is_boolean());
        assert!(INT.is_integer());
        assert!(!FLOAT.is_integer());
        assert_eq!(Type::set(INT).element_type(), Some(&INT));
        assert_eq!(Type::dict(INT, INT).element_type(), None);
    }
}
