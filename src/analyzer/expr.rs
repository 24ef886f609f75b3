use crate::{
    ast::{
        ast::{NodeId, NodeKind},
        expressions::{BinaryOp, Literal, UnaryOp},
        types::{Type, BOOL, INT, STRING},
    },
    errors::errors::{Error, ErrorImpl},
};

use super::{
    analyzer::Analyzer,
    context::{Context, ContextOverrides},
};

/// A value known without running the program, used to reject duplicate set
/// elements and dictionary keys.
#[derive(Debug, Clone, PartialEq)]
enum StaticValue {
    Literal(Literal),
    Entity(NodeId),
}

/// Folds a negated numeric literal, so `-0.0` and `0.0` compare equal.
fn negate(literal: &Literal) -> Option<Literal> {
    match literal {
        Literal::Int(value) => value.checked_neg().map(Literal::Int),
        Literal::Float(value) => Some(Literal::Float(-value)),
        _ => None,
    }
}

impl<'c> Analyzer<'c> {
    pub(super) fn analyze_binary(
        &mut self,
        id: NodeId,
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        let left = self.analyze(left, context)?;
        let right = self.analyze(right, context)?;

        let ty = match op {
            BinaryOp::And | BinaryOp::Or => {
                self.require(left, "bool", Type::is_boolean)?;
                self.require(right, "bool", Type::is_boolean)?;
                BOOL
            }
            BinaryOp::Add => {
                self.require(left, "number or string", Type::is_numeric_or_string)?;
                self.require_same(left, right)?
            }
            BinaryOp::Subtract
            | BinaryOp::Multiply
            | BinaryOp::Divide
            | BinaryOp::Modulo
            | BinaryOp::Power => {
                self.require(left, "number", Type::is_numeric)?;
                self.require_same(left, right)?
            }
            BinaryOp::Less | BinaryOp::LessEquals | BinaryOp::Greater | BinaryOp::GreaterEquals => {
                self.require(left, "number or string", Type::is_numeric_or_string)?;
                self.require_same(left, right)?;
                BOOL
            }
            BinaryOp::Equals | BinaryOp::NotEquals => {
                self.require_same(left, right)?;
                BOOL
            }
        };

        self.ast.replace_kind(id, NodeKind::Binary { op, left, right });
        self.ast.set_type(id, ty);
        Ok(id)
    }

    pub(super) fn analyze_unary(
        &mut self,
        id: NodeId,
        op: UnaryOp,
        operand: NodeId,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        let operand = self.analyze(operand, context)?;

        let ty = match op {
            UnaryOp::Negate => self.require(operand, "number", Type::is_numeric)?,
            UnaryOp::Not => {
                self.require(operand, "bool", Type::is_boolean)?;
                BOOL
            }
        };

        self.ast.replace_kind(id, NodeKind::Unary { op, operand });
        self.ast.set_type(id, ty);
        Ok(id)
    }

    pub(super) fn analyze_conditional(
        &mut self,
        id: NodeId,
        test: NodeId,
        consequence: NodeId,
        alternate: NodeId,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        let test = self.analyze(test, context)?;
        self.require(test, "bool", Type::is_boolean)?;
        let consequence = self.analyze(consequence, context)?;
        let alternate = self.analyze(alternate, context)?;
        let ty = self.require_same(consequence, alternate)?;

        self.ast.replace_kind(
            id,
            NodeKind::Conditional {
                test,
                consequence,
                alternate,
            },
        );
        self.ast.set_type(id, ty);
        Ok(id)
    }

    pub(super) fn analyze_call(
        &mut self,
        id: NodeId,
        callee: NodeId,
        args: Vec<NodeId>,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        let callee = self.analyze(callee, context)?;
        let function = match self.type_of(callee) {
            Type::Function(function) => function,
            other => {
                return Err(Error::new(
                    ErrorImpl::NotCallable {
                        received: other.name(),
                    },
                    self.position(callee),
                ))
            }
        };

        let args = self.analyze_body(args, context)?;
        if args.len() != function.parameters.len() {
            return Err(Error::new(
                ErrorImpl::ArityMismatch {
                    expected: function.parameters.len(),
                    received: args.len(),
                },
                self.position(id),
            ));
        }
        for (arg, parameter) in args.iter().zip(&function.parameters) {
            self.check_assignable(*arg, parameter)?;
        }

        self.ast.replace_kind(id, NodeKind::Call { callee, args });
        self.ast.set_type(id, *function.return_type);
        Ok(id)
    }

    /// The single type shared by `ids`, `any` when there are none.
    fn common_type(&self, ids: &[NodeId]) -> Result<Type, Error> {
        let mut common = Type::Any;
        for id in ids {
            let ty = self.type_of(*id);
            if !common.is_equivalent(&ty) {
                return Err(self.mismatch(&common.name(), &ty, *id));
            }
            common = common.unify(&ty);
        }
        Ok(common)
    }

    fn static_value(&self, id: NodeId) -> Option<StaticValue> {
        match self.ast.kind(id) {
            NodeKind::Literal(literal) => Some(StaticValue::Literal(literal.clone())),
            NodeKind::Unary {
                op: UnaryOp::Negate,
                operand,
            } => match self.ast.kind(*operand) {
                NodeKind::Literal(literal) => negate(literal).map(StaticValue::Literal),
                _ => None,
            },
            NodeKind::Variable(_) | NodeKind::Function(_) => Some(StaticValue::Entity(id)),
            _ => None,
        }
    }

    fn describe_static(&self, value: &StaticValue) -> String {
        match value {
            StaticValue::Literal(literal) => literal.to_string(),
            StaticValue::Entity(id) => match self.ast.kind(*id) {
                NodeKind::Variable(variable) => variable.name.clone(),
                NodeKind::Function(function) => function.name.clone(),
                _ => id.to_string(),
            },
        }
    }

    fn require_distinct(&self, ids: &[NodeId]) -> Result<(), Error> {
        let mut seen: Vec<StaticValue> = vec![];

        for id in ids {
            let Some(value) = self.static_value(*id) else {
                continue;
            };
            if seen.contains(&value) {
                return Err(Error::new(
                    ErrorImpl::DuplicateElement {
                        element: self.describe_static(&value),
                    },
                    self.position(*id),
                ));
            }
            seen.push(value);
        }

        Ok(())
    }

    pub(super) fn analyze_array(
        &mut self,
        id: NodeId,
        elements: Vec<NodeId>,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        let elements = self.analyze_body(elements, context)?;
        let element_type = self.common_type(&elements)?;

        self.ast.replace_kind(id, NodeKind::Array { elements });
        self.ast.set_type(id, Type::array(element_type));
        Ok(id)
    }

    pub(super) fn analyze_set(
        &mut self,
        id: NodeId,
        elements: Vec<NodeId>,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        let elements = self.analyze_body(elements, context)?;
        let element_type = self.common_type(&elements)?;
        self.require_distinct(&elements)?;

        self.ast.replace_kind(id, NodeKind::Set { elements });
        self.ast.set_type(id, Type::set(element_type));
        Ok(id)
    }

    pub(super) fn analyze_key_value(
        &mut self,
        id: NodeId,
        key: NodeId,
        value: NodeId,
        context: &mut Context<'_>,
    ) -> Result<(NodeId, NodeId), Error> {
        let key = self.analyze(key, context)?;
        let value = self.analyze(value, context)?;

        self.ast.replace_kind(id, NodeKind::KeyValue { key, value });
        Ok((key, value))
    }

    pub(super) fn analyze_dict(
        &mut self,
        id: NodeId,
        entries: Vec<NodeId>,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        // `{}` could be a set or a dict until it meets a declared type
        if entries.is_empty() {
            self.ast.set_type(id, Type::Any);
            return Ok(id);
        }

        let mut keys = vec![];
        let mut values = vec![];
        for entry in &entries {
            let (key, value) = match self.ast.kind(*entry).clone() {
                NodeKind::KeyValue { key, value } => {
                    self.analyze_key_value(*entry, key, value, context)?
                }
                _ => continue,
            };
            keys.push(key);
            values.push(value);
        }

        let key_type = self.common_type(&keys)?;
        self.require_distinct(&keys)?;
        let value_type = self.common_type(&values)?;

        self.ast.set_type(id, Type::dict(key_type, value_type));
        Ok(id)
    }

    pub(super) fn analyze_index(
        &mut self,
        id: NodeId,
        collection: NodeId,
        index: NodeId,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        let collection = self.analyze(collection, context)?;
        let index = self.analyze(index, context)?;
        let index_type = self.type_of(index);

        let (expected, result) = match self.type_of(collection) {
            Type::Array(base) | Type::Set(base) => (INT, *base),
            Type::Dict(key, value) => (*key, *value),
            other => {
                return Err(Error::new(
                    ErrorImpl::NotIndexable {
                        received: other.name(),
                    },
                    self.position(collection),
                ))
            }
        };

        let matches = if expected == INT {
            index_type.is_integer()
        } else {
            index_type.is_equivalent(&expected)
        };
        if !matches {
            return Err(Error::new(
                ErrorImpl::IndexTypeMismatch {
                    expected: expected.name(),
                    received: index_type.name(),
                },
                self.position(index),
            ));
        }

        self.ast
            .replace_kind(id, NodeKind::Index { collection, index });
        self.ast.set_type(id, result);
        Ok(id)
    }

    pub(super) fn analyze_property(
        &mut self,
        id: NodeId,
        object: NodeId,
        property: String,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        let object = self.analyze(object, context)?;
        let object_type = self.type_of(object);

        let has_length = matches!(object_type, Type::Array(_) | Type::Set(_) | Type::Dict(..))
            || object_type == STRING;
        if property != self.config.spelling("length") || !has_length {
            return Err(Error::new(
                ErrorImpl::UnknownProperty {
                    property,
                    received: object_type.name(),
                },
                self.position(id),
            ));
        }

        self.ast.replace_kind(id, NodeKind::Property { object, property });
        self.ast.set_type(id, INT);
        Ok(id)
    }

    /// `[element for binding in collection if condition]`
    pub(super) fn analyze_comprehension(
        &mut self,
        id: NodeId,
        element: NodeId,
        binding: String,
        collection: NodeId,
        condition: Option<NodeId>,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        let collection = self.analyze(collection, context)?;
        let collection_type = self.type_of(collection);
        let element_type = match collection_type.element_type() {
            Some(element_type) => element_type.clone(),
            None => return Err(self.mismatch("array or set", &collection_type, collection)),
        };

        let mut child = context.child(ContextOverrides::default());
        let span = self.span(id);
        let variable = self.new_variable(&binding, element_type, true, span);
        child.declare(&binding, variable, &self.position(id))?;

        let element = self.analyze(element, &mut child)?;
        let condition = match condition {
            Some(condition) => {
                let condition = self.analyze(condition, &mut child)?;
                self.require(condition, "bool", Type::is_boolean)?;
                Some(condition)
            }
            None => None,
        };
        let ty = Type::array(self.type_of(element));

        self.ast.replace_kind(
            id,
            NodeKind::ListComprehension {
                element,
                binding,
                collection,
                condition,
                variable: Some(variable),
            },
        );
        self.ast.set_type(id, ty);
        Ok(id)
    }
}
