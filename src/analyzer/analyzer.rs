//! Semantic analysis.
//!
//! The analyzer walks the tree once, resolving identifiers through a chain of
//! [`Context`] scopes and checking every node against the type rules. It
//! stops at the first error.
//!
//! Every `analyze_*` method returns the id that should take the visited
//! node's place in its parent. For most nodes that is the node itself; an
//! `Identifier` is replaced by the id of the `Variable` or `Function` entity
//! it resolves to.

use crate::{
    ast::{
        ast::{Ast, NodeId, NodeKind, Program},
        entities::{Function, Variable},
        types::Type,
    },
    config::LanguageConfig,
    errors::errors::{Error, ErrorImpl},
    Position, Span,
};

use super::{context::Context, stdlib::declare_stdlib};

pub struct Analyzer<'c> {
    pub(super) ast: Ast,
    pub(super) config: &'c LanguageConfig,
}

impl<'c> Analyzer<'c> {
    pub fn new(ast: Ast, config: &'c LanguageConfig) -> Self {
        Analyzer { ast, config }
    }

    /// Dispatches on the node kind.
    pub fn analyze(&mut self, id: NodeId, context: &mut Context<'_>) -> Result<NodeId, Error> {
        match self.ast.kind(id).clone() {
            NodeKind::Program { body } => {
                let body = self.analyze_body(body, context)?;
                self.ast.replace_kind(id, NodeKind::Program { body });
                Ok(id)
            }
            NodeKind::Block { body } => {
                let body = self.analyze_body(body, context)?;
                self.ast.replace_kind(id, NodeKind::Block { body });
                Ok(id)
            }
            NodeKind::Declaration {
                declared_type,
                target,
                source,
            } => self.analyze_declaration(id, declared_type, target, source, context),
            NodeKind::Assignment { target, source } => {
                self.analyze_assignment(id, target, source, context)
            }
            NodeKind::Increment { target } | NodeKind::Decrement { target } => {
                self.analyze_step(id, target, context)
            }
            NodeKind::FunctionDeclaration {
                return_type,
                name,
                params,
                body,
                ..
            } => self.analyze_function_declaration(id, return_type, name, params, body, context),
            NodeKind::Parameter {
                param_type, name, ..
            } => self.analyze_parameter(id, param_type, name, context),
            NodeKind::Return { value } => self.analyze_return(id, value, context),
            NodeKind::ShortReturn => self.analyze_short_return(id, context),
            NodeKind::Break => self.analyze_break(id, context),
            NodeKind::If {
                test,
                consequence,
                alternate,
            } => self.analyze_if(id, test, consequence, alternate, context),
            NodeKind::While { test, body } => self.analyze_while(id, test, body, context),
            NodeKind::For {
                declaration,
                test,
                step,
                body,
            } => self.analyze_for(id, declaration, test, step, body, context),
            NodeKind::Call { callee, args } => self.analyze_call(id, callee, args, context),
            NodeKind::Conditional {
                test,
                consequence,
                alternate,
            } => self.analyze_conditional(id, test, consequence, alternate, context),
            NodeKind::Binary { op, left, right } => {
                self.analyze_binary(id, op, left, right, context)
            }
            NodeKind::Unary { op, operand } => self.analyze_unary(id, op, operand, context),
            NodeKind::Identifier { name } => context.resolve(&name, &self.position(id)),
            NodeKind::Literal(literal) => {
                self.ast.set_type(id, literal.ty());
                Ok(id)
            }
            NodeKind::Array { elements } => self.analyze_array(id, elements, context),
            NodeKind::Set { elements } => self.analyze_set(id, elements, context),
            NodeKind::Dict { entries } => self.analyze_dict(id, entries, context),
            NodeKind::KeyValue { key, value } => {
                self.analyze_key_value(id, key, value, context)?;
                Ok(id)
            }
            NodeKind::Index { collection, index } => {
                self.analyze_index(id, collection, index, context)
            }
            NodeKind::Property { object, property } => {
                self.analyze_property(id, object, property, context)
            }
            NodeKind::ListComprehension {
                element,
                binding,
                collection,
                condition,
                ..
            } => self.analyze_comprehension(id, element, binding, collection, condition, context),
            // Entities are already resolved
            NodeKind::Variable(_) | NodeKind::Function(_) => Ok(id),
        }
    }

    pub(super) fn analyze_body(
        &mut self,
        body: Vec<NodeId>,
        context: &mut Context<'_>,
    ) -> Result<Vec<NodeId>, Error> {
        body.into_iter()
            .map(|stmt| self.analyze(stmt, context))
            .collect()
    }

    /// The type the analyzer assigned to `id`.
    pub(super) fn type_of(&self, id: NodeId) -> Type {
        self.ast.ty(id).cloned().unwrap_or(Type::Any)
    }

    pub(super) fn position(&self, id: NodeId) -> Position {
        self.ast.span(id).start.clone()
    }

    pub(super) fn span(&self, id: NodeId) -> Span {
        self.ast.span(id).clone()
    }

    pub(super) fn mismatch(&self, expected: &str, received: &Type, at: NodeId) -> Error {
        Error::new(
            ErrorImpl::TypeMismatch {
                expected: expected.to_string(),
                received: received.name(),
            },
            self.position(at),
        )
    }

    /// Checks that the type of `id` belongs to a class such as "numeric".
    pub(super) fn require(
        &self,
        id: NodeId,
        expected: &str,
        accepts: fn(&Type) -> bool,
    ) -> Result<Type, Error> {
        let ty = self.type_of(id);
        if accepts(&ty) {
            Ok(ty)
        } else {
            Err(self.mismatch(expected, &ty, id))
        }
    }

    /// Checks that `right` has a type equivalent to `left`'s.
    pub(super) fn require_same(&self, left: NodeId, right: NodeId) -> Result<Type, Error> {
        let left_type = self.type_of(left);
        let right_type = self.type_of(right);
        if left_type.is_equivalent(&right_type) {
            Ok(left_type.unify(&right_type))
        } else {
            Err(self.mismatch(&left_type.name(), &right_type, right))
        }
    }

    /// Checks that the value `source` may be stored where `target` is
    /// expected, then pins any empty literal in `source` to `target`.
    pub(super) fn check_assignable(&mut self, source: NodeId, target: &Type) -> Result<(), Error> {
        let source_type = self.type_of(source);
        if !source_type.is_assignable(target) {
            return Err(self.mismatch(&target.name(), &source_type, source));
        }

        self.reconcile(source, target)
    }

    /// Pushes `target` down into `source`: empty literals take the shape it
    /// asks for, and composite literals, ternary branches and indexed
    /// literals pass the matching component type on to their parts.
    fn reconcile(&mut self, source: NodeId, target: &Type) -> Result<(), Error> {
        let kind = self.ast.kind(source).clone();

        match (&kind, target) {
            (
                NodeKind::Conditional {
                    consequence,
                    alternate,
                    ..
                },
                _,
            ) => {
                self.reconcile(*consequence, target)?;
                self.reconcile(*alternate, target)?;
            }
            (NodeKind::Array { elements }, Type::Array(base))
            | (NodeKind::Set { elements }, Type::Set(base)) => {
                for element in elements {
                    self.reconcile(*element, base)?;
                }
            }
            (NodeKind::Dict { entries }, Type::Dict(key_type, value_type)) => {
                for entry in entries {
                    if let NodeKind::KeyValue { key, value } = self.ast.kind(*entry).clone() {
                        self.reconcile(key, key_type)?;
                        self.reconcile(value, value_type)?;
                    }
                }
            }
            // `{}` is also the empty set
            (NodeKind::Dict { entries }, Type::Set(_)) if entries.is_empty() => {}
            (NodeKind::Index { collection, .. }, _) => {
                let expected = match self.type_of(*collection) {
                    Type::Array(_) => Type::array(target.clone()),
                    Type::Set(_) => Type::set(target.clone()),
                    Type::Dict(key, _) => Type::dict(*key, target.clone()),
                    _ => return Ok(()),
                };
                self.reconcile(*collection, &expected)?;
            }
            _ if kind.is_empty_literal() => {
                if *target == Type::Any {
                    return Ok(());
                }
                return Err(self.mismatch(&target.name(), &self.type_of(source), source));
            }
            _ => return Ok(()),
        }

        let ty = target.unify(&self.type_of(source));
        self.ast.set_type(source, ty);
        Ok(())
    }

    /// Creates a `Variable` entity node typed with its declared type.
    pub(super) fn new_variable(
        &mut self,
        name: &str,
        var_type: Type,
        read_only: bool,
        span: Span,
    ) -> NodeId {
        let id = self.ast.push(
            NodeKind::Variable(Variable {
                name: name.to_string(),
                var_type: var_type.clone(),
                read_only,
            }),
            span,
        );
        self.ast.set_type(id, var_type);
        id
    }

    pub(super) fn function_entity(&self, id: NodeId) -> Option<&Function> {
        match self.ast.kind(id) {
            NodeKind::Function(function) => Some(function),
            _ => None,
        }
    }
}

/// Analyzes `program` with the canonical standard library spellings.
pub fn analyze(program: Program) -> Result<Program, Error> {
    analyze_with_config(program, &LanguageConfig::default())
}

/// Analyzes `program`, returning it with every expression typed and every
/// identifier replaced by the entity it refers to.
pub fn analyze_with_config(program: Program, config: &LanguageConfig) -> Result<Program, Error> {
    let Program { ast, root } = program;
    let span = ast.span(root).clone();

    let mut analyzer = Analyzer::new(ast, config);
    let mut context = Context::root();
    declare_stdlib(&mut analyzer.ast, &mut context, config, &span)?;

    let root = analyzer.analyze(root, &mut context)?;
    log::debug!(
        "analyzed {} ({} nodes)",
        span.start.1,
        analyzer.ast.len()
    );

    Ok(Program {
        ast: analyzer.ast,
        root,
    })
}
