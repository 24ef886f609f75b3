use crate::{
    ast::{
        ast::{NodeId, NodeKind},
        entities::Function,
        types::{FunctionType, Type},
    },
    errors::errors::{Error, ErrorImpl},
};

use super::{
    analyzer::Analyzer,
    context::{Context, ContextOverrides},
};

impl<'c> Analyzer<'c> {
    fn identifier_name(&self, id: NodeId) -> String {
        match self.ast.kind(id) {
            NodeKind::Identifier { name } => name.clone(),
            NodeKind::Variable(variable) => variable.name.clone(),
            NodeKind::Function(function) => function.name.clone(),
            _ => String::new(),
        }
    }

    fn void_variable(&self, name: &str, at: NodeId) -> Error {
        Error::new(
            ErrorImpl::VoidVariable {
                identifier: name.to_string(),
            },
            self.position(at),
        )
    }

    /// Fails unless `target` is a variable that may be written.
    fn ensure_writable(&self, target: NodeId) -> Result<(), Error> {
        let read_only = match self.ast.kind(target) {
            NodeKind::Variable(variable) => variable.read_only,
            _ => true,
        };

        if read_only {
            return Err(Error::new(
                ErrorImpl::ReadOnlyAssignment {
                    identifier: self.identifier_name(target),
                },
                self.position(target),
            ));
        }
        Ok(())
    }

    pub(super) fn analyze_declaration(
        &mut self,
        id: NodeId,
        declared_type: Type,
        target: NodeId,
        source: NodeId,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        let name = self.identifier_name(target);
        if declared_type.is_void() {
            return Err(self.void_variable(&name, target));
        }

        // The initializer cannot see the variable it initializes
        let source = self.analyze(source, context)?;

        let span = self.span(target);
        let variable = self.new_variable(&name, declared_type.clone(), false, span);
        context.declare(&name, variable, &self.position(target))?;

        self.ast.replace_kind(
            id,
            NodeKind::Declaration {
                declared_type: declared_type.clone(),
                target: variable,
                source,
            },
        );
        self.check_assignable(source, &declared_type)?;
        Ok(id)
    }

    pub(super) fn analyze_assignment(
        &mut self,
        id: NodeId,
        target: NodeId,
        source: NodeId,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        let source = self.analyze(source, context)?;
        let target = self.analyze(target, context)?;
        self.ensure_writable(target)?;

        let target_type = self.type_of(target);
        self.check_assignable(source, &target_type)?;

        self.ast
            .replace_kind(id, NodeKind::Assignment { target, source });
        Ok(id)
    }

    /// Increment and decrement.
    pub(super) fn analyze_step(
        &mut self,
        id: NodeId,
        target: NodeId,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        let target = self.analyze(target, context)?;
        self.ensure_writable(target)?;
        self.require(target, "int", Type::is_integer)?;

        let kind = match self.ast.kind(id) {
            NodeKind::Decrement { .. } => NodeKind::Decrement { target },
            _ => NodeKind::Increment { target },
        };
        self.ast.replace_kind(id, kind);
        Ok(id)
    }

    pub(super) fn analyze_function_declaration(
        &mut self,
        id: NodeId,
        return_type: Type,
        name: String,
        params: Vec<NodeId>,
        body: NodeId,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        let parameters = params
            .iter()
            .map(|param| match self.ast.kind(*param) {
                NodeKind::Parameter { param_type, .. } => param_type.clone(),
                _ => Type::Any,
            })
            .collect();

        let function = Function {
            name: name.clone(),
            fn_type: FunctionType {
                parameters,
                return_type: Box::new(return_type.clone()),
            },
            builtin: None,
        };
        let ty = function.ty();
        let span = self.span(id);
        let function = self.ast.push(NodeKind::Function(function), span);
        self.ast.set_type(function, ty);

        let overrides = ContextOverrides {
            inside_loop: Some(false),
            function: Some(function),
        };

        log::trace!("entering function scope of {}", name);
        let (params, locals) = {
            let mut child = context.child(overrides);
            let params = self.analyze_body(params, &mut child)?;
            (params, child.into_locals())
        };

        // Bound after the parameters, so a parameter may share its name
        context.declare(&name, function, &self.position(id))?;

        let body = {
            let mut child = context.reopen(overrides, locals);
            self.analyze(body, &mut child)?
        };
        log::trace!("leaving function scope of {}", name);

        self.ast.replace_kind(
            id,
            NodeKind::FunctionDeclaration {
                return_type,
                name,
                params,
                body,
                function: Some(function),
            },
        );
        Ok(id)
    }

    pub(super) fn analyze_parameter(
        &mut self,
        id: NodeId,
        param_type: Type,
        name: String,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        if param_type.is_void() {
            return Err(self.void_variable(&name, id));
        }

        let span = self.span(id);
        let variable = self.new_variable(&name, param_type.clone(), false, span);
        context.declare(&name, variable, &self.position(id))?;

        self.ast.replace_kind(
            id,
            NodeKind::Parameter {
                param_type,
                name,
                variable: Some(variable),
            },
        );
        Ok(id)
    }

    fn illegal_return(&self, message: &str, at: NodeId) -> Error {
        Error::new(
            ErrorImpl::IllegalReturn {
                message: message.to_string(),
            },
            self.position(at),
        )
    }

    fn enclosing_return_type(&self, id: NodeId, context: &Context<'_>) -> Result<Type, Error> {
        context
            .function()
            .and_then(|function| self.function_entity(function))
            .map(|function| (*function.fn_type.return_type).clone())
            .ok_or_else(|| self.illegal_return("return can only appear in a function", id))
    }

    pub(super) fn analyze_return(
        &mut self,
        id: NodeId,
        value: NodeId,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        let return_type = self.enclosing_return_type(id, context)?;
        if return_type.is_void() {
            return Err(self.illegal_return("cannot return a value from a void function", id));
        }

        let value = self.analyze(value, context)?;
        self.check_assignable(value, &return_type)?;

        self.ast.replace_kind(id, NodeKind::Return { value });
        Ok(id)
    }

    pub(super) fn analyze_short_return(
        &mut self,
        id: NodeId,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        let return_type = self.enclosing_return_type(id, context)?;
        if !return_type.is_void() {
            return Err(self.illegal_return(
                &format!("a value of type `{}` should be returned here", return_type),
                id,
            ));
        }
        Ok(id)
    }

    pub(super) fn analyze_break(
        &mut self,
        id: NodeId,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        if !context.inside_loop() {
            return Err(Error::new(ErrorImpl::IllegalBreak, self.position(id)));
        }
        Ok(id)
    }

    pub(super) fn analyze_if(
        &mut self,
        id: NodeId,
        test: NodeId,
        consequence: NodeId,
        alternate: Option<NodeId>,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        let test = self.analyze(test, context)?;
        self.require(test, "bool", Type::is_boolean)?;

        let consequence = {
            let mut child = context.child(ContextOverrides::default());
            self.analyze(consequence, &mut child)?
        };

        let alternate = match alternate {
            // A trailing else-if shares this scope
            Some(alternate) if matches!(self.ast.kind(alternate), NodeKind::If { .. }) => {
                Some(self.analyze(alternate, context)?)
            }
            Some(alternate) => {
                let mut child = context.child(ContextOverrides::default());
                Some(self.analyze(alternate, &mut child)?)
            }
            None => None,
        };

        self.ast.replace_kind(
            id,
            NodeKind::If {
                test,
                consequence,
                alternate,
            },
        );
        Ok(id)
    }

    pub(super) fn analyze_while(
        &mut self,
        id: NodeId,
        test: NodeId,
        body: NodeId,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        let test = self.analyze(test, context)?;
        self.require(test, "bool", Type::is_boolean)?;

        let body = {
            log::trace!("entering loop scope");
            let mut child = context.child(ContextOverrides {
                inside_loop: Some(true),
                function: None,
            });
            self.analyze(body, &mut child)?
        };

        self.ast.replace_kind(id, NodeKind::While { test, body });
        Ok(id)
    }

    pub(super) fn analyze_for(
        &mut self,
        id: NodeId,
        declaration: NodeId,
        test: NodeId,
        step: NodeId,
        body: NodeId,
        context: &mut Context<'_>,
    ) -> Result<NodeId, Error> {
        log::trace!("entering loop scope");
        let mut child = context.child(ContextOverrides {
            inside_loop: Some(true),
            function: None,
        });

        let declaration = self.analyze(declaration, &mut child)?;
        let test = self.analyze(test, &mut child)?;
        self.require(test, "bool", Type::is_boolean)?;
        let step = self.analyze(step, &mut child)?;
        let body = self.analyze(body, &mut child)?;

        self.ast.replace_kind(
            id,
            NodeKind::For {
                declaration,
                test,
                step,
                body,
            },
        );
        Ok(id)
    }
}
