use std::collections::HashMap;

use crate::{
    ast::ast::NodeId,
    errors::errors::{Error, ErrorImpl},
    Position,
};

/// Fields a child scope may set instead of inheriting them from its parent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextOverrides {
    pub inside_loop: Option<bool>,
    pub function: Option<NodeId>,
}

/// One lexical scope. Scopes form a chain through `parent` and live on the
/// stack for exactly as long as the region they describe is being analyzed.
#[derive(Debug)]
pub struct Context<'a> {
    parent: Option<&'a Context<'a>>,
    locals: HashMap<String, NodeId>,
    inside_loop: bool,
    function: Option<NodeId>,
}

impl Context<'static> {
    pub fn root() -> Self {
        Context {
            parent: None,
            locals: HashMap::new(),
            inside_loop: false,
            function: None,
        }
    }
}

impl<'a> Context<'a> {
    /// Whether `name` is bound here or in any ancestor.
    pub fn sees(&self, name: &str) -> bool {
        self.locals.contains_key(name) || self.parent.is_some_and(|parent| parent.sees(name))
    }

    /// Binds `name` in this scope. Shadowing anything visible is an error.
    pub fn declare(&mut self, name: &str, entity: NodeId, position: &Position) -> Result<(), Error> {
        if self.sees(name) {
            return Err(Error::new(
                ErrorImpl::DuplicateDeclaration {
                    identifier: name.to_string(),
                },
                position.clone(),
            ));
        }

        log::trace!("declared {} as {}", name, entity);
        self.locals.insert(name.to_string(), entity);
        Ok(())
    }

    /// Innermost binding of `name`.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        match self.locals.get(name) {
            Some(entity) => Some(*entity),
            None => self.parent.and_then(|parent| parent.lookup(name)),
        }
    }

    pub fn resolve(&self, name: &str, position: &Position) -> Result<NodeId, Error> {
        self.lookup(name).ok_or_else(|| {
            Error::new(
                ErrorImpl::UndeclaredIdentifier {
                    identifier: name.to_string(),
                },
                position.clone(),
            )
        })
    }

    pub fn child(&self, overrides: ContextOverrides) -> Context<'_> {
        Context {
            parent: Some(self),
            locals: HashMap::new(),
            inside_loop: overrides.inside_loop.unwrap_or(self.inside_loop),
            function: overrides.function.or(self.function),
        }
    }

    /// Closes this scope, keeping its bindings.
    pub fn into_locals(self) -> HashMap<String, NodeId> {
        self.locals
    }

    /// A child scope that resumes the bindings of an earlier, closed one.
    pub fn reopen(
        &self,
        overrides: ContextOverrides,
        locals: HashMap<String, NodeId>,
    ) -> Context<'_> {
        Context {
            locals,
            ..self.child(overrides)
        }
    }

    pub fn inside_loop(&self) -> bool {
        self.inside_loop
    }

    /// The function entity whose body is being analyzed, if any.
    pub fn function(&self) -> Option<NodeId> {
        self.function
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn position() -> Position {
        Position(0, Rc::new("test.custom".to_string()))
    }

    #[test]
    fn test_declare_and_resolve() {
        let mut root = Context::root();
        root.declare("x", NodeId(1), &position()).unwrap();

        assert!(root.sees("x"));
        assert_eq!(root.resolve("x", &position()).unwrap(), NodeId(1));
        assert!(!root.sees("y"));
    }

    #[test]
    fn test_resolve_searches_ancestors() {
        let mut root = Context::root();
        root.declare("x", NodeId(1), &position()).unwrap();
        let mut child = root.child(ContextOverrides::default());
        child.declare("y", NodeId(2), &position()).unwrap();
        let grandchild = child.child(ContextOverrides::default());

        assert_eq!(grandchild.lookup("x"), Some(NodeId(1)));
        assert_eq!(grandchild.lookup("y"), Some(NodeId(2)));
    }

    #[test]
    fn test_undeclared_identifier() {
        let root = Context::root();
        let error = root.resolve("missing", &position()).unwrap_err();

        assert_eq!(error.get_error_name(), "UndeclaredIdentifier");
    }

    #[test]
    fn test_shadowing_an_ancestor_is_rejected() {
        let mut root = Context::root();
        root.declare("x", NodeId(1), &position()).unwrap();
        let mut child = root.child(ContextOverrides::default());

        let error = child.declare("x", NodeId(2), &position()).unwrap_err();
        assert_eq!(error.get_error_name(), "DuplicateDeclaration");
    }

    #[test]
    fn test_sibling_scopes_are_independent() {
        let root = Context::root();
        {
            let mut first = root.child(ContextOverrides::default());
            first.declare("i", NodeId(1), &position()).unwrap();
        }
        let mut second = root.child(ContextOverrides::default());

        assert!(second.declare("i", NodeId(2), &position()).is_ok());
    }

    #[test]
    fn test_reopened_scope_keeps_its_bindings() {
        let mut root = Context::root();
        let locals = {
            let mut parameters = root.child(ContextOverrides::default());
            parameters.declare("f", NodeId(2), &position()).unwrap();
            parameters.into_locals()
        };
        root.declare("f", NodeId(1), &position()).unwrap();

        let body = root.reopen(ContextOverrides::default(), locals);
        assert_eq!(body.lookup("f"), Some(NodeId(2)));
        assert_eq!(root.lookup("f"), Some(NodeId(1)));
    }

    #[test]
    fn test_child_inherits_flags_unless_overridden() {
        let root = Context::root();
        let looping = root.child(ContextOverrides {
            inside_loop: Some(true),
            function: None,
        });
        let nested = looping.child(ContextOverrides::default());
        assert!(nested.inside_loop());

        let function_body = nested.child(ContextOverrides {
            inside_loop: Some(false),
            function: Some(NodeId(7)),
        });
        assert!(!function_body.inside_loop());
        assert_eq!(function_body.function(), Some(NodeId(7)));

        let inner = function_body.child(ContextOverrides::default());
        assert_eq!(inner.function(), Some(NodeId(7)));
    }
}
