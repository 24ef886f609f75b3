//! Standard library bindings.
//!
//! Every analysis starts from a fresh root scope holding one `Function`
//! entity per builtin, bound under its configured spelling.

use crate::{
    ast::{
        ast::{Ast, NodeKind},
        entities::{Builtin, Function},
    },
    config::LanguageConfig,
    errors::errors::Error,
    Span,
};

use super::context::Context;

pub fn declare_stdlib(
    ast: &mut Ast,
    context: &mut Context<'_>,
    config: &LanguageConfig,
    span: &Span,
) -> Result<(), Error> {
    for builtin in Builtin::ALL {
        let function = Function {
            name: config.spelling(builtin.key()).to_string(),
            fn_type: builtin.fn_type(),
            builtin: Some(builtin),
        };
        let name = function.name.clone();
        let ty = function.ty();

        let id = ast.push(NodeKind::Function(function), span.clone());
        ast.set_type(id, ty);
        context.declare(&name, id, &span.start)?;
    }

    Ok(())
}
