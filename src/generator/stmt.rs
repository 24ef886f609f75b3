use crate::ast::ast::{NodeId, NodeKind};

use super::{
    expr::{gen_condition, gen_expression},
    generator::{js_name, Generator},
};

/// Emits the statements of a block one level deeper.
fn gen_block(generator: &mut Generator, block: NodeId) {
    generator.indent();
    match generator.ast.kind(block) {
        NodeKind::Block { body } => {
            for stmt in body.clone() {
                gen_statement(generator, stmt);
            }
        }
        _ => gen_statement(generator, block),
    }
    generator.dedent();
}

/// Name bound by a declaration target, parameter or entity.
fn binding_name(generator: &Generator, id: NodeId) -> String {
    match generator.ast.kind(id) {
        NodeKind::Variable(variable) => js_name(&variable.name),
        NodeKind::Function(function) => js_name(&function.name),
        NodeKind::Identifier { name } | NodeKind::Parameter { name, .. } => js_name(name),
        _ => gen_expression(generator, id),
    }
}

/// A statement without its terminator, as it appears in a `for` header.
fn gen_simple(generator: &Generator, id: NodeId) -> String {
    match generator.ast.kind(id) {
        NodeKind::Declaration { target, source, .. } => format!(
            "let {} = {}",
            binding_name(generator, *target),
            gen_expression(generator, *source)
        ),
        NodeKind::Assignment { target, source } => format!(
            "{} = {}",
            binding_name(generator, *target),
            gen_expression(generator, *source)
        ),
        NodeKind::Increment { target } => format!("{}++", binding_name(generator, *target)),
        NodeKind::Decrement { target } => format!("{}--", binding_name(generator, *target)),
        _ => gen_expression(generator, id),
    }
}

pub fn gen_statement(generator: &mut Generator, statement: NodeId) {
    match generator.ast.kind(statement).clone() {
        NodeKind::Program { body } | NodeKind::Block { body } => {
            for stmt in body {
                gen_statement(generator, stmt);
            }
        }
        NodeKind::Declaration { .. }
        | NodeKind::Assignment { .. }
        | NodeKind::Increment { .. }
        | NodeKind::Decrement { .. } => {
            let line = gen_simple(generator, statement);
            generator.emit(format!("{};", line));
        }
        NodeKind::FunctionDeclaration {
            name, params, body, ..
        } => {
            let params = params
                .iter()
                .map(|param| binding_name(generator, *param))
                .collect::<Vec<_>>()
                .join(", ");

            generator.emit(format!("function {}({}) {{", js_name(&name), params));
            gen_block(generator, body);
            generator.emit("}");
        }
        NodeKind::Return { value } => {
            let value = gen_expression(generator, value);
            generator.emit(format!("return {};", value));
        }
        NodeKind::ShortReturn => generator.emit("return;"),
        NodeKind::Break => generator.emit("break;"),
        NodeKind::If {
            test,
            consequence,
            alternate,
        } => {
            let test = gen_condition(generator, test);
            generator.emit(format!("if ({}) {{", test));
            gen_block(generator, consequence);
            gen_alternate(generator, alternate);
        }
        NodeKind::While { test, body } => {
            let test = gen_condition(generator, test);
            generator.emit(format!("while ({}) {{", test));
            gen_block(generator, body);
            generator.emit("}");
        }
        NodeKind::For {
            declaration,
            test,
            step,
            body,
        } => {
            let header = format!(
                "for ({}; {}; {}) {{",
                gen_simple(generator, declaration),
                gen_condition(generator, test),
                gen_simple(generator, step)
            );
            generator.emit(header);
            gen_block(generator, body);
            generator.emit("}");
        }
        // Calls are the only expressions allowed as statements
        _ => {
            let line = gen_expression(generator, statement);
            generator.emit(format!("{};", line));
        }
    }
}

/// Closes an `if` body, continuing with `else if` or `else` as needed.
fn gen_alternate(generator: &mut Generator, alternate: Option<NodeId>) {
    let Some(alternate) = alternate else {
        generator.emit("}");
        return;
    };

    match generator.ast.kind(alternate).clone() {
        NodeKind::If {
            test,
            consequence,
            alternate,
        } => {
            let test = gen_condition(generator, test);
            generator.emit(format!("}} else if ({}) {{", test));
            gen_block(generator, consequence);
            gen_alternate(generator, alternate);
        }
        _ => {
            generator.emit("} else {");
            gen_block(generator, alternate);
            generator.emit("}");
        }
    }
}
