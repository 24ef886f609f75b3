use crate::ast::{
    ast::{NodeId, NodeKind},
    entities::Builtin,
    expressions::{BinaryOp, Literal, UnaryOp},
    types::{Type, INT},
};

use super::generator::{js_name, Generator};

fn gen_list(generator: &Generator, ids: &[NodeId]) -> String {
    ids.iter()
        .map(|id| gen_expression(generator, *id))
        .collect::<Vec<_>>()
        .join(", ")
}

fn gen_literal(literal: &Literal) -> String {
    match literal {
        Literal::Int(value) => value.to_string(),
        Literal::Float(value) => format!("{:?}", value),
        Literal::Bool(value) => value.to_string(),
        Literal::Str(value) => serde_json::Value::String(value.clone()).to_string(),
    }
}

/// The builtin a callee refers to, if any.
fn builtin(generator: &Generator, callee: NodeId) -> Option<Builtin> {
    match generator.ast.kind(callee) {
        NodeKind::Function(function) => function.builtin,
        _ => None,
    }
}

/// Integer `/` and `^` are truncated back to an integer.
fn truncates(generator: &Generator, id: NodeId, op: BinaryOp) -> bool {
    matches!(op, BinaryOp::Divide | BinaryOp::Power) && generator.type_of(id) == INT
}

/// `left op right` without the surrounding parentheses.
fn gen_binary(
    generator: &Generator,
    id: NodeId,
    op: BinaryOp,
    left: NodeId,
    right: NodeId,
) -> String {
    let left = gen_expression(generator, left);
    let right = gen_expression(generator, right);

    let symbol = match op {
        BinaryOp::Equals => "===",
        BinaryOp::NotEquals => "!==",
        BinaryOp::Power => "**",
        other => other.symbol(),
    };

    if truncates(generator, id, op) {
        format!("Math.trunc({} {} {})", left, symbol, right)
    } else {
        format!("{} {} {}", left, symbol, right)
    }
}

/// An expression used as a condition, where the outer parentheses of a
/// binary expression would be redundant.
pub fn gen_condition(generator: &Generator, id: NodeId) -> String {
    match generator.ast.kind(id) {
        NodeKind::Binary { op, left, right } => gen_binary(generator, id, *op, *left, *right),
        _ => gen_expression(generator, id),
    }
}

pub fn gen_expression(generator: &Generator, expression: NodeId) -> String {
    match generator.ast.kind(expression) {
        NodeKind::Literal(literal) => gen_literal(literal),
        NodeKind::Identifier { name } => js_name(name),
        NodeKind::Variable(variable) => js_name(&variable.name),
        NodeKind::Function(function) => match function.builtin {
            Some(Builtin::Print) => String::from("console.log"),
            Some(Builtin::Length) => String::from("((a) => a.length)"),
            None => js_name(&function.name),
        },
        NodeKind::Binary { op, left, right } => {
            let binary = gen_binary(generator, expression, *op, *left, *right);
            if truncates(generator, expression, *op) {
                binary
            } else {
                format!("({})", binary)
            }
        }
        NodeKind::Unary { op, operand } => {
            let symbol = match op {
                UnaryOp::Negate => "-",
                UnaryOp::Not => "!",
            };
            format!("({}{})", symbol, gen_expression(generator, *operand))
        }
        NodeKind::Conditional {
            test,
            consequence,
            alternate,
        } => format!(
            "({} ? {} : {})",
            gen_expression(generator, *test),
            gen_expression(generator, *consequence),
            gen_expression(generator, *alternate)
        ),
        NodeKind::Call { callee, args } => match builtin(generator, *callee) {
            Some(Builtin::Print) => format!("console.log({})", gen_list(generator, args)),
            Some(Builtin::Length) => format!("{}.length", gen_list(generator, args)),
            None => format!(
                "{}({})",
                gen_expression(generator, *callee),
                gen_list(generator, args)
            ),
        },
        NodeKind::Array { elements } => format!("[{}]", gen_list(generator, elements)),
        NodeKind::Set { elements } if elements.is_empty() => String::from("new Set()"),
        NodeKind::Set { elements } => format!("new Set([{}])", gen_list(generator, elements)),
        NodeKind::Dict { entries } if entries.is_empty() => {
            match generator.type_of(expression) {
                Type::Set(_) => String::from("new Set()"),
                _ => String::from("new Map()"),
            }
        }
        NodeKind::Dict { entries } => format!("new Map([{}])", gen_list(generator, entries)),
        NodeKind::KeyValue { key, value } => format!(
            "[{}, {}]",
            gen_expression(generator, *key),
            gen_expression(generator, *value)
        ),
        NodeKind::Index { collection, index } => {
            let target = gen_expression(generator, *collection);
            let index = gen_expression(generator, *index);
            match generator.type_of(*collection) {
                Type::Set(_) => format!("[...{}][{}]", target, index),
                Type::Dict(..) => format!("{}.get({})", target, index),
                _ => format!("{}[{}]", target, index),
            }
        }
        NodeKind::Property { object, .. } => {
            let target = gen_expression(generator, *object);
            match generator.type_of(*object) {
                Type::Set(_) | Type::Dict(..) => format!("{}.size", target),
                _ => format!("{}.length", target),
            }
        }
        NodeKind::ListComprehension {
            element,
            binding,
            collection,
            condition,
            ..
        } => {
            let binding = js_name(binding);
            let mut source = gen_expression(generator, *collection);
            if let Type::Set(_) = generator.type_of(*collection) {
                source = format!("[...{}]", source);
            }
            if let Some(condition) = condition {
                source = format!(
                    "{}.filter(({}) => {})",
                    source,
                    binding,
                    gen_expression(generator, *condition)
                );
            }
            format!(
                "{}.map(({}) => {})",
                source,
                binding,
                gen_expression(generator, *element)
            )
        }
        other => unreachable!("{:?} is not an expression", other),
    }
}
