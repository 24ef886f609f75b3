//! Tree dump of a [`Program`], one numbered line per node:
//!
//! ```text
//!    0 | Program body=[#1, #5]
//!    1 | Declaration type=int target=#2 source=#3
//! ```

use std::{collections::HashSet, fmt::Display};

use super::ast::{Ast, NodeId, NodeKind, Program};

fn ids(ids: &[NodeId]) -> String {
    let list = ids.iter().map(NodeId::to_string).collect::<Vec<_>>().join(", ");
    format!("[{}]", list)
}

fn optional(id: &Option<NodeId>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| String::from("-"))
}

fn describe(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Program { body } => format!("Program body={}", ids(body)),
        NodeKind::Block { body } => format!("Block body={}", ids(body)),
        NodeKind::Declaration {
            declared_type,
            target,
            source,
        } => format!(
            "Declaration type={} target={} source={}",
            declared_type, target, source
        ),
        NodeKind::Assignment { target, source } => {
            format!("Assignment target={} source={}", target, source)
        }
        NodeKind::Increment { target } => format!("Increment target={}", target),
        NodeKind::Decrement { target } => format!("Decrement target={}", target),
        NodeKind::FunctionDeclaration {
            return_type,
            name,
            params,
            body,
            function,
        } => format!(
            "FunctionDeclaration name={} returns={} params={} body={} function={}",
            name,
            return_type,
            ids(params),
            body,
            optional(function)
        ),
        NodeKind::Parameter {
            param_type,
            name,
            variable,
        } => format!(
            "Parameter name={} type={} variable={}",
            name,
            param_type,
            optional(variable)
        ),
        NodeKind::Return { value } => format!("Return value={}", value),
        NodeKind::ShortReturn => String::from("ShortReturn"),
        NodeKind::Break => String::from("Break"),
        NodeKind::If {
            test,
            consequence,
            alternate,
        } => format!(
            "If test={} consequence={} alternate={}",
            test,
            consequence,
            optional(alternate)
        ),
        NodeKind::While { test, body } => format!("While test={} body={}", test, body),
        NodeKind::For {
            declaration,
            test,
            step,
            body,
        } => format!(
            "For declaration={} test={} step={} body={}",
            declaration, test, step, body
        ),
        NodeKind::Call { callee, args } => format!("Call callee={} args={}", callee, ids(args)),
        NodeKind::Conditional {
            test,
            consequence,
            alternate,
        } => format!(
            "Conditional test={} consequence={} alternate={}",
            test, consequence, alternate
        ),
        NodeKind::Binary { op, left, right } => {
            format!("Binary op={} left={} right={}", op, left, right)
        }
        NodeKind::Unary { op, operand } => format!("Unary op={} operand={}", op, operand),
        NodeKind::Identifier { name } => format!("Identifier name={}", name),
        NodeKind::Literal(literal) => format!("Literal value={}", literal),
        NodeKind::Array { elements } => format!("Array elements={}", ids(elements)),
        NodeKind::Set { elements } => format!("Set elements={}", ids(elements)),
        NodeKind::Dict { entries } => format!("Dict entries={}", ids(entries)),
        NodeKind::KeyValue { key, value } => format!("KeyValue key={} value={}", key, value),
        NodeKind::Index { collection, index } => {
            format!("Index collection={} index={}", collection, index)
        }
        NodeKind::Property { object, property } => {
            format!("Property object={} property={}", object, property)
        }
        NodeKind::ListComprehension {
            element,
            binding,
            collection,
            condition,
            ..
        } => format!(
            "ListComprehension element={} binding={} collection={} condition={}",
            element,
            binding,
            collection,
            optional(condition)
        ),
        NodeKind::Variable(variable) => format!(
            "Variable name={}{}",
            variable.name,
            if variable.read_only { " read-only" } else { "" }
        ),
        NodeKind::Function(function) => match function.builtin {
            Some(builtin) => format!("Function name={} builtin={:?}", function.name, builtin),
            None => format!("Function name={}", function.name),
        },
    }
}

fn write_node(
    f: &mut std::fmt::Formatter<'_>,
    ast: &Ast,
    id: NodeId,
    seen: &mut HashSet<NodeId>,
) -> std::fmt::Result {
    // Entity nodes are shared by every reference to them
    if !seen.insert(id) {
        return Ok(());
    }

    let node = ast.get(id);
    write!(f, "{:>4} | {}", id.0, describe(&node.kind))?;
    if let Some(ty) = &node.ty {
        write!(f, " type={}", ty)?;
    }
    writeln!(f)?;

    for child in node.kind.children() {
        write_node(f, ast, child, seen)?;
    }

    Ok(())
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_node(f, &self.ast, self.root, &mut HashSet::new())
    }
}
