use std::collections::HashSet;

use lazy_static::lazy_static;

use crate::ast::{
    ast::{Ast, NodeId, Program},
    types::Type,
};

use super::stmt::gen_statement;

lazy_static! {
    /// Names that cannot be used as JavaScript bindings, plus the globals the
    /// emitted code relies on.
    static ref JS_RESERVED: HashSet<&'static str> = HashSet::from([
        "arguments", "await", "break", "case", "catch", "class", "const",
        "continue", "debugger", "default", "delete", "do", "else", "enum",
        "eval", "export", "extends", "false", "finally", "for", "function",
        "if", "implements", "import", "in", "instanceof", "interface", "let",
        "new", "null", "of", "package", "private", "protected", "public",
        "return", "static", "super", "switch", "this", "throw", "true", "try",
        "typeof", "undefined", "var", "void", "while", "with", "yield",
        "console", "Math", "Map", "Set", "NaN", "Infinity",
    ]);
}

/// Output buffer of the JavaScript generator.
pub struct Generator<'a> {
    pub ast: &'a Ast,
    lines: Vec<String>,
    indent: usize,
}

impl<'a> Generator<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Generator {
            ast,
            lines: vec![],
            indent: 0,
        }
    }

    /// Appends one line at the current indentation.
    pub fn emit(&mut self, line: impl AsRef<str>) {
        self.lines
            .push(format!("{}{}", "  ".repeat(self.indent), line.as_ref()));
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn type_of(&self, id: NodeId) -> Type {
        self.ast.ty(id).cloned().unwrap_or(Type::Any)
    }

    pub fn finish(self) -> String {
        let mut output = self.lines.join("\n");
        if !output.is_empty() {
            output.push('\n');
        }
        output
    }
}

/// A source name made safe to use as a JavaScript binding.
pub fn js_name(name: &str) -> String {
    if JS_RESERVED.contains(name) {
        format!("{}_", name)
    } else {
        name.to_string()
    }
}

/// Emits JavaScript for an analyzed program.
pub fn generate(program: &Program) -> String {
    let mut generator = Generator::new(&program.ast);

    for stmt in program.body() {
        gen_statement(&mut generator, *stmt);
    }

    log::debug!("generated {} line(s) of JavaScript", generator.lines.len());
    generator.finish()
}
