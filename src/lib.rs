#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::{
    analyzer::analyzer::analyze_with_config,
    config::LanguageConfig,
    errors::errors::{Error, ErrorTip},
    generator::generator::generate,
    parser::parser::parse_source_with_config,
};

pub mod analyzer;
pub mod ast;
pub mod config;
pub mod errors;
pub mod generator;
pub mod lexer;
pub mod macros;
pub mod parser;

extern crate regex;

/// Byte offset into a source file, and the file's name.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Compiles Custom source to JavaScript with the canonical keywords.
pub fn compile(source: &str, file: Option<String>) -> Result<String, Error> {
    compile_with_config(source, file, &LanguageConfig::default())
}

pub fn compile_with_config(
    source: &str,
    file: Option<String>,
    config: &LanguageConfig,
) -> Result<String, Error> {
    let program = parse_source_with_config(source, file, config)?;
    let program = analyze_with_config(program, config)?;
    Ok(generate(&program))
}

/// Finds the line holding byte `position` of `source`.
///
/// Returns the 1-based line number, the line text and the column of
/// `position` within it. A position at the very end of the source points just
/// past the last line.
pub fn get_line_at_position(source: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;
    if pos > source.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return Some((line_number, line.to_string(), pos - start));
        }

        start = end;
        line_number += 1;
    }

    // End of input
    match source.split_inclusive('\n').last() {
        Some(line) if !line.ends_with('\n') => {
            Some((line_number - 1, line.to_string(), line.len()))
        }
        _ => Some((line_number, String::new(), 0)),
    }
}

/// Renders `error` with the offending source line and a caret under the
/// error position.
pub fn render_error(error: &Error, source: &str) -> String {
    /*
        Error: TypeMismatch (Expected type `int`, received `string`)
        -> main.custom
           |
         3 | int x = "hi"
           | --------^
    */

    let position = error.get_position();
    let mut output = match error.get_tip() {
        ErrorTip::None => format!("Error: {}\n", error.get_error_name()),
        tip => format!("Error: {} ({})\n", error.get_error_name(), tip),
    };
    output.push_str(&format!("-> {}\n", position.1));

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        return output;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let trimmed = line_text.trim_start_matches([' ', '\t']);
    let removed_whitespace = line_text.len() - trimmed.len();
    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    output.push_str(&format!("{:>padding$}\n", "|"));
    output.push_str(&format!("{} | {}\n", line_string, trimmed.trim_end()));
    output.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    output
}

/// Prints `error` to stderr.
pub fn display_error(error: &Error, source: &str) {
    eprint!("{}", render_error(error, source));
}
