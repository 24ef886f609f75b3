//! Token construction macros shared by the lexer's pattern table.

/// Builds a [`Token`](crate::lexer::tokens::Token) from a kind, its source
/// text and its span.
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Handler for a pattern whose text is fixed, such as `++` or `{`: pushes
/// one token covering `$value` and moves past it.
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| {
            let width = $value.len();
            let span = lexer.span_of(width);
            lexer.push(MK_TOKEN!($kind, String::from($value), span));
            lexer.advance_n(width);
        }
    };
}
