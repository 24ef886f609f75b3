//! Type parsing implementation.
//!
//! This module handles parsing of type annotations. It supports:
//!
//! - Primitive types (`int`, `float`, `bool`, `string`, `void`)
//! - Array types, written with a postfix `[]`
//! - Set types, written with a postfix `{}`
//! - Dictionary types, written `<K, V>`
//!
//! Similar to expression parsing, it uses NUD/LED handlers with
//! binding powers so postfix forms compose (`int[]{}` is a set of arrays).

use std::collections::HashMap;

use crate::{
    ast::types::{Type, BOOL, FLOAT, INT, STRING, VOID},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<Type, Error>;

/// Type alias for type left denotation handler functions.
pub type TypeLEDHandler = fn(&mut Parser, Type, BindingPower) -> Result<Type, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Type alias for type LED lookup table.
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;

/// Type alias for type binding power lookup table.
pub type TypeBPLookup = HashMap<TokenKind, BindingPower>;

/// Initializes the type parsing lookup tables.
pub fn create_token_type_lookups(parser: &mut Parser) {
    for kind in [
        TokenKind::Int,
        TokenKind::Float,
        TokenKind::Bool,
        TokenKind::Str,
        TokenKind::Void,
    ] {
        parser.type_nud(kind, parse_primitive_type);
    }
    parser.type_nud(TokenKind::Less, parse_dict_type);
    parser.type_led(TokenKind::OpenBracket, BindingPower::Call, parse_array_type);
    parser.type_led(TokenKind::OpenCurly, BindingPower::Call, parse_set_type);
}

pub fn parse_primitive_type(parser: &mut Parser) -> Result<Type, Error> {
    let token = parser.advance().clone();
    match token.kind {
        TokenKind::Int => Ok(INT),
        TokenKind::Float => Ok(FLOAT),
        TokenKind::Bool => Ok(BOOL),
        TokenKind::Str => Ok(STRING),
        TokenKind::Void => Ok(VOID),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.value,
                message: String::from("expected a type"),
            },
            token.span.start,
        )),
    }
}

pub fn parse_dict_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.expect(TokenKind::Less)?;
    let key = parse_type(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Comma)?;
    let value = parse_type(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Greater)?;

    Ok(Type::dict(key, value))
}

pub fn parse_array_type(
    parser: &mut Parser,
    left: Type,
    _bp: BindingPower,
) -> Result<Type, Error> {
    parser.expect(TokenKind::OpenBracket)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Type::array(left))
}

pub fn parse_set_type(parser: &mut Parser, left: Type, _bp: BindingPower) -> Result<Type, Error> {
    parser.expect(TokenKind::OpenCurly)?;
    parser.expect(TokenKind::CloseCurly)?;

    Ok(Type::set(left))
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<Type, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud_fn = match parser.get_type_nud_lookup().get(&token_kind) {
        Some(nud_fn) => *nud_fn,
        None => {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: parser.current_token().value.clone(),
                    message: String::from("expected a type"),
                },
                parser.get_position(),
            ))
        }
    };

    let mut left = nud_fn(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let current_bp = *parser
            .get_type_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if current_bp <= bp {
            break;
        }

        let led_fn = match parser.get_type_led_lookup().get(&token_kind) {
            Some(led_fn) => *led_fn,
            None => break,
        };

        left = led_fn(parser, left, current_bp)?;
    }

    Ok(left)
}
