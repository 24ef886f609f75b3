use crate::{
    ast::{
        ast::{NodeId, NodeKind},
        expressions::{BinaryOp, Literal, UnaryOp},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<NodeId, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud_fn = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud_fn) => *nud_fn,
        None => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken {
                    token: parser.current_token().value.clone(),
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
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if current_bp <= bp {
            break;
        }

        let led_fn = match parser.get_led_lookup().get(&token_kind) {
            Some(led_fn) => *led_fn,
            None => {
                return Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: parser.current_token().value.clone(),
                    },
                    parser.get_position(),
                ))
            }
        };

        left = led_fn(parser, left, current_bp)?;
    }

    Ok(left)
}

/// Span running from the start of `left` to the last consumed token.
fn span_from_node(parser: &Parser, left: NodeId) -> Span {
    let start = parser.ast().span(left).start.clone();
    parser.span_from(start)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let token = parser.current_token().clone();
    let kind = match token.kind {
        TokenKind::Number => {
            let literal = if token.value.contains('.') {
                token.value.parse().map(Literal::Float).ok()
            } else {
                token.value.parse().map(Literal::Int).ok()
            };

            match literal {
                Some(literal) => NodeKind::Literal(literal),
                None => {
                    return Err(Error::new(
                        ErrorImpl::NumberParseError { token: token.value },
                        token.span.start,
                    ))
                }
            }
        }
        TokenKind::String => NodeKind::Literal(Literal::Str(token.value.clone())),
        TokenKind::True => NodeKind::Literal(Literal::Bool(true)),
        TokenKind::False => NodeKind::Literal(Literal::Bool(false)),
        TokenKind::Identifier => NodeKind::Identifier {
            name: token.value.clone(),
        },
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value },
                token.span.start,
            ))
        }
    };

    parser.advance();
    Ok(parser.push(kind, token.span))
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: NodeId,
    bp: BindingPower,
) -> Result<NodeId, Error> {
    let operator_token = parser.advance().clone();
    let op = BinaryOp::from_token(operator_token.kind).ok_or_else(|| {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: operator_token.value.clone(),
            },
            operator_token.span.start.clone(),
        )
    })?;

    let right = parse_expr(parser, bp)?;
    let span = span_from_node(parser, left);

    Ok(parser.push(NodeKind::Binary { op, left, right }, span))
}

/// `^` is right associative: its right operand may itself contain `^`.
pub fn parse_power_expr(
    parser: &mut Parser,
    left: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    parser.advance();
    let right = parse_expr(parser, BindingPower::Unary)?;
    let span = span_from_node(parser, left);

    Ok(parser.push(
        NodeKind::Binary {
            op: BinaryOp::Power,
            left,
            right,
        },
        span,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let operator_token = parser.advance().clone();
    let op = match operator_token.kind {
        TokenKind::Not => UnaryOp::Not,
        _ => UnaryOp::Negate,
    };
    let operand = parse_expr(parser, BindingPower::Unary)?;
    let span = parser.span_from(operator_token.span.start);

    Ok(parser.push(NodeKind::Unary { op, operand }, span))
}

pub fn parse_conditional_expr(
    parser: &mut Parser,
    test: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    parser.expect(TokenKind::Question)?;
    let consequence = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Colon)?;
    let alternate = parse_expr(parser, BindingPower::Default)?;
    let span = span_from_node(parser, test);

    Ok(parser.push(
        NodeKind::Conditional {
            test,
            consequence,
            alternate,
        },
        span,
    ))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Parses comma separated expressions up to (and including) `close`.
fn parse_expr_list(parser: &mut Parser, close: TokenKind) -> Result<Vec<NodeId>, Error> {
    let mut items = vec![];

    while parser.current_token_kind() != close {
        items.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() != close {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(close)?;
    Ok(items)
}

pub fn parse_call_expr(
    parser: &mut Parser,
    callee: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let args = parse_expr_list(parser, TokenKind::CloseParen)?;
    let span = span_from_node(parser, callee);

    Ok(parser.push(NodeKind::Call { callee, args }, span))
}

pub fn parse_index_expr(
    parser: &mut Parser,
    collection: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    parser.expect(TokenKind::OpenBracket)?;
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;
    let span = span_from_node(parser, collection);

    Ok(parser.push(NodeKind::Index { collection, index }, span))
}

pub fn parse_property_expr(
    parser: &mut Parser,
    object: NodeId,
    _bp: BindingPower,
) -> Result<NodeId, Error> {
    parser.expect(TokenKind::Dot)?;

    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected property name"),
        },
        parser.get_position(),
    );
    let property = parser.expect_error(TokenKind::Identifier, Some(error))?.value;
    let span = span_from_node(parser, object);

    Ok(parser.push(NodeKind::Property { object, property }, span))
}

/// `[a, b]`, `[]` or the comprehension `[e for x in c if p]`.
pub fn parse_array_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.expect(TokenKind::OpenBracket)?.span.start;

    if parser.eat(TokenKind::CloseBracket) {
        let span = parser.span_from(start);
        return Ok(parser.push(NodeKind::Array { elements: vec![] }, span));
    }

    let first = parse_expr(parser, BindingPower::Default)?;

    if parser.eat(TokenKind::For) {
        let error = Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected comprehension variable"),
            },
            parser.get_position(),
        );
        let binding = parser.expect_error(TokenKind::Identifier, Some(error))?.value;
        parser.expect(TokenKind::In)?;
        let collection = parse_expr(parser, BindingPower::Default)?;

        let condition = if parser.eat(TokenKind::If) {
            Some(parse_expr(parser, BindingPower::Default)?)
        } else {
            None
        };

        parser.expect(TokenKind::CloseBracket)?;
        let span = parser.span_from(start);

        return Ok(parser.push(
            NodeKind::ListComprehension {
                element: first,
                binding,
                collection,
                condition,
                variable: None,
            },
            span,
        ));
    }

    let mut elements = vec![first];
    if parser.eat(TokenKind::Comma) {
        elements.extend(parse_expr_list(parser, TokenKind::CloseBracket)?);
    } else {
        parser.expect(TokenKind::CloseBracket)?;
    }
    let span = parser.span_from(start);

    Ok(parser.push(NodeKind::Array { elements }, span))
}

/// `{a, b}` (set), `{k: v}` (dict) or the ambiguous empty `{}`.
pub fn parse_curly_expr(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    if parser.eat(TokenKind::CloseCurly) {
        let span = parser.span_from(start);
        return Ok(parser.push(NodeKind::Dict { entries: vec![] }, span));
    }

    let first = parse_expr(parser, BindingPower::Default)?;

    if parser.current_token_kind() != TokenKind::Colon {
        let mut elements = vec![first];
        if parser.eat(TokenKind::Comma) {
            elements.extend(parse_expr_list(parser, TokenKind::CloseCurly)?);
        } else {
            parser.expect(TokenKind::CloseCurly)?;
        }
        let span = parser.span_from(start);

        return Ok(parser.push(NodeKind::Set { elements }, span));
    }

    let mut entries = vec![];
    let mut key = first;
    loop {
        parser.expect(TokenKind::Colon)?;
        let value = parse_expr(parser, BindingPower::Default)?;
        let span = span_from_node(parser, key);
        entries.push(parser.push(NodeKind::KeyValue { key, value }, span));

        if parser.eat(TokenKind::CloseCurly) {
            break;
        }
        parser.expect(TokenKind::Comma)?;
        if parser.eat(TokenKind::CloseCurly) {
            break;
        }
        key = parse_expr(parser, BindingPower::Default)?;
    }
    let span = parser.span_from(start);

    Ok(parser.push(NodeKind::Dict { entries }, span))
}
