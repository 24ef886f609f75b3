use crate::{
    ast::{
        ast::{NodeId, NodeKind},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    parser::{expr::parse_expr, lookups::BindingPower},
    Position,
};

use super::{parser::Parser, types::parse_type};

/// Parses one statement, consuming an optional trailing `;`.
pub fn parse_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let handler = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied();

    let stmt = match handler {
        Some(stmt_fn) => stmt_fn(parser)?,
        None => parse_simple_stmt(parser)?,
    };

    parser.eat(TokenKind::Semicolon);
    Ok(stmt)
}

/// Assignment, increment, decrement or call: the statements that start with
/// an expression. Used on its own for the step of a `for` header.
pub fn parse_simple_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.get_position();
    let expr = parse_expr(parser, BindingPower::Default)?;

    let kind = match parser.current_token_kind() {
        TokenKind::Assignment => {
            expect_assignable(parser, expr)?;
            parser.advance();
            let source = parse_expr(parser, BindingPower::Default)?;
            NodeKind::Assignment {
                target: expr,
                source,
            }
        }
        TokenKind::PlusPlus => {
            expect_assignable(parser, expr)?;
            parser.advance();
            NodeKind::Increment { target: expr }
        }
        TokenKind::MinusMinus => {
            expect_assignable(parser, expr)?;
            parser.advance();
            NodeKind::Decrement { target: expr }
        }
        _ => {
            if let NodeKind::Call { .. } = parser.ast().kind(expr) {
                return Ok(expr);
            }

            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: parser.current_token().value.clone(),
                    message: String::from("expected an assignment, increment, decrement or call"),
                },
                start,
            ));
        }
    };

    let span = parser.span_from(start);
    Ok(parser.push(kind, span))
}

fn expect_assignable(parser: &Parser, target: NodeId) -> Result<(), Error> {
    match parser.ast().kind(target) {
        NodeKind::Identifier { .. } => Ok(()),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("only variables can be assigned"),
            },
            parser.ast().span(target).start.clone(),
        )),
    }
}

fn expect_identifier(parser: &mut Parser, context: &str) -> Result<Token, Error> {
    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: format!("expected identifier during {}", context),
        },
        parser.get_position(),
    );
    parser.expect_error(TokenKind::Identifier, Some(error))
}

/// `T id = e` or `T id(T a, ...) { ... }`.
pub fn parse_decl_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.get_position();
    let declared_type = parse_type(parser, BindingPower::Default)?;
    let name = expect_identifier(parser, "declaration")?;

    if parser.current_token_kind() == TokenKind::OpenParen {
        parse_fn_decl(parser, start, declared_type, name)
    } else {
        parse_var_decl(parser, start, declared_type, name)
    }
}

fn parse_var_decl(
    parser: &mut Parser,
    start: Position,
    declared_type: Type,
    name: Token,
) -> Result<NodeId, Error> {
    parser.expect(TokenKind::Assignment)?;
    let source = parse_expr(parser, BindingPower::Default)?;
    let target = parser.push(NodeKind::Identifier { name: name.value }, name.span);
    let span = parser.span_from(start);

    Ok(parser.push(
        NodeKind::Declaration {
            declared_type,
            target,
            source,
        },
        span,
    ))
}

fn parse_fn_decl(
    parser: &mut Parser,
    start: Position,
    return_type: Type,
    name: Token,
) -> Result<NodeId, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut params = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        let param_start = parser.get_position();
        let param_type = parse_type(parser, BindingPower::Default)?;
        let param_name = expect_identifier(parser, "parameter declaration")?.value;
        let span = parser.span_from(param_start);
        params.push(parser.push(
            NodeKind::Parameter {
                param_type,
                name: param_name,
                variable: None,
            },
            span,
        ));

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect(TokenKind::Comma)?;
        }
    }
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block(parser)?;
    let span = parser.span_from(start);

    Ok(parser.push(
        NodeKind::FunctionDeclaration {
            return_type,
            name: name.value,
            params,
            body,
            function: None,
        },
        span,
    ))
}

pub fn parse_block(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut body = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        body.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;
    let span = parser.span_from(start);

    Ok(parser.push(NodeKind::Block { body }, span))
}

fn parse_condition(parser: &mut Parser) -> Result<NodeId, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let test = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;
    Ok(test)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.expect(TokenKind::If)?.span.start;

    let test = parse_condition(parser)?;
    let consequence = parse_block(parser)?;

    let alternate = if parser.eat(TokenKind::Else) {
        if parser.current_token_kind() == TokenKind::If {
            Some(parse_if_stmt(parser)?)
        } else {
            Some(parse_block(parser)?)
        }
    } else {
        None
    };

    let span = parser.span_from(start);
    Ok(parser.push(
        NodeKind::If {
            test,
            consequence,
            alternate,
        },
        span,
    ))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.expect(TokenKind::While)?.span.start;

    let test = parse_condition(parser)?;
    let body = parse_block(parser)?;

    let span = parser.span_from(start);
    Ok(parser.push(NodeKind::While { test, body }, span))
}

/// `for (T i = e; test; step) { ... }`
pub fn parse_for_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.expect(TokenKind::For)?.span.start;
    parser.expect(TokenKind::OpenParen)?;

    let declaration_start = parser.get_position();
    let declared_type = parse_type(parser, BindingPower::Default)?;
    let name = expect_identifier(parser, "declaration")?;
    let declaration = parse_var_decl(parser, declaration_start, declared_type, name)?;
    parser.expect(TokenKind::Semicolon)?;

    let test = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    let step = parse_simple_stmt(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block(parser)?;

    let span = parser.span_from(start);
    Ok(parser.push(
        NodeKind::For {
            declaration,
            test,
            step,
            body,
        },
        span,
    ))
}

/// `return e`, or a bare `return` when nothing follows on the statement.
pub fn parse_return_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.expect(TokenKind::Return)?.span.start;

    let kind = match parser.current_token_kind() {
        TokenKind::Semicolon | TokenKind::CloseCurly | TokenKind::EOF => NodeKind::ShortReturn,
        _ => NodeKind::Return {
            value: parse_expr(parser, BindingPower::Default)?,
        },
    };

    let span = parser.span_from(start);
    Ok(parser.push(kind, span))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<NodeId, Error> {
    let start = parser.expect(TokenKind::Break)?.span.start;
    let span = parser.span_from(start);

    Ok(parser.push(NodeKind::Break, span))
}
