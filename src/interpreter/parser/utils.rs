use crate::{
    ast::{BuiltinFunction, Expression, UserFunctionCall, Variable},
    error::{ExpressionError, ParseError},
    interpreter::{
        lexer::Token,
        parser::core::{ParseResult, parse_expression},
        token_reader::TokenReader,
    },
};

/// Runs `parse` one nesting level deeper.
///
/// Every recursive production goes through this guard, so the recursion depth
/// of a parse is bounded by the reader's maximum depth rather than by the
/// input.
///
/// # Errors
/// Returns [`ParseError::NestingTooDeep`] when the limit is reached, or
/// whatever `parse` returns.
pub(super) fn nested<'a, F>(reader: &mut TokenReader<'a>,
                            parse: F)
                            -> ParseResult<Option<Expression>>
    where F: FnOnce(&mut TokenReader<'a>) -> ParseResult<Option<Expression>>
{
    if !reader.descend() {
        return Err(ParseError::NestingTooDeep { max_depth: reader.max_depth(),
                                                position:  reader.offset(), });
    }
    let result = parse(reader);
    reader.ascend();
    result
}

/// Builds the error for a token that fits no production.
pub(super) fn unexpected(reader: &TokenReader<'_>, construct: &'static str) -> ParseError {
    match reader.peek() {
        Some(token) => ParseError::UnexpectedToken { token:    token.to_string(),
                                                     position: reader.offset(), },
        None => ParseError::MissingExpression { construct,
                                                position: reader.offset() },
    }
}

/// Wraps a construction error with the current position, for use with
/// `map_err`.
pub(super) fn invalid(reader: &TokenReader<'_>)
                      -> impl FnOnce(ExpressionError) -> ParseError + use<> {
    let position = reader.offset();
    move |source| ParseError::InvalidExpression { source, position }
}

/// Unwraps a required sub-expression of `construct`.
pub(super) fn required(expression: Option<Expression>,
                       reader: &TokenReader<'_>,
                       construct: &'static str)
                       -> ParseResult<Expression> {
    expression.ok_or_else(|| ParseError::MissingExpression { construct,
                                                              position: reader.offset() })
}

/// Unwraps the right operand of `operator`.
pub(super) fn second_operand(expression: Option<Expression>,
                             reader: &TokenReader<'_>,
                             operator: &'static str)
                             -> ParseResult<Expression> {
    expression.ok_or_else(|| ParseError::MissingSecondOperand { operator,
                                                                 position: reader.offset() })
}

/// Consumes `(` after the keyword of `construct`.
pub(super) fn open_parenthesis(reader: &mut TokenReader<'_>,
                               construct: &'static str)
                               -> ParseResult<()> {
    if reader.check(&Token::LParen) {
        return Ok(());
    }
    Err(ParseError::MissingOpenParenthesis { construct,
                                             position: reader.offset() })
}

/// Consumes the `)` closing `construct`.
pub(super) fn close_parenthesis(reader: &mut TokenReader<'_>,
                                construct: &'static str)
                                -> ParseResult<()> {
    if reader.check(&Token::RParen) {
        return Ok(());
    }
    Err(ParseError::MissingCloseParenthesis { construct,
                                              position: reader.offset() })
}

/// Consumes the `,` separating the arguments of `construct`.
pub(super) fn comma(reader: &mut TokenReader<'_>, construct: &'static str) -> ParseResult<()> {
    if reader.check(&Token::Comma) {
        return Ok(());
    }
    Err(ParseError::MissingComma { construct,
                                   position: reader.offset() })
}

/// Consumes the `}` closing `construct`.
pub(super) fn close_brace(reader: &mut TokenReader<'_>,
                          construct: &'static str)
                          -> ParseResult<()> {
    if reader.check(&Token::RBrace) {
        return Ok(());
    }
    Err(ParseError::MissingCloseBrace { construct,
                                        position: reader.offset() })
}

/// Parses a variable: an identifier that is not followed by `(`.
///
/// Leaves the cursor unchanged when there is no variable.
pub(super) fn parse_variable(reader: &mut TokenReader<'_>) -> Option<Variable> {
    let scope = reader.create_scope();
    if let Some(name) = reader.identifier()
       && reader.peek() != Some(&Token::LParen)
    {
        reader.commit(scope);
        return Some(Variable::new(name));
    }
    reader.rollback(scope);
    None
}

/// Parses a parenthesized, comma-separated argument list.
///
/// Returns `None` (cursor unchanged) when the next token is not `(`. An empty
/// list `()` is accepted; arity is checked when the call node is built.
///
/// Grammar:
/// ```text
///     arguments := "(" [ expression ("," expression)* ] ")"
/// ```
///
/// # Errors
/// - `MissingExpression` after a trailing comma.
/// - `MissingCloseParenthesis` if the list is not closed.
pub(super) fn parse_arguments(reader: &mut TokenReader<'_>,
                              construct: &'static str)
                              -> ParseResult<Option<Vec<Expression>>> {
    if !reader.check(&Token::LParen) {
        return Ok(None);
    }

    let mut arguments = Vec::new();
    if let Some(first) = parse_expression(reader)? {
        arguments.push(first);
        while reader.check(&Token::Comma) {
            let argument = parse_expression(reader)?;
            arguments.push(required(argument, reader, construct)?);
        }
    }

    close_parenthesis(reader, construct)?;
    Ok(Some(arguments))
}

/// Builds a call node: a [`Expression::Function`] when `name` is a built-in
/// function, a [`Expression::UserFunction`] otherwise.
///
/// # Errors
/// Returns [`ParseError::InvalidExpression`] when a built-in function gets
/// the wrong number of arguments.
pub(super) fn create_function(reader: &TokenReader<'_>,
                              name: &str,
                              arguments: Vec<Expression>)
                              -> ParseResult<Expression> {
    match BuiltinFunction::from_name(name) {
        Some(function) => Expression::function(function, arguments).map_err(invalid(reader)),
        None => Ok(Expression::UserFunction(UserFunctionCall::new(name, arguments))),
    }
}
