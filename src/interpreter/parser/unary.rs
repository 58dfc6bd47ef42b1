use crate::{
    ast::{Expression, Matrix, Polar, Step, StepOperator, UnaryOperator, Vector},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_expression},
            utils::{
                close_brace, close_parenthesis, create_function, invalid, nested, parse_arguments,
                required,
            },
        },
        token_reader::TokenReader,
        value::angle::AngleValue,
    },
};

/// Parses the operand level of `*` and `/`: an implicit multiplication or a
/// prefix-unary expression.
pub fn parse_mul_implicit(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    if let Some(product) = parse_mul_implicit_left_unary(reader)? {
        return Ok(Some(product));
    }
    parse_left_unary(reader)
}

/// Parses a number directly followed by a variable, call, parenthesized
/// expression, matrix or vector, such as `2x`, `-3sin(x)` or `2(x + 1)`.
///
/// A leading `-` negates the number only, so `-2x` is `(-2) * x`. On the right
/// side, `^` binds tighter than the implicit product: `2x^2` is `2 * x^2`.
///
/// Speculative: restores the cursor when the number is not followed by one of
/// those operands.
///
/// Grammar:
/// ```text
///     mul_implicit := ["-"] number (function_or_variable ["^" exponentiation]
///                                  | parentheses | matrix | vector)
/// ```
fn parse_mul_implicit_left_unary(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    let scope = reader.create_scope();

    let minus = reader.check(&Token::Minus);
    let Some(number) = parse_number(reader) else {
        reader.rollback(scope);
        return Ok(None);
    };

    let right = match parse_mul_implicit_exponentiation(reader)? {
        Some(right) => Some(right),
        None => match parse_parentheses(reader)? {
            Some(right) => Some(right),
            None => match parse_matrix(reader)? {
                Some(right) => Some(right),
                None => parse_vector(reader)?,
            },
        },
    };
    let Some(right) = right else {
        reader.rollback(scope);
        return Ok(None);
    };
    reader.commit(scope);

    let left = if minus { Expression::negate(number) } else { number };
    Ok(Some(Expression::mul(left, right)))
}

/// The right side of an implicit product: a variable or call, optionally
/// raised to a power.
fn parse_mul_implicit_exponentiation(reader: &mut TokenReader<'_>)
                                     -> ParseResult<Option<Expression>> {
    let Some(base) = parse_function_or_variable(reader)? else {
        return Ok(None);
    };
    if !reader.check(&Token::Caret) {
        return Ok(Some(base));
    }
    let exponent = parse_exponentiation(reader)?;
    let exponent = required(exponent, reader, "^")?;
    Ok(Some(Expression::pow(base, exponent)))
}

/// Parses prefix operators: `-`, `+`, `!`, `~` and `not`.
///
/// Prefix operators nest, so `- -x` is `-(-x)`; a unary `+` is dropped.
///
/// Grammar: `left_unary := ("-" | "+" | "!" | "~" | "not") left_unary |
/// exponentiation`
pub fn parse_left_unary(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    nested(reader, |reader| {
        let Some(token) = reader.peek() else {
            return Ok(None);
        };
        let operator = match token {
            Token::Minus => Some(UnaryOperator::Minus),
            Token::Bang | Token::Tilde | Token::NotKeyword => Some(UnaryOperator::Not),
            Token::Plus => None,
            _ => return parse_exponentiation(reader),
        };

        let scope = reader.create_scope();
        reader.check(token);
        let Some(operand) = parse_left_unary(reader)? else {
            reader.rollback(scope);
            return Ok(None);
        };
        reader.commit(scope);

        Ok(Some(match operator {
            Some(operator) => Expression::unary(operator, operand),
            None => operand,
        }))
    })
}

/// Parses `base ^ exponent`.
///
/// The exponent is itself a prefix-unary expression, which makes `^` right
/// associative: `2^3^2` is `2^(3^2)` and `2^-1` is `2^(-1)`.
///
/// # Errors
/// `MissingExpression` when `^` has no exponent.
pub fn parse_exponentiation(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    let Some(base) = parse_right_unary(reader)? else {
        return Ok(None);
    };
    if !reader.check(&Token::Caret) {
        return Ok(Some(base));
    }
    let exponent = parse_left_unary(reader)?;
    let exponent = required(exponent, reader, "^")?;
    Ok(Some(Expression::pow(base, exponent)))
}

/// Parses postfix operators: `x++`, `x--` and any number of `!`.
///
/// Increment and decrement apply to variables only.
pub fn parse_right_unary(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    let Some(mut operand) = parse_operand(reader)? else {
        return Ok(None);
    };

    if let Expression::Variable(variable) = &operand {
        if reader.check(&Token::Increment) {
            return Ok(Some(Expression::Step(Step::new(StepOperator::Increment,
                                                      variable.clone()))));
        }
        if reader.check(&Token::Decrement) {
            return Ok(Some(Expression::Step(Step::new(StepOperator::Decrement,
                                                      variable.clone()))));
        }
    }

    while reader.check(&Token::Bang) {
        operand = Expression::factorial(operand);
    }
    Ok(Some(operand))
}

/// Parses an atom.
///
/// Grammar:
/// ```text
///     operand := complex | number | function_or_variable | bool | string
///              | parentheses | matrix | vector
/// ```
pub fn parse_operand(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    if let Some(complex) = parse_complex_number(reader)? {
        return Ok(Some(complex));
    }
    if let Some(number) = parse_number(reader) {
        return Ok(Some(number));
    }
    if let Some(call) = parse_function_or_variable(reader)? {
        return Ok(Some(call));
    }
    if let Some(literal) = parse_bool(reader) {
        return Ok(Some(literal));
    }
    if let Some(text) = reader.string() {
        return Ok(Some(Expression::string(text)));
    }
    if let Some(inner) = parse_parentheses(reader)? {
        return Ok(Some(inner));
    }
    if let Some(matrix) = parse_matrix(reader)? {
        return Ok(Some(matrix));
    }
    parse_vector(reader)
}

/// Parses a number literal with an optional angle unit: `2`, `30°`,
/// `30 deg`, `1 rad`, `100 grad`.
pub fn parse_number(reader: &mut TokenReader<'_>) -> Option<Expression> {
    let value = reader.number()?;

    let expression = if reader.check(&Token::Degree) || reader.check(&Token::DegreeKeyword) {
        Expression::Angle(AngleValue::degree(value))
    } else if reader.check(&Token::RadianKeyword) {
        Expression::Angle(AngleValue::radian(value))
    } else if reader.check(&Token::GradianKeyword) {
        Expression::Angle(AngleValue::gradian(value))
    } else {
        Expression::number(value)
    };
    Some(expression)
}

/// Parses a complex literal in polar form, `magnitude∠phase°`, with the phase
/// in degrees: `1∠90°`, `+2∠-45°`.
///
/// The `∠` symbol commits to the literal, so a missing phase or degree sign
/// is an error rather than a backtrack.
///
/// # Errors
/// - `MissingPhase` when no number follows `∠`.
/// - `MissingDegreeSymbol` when the phase is not followed by `°`.
pub fn parse_complex_number(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    let scope = reader.create_scope();

    reader.check(&Token::Plus);
    let Some(magnitude) = reader.number() else {
        reader.rollback(scope);
        return Ok(None);
    };
    if !reader.check(&Token::Angle) {
        reader.rollback(scope);
        return Ok(None);
    }
    reader.commit(scope);

    let negative = match reader.current_any(&[Token::Plus, Token::Minus]) {
        Some(sign) => *sign == Token::Minus,
        None => false,
    };
    let Some(phase) = reader.number() else {
        return Err(ParseError::MissingPhase { position: reader.offset() });
    };
    if !reader.check(&Token::Degree) {
        return Err(ParseError::MissingDegreeSymbol { position: reader.offset() });
    }

    let phase = if negative { -phase } else { phase };
    Ok(Some(Expression::Complex(Polar::new(magnitude, phase))))
}

/// Parses a variable or a call, `x` or `f(a, b)`.
///
/// Calls of built-in names build [`Expression::Function`] nodes, whose
/// argument count is checked immediately.
pub fn parse_function_or_variable(reader: &mut TokenReader<'_>)
                                  -> ParseResult<Option<Expression>> {
    let Some(name) = reader.identifier() else {
        return Ok(None);
    };
    match parse_arguments(reader, "function")? {
        Some(arguments) => create_function(reader, name, arguments).map(Some),
        None => Ok(Some(Expression::variable(name))),
    }
}

fn parse_bool(reader: &mut TokenReader<'_>) -> Option<Expression> {
    if reader.check(&Token::True) {
        return Some(Expression::bool(true));
    }
    if reader.check(&Token::False) {
        return Some(Expression::bool(false));
    }
    None
}

/// Parses `( expression )`. Parentheses leave no node in the tree.
///
/// # Errors
/// - `MissingExpression` for `()`.
/// - `MissingCloseParenthesis` when `)` is absent.
pub fn parse_parentheses(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    if !reader.check(&Token::LParen) {
        return Ok(None);
    }
    let inner = parse_expression(reader)?;
    let inner = required(inner, reader, "(")?;
    close_parenthesis(reader, "(")?;
    Ok(Some(inner))
}

/// Parses a vector literal, `{a, b, c}`.
///
/// # Errors
/// - `MissingExpression` for `{}` or a trailing comma.
/// - `MissingCloseBrace` when `}` is absent.
pub fn parse_vector(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    Ok(read_vector(reader)?.map(Expression::Vector))
}

fn read_vector(reader: &mut TokenReader<'_>) -> ParseResult<Option<Vector>> {
    if !reader.check(&Token::LBrace) {
        return Ok(None);
    }

    let first = parse_expression(reader)?;
    let mut elements = vec![required(first, reader, "vector")?];
    while reader.check(&Token::Comma) {
        let element = parse_expression(reader)?;
        elements.push(required(element, reader, "vector")?);
    }
    close_brace(reader, "vector")?;

    Vector::new(elements).map(Some).map_err(invalid(reader))
}

/// Parses a matrix literal, `{{a, b}, {c, d}}`.
///
/// Speculative: when the outer `{` is not directly followed by a vector, the
/// cursor is restored so the braces can be read as a plain vector.
///
/// # Errors
/// - `MissingExpression` when a row separator is not followed by a row.
/// - `MissingCloseBrace` when the outer `}` is absent.
/// - `InvalidExpression` for rows of different lengths.
pub fn parse_matrix(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    let scope = reader.create_scope();

    if !reader.check(&Token::LBrace) {
        reader.rollback(scope);
        return Ok(None);
    }
    let Some(first) = read_vector(reader)? else {
        reader.rollback(scope);
        return Ok(None);
    };
    reader.commit(scope);

    let mut rows = vec![first];
    while reader.check(&Token::Comma) {
        let Some(row) = read_vector(reader)? else {
            return Err(ParseError::MissingExpression { construct: "matrix",
                                                       position:  reader.offset(), });
        };
        rows.push(row);
    }
    close_brace(reader, "matrix")?;

    let matrix = Matrix::new(rows).map_err(invalid(reader))?;
    Ok(Some(Expression::Matrix(matrix)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::interpreter::lexer::tokenize;

    type Production = fn(&mut TokenReader<'_>) -> ParseResult<Option<Expression>>;

    /// Runs `parse` on `source`; returns the result, the cursor position and
    /// the number of scopes left open.
    fn attempt(parse: Production, source: &str) -> (Option<Expression>, usize, usize) {
        let tokens = tokenize(source).unwrap();
        let mut reader = TokenReader::new(&tokens);
        let result = parse(&mut reader).unwrap();
        (result, reader.position(), reader.open_scopes())
    }

    #[test]
    fn matrix_restores_cursor_before_plain_vector() {
        assert_eq!(attempt(parse_matrix, "{1, 2}"), (None, 0, 0));

        let (vector, position, scopes) = attempt(parse_operand, "{1, 2}");
        assert!(matches!(vector, Some(Expression::Vector(_))));
        assert_eq!((position, scopes), (5, 0));
    }

    #[test]
    fn complex_literal_restores_cursor_without_angle() {
        assert_eq!(attempt(parse_complex_number, "2 + 3"), (None, 0, 0));
        assert_eq!(attempt(parse_complex_number, "+x"), (None, 0, 0));
        assert_eq!(attempt(parse_complex_number, "3∠10°"),
                   (Some(Expression::Complex(Polar::new(3.0, 10.0))), 4, 0));
    }

    #[test]
    fn complex_literal_commits_at_angle() {
        let tokens = tokenize("2∠x").unwrap();
        let mut reader = TokenReader::new(&tokens);
        assert_eq!(parse_complex_number(&mut reader),
                   Err(ParseError::MissingPhase { position: 4 }));
        assert_eq!(reader.open_scopes(), 0);
    }

    #[test]
    fn implicit_product_restores_cursor_without_operand() {
        assert_eq!(attempt(parse_mul_implicit_left_unary, "2 + x"), (None, 0, 0));
        assert_eq!(attempt(parse_mul_implicit_left_unary, "-2 + x"), (None, 0, 0));
        assert_eq!(attempt(parse_mul_implicit, "-)"), (None, 0, 0));

        let (product, position, scopes) = attempt(parse_mul_implicit, "-2x");
        assert_eq!(product,
                   Some(Expression::mul(Expression::negate(Expression::number(2.0)),
                                        Expression::variable("x"))));
        assert_eq!((position, scopes), (3, 0));
    }
}
