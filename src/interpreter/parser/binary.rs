use crate::{
    ast::{BinaryOperator, Conditional, Expression},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_expression},
            unary::parse_mul_implicit,
            utils::{required, second_operand},
        },
        token_reader::TokenReader,
    },
};

/// Tokens accepted at one precedence level, with the operator each builds.
type OperatorTable = &'static [(Token, BinaryOperator)];

const CONDITIONAL_OR: OperatorTable = &[(Token::DoublePipe, BinaryOperator::ConditionalOr)];
const CONDITIONAL_AND: OperatorTable = &[(Token::DoubleAmpersand, BinaryOperator::ConditionalAnd)];
const BITWISE: OperatorTable = &[(Token::Implication, BinaryOperator::Implication),
                                 (Token::Equality, BinaryOperator::Equality),
                                 (Token::NAndKeyword, BinaryOperator::NAnd),
                                 (Token::NOrKeyword, BinaryOperator::NOr),
                                 (Token::EqKeyword, BinaryOperator::Equality),
                                 (Token::ImplKeyword, BinaryOperator::Implication)];
const OR: OperatorTable = &[(Token::Pipe, BinaryOperator::Or),
                            (Token::OrKeyword, BinaryOperator::Or)];
const XOR: OperatorTable = &[(Token::XOrKeyword, BinaryOperator::XOr)];
const AND: OperatorTable = &[(Token::Ampersand, BinaryOperator::And),
                             (Token::AndKeyword, BinaryOperator::And)];
const EQUALITY: OperatorTable = &[(Token::EqualEqual, BinaryOperator::Equal),
                                  (Token::BangEqual, BinaryOperator::NotEqual)];
const RELATIONAL: OperatorTable = &[(Token::Less, BinaryOperator::LessThan),
                                    (Token::LessEqual, BinaryOperator::LessOrEqual),
                                    (Token::Greater, BinaryOperator::GreaterThan),
                                    (Token::GreaterEqual, BinaryOperator::GreaterOrEqual)];
const SHIFT: OperatorTable = &[(Token::LeftShift, BinaryOperator::LeftShift),
                               (Token::RightShift, BinaryOperator::RightShift)];
const ADDITIVE: OperatorTable = &[(Token::Plus, BinaryOperator::Add),
                                  (Token::Minus, BinaryOperator::Sub)];
const MULTIPLICATIVE: OperatorTable = &[(Token::Star, BinaryOperator::Mul),
                                        (Token::Slash, BinaryOperator::Div),
                                        (Token::Percent, BinaryOperator::Mod),
                                        (Token::ModKeyword, BinaryOperator::Mod)];

/// Consumes the next token if it is one of `operators`.
fn match_operator(reader: &mut TokenReader<'_>,
                  operators: OperatorTable)
                  -> Option<BinaryOperator> {
    operators.iter()
             .find(|(token, _)| reader.check(token))
             .map(|(_, operator)| *operator)
}

/// Parses one left-associative precedence level.
///
/// Grammar: `level := next (operator next)*`
///
/// # Parameters
/// - `reader`: Token cursor.
/// - `operators`: The operators of this level.
/// - `next`: Parser of the next-tighter level.
///
/// # Returns
/// `None` if `next` does not match, otherwise the left-folded chain.
///
/// # Errors
/// `MissingSecondOperand` when an operator is not followed by an operand.
fn parse_left_associative(reader: &mut TokenReader<'_>,
                          operators: OperatorTable,
                          next: fn(&mut TokenReader<'_>) -> ParseResult<Option<Expression>>)
                          -> ParseResult<Option<Expression>> {
    let Some(mut left) = next(reader)? else {
        return Ok(None);
    };
    while let Some(operator) = match_operator(reader, operators) {
        let right = next(reader)?;
        let right = second_operand(right, reader, operator.symbol())?;
        left = Expression::binary(operator, left, right);
    }
    Ok(Some(left))
}

/// Parses the ternary conditional `condition ? then : else`.
///
/// Without `?`, the condition itself is returned.
///
/// # Errors
/// - `MissingExpression` for a missing branch.
/// - `MissingColon` when `:` does not separate the branches.
pub fn parse_ternary(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    let Some(condition) = parse_conditional_or(reader)? else {
        return Ok(None);
    };
    if !reader.check(&Token::Question) {
        return Ok(Some(condition));
    }

    let then = parse_expression(reader)?;
    let then = required(then, reader, "?")?;
    if !reader.check(&Token::Colon) {
        return Err(ParseError::MissingColon { position: reader.offset() });
    }
    let otherwise = parse_expression(reader)?;
    let otherwise = required(otherwise, reader, ":")?;

    Ok(Some(Expression::Conditional(Conditional::new(condition, then, Some(otherwise)))))
}

/// `||`
pub fn parse_conditional_or(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    parse_left_associative(reader, CONDITIONAL_OR, parse_conditional_and)
}

/// `&&`
pub fn parse_conditional_and(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    parse_left_associative(reader, CONDITIONAL_AND, parse_bitwise)
}

/// Implication, equivalence, `nand` and `nor`.
pub fn parse_bitwise(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    parse_left_associative(reader, BITWISE, parse_or)
}

/// `|` / `or`
pub fn parse_or(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    parse_left_associative(reader, OR, parse_xor)
}

/// `xor`
pub fn parse_xor(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    parse_left_associative(reader, XOR, parse_and)
}

/// `&` / `and`
pub fn parse_and(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    parse_left_associative(reader, AND, parse_equality)
}

/// `==` and `!=`
pub fn parse_equality(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    parse_left_associative(reader, EQUALITY, parse_relational)
}

/// `<`, `<=`, `>` and `>=`
pub fn parse_relational(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    parse_left_associative(reader, RELATIONAL, parse_shift)
}

/// `<<` and `>>`
pub fn parse_shift(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    parse_left_associative(reader, SHIFT, parse_additive)
}

/// `+` and `-`
pub fn parse_additive(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    parse_left_associative(reader, ADDITIVE, parse_multiplicative)
}

/// `*`, `/`, `%` and `mod`
pub fn parse_multiplicative(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    parse_left_associative(reader, MULTIPLICATIVE, parse_mul_implicit)
}
