use crate::{
    ast::{
        Assign, AssignOperator, Conditional, Define, Expression, ForLoop, Undefine, WhileLoop,
    },
    interpreter::{
        lexer::Token,
        parser::{
            binary::parse_conditional_or,
            core::{ParseResult, parse_expression, parse_statement},
            utils::{
                close_parenthesis, comma, create_function, invalid, open_parenthesis,
                parse_variable, required, second_operand,
            },
        },
        token_reader::TokenReader,
    },
};

/// Maps a compound assignment token to its operator.
const fn assign_operator(token: &Token) -> Option<AssignOperator> {
    match token {
        Token::PlusAssign => Some(AssignOperator::Add),
        Token::MinusAssign => Some(AssignOperator::Sub),
        Token::StarAssign => Some(AssignOperator::Mul),
        Token::SlashAssign => Some(AssignOperator::Div),
        Token::LeftShiftAssign => Some(AssignOperator::LeftShift),
        Token::RightShiftAssign => Some(AssignOperator::RightShift),
        _ => None,
    }
}

/// Parses a compound assignment such as `x += 2`.
///
/// Speculative: when the variable is not followed by a compound assignment
/// operator, the cursor is restored and `None` is returned, so the caller can
/// try to read the same tokens as an expression.
///
/// Grammar: `binary_assign := variable ("+=" | "-=" | "*=" | "/=" | "<<=" |
/// ">>=") expression`
///
/// # Errors
/// Returns `MissingSecondOperand` when the operator has no right-hand side.
pub fn parse_binary_assign(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    let scope = reader.create_scope();

    let Some(variable) = parse_variable(reader) else {
        reader.rollback(scope);
        return Ok(None);
    };
    let Some((token, operator)) = reader.peek()
                                       .and_then(|token| Some((token, assign_operator(token)?)))
    else {
        reader.rollback(scope);
        return Ok(None);
    };
    reader.check(token);
    reader.commit(scope);

    let value = parse_expression(reader)?;
    let value = second_operand(value, reader, operator.symbol())?;
    Ok(Some(Expression::Assign(Assign::new(operator, variable, value))))
}

/// Parses a definition written with `:=`, such as `x := 2` or
/// `f(x) := x ^ 2`.
///
/// Speculative up to the `:=` token.
///
/// # Errors
/// - `MissingSecondOperand` when `:=` has no right-hand side.
/// - `InvalidExpression` when a built-in function is redefined.
pub fn parse_assign(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    let scope = reader.create_scope();

    let key = match parse_assignment_key(reader)? {
        Some(key) if reader.check(&Token::Assign) => key,
        _ => {
            reader.rollback(scope);
            return Ok(None);
        },
    };
    reader.commit(scope);

    let value = parse_expression(reader)?;
    let value = second_operand(value, reader, ":=")?;
    let define = Define::new(key, value).map_err(invalid(reader))?;
    Ok(Some(Expression::Define(define)))
}

/// Parses `def(key, value)`.
///
/// # Errors
/// Any missing piece after the `def` keyword is a hard error.
pub fn parse_def(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    if !reader.check(&Token::Define) {
        return Ok(None);
    }
    open_parenthesis(reader, "def")?;

    let key = parse_assignment_key(reader)?;
    let key = required(key, reader, "def")?;
    comma(reader, "def")?;

    let value = parse_expression(reader)?;
    let value = required(value, reader, "def")?;
    close_parenthesis(reader, "def")?;

    let define = Define::new(key, value).map_err(invalid(reader))?;
    Ok(Some(Expression::Define(define)))
}

/// Parses `undef(key)`.
pub fn parse_undef(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    if !reader.check(&Token::Undefine) {
        return Ok(None);
    }
    open_parenthesis(reader, "undef")?;

    let key = parse_assignment_key(reader)?;
    let key = required(key, reader, "undef")?;
    close_parenthesis(reader, "undef")?;

    let undefine = Undefine::new(key).map_err(invalid(reader))?;
    Ok(Some(Expression::Undefine(undefine)))
}

/// Parses `if(condition, then)` or `if(condition, then, else)`.
///
/// The condition is a `||` chain, so it cannot itself be an assignment or a
/// ternary without parentheses.
pub fn parse_if(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    if !reader.check(&Token::If) {
        return Ok(None);
    }
    open_parenthesis(reader, "if")?;

    let condition = parse_conditional_or(reader)?;
    let condition = required(condition, reader, "if")?;
    comma(reader, "if")?;

    let then = parse_expression(reader)?;
    let then = required(then, reader, "if")?;

    let otherwise = if reader.check(&Token::Comma) {
        let otherwise = parse_expression(reader)?;
        Some(required(otherwise, reader, "if")?)
    } else {
        None
    };
    close_parenthesis(reader, "if")?;

    Ok(Some(Expression::Conditional(Conditional::new(condition, then, otherwise))))
}

/// Parses `for(body, init, condition, iteration)`.
pub fn parse_for(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    if !reader.check(&Token::For) {
        return Ok(None);
    }
    open_parenthesis(reader, "for")?;

    let body = parse_statement(reader)?;
    let body = required(body, reader, "for")?;
    comma(reader, "for")?;

    let init = parse_statement(reader)?;
    let init = required(init, reader, "for")?;
    comma(reader, "for")?;

    let condition = parse_conditional_or(reader)?;
    let condition = required(condition, reader, "for")?;
    comma(reader, "for")?;

    let iteration = parse_statement(reader)?;
    let iteration = required(iteration, reader, "for")?;
    close_parenthesis(reader, "for")?;

    Ok(Some(Expression::For(ForLoop::new(body, init, condition, iteration))))
}

/// Parses `while(body, condition)`.
pub fn parse_while(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    if !reader.check(&Token::While) {
        return Ok(None);
    }
    open_parenthesis(reader, "while")?;

    let body = parse_statement(reader)?;
    let body = required(body, reader, "while")?;
    comma(reader, "while")?;

    let condition = parse_conditional_or(reader)?;
    let condition = required(condition, reader, "while")?;
    close_parenthesis(reader, "while")?;

    Ok(Some(Expression::While(WhileLoop::new(body, condition))))
}

/// Parses the key of a definition: a function declaration or a variable.
fn parse_assignment_key(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    if let Some(declaration) = parse_function_declaration(reader)? {
        return Ok(Some(declaration));
    }
    Ok(parse_variable(reader).map(Expression::Variable))
}

/// Parses a function declaration `f(x, y)` whose parameters are variables.
///
/// Speculative: a call with anything other than plain variables as arguments
/// restores the cursor and yields `None`.
///
/// Grammar: `declaration := identifier "(" [ variable ("," variable)* ] ")"`
fn parse_function_declaration(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    let scope = reader.create_scope();

    let Some(name) = reader.identifier() else {
        reader.rollback(scope);
        return Ok(None);
    };
    if !reader.check(&Token::LParen) {
        reader.rollback(scope);
        return Ok(None);
    }

    let mut parameters = Vec::new();
    if let Some(first) = parse_variable(reader) {
        parameters.push(Expression::Variable(first));
        while reader.check(&Token::Comma) {
            let Some(parameter) = parse_variable(reader) else {
                reader.rollback(scope);
                return Ok(None);
            };
            parameters.push(Expression::Variable(parameter));
        }
    }

    if !reader.check(&Token::RParen) {
        reader.rollback(scope);
        return Ok(None);
    }
    reader.commit(scope);

    create_function(reader, name, parameters).map(Some)
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
    fn assignments_restore_cursor_on_plain_expressions() {
        assert_eq!(attempt(parse_binary_assign, "x + 1"), (None, 0, 0));
        assert_eq!(attempt(parse_assign, "x + 1"), (None, 0, 0));
        assert_eq!(attempt(parse_assign, "f(2) + 1"), (None, 0, 0));
        // the declaration matches, the missing `:=` undoes it
        assert_eq!(attempt(parse_assign, "f(x) + 1"), (None, 0, 0));
    }

    #[test]
    fn declaration_restores_cursor_on_calls() {
        assert_eq!(attempt(parse_function_declaration, "f(2)"), (None, 0, 0));
        assert_eq!(attempt(parse_function_declaration, "f(x, 2)"), (None, 0, 0));
        assert_eq!(attempt(parse_function_declaration, "f(x"), (None, 0, 0));
        assert_eq!(attempt(parse_function_declaration, "x"), (None, 0, 0));

        let (declaration, position, scopes) = attempt(parse_function_declaration, "f(x, y)");
        assert!(matches!(declaration, Some(Expression::UserFunction(_))));
        assert_eq!((position, scopes), (6, 0));
    }

    #[test]
    fn definition_commits_at_assign_token() {
        let (definition, position, scopes) = attempt(parse_assign, "f(x) := x ^ 2");
        assert!(matches!(definition, Some(Expression::Define(_))));
        assert_eq!((position, scopes), (8, 0));
    }
}
