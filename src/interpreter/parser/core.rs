use crate::{
    ast::Expression,
    error::ParseError,
    interpreter::{
        lexer::tokenize,
        parser::{
            binary::parse_ternary,
            statement::{
                parse_assign, parse_binary_assign, parse_def, parse_for, parse_if, parse_undef,
                parse_while,
            },
            utils::{nested, unexpected},
        },
        token_reader::TokenReader,
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Nesting limit used by [`parse`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// How deeply statements, expressions and prefix operators may nest
    /// before the parse fails with [`ParseError::NestingTooDeep`].
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

/// Parses a formula with the default options.
///
/// # Errors
/// Returns a [`ParseError`] for empty input, unknown characters, malformed
/// syntax, trailing tokens or invalid constructs.
///
/// # Example
/// ```
/// use mathtree::{ast::Expression, interpreter::parser::core::parse};
///
/// let tree = parse("2 + 3 * 4").unwrap();
/// assert_eq!(tree,
///            Expression::add(Expression::number(2.0),
///                            Expression::mul(Expression::number(3.0), Expression::number(4.0))));
/// ```
pub fn parse(text: &str) -> ParseResult<Expression> {
    parse_with_options(text, ParserOptions::default())
}

/// Parses a formula.
///
/// The whole input must form exactly one statement.
///
/// # Parameters
/// - `text`: The formula.
/// - `options`: Parser limits.
///
/// # Returns
/// The root of the expression tree.
///
/// # Errors
/// - `EmptyInput` for empty or whitespace-only text.
/// - `TrailingTokens` if tokens remain after the statement.
/// - Any lexical or syntax error of the statement itself.
pub fn parse_with_options(text: &str, options: ParserOptions) -> ParseResult<Expression> {
    if text.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let tokens = tokenize(text)?;
    let mut reader = TokenReader::with_max_depth(&tokens, options.max_depth);

    let Some(expression) = parse_statement(&mut reader)? else {
        return Err(unexpected(&reader, "statement"));
    };
    if let Some(token) = reader.peek() {
        return Err(ParseError::TrailingTokens { token:    token.to_string(),
                                                position: reader.offset(), });
    }

    log::trace!("parsed {text:?} into {expression:?}");
    Ok(expression)
}

/// Parses a statement.
///
/// Statements are tried in order; the first production that matches wins.
///
/// Grammar:
/// ```text
///     statement := binary_assign | assign | def | undef
///                | if | for | while | expression
/// ```
pub fn parse_statement(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    nested(reader, |reader| {
        if let Some(statement) = parse_binary_assign(reader)? {
            return Ok(Some(statement));
        }
        if let Some(statement) = parse_assign(reader)? {
            return Ok(Some(statement));
        }
        if let Some(statement) = parse_def(reader)? {
            return Ok(Some(statement));
        }
        if let Some(statement) = parse_undef(reader)? {
            return Ok(Some(statement));
        }
        if let Some(statement) = parse_if(reader)? {
            return Ok(Some(statement));
        }
        if let Some(statement) = parse_for(reader)? {
            return Ok(Some(statement));
        }
        if let Some(statement) = parse_while(reader)? {
            return Ok(Some(statement));
        }
        parse_expression(reader)
    })
}

/// Parses an expression: a compound assignment or a ternary chain.
///
/// Grammar: `expression := binary_assign | ternary`
pub fn parse_expression(reader: &mut TokenReader<'_>) -> ParseResult<Option<Expression>> {
    nested(reader, |reader| {
        if let Some(assign) = parse_binary_assign(reader)? {
            return Ok(Some(assign));
        }
        parse_ternary(reader)
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn statement_leaves_cursor_alone_when_nothing_matches() {
        for source in [")", "-)", "+ ,"] {
            let tokens = tokenize(source).unwrap();
            let mut reader = TokenReader::new(&tokens);
            assert_eq!(parse_statement(&mut reader), Ok(None), "{source}");
            assert_eq!((reader.position(), reader.open_scopes()), (0, 0), "{source}");
        }
    }

    #[test]
    fn statement_consumes_what_it_parses() {
        let tokens = tokenize("x += 1 )").unwrap();
        let mut reader = TokenReader::new(&tokens);
        assert!(matches!(parse_statement(&mut reader), Ok(Some(Expression::Assign(_)))));
        assert_eq!((reader.position(), reader.open_scopes()), (3, 0));
    }
}
