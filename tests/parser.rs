use mathtree::{
    ast::{AssignOperator, BinaryOperator, BuiltinFunction, Expression, UserFunctionCall},
    error::{ExpressionError, ParseError},
    interpreter::{
        lexer::{Token, tokenize},
        parser::core::{DEFAULT_MAX_DEPTH, ParserOptions, parse, parse_with_options},
        token_reader::TokenReader,
        value::angle::AngleValue,
    },
};
use pretty_assertions::assert_eq;

fn num(value: f64) -> Expression {
    Expression::number(value)
}

fn var(name: &str) -> Expression {
    Expression::variable(name)
}

fn tree(source: &str) -> Expression {
    parse(source).unwrap_or_else(|e| panic!("{source}: {e}"))
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_eq!(tree("1 + 2 * 3"), Expression::add(num(1.0), Expression::mul(num(2.0), num(3.0))));
    assert_eq!(tree("(1 + 2) * 3"), Expression::mul(Expression::add(num(1.0), num(2.0)), num(3.0)));
}

#[test]
fn subtraction_is_left_associative() {
    assert_eq!(tree("1 - 2 - 3"), Expression::sub(Expression::sub(num(1.0), num(2.0)), num(3.0)));
}

#[test]
fn power_is_right_associative() {
    assert_eq!(tree("2^3^2"), Expression::pow(num(2.0), Expression::pow(num(3.0), num(2.0))));
    assert_eq!(tree("2^-x"), Expression::pow(num(2.0), Expression::negate(var("x"))));
}

#[test]
fn implicit_multiplication_binds_power_first() {
    assert_eq!(tree("2x^2"), Expression::mul(num(2.0), Expression::pow(var("x"), num(2.0))));
    assert_eq!(tree("-2x"), Expression::mul(Expression::negate(num(2.0)), var("x")));
    assert_eq!(tree("2(x + 1)"), Expression::mul(num(2.0), Expression::add(var("x"), num(1.0))));
    let sine = Expression::call(BuiltinFunction::Sin, var("x")).unwrap();
    assert_eq!(tree("3sin(x)"), Expression::mul(num(3.0), sine));
}

#[test]
fn prefix_minus_applies_after_power() {
    assert_eq!(tree("-2^2"), Expression::negate(Expression::pow(num(2.0), num(2.0))));
    assert_eq!(tree("- -x"), Expression::negate(Expression::negate(var("x"))));
}

#[test]
fn calls_and_products_are_told_apart() {
    assert_eq!(tree("f(x)"),
               Expression::UserFunction(UserFunctionCall::new("f", vec![var("x")])));
    assert_eq!(tree("2(x)"), Expression::mul(num(2.0), var("x")));
}

#[test]
fn statements_backtrack_to_expressions() {
    assert!(matches!(tree("x := 2"), Expression::Define(_)));
    assert!(matches!(tree("f(x) := x"), Expression::Define(_)));
    assert_eq!(tree("x + 2"), Expression::add(var("x"), num(2.0)));
    assert_eq!(tree("x < 2"), Expression::binary(BinaryOperator::LessThan, var("x"), num(2.0)));
    match tree("x <<= 2") {
        Expression::Assign(assign) => assert_eq!(assign.operator(), AssignOperator::LeftShift),
        other => panic!("expected an assignment, got {other:?}"),
    }
}

#[test]
fn keyword_operators() {
    assert_eq!(tree("a and b or c"),
               Expression::binary(BinaryOperator::Or,
                                  Expression::binary(BinaryOperator::And, var("a"), var("b")),
                                  var("c")));
    assert_eq!(tree("7 mod 2"), Expression::binary(BinaryOperator::Mod, num(7.0), num(2.0)));
    assert_eq!(tree("not a"), Expression::not(var("a")));
}

#[test]
fn ternary_and_if() {
    let ternary = tree("x > 0 ? 1 : 2");
    let call = tree("if(x > 0, 1, 2)");
    assert_eq!(ternary, call);
}

#[test]
fn vectors_and_matrices() {
    assert_eq!(tree("{1, 2}"), Expression::vector(vec![num(1.0), num(2.0)]).unwrap());
    let rows = vec![vec![num(1.0), num(2.0)], vec![num(3.0), num(4.0)]];
    assert_eq!(tree("{{1, 2}, {3, 4}}"), Expression::matrix(rows).unwrap());
}

#[test]
fn syntax_errors() {
    assert_eq!(parse(""), Err(ParseError::EmptyInput));
    assert_eq!(parse("   "), Err(ParseError::EmptyInput));
    assert!(matches!(parse("1 +"), Err(ParseError::MissingSecondOperand { .. })));
    assert!(matches!(parse("(1"), Err(ParseError::MissingCloseParenthesis { .. })));
    assert!(matches!(parse("1 2"), Err(ParseError::TrailingTokens { .. })));
    assert!(matches!(parse("1 ? 2"), Err(ParseError::MissingColon { .. })));
    assert!(matches!(parse("1∠90"), Err(ParseError::MissingDegreeSymbol { .. })));
    assert!(matches!(parse("1 # 2"), Err(ParseError::UnexpectedToken { .. })));
    assert!(matches!(parse("if(true 1)"), Err(ParseError::MissingComma { .. })));
}

#[test]
fn invalid_constructs() {
    assert!(matches!(parse("sin(1, 2)"),
                     Err(ParseError::InvalidExpression { source:
                                                             ExpressionError::ParameterCount { .. },
                                                         .. })));
    assert!(matches!(parse("{{1, 2}, {3}}"),
                     Err(ParseError::InvalidExpression { source:
                                                             ExpressionError::InvalidMatrix { .. },
                                                         .. })));
    assert!(matches!(parse("sin(x) := x"), Err(ParseError::InvalidExpression { .. })));
}

#[test]
fn error_positions_are_byte_offsets() {
    assert_eq!(parse("1 + 2 )"),
               Err(ParseError::TrailingTokens { token:    ")".to_string(),
                                                position: 6, }));
}

#[test]
fn deep_nesting_is_rejected() {
    let source = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
    let result = std::thread::Builder::new().stack_size(32 * 1024 * 1024)
                                            .spawn(move || parse(&source))
                                            .unwrap()
                                            .join()
                                            .unwrap();
    assert!(matches!(result, Err(ParseError::NestingTooDeep { max_depth: DEFAULT_MAX_DEPTH, .. })));
}

#[test]
fn moderate_nesting_is_accepted() {
    let source = format!("{}1{}", "(".repeat(30), ")".repeat(30));
    assert_eq!(parse(&source), Ok(num(1.0)));
}

#[test]
fn nesting_limit_is_configurable() {
    // a statement, then an expression and a prefix level per parenthesis
    let options = ParserOptions { max_depth: 8 };
    assert!(parse_with_options("((1))", options).is_ok());
    assert!(matches!(parse_with_options("((((1))))", options),
                     Err(ParseError::NestingTooDeep { max_depth: 8, .. })));
}

#[test]
fn token_reader_scopes_nest() {
    let tokens = tokenize("a + b").unwrap();
    let mut reader = TokenReader::new(&tokens);

    let outer = reader.create_scope();
    assert_eq!(reader.identifier(), Some("a"));
    let inner = reader.create_scope();
    assert!(reader.check(&Token::Plus));
    assert_eq!(reader.open_scopes(), 2);
    reader.commit(inner);
    assert_eq!(reader.position(), 2);
    reader.rollback(outer);

    assert_eq!(reader.position(), 0);
    assert_eq!(reader.open_scopes(), 0);
}

#[test]
fn token_reader_rollback_discards_abandoned_scopes() {
    let tokens = tokenize("1 2 3").unwrap();
    let mut reader = TokenReader::new(&tokens);

    let outer = reader.create_scope();
    reader.number();
    let _abandoned = reader.create_scope();
    reader.number();
    reader.rollback(outer);

    assert_eq!(reader.open_scopes(), 0);
    assert_eq!(reader.number(), Some(1.0));
}

#[test]
fn lexer_keywords_win_over_identifiers() {
    let tokens = tokenize("if iff deg model").unwrap()
                                              .into_iter()
                                              .map(|(token, _)| token)
                                              .collect::<Vec<_>>();
    assert_eq!(tokens,
               vec![Token::If,
                    Token::Identifier("iff".to_string()),
                    Token::DegreeKeyword,
                    Token::Identifier("model".to_string())]);
}

#[test]
fn unit_words_are_suffixes_not_variables() {
    assert_eq!(tree("2deg"), Expression::Angle(AngleValue::degree(2.0)));
    assert_eq!(tree("2 rad * x"),
               Expression::mul(Expression::Angle(AngleValue::radian(2.0)), var("x")));
    assert!(parse("deg := 1").is_err());
}
