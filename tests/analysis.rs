use std::collections::HashSet;

use mathtree::{
    analyzer::{
        formatter::Formatter,
        type_analyzer::{ResultType, TypeAnalyzer},
    },
    ast::{BinaryOperator, BuiltinFunction, Expression, NodeKind, Polar},
    calculate,
    error::{ExpressionError, TypeAnalyzerError},
    interpreter::{evaluator::core::ExpressionParameters, parser::core::parse, value::core::Value},
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn tree(source: &str) -> Expression {
    parse(source).unwrap_or_else(|e| panic!("{source}: {e}"))
}

fn result_type(source: &str) -> Result<ResultType, TypeAnalyzerError> {
    tree(source).accept(&mut TypeAnalyzer::new())
}

#[test]
fn literal_types() {
    assert_eq!(result_type("1 + 2"), Ok(ResultType::Number));
    assert_eq!(result_type("true && false"), Ok(ResultType::Boolean));
    assert_eq!(result_type("2∠45°"), Ok(ResultType::ComplexNumber));
    assert_eq!(result_type("30° + 1"), Ok(ResultType::Angle));
    assert_eq!(result_type("\"a\" + 1"), Ok(ResultType::String));
    assert_eq!(result_type("{1, 2} * 3"), Ok(ResultType::Vector));
    assert_eq!(result_type("{{1, 2}, {3, 4}} * {{1, 0}, {0, 1}}"), Ok(ResultType::Matrix));
    assert_eq!(result_type("deriv(x^2)"), Ok(ResultType::Function));
    assert_eq!(result_type("while(x++, x < 3)"), Ok(ResultType::Empty));
    assert_eq!(result_type("x := 2"), Ok(ResultType::String));
}

#[test]
fn variables_make_types_undefined() {
    assert_eq!(result_type("x + 1"), Ok(ResultType::Undefined));
    assert_eq!(result_type("-x"), Ok(ResultType::Undefined));
    assert_eq!(result_type("f(2)"), Ok(ResultType::Undefined));
}

#[test]
fn variables_keep_types_that_cannot_vary() {
    assert_eq!(result_type("x < 1"), Ok(ResultType::Boolean));
    assert_eq!(result_type("x!"), Ok(ResultType::Number));
    assert_eq!(result_type("det(m)"), Ok(ResultType::Number));
    assert_eq!(result_type("tohex(n)"), Ok(ResultType::String));
    assert_eq!(result_type("x += 1"), Ok(ResultType::Number));
    assert_eq!(result_type("x += \"a\""), Ok(ResultType::String));
    assert_eq!(result_type("x++"), Ok(ResultType::Number));
}

#[test]
fn powers_and_roots_of_unknown_sign_may_be_complex() {
    assert_eq!(result_type("2 ^ 3"), Ok(ResultType::Number));
    assert_eq!(result_type("(1 - 5) ^ 2"), Ok(ResultType::Number));
    assert_eq!(result_type("2 ^ 0.5"), Ok(ResultType::Number));
    assert_eq!(result_type("(1 - 5) ^ 0.5"), Ok(ResultType::Undefined));
    assert_eq!(result_type("sqrt(4)"), Ok(ResultType::Number));
    assert_eq!(result_type("sqrt(-4)"), Ok(ResultType::Undefined));
    assert_eq!(result_type("ln(2 - 3)"), Ok(ResultType::Undefined));
    assert_eq!(result_type("root(8, 3)"), Ok(ResultType::Number));

    let mut parameters = ExpressionParameters::new();
    assert!(matches!(calculate("(1 - 5) ^ 0.5", &mut parameters), Ok(Value::Complex(_))));
    assert!(matches!(calculate("sqrt(-4)", &mut parameters), Ok(Value::Complex(_))));
}

#[test]
fn variables_can_be_assumed_numbers() {
    let mut analyzer = TypeAnalyzer::with_variables(ResultType::Number);
    assert_eq!(tree("x * y + 1").accept(&mut analyzer), Ok(ResultType::Number));
    assert_eq!(tree("x ^ 2").accept(&mut analyzer), Ok(ResultType::Number));
    assert_eq!(tree("x ^ y").accept(&mut analyzer), Ok(ResultType::Undefined));
    assert_eq!(tree("f(x)").accept(&mut analyzer), Ok(ResultType::Undefined));
}

fn binary_mismatch(operator: BinaryOperator,
                   left: ResultType,
                   right: ResultType)
                   -> TypeAnalyzerError {
    TypeAnalyzerError::BinaryParameterTypeMismatch { operator,
                                                     left,
                                                     right }
}

fn argument_mismatch(function: BuiltinFunction,
                     index: usize,
                     actual: ResultType)
                     -> TypeAnalyzerError {
    TypeAnalyzerError::DifferentParameterTypeMismatch { function,
                                                        index,
                                                        actual }
}

#[test]
fn impossible_operands_are_rejected() {
    assert_eq!(result_type("true + false"),
               Err(binary_mismatch(BinaryOperator::Add, ResultType::Boolean, ResultType::Boolean)));
    assert_eq!(result_type("x < true"),
               Err(binary_mismatch(BinaryOperator::LessThan,
                                   ResultType::Undefined,
                                   ResultType::Boolean)));
    assert_eq!(result_type("sin(\"a\")"),
               Err(argument_mismatch(BuiltinFunction::Sin, 0, ResultType::String)));
    assert_eq!(result_type("dotproduct({1, 2}, 3)"),
               Err(argument_mismatch(BuiltinFunction::DotProduct, 1, ResultType::Number)));
    assert_eq!(result_type("if(1, 2, 3)"),
               Err(TypeAnalyzerError::ParameterTypeMismatch { kind:   NodeKind::Conditional,
                                                              actual: ResultType::Number, }));
    assert!(result_type("{true, 1}").is_err());
    assert!(result_type("\"a\"!").is_err());
}

#[test]
fn conditional_branches_must_agree() {
    assert_eq!(result_type("x > 1 ? 2 : 3"), Ok(ResultType::Number));
    assert_eq!(result_type("x > 1 ? 2 : \"b\""), Ok(ResultType::Undefined));
    assert_eq!(result_type("if(x > 1, 2)"), Ok(ResultType::Undefined));
}

#[test]
fn type_errors_read_well() {
    let error = result_type("true + false").unwrap_err();
    assert_eq!(error.to_string(), "Operator '+' does not accept boolean and boolean.");
}

#[test]
fn formatter_inserts_only_needed_parentheses() {
    let cases = [("1 + 2 * 3", "1 + 2 * 3"),
                 ("(1 + 2) * 3", "(1 + 2) * 3"),
                 ("1 - (2 - 3)", "1 - (2 - 3)"),
                 ("(1 - 2) - 3", "1 - 2 - 3"),
                 ("2^3^2", "2 ^ 3 ^ 2"),
                 ("(2^3)^2", "(2 ^ 3) ^ 2"),
                 ("-x^2", "-x ^ 2"),
                 ("(-x)^2", "(-x) ^ 2"),
                 ("2x", "2 * x"),
                 ("(x + 1)!", "(x + 1)!"),
                 ("a && (b || c)", "a && (b || c)"),
                 ("if(x > 0, 1, 2)", "x > 0 ? 1 : 2"),
                 ("if(x > 0, 1)", "if(x > 0, 1)"),
                 ("f(x) := x ^ 2", "f(x) := x ^ 2"),
                 ("x += 2", "x += 2"),
                 ("{{1, 2}, {3, 4}}", "{{1, 2}, {3, 4}}"),
                 ("max(1, 2, 3)", "max(1, 2, 3)"),
                 ("\"text\"", "\"text\""),
                 ("30°", "30°"),
                 ("3∠10°", "3∠10°"),
                 ("+2∠-45°", "2∠-45°")];
    for (source, expected) in cases {
        let formatted = tree(source).accept(&mut Formatter::new());
        assert_eq!(formatted, Ok(expected.to_string()), "{source}");
    }
}

#[test]
fn formatted_text_parses_back() {
    for source in ["1 - (2 - 3)",
                   "2 ^ -x",
                   "- -x",
                   "x - -3",
                   "not (a && b)",
                   "x > 0 ? (y > 0 ? 1 : 2) : 3",
                   "for(s += k, k := 1, k <= 3, k++)",
                   "while(n--, n > 0)",
                   "undef(f(x))",
                   "3∠10° * x",
                   "-(1∠90°)"]
    {
        let original = tree(source);
        assert_eq!(tree(&original.to_string()), original, "{source} -> {original}");
    }
}

#[test]
fn structural_equality_and_hashing() {
    assert_eq!(tree("x + 1"), tree("x+1"));
    assert_ne!(tree("x + 1"), tree("1 + x"));

    let set = ["x * 2", "x*2", "(x * 2)", "2x"].into_iter()
                                               .map(tree)
                                               .collect::<HashSet<_>>();
    assert_eq!(set.len(), 2);
}

#[test]
fn clone_with_replaces_selected_children() {
    let original = tree("f(x, y)");
    let copy = original.clone_with(vec![None, Some(Expression::number(3.0))]).unwrap();
    assert_eq!(copy, tree("f(x, 3)"));
    assert_eq!(original, tree("f(x, y)"));

    assert_eq!(original.clone_with(vec![None]),
               Err(ExpressionError::ChildCount { kind:     NodeKind::UserFunction,
                                                 expected: 2,
                                                 found:    1, }));
}

#[test]
fn construction_invariants() {
    let ragged = vec![vec![Expression::number(1.0)],
                      vec![Expression::number(2.0), Expression::number(3.0)]];
    assert!(matches!(Expression::matrix(ragged), Err(ExpressionError::InvalidMatrix { .. })));
    assert!(matches!(Expression::function(BuiltinFunction::Log, vec![Expression::number(1.0)]),
                     Err(ExpressionError::ParameterCount { .. })));
    assert!(matches!(Expression::vector(Vec::new()), Err(ExpressionError::EmptyVector)));
}

fn formula() -> impl Strategy<Value = Expression> {
    let number = (0u8..=9).prop_map(|n| Expression::number(f64::from(n)));
    let variable = prop::sample::select(vec!["x", "y", "z"]).prop_map(|name| {
                                                                Expression::variable(name)
                                                            });
    // quarter magnitudes and tenth-degree phases
    let complex = (0u16..=500, -3600i16..=3600).prop_map(|(magnitude, phase)| {
                      let polar = Polar::new(f64::from(magnitude) / 4.0, f64::from(phase) / 10.0);
                      Expression::Complex(polar)
                  });
    let leaf = prop_oneof![number, variable, complex];
    leaf.prop_recursive(5, 48, 2, |inner| {
            let operators = prop::sample::select(vec![BinaryOperator::Add,
                                                      BinaryOperator::Sub,
                                                      BinaryOperator::Mul,
                                                      BinaryOperator::Div,
                                                      BinaryOperator::Pow,
                                                      BinaryOperator::Mod,
                                                      BinaryOperator::LessThan,
                                                      BinaryOperator::Equal,
                                                      BinaryOperator::ConditionalAnd,
                                                      BinaryOperator::LeftShift]);
            let binary = (operators, inner.clone(), inner.clone()).prop_map(|(op, a, b)| {
                                                                    Expression::binary(op, a, b)
                                                                });
            prop_oneof![binary,
                        inner.clone().prop_map(Expression::negate),
                        inner.clone().prop_map(Expression::not),
                        inner.clone().prop_map(Expression::factorial),
                        inner.prop_map(|a| Expression::call(BuiltinFunction::Cos, a).unwrap()),]
        })
}

proptest! {
    #[test]
    fn formatting_round_trips(expression in formula()) {
        let text = expression.to_string();
        let parsed = parse(&text);
        prop_assert_eq!(parsed, Ok(expression), "{}", text);
    }
}
