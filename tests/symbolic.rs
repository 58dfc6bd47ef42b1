use mathtree::{
    analyzer::{
        differentiator::differentiate,
        simplifier::{simplify, simplify_numeric},
    },
    ast::{BinaryOperator, BuiltinFunction, Expression, NodeKind},
    error::DifferentiationError,
    interpreter::{
        evaluator::core::ExpressionParameters,
        parser::core::parse,
        value::{complex::ComplexNumber, core::Value},
    },
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn tree(source: &str) -> Expression {
    parse(source).unwrap_or_else(|e| panic!("{source}: {e}"))
}

/// Evaluates `expression` with `x` and `y` bound.
fn evaluate_at(expression: &Expression, x: f64, y: f64) -> Option<f64> {
    let mut parameters = ExpressionParameters::without_constants();
    parameters.set("x", x).ok()?;
    parameters.set("y", y).ok()?;
    match expression.execute(&mut parameters) {
        Ok(Value::Number(value)) => Some(value),
        _ => None,
    }
}

fn close(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance * (1.0 + a.abs().max(b.abs()))
}

fn derivative(source: &str) -> Expression {
    simplify_numeric(&differentiate(&tree(source), "x").unwrap())
}

#[test]
fn polynomial_derivatives() {
    init();
    assert_eq!(derivative("x^2"), tree("2 * x"));
    assert_eq!(derivative("3x"), tree("3"));
    assert_eq!(derivative("x^3 + 5"), tree("3 * x ^ 2"));
    assert_eq!(derivative("y * x"), tree("y"));
}

#[test]
fn chain_rule() {
    init();
    assert_eq!(derivative("sin(x)"), tree("cos(x)"));
    assert_eq!(derivative("sin(2x)"), tree("2 * cos(2 * x)"));
    assert_eq!(derivative("cos(x)"), tree("-sin(x)"));
    assert_eq!(derivative("ln(x)"), tree("1 / x"));
    assert_eq!(derivative("exp(x)"), tree("exp(x)"));
}

#[test]
fn exponential_and_logarithmic_rules() {
    init();
    assert_eq!(derivative("2^x"), Expression::mul(tree("2 ^ x"), Expression::number(2f64.ln())));
    let self_power = derivative("x^x");
    let expected = (1.3f64.ln() + 1.0) * 1.3f64.powf(1.3);
    assert!(close(evaluate_at(&self_power, 1.3, 0.0).unwrap(), expected, 1e-12));
}

#[test]
fn unsupported_nodes_report_their_kind() {
    let kind = NodeKind::Binary(BinaryOperator::LessThan);
    assert_eq!(differentiate(&tree("x < 1"), "x"),
               Err(DifferentiationError::NotSupported { kind }));
    let kind = NodeKind::Function(BuiltinFunction::Round);
    assert_eq!(differentiate(&tree("round(x)"), "x"),
               Err(DifferentiationError::NotSupported { kind }));
    // not mentioning the variable is enough for a derivative of zero
    assert_eq!(differentiate(&tree("y < 1"), "x"), Ok(Expression::number(0.0)));
}

#[test]
fn simplifier_folds_and_removes_neutral_elements() {
    init();
    assert_eq!(simplify(&tree("2 + 3 * 4")), Expression::number(14.0));
    assert_eq!(simplify(&tree("x * 1 - 0")), tree("x"));
    assert_eq!(simplify(&tree("1 * x / 1")), tree("x"));
    assert_eq!(simplify(&tree("0 - x")), tree("-x"));
    assert_eq!(simplify(&tree("not not (x > 1)")), tree("x > 1"));
    assert_eq!(simplify(&tree("1 < 2")), Expression::bool(true));
    assert_eq!(simplify(&tree("sin(0) + 2 ^ 1")), Expression::number(2.0));
}

#[test]
fn numeric_identities_need_numbers() {
    init();
    assert_eq!(simplify(&tree("0 + x * 1")), tree("0 + x"));
    assert_eq!(simplify(&tree("x ^ 0 + y ^ 1")), tree("x ^ 0 + y ^ 1"));
    assert_eq!(simplify(&tree("sin(0) + x")), tree("0 + x"));
    assert_eq!(simplify(&tree("x * 0")), tree("x * 0"));
    assert_eq!(simplify(&tree("(x < 1 ? 2 : 3) * 0")), Expression::number(0.0));

    assert_eq!(simplify_numeric(&tree("0 + x * 1")), tree("x"));
    assert_eq!(simplify_numeric(&tree("x ^ 0 + y ^ 1")), tree("1 + y"));
    assert_eq!(simplify_numeric(&tree("sin(0) + x")), tree("x"));
    // sqrt of a negative number is complex
    assert_eq!(simplify_numeric(&tree("sqrt(x) * 0")), tree("sqrt(x) * 0"));
}

/// Checks that simplifying `source` keeps its value with `x` bound to
/// `value`.
fn assert_same_value(source: &str, value: Value) {
    let original = tree(source);
    let simplified = simplify(&original);
    let evaluate = |expression: &Expression| {
        let mut parameters = ExpressionParameters::new();
        parameters.set("x", value.clone()).unwrap();
        expression.execute(&mut parameters)
    };
    let expected = evaluate(&original);
    if expected.is_ok() {
        assert_eq!(evaluate(&simplified), expected, "{source} became {simplified}");
    }
}

#[test]
fn simplify_keeps_values_of_any_type() {
    init();
    let values = [Value::from("a"),
                  Value::from(vec![1.0, 2.0]),
                  Value::Complex(ComplexNumber::new(1.0, 2.0)),
                  Value::Number(4.0)];
    for value in values {
        for source in ["x + 0", "0 + x", "x * 0", "0 * x", "x * 1", "1 * x", "x - 0", "x / 1",
                       "x ^ 1", "x ^ 0", "1 ^ x", "0 - x"]
        {
            assert_same_value(source, value.clone());
        }
    }
}

#[test]
fn simplifier_keeps_what_it_cannot_fold_soundly() {
    assert_eq!(simplify(&tree("1 / 0")), tree("1 / 0"));
    assert_eq!(simplify(&tree("sqrt(-4)")),
               Expression::call(BuiltinFunction::Sqrt, Expression::number(-4.0)).unwrap());
    assert_eq!(simplify(&tree("\"a\" + 0")), tree("\"a\" + 0"));
}

#[test]
fn simplifier_picks_literal_branches() {
    assert_eq!(simplify(&tree("if(1 < 2, x, y)")), tree("x"));
    assert_eq!(simplify(&tree("1 > 2 ? x : y - 0")), tree("y"));
    assert_eq!(simplify(&tree("if(1 > 2, x)")), tree("if(false, x)"));
}

fn arithmetic_tree(with_division: bool) -> impl Strategy<Value = Expression> {
    let leaf = prop_oneof![(0u8..=4).prop_map(|n| Expression::number(f64::from(n))),
                           prop::sample::select(vec!["x", "y"]).prop_map(|name| {
                                                                  Expression::variable(name)
                                                              }),];
    leaf.prop_recursive(4, 32, 2, move |inner| {
            let quotient = (inner.clone(), inner.clone()).prop_map(|(a, b)| Expression::div(a, b));
            let sum = (inner.clone(), inner.clone()).prop_map(|(a, b)| Expression::add(a, b));
            let difference =
                (inner.clone(), inner.clone()).prop_map(|(a, b)| Expression::sub(a, b));
            let product = (inner.clone(), inner.clone()).prop_map(|(a, b)| Expression::mul(a, b));
            let power = (inner.clone(), 1u8..=3).prop_map(|(a, n)| {
                                                    let exponent = f64::from(n);
                                                    Expression::pow(a, Expression::number(exponent))
                                                });
            let negation = inner.clone().prop_map(Expression::negate);
            let sine = inner.prop_map(|a| Expression::call(BuiltinFunction::Sin, a).unwrap());
            if with_division {
                prop_oneof![sum, difference, product, quotient, power, negation, sine].boxed()
            } else {
                prop_oneof![sum, difference, product, power, negation, sine].boxed()
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn simplify_is_idempotent(expression in arithmetic_tree(true)) {
        let once = simplify(&expression);
        prop_assert_eq!(simplify(&once), once);
    }

    #[test]
    fn simplify_preserves_finite_values(expression in arithmetic_tree(true)) {
        let Some(expected) = evaluate_at(&expression, 1.5, 2.5) else {
            return Ok(());
        };
        prop_assume!(expected.is_finite());
        let simplified = simplify(&expression);
        let actual = evaluate_at(&simplified, 1.5, 2.5);
        prop_assert!(actual.is_some_and(|actual| close(actual, expected, 1e-9)),
                     "{} = {} but {} = {:?}", expression, expected, simplified, actual);
    }

    #[test]
    fn derivative_matches_finite_difference(expression in arithmetic_tree(false)) {
        let x = 0.7;
        let h = 1e-6;
        let value = evaluate_at(&expression, x, 2.5);
        prop_assume!(value.is_some_and(|value| value.abs() < 1e3));

        let derived = differentiate(&expression, "x").unwrap();
        let exact = evaluate_at(&derived, x, 2.5).unwrap();
        // steep functions defeat the difference quotient
        prop_assume!(exact.abs() < 1e3);
        let simplified = evaluate_at(&simplify_numeric(&derived), x, 2.5).unwrap();
        let forward = evaluate_at(&expression, x + h, 2.5).unwrap();
        let backward = evaluate_at(&expression, x - h, 2.5).unwrap();
        let numeric = (forward - backward) / (2.0 * h);

        prop_assert!(close(exact, simplified, 1e-9), "{} vs {}", exact, simplified);
        prop_assert!(close(exact, numeric, 1e-4),
                     "d/dx {} = {} but the difference quotient is {}", expression, exact, numeric);
    }
}
