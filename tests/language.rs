use std::fs::{self};

use mathtree::{
    calculate,
    error::RuntimeError,
    interpreter::{evaluator::core::ExpressionParameters, value::core::Value},
};
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

#[test]
fn book_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("book/src").into_iter()
                                .filter_map(Result::ok)
                                .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (i, block) in extract_formula_blocks(&content).into_iter().enumerate() {
            count += 1;
            let mut parameters = ExpressionParameters::new();
            for formula in block.lines().filter(|line| !line.trim().is_empty()) {
                if let Err(e) = calculate(formula, &mut parameters) {
                    panic!("Formula example {} in {:?} failed:\n{}\nError: {}",
                           i + 1,
                           path,
                           formula,
                           e);
                }
            }
        }
    }

    assert!(count > 0, "No formula examples found in book/src");
}

fn extract_formula_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut inside = false;
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```formula") {
            inside = true;
            buf.clear();
            continue;
        }
        if inside && trimmed.starts_with("```") {
            inside = false;
            blocks.push(buf.clone());
            continue;
        }
        if inside {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    blocks
}

/// Runs every formula in one session and returns the last result.
fn run(formulas: &[&str]) -> Value {
    let mut parameters = ExpressionParameters::new();
    let mut last = Value::Empty;
    for formula in formulas {
        last = calculate(formula, &mut parameters).unwrap_or_else(|e| {
                                                      panic!("{formula} failed: {e}")
                                                  });
    }
    last
}

fn assert_value(src: &str, expected: impl Into<Value>) {
    assert_eq!(run(&[src]), expected.into(), "{src}");
}

fn assert_number(src: &str, expected: f64) {
    match run(&[src]) {
        Value::Number(actual) => {
            assert!((actual - expected).abs() < 1e-9, "{src}: expected {expected}, got {actual}");
        },
        other => panic!("{src}: expected a number, got {other:?}"),
    }
}

fn assert_failure(src: &str) {
    if calculate(src, &mut ExpressionParameters::new()).is_ok() {
        panic!("Formula succeeded but was expected to fail: {src}")
    }
}

#[test]
fn basic_arithmetic() {
    assert_value("1 + 2 * 3", 7.0);
    assert_value("(1 + 2) * 3", 9.0);
    assert_value("10 - 4 - 3", 3.0);
    assert_value("2 ^ 3 ^ 2", 512.0);
    assert_value("-2 ^ 2", -4.0);
    assert_value("7 % 4", 3.0);
    assert_value("7 mod 4", 3.0);
    assert_value("5!", 120.0);
}

#[test]
fn implicit_multiplication() {
    assert_value("2(3 + 4)", 14.0);
    let value = run(&["x := 3", "2x^2"]);
    assert_eq!(value, Value::Number(18.0));
    let value = run(&["x := 3", "-2x"]);
    assert_eq!(value, Value::Number(-6.0));
}

#[test]
fn number_notations() {
    assert_value("0xff + 1", 256.0);
    assert_value("0b101", 5.0);
    assert_value("0o17", 15.0);
    assert_value(".5 + 2.5e1", 25.5);
}

#[test]
fn logic_and_comparison() {
    assert_value("1 < 2 && 2 < 3", true);
    assert_value("1 > 2 || 2 >= 2", true);
    assert_value("true xor true", false);
    assert_value("true nand false", true);
    assert_value("false -> true", true);
    assert_value("true <-> false", false);
    assert_value("not true", false);
    assert_value("6 & 3", 2.0);
    assert_value("6 | 3", 7.0);
    assert_value("1 << 4", 16.0);
    assert_value("3 == 3", true);
    assert_value("\"ab\" != \"ab\"", false);
}

#[test]
fn short_circuit_skips_unbound_variables() {
    assert_value("false && unbound", false);
    assert_value("true || unbound", true);
}

#[test]
fn conditionals() {
    assert_value("3 > 2 ? 10 : 20", 10.0);
    assert_value("if(1 > 2, 10, 20)", 20.0);
    assert_value("if(1 > 2, 10)", Value::Empty);
}

#[test]
fn strings_concatenate() {
    assert_value("\"a\" + \"b\"", "ab");
    assert_value("\"n = \" + 3", "n = 3");
}

#[test]
fn definitions_and_assignments() {
    assert_eq!(run(&["x := 5"]), Value::from("The value '5' was assigned to 'x'."));
    assert_eq!(run(&["x := 5", "x += 2"]), Value::Number(7.0));
    assert_eq!(run(&["x := 5", "x *= 3", "x"]), Value::Number(15.0));
    assert_eq!(run(&["x := 5", "x++"]), Value::Number(6.0));
    assert_eq!(run(&["x := 5", "x--", "x"]), Value::Number(4.0));
    assert_eq!(run(&["def(y, 2)", "y * 3"]), Value::Number(6.0));
    assert_eq!(run(&["x := 5", "undef(x)"]), Value::from("'x' was removed."));
    assert_eq!(run(&["undef(x)"]), Value::from("'x' is not defined."));
}

#[test]
fn constants_cannot_change() {
    let mut parameters = ExpressionParameters::new();
    let error = calculate("pi := 3", &mut parameters).unwrap_err();
    assert_eq!(error.to_string(), "'pi' is a constant and cannot be changed.");
    assert_number("pi", std::f64::consts::PI);
}

#[test]
fn loops() {
    assert_eq!(run(&["s := 0", "for(s += k, k := 1, k <= 10, k++)", "s"]), Value::Number(55.0));
    assert_eq!(run(&["n := 0", "while(n += 1, n < 5)", "n"]), Value::Number(5.0));
    assert_eq!(run(&["n := 0", "while(n += 1, n < 5)"]), Value::Empty);
}

#[test]
fn user_functions() {
    assert_eq!(run(&["f(x) := x^2 + 1", "f(3)"]), Value::Number(10.0));
    assert_eq!(run(&["f(x) := x^2 + 1"]), Value::from("The function 'f(x)' was defined."));
    assert_eq!(run(&["f(a, b) := a - b", "f(10, 4)"]), Value::Number(6.0));
    assert_eq!(run(&["fac(n) := n <= 1 ? 1 : n * fac(n - 1)", "fac(6)"]), Value::Number(720.0));
}

#[test]
fn user_functions_are_keyed_by_arity() {
    let value = run(&["f(x) := x", "f(x, y) := x + y", "f(2) + f(2, 3)"]);
    assert_eq!(value, Value::Number(7.0));
}

#[test]
fn unbounded_recursion_is_reported() {
    let session = || {
        let mut parameters = ExpressionParameters::new();
        calculate("g(x) := g(x + 1)", &mut parameters).unwrap();
        let error = calculate("g(0)", &mut parameters).unwrap_err();
        let error = error.downcast_ref::<RuntimeError>().expect("a runtime error");
        assert!(matches!(error, RuntimeError::CallDepthExceeded { .. }), "{error:?}");

        // the failed call leaves no scopes behind
        assert_eq!(calculate("x := 1", &mut parameters).unwrap(),
                   Value::from("The value '1' was assigned to 'x'."));
        assert_eq!(calculate("g(x) := 2x", &mut parameters).unwrap(),
                   Value::from("The function 'g(x)' was defined."));
        assert_eq!(calculate("g(4) + x", &mut parameters).unwrap(), Value::Number(9.0));
    };
    std::thread::Builder::new().stack_size(64 * 1024 * 1024)
                               .spawn(session)
                               .unwrap()
                               .join()
                               .unwrap();
}

#[test]
fn builtin_functions() {
    assert_number("sin(pi / 2)", 1.0);
    assert_number("cos(0)", 1.0);
    assert_number("sqrt(16)", 4.0);
    assert_number("root(27, 3)", 3.0);
    assert_number("root(-8, 3)", -2.0);
    assert_number("log(8, 2)", 3.0);
    assert_number("lg(1000)", 3.0);
    assert_number("lb(1024)", 10.0);
    assert_number("ln(e)", 1.0);
    assert_value("round(2.5)", 3.0);
    assert_value("round(-2.5)", -3.0);
    assert_number("round(3.14159, 2)", 3.14);
    assert_value("max(3, 9, 4)", 9.0);
    assert_value("min({3, 9, 4})", 3.0);
    assert_value("avg(1, 2, 3)", 2.0);
    assert_value("gcd(12, 18)", 6.0);
    assert_value("lcm(4, 6)", 12.0);
    assert_value("abs(-3)", 3.0);
    assert_value("sign(-7)", -1.0);
    assert_value("tohex(255)", "0xff");
    assert_value("tobin(-5)", "-0b101");
    assert_value("tooct(8)", "0o10");
}

#[test]
fn builtin_domain_errors() {
    assert_failure("(-1)!");
    assert_failure("2.5!");
    assert_failure("round(1.5, -1)");
    assert_failure("tohex(1.5)");
    assert_failure("det({{1, 2}, {2, 4}}) + inverse({{1, 2}, {2, 4}})");
    assert_failure("sin(true)");
    assert_failure("unknown(1)");
}

#[test]
fn angles() {
    assert_eq!(run(&["todeg(90° + 90°)"]).to_string(), "180°");
    assert_number("sin(90°)", 1.0);
    assert_number("sin(100 grad)", 1.0);
    assert_number("tonumber(torad(180°))", std::f64::consts::PI);
    assert_number("tonumber(tograd(90 deg))", 100.0);
    assert_value("180° / 90°", 2.0);
}

#[test]
fn complex_numbers() {
    assert_number("im(sqrt(-4))", 2.0);
    assert_number("abs(2∠90°)", 2.0);
    assert_number("re(2∠90°) + im(2∠90°)", 2.0);
    assert_number("im(i * i)", 0.0);
    assert_number("re(i * i)", -1.0);
    assert_number("im(conjugate(1 + 2i))", -2.0);
}

#[test]
fn vectors_and_matrices() {
    assert_eq!(run(&["{1, 2, 3} + {4, 5, 6}"]), Value::from(vec![5.0, 7.0, 9.0]));
    assert_eq!(run(&["2{1, 2}"]), Value::from(vec![2.0, 4.0]));
    assert_value("dotproduct({1, 2, 3}, {4, 5, 6})", 32.0);
    assert_eq!(run(&["crossproduct({1, 0, 0}, {0, 1, 0})"]), Value::from(vec![0.0, 0.0, 1.0]));
    assert_number("det({{1, 2}, {3, 4}})", -2.0);
    assert_eq!(run(&["transpose({{1, 2}, {3, 4}})"]),
               Value::from(vec![vec![1.0, 3.0], vec![2.0, 4.0]]));
    assert_eq!(run(&["{{1, 2}, {3, 4}} * {1, 1}"]), Value::from(vec![3.0, 7.0]));
    assert_number("abs({3, 4})", 5.0);
    assert_failure("{1, 2} + {1, 2, 3}");
    assert_failure("{{1, 2}, {3}}");
}

#[test]
fn symbolic_functions() {
    assert_eq!(run(&["deriv(x^2)"]).to_string(), "2 * x");
    assert_eq!(run(&["deriv(sin(x))"]).to_string(), "cos(x)");
    assert_eq!(run(&["deriv(y^3, y, 2)"]), Value::Number(12.0));
    assert_eq!(run(&["simplify(x * 1 - 0)"]).to_string(), "x");
    assert_eq!(run(&["simplify(x + 0)"]).to_string(), "x + 0");
    assert_eq!(run(&["f := deriv(x^3)", "deriv(f)"]).to_string(), "3 * (2 * x)");
}

#[test]
fn unknown_names_fail() {
    assert_failure("y + 1");
    assert_failure("f(2)");
    assert_failure("x += 1");
}
