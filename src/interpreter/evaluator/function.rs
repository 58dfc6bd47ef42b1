use std::collections::HashMap;

use crate::{
    analyzer::{
        differentiator::differentiate,
        simplifier::{simplify, simplify_numeric},
    },
    ast::{BuiltinFunction, Expression, FunctionCall, check_parameter_count},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator, ExpressionParameters},
            matrix,
        },
        value::{angle::AngleValue, complex::ComplexNumber, core::Value},
    },
    util::num::{gcd, i64_to_f64_checked, lcm},
};

/// The variable `deriv` differentiates by when none is given.
pub const DEFAULT_DERIVATIVE_VARIABLE: &str = "x";

/// Evaluates a built-in function call.
///
/// The argument count is checked again even though [`FunctionCall`] enforces
/// it on construction. `deriv` and `simplify` receive their first argument
/// as a tree; every other function receives evaluated values.
///
/// # Parameters
/// - `evaluator`: The running evaluator, used for the arguments.
/// - `node`: The call.
/// - `parameters`: Variable bindings.
///
/// # Returns
/// The function result, or an error if an argument has the wrong type or is
/// outside the function's domain.
pub fn evaluate_function(evaluator: &mut Evaluator,
                         node: &FunctionCall,
                         parameters: &mut ExpressionParameters)
                         -> EvalResult<Value> {
    let function = node.function();
    check_parameter_count(function, node.arguments().len())?;

    match function {
        BuiltinFunction::Derivative => derivative(evaluator, node, parameters),
        BuiltinFunction::Simplify => {
            let tree = symbolic_argument(node.argument(), parameters);
            Ok(Value::from(simplify(&tree)))
        },
        _ => {
            let arguments = node.arguments()
                                .iter()
                                .map(|argument| evaluator.eval(argument, parameters))
                                .collect::<EvalResult<Vec<_>>>()?;
            call_builtin(function, &arguments)
        },
    }
}

/// The tree a symbolic function works on.
///
/// A variable bound to a function value, such as the result of an earlier
/// `deriv`, stands for that function.
fn symbolic_argument(argument: &Expression, parameters: &ExpressionParameters) -> Expression {
    if let Expression::Variable(variable) = argument
       && let Some(Value::Function(tree)) = parameters.variable(variable.name())
    {
        return Expression::clone(tree);
    }
    argument.clone()
}

/// `deriv(f)`, `deriv(f, y)` and `deriv(f, y, point)`.
fn derivative(evaluator: &mut Evaluator,
              node: &FunctionCall,
              parameters: &mut ExpressionParameters)
              -> EvalResult<Value> {
    let arguments = node.arguments();
    let variable = match arguments.get(1) {
        Some(Expression::Variable(variable)) => variable.name().to_string(),
        Some(other) => {
            let details = format!("'{other}' is not a variable");
            return Err(RuntimeError::InvalidArgument { operation: "deriv",
                                                       details });
        },
        None => DEFAULT_DERIVATIVE_VARIABLE.to_string(),
    };

    let tree = symbolic_argument(node.argument(), parameters);
    log::debug!("deriv of {tree} by {variable}");
    let derived = simplify_numeric(&differentiate(&tree, &variable)?);

    let Some(point) = arguments.get(2) else {
        return Ok(Value::from(derived));
    };
    let point = evaluator.eval(point, parameters)?;
    parameters.push_scope(HashMap::from([(variable, point)]));
    let result = evaluator.eval(&derived, parameters);
    parameters.pop_scope();
    result
}

/// Applies a non-symbolic built-in to evaluated arguments.
///
/// # Errors
/// - [`RuntimeError::ResultIsNotSupported`] for argument types the function
///   does not accept.
/// - [`RuntimeError::ExpectedInteger`] where an integer is required.
/// - [`RuntimeError::InvalidArgument`] outside a function's domain.
///
/// # Example
/// ```
/// use mathtree::{
///     ast::BuiltinFunction,
///     interpreter::{evaluator::function::call_builtin, value::core::Value},
/// };
///
/// assert_eq!(call_builtin(BuiltinFunction::Abs, &[Value::Number(-3.0)]),
///            Ok(Value::Number(3.0)));
/// assert_eq!(call_builtin(BuiltinFunction::ToHex, &[Value::Number(255.0)]),
///            Ok(Value::from("0xff")));
/// ```
pub fn call_builtin(function: BuiltinFunction, arguments: &[Value]) -> EvalResult<Value> {
    use BuiltinFunction as F;

    let name = function.name();
    let Some(first) = arguments.first() else {
        return Err(RuntimeError::ResultIsNotSupported { operation: name,
                                                        operands:  Vec::new(), });
    };

    match function {
        F::Abs => match first {
            Value::Complex(c) => Ok(Value::Number(c.abs())),
            Value::Angle(a) => Ok(Value::Angle(a.map(f64::abs))),
            Value::Vector(v) => Ok(Value::Number(v.iter().map(|x| x * x).sum::<f64>().sqrt())),
            _ => real(function, first, f64::abs),
        },
        F::Sqrt => match first {
            Value::Number(x) if *x < 0.0 => Ok(Value::Complex(ComplexNumber::from(*x).sqrt())),
            _ => real_or_complex(function, first, f64::sqrt, ComplexNumber::sqrt),
        },
        F::Root => root(first.as_number(name)?, arguments_number(function, arguments, 1)?),
        F::Exp => real_or_complex(function, first, f64::exp, ComplexNumber::exp),
        F::Ln => logarithm(function, first, f64::ln, 1.0),
        F::Lg => logarithm(function, first, f64::log10, std::f64::consts::LN_10),
        F::Lb => logarithm(function, first, f64::log2, std::f64::consts::LN_2),
        F::Log => {
            let base = arguments_number(function, arguments, 1)?;
            logarithm(function, first, |x| x.log(base), base.ln())
        },

        F::Sin => trigonometric(function, first, f64::sin, ComplexNumber::sin),
        F::Cos => trigonometric(function, first, f64::cos, ComplexNumber::cos),
        F::Tan => trigonometric(function, first, f64::tan, ComplexNumber::tan),
        F::Cot => trigonometric(function, first, |x| x.tan().recip(), |c| c.tan().recip()),
        F::Sec => trigonometric(function, first, |x| x.cos().recip(), |c| c.cos().recip()),
        F::Csc => trigonometric(function, first, |x| x.sin().recip(), |c| c.sin().recip()),
        F::Arcsin => real(function, first, f64::asin),
        F::Arccos => real(function, first, f64::acos),
        F::Arctan => real(function, first, f64::atan),
        F::Arccot => real(function, first, |x| x.recip().atan()),
        F::Arcsec => real(function, first, |x| x.recip().acos()),
        F::Arccsc => real(function, first, |x| x.recip().asin()),

        F::Sinh => trigonometric(function, first, f64::sinh, ComplexNumber::sinh),
        F::Cosh => trigonometric(function, first, f64::cosh, ComplexNumber::cosh),
        F::Tanh => trigonometric(function, first, f64::tanh, ComplexNumber::tanh),
        F::Coth => trigonometric(function, first, |x| x.tanh().recip(), |c| c.tanh().recip()),
        F::Sech => trigonometric(function, first, |x| x.cosh().recip(), |c| c.cosh().recip()),
        F::Csch => trigonometric(function, first, |x| x.sinh().recip(), |c| c.sinh().recip()),
        F::Arsinh => real(function, first, f64::asinh),
        F::Arcosh => real(function, first, f64::acosh),
        F::Artanh => real(function, first, f64::atanh),
        F::Arcoth => real(function, first, |x| x.recip().atanh()),
        F::Arsech => real(function, first, |x| x.recip().acosh()),
        F::Arcsch => real(function, first, |x| x.recip().asinh()),

        F::Floor => real_or_angle(function, first, f64::floor),
        F::Ceil => real_or_angle(function, first, f64::ceil),
        F::Trunc => real_or_angle(function, first, f64::trunc),
        F::Frac => real_or_angle(function, first, f64::fract),
        F::Sign => real(function, first, |x| if x == 0.0 { 0.0 } else { x.signum() }),
        F::Round => {
            let digits = match arguments.get(1) {
                Some(digits) => digits.as_integer(name)?,
                None => 0,
            };
            round(first.as_number(name)?, digits)
        },

        F::Re => complex_part(function, first, |c| c.real),
        F::Im => complex_part(function, first, |c| c.imaginary),
        F::Phase => complex_part(function, first, ComplexNumber::arg),
        F::Conjugate => real_or_complex(function, first, |x| x, ComplexNumber::conj),
        F::Reciprocal => real_or_complex(function, first, f64::recip, ComplexNumber::recip),

        F::ToDegree => angle(function, first, AngleValue::to_degree),
        F::ToRadian => angle(function, first, AngleValue::to_radian),
        F::ToGradian => angle(function, first, AngleValue::to_gradian),
        F::ToNumber => match first {
            Value::Angle(a) => Ok(Value::Number(a.value)),
            _ => real(function, first, |x| x),
        },
        F::ToBin => radix(function, first, |n| format!("{n:#b}")),
        F::ToOct => radix(function, first, |n| format!("{n:#o}")),
        F::ToHex => radix(function, first, |n| format!("{n:#x}")),

        F::Max => {
            let values = numbers(function, arguments)?;
            Ok(Value::Number(values.into_iter().fold(f64::NEG_INFINITY, f64::max)))
        },
        F::Min => {
            let values = numbers(function, arguments)?;
            Ok(Value::Number(values.into_iter().fold(f64::INFINITY, f64::min)))
        },
        F::Avg => {
            let values = numbers(function, arguments)?;
            #[allow(clippy::cast_precision_loss)]
            let count = values.len() as f64;
            Ok(Value::Number(values.into_iter().sum::<f64>() / count))
        },
        F::Sum => Ok(Value::Number(numbers(function, arguments)?.into_iter().sum())),
        F::Product => Ok(Value::Number(numbers(function, arguments)?.into_iter().product())),
        F::Gcd => integers(function, arguments, gcd),
        F::Lcm => integers(function, arguments, lcm),

        F::Transpose => match first {
            Value::Matrix(m) => Ok(Value::from(matrix::transpose(m))),
            Value::Vector(v) => Ok(Value::from(v.iter().map(|x| vec![*x]).collect::<Vec<_>>())),
            _ => Err(not_supported(function, arguments)),
        },
        F::Determinant => Ok(Value::Number(matrix::determinant(first.as_matrix(name)?)?)),
        F::Inverse => Ok(Value::from(matrix::inverse(first.as_matrix(name)?)?)),
        F::DotProduct => {
            let (left, right) = two_vectors(function, arguments)?;
            Ok(Value::Number(matrix::dot_product(left, right)?))
        },
        F::CrossProduct => {
            let (left, right) = two_vectors(function, arguments)?;
            Ok(Value::from(matrix::cross_product(left, right)?))
        },

        F::Derivative | F::Simplify => Err(not_supported(function, arguments)),
    }
}

fn not_supported(function: BuiltinFunction, arguments: &[Value]) -> RuntimeError {
    let operands = arguments.iter().map(Value::type_name).collect();
    RuntimeError::ResultIsNotSupported { operation: function.name(),
                                         operands }
}

/// A real function of a number.
fn real(function: BuiltinFunction,
        value: &Value,
        op: impl FnOnce(f64) -> f64)
        -> EvalResult<Value> {
    match value {
        Value::Number(x) => Ok(Value::Number(op(*x))),
        _ => Err(not_supported(function, std::slice::from_ref(value))),
    }
}

/// A function of a number or a complex number.
fn real_or_complex(function: BuiltinFunction,
                   value: &Value,
                   real_op: impl FnOnce(f64) -> f64,
                   complex_op: impl FnOnce(ComplexNumber) -> ComplexNumber)
                   -> EvalResult<Value> {
    match value {
        Value::Complex(c) => Ok(Value::Complex(complex_op(*c))),
        _ => real(function, value, real_op),
    }
}

/// A rounding-like function of a number, keeping the unit of an angle.
fn real_or_angle(function: BuiltinFunction,
                 value: &Value,
                 op: fn(f64) -> f64)
                 -> EvalResult<Value> {
    match value {
        Value::Angle(a) => Ok(Value::Angle(a.map(op))),
        _ => real(function, value, op),
    }
}

/// A trigonometric or hyperbolic function; angles are converted to radians
/// and plain numbers are taken as radians.
fn trigonometric(function: BuiltinFunction,
                 value: &Value,
                 real_op: impl FnOnce(f64) -> f64,
                 complex_op: impl FnOnce(ComplexNumber) -> ComplexNumber)
                 -> EvalResult<Value> {
    match value {
        Value::Angle(a) => Ok(Value::Number(real_op(a.radians()))),
        _ => real_or_complex(function, value, real_op, complex_op),
    }
}

/// A logarithm; negative numbers and complex numbers use the complex
/// natural logarithm divided by `ln_base`.
fn logarithm(function: BuiltinFunction,
             value: &Value,
             real_op: impl FnOnce(f64) -> f64,
             ln_base: f64)
             -> EvalResult<Value> {
    let complex_log = |c: ComplexNumber| c.ln() / ComplexNumber::from(ln_base);
    match value {
        Value::Number(x) if *x < 0.0 => Ok(Value::Complex(complex_log(ComplexNumber::from(*x)))),
        _ => real_or_complex(function, value, real_op, complex_log),
    }
}

/// `root(x, n)`. Odd roots of negative numbers stay real.
fn root(value: f64, degree: f64) -> EvalResult<Value> {
    if value < 0.0 {
        if degree % 2.0 == 1.0 || degree % 2.0 == -1.0 {
            return Ok(Value::Number(-(-value).powf(degree.recip())));
        }
        let result = ComplexNumber::from(value).pow(ComplexNumber::from(degree.recip()));
        return Ok(Value::Complex(result));
    }
    Ok(Value::Number(value.powf(degree.recip())))
}

/// `round(x, digits)`, half away from zero.
fn round(value: f64, digits: i64) -> EvalResult<Value> {
    let Ok(digits) = i32::try_from(digits) else {
        return Err(RuntimeError::InvalidArgument { operation: "round",
                                                   details:   format!("{digits} digits") });
    };
    if digits < 0 {
        let details = "the number of digits cannot be negative".to_string();
        return Err(RuntimeError::InvalidArgument { operation: "round",
                                                   details });
    }
    let scale = 10f64.powi(digits);
    Ok(Value::Number((value * scale).round() / scale))
}

/// A component of a complex number; numbers are complex numbers with a zero
/// imaginary part.
fn complex_part(function: BuiltinFunction,
                value: &Value,
                op: impl FnOnce(ComplexNumber) -> f64)
                -> EvalResult<Value> {
    match value {
        Value::Number(_) | Value::Complex(_) => {
            Ok(Value::Number(op(value.as_complex(function.name())?)))
        },
        _ => Err(not_supported(function, std::slice::from_ref(value))),
    }
}

/// An angle unit conversion.
fn angle(function: BuiltinFunction,
         value: &Value,
         op: fn(AngleValue) -> AngleValue)
         -> EvalResult<Value> {
    match value {
        Value::Angle(a) => Ok(Value::Angle(op(*a))),
        _ => Err(not_supported(function, std::slice::from_ref(value))),
    }
}

/// An integer rendered in another base, with its prefix.
fn radix(function: BuiltinFunction, value: &Value, format: fn(u64) -> String) -> EvalResult<Value> {
    let n = value.as_integer(function.name())?;
    let digits = format(n.unsigned_abs());
    if n < 0 {
        return Ok(Value::from(format!("-{digits}")));
    }
    Ok(Value::from(digits))
}

/// The argument at `index` as a number.
fn arguments_number(function: BuiltinFunction,
                    arguments: &[Value],
                    index: usize)
                    -> EvalResult<f64> {
    arguments.get(index)
             .ok_or_else(|| not_supported(function, arguments))?
             .as_number(function.name())
}

/// The numbers of a statistical function: either the arguments themselves or
/// the elements of a single vector argument.
fn numbers(function: BuiltinFunction, arguments: &[Value]) -> EvalResult<Vec<f64>> {
    if let [Value::Vector(elements)] = arguments {
        return Ok(elements.to_vec());
    }
    arguments.iter()
             .map(|argument| match argument {
                 Value::Number(x) => Ok(*x),
                 _ => Err(not_supported(function, arguments)),
             })
             .collect()
}

/// Folds integer arguments with `op`.
fn integers(function: BuiltinFunction,
            arguments: &[Value],
            op: fn(i64, i64) -> i64)
            -> EvalResult<Value> {
    let name = function.name();
    let mut values = arguments.iter().map(|argument| argument.as_integer(name));
    let Some(first) = values.next() else {
        return Err(not_supported(function, arguments));
    };
    let result = values.try_fold(first?, |acc, value| value.map(|value| op(acc, value)))?;
    let details = format!("{result} is too large to be represented exactly");
    let error = RuntimeError::InvalidArgument { operation: name,
                                                details };
    i64_to_f64_checked(result, error).map(Value::Number)
}

fn two_vectors(function: BuiltinFunction, arguments: &[Value]) -> EvalResult<(&[f64], &[f64])> {
    match arguments {
        [left, right] => Ok((left.as_vector(function.name())?, right.as_vector(function.name())?)),
        _ => Err(not_supported(function, arguments)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn call(function: BuiltinFunction, arguments: &[f64]) -> EvalResult<Value> {
        let arguments = arguments.iter().copied().map(Value::Number).collect::<Vec<_>>();
        call_builtin(function, &arguments)
    }

    #[test]
    fn sqrt_of_negative_is_complex() {
        let Ok(Value::Complex(root)) = call(BuiltinFunction::Sqrt, &[-9.0]) else {
            panic!("expected a complex result");
        };
        assert!(root.real.abs() < 1e-12);
        assert!((root.imaginary - 3.0).abs() < 1e-12);
    }

    #[test]
    fn statistics_over_arguments_or_vector() {
        assert_eq!(call(BuiltinFunction::Max, &[1.0, 7.0, 3.0]), Ok(Value::Number(7.0)));
        assert_eq!(call_builtin(BuiltinFunction::Min, &[Value::from(vec![4.0, -2.0, 9.0])]),
                   Ok(Value::Number(-2.0)));
        assert_eq!(call(BuiltinFunction::Avg, &[1.0, 2.0, 3.0]), Ok(Value::Number(2.0)));
        assert_eq!(call(BuiltinFunction::Product, &[2.0, 3.0, 4.0]), Ok(Value::Number(24.0)));
    }

    #[test]
    fn integer_functions() {
        assert_eq!(call(BuiltinFunction::Gcd, &[12.0, 18.0, 27.0]), Ok(Value::Number(3.0)));
        assert_eq!(call(BuiltinFunction::Lcm, &[4.0, 6.0]), Ok(Value::Number(12.0)));
        assert_eq!(call(BuiltinFunction::ToBin, &[5.0]), Ok(Value::from("0b101")));
        assert_eq!(call(BuiltinFunction::ToOct, &[-8.0]), Ok(Value::from("-0o10")));
        assert!(matches!(call(BuiltinFunction::Gcd, &[1.5, 2.0]),
                         Err(RuntimeError::ExpectedInteger { .. })));
    }

    #[test]
    fn rounding() {
        assert_eq!(call(BuiltinFunction::Round, &[2.5]), Ok(Value::Number(3.0)));
        assert_eq!(call(BuiltinFunction::Round, &[1.2345, 2.0]), Ok(Value::Number(1.23)));
        assert_eq!(call(BuiltinFunction::Sign, &[0.0]), Ok(Value::Number(0.0)));
        assert_eq!(call(BuiltinFunction::Frac, &[-2.25]), Ok(Value::Number(-0.25)));
    }

    #[test]
    fn odd_root_of_negative_number_is_real() {
        let Ok(Value::Number(root)) = call(BuiltinFunction::Root, &[-8.0, 3.0]) else {
            panic!("expected a number");
        };
        assert!((root + 2.0).abs() < 1e-12);
    }

    #[test]
    fn trigonometry_on_angles() {
        let right_angle = Value::Angle(AngleValue::degree(90.0));
        let Ok(Value::Number(sine)) = call_builtin(BuiltinFunction::Sin, &[right_angle]) else {
            panic!("expected a number");
        };
        assert!((sine - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_wrong_argument_types() {
        assert_eq!(call_builtin(BuiltinFunction::Sin, &[Value::Bool(true)]),
                   Err(RuntimeError::ResultIsNotSupported { operation: "sin",
                                                            operands:  vec!["boolean"], }));
    }
}
