use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
    util::num::{factorial, i64_to_f64_checked},
};

/// Evaluates a unary operation on a value.
///
/// Supported operators:
/// - `Minus`: negation of numbers, complex numbers, angles, vectors and
///   matrices.
/// - `Not`: boolean negation, or bitwise complement of an integer.
/// - `Factorial`: `n!` for non-negative integers. Results beyond `170!`
///   overflow to infinity.
///
/// # Parameters
/// - `operator`: Unary operator.
/// - `value`: Input value.
///
/// # Returns
/// The computed `Value` wrapped in `EvalResult`.
///
/// # Example
/// ```
/// use mathtree::{
///     ast::UnaryOperator,
///     interpreter::{evaluator::unary::evaluate_unary, value::core::Value},
/// };
///
/// // Negation
/// let v = evaluate_unary(UnaryOperator::Minus, &Value::Number(5.0)).unwrap();
/// assert_eq!(v, Value::Number(-5.0));
///
/// // Boolean not
/// let v = evaluate_unary(UnaryOperator::Not, &Value::Bool(false)).unwrap();
/// assert_eq!(v, Value::Bool(true));
///
/// // Factorial: 4! = 24
/// let v = evaluate_unary(UnaryOperator::Factorial, &Value::Number(4.0)).unwrap();
/// assert_eq!(v, Value::Number(24.0));
/// ```
pub fn evaluate_unary(operator: UnaryOperator, value: &Value) -> EvalResult<Value> {
    match operator {
        UnaryOperator::Minus => match value {
            Value::Number(n) => Ok(Value::Number(-n)),
            Value::Complex(c) => Ok(Value::Complex(-*c)),
            Value::Angle(a) => Ok(Value::Angle(a.map(|v| -v))),
            Value::Vector(elements) => {
                Ok(Value::from(elements.iter().map(|v| -v).collect::<Vec<_>>()))
            },
            Value::Matrix(rows) => {
                Ok(Value::from(rows.iter()
                                   .map(|row| row.iter().map(|v| -v).collect())
                                   .collect::<Vec<Vec<f64>>>()))
            },
            _ => Err(not_supported(operator, value)),
        },
        UnaryOperator::Not => match value {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            Value::Number(_) => {
                let complement = !value.as_integer("not")?;
                let error = RuntimeError::ExpectedInteger { operation: "not",
                                                            value:     value.as_number("not")?, };
                i64_to_f64_checked(complement, error).map(Value::Number)
            },
            _ => Err(not_supported(operator, value)),
        },
        UnaryOperator::Factorial => {
            if !value.is_number() {
                return Err(not_supported(operator, value));
            }
            let n = value.as_integer("!")?;
            let Ok(n) = u64::try_from(n) else {
                let details = format!("factorial of negative number {n}");
                return Err(RuntimeError::InvalidArgument { operation: "!",
                                                           details });
            };
            Ok(Value::Number(factorial(n)))
        },
    }
}

fn not_supported(operator: UnaryOperator, value: &Value) -> RuntimeError {
    RuntimeError::ResultIsNotSupported { operation: operator.symbol(),
                                         operands:  vec![value.type_name()], }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitwise_not_of_integer() {
        assert_eq!(evaluate_unary(UnaryOperator::Not, &Value::Number(5.0)),
                   Ok(Value::Number(-6.0)));
    }

    #[test]
    fn factorial_rejects_negative_and_fractional() {
        assert!(matches!(evaluate_unary(UnaryOperator::Factorial, &Value::Number(-1.0)),
                         Err(RuntimeError::InvalidArgument { .. })));
        assert!(matches!(evaluate_unary(UnaryOperator::Factorial, &Value::Number(2.5)),
                         Err(RuntimeError::ExpectedInteger { .. })));
        assert_eq!(evaluate_unary(UnaryOperator::Factorial, &Value::Number(0.0)),
                   Ok(Value::Number(1.0)));
    }

    #[test]
    fn minus_of_vector() {
        assert_eq!(evaluate_unary(UnaryOperator::Minus, &Value::from(vec![1.0, -2.0])),
                   Ok(Value::from(vec![-1.0, 2.0])));
        assert!(evaluate_unary(UnaryOperator::Minus, &Value::Bool(true)).is_err());
    }
}
