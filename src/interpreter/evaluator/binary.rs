use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, matrix},
        value::{angle::AngleValue, complex::ComplexNumber, core::Value},
    },
    util::num::{approx_eq, i64_to_f64_checked, is_integral},
};

/// Builds the error for operand types an operator cannot combine.
fn not_supported(operator: BinaryOperator, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::ResultIsNotSupported { operation: operator.symbol(),
                                         operands:  vec![left.type_name(), right.type_name()], }
}

/// Evaluates a binary operation between two values.
///
/// Routes the operation to a handler by operator family:
/// - `+ - * / % ^` go through [`arithmetic`], which promotes between real,
///   complex and angle operands and handles vectors and matrices.
/// - `< <= > >= == !=` go through [`compare`].
/// - `& | xor nand nor -> <->` are logical on booleans and, except for
///   implication and equality, bitwise on integers.
/// - `<< >>` shift integers.
///
/// `&&` and `||` short-circuit in the evaluator before reaching this
/// function; here they are treated like `&` and `|` on booleans.
///
/// # Parameters
/// - `operator`: The operator.
/// - `left`: Left operand.
/// - `right`: Right operand.
///
/// # Returns
/// The computed value, or [`RuntimeError::ResultIsNotSupported`] when the
/// operand types do not fit the operator.
///
/// # Example
/// ```
/// use mathtree::{
///     ast::BinaryOperator,
///     interpreter::{evaluator::binary::evaluate_binary, value::core::Value},
/// };
///
/// let sum = evaluate_binary(BinaryOperator::Add, &Value::Number(3.0), &Value::Number(4.0));
/// assert_eq!(sum, Ok(Value::Number(7.0)));
///
/// let text = evaluate_binary(BinaryOperator::Add, &Value::from("x = "), &Value::Number(1.0));
/// assert_eq!(text, Ok(Value::from("x = 1")));
/// ```
pub fn evaluate_binary(operator: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
    use BinaryOperator::{
        Add, And, ConditionalAnd, ConditionalOr, Div, Equal, Equality, GreaterOrEqual,
        GreaterThan, Implication, LeftShift, LessOrEqual, LessThan, Mod, Mul, NAnd, NOr, NotEqual,
        Or, Pow, RightShift, Sub, XOr,
    };

    match operator {
        Add | Sub | Mul | Div | Mod | Pow => arithmetic(operator, left, right),
        LessThan | LessOrEqual | GreaterThan | GreaterOrEqual | Equal | NotEqual => {
            compare(operator, left, right)
        },
        And | Or | XOr | NAnd | NOr | ConditionalAnd | ConditionalOr | Implication | Equality => {
            logic(operator, left, right)
        },
        LeftShift | RightShift => shift(operator, left, right),
    }
}

/// Arithmetic on every supported operand pair.
fn arithmetic(operator: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
    use Value::{Angle, Complex, Matrix, Number, String, Vector};

    match (operator, left, right) {
        (_, Number(a), Number(b)) => real(operator, *a, *b),
        (_, Complex(_), Number(_) | Complex(_)) | (_, Number(_), Complex(_)) => {
            complex(operator,
                    left.as_complex(operator.symbol())?,
                    right.as_complex(operator.symbol())?)
        },
        (_, Angle(a), Angle(b)) => {
            angle_angle(operator, *a, *b).ok_or_else(|| not_supported(operator, left, right))
        },
        (_, Angle(a), Number(b)) => {
            angle_number(operator, *a, *b).ok_or_else(|| not_supported(operator, left, right))
        },
        (BinaryOperator::Add | BinaryOperator::Mul, Number(a), Angle(b)) => {
            Ok(Value::Angle(b.map(|value| real_op(operator, *a, value))))
        },
        (BinaryOperator::Add, String(_), _) | (BinaryOperator::Add, _, String(_)) => {
            Ok(Value::from(format!("{left}{right}")))
        },
        (BinaryOperator::Add | BinaryOperator::Sub, Vector(a), Vector(b)) => {
            let symbol = operator.symbol();
            Ok(Value::from(matrix::elementwise(symbol, a, b, |x, y| real_op(operator, x, y))?))
        },
        (BinaryOperator::Add | BinaryOperator::Sub, Matrix(a), Matrix(b)) => {
            let symbol = operator.symbol();
            let sum = matrix::elementwise_matrix(symbol, a, b, |x, y| real_op(operator, x, y))?;
            Ok(Value::from(sum))
        },
        (BinaryOperator::Mul, Vector(a), Number(b))
        | (BinaryOperator::Mul, Number(b), Vector(a)) => {
            Ok(Value::from(a.iter().map(|value| value * b).collect::<Vec<_>>()))
        },
        (BinaryOperator::Div, Vector(a), Number(b)) => {
            Ok(Value::from(a.iter().map(|value| value / b).collect::<Vec<_>>()))
        },
        (BinaryOperator::Mul, Matrix(a), Number(b))
        | (BinaryOperator::Mul, Number(b), Matrix(a)) => {
            Ok(Value::from(matrix::scale_matrix(a, *b)))
        },
        (BinaryOperator::Div, Matrix(a), Number(b)) => {
            Ok(Value::from(matrix::scale_matrix(a, b.recip())))
        },
        (BinaryOperator::Mul, Matrix(a), Matrix(b)) => Ok(Value::from(matrix::multiply(a, b)?)),
        (BinaryOperator::Mul, Matrix(a), Vector(b)) => {
            Ok(Value::from(matrix::multiply_vector(a, b)?))
        },
        _ => Err(not_supported(operator, left, right)),
    }
}

/// Applies an arithmetic operator to two reals, without promotion.
fn real_op(operator: BinaryOperator, left: f64, right: f64) -> f64 {
    match operator {
        BinaryOperator::Sub => left - right,
        BinaryOperator::Mul => left * right,
        BinaryOperator::Div => left / right,
        BinaryOperator::Mod => left % right,
        BinaryOperator::Pow => left.powf(right),
        _ => left + right,
    }
}

/// Real arithmetic; a negative base raised to a fractional power leaves the
/// real line.
fn real(operator: BinaryOperator, left: f64, right: f64) -> EvalResult<Value> {
    if operator == BinaryOperator::Pow && left < 0.0 && !is_integral(right) && right.is_finite() {
        let result = ComplexNumber::from(left).pow(ComplexNumber::from(right));
        return Ok(Value::Complex(result));
    }
    Ok(Value::Number(real_op(operator, left, right)))
}

/// Complex arithmetic. `%` has no complex meaning.
fn complex(operator: BinaryOperator,
           left: ComplexNumber,
           right: ComplexNumber)
           -> EvalResult<Value> {
    let result = match operator {
        BinaryOperator::Add => left + right,
        BinaryOperator::Sub => left - right,
        BinaryOperator::Mul => left * right,
        BinaryOperator::Div => left / right,
        BinaryOperator::Pow => left.pow(right),
        _ => {
            return Err(not_supported(operator, &Value::Complex(left), &Value::Complex(right)));
        },
    };
    Ok(Value::Complex(result))
}

/// Two angles: the right one is converted into the unit of the left one.
/// Their ratio is a plain number.
fn angle_angle(operator: BinaryOperator, left: AngleValue, right: AngleValue) -> Option<Value> {
    let right = right.to(left.unit).value;
    match operator {
        BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mod => {
            Some(Value::Angle(left.map(|value| real_op(operator, value, right))))
        },
        BinaryOperator::Div => Some(Value::Number(left.value / right)),
        _ => None,
    }
}

/// An angle and a plain number: the number is taken in the angle's unit.
fn angle_number(operator: BinaryOperator, left: AngleValue, right: f64) -> Option<Value> {
    match operator {
        BinaryOperator::Add
        | BinaryOperator::Sub
        | BinaryOperator::Mul
        | BinaryOperator::Div
        | BinaryOperator::Mod => {
            Some(Value::Angle(left.map(|value| real_op(operator, value, right))))
        },
        _ => None,
    }
}

/// Comparison and equality.
fn compare(operator: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
    use Value::{Angle, Bool, Complex, Matrix, Number, String, Vector};

    if matches!(operator, BinaryOperator::Equal | BinaryOperator::NotEqual) {
        let equal = match (left, right) {
            (Number(a), Number(b)) => approx_eq(*a, *b),
            (Bool(a), Bool(b)) => a == b,
            (Angle(a), Angle(b)) => approx_eq(a.value, b.to(a.unit).value),
            (Complex(_), Number(_) | Complex(_)) | (Number(_), Complex(_)) => {
                let a = left.as_complex(operator.symbol())?;
                let b = right.as_complex(operator.symbol())?;
                approx_eq(a.real, b.real) && approx_eq(a.imaginary, b.imaginary)
            },
            (String(a), String(b)) => a == b,
            (Vector(a), Vector(b)) => vectors_equal(a, b),
            (Matrix(a), Matrix(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| vectors_equal(x, y))
            },
            _ => return Err(not_supported(operator, left, right)),
        };
        return Ok(Value::Bool(equal == (operator == BinaryOperator::Equal)));
    }

    let ordering = match (left, right) {
        (Number(a), Number(b)) => a.partial_cmp(b),
        (Angle(a), Angle(b)) => a.value.partial_cmp(&b.to(a.unit).value),
        _ => return Err(not_supported(operator, left, right)),
    };
    let result = ordering.is_some_and(|ordering| match operator {
                             BinaryOperator::LessThan => ordering == Ordering::Less,
                             BinaryOperator::LessOrEqual => ordering != Ordering::Greater,
                             BinaryOperator::GreaterThan => ordering == Ordering::Greater,
                             _ => ordering != Ordering::Less,
                         });
    Ok(Value::Bool(result))
}

fn vectors_equal(left: &[f64], right: &[f64]) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(a, b)| approx_eq(*a, *b))
}

/// Logical operators on booleans, bitwise operators on integers.
fn logic(operator: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
    use BinaryOperator::{
        And, ConditionalAnd, ConditionalOr, Equality, Implication, NAnd, NOr, Or, XOr,
    };

    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => {
            let (a, b) = (*a, *b);
            let result = match operator {
                And | ConditionalAnd => a && b,
                Or | ConditionalOr => a || b,
                XOr => a ^ b,
                NAnd => !(a && b),
                NOr => !(a || b),
                Implication => !a || b,
                _ => a == b,
            };
            Ok(Value::Bool(result))
        },
        (Value::Number(_), Value::Number(_)) if matches!(operator, And | Or | XOr | NAnd | NOr) => {
            let a = left.as_integer(operator.symbol())?;
            let b = right.as_integer(operator.symbol())?;
            let result = match operator {
                And => a & b,
                Or => a | b,
                XOr => a ^ b,
                NAnd => !(a & b),
                _ => !(a | b),
            };
            integer_result(operator, result)
        },
        _ => Err(not_supported(operator, left, right)),
    }
}

/// `<<` and `>>` on integers. Shift amounts outside `0..64` are rejected.
fn shift(operator: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
    if !left.is_number() || !right.is_number() {
        return Err(not_supported(operator, left, right));
    }
    let value = left.as_integer(operator.symbol())?;
    let amount = right.as_integer(operator.symbol())?;
    let shifted = u32::try_from(amount).ok().and_then(|amount| {
                                                  if operator == BinaryOperator::LeftShift {
                                                      value.checked_shl(amount)
                                                  } else {
                                                      value.checked_shr(amount)
                                                  }
                                              });
    let Some(shifted) = shifted else {
        let details = format!("cannot shift by {amount}");
        return Err(RuntimeError::InvalidArgument { operation: operator.symbol(),
                                                   details });
    };
    integer_result(operator, shifted)
}

/// Converts an integer result back to a number, rejecting values that lose
/// precision.
fn integer_result(operator: BinaryOperator, value: i64) -> EvalResult<Value> {
    let details = format!("{value} is too large to be represented exactly");
    let error = RuntimeError::InvalidArgument { operation: operator.symbol(),
                                                details };
    i64_to_f64_checked(value, error).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::interpreter::value::angle::AngleUnit;

    fn eval(operator: BinaryOperator,
            left: impl Into<Value>,
            right: impl Into<Value>)
            -> EvalResult<Value> {
        evaluate_binary(operator, &left.into(), &right.into())
    }

    #[test]
    fn mixes_real_and_complex() {
        assert_eq!(eval(BinaryOperator::Add, 1.0, ComplexNumber::new(2.0, 3.0)),
                   Ok(Value::Complex(ComplexNumber::new(3.0, 3.0))));
    }

    #[test]
    fn negative_base_with_fractional_exponent_is_complex() {
        let Ok(Value::Complex(root)) = eval(BinaryOperator::Pow, -4.0, 0.5) else {
            panic!("expected a complex result");
        };
        assert!(root.real.abs() < 1e-12);
        assert!((root.imaginary - 2.0).abs() < 1e-12);
    }

    #[test]
    fn angles_take_the_unit_of_the_left_operand() {
        let sum = eval(BinaryOperator::Add, AngleValue::degree(90.0), AngleValue::gradian(100.0));
        let Ok(Value::Angle(sum)) = sum else {
            panic!("expected an angle");
        };
        assert_eq!(sum.unit, AngleUnit::Degree);
        assert!((sum.value - 180.0).abs() < 1e-12);
    }

    #[test]
    fn bitwise_on_integers_and_logical_on_bools() {
        assert_eq!(eval(BinaryOperator::And, 6.0, 3.0), Ok(Value::Number(2.0)));
        assert_eq!(eval(BinaryOperator::Or, true, false), Ok(Value::Bool(true)));
        assert_eq!(eval(BinaryOperator::Implication, true, false), Ok(Value::Bool(false)));
        assert!(eval(BinaryOperator::Implication, 1.0, 0.0).is_err());
        assert!(matches!(eval(BinaryOperator::And, 1.5, 1.0),
                         Err(RuntimeError::ExpectedInteger { .. })));
    }

    #[test]
    fn shifts() {
        assert_eq!(eval(BinaryOperator::LeftShift, 1.0, 10.0), Ok(Value::Number(1024.0)));
        assert_eq!(eval(BinaryOperator::RightShift, 1024.0, 3.0), Ok(Value::Number(128.0)));
        assert!(eval(BinaryOperator::LeftShift, 1.0, 64.0).is_err());
        assert!(eval(BinaryOperator::LeftShift, 1.0, -1.0).is_err());
    }

    #[test]
    fn equality_is_tolerant() {
        assert_eq!(eval(BinaryOperator::Equal, 0.1 + 0.2, 0.3), Ok(Value::Bool(true)));
        assert_eq!(eval(BinaryOperator::NotEqual, 1.0, 2.0), Ok(Value::Bool(true)));
        assert!(eval(BinaryOperator::LessThan, true, false).is_err());
    }

    #[test]
    fn mismatched_vectors() {
        assert_eq!(eval(BinaryOperator::Add, vec![1.0, 2.0], vec![1.0]),
                   Err(RuntimeError::DimensionMismatch { operation: "+" }));
    }
}
