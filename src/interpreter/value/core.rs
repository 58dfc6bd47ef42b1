use std::{fmt::Display, rc::Rc};

use crate::{
    ast::Expression,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{angle::AngleValue, complex::ComplexNumber},
    },
    util::num::f64_to_i64_checked,
};

/// A runtime value produced by the evaluator.
///
/// Vectors and matrices are reference counted so that copying a value out of
/// the variable table is cheap.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A real number.
    Number(f64),
    /// `true` or `false`, produced by comparisons and logical operators.
    Bool(bool),
    /// A complex number.
    Complex(ComplexNumber),
    /// A number with an angle unit.
    Angle(AngleValue),
    /// Text, from string literals, concatenation or `tobin`/`tooct`/`tohex`.
    String(Rc<str>),
    /// A vector of real numbers.
    Vector(Rc<Vec<f64>>),
    /// A rectangular matrix of real numbers, stored row by row.
    Matrix(Rc<Vec<Vec<f64>>>),
    /// An expression tree returned by `deriv` or `simplify`.
    Function(Rc<Expression>),
    /// The result of statements that produce nothing, such as loops.
    Empty,
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<ComplexNumber> for Value {
    fn from(value: ComplexNumber) -> Self {
        Self::Complex(value)
    }
}

impl From<AngleValue> for Value {
    fn from(value: AngleValue) -> Self {
        Self::Angle(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(Rc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(Rc::from(value))
    }
}

impl From<Vec<f64>> for Value {
    fn from(value: Vec<f64>) -> Self {
        Self::Vector(Rc::new(value))
    }
}

impl From<Vec<Vec<f64>>> for Value {
    fn from(value: Vec<Vec<f64>>) -> Self {
        Self::Matrix(Rc::new(value))
    }
}

impl From<Expression> for Value {
    fn from(value: Expression) -> Self {
        Self::Function(Rc::new(value))
    }
}

impl Value {
    /// A short name of the value's type, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Bool(_) => "boolean",
            Self::Complex(_) => "complex number",
            Self::Angle(_) => "angle",
            Self::String(_) => "string",
            Self::Vector(_) => "vector",
            Self::Matrix(_) => "matrix",
            Self::Function(_) => "function",
            Self::Empty => "empty value",
        }
    }

    /// Converts the value to `f64`.
    ///
    /// # Parameters
    /// - `operation`: Operator or function name for error reporting.
    ///
    /// # Returns
    /// - `Ok(f64)`: If the value is a number.
    /// - `Err(RuntimeError::ExpectedNumber)`: Otherwise.
    ///
    /// # Example
    /// ```
    /// use mathtree::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Number(2.5).as_number("abs"), Ok(2.5));
    /// assert!(Value::Bool(true).as_number("abs").is_err());
    /// ```
    pub const fn as_number(&self, operation: &'static str) -> EvalResult<f64> {
        match self {
            Self::Number(value) => Ok(*value),
            _ => Err(RuntimeError::ExpectedNumber { operation }),
        }
    }

    /// Converts the value to `bool`.
    ///
    /// Used for conditions of `if`, `?:` and loops.
    pub const fn as_bool(&self, operation: &'static str) -> EvalResult<bool> {
        match self {
            Self::Bool(value) => Ok(*value),
            _ => Err(RuntimeError::ExpectedBool { operation }),
        }
    }

    /// Converts a number without fractional part to `i64`.
    ///
    /// # Returns
    /// - `Ok(i64)`: If the value is an integral number in range.
    /// - `Err(RuntimeError::ExpectedInteger)`: For fractional or out-of-range
    ///   numbers.
    /// - `Err(RuntimeError::ExpectedNumber)`: For other types.
    pub fn as_integer(&self, operation: &'static str) -> EvalResult<i64> {
        let value = self.as_number(operation)?;
        f64_to_i64_checked(value, RuntimeError::ExpectedInteger { operation, value })
    }

    /// Converts a number or complex number to a complex number.
    pub fn as_complex(&self, operation: &'static str) -> EvalResult<ComplexNumber> {
        match self {
            Self::Complex(value) => Ok(*value),
            Self::Number(value) => Ok(ComplexNumber::from(*value)),
            _ => Err(RuntimeError::ExpectedNumber { operation }),
        }
    }

    /// Borrows the elements of a vector.
    pub fn as_vector(&self, operation: &'static str) -> EvalResult<&[f64]> {
        match self {
            Self::Vector(elements) => Ok(elements),
            _ => Err(RuntimeError::ResultIsNotSupported { operation,
                                                          operands: vec![self.type_name()] }),
        }
    }

    /// Borrows the rows of a matrix.
    pub fn as_matrix(&self, operation: &'static str) -> EvalResult<&[Vec<f64>]> {
        match self {
            Self::Matrix(rows) => Ok(rows),
            _ => Err(RuntimeError::ResultIsNotSupported { operation,
                                                          operands: vec![self.type_name()] }),
        }
    }

    /// Returns `true` if the value is a [`Value::Number`].
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }
}

/// Writes `{a, b, c}`.
fn write_elements(f: &mut std::fmt::Formatter<'_>, elements: &[f64]) -> std::fmt::Result {
    f.write_str("{")?;
    for (index, element) in elements.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{element}")?;
    }
    f.write_str("}")
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Complex(value) => write!(f, "{value}"),
            Self::Angle(value) => write!(f, "{value}"),
            Self::String(text) => f.write_str(text),
            Self::Vector(elements) => write_elements(f, elements),
            Self::Matrix(rows) => {
                f.write_str("{")?;
                for (index, row) in rows.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write_elements(f, row)?;
                }
                f.write_str("}")
            },
            Self::Function(expression) => write!(f, "{expression}"),
            Self::Empty => Ok(()),
        }
    }
}
