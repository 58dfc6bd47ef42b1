use std::fmt::Display;

use crate::{
    analyzer::Analyzer,
    ast::{
        Assign, BinaryExpression, BinaryOperator, BuiltinFunction, Conditional, Define,
        Expression, ForLoop, FunctionCall, Matrix, NodeKind, Number, Polar, Step, Undefine,
        UnaryExpression, UnaryOperator, UserFunctionCall, Variable, Vector, WhileLoop,
    },
    error::TypeAnalyzerError,
    interpreter::value::angle::AngleValue,
    util::num::is_integral,
};

type TypeResult = Result<ResultType, TypeAnalyzerError>;

/// The kind of value a tree evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultType {
    Number,
    Boolean,
    ComplexNumber,
    Angle,
    String,
    Vector,
    Matrix,
    /// An expression tree, produced by `deriv` and `simplify`.
    Function,
    /// Loops produce no value.
    Empty,
    /// The type depends on what unbound variables evaluate to.
    Undefined,
}

impl ResultType {
    /// Every type a value can actually have.
    pub const CONCRETE: [Self; 9] = [Self::Number,
                                     Self::Boolean,
                                     Self::ComplexNumber,
                                     Self::Angle,
                                     Self::String,
                                     Self::Vector,
                                     Self::Matrix,
                                     Self::Function,
                                     Self::Empty];

    /// Returns `true` unless the type is [`ResultType::Undefined`].
    #[must_use]
    pub const fn is_defined(self) -> bool {
        !matches!(self, Self::Undefined)
    }
}

impl Display for ResultType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::ComplexNumber => "complex number",
            Self::Angle => "angle",
            Self::String => "string",
            Self::Vector => "vector",
            Self::Matrix => "matrix",
            Self::Function => "function",
            Self::Empty => "empty value",
            Self::Undefined => "undefined",
        };
        f.write_str(name)
    }
}

/// Infers result types without evaluating.
///
/// Variables are unbound at analysis time, so any operand that mentions one
/// is [`ResultType::Undefined`]. An operator with an undefined operand is
/// still rejected when no binding could make it valid, and its result is
/// known when every valid binding gives the same type.
///
/// A power of two numbers, and `sqrt`, `root` and the logarithms of a
/// number, are complex for negative bases. Their type is
/// [`ResultType::Number`] only when the exponent is an integer literal or
/// the base is a non-negative literal; otherwise it is undefined.
///
/// # Example
/// ```
/// use mathtree::{
///     analyzer::type_analyzer::{ResultType, TypeAnalyzer},
///     interpreter::parser::core::parse,
/// };
///
/// let mut analyzer = TypeAnalyzer::new();
/// assert_eq!(parse("2 + 3").unwrap().accept(&mut analyzer), Ok(ResultType::Number));
/// assert_eq!(parse("x + 3").unwrap().accept(&mut analyzer), Ok(ResultType::Undefined));
/// assert_eq!(parse("x < 3").unwrap().accept(&mut analyzer), Ok(ResultType::Boolean));
/// assert!(parse("true + false").unwrap().accept(&mut analyzer).is_err());
///
/// let mut real = TypeAnalyzer::with_variables(ResultType::Number);
/// assert_eq!(parse("x ^ 2").unwrap().accept(&mut real), Ok(ResultType::Number));
/// assert_eq!(parse("x ^ 0.5").unwrap().accept(&mut real), Ok(ResultType::Undefined));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeAnalyzer {
    variables: ResultType,
}

impl Default for TypeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeAnalyzer {
    /// Creates a type analyzer.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_variables(ResultType::Undefined)
    }

    /// Creates a type analyzer that gives every variable the type
    /// `variables`.
    #[must_use]
    pub const fn with_variables(variables: ResultType) -> Self {
        Self { variables }
    }

    fn analyze(&mut self, expression: &Expression) -> TypeResult {
        expression.accept(self)
    }

    fn analyze_all(&mut self,
                   expressions: &[Expression])
                   -> Result<Vec<ResultType>, TypeAnalyzerError> {
        expressions.iter().map(|expression| self.analyze(expression)).collect()
    }

    /// Requires a condition to be boolean or undefined.
    fn condition(&mut self,
                 kind: NodeKind,
                 condition: &Expression)
                 -> Result<(), TypeAnalyzerError> {
        match self.analyze(condition)? {
            ResultType::Boolean | ResultType::Undefined => Ok(()),
            actual => Err(TypeAnalyzerError::ParameterTypeMismatch { kind, actual }),
        }
    }
}

/// Candidate bindings for an operand type.
fn candidates(kind: ResultType) -> Vec<ResultType> {
    if kind.is_defined() {
        vec![kind]
    } else {
        ResultType::CONCRETE.to_vec()
    }
}

/// The common result of every valid candidate, `Undefined` when they
/// disagree, `None` when there is no valid candidate.
fn unify(results: impl IntoIterator<Item = ResultType>) -> Option<ResultType> {
    results.into_iter()
           .reduce(|a, b| if a == b { a } else { ResultType::Undefined })
}

/// The result of a unary operator on an operand of a known type.
const fn unary_result(operator: UnaryOperator, operand: ResultType) -> Option<ResultType> {
    use ResultType as T;

    match (operator, operand) {
        (UnaryOperator::Minus,
         T::Number | T::ComplexNumber | T::Angle | T::Vector | T::Matrix)
        | (UnaryOperator::Not, T::Number | T::Boolean) => Some(operand),
        (UnaryOperator::Factorial, T::Number) => Some(T::Number),
        _ => None,
    }
}

/// The result of a binary operator on operands of known types.
#[allow(clippy::match_same_arms)]
const fn binary_result(operator: BinaryOperator,
                       left: ResultType,
                       right: ResultType)
                       -> Option<ResultType> {
    use BinaryOperator as B;
    use ResultType as T;

    match (operator, left, right) {
        (B::Add | B::Sub | B::Mul | B::Div | B::Mod | B::Pow, T::Number, T::Number) => {
            Some(T::Number)
        },
        (B::Add | B::Sub | B::Mul | B::Div | B::Pow,
         T::ComplexNumber,
         T::Number | T::ComplexNumber)
        | (B::Add | B::Sub | B::Mul | B::Div | B::Pow, T::Number, T::ComplexNumber) => {
            Some(T::ComplexNumber)
        },
        (B::Add | B::Sub | B::Mod, T::Angle, T::Angle)
        | (B::Add | B::Sub | B::Mul | B::Div | B::Mod, T::Angle, T::Number)
        | (B::Add | B::Mul, T::Number, T::Angle) => Some(T::Angle),
        (B::Div, T::Angle, T::Angle) => Some(T::Number),
        (B::Add, T::String, _) | (B::Add, _, T::String) => Some(T::String),
        (B::Add | B::Sub, T::Vector, T::Vector)
        | (B::Mul, T::Vector, T::Number)
        | (B::Mul, T::Number, T::Vector)
        | (B::Div, T::Vector, T::Number)
        | (B::Mul, T::Matrix, T::Vector) => Some(T::Vector),
        (B::Add | B::Sub | B::Mul, T::Matrix, T::Matrix)
        | (B::Mul, T::Matrix, T::Number)
        | (B::Mul, T::Number, T::Matrix)
        | (B::Div, T::Matrix, T::Number) => Some(T::Matrix),
        (B::LessThan | B::LessOrEqual | B::GreaterThan | B::GreaterOrEqual, T::Number, T::Number)
        | (B::LessThan | B::LessOrEqual | B::GreaterThan | B::GreaterOrEqual, T::Angle, T::Angle)
        | (B::Equal | B::NotEqual,
           T::Number | T::ComplexNumber,
           T::Number | T::ComplexNumber)
        | (B::Equal | B::NotEqual, T::Boolean, T::Boolean)
        | (B::Equal | B::NotEqual, T::Angle, T::Angle)
        | (B::Equal | B::NotEqual, T::String, T::String)
        | (B::Equal | B::NotEqual, T::Vector, T::Vector)
        | (B::Equal | B::NotEqual, T::Matrix, T::Matrix) => Some(T::Boolean),
        (B::And | B::Or | B::XOr | B::NAnd | B::NOr, T::Number, T::Number) => Some(T::Number),
        (B::And
         | B::Or
         | B::XOr
         | B::NAnd
         | B::NOr
         | B::ConditionalAnd
         | B::ConditionalOr
         | B::Implication
         | B::Equality,
         T::Boolean,
         T::Boolean) => Some(T::Boolean),
        (B::LeftShift | B::RightShift, T::Number, T::Number) => Some(T::Number),
        _ => None,
    }
}

/// Returns `true` if `base ^ exponent` is real for every real base and
/// exponent the two trees can stand for.
fn is_real_power(base: &Expression, exponent: &Expression) -> bool {
    exponent.as_number().is_some_and(is_integral) || is_non_negative(base)
}

fn is_non_negative(expression: &Expression) -> bool {
    expression.as_number().is_some_and(|value| value >= 0.0)
}

/// Functions that map some real arguments to complex results.
const fn may_leave_real_line(function: BuiltinFunction) -> bool {
    use BuiltinFunction as F;

    matches!(function, F::Sqrt | F::Root | F::Ln | F::Lg | F::Lb | F::Log)
}

/// The result of a built-in function on arguments of known types.
///
/// # Errors
/// Returns the index of the first argument of the wrong type.
fn function_result(function: BuiltinFunction,
                   arguments: &[ResultType])
                   -> Result<ResultType, usize> {
    use BuiltinFunction as F;
    use ResultType as T;

    let first = arguments.first().copied().unwrap_or(T::Undefined);
    let check = |allowed: &[T]| -> Result<(), usize> {
        match arguments.iter().position(|argument| !allowed.contains(argument)) {
            Some(index) => Err(index),
            None => Ok(()),
        }
    };
    let real_or_complex = |result_of_complex: T| -> Result<T, usize> {
        check(&[T::Number, T::ComplexNumber])?;
        Ok(if first == T::ComplexNumber { result_of_complex } else { T::Number })
    };

    match function {
        F::Abs => match first {
            T::Number | T::ComplexNumber | T::Vector => Ok(T::Number),
            T::Angle => Ok(T::Angle),
            _ => Err(0),
        },
        F::Sqrt | F::Exp | F::Ln | F::Lg | F::Lb | F::Log | F::Conjugate | F::Reciprocal => {
            real_or_complex(T::ComplexNumber)
        },
        F::Sin | F::Cos | F::Tan | F::Cot | F::Sec | F::Csc | F::Sinh | F::Cosh | F::Tanh
        | F::Coth | F::Sech | F::Csch => match first {
            T::Number | T::Angle => Ok(T::Number),
            T::ComplexNumber => Ok(T::ComplexNumber),
            _ => Err(0),
        },
        F::Floor | F::Ceil | F::Trunc | F::Frac => match first {
            T::Number | T::Angle => Ok(first),
            _ => Err(0),
        },
        F::Re | F::Im | F::Phase => real_or_complex(T::Number),
        F::ToDegree | F::ToRadian | F::ToGradian => check(&[T::Angle]).map(|()| T::Angle),
        F::ToNumber => check(&[T::Number, T::Angle]).map(|()| T::Number),
        F::ToBin | F::ToOct | F::ToHex => check(&[T::Number]).map(|()| T::String),
        F::Max | F::Min | F::Avg | F::Sum | F::Product if arguments == [T::Vector] => Ok(T::Number),
        F::Transpose => check(&[T::Matrix, T::Vector]).map(|()| T::Matrix),
        F::Determinant => check(&[T::Matrix]).map(|()| T::Number),
        F::Inverse => check(&[T::Matrix]).map(|()| T::Matrix),
        F::DotProduct => check(&[T::Vector]).map(|()| T::Number),
        F::CrossProduct => check(&[T::Vector]).map(|()| T::Vector),
        F::Derivative | F::Simplify => Ok(T::Function),
        _ => check(&[T::Number]).map(|()| T::Number),
    }
}

impl Analyzer for TypeAnalyzer {
    type Error = TypeAnalyzerError;
    type Output = ResultType;

    fn not_supported(&mut self, _kind: NodeKind) -> TypeResult {
        Ok(ResultType::Undefined)
    }

    fn visit_number(&mut self, _node: Number) -> TypeResult {
        Ok(ResultType::Number)
    }

    fn visit_bool(&mut self, _value: bool) -> TypeResult {
        Ok(ResultType::Boolean)
    }

    fn visit_complex(&mut self, _value: Polar) -> TypeResult {
        Ok(ResultType::ComplexNumber)
    }

    fn visit_string(&mut self, _value: &str) -> TypeResult {
        Ok(ResultType::String)
    }

    fn visit_angle(&mut self, _value: AngleValue) -> TypeResult {
        Ok(ResultType::Angle)
    }

    fn visit_variable(&mut self, _node: &Variable) -> TypeResult {
        Ok(self.variables)
    }

    fn visit_unary(&mut self, node: &UnaryExpression) -> TypeResult {
        let operator = node.operator();
        let operand = self.analyze(node.operand())?;
        unify(candidates(operand).into_iter()
                                 .filter_map(|candidate| unary_result(operator, candidate)))
            .ok_or(TypeAnalyzerError::ParameterTypeMismatch { kind:   NodeKind::Unary(operator),
                                                              actual: operand, })
    }

    fn visit_binary(&mut self, node: &BinaryExpression) -> TypeResult {
        let operator = node.operator();
        let left = self.analyze(node.left())?;
        let right = self.analyze(node.right())?;
        let result_for = move |l| {
            candidates(right).into_iter()
                             .filter_map(move |r| binary_result(operator, l, r))
        };
        let results = candidates(left).into_iter().flat_map(result_for);
        let mismatch = TypeAnalyzerError::BinaryParameterTypeMismatch { operator,
                                                                        left,
                                                                        right };
        let result = unify(results).ok_or(mismatch)?;
        if operator == BinaryOperator::Pow
           && result == ResultType::Number
           && !is_real_power(node.left(), node.right())
        {
            return Ok(ResultType::Undefined);
        }
        Ok(result)
    }

    fn visit_function(&mut self, node: &FunctionCall) -> TypeResult {
        let function = node.function();
        if function.is_symbolic() {
            return Ok(if node.arguments().len() == 3 {
                          ResultType::Undefined
                      } else {
                          ResultType::Function
                      });
        }
        let arguments = self.analyze_all(node.arguments())?;
        if arguments.iter().all(|argument| argument.is_defined()) {
            let result = function_result(function, &arguments).map_err(|index| {
                             let actual = arguments[index];
                             TypeAnalyzerError::DifferentParameterTypeMismatch { function,
                                                                                 index,
                                                                                 actual }
                         })?;
            if result == ResultType::Number
               && may_leave_real_line(function)
               && !is_non_negative(node.argument())
            {
                return Ok(ResultType::Undefined);
            }
            return Ok(result);
        }

        let mut first_error = None;
        let results = ResultType::CONCRETE.iter().filter_map(|&candidate| {
            let substituted = arguments.iter()
                                       .map(|&argument| {
                                           if argument.is_defined() { argument } else { candidate }
                                       })
                                       .collect::<Vec<_>>();
            function_result(function, &substituted).map_err(|index| {
                                                       first_error.get_or_insert(index);
                                                   })
                                                   .ok()
        });
        let unified = unify(results.collect::<Vec<_>>());
        unified.ok_or_else(|| {
                   let index = first_error.unwrap_or(0);
                   let actual = arguments.get(index).copied().unwrap_or(ResultType::Undefined);
                   TypeAnalyzerError::DifferentParameterTypeMismatch { function,
                                                                       index,
                                                                       actual }
               })
    }

    fn visit_user_function(&mut self, node: &UserFunctionCall) -> TypeResult {
        self.analyze_all(node.arguments())?;
        Ok(ResultType::Undefined)
    }

    fn visit_vector(&mut self, node: &Vector) -> TypeResult {
        for element in node.elements() {
            let actual = self.analyze(element)?;
            if !matches!(actual, ResultType::Number | ResultType::Undefined) {
                return Err(TypeAnalyzerError::ParameterTypeMismatch { kind: NodeKind::Vector,
                                                                      actual });
            }
        }
        Ok(ResultType::Vector)
    }

    fn visit_matrix(&mut self, node: &Matrix) -> TypeResult {
        for element in node.elements() {
            let actual = self.analyze(element)?;
            if !matches!(actual, ResultType::Number | ResultType::Undefined) {
                return Err(TypeAnalyzerError::ParameterTypeMismatch { kind: NodeKind::Matrix,
                                                                      actual });
            }
        }
        Ok(ResultType::Matrix)
    }

    fn visit_conditional(&mut self, node: &Conditional) -> TypeResult {
        self.condition(NodeKind::Conditional, node.condition())?;
        let then = self.analyze(node.then())?;
        let Some(otherwise) = node.otherwise() else {
            return Ok(ResultType::Undefined);
        };
        let otherwise = self.analyze(otherwise)?;
        Ok(if then == otherwise { then } else { ResultType::Undefined })
    }

    fn visit_for(&mut self, node: &ForLoop) -> TypeResult {
        self.analyze(node.init())?;
        self.condition(NodeKind::For, node.condition())?;
        self.analyze(node.body())?;
        self.analyze(node.iteration())?;
        Ok(ResultType::Empty)
    }

    fn visit_while(&mut self, node: &WhileLoop) -> TypeResult {
        self.condition(NodeKind::While, node.condition())?;
        self.analyze(node.body())?;
        Ok(ResultType::Empty)
    }

    fn visit_define(&mut self, node: &Define) -> TypeResult {
        if matches!(node.key(), Expression::Variable(_)) {
            self.analyze(node.value())?;
        }
        Ok(ResultType::String)
    }

    fn visit_undefine(&mut self, _node: &Undefine) -> TypeResult {
        Ok(ResultType::String)
    }

    fn visit_assign(&mut self, node: &Assign) -> TypeResult {
        let operator = node.operator().binary();
        let right = self.analyze(node.value())?;
        unify(candidates(right).into_iter()
                               .filter_map(|r| binary_result(operator, ResultType::Number, r)))
            .ok_or(TypeAnalyzerError::BinaryParameterTypeMismatch { operator,
                                                                    left: ResultType::Number,
                                                                    right })
    }

    fn visit_step(&mut self, _node: &Step) -> TypeResult {
        Ok(ResultType::Number)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn analyze(expression: &Expression) -> TypeResult {
        expression.accept(&mut TypeAnalyzer::new())
    }

    #[test]
    fn bool_plus_bool_is_rejected() {
        let tree = Expression::add(Expression::bool(true), Expression::bool(false));
        let operator = BinaryOperator::Add;
        let (left, right) = (ResultType::Boolean, ResultType::Boolean);
        let expected = TypeAnalyzerError::BinaryParameterTypeMismatch { operator,
                                                                        left,
                                                                        right };
        assert_eq!(analyze(&tree), Err(expected));
    }

    #[test]
    fn free_variable_is_undefined() {
        let tree = Expression::add(Expression::variable("x"), Expression::number(1.0));
        assert_eq!(analyze(&tree), Ok(ResultType::Undefined));
    }

    #[test]
    fn function_argument_mismatch() {
        let tree = Expression::call(BuiltinFunction::Sin, Expression::bool(true)).unwrap();
        let (function, actual) = (BuiltinFunction::Sin, ResultType::Boolean);
        let index = 0;
        let expected = TypeAnalyzerError::DifferentParameterTypeMismatch { function,
                                                                           index,
                                                                           actual };
        assert_eq!(analyze(&tree), Err(expected));
    }

    #[test]
    fn undefined_argument_with_single_valid_type() {
        let tree = Expression::call(BuiltinFunction::Determinant, Expression::variable("m"))
            .unwrap();
        assert_eq!(analyze(&tree), Ok(ResultType::Number));
    }

    #[test]
    fn conditions_must_be_boolean() {
        let tree = Expression::Conditional(Conditional::new(Expression::number(1.0),
                                                            Expression::number(2.0),
                                                            None));
        assert_eq!(analyze(&tree),
                   Err(TypeAnalyzerError::ParameterTypeMismatch { kind:   NodeKind::Conditional,
                                                                  actual: ResultType::Number, }));
    }
}
