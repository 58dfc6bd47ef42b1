/// Built-in function calls and user function calls.
///
/// Declares the [`BuiltinFunction`] table with each function's name and
/// parameter bounds, and the call nodes that enforce those bounds when they
/// are constructed.
pub mod function;
/// Vector and matrix literals.
///
/// A matrix is a list of equally long vectors; constructing a ragged matrix
/// fails with [`crate::error::ExpressionError::InvalidMatrix`].
pub mod collection;
/// The [`Expression`] sum type and its analyzer dispatch.
///
/// # Responsibilities
/// - Defines one variant per node kind.
/// - Routes [`Expression::accept`] and [`Expression::accept_with`] to the
///   analyzer method for the variant.
/// - Exposes children, partial cloning and convenience constructors.
pub mod expression;
/// Number and complex literals and variable references.
pub mod leaf;
/// Operator enums and the unary/binary operator nodes.
///
/// Also carries the precedence table shared by the parser's descent order
/// and the formatter's parenthesization.
pub mod operator;
/// Conditionals, loops, definitions and assignments.
pub mod programming;

pub use collection::{Matrix, Vector};
pub use expression::{Expression, NodeKind};
pub use function::{BuiltinFunction, FunctionCall, UserFunctionCall, check_parameter_count};
pub use leaf::{Number, Polar, Variable};
pub use operator::{
    AssignOperator, BinaryExpression, BinaryOperator, StepOperator, UnaryExpression, UnaryOperator,
};
pub use programming::{Assign, Conditional, Define, ForLoop, Step, Undefine, WhileLoop};
