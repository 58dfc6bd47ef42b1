/// Parsing errors.
///
/// Lexical and structural failures: unknown characters, missing delimiters,
/// missing operands, trailing tokens and excessive nesting. Every variant
/// carries the byte offset where the problem was detected and, where it
/// applies, the construct that was being parsed.
pub mod parse_error;
/// Construction errors.
///
/// Invariant violations raised while building a tree node, whether by the
/// parser or by a host constructing trees directly: ragged matrices, empty
/// vectors, argument counts outside a function's bounds and invalid
/// definition keys.
pub mod expression_error;
/// Evaluation errors.
///
/// Raised lazily by the evaluator when operand types do not fit an operator
/// or function, a name is unbound, or an argument is out of range.
pub mod runtime_error;
/// Errors of the symbolic passes.
///
/// The differentiator and the simplifier report nodes they have no rule for;
/// the type analyzer reports operand types that can never fit an operator.
pub mod analyzer_error;

pub use analyzer_error::{DifferentiationError, SimplificationError, TypeAnalyzerError};
pub use expression_error::ExpressionError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
