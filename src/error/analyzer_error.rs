use crate::{
    analyzer::type_analyzer::ResultType,
    ast::{BinaryOperator, BuiltinFunction, NodeKind},
    error::ExpressionError,
};

/// Errors raised by the differentiator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DifferentiationError {
    /// The node kind has no derivative.
    #[error("Differentiation of {kind} is not supported.")]
    NotSupported {
        /// The rejected node kind.
        kind: NodeKind,
    },
    /// A derivative node could not be built.
    #[error(transparent)]
    Construction(#[from] ExpressionError),
}

/// Errors raised by the simplifier for nodes it has no rule for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimplificationError {
    /// The node kind cannot be simplified.
    #[error("Simplification of {kind} is not supported.")]
    NotSupported {
        /// The rejected node kind.
        kind: NodeKind,
    },
}

/// Errors raised by the type analyzer when operand types can never fit,
/// whatever the variables are bound to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeAnalyzerError {
    /// The single operand of a node has an unsupported type.
    #[error("{kind} does not accept a {actual}.")]
    ParameterTypeMismatch {
        /// The node that rejected its operand.
        kind:   NodeKind,
        /// The operand type.
        actual: ResultType,
    },
    /// The two operands of a binary operator do not fit together.
    #[error("Operator '{operator}' does not accept {left} and {right}.")]
    BinaryParameterTypeMismatch {
        /// The operator.
        operator: BinaryOperator,
        /// Type of the left operand.
        left:     ResultType,
        /// Type of the right operand.
        right:    ResultType,
    },
    /// One argument of a function has an unsupported type.
    #[error("Argument {index} of '{function}' cannot be a {actual}.")]
    DifferentParameterTypeMismatch {
        /// The function.
        function: BuiltinFunction,
        /// Zero-based argument index.
        index:    usize,
        /// The argument type.
        actual:   ResultType,
    },
}
