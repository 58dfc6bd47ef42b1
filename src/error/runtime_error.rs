use crate::{
    ast::NodeKind,
    error::{DifferentiationError, ExpressionError},
};

/// Represents all errors that can occur during evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    /// The operand types do not fit the operator or function.
    #[error("Operation '{operation}' is not supported for {}.", .operands.join(" and "))]
    ResultIsNotSupported {
        /// Operator symbol or function name.
        operation: &'static str,
        /// Type names of the evaluated operands.
        operands:  Vec<&'static str>,
    },
    /// A variable without a binding.
    #[error("Unknown variable '{name}'.")]
    UnknownVariable {
        /// The variable name.
        name: String,
    },
    /// A user function without a definition of the called arity.
    #[error("Unknown function '{name}' with {arity} parameter(s).")]
    UnknownFunction {
        /// The function name.
        name:  String,
        /// The number of arguments of the call.
        arity: usize,
    },
    /// User function calls nested deeper than the evaluator allows.
    #[error("Calls of '{name}' nested deeper than {max_depth} levels.")]
    CallDepthExceeded {
        /// The function being called.
        name:      String,
        /// The configured limit.
        max_depth: usize,
    },
    /// An attempt to assign, update or remove a constant.
    #[error("'{name}' is a constant and cannot be changed.")]
    ConstantAssignment {
        /// The constant name.
        name: String,
    },
    /// A number was required.
    #[error("'{operation}' expects a number.")]
    ExpectedNumber {
        /// Operator symbol or function name.
        operation: &'static str,
    },
    /// A boolean was required.
    #[error("'{operation}' expects a boolean.")]
    ExpectedBool {
        /// Operator symbol or function name.
        operation: &'static str,
    },
    /// An integral number was required.
    #[error("'{operation}' expects an integer, found {value}.")]
    ExpectedInteger {
        /// Operator symbol or function name.
        operation: &'static str,
        /// The offending value.
        value:     f64,
    },
    /// Vector or matrix dimensions do not fit the operation.
    #[error("Dimensions do not match for '{operation}'.")]
    DimensionMismatch {
        /// Operator symbol or function name.
        operation: &'static str,
    },
    /// An argument is outside the domain of a function.
    #[error("Invalid argument for '{operation}': {details}")]
    InvalidArgument {
        /// Operator symbol or function name.
        operation: &'static str,
        /// What is wrong with the argument.
        details:   String,
    },
    /// The evaluator has no rule for this kind of node.
    #[error("Evaluation of {kind} is not supported.")]
    NotSupported {
        /// The rejected node kind.
        kind: NodeKind,
    },
    /// Symbolic differentiation failed.
    #[error(transparent)]
    Differentiation(#[from] DifferentiationError),
    /// A tree node could not be built.
    #[error(transparent)]
    Construction(#[from] ExpressionError),
}
