use crate::ast::NodeKind;

/// Invariant violations detected while constructing a tree node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpressionError {
    /// A matrix row differs in length from the first row.
    #[error("Invalid matrix: row {row} has {found} elements, expected {expected}.")]
    InvalidMatrix {
        /// Zero-based index of the offending row.
        row:      usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found:    usize,
    },
    /// A vector literal without elements.
    #[error("A vector must contain at least one element.")]
    EmptyVector,
    /// A matrix literal without rows.
    #[error("A matrix must contain at least one row.")]
    EmptyMatrix,
    /// A function received an argument count outside its bounds.
    #[error("Function '{function}' expects {}, found {found}.", describe_bounds(.min, .max))]
    ParameterCount {
        /// The function name.
        function: &'static str,
        /// Smallest accepted count.
        min:      usize,
        /// Largest accepted count, `None` if unbounded.
        max:      Option<usize>,
        /// The supplied count.
        found:    usize,
    },
    /// A function declaration with a parameter that is not a variable.
    #[error("Declaration of '{name}' may only list variables as parameters.")]
    InvalidFunctionDeclaration {
        /// The declared function name.
        name: String,
    },
    /// An attempt to define or undefine a built-in function.
    #[error("Built-in function '{name}' cannot be redefined.")]
    BuiltinRedefinition {
        /// The function name.
        name: String,
    },
    /// A definition key that is neither a variable nor a function
    /// declaration.
    #[error("Cannot assign to a {kind}.")]
    InvalidAssignmentKey {
        /// The kind of the rejected key.
        kind: NodeKind,
    },
    /// A child list of the wrong length was supplied when copying a node.
    #[error("A {kind} node has {expected} children, {found} were supplied.")]
    ChildCount {
        /// The kind of the copied node.
        kind:     NodeKind,
        /// The number of children of the node.
        expected: usize,
        /// The number of supplied replacements.
        found:    usize,
    },
}

#[allow(clippy::trivially_copy_pass_by_ref, clippy::ref_option)]
fn describe_bounds(min: &usize, max: &Option<usize>) -> String {
    match *max {
        Some(max) if max == *min => format!("{min} argument(s)"),
        Some(max) => format!("between {min} and {max} arguments"),
        None => format!("at least {min} argument(s)"),
    }
}
