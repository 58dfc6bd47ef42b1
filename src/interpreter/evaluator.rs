/// Binary operator evaluation logic.
///
/// Handles arithmetic with unit and complex promotion, comparisons, logical
/// and bitwise operators and shifts.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements negation, logical or bitwise NOT, and factorial.
pub mod unary;

/// Core evaluation logic and variable bindings.
///
/// Contains [`core::ExpressionParameters`], the [`core::Evaluator`] pass and
/// the dispatch from tree nodes to the operator and function handlers.
pub mod core;

/// Built-in function evaluation.
///
/// Checks argument types and computes the result of every built-in, including
/// the symbolic `deriv` and `simplify`, which receive their arguments
/// unevaluated.
pub mod function;

/// Vector and matrix arithmetic.
///
/// Elementwise operations, scaling, products, transposition, determinants and
/// inversion.
pub mod matrix;

/// Statements with side effects.
///
/// Definitions, compound assignments, increments, conditionals, loops and
/// user function calls.
pub mod programming;
