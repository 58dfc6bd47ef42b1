/// Entry points and the statement/expression dispatch.
///
/// Holds [`core::parse`], the parser options and the nesting limit, and the
/// two productions every nested construct re-enters: statements and
/// expressions.
pub mod core;

/// Prefix and postfix operators, exponentiation, implicit multiplication and
/// the atoms: literals, variables, calls, parentheses, vectors and matrices.
pub mod unary;

/// Binary operator precedence levels, from the ternary conditional down to
/// `*`, `/` and `%`.
pub mod binary;

/// Shared helpers: nesting guard, delimiter checks, argument lists and call
/// construction.
pub mod utils;

/// Assignments, definitions and the keyword statements `def`, `undef`, `if`,
/// `for` and `while`.
pub mod statement;
