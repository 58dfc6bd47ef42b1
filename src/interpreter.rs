/// Evaluation of expression trees.
///
/// Walks a tree with an [`evaluator::core::ExpressionParameters`] binding
/// environment and produces a [`value::core::Value`].
///
/// # Responsibilities
/// - Implements every operator and built-in function on runtime values.
/// - Manages variable scopes, user functions and the call depth limit.
/// - Runs conditionals, loops, definitions and assignments.
/// - Delegates `deriv` and `simplify` to the symbolic passes.
pub mod evaluator;
/// Tokenizes formula text.
///
/// Produces `(Token, offset)` pairs from the source, recognizing numbers in
/// decimal, binary, octal and hexadecimal notation, string literals,
/// identifiers, keywords, unit suffixes and operators.
pub mod lexer;
/// Recursive-descent parser with backtracking.
///
/// Each production saves a checkpoint on the [`token_reader::TokenReader`],
/// tries its alternative and rolls back when it does not match, so an
/// ambiguous prefix such as `f(x)` can be read as a call or as implicit
/// multiplication.
pub mod parser;
/// Cursor over the token stream.
///
/// Offers checkpoint scopes that are either committed or rolled back, and
/// the nesting counter the parser uses to bound recursion depth.
pub mod token_reader;
/// Runtime values.
///
/// Numbers, booleans, complex numbers, angles, strings, vectors, matrices,
/// unevaluated function trees and the empty result of loops.
pub mod value;
