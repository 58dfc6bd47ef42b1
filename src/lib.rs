//! # mathtree
//!
//! mathtree parses mathematical formulas into immutable expression trees and
//! runs passes over them: evaluation, symbolic differentiation,
//! simplification, static type analysis and formatting back to text.
//! Formulas may use real and complex numbers, angles with units, vectors,
//! matrices, strings, user-defined functions and simple loops.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::interpreter::{
    evaluator::core::ExpressionParameters, parser::core::parse, value::core::Value,
};

/// Passes over expression trees.
///
/// This module declares the [`analyzer::Analyzer`] and
/// [`analyzer::ContextAnalyzer`] traits that every pass implements, and the
/// symbolic passes built on them.
///
/// # Responsibilities
/// - Dispatches one method per node variant, with a `not_supported` fallback.
/// - Formats, differentiates, simplifies and type-checks trees.
pub mod analyzer;
/// The immutable expression tree.
///
/// Nodes are plain values with structural equality and hashing. Trees are
/// never changed in place; [`ast::Expression::clone_with`] builds a copy with
/// some children replaced.
///
/// # Responsibilities
/// - Defines one node type per language construct.
/// - Enforces construction invariants such as rectangular matrices and
///   function arities.
pub mod ast;
/// Error types for every phase.
///
/// Parsing, tree construction, evaluation and the symbolic passes each have
/// their own error enum, so callers can tell which phase failed.
pub mod error;
/// Lexing, parsing and evaluation.
///
/// # Responsibilities
/// - Turns formula text into tokens and tokens into trees.
/// - Evaluates trees against a binding environment.
/// - Defines the runtime value types.
pub mod interpreter;
/// Shared numeric helpers.
pub mod util;

/// Parses and evaluates a formula in one step.
///
/// Definitions and assignments made by the formula are kept in
/// `parameters`, so consecutive calls behave like a session.
///
/// # Errors
/// Returns the [`error::ParseError`] or [`error::RuntimeError`] that stopped
/// the formula.
///
/// # Examples
/// ```
/// use mathtree::{
///     calculate,
///     interpreter::{evaluator::core::ExpressionParameters, value::core::Value},
/// };
///
/// let mut parameters = ExpressionParameters::new();
/// calculate("f(x) := x^2 + 1", &mut parameters).unwrap();
/// assert_eq!(calculate("f(3)", &mut parameters).unwrap(), Value::Number(10.0));
///
/// // 'y' is not bound
/// assert!(calculate("y + 1", &mut parameters).is_err());
/// ```
pub fn calculate(source: &str,
                 parameters: &mut ExpressionParameters)
                 -> Result<Value, Box<dyn std::error::Error>> {
    let expression = parse(source)?;
    let value = expression.execute(parameters)?;
    log::debug!("{source} = {value}");
    Ok(value)
}
