/// Complex number support.
///
/// Defines the `ComplexNumber` type used for complex literals and for
/// results that leave the real line, such as `sqrt(-4)`. Includes the
/// arithmetic operators, polar conversion and the elementary functions.
pub mod complex;
/// Angle quantities.
///
/// Defines `AngleValue`, a number tagged with a degree, radian or gradian
/// unit, and the lossless conversions between those units.
pub mod angle;

/// The `Value` enum returned by the evaluator, with typed accessors used by
/// the operator and function implementations.
pub mod core;
