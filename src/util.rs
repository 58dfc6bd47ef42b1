/// Numeric helpers.
///
/// Lossless conversions between `i64` and `f64`, tolerant floating-point
/// comparison, and the integer routines (factorial, gcd, lcm) that the
/// evaluator and simplifier share.
///
/// Conversions return a `Result` carrying a caller-supplied error, so each
/// phase reports failures with its own error type.
pub mod num;
