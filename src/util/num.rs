/// Largest signed integer exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_I64_INT: i64 = 9_007_199_254_740_991;

/// Relative tolerance used when comparing numbers for equality.
pub const EPSILON: f64 = 1e-14;

/// Largest argument whose factorial is still finite in `f64`.
pub const MAX_FACTORIAL_ARGUMENT: u64 = 170;

/// Safely converts an `i64` to `f64` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns `Err(error)` if the value exceeds `MAX_SAFE_I64_INT` in absolute
/// value.
///
/// ## Example
/// ```
/// use mathtree::util::num::{MAX_SAFE_I64_INT, i64_to_f64_checked};
///
/// assert_eq!(i64_to_f64_checked(42, "too big"), Ok(42.0));
/// assert!(i64_to_f64_checked(MAX_SAFE_I64_INT + 1, "too big").is_err());
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn i64_to_f64_checked<E>(value: i64, error: E) -> Result<f64, E> {
    if value.unsigned_abs() > MAX_SAFE_I64_INT.unsigned_abs() {
        return Err(error);
    }
    Ok(value as f64)
}

/// Converts an `f64` to `i64` if the value is finite, integral and inside the
/// exactly representable range.
///
/// ## Errors
/// Returns `Err(error)` for non-finite, fractional or out-of-range values.
///
/// ## Example
/// ```
/// use mathtree::util::num::f64_to_i64_checked;
///
/// assert_eq!(f64_to_i64_checked(12.0, ()), Ok(12));
/// assert!(f64_to_i64_checked(1.5, ()).is_err());
/// assert!(f64_to_i64_checked(f64::NAN, ()).is_err());
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn f64_to_i64_checked<E>(value: f64, error: E) -> Result<i64, E> {
    if !is_integral(value) || value.abs() > MAX_SAFE_I64_INT as f64 {
        return Err(error);
    }
    Ok(value as i64)
}

/// Returns `true` if `value` is finite and has no fractional part.
#[must_use]
pub fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

/// Compares two numbers using the relative tolerance [`EPSILON`].
///
/// Exactly equal values (including infinities of the same sign) always
/// compare equal.
///
/// ## Example
/// ```
/// use mathtree::util::num::approx_eq;
///
/// assert!(approx_eq(0.1 + 0.2, 0.3));
/// assert!(!approx_eq(1.0, 1.001));
/// ```
#[must_use]
#[allow(clippy::float_cmp)]
pub fn approx_eq(left: f64, right: f64) -> bool {
    if left == right {
        return true;
    }
    let scale = left.abs().max(right.abs()).max(1.0);
    (left - right).abs() <= EPSILON * scale
}

/// Computes `n!` as a floating-point number.
///
/// Arguments above [`MAX_FACTORIAL_ARGUMENT`] overflow to infinity.
///
/// ## Example
/// ```
/// use mathtree::util::num::factorial;
///
/// assert_eq!(factorial(0), 1.0);
/// assert_eq!(factorial(5), 120.0);
/// assert!(factorial(171).is_infinite());
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn factorial(n: u64) -> f64 {
    if n > MAX_FACTORIAL_ARGUMENT {
        return f64::INFINITY;
    }
    (2..=n).fold(1.0, |acc, k| acc * k as f64)
}

/// Greatest common divisor of two integers (always non-negative).
///
/// ## Example
/// ```
/// use mathtree::util::num::gcd;
///
/// assert_eq!(gcd(12, -18), 6);
/// assert_eq!(gcd(0, 7), 7);
/// ```
#[must_use]
pub const fn gcd(left: i64, right: i64) -> i64 {
    let mut a = left.abs();
    let mut b = right.abs();
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Least common multiple of two integers (always non-negative).
///
/// ## Example
/// ```
/// use mathtree::util::num::lcm;
///
/// assert_eq!(lcm(4, 6), 12);
/// assert_eq!(lcm(0, 6), 0);
/// ```
#[must_use]
pub const fn lcm(left: i64, right: i64) -> i64 {
    if left == 0 || right == 0 {
        return 0;
    }
    (left / gcd(left, right) * right).abs()
}
