use std::fmt::Display;

use ordered_float::OrderedFloat;

use crate::interpreter::value::complex::ComplexNumber;

/// A real number literal.
///
/// The value is wrapped in [`OrderedFloat`] so literals take part in
/// structural equality and hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Number(OrderedFloat<f64>);

impl Number {
    /// `0`
    pub const ZERO: Self = Self::new(0.0);
    /// `1`
    pub const ONE: Self = Self::new(1.0);

    /// Wraps a value.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self(OrderedFloat(value))
    }

    /// The wrapped value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0.0
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A reference to a named variable.
///
/// Two variables are the same variable exactly when their names are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    name: String,
}

impl Variable {
    /// Creates a variable reference.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// A complex literal as written, `magnitude∠phase°`.
///
/// The magnitude and the phase in degrees are kept instead of the rectangular
/// value, so formatting the literal gives back the same digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Polar {
    magnitude: Number,
    phase:     Number,
}

impl Polar {
    /// Creates a literal from a magnitude and a phase in degrees.
    ///
    /// # Example
    /// ```
    /// use mathtree::ast::Polar;
    /// let literal = Polar::new(3.0, 10.0);
    /// assert_eq!(literal.to_string(), "3∠10°");
    /// ```
    #[must_use]
    pub const fn new(magnitude: f64, phase: f64) -> Self {
        Self { magnitude: Number::new(magnitude),
               phase:     Number::new(phase), }
    }

    /// The magnitude.
    #[must_use]
    pub const fn magnitude(self) -> f64 {
        self.magnitude.value()
    }

    /// The phase in degrees.
    #[must_use]
    pub const fn phase(self) -> f64 {
        self.phase.value()
    }

    /// The rectangular value of the literal.
    #[must_use]
    pub fn value(self) -> ComplexNumber {
        ComplexNumber::from_polar(self.magnitude(), self.phase().to_radians())
    }
}

impl Display for Polar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}∠{}°", self.magnitude, self.phase)
    }
}
