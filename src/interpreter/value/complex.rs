use std::{
    fmt::Display,
    hash::{Hash, Hasher},
    ops,
};

use ordered_float::OrderedFloat;

/// The imaginary unit `i`.
pub const IMAGINARY_ONE: ComplexNumber = ComplexNumber::new(0.0, 1.0);

/// A complex number in rectangular form.
///
/// Equality and hashing compare the bit patterns of both parts through
/// [`OrderedFloat`], so a complex literal can live inside a hashable
/// expression tree.
#[derive(Debug, Clone, Copy)]
pub struct ComplexNumber {
    /// The real part.
    pub real:      f64,
    /// The imaginary part.
    pub imaginary: f64,
}

impl Display for ComplexNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.real, self.imaginary) {
            (real, 0.0) => write!(f, "{real}"),
            (0.0, imaginary) => write!(f, "{imaginary}i"),
            (real, imaginary) if imaginary > 0.0 => write!(f, "{real} + {imaginary}i"),
            (real, imaginary) => write!(f, "{real} - {}i", -imaginary),
        }
    }
}

impl ComplexNumber {
    /// Constructs a complex number from its rectangular components.
    ///
    /// # Example
    /// ```
    /// use mathtree::interpreter::value::complex::ComplexNumber;
    /// let c = ComplexNumber::new(5.0, -1.0);
    /// assert_eq!(c.real, 5.0);
    /// assert_eq!(c.imaginary, -1.0);
    /// ```
    #[must_use]
    pub const fn new(real: f64, imaginary: f64) -> Self {
        Self { real, imaginary }
    }

    /// Constructs a complex number from a magnitude and a phase in radians.
    ///
    /// # Example
    /// ```
    /// use mathtree::interpreter::value::complex::ComplexNumber;
    /// let c = ComplexNumber::from_polar(2.0, std::f64::consts::FRAC_PI_2);
    /// assert!(c.real.abs() < 1e-12);
    /// assert!((c.imaginary - 2.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn from_polar(magnitude: f64, phase: f64) -> Self {
        Self { real:      magnitude * phase.cos(),
               imaginary: magnitude * phase.sin(), }
    }

    /// The magnitude `|z|`.
    #[must_use]
    pub fn abs(self) -> f64 {
        self.real.hypot(self.imaginary)
    }

    /// The phase (argument) in radians, in `(-π, π]`.
    #[must_use]
    pub fn arg(self) -> f64 {
        self.imaginary.atan2(self.real)
    }

    /// The complex conjugate.
    #[must_use]
    pub const fn conj(self) -> Self {
        Self { real:      self.real,
               imaginary: -self.imaginary, }
    }

    /// The reciprocal `1 / z`.
    #[must_use]
    pub fn recip(self) -> Self {
        let norm = self.real.mul_add(self.real, self.imaginary * self.imaginary);
        Self { real:      self.real / norm,
               imaginary: -self.imaginary / norm, }
    }

    /// Returns `true` if the imaginary part is exactly zero.
    #[must_use]
    pub fn is_real(self) -> bool {
        self.imaginary == 0.0
    }

    /// The principal square root.
    ///
    /// # Example
    /// ```
    /// use mathtree::interpreter::value::complex::ComplexNumber;
    /// let root = ComplexNumber::new(-4.0, 0.0).sqrt();
    /// assert!(root.real.abs() < 1e-12);
    /// assert!((root.imaginary - 2.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn sqrt(self) -> Self {
        let magnitude = self.abs();
        Self { real:      f64::midpoint(magnitude, self.real).sqrt(),
               imaginary: ((magnitude - self.real) / 2.0).sqrt()
                                                         .copysign(self.imaginary), }
    }

    /// `e^z`.
    #[must_use]
    pub fn exp(self) -> Self {
        Self::from_polar(self.real.exp(), self.imaginary)
    }

    /// The principal natural logarithm.
    #[must_use]
    pub fn ln(self) -> Self {
        Self { real:      self.abs().ln(),
               imaginary: self.arg(), }
    }

    /// `z^w` using the principal branch of the logarithm.
    ///
    /// # Example
    /// ```
    /// use mathtree::interpreter::value::complex::{ComplexNumber, IMAGINARY_ONE};
    /// let minus_one = IMAGINARY_ONE.pow(ComplexNumber::new(2.0, 0.0));
    /// assert!((minus_one.real + 1.0).abs() < 1e-12);
    /// assert!(minus_one.imaginary.abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn pow(self, exponent: Self) -> Self {
        if self.real == 0.0 && self.imaginary == 0.0 {
            return if exponent.real == 0.0 && exponent.imaginary == 0.0 {
                Self::new(1.0, 0.0)
            } else {
                Self::new(0.0, 0.0)
            };
        }
        (self.ln() * exponent).exp()
    }

    /// Sine.
    #[must_use]
    pub fn sin(self) -> Self {
        Self { real:      self.real.sin() * self.imaginary.cosh(),
               imaginary: self.real.cos() * self.imaginary.sinh(), }
    }

    /// Cosine.
    #[must_use]
    pub fn cos(self) -> Self {
        Self { real:      self.real.cos() * self.imaginary.cosh(),
               imaginary: -self.real.sin() * self.imaginary.sinh(), }
    }

    /// Tangent.
    #[must_use]
    pub fn tan(self) -> Self {
        self.sin() / self.cos()
    }

    /// Hyperbolic sine.
    #[must_use]
    pub fn sinh(self) -> Self {
        Self { real:      self.real.sinh() * self.imaginary.cos(),
               imaginary: self.real.cosh() * self.imaginary.sin(), }
    }

    /// Hyperbolic cosine.
    #[must_use]
    pub fn cosh(self) -> Self {
        Self { real:      self.real.cosh() * self.imaginary.cos(),
               imaginary: self.real.sinh() * self.imaginary.sin(), }
    }

    /// Hyperbolic tangent.
    #[must_use]
    pub fn tanh(self) -> Self {
        self.sinh() / self.cosh()
    }
}

impl ops::Neg for ComplexNumber {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self { real:      -self.real,
               imaginary: -self.imaginary, }
    }
}

impl ops::Add for ComplexNumber {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self { real:      self.real + rhs.real,
               imaginary: self.imaginary + rhs.imaginary, }
    }
}

impl ops::Sub for ComplexNumber {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self { real:      self.real - rhs.real,
               imaginary: self.imaginary - rhs.imaginary, }
    }
}

impl ops::Mul for ComplexNumber {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self { real:      self.real
                              .mul_add(rhs.real, -(self.imaginary * rhs.imaginary)),
               imaginary: self.real.mul_add(rhs.imaginary, self.imaginary * rhs.real), }
    }
}

impl ops::Div for ComplexNumber {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        self * rhs.recip()
    }
}

impl From<f64> for ComplexNumber {
    fn from(value: f64) -> Self {
        Self::new(value, 0.0)
    }
}

impl PartialEq for ComplexNumber {
    fn eq(&self, other: &Self) -> bool {
        OrderedFloat(self.real) == OrderedFloat(other.real)
        && OrderedFloat(self.imaginary) == OrderedFloat(other.imaginary)
    }
}

impl Eq for ComplexNumber {}

impl Hash for ComplexNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        OrderedFloat(self.real).hash(state);
        OrderedFloat(self.imaginary).hash(state);
    }
}
