use std::{
    f64::consts::PI,
    fmt::Display,
    hash::{Hash, Hasher},
};

use ordered_float::OrderedFloat;

/// The unit an angle is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AngleUnit {
    /// Full turn is 360.
    Degree,
    /// Full turn is 2π.
    Radian,
    /// Full turn is 400.
    Gradian,
}

impl AngleUnit {
    /// How many units make up a full turn.
    #[must_use]
    pub const fn full_turn(self) -> f64 {
        match self {
            Self::Degree => 360.0,
            Self::Radian => 2.0 * PI,
            Self::Gradian => 400.0,
        }
    }
}

/// A numeric angle tagged with its unit.
///
/// The parser produces these from number literals followed by `°`, `deg`,
/// `rad` or `grad`. Arithmetic between two angles converts the right-hand
/// side into the unit of the left-hand side.
#[derive(Debug, Clone, Copy)]
pub struct AngleValue {
    /// The magnitude in [`AngleValue::unit`] units.
    pub value: f64,
    /// The unit of measure.
    pub unit:  AngleUnit,
}

impl AngleValue {
    /// Creates an angle in the given unit.
    #[must_use]
    pub const fn new(value: f64, unit: AngleUnit) -> Self {
        Self { value, unit }
    }

    /// Creates an angle in degrees.
    #[must_use]
    pub const fn degree(value: f64) -> Self {
        Self::new(value, AngleUnit::Degree)
    }

    /// Creates an angle in radians.
    #[must_use]
    pub const fn radian(value: f64) -> Self {
        Self::new(value, AngleUnit::Radian)
    }

    /// Creates an angle in gradians.
    #[must_use]
    pub const fn gradian(value: f64) -> Self {
        Self::new(value, AngleUnit::Gradian)
    }

    /// Converts the angle to `unit`.
    ///
    /// # Example
    /// ```
    /// use mathtree::interpreter::value::angle::{AngleUnit, AngleValue};
    ///
    /// let right = AngleValue::degree(90.0).to(AngleUnit::Gradian);
    /// assert!((right.value - 100.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn to(self, unit: AngleUnit) -> Self {
        if self.unit == unit {
            return self;
        }
        Self::new(self.value / self.unit.full_turn() * unit.full_turn(), unit)
    }

    /// The angle in degrees.
    #[must_use]
    pub fn to_degree(self) -> Self {
        self.to(AngleUnit::Degree)
    }

    /// The angle in radians.
    #[must_use]
    pub fn to_radian(self) -> Self {
        self.to(AngleUnit::Radian)
    }

    /// The angle in gradians.
    #[must_use]
    pub fn to_gradian(self) -> Self {
        self.to(AngleUnit::Gradian)
    }

    /// The magnitude in radians, ready for the trigonometric functions.
    #[must_use]
    pub fn radians(self) -> f64 {
        self.to_radian().value
    }

    /// Applies `op` to the magnitude, keeping the unit.
    #[must_use]
    pub fn map(self, op: impl FnOnce(f64) -> f64) -> Self {
        Self::new(op(self.value), self.unit)
    }
}

impl Display for AngleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.unit {
            AngleUnit::Degree => write!(f, "{}°", self.value),
            AngleUnit::Radian => write!(f, "{} rad", self.value),
            AngleUnit::Gradian => write!(f, "{} grad", self.value),
        }
    }
}

impl PartialEq for AngleValue {
    fn eq(&self, other: &Self) -> bool {
        self.unit == other.unit && OrderedFloat(self.value) == OrderedFloat(other.value)
    }
}

impl Eq for AngleValue {}

impl Hash for AngleValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        OrderedFloat(self.value).hash(state);
        self.unit.hash(state);
    }
}
