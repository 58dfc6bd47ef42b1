use std::fmt::Display;

use crate::{ast::Expression, error::ExpressionError};

/// Declares the built-in function table.
///
/// Each entry provides the enum variant, the name used in formulas and the
/// inclusive parameter bounds (`None` means unbounded). The macro produces the
/// [`BuiltinFunction`] enum together with its name lookup and arity
/// accessors.
macro_rules! builtin_functions {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => { name: $name:literal, min: $min:expr, max: $max:expr $(,)? }
        ),* $(,)?
    ) => {
        /// A function known to the parser and every analyzer.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum BuiltinFunction {
            $(
                $(#[$meta])*
                $variant,
            )*
        }

        impl BuiltinFunction {
            /// Every built-in function, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// The name used to call the function.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// The smallest accepted number of arguments.
            #[must_use]
            pub const fn min_parameters(self) -> usize {
                match self {
                    $(Self::$variant => $min,)*
                }
            }

            /// The largest accepted number of arguments, `None` if unbounded.
            #[must_use]
            pub const fn max_parameters(self) -> Option<usize> {
                match self {
                    $(Self::$variant => $max,)*
                }
            }

            /// Looks a function up by the name used in formulas.
            ///
            /// # Example
            /// ```
            /// use mathtree::ast::BuiltinFunction;
            ///
            /// assert_eq!(BuiltinFunction::from_name("sin"), Some(BuiltinFunction::Sin));
            /// assert_eq!(BuiltinFunction::from_name("f"), None);
            /// ```
            #[must_use]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

builtin_functions! {
    /// `abs(x)`
    Abs          => { name: "abs",          min: 1, max: Some(1) },
    /// `sqrt(x)`
    Sqrt         => { name: "sqrt",         min: 1, max: Some(1) },
    /// `root(x, n)`, the `n`-th root of `x`.
    Root         => { name: "root",         min: 2, max: Some(2) },
    /// `exp(x)`
    Exp          => { name: "exp",          min: 1, max: Some(1) },
    /// Natural logarithm.
    Ln           => { name: "ln",           min: 1, max: Some(1) },
    /// Base-10 logarithm.
    Lg           => { name: "lg",           min: 1, max: Some(1) },
    /// Base-2 logarithm.
    Lb           => { name: "lb",           min: 1, max: Some(1) },
    /// `log(x, base)`
    Log          => { name: "log",          min: 2, max: Some(2) },
    Sin          => { name: "sin",          min: 1, max: Some(1) },
    Cos          => { name: "cos",          min: 1, max: Some(1) },
    Tan          => { name: "tan",          min: 1, max: Some(1) },
    Cot          => { name: "cot",          min: 1, max: Some(1) },
    Sec          => { name: "sec",          min: 1, max: Some(1) },
    Csc          => { name: "csc",          min: 1, max: Some(1) },
    Arcsin       => { name: "arcsin",       min: 1, max: Some(1) },
    Arccos       => { name: "arccos",       min: 1, max: Some(1) },
    Arctan       => { name: "arctan",       min: 1, max: Some(1) },
    Arccot       => { name: "arccot",       min: 1, max: Some(1) },
    Arcsec       => { name: "arcsec",       min: 1, max: Some(1) },
    Arccsc       => { name: "arccsc",       min: 1, max: Some(1) },
    Sinh         => { name: "sinh",         min: 1, max: Some(1) },
    Cosh         => { name: "cosh",         min: 1, max: Some(1) },
    Tanh         => { name: "tanh",         min: 1, max: Some(1) },
    Coth         => { name: "coth",         min: 1, max: Some(1) },
    Sech         => { name: "sech",         min: 1, max: Some(1) },
    Csch         => { name: "csch",         min: 1, max: Some(1) },
    Arsinh       => { name: "arsinh",       min: 1, max: Some(1) },
    Arcosh       => { name: "arcosh",       min: 1, max: Some(1) },
    Artanh       => { name: "artanh",       min: 1, max: Some(1) },
    Arcoth       => { name: "arcoth",       min: 1, max: Some(1) },
    Arsech       => { name: "arsech",       min: 1, max: Some(1) },
    Arcsch       => { name: "arcsch",       min: 1, max: Some(1) },
    Floor        => { name: "floor",        min: 1, max: Some(1) },
    Ceil         => { name: "ceil",         min: 1, max: Some(1) },
    Trunc        => { name: "trunc",        min: 1, max: Some(1) },
    Frac         => { name: "frac",         min: 1, max: Some(1) },
    /// `round(x)` or `round(x, digits)`.
    Round        => { name: "round",        min: 1, max: Some(2) },
    Sign         => { name: "sign",         min: 1, max: Some(1) },
    /// Real part of a complex number.
    Re           => { name: "re",           min: 1, max: Some(1) },
    /// Imaginary part of a complex number.
    Im           => { name: "im",           min: 1, max: Some(1) },
    /// Phase of a complex number, in radians.
    Phase        => { name: "phase",        min: 1, max: Some(1) },
    Conjugate    => { name: "conjugate",    min: 1, max: Some(1) },
    Reciprocal   => { name: "reciprocal",   min: 1, max: Some(1) },
    ToDegree     => { name: "todeg",        min: 1, max: Some(1) },
    ToRadian     => { name: "torad",        min: 1, max: Some(1) },
    ToGradian    => { name: "tograd",       min: 1, max: Some(1) },
    /// Strips the unit from an angle.
    ToNumber     => { name: "tonumber",     min: 1, max: Some(1) },
    /// Integer to a `0b...` string.
    ToBin        => { name: "tobin",        min: 1, max: Some(1) },
    /// Integer to a `0o...` string.
    ToOct        => { name: "tooct",        min: 1, max: Some(1) },
    /// Integer to a `0x...` string.
    ToHex        => { name: "tohex",        min: 1, max: Some(1) },
    /// Largest of the numbers, or of the elements of one vector.
    Max          => { name: "max",          min: 1, max: None },
    /// Smallest of the numbers, or of the elements of one vector.
    Min          => { name: "min",          min: 1, max: None },
    Avg          => { name: "avg",          min: 1, max: None },
    Sum          => { name: "sum",          min: 1, max: None },
    Product      => { name: "product",      min: 1, max: None },
    Gcd          => { name: "gcd",          min: 2, max: None },
    Lcm          => { name: "lcm",          min: 2, max: None },
    Transpose    => { name: "transpose",    min: 1, max: Some(1) },
    Determinant  => { name: "det",          min: 1, max: Some(1) },
    Inverse      => { name: "inverse",      min: 1, max: Some(1) },
    DotProduct   => { name: "dotproduct",   min: 2, max: Some(2) },
    CrossProduct => { name: "crossproduct", min: 2, max: Some(2) },
    /// `deriv(f)`, `deriv(f, x)` or `deriv(f, x, point)`.
    Derivative   => { name: "deriv",        min: 1, max: Some(3) },
    /// `simplify(f)`
    Simplify     => { name: "simplify",     min: 1, max: Some(1) },
}

impl BuiltinFunction {
    /// Returns `true` if `count` arguments are accepted.
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        if count < self.min_parameters() {
            return false;
        }
        match self.max_parameters() {
            Some(max) => count <= max,
            None => true,
        }
    }

    /// Returns `true` for functions that receive their arguments as
    /// unevaluated expression trees.
    #[must_use]
    pub const fn is_symbolic(self) -> bool {
        matches!(self, Self::Derivative | Self::Simplify)
    }
}

impl Display for BuiltinFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A call of a built-in function.
///
/// The argument count is checked against the function's bounds on
/// construction, so every `FunctionCall` in a tree is well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionCall {
    function:  BuiltinFunction,
    arguments: Vec<Expression>,
}

impl FunctionCall {
    /// Creates a call node.
    ///
    /// # Errors
    /// Returns [`ExpressionError::ParameterCount`] when the number of
    /// arguments is outside the function's bounds.
    ///
    /// # Example
    /// ```
    /// use mathtree::ast::{BuiltinFunction, Expression, FunctionCall};
    ///
    /// assert!(FunctionCall::new(BuiltinFunction::Sin, vec![Expression::variable("x")]).is_ok());
    /// assert!(FunctionCall::new(BuiltinFunction::Sin, vec![]).is_err());
    /// ```
    pub fn new(function: BuiltinFunction,
               arguments: Vec<Expression>)
               -> Result<Self, ExpressionError> {
        check_parameter_count(function, arguments.len())?;
        Ok(Self { function, arguments })
    }

    /// The called function.
    #[must_use]
    pub const fn function(&self) -> BuiltinFunction {
        self.function
    }

    /// The arguments, in call order.
    #[must_use]
    pub fn arguments(&self) -> &[Expression] {
        &self.arguments
    }

    /// The first argument; every built-in takes at least one.
    #[must_use]
    pub fn argument(&self) -> &Expression {
        &self.arguments[0]
    }
}

/// Validates an argument count against a function's declared bounds.
///
/// # Errors
/// Returns [`ExpressionError::ParameterCount`] when `count` is out of range.
pub fn check_parameter_count(function: BuiltinFunction,
                             count: usize)
                             -> Result<(), ExpressionError> {
    if function.accepts(count) {
        return Ok(());
    }
    Err(ExpressionError::ParameterCount { function: function.name(),
                                          min: function.min_parameters(),
                                          max: function.max_parameters(),
                                          found: count })
}

/// A call of a user-defined function, resolved by name and arity at
/// evaluation time.
///
/// The same node doubles as the key of a function definition,
/// `f(x, y) := x + y`, where every argument is a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserFunctionCall {
    name:      String,
    arguments: Vec<Expression>,
}

impl UserFunctionCall {
    /// Creates a call node.
    #[must_use]
    pub fn new(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Self { name: name.into(),
               arguments }
    }

    /// The function name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The arguments, in call order.
    #[must_use]
    pub fn arguments(&self) -> &[Expression] {
        &self.arguments
    }

    /// The parameter names when the call is a valid declaration, `None` if
    /// any argument is not a plain variable.
    #[must_use]
    pub fn parameter_names(&self) -> Option<Vec<String>> {
        self.arguments
            .iter()
            .map(|argument| match argument {
                Expression::Variable(variable) => Some(variable.name().to_string()),
                _ => None,
            })
            .collect()
    }
}
