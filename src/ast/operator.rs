use std::fmt::Display;

use crate::ast::Expression;

/// Binding strength of an assignment or definition.
pub const ASSIGNMENT_PRECEDENCE: u8 = 0;
/// Binding strength of the ternary conditional.
pub const TERNARY_PRECEDENCE: u8 = 1;
/// Binding strength of prefix operators (`-x`, `!x`).
pub const PREFIX_PRECEDENCE: u8 = 13;
/// Binding strength of postfix operators (`x!`, `x++`).
pub const POSTFIX_PRECEDENCE: u8 = 15;
/// Binding strength of literals, variables, calls and other atoms.
pub const ATOM_PRECEDENCE: u8 = 16;

/// Operators that take a single operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// Arithmetic negation, `-x`.
    Minus,
    /// Logical or bitwise negation, `!x` / `not x`.
    Not,
    /// Factorial, `x!`.
    Factorial,
}

impl UnaryOperator {
    /// Returns the source text of the operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Minus => "-",
            Self::Not | Self::Factorial => "!",
        }
    }

    /// Returns `true` for operators written after their operand.
    #[must_use]
    pub const fn is_postfix(self) -> bool {
        matches!(self, Self::Factorial)
    }

    /// Returns the binding strength used when rendering the operator.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        if self.is_postfix() {
            POSTFIX_PRECEDENCE
        } else {
            PREFIX_PRECEDENCE
        }
    }
}

/// Operators that take two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%` / `mod`
    Mod,
    /// `^`
    Pow,
    /// `<`
    LessThan,
    /// `<=`
    LessOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterOrEqual,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `&` / `and`
    And,
    /// `|` / `or`
    Or,
    /// `xor`
    XOr,
    /// `&&`
    ConditionalAnd,
    /// `||`
    ConditionalOr,
    /// `->` / `=>` / `impl`
    Implication,
    /// `<->` / `<=>` / `eq` / `xnor`
    Equality,
    /// `nand`
    NAnd,
    /// `nor`
    NOr,
    /// `<<`
    LeftShift,
    /// `>>`
    RightShift,
}

impl BinaryOperator {
    /// Returns the canonical source text of the operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "^",
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::And => "&",
            Self::Or => "|",
            Self::XOr => "xor",
            Self::ConditionalAnd => "&&",
            Self::ConditionalOr => "||",
            Self::Implication => "->",
            Self::Equality => "<->",
            Self::NAnd => "nand",
            Self::NOr => "nor",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
        }
    }

    /// Returns the binding strength of the operator; higher binds tighter.
    ///
    /// The ordering mirrors the parser's descent, from `||` (loosest) to `^`
    /// (tightest).
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::ConditionalOr => 2,
            Self::ConditionalAnd => 3,
            Self::Implication | Self::Equality | Self::NAnd | Self::NOr => 4,
            Self::Or => 5,
            Self::XOr => 6,
            Self::And => 7,
            Self::Equal | Self::NotEqual => 8,
            Self::LessThan | Self::LessOrEqual | Self::GreaterThan | Self::GreaterOrEqual => 9,
            Self::LeftShift | Self::RightShift => 10,
            Self::Add | Self::Sub => 11,
            Self::Mul | Self::Div | Self::Mod => 12,
            Self::Pow => 14,
        }
    }

    /// Returns `true` for `^`, the only right-associative operator.
    #[must_use]
    pub const fn is_right_associative(self) -> bool {
        matches!(self, Self::Pow)
    }

    /// Returns `true` for operators producing a boolean from two comparable
    /// operands.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(self,
                 Self::LessThan
                 | Self::LessOrEqual
                 | Self::GreaterThan
                 | Self::GreaterOrEqual
                 | Self::Equal
                 | Self::NotEqual)
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Compound assignment operators, `x op= value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOperator {
    /// `+=`
    Add,
    /// `-=`
    Sub,
    /// `*=`
    Mul,
    /// `/=`
    Div,
    /// `<<=`
    LeftShift,
    /// `>>=`
    RightShift,
}

impl AssignOperator {
    /// Returns the source text of the operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+=",
            Self::Sub => "-=",
            Self::Mul => "*=",
            Self::Div => "/=",
            Self::LeftShift => "<<=",
            Self::RightShift => ">>=",
        }
    }

    /// The binary operator combining the current value with the right-hand
    /// side.
    #[must_use]
    pub const fn binary(self) -> BinaryOperator {
        match self {
            Self::Add => BinaryOperator::Add,
            Self::Sub => BinaryOperator::Sub,
            Self::Mul => BinaryOperator::Mul,
            Self::Div => BinaryOperator::Div,
            Self::LeftShift => BinaryOperator::LeftShift,
            Self::RightShift => BinaryOperator::RightShift,
        }
    }
}

/// Postfix increment and decrement, `x++` / `x--`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOperator {
    /// `++`
    Increment,
    /// `--`
    Decrement,
}

impl StepOperator {
    /// Returns the source text of the operator.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Increment => "++",
            Self::Decrement => "--",
        }
    }

    /// The amount added to the variable.
    #[must_use]
    pub const fn delta(self) -> f64 {
        match self {
            Self::Increment => 1.0,
            Self::Decrement => -1.0,
        }
    }
}

/// A unary operator applied to one operand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnaryExpression {
    operator: UnaryOperator,
    operand:  Box<Expression>,
}

impl UnaryExpression {
    /// Creates a new unary node.
    #[must_use]
    pub fn new(operator: UnaryOperator, operand: Expression) -> Self {
        Self { operator,
               operand: Box::new(operand) }
    }

    /// The operator.
    #[must_use]
    pub const fn operator(&self) -> UnaryOperator {
        self.operator
    }

    /// The operand.
    #[must_use]
    pub fn operand(&self) -> &Expression {
        &self.operand
    }

    /// Copies the node, replacing the operand when one is given.
    ///
    /// # Example
    /// ```
    /// use mathtree::ast::{Expression, UnaryExpression, UnaryOperator};
    ///
    /// let negated = UnaryExpression::new(UnaryOperator::Minus, Expression::variable("x"));
    /// let copy = negated.clone_with(Some(Expression::number(2.0)));
    /// assert_eq!(copy.operand(), &Expression::number(2.0));
    /// assert_eq!(negated.operand(), &Expression::variable("x"));
    /// ```
    #[must_use]
    pub fn clone_with(&self, operand: Option<Expression>) -> Self {
        Self::new(self.operator,
                  operand.unwrap_or_else(|| self.operand().clone()))
    }
}

/// A binary operator applied to two operands.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinaryExpression {
    operator: BinaryOperator,
    left:     Box<Expression>,
    right:    Box<Expression>,
}

impl BinaryExpression {
    /// Creates a new binary node.
    #[must_use]
    pub fn new(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Self { operator,
               left: Box::new(left),
               right: Box::new(right) }
    }

    /// The operator.
    #[must_use]
    pub const fn operator(&self) -> BinaryOperator {
        self.operator
    }

    /// The left operand.
    #[must_use]
    pub fn left(&self) -> &Expression {
        &self.left
    }

    /// The right operand.
    #[must_use]
    pub fn right(&self) -> &Expression {
        &self.right
    }

    /// Copies the node, replacing whichever operands are given.
    #[must_use]
    pub fn clone_with(&self, left: Option<Expression>, right: Option<Expression>) -> Self {
        Self::new(self.operator,
                  left.unwrap_or_else(|| self.left().clone()),
                  right.unwrap_or_else(|| self.right().clone()))
    }
}
