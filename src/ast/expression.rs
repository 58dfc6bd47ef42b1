use std::{convert::Infallible, fmt::Display};

use crate::{
    analyzer::{Analyzer, ContextAnalyzer, formatter::Formatter},
    ast::{
        Assign, BinaryExpression, BinaryOperator, BuiltinFunction, Conditional, Define, ForLoop,
        FunctionCall, Matrix, Number, Polar, Step, Undefine, UnaryExpression, UnaryOperator,
        UserFunctionCall, Variable, Vector, WhileLoop,
    },
    error::ExpressionError,
    interpreter::value::angle::AngleValue,
};

/// A node of the expression tree.
///
/// Trees are immutable: passes such as differentiation or simplification
/// build new trees and never edit one in place. Equality and hashing are
/// structural, so two independently built trees with the same shape and the
/// same leaves are equal.
///
/// Every semantic question about a tree (its value, derivative, simplified
/// form, rendering or result type) is answered by an [`Analyzer`] or
/// [`ContextAnalyzer`] through [`Expression::accept`] and
/// [`Expression::accept_with`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    /// A real number literal.
    Number(Number),
    /// `true` or `false`.
    Bool(bool),
    /// A complex literal, `magnitude∠phase°`.
    Complex(Polar),
    /// A string literal.
    String(String),
    /// A number with an angle unit, `30°`, `2 rad`.
    Angle(AngleValue),
    /// A named variable.
    Variable(Variable),
    /// A prefix or postfix operator.
    Unary(UnaryExpression),
    /// A binary operator.
    Binary(BinaryExpression),
    /// A built-in function call.
    Function(FunctionCall),
    /// A user-defined function call or declaration.
    UserFunction(UserFunctionCall),
    /// `{a, b, c}`
    Vector(Vector),
    /// `{{a, b}, {c, d}}`
    Matrix(Matrix),
    /// `if(c, a[, b])` or `c ? a : b`.
    Conditional(Conditional),
    /// `for(body, init, condition, iteration)`
    For(ForLoop),
    /// `while(body, condition)`
    While(WhileLoop),
    /// `key := value` or `def(key, value)`
    Define(Define),
    /// `undef(key)`
    Undefine(Undefine),
    /// `x += value` and the other compound assignments.
    Assign(Assign),
    /// `x++` / `x--`
    Step(Step),
}

/// The variant of an [`Expression`], without its payload.
///
/// Used by analyzers to report which kind of node they do not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Number,
    Bool,
    Complex,
    String,
    Angle,
    Variable,
    Unary(UnaryOperator),
    Binary(BinaryOperator),
    Function(BuiltinFunction),
    UserFunction,
    Vector,
    Matrix,
    Conditional,
    For,
    While,
    Define,
    Undefine,
    Assign,
    Step,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number => f.write_str("number"),
            Self::Bool => f.write_str("boolean"),
            Self::Complex => f.write_str("complex number"),
            Self::String => f.write_str("string"),
            Self::Angle => f.write_str("angle"),
            Self::Variable => f.write_str("variable"),
            Self::Unary(UnaryOperator::Minus) => f.write_str("unary minus"),
            Self::Unary(UnaryOperator::Not) => f.write_str("not"),
            Self::Unary(UnaryOperator::Factorial) => f.write_str("factorial"),
            Self::Binary(operator) => write!(f, "operator '{operator}'"),
            Self::Function(function) => write!(f, "function '{function}'"),
            Self::UserFunction => f.write_str("user function"),
            Self::Vector => f.write_str("vector"),
            Self::Matrix => f.write_str("matrix"),
            Self::Conditional => f.write_str("if"),
            Self::For => f.write_str("for"),
            Self::While => f.write_str("while"),
            Self::Define => f.write_str("def"),
            Self::Undefine => f.write_str("undef"),
            Self::Assign => f.write_str("assignment"),
            Self::Step => f.write_str("increment"),
        }
    }
}

impl Expression {
    /// Dispatches to the `analyzer` method registered for this variant.
    ///
    /// # Errors
    /// Returns whatever error the analyzer reports.
    ///
    /// # Example
    /// ```
    /// use mathtree::{analyzer::formatter::Formatter, ast::Expression};
    ///
    /// let sum = Expression::add(Expression::number(1.0), Expression::variable("x"));
    /// assert_eq!(sum.accept(&mut Formatter::new()), Ok("1 + x".to_string()));
    /// ```
    pub fn accept<A>(&self, analyzer: &mut A) -> Result<A::Output, A::Error>
        where A: Analyzer + ?Sized
    {
        match self {
            Self::Number(node) => analyzer.visit_number(*node),
            Self::Bool(value) => analyzer.visit_bool(*value),
            Self::Complex(value) => analyzer.visit_complex(*value),
            Self::String(value) => analyzer.visit_string(value),
            Self::Angle(value) => analyzer.visit_angle(*value),
            Self::Variable(node) => analyzer.visit_variable(node),
            Self::Unary(node) => analyzer.visit_unary(node),
            Self::Binary(node) => analyzer.visit_binary(node),
            Self::Function(node) => analyzer.visit_function(node),
            Self::UserFunction(node) => analyzer.visit_user_function(node),
            Self::Vector(node) => analyzer.visit_vector(node),
            Self::Matrix(node) => analyzer.visit_matrix(node),
            Self::Conditional(node) => analyzer.visit_conditional(node),
            Self::For(node) => analyzer.visit_for(node),
            Self::While(node) => analyzer.visit_while(node),
            Self::Define(node) => analyzer.visit_define(node),
            Self::Undefine(node) => analyzer.visit_undefine(node),
            Self::Assign(node) => analyzer.visit_assign(node),
            Self::Step(node) => analyzer.visit_step(node),
        }
    }

    /// Dispatches to the `analyzer` method registered for this variant,
    /// threading `context` through the call.
    ///
    /// # Errors
    /// Returns whatever error the analyzer reports.
    pub fn accept_with<C, A>(&self,
                             analyzer: &mut A,
                             context: &mut C)
                             -> Result<A::Output, A::Error>
        where C: ?Sized,
              A: ContextAnalyzer<C> + ?Sized
    {
        match self {
            Self::Number(node) => analyzer.visit_number(*node, context),
            Self::Bool(value) => analyzer.visit_bool(*value, context),
            Self::Complex(value) => analyzer.visit_complex(*value, context),
            Self::String(value) => analyzer.visit_string(value, context),
            Self::Angle(value) => analyzer.visit_angle(*value, context),
            Self::Variable(node) => analyzer.visit_variable(node, context),
            Self::Unary(node) => analyzer.visit_unary(node, context),
            Self::Binary(node) => analyzer.visit_binary(node, context),
            Self::Function(node) => analyzer.visit_function(node, context),
            Self::UserFunction(node) => analyzer.visit_user_function(node, context),
            Self::Vector(node) => analyzer.visit_vector(node, context),
            Self::Matrix(node) => analyzer.visit_matrix(node, context),
            Self::Conditional(node) => analyzer.visit_conditional(node, context),
            Self::For(node) => analyzer.visit_for(node, context),
            Self::While(node) => analyzer.visit_while(node, context),
            Self::Define(node) => analyzer.visit_define(node, context),
            Self::Undefine(node) => analyzer.visit_undefine(node, context),
            Self::Assign(node) => analyzer.visit_assign(node, context),
            Self::Step(node) => analyzer.visit_step(node, context),
        }
    }

    /// The variant of this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Number(_) => NodeKind::Number,
            Self::Bool(_) => NodeKind::Bool,
            Self::Complex(_) => NodeKind::Complex,
            Self::String(_) => NodeKind::String,
            Self::Angle(_) => NodeKind::Angle,
            Self::Variable(_) => NodeKind::Variable,
            Self::Unary(node) => NodeKind::Unary(node.operator()),
            Self::Binary(node) => NodeKind::Binary(node.operator()),
            Self::Function(node) => NodeKind::Function(node.function()),
            Self::UserFunction(_) => NodeKind::UserFunction,
            Self::Vector(_) => NodeKind::Vector,
            Self::Matrix(_) => NodeKind::Matrix,
            Self::Conditional(_) => NodeKind::Conditional,
            Self::For(_) => NodeKind::For,
            Self::While(_) => NodeKind::While,
            Self::Define(_) => NodeKind::Define,
            Self::Undefine(_) => NodeKind::Undefine,
            Self::Assign(_) => NodeKind::Assign,
            Self::Step(_) => NodeKind::Step,
        }
    }

    /// The direct children of this node, left to right.
    ///
    /// Matrix children are its elements in row-major order. The variable
    /// updated by an assignment or a step is part of the node, not a child.
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        match self {
            Self::Number(_)
            | Self::Bool(_)
            | Self::Complex(_)
            | Self::String(_)
            | Self::Angle(_)
            | Self::Variable(_)
            | Self::Step(_) => Vec::new(),
            Self::Unary(node) => vec![node.operand()],
            Self::Binary(node) => vec![node.left(), node.right()],
            Self::Function(node) => node.arguments().iter().collect(),
            Self::UserFunction(node) => node.arguments().iter().collect(),
            Self::Vector(node) => node.elements().iter().collect(),
            Self::Matrix(node) => node.elements().collect(),
            Self::Conditional(node) => {
                let mut children = vec![node.condition(), node.then()];
                children.extend(node.otherwise());
                children
            },
            Self::For(node) => vec![node.body(), node.init(), node.condition(), node.iteration()],
            Self::While(node) => vec![node.body(), node.condition()],
            Self::Define(node) => vec![node.key(), node.value()],
            Self::Undefine(node) => vec![node.key()],
            Self::Assign(node) => vec![node.value()],
        }
    }

    /// Copies the node, replacing any subset of its children.
    ///
    /// `replacements` holds one slot per child (in [`Expression::children`]
    /// order); `None` keeps a deep copy of the existing child. An empty
    /// replacement list is accepted for leaves.
    ///
    /// # Errors
    /// - [`ExpressionError::ChildCount`] if `replacements` does not have one
    ///   slot per child.
    /// - Any construction error of the rebuilt node, for example replacing a
    ///   definition key by something that cannot be assigned.
    ///
    /// # Example
    /// ```
    /// use mathtree::ast::Expression;
    ///
    /// let sum = Expression::add(Expression::variable("x"), Expression::number(1.0));
    /// let copy = sum.clone_with(vec![None, Some(Expression::number(2.0))]).unwrap();
    /// assert_eq!(copy,
    ///            Expression::add(Expression::variable("x"), Expression::number(2.0)));
    /// ```
    pub fn clone_with(&self, replacements: Vec<Option<Self>>) -> Result<Self, ExpressionError> {
        let current = self.children();
        if current.len() != replacements.len() {
            return Err(ExpressionError::ChildCount { kind:     self.kind(),
                                                     expected: current.len(),
                                                     found:    replacements.len(), });
        }
        let mut children = current.into_iter()
                                  .zip(replacements)
                                  .map(|(old, new)| new.unwrap_or_else(|| old.clone()));
        self.rebuild(&mut children)
    }

    /// Builds a node of the same variant from freshly supplied children.
    fn rebuild(&self, children: &mut impl Iterator<Item = Self>) -> Result<Self, ExpressionError> {
        let kind = self.kind();
        let mut next = || {
            children.next().ok_or(ExpressionError::ChildCount { kind,
                                                                expected: 0,
                                                                found: 0 })
        };
        let rebuilt = match self {
            Self::Number(_)
            | Self::Bool(_)
            | Self::Complex(_)
            | Self::String(_)
            | Self::Angle(_)
            | Self::Variable(_)
            | Self::Step(_) => self.clone(),
            Self::Unary(node) => Self::Unary(node.clone_with(Some(next()?))),
            Self::Binary(node) => Self::Binary(node.clone_with(Some(next()?), Some(next()?))),
            Self::Function(node) => {
                let arguments = (0..node.arguments().len()).map(|_| next())
                                                           .collect::<Result<_, _>>()?;
                Self::Function(FunctionCall::new(node.function(), arguments)?)
            },
            Self::UserFunction(node) => {
                let arguments = (0..node.arguments().len()).map(|_| next())
                                                           .collect::<Result<_, _>>()?;
                Self::UserFunction(UserFunctionCall::new(node.name(), arguments))
            },
            Self::Vector(node) => {
                let elements = (0..node.len()).map(|_| next()).collect::<Result<_, _>>()?;
                Self::Vector(Vector::new(elements)?)
            },
            Self::Matrix(node) => {
                let mut rows = Vec::with_capacity(node.row_count());
                for _ in 0..node.row_count() {
                    let elements = (0..node.column_count()).map(|_| next())
                                                           .collect::<Result<_, _>>()?;
                    rows.push(Vector::new(elements)?);
                }
                Self::Matrix(Matrix::new(rows)?)
            },
            Self::Conditional(node) => {
                let condition = next()?;
                let then = next()?;
                let otherwise = match node.otherwise() {
                    Some(_) => Some(next()?),
                    None => None,
                };
                Self::Conditional(Conditional::new(condition, then, otherwise))
            },
            Self::For(_) => Self::For(ForLoop::new(next()?, next()?, next()?, next()?)),
            Self::While(_) => Self::While(WhileLoop::new(next()?, next()?)),
            Self::Define(_) => Self::Define(Define::new(next()?, next()?)?),
            Self::Undefine(_) => Self::Undefine(Undefine::new(next()?)?),
            Self::Assign(node) => {
                Self::Assign(Assign::new(node.operator(), node.variable().clone(), next()?))
            },
        };
        Ok(rebuilt)
    }

    /// Returns `true` if a variable named `name` occurs anywhere in the tree.
    ///
    /// # Example
    /// ```
    /// use mathtree::ast::Expression;
    ///
    /// let tree = Expression::mul(Expression::number(2.0), Expression::variable("x"));
    /// assert!(tree.has_variable("x"));
    /// assert!(!tree.has_variable("y"));
    /// ```
    #[must_use]
    pub fn has_variable(&self, name: &str) -> bool {
        match self {
            Self::Variable(variable) => variable.name() == name,
            Self::Assign(node) => node.variable().name() == name || node.value().has_variable(name),
            Self::Step(node) => node.variable().name() == name,
            _ => self.children().into_iter().any(|child| child.has_variable(name)),
        }
    }

    /// Returns the value of a number literal.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(number.value()),
            _ => None,
        }
    }
}

/// Convenience constructors used by the parser, the analyzers and hosts
/// building trees by hand.
impl Expression {
    /// A number literal.
    #[must_use]
    pub const fn number(value: f64) -> Self {
        Self::Number(Number::new(value))
    }

    /// A boolean literal.
    #[must_use]
    pub const fn bool(value: bool) -> Self {
        Self::Bool(value)
    }

    /// A string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// A variable reference.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(Variable::new(name))
    }

    /// A unary node.
    #[must_use]
    pub fn unary(operator: UnaryOperator, operand: Self) -> Self {
        Self::Unary(UnaryExpression::new(operator, operand))
    }

    /// `-operand`
    #[must_use]
    pub fn negate(operand: Self) -> Self {
        Self::unary(UnaryOperator::Minus, operand)
    }

    /// `!operand`
    #[must_use]
    pub fn not(operand: Self) -> Self {
        Self::unary(UnaryOperator::Not, operand)
    }

    /// `operand!`
    #[must_use]
    pub fn factorial(operand: Self) -> Self {
        Self::unary(UnaryOperator::Factorial, operand)
    }

    /// A binary node.
    #[must_use]
    pub fn binary(operator: BinaryOperator, left: Self, right: Self) -> Self {
        Self::Binary(BinaryExpression::new(operator, left, right))
    }

    /// `left + right`
    #[must_use]
    pub fn add(left: Self, right: Self) -> Self {
        Self::binary(BinaryOperator::Add, left, right)
    }

    /// `left - right`
    #[must_use]
    pub fn sub(left: Self, right: Self) -> Self {
        Self::binary(BinaryOperator::Sub, left, right)
    }

    /// `left * right`
    #[must_use]
    pub fn mul(left: Self, right: Self) -> Self {
        Self::binary(BinaryOperator::Mul, left, right)
    }

    /// `left / right`
    #[must_use]
    pub fn div(left: Self, right: Self) -> Self {
        Self::binary(BinaryOperator::Div, left, right)
    }

    /// `left ^ right`
    #[must_use]
    pub fn pow(left: Self, right: Self) -> Self {
        Self::binary(BinaryOperator::Pow, left, right)
    }

    /// A built-in function call.
    ///
    /// # Errors
    /// Returns [`ExpressionError::ParameterCount`] for a wrong argument count.
    pub fn function(function: BuiltinFunction,
                    arguments: Vec<Self>)
                    -> Result<Self, ExpressionError> {
        FunctionCall::new(function, arguments).map(Self::Function)
    }

    /// A one-argument built-in function call.
    ///
    /// # Errors
    /// Returns [`ExpressionError::ParameterCount`] if `function` does not
    /// accept a single argument.
    pub fn call(function: BuiltinFunction, argument: Self) -> Result<Self, ExpressionError> {
        Self::function(function, vec![argument])
    }

    /// A vector literal.
    ///
    /// # Errors
    /// Returns [`ExpressionError::EmptyVector`] if `elements` is empty.
    pub fn vector(elements: Vec<Self>) -> Result<Self, ExpressionError> {
        Vector::new(elements).map(Self::Vector)
    }

    /// A matrix literal built from rows of elements.
    ///
    /// # Errors
    /// Returns a construction error for an empty or ragged matrix.
    pub fn matrix(rows: Vec<Vec<Self>>) -> Result<Self, ExpressionError> {
        let rows = rows.into_iter().map(Vector::new).collect::<Result<_, _>>()?;
        Matrix::new(rows).map(Self::Matrix)
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<bool> for Expression {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Variable> for Expression {
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Result<String, Infallible> = self.accept(&mut Formatter::new());
        match rendered {
            Ok(text) => f.write_str(&text),
            Err(never) => match never {},
        }
    }
}
