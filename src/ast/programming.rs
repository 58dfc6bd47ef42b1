use crate::{
    ast::{AssignOperator, BuiltinFunction, Expression, StepOperator, Variable},
    error::ExpressionError,
};

/// `if(condition, then[, else])`, also produced by `condition ? then : else`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Conditional {
    condition: Box<Expression>,
    then:      Box<Expression>,
    otherwise: Option<Box<Expression>>,
}

impl Conditional {
    /// Creates a conditional; `otherwise` is the optional else branch.
    #[must_use]
    pub fn new(condition: Expression, then: Expression, otherwise: Option<Expression>) -> Self {
        Self { condition: Box::new(condition),
               then:      Box::new(then),
               otherwise: otherwise.map(Box::new), }
    }

    /// The condition.
    #[must_use]
    pub fn condition(&self) -> &Expression {
        &self.condition
    }

    /// The branch taken when the condition holds.
    #[must_use]
    pub fn then(&self) -> &Expression {
        &self.then
    }

    /// The branch taken otherwise, if any.
    #[must_use]
    pub fn otherwise(&self) -> Option<&Expression> {
        self.otherwise.as_deref()
    }
}

/// `for(body, init, condition, iteration)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForLoop {
    body:      Box<Expression>,
    init:      Box<Expression>,
    condition: Box<Expression>,
    iteration: Box<Expression>,
}

impl ForLoop {
    /// Creates a loop.
    #[must_use]
    pub fn new(body: Expression,
               init: Expression,
               condition: Expression,
               iteration: Expression)
               -> Self {
        Self { body:      Box::new(body),
               init:      Box::new(init),
               condition: Box::new(condition),
               iteration: Box::new(iteration), }
    }

    /// Evaluated once per iteration.
    #[must_use]
    pub fn body(&self) -> &Expression {
        &self.body
    }

    /// Evaluated once before the first iteration.
    #[must_use]
    pub fn init(&self) -> &Expression {
        &self.init
    }

    /// Checked before each iteration.
    #[must_use]
    pub fn condition(&self) -> &Expression {
        &self.condition
    }

    /// Evaluated after each iteration.
    #[must_use]
    pub fn iteration(&self) -> &Expression {
        &self.iteration
    }
}

/// `while(body, condition)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WhileLoop {
    body:      Box<Expression>,
    condition: Box<Expression>,
}

impl WhileLoop {
    /// Creates a loop.
    #[must_use]
    pub fn new(body: Expression, condition: Expression) -> Self {
        Self { body:      Box::new(body),
               condition: Box::new(condition), }
    }

    /// Evaluated while the condition holds.
    #[must_use]
    pub fn body(&self) -> &Expression {
        &self.body
    }

    /// Checked before each iteration.
    #[must_use]
    pub fn condition(&self) -> &Expression {
        &self.condition
    }
}

/// Checks that `key` names something a definition can bind: a variable, or
/// a user function declaration whose parameters are all variables.
///
/// # Errors
/// Returns [`ExpressionError::InvalidAssignmentKey`],
/// [`ExpressionError::InvalidFunctionDeclaration`] or
/// [`ExpressionError::BuiltinRedefinition`].
pub fn check_assignment_key(key: &Expression) -> Result<(), ExpressionError> {
    match key {
        Expression::Variable(_) => Ok(()),
        Expression::UserFunction(function) => {
            if BuiltinFunction::from_name(function.name()).is_some() {
                return Err(ExpressionError::BuiltinRedefinition { name: function.name()
                                                                             .to_string() });
            }
            if function.parameter_names().is_none() {
                return Err(ExpressionError::InvalidFunctionDeclaration { name: function.name()
                                                                                   .to_string() });
            }
            Ok(())
        },
        Expression::Function(function) => {
            Err(ExpressionError::BuiltinRedefinition { name: function.function()
                                                                     .name()
                                                                     .to_string() })
        },
        other => Err(ExpressionError::InvalidAssignmentKey { kind: other.kind() }),
    }
}

/// Binds a variable or user function: `key := value` or `def(key, value)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Define {
    key:   Box<Expression>,
    value: Box<Expression>,
}

impl Define {
    /// Creates a definition.
    ///
    /// # Errors
    /// Fails when `key` is neither a variable nor a valid function
    /// declaration, see [`check_assignment_key`].
    pub fn new(key: Expression, value: Expression) -> Result<Self, ExpressionError> {
        check_assignment_key(&key)?;
        Ok(Self { key:   Box::new(key),
                  value: Box::new(value), })
    }

    /// The bound name: a [`Expression::Variable`] or a
    /// [`Expression::UserFunction`] declaration.
    #[must_use]
    pub fn key(&self) -> &Expression {
        &self.key
    }

    /// The bound value or function body.
    #[must_use]
    pub fn value(&self) -> &Expression {
        &self.value
    }
}

/// Removes a binding: `undef(key)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Undefine {
    key: Box<Expression>,
}

impl Undefine {
    /// Creates an undefinition.
    ///
    /// # Errors
    /// Fails when `key` is neither a variable nor a valid function
    /// declaration, see [`check_assignment_key`].
    pub fn new(key: Expression) -> Result<Self, ExpressionError> {
        check_assignment_key(&key)?;
        Ok(Self { key: Box::new(key) })
    }

    /// The name to remove.
    #[must_use]
    pub fn key(&self) -> &Expression {
        &self.key
    }
}

/// A compound assignment, `variable op= value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assign {
    operator: AssignOperator,
    variable: Variable,
    value:    Box<Expression>,
}

impl Assign {
    /// Creates a compound assignment.
    #[must_use]
    pub fn new(operator: AssignOperator, variable: Variable, value: Expression) -> Self {
        Self { operator,
               variable,
               value: Box::new(value) }
    }

    /// The operator.
    #[must_use]
    pub const fn operator(&self) -> AssignOperator {
        self.operator
    }

    /// The updated variable.
    #[must_use]
    pub const fn variable(&self) -> &Variable {
        &self.variable
    }

    /// The right-hand side.
    #[must_use]
    pub fn value(&self) -> &Expression {
        &self.value
    }
}

/// `variable++` or `variable--`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Step {
    operator: StepOperator,
    variable: Variable,
}

impl Step {
    /// Creates an increment or decrement.
    #[must_use]
    pub const fn new(operator: StepOperator, variable: Variable) -> Self {
        Self { operator, variable }
    }

    /// The operator.
    #[must_use]
    pub const fn operator(&self) -> StepOperator {
        self.operator
    }

    /// The updated variable.
    #[must_use]
    pub const fn variable(&self) -> &Variable {
        &self.variable
    }
}
