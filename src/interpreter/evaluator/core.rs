use std::{
    collections::HashMap,
    f64::consts::{E, PI},
};

use crate::{
    analyzer::ContextAnalyzer,
    ast::{
        Assign, BinaryExpression, BinaryOperator, Conditional, Define, Expression, ForLoop,
        FunctionCall, Matrix, NodeKind, Number, Polar, Step, Undefine, UnaryExpression,
        UserFunctionCall, Variable, Vector, WhileLoop,
    },
    error::RuntimeError,
    interpreter::{
        evaluator::{binary::evaluate_binary, function::evaluate_function, unary::evaluate_unary},
        value::{angle::AngleValue, complex::IMAGINARY_ONE, core::Value},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// A user-defined function: parameter names and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDefinition {
    /// Parameter names, in call order.
    pub parameters: Vec<String>,
    /// The body, evaluated with the parameters bound.
    pub body:       Expression,
}

/// The variable and function bindings an evaluation reads and writes.
///
/// Variables live in a stack of scopes: the outermost scope holds global
/// definitions, and every user-function call pushes a scope binding its
/// parameters. Constants sit below all scopes and cannot be changed.
/// User functions are keyed by name and arity, so `f(x)` and `f(x, y)` are
/// different functions.
///
/// ## Usage
///
/// One `ExpressionParameters` is typically kept for a whole session and
/// passed to every [`Expression::execute`] call, so that definitions made by
/// one formula are visible to the next.
#[derive(Debug, Clone)]
pub struct ExpressionParameters {
    scope_stack: Vec<HashMap<String, Value>>,
    constants:   HashMap<String, Value>,
    functions:   HashMap<(String, usize), FunctionDefinition>,
}

impl Default for ExpressionParameters {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionParameters {
    /// Creates bindings with the constants `pi`, `π`, `e` and `i`.
    ///
    /// # Example
    /// ```
    /// use mathtree::interpreter::{evaluator::core::ExpressionParameters, value::core::Value};
    ///
    /// let parameters = ExpressionParameters::new();
    /// assert_eq!(parameters.variable("pi"), Some(&Value::Number(std::f64::consts::PI)));
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let mut parameters = Self::without_constants();
        parameters.constants.insert("pi".to_string(), Value::Number(PI));
        parameters.constants.insert("π".to_string(), Value::Number(PI));
        parameters.constants.insert("e".to_string(), Value::Number(E));
        parameters.constants.insert("i".to_string(), Value::Complex(IMAGINARY_ONE));
        parameters
    }

    /// Creates empty bindings.
    #[must_use]
    pub fn without_constants() -> Self {
        Self { scope_stack: vec![HashMap::new()],
               constants:   HashMap::new(),
               functions:   HashMap::new(), }
    }

    /// Looks a variable up, innermost scope first, then the constants.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.scope_stack
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .or_else(|| self.constants.get(name))
    }

    /// Returns `true` if `name` is a constant.
    #[must_use]
    pub fn is_constant(&self, name: &str) -> bool {
        self.constants.contains_key(name)
    }

    /// Binds a variable.
    ///
    /// An existing binding is updated in the scope that holds it; a new one
    /// is created in the innermost scope.
    ///
    /// # Errors
    /// Returns [`RuntimeError::ConstantAssignment`] if `name` is a constant.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> EvalResult<()> {
        if self.is_constant(name) {
            return Err(RuntimeError::ConstantAssignment { name: name.to_string() });
        }
        let value = value.into();
        if let Some(scope) = self.scope_stack
                                 .iter_mut()
                                 .rev()
                                 .find(|scope| scope.contains_key(name))
        {
            scope.insert(name.to_string(), value);
        } else if let Some(scope) = self.scope_stack.last_mut() {
            scope.insert(name.to_string(), value);
        }
        Ok(())
    }

    /// Removes the innermost binding of a variable and returns its value.
    ///
    /// # Errors
    /// Returns [`RuntimeError::ConstantAssignment`] if `name` is a constant.
    pub fn remove(&mut self, name: &str) -> EvalResult<Option<Value>> {
        if self.is_constant(name) {
            return Err(RuntimeError::ConstantAssignment { name: name.to_string() });
        }
        Ok(self.scope_stack
               .iter_mut()
               .rev()
               .find_map(|scope| scope.remove(name)))
    }

    /// Looks a user function up by name and arity.
    #[must_use]
    pub fn function(&self, name: &str, arity: usize) -> Option<&FunctionDefinition> {
        self.functions.get(&(name.to_string(), arity))
    }

    /// Defines or replaces a user function.
    pub fn define_function(&mut self, name: &str, definition: FunctionDefinition) {
        let key = (name.to_string(), definition.parameters.len());
        self.functions.insert(key, definition);
    }

    /// Removes a user function and returns its definition.
    pub fn remove_function(&mut self, name: &str, arity: usize) -> Option<FunctionDefinition> {
        self.functions.remove(&(name.to_string(), arity))
    }

    /// Opens a scope holding `bindings`.
    pub fn push_scope(&mut self, bindings: HashMap<String, Value>) {
        self.scope_stack.push(bindings);
    }

    /// Closes the innermost scope. The global scope is never removed.
    pub fn pop_scope(&mut self) {
        if self.scope_stack.len() > 1 {
            self.scope_stack.pop();
        }
    }

    /// The number of open scopes, including the global one.
    #[must_use]
    pub fn scope_depth(&self) -> usize {
        self.scope_stack.len()
    }
}

/// The evaluation pass.
///
/// Reduces a tree to a [`Value`], reading and writing variables and user
/// functions in an [`ExpressionParameters`]. Definition, assignment and loop
/// nodes are the only ones with side effects.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    /// Creates an evaluator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluates `expression` with this evaluator.
    pub(crate) fn eval(&mut self,
                       expression: &Expression,
                       parameters: &mut ExpressionParameters)
                       -> EvalResult<Value> {
        expression.accept_with(self, parameters)
    }
}

impl Expression {
    /// Evaluates the tree against `parameters`.
    ///
    /// # Errors
    /// Returns a [`RuntimeError`] when operand types do not fit, a name is
    /// unbound or an argument is outside a function's domain.
    ///
    /// # Example
    /// ```
    /// use mathtree::{
    ///     interpreter::{
    ///         evaluator::core::ExpressionParameters, parser::core::parse, value::core::Value,
    ///     },
    /// };
    ///
    /// let mut parameters = ExpressionParameters::new();
    /// parameters.set("x", 3.0).unwrap();
    ///
    /// let tree = parse("2x^2").unwrap();
    /// assert_eq!(tree.execute(&mut parameters), Ok(Value::Number(18.0)));
    /// ```
    pub fn execute(&self, parameters: &mut ExpressionParameters) -> EvalResult<Value> {
        Evaluator.eval(self, parameters)
    }

    /// Evaluates the tree with only the built-in constants bound.
    ///
    /// # Errors
    /// See [`Expression::execute`].
    pub fn evaluate(&self) -> EvalResult<Value> {
        self.execute(&mut ExpressionParameters::new())
    }
}

impl ContextAnalyzer<ExpressionParameters> for Evaluator {
    type Error = RuntimeError;
    type Output = Value;

    fn not_supported(&mut self,
                     kind: NodeKind,
                     _parameters: &mut ExpressionParameters)
                     -> EvalResult<Value> {
        Err(RuntimeError::NotSupported { kind })
    }

    fn visit_number(&mut self,
                    node: Number,
                    _parameters: &mut ExpressionParameters)
                    -> EvalResult<Value> {
        Ok(Value::Number(node.value()))
    }

    fn visit_bool(&mut self,
                  value: bool,
                  _parameters: &mut ExpressionParameters)
                  -> EvalResult<Value> {
        Ok(Value::Bool(value))
    }

    fn visit_complex(&mut self,
                     value: Polar,
                     _parameters: &mut ExpressionParameters)
                     -> EvalResult<Value> {
        Ok(Value::Complex(value.value()))
    }

    fn visit_string(&mut self,
                    value: &str,
                    _parameters: &mut ExpressionParameters)
                    -> EvalResult<Value> {
        Ok(Value::from(value))
    }

    fn visit_angle(&mut self,
                   value: AngleValue,
                   _parameters: &mut ExpressionParameters)
                   -> EvalResult<Value> {
        Ok(Value::Angle(value))
    }

    fn visit_variable(&mut self,
                      node: &Variable,
                      parameters: &mut ExpressionParameters)
                      -> EvalResult<Value> {
        parameters.variable(node.name())
                  .cloned()
                  .ok_or_else(|| RuntimeError::UnknownVariable { name: node.name().to_string() })
    }

    fn visit_unary(&mut self,
                   node: &UnaryExpression,
                   parameters: &mut ExpressionParameters)
                   -> EvalResult<Value> {
        let operand = self.eval(node.operand(), parameters)?;
        evaluate_unary(node.operator(), &operand)
    }

    fn visit_binary(&mut self,
                    node: &BinaryExpression,
                    parameters: &mut ExpressionParameters)
                    -> EvalResult<Value> {
        let operator = node.operator();
        match operator {
            BinaryOperator::ConditionalAnd => {
                let left = self.eval(node.left(), parameters)?.as_bool(operator.symbol())?;
                if !left {
                    return Ok(Value::Bool(false));
                }
                let right = self.eval(node.right(), parameters)?.as_bool(operator.symbol())?;
                Ok(Value::Bool(right))
            },
            BinaryOperator::ConditionalOr => {
                let left = self.eval(node.left(), parameters)?.as_bool(operator.symbol())?;
                if left {
                    return Ok(Value::Bool(true));
                }
                let right = self.eval(node.right(), parameters)?.as_bool(operator.symbol())?;
                Ok(Value::Bool(right))
            },
            _ => {
                let left = self.eval(node.left(), parameters)?;
                let right = self.eval(node.right(), parameters)?;
                evaluate_binary(operator, &left, &right)
            },
        }
    }

    fn visit_function(&mut self,
                      node: &FunctionCall,
                      parameters: &mut ExpressionParameters)
                      -> EvalResult<Value> {
        evaluate_function(self, node, parameters)
    }

    fn visit_user_function(&mut self,
                           node: &UserFunctionCall,
                           parameters: &mut ExpressionParameters)
                           -> EvalResult<Value> {
        self.call_user_function(node, parameters)
    }

    fn visit_vector(&mut self,
                    node: &Vector,
                    parameters: &mut ExpressionParameters)
                    -> EvalResult<Value> {
        let elements = node.elements()
                           .iter()
                           .map(|element| self.eval(element, parameters)?.as_number("vector"))
                           .collect::<EvalResult<Vec<_>>>()?;
        Ok(Value::from(elements))
    }

    fn visit_matrix(&mut self,
                    node: &Matrix,
                    parameters: &mut ExpressionParameters)
                    -> EvalResult<Value> {
        let mut rows = Vec::with_capacity(node.row_count());
        for row in node.rows() {
            let elements = row.elements()
                              .iter()
                              .map(|element| self.eval(element, parameters)?.as_number("matrix"))
                              .collect::<EvalResult<Vec<_>>>()?;
            rows.push(elements);
        }
        Ok(Value::from(rows))
    }

    fn visit_conditional(&mut self,
                         node: &Conditional,
                         parameters: &mut ExpressionParameters)
                         -> EvalResult<Value> {
        self.conditional(node, parameters)
    }

    fn visit_for(&mut self,
                 node: &ForLoop,
                 parameters: &mut ExpressionParameters)
                 -> EvalResult<Value> {
        self.for_loop(node, parameters)
    }

    fn visit_while(&mut self,
                   node: &WhileLoop,
                   parameters: &mut ExpressionParameters)
                   -> EvalResult<Value> {
        self.while_loop(node, parameters)
    }

    fn visit_define(&mut self,
                    node: &Define,
                    parameters: &mut ExpressionParameters)
                    -> EvalResult<Value> {
        self.define(node, parameters)
    }

    fn visit_undefine(&mut self,
                      node: &Undefine,
                      parameters: &mut ExpressionParameters)
                      -> EvalResult<Value> {
        self.undefine(node, parameters)
    }

    fn visit_assign(&mut self,
                    node: &Assign,
                    parameters: &mut ExpressionParameters)
                    -> EvalResult<Value> {
        self.assign(node, parameters)
    }

    fn visit_step(&mut self,
                  node: &Step,
                  parameters: &mut ExpressionParameters)
                  -> EvalResult<Value> {
        self.step(node, parameters)
    }
}
