use std::collections::HashMap;

use crate::{
    ast::{
        Assign, Conditional, Define, Expression, ForLoop, Step, Undefine, UserFunctionCall,
        WhileLoop,
    },
    error::{ExpressionError, RuntimeError},
    interpreter::{
        evaluator::{
            binary::evaluate_binary,
            core::{EvalResult, Evaluator, ExpressionParameters, FunctionDefinition},
        },
        value::core::Value,
    },
};

/// Deepest nesting of user function calls before evaluation gives up.
pub const MAX_CALL_DEPTH: usize = 256;

impl Evaluator {
    /// `if(condition, then[, else])` and `condition ? then : else`.
    ///
    /// A false condition without an else branch yields [`Value::Empty`].
    pub(crate) fn conditional(&mut self,
                              node: &Conditional,
                              parameters: &mut ExpressionParameters)
                              -> EvalResult<Value> {
        if self.eval(node.condition(), parameters)?.as_bool("if")? {
            return self.eval(node.then(), parameters);
        }
        match node.otherwise() {
            Some(otherwise) => self.eval(otherwise, parameters),
            None => Ok(Value::Empty),
        }
    }

    /// `for(body, init, condition, iteration)`.
    ///
    /// Runs `init` once, then alternates `body` and `iteration` while the
    /// condition holds. Variables defined by the loop stay bound afterwards.
    pub(crate) fn for_loop(&mut self,
                           node: &ForLoop,
                           parameters: &mut ExpressionParameters)
                           -> EvalResult<Value> {
        self.eval(node.init(), parameters)?;
        while self.eval(node.condition(), parameters)?.as_bool("for")? {
            self.eval(node.body(), parameters)?;
            self.eval(node.iteration(), parameters)?;
        }
        Ok(Value::Empty)
    }

    /// `while(body, condition)`.
    pub(crate) fn while_loop(&mut self,
                             node: &WhileLoop,
                             parameters: &mut ExpressionParameters)
                             -> EvalResult<Value> {
        while self.eval(node.condition(), parameters)?.as_bool("while")? {
            self.eval(node.body(), parameters)?;
        }
        Ok(Value::Empty)
    }

    /// `key := value`.
    ///
    /// A variable key binds the evaluated value. A function declaration key
    /// stores the value unevaluated as the function body.
    ///
    /// # Returns
    /// A confirmation message naming the binding.
    pub(crate) fn define(&mut self,
                         node: &Define,
                         parameters: &mut ExpressionParameters)
                         -> EvalResult<Value> {
        match node.key() {
            Expression::Variable(variable) => {
                let value = self.eval(node.value(), parameters)?;
                log::debug!("define {} = {value}", variable.name());
                let message = format!("The value '{value}' was assigned to '{}'.", variable.name());
                parameters.set(variable.name(), value)?;
                Ok(Value::from(message))
            },
            Expression::UserFunction(function) => {
                let parameter_names = declared_parameters(function)?;
                log::debug!("define function {}/{}", function.name(), parameter_names.len());
                let definition = FunctionDefinition { parameters: parameter_names,
                                                      body:       node.value().clone(), };
                parameters.define_function(function.name(), definition);
                Ok(Value::from(format!("The function '{}' was defined.", node.key())))
            },
            other => Err(ExpressionError::InvalidAssignmentKey { kind: other.kind() }.into()),
        }
    }

    /// `undef(key)`.
    ///
    /// Removing a name that is not bound is not an error.
    pub(crate) fn undefine(&mut self,
                           node: &Undefine,
                           parameters: &mut ExpressionParameters)
                           -> EvalResult<Value> {
        let removed = match node.key() {
            Expression::Variable(variable) => parameters.remove(variable.name())?.is_some(),
            Expression::UserFunction(function) => {
                parameters.remove_function(function.name(), function.arguments().len())
                          .is_some()
            },
            other => {
                return Err(ExpressionError::InvalidAssignmentKey { kind: other.kind() }.into());
            },
        };
        log::debug!("undefine {} (bound: {removed})", node.key());
        if removed {
            Ok(Value::from(format!("'{}' was removed.", node.key())))
        } else {
            Ok(Value::from(format!("'{}' is not defined.", node.key())))
        }
    }

    /// `variable op= value`; writes the result back and returns it.
    pub(crate) fn assign(&mut self,
                         node: &Assign,
                         parameters: &mut ExpressionParameters)
                         -> EvalResult<Value> {
        let name = node.variable().name();
        let operator = node.operator();
        let current = parameters.variable(name)
                                .cloned()
                                .ok_or_else(|| unknown_variable(name))?;
        current.as_number(operator.symbol())?;
        let value = self.eval(node.value(), parameters)?;
        let result = evaluate_binary(operator.binary(), &current, &value)?;
        parameters.set(name, result.clone())?;
        Ok(result)
    }

    /// `variable++` and `variable--`; writes the result back and returns it.
    pub(crate) fn step(&mut self,
                       node: &Step,
                       parameters: &mut ExpressionParameters)
                       -> EvalResult<Value> {
        let name = node.variable().name();
        let operator = node.operator();
        let current = parameters.variable(name)
                                .ok_or_else(|| unknown_variable(name))?
                                .as_number(operator.symbol())?;
        let result = current + operator.delta();
        parameters.set(name, result)?;
        Ok(Value::Number(result))
    }

    /// Calls a user function.
    ///
    /// Arguments are evaluated in the caller's scope; the body runs in a new
    /// scope binding the parameters, which is closed again whether or not
    /// the body succeeds.
    pub(crate) fn call_user_function(&mut self,
                                     node: &UserFunctionCall,
                                     parameters: &mut ExpressionParameters)
                                     -> EvalResult<Value> {
        let arity = node.arguments().len();
        let Some(definition) = parameters.function(node.name(), arity).cloned() else {
            return Err(RuntimeError::UnknownFunction { name: node.name().to_string(),
                                                       arity });
        };
        if definition.parameters.len() != arity {
            return Err(RuntimeError::UnknownFunction { name: node.name().to_string(),
                                                       arity });
        }
        if parameters.scope_depth() > MAX_CALL_DEPTH {
            return Err(RuntimeError::CallDepthExceeded { name:      node.name().to_string(),
                                                         max_depth: MAX_CALL_DEPTH, });
        }

        let mut bindings = HashMap::with_capacity(arity);
        for (name, argument) in definition.parameters.iter().zip(node.arguments()) {
            bindings.insert(name.clone(), self.eval(argument, parameters)?);
        }

        parameters.push_scope(bindings);
        let result = self.eval(&definition.body, parameters);
        parameters.pop_scope();
        result
    }
}

/// The parameter names of a function declaration.
fn declared_parameters(function: &UserFunctionCall) -> EvalResult<Vec<String>> {
    function.parameter_names()
            .ok_or_else(|| {
                let name = function.name().to_string();
                ExpressionError::InvalidFunctionDeclaration { name }.into()
            })
}

fn unknown_variable(name: &str) -> RuntimeError {
    RuntimeError::UnknownVariable { name: name.to_string() }
}
