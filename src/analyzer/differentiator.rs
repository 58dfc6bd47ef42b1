use crate::{
    analyzer::ContextAnalyzer,
    ast::{
        BinaryExpression, BinaryOperator, BuiltinFunction, Expression, FunctionCall, NodeKind,
        Number, Polar, UnaryExpression, UnaryOperator, Variable,
    },
    error::DifferentiationError,
    interpreter::value::angle::AngleValue,
};

type DiffResult = Result<Expression, DifferentiationError>;

/// The variable a [`Differentiator`] differentiates by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifferentiatorContext {
    variable: String,
}

impl DifferentiatorContext {
    /// Creates a context differentiating by `variable`.
    #[must_use]
    pub fn new(variable: impl Into<String>) -> Self {
        Self { variable: variable.into() }
    }

    /// The variable name.
    #[must_use]
    pub fn variable(&self) -> &str {
        &self.variable
    }
}

/// Symbolic differentiation pass.
///
/// Applies the sum, product, quotient and power rules and the chain rule for
/// the one-argument built-ins. Any subtree that does not mention the
/// variable differentiates to `0`. The output is not simplified: the
/// derivative of `2 * x` is `0 * x + 2 * 1`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Differentiator;

/// Differentiates `expression` with respect to `variable`.
///
/// # Errors
/// Returns [`DifferentiationError::NotSupported`] for a node that mentions
/// the variable but has no derivative rule, such as a loop or a comparison.
///
/// # Example
/// ```
/// use mathtree::{
///     analyzer::{differentiator::differentiate, simplifier::simplify_numeric},
///     interpreter::parser::core::parse,
/// };
///
/// let tree = parse("x ^ 2").unwrap();
/// let derivative = simplify_numeric(&differentiate(&tree, "x").unwrap());
/// assert_eq!(derivative, parse("2 * x").unwrap());
/// ```
pub fn differentiate(expression: &Expression, variable: &str) -> DiffResult {
    log::debug!("differentiate {expression} by {variable}");
    Differentiator.derive(expression, &mut DifferentiatorContext::new(variable))
}

impl Differentiator {
    /// Differentiates `expression`, short-cutting subtrees without the
    /// variable to `0`.
    fn derive(&mut self,
              expression: &Expression,
              context: &mut DifferentiatorContext)
              -> DiffResult {
        if !expression.has_variable(context.variable()) {
            return Ok(Expression::Number(Number::ZERO));
        }
        expression.accept_with(self, context)
    }
}

fn number(value: f64) -> Expression {
    Expression::number(value)
}

fn call(function: BuiltinFunction, argument: &Expression) -> DiffResult {
    Ok(Expression::call(function, argument.clone())?)
}

/// `u ^ 2`
fn square(argument: &Expression) -> Expression {
    Expression::pow(argument.clone(), number(2.0))
}

impl ContextAnalyzer<DifferentiatorContext> for Differentiator {
    type Error = DifferentiationError;
    type Output = Expression;

    fn not_supported(&mut self,
                     kind: NodeKind,
                     _context: &mut DifferentiatorContext)
                     -> DiffResult {
        Err(DifferentiationError::NotSupported { kind })
    }

    fn visit_number(&mut self, _node: Number, _context: &mut DifferentiatorContext) -> DiffResult {
        Ok(Expression::Number(Number::ZERO))
    }

    fn visit_complex(&mut self, _value: Polar, _context: &mut DifferentiatorContext) -> DiffResult {
        Ok(Expression::Number(Number::ZERO))
    }

    fn visit_angle(&mut self,
                   _value: AngleValue,
                   _context: &mut DifferentiatorContext)
                   -> DiffResult {
        Ok(Expression::Number(Number::ZERO))
    }

    fn visit_variable(&mut self,
                      node: &Variable,
                      context: &mut DifferentiatorContext)
                      -> DiffResult {
        if node.name() == context.variable() {
            Ok(Expression::Number(Number::ONE))
        } else {
            Ok(Expression::Number(Number::ZERO))
        }
    }

    fn visit_unary(&mut self,
                   node: &UnaryExpression,
                   context: &mut DifferentiatorContext)
                   -> DiffResult {
        match node.operator() {
            UnaryOperator::Minus => Ok(Expression::negate(self.derive(node.operand(), context)?)),
            operator => self.not_supported(NodeKind::Unary(operator), context),
        }
    }

    fn visit_binary(&mut self,
                    node: &BinaryExpression,
                    context: &mut DifferentiatorContext)
                    -> DiffResult {
        let (u, v) = (node.left(), node.right());
        match node.operator() {
            BinaryOperator::Add => {
                Ok(Expression::add(self.derive(u, context)?, self.derive(v, context)?))
            },
            BinaryOperator::Sub => {
                Ok(Expression::sub(self.derive(u, context)?, self.derive(v, context)?))
            },
            BinaryOperator::Mul => {
                let du = self.derive(u, context)?;
                let dv = self.derive(v, context)?;
                Ok(Expression::add(Expression::mul(du, v.clone()), Expression::mul(u.clone(), dv)))
            },
            BinaryOperator::Div => {
                let du = self.derive(u, context)?;
                let dv = self.derive(v, context)?;
                let numerator = Expression::sub(Expression::mul(du, v.clone()),
                                                Expression::mul(u.clone(), dv));
                Ok(Expression::div(numerator, square(v)))
            },
            BinaryOperator::Pow => self.power(u, v, context),
            operator => self.not_supported(NodeKind::Binary(operator), context),
        }
    }

    fn visit_function(&mut self,
                      node: &FunctionCall,
                      context: &mut DifferentiatorContext)
                      -> DiffResult {
        use BuiltinFunction as F;

        let function = node.function();
        let u = node.argument();
        let second = node.arguments().get(1);
        if second.is_some_and(|argument| argument.has_variable(context.variable())) {
            return self.not_supported(NodeKind::Function(function), context);
        }
        let du = self.derive(u, context)?;
        let chain = |derivative: Expression| Expression::mul(du.clone(), derivative);
        let quotient = |denominator: Expression| Expression::div(du.clone(), denominator);

        let result = match (function, second) {
            (F::Abs, _) => chain(call(F::Sign, u)?),
            (F::Sqrt, _) => quotient(Expression::mul(number(2.0), call(F::Sqrt, u)?)),
            (F::Root, Some(n)) => {
                let root = Expression::function(F::Root, vec![u.clone(), n.clone()])?;
                Expression::div(Expression::mul(du.clone(), root),
                                Expression::mul(n.clone(), u.clone()))
            },
            (F::Exp, _) => chain(call(F::Exp, u)?),
            (F::Ln, _) => quotient(u.clone()),
            (F::Lg, _) => quotient(Expression::mul(u.clone(), call(F::Ln, &number(10.0))?)),
            (F::Lb, _) => quotient(Expression::mul(u.clone(), call(F::Ln, &number(2.0))?)),
            (F::Log, Some(base)) => quotient(Expression::mul(u.clone(), call(F::Ln, base)?)),

            (F::Sin, _) => chain(call(F::Cos, u)?),
            (F::Cos, _) => Expression::negate(chain(call(F::Sin, u)?)),
            (F::Tan, _) => quotient(square(&call(F::Cos, u)?)),
            (F::Cot, _) => Expression::negate(quotient(square(&call(F::Sin, u)?))),
            (F::Sec, _) => chain(Expression::mul(call(F::Tan, u)?, call(F::Sec, u)?)),
            (F::Csc, _) => {
                Expression::negate(chain(Expression::mul(call(F::Cot, u)?, call(F::Csc, u)?)))
            },
            (F::Arcsin, _) => quotient(call(F::Sqrt, &Expression::sub(number(1.0), square(u)))?),
            (F::Arccos, _) => {
                let root = call(F::Sqrt, &Expression::sub(number(1.0), square(u)))?;
                Expression::negate(quotient(root))
            },
            (F::Arctan, _) => quotient(Expression::add(number(1.0), square(u))),
            (F::Arccot, _) => Expression::negate(quotient(Expression::add(number(1.0), square(u)))),
            (F::Arcsec, _) => {
                let root = call(F::Sqrt, &Expression::sub(square(u), number(1.0)))?;
                quotient(Expression::mul(call(F::Abs, u)?, root))
            },
            (F::Arccsc, _) => {
                let root = call(F::Sqrt, &Expression::sub(square(u), number(1.0)))?;
                Expression::negate(quotient(Expression::mul(call(F::Abs, u)?, root)))
            },

            (F::Sinh, _) => chain(call(F::Cosh, u)?),
            (F::Cosh, _) => chain(call(F::Sinh, u)?),
            (F::Tanh, _) => quotient(square(&call(F::Cosh, u)?)),
            (F::Coth, _) => Expression::negate(quotient(square(&call(F::Sinh, u)?))),
            (F::Sech, _) => {
                Expression::negate(chain(Expression::mul(call(F::Tanh, u)?, call(F::Sech, u)?)))
            },
            (F::Csch, _) => {
                Expression::negate(chain(Expression::mul(call(F::Coth, u)?, call(F::Csch, u)?)))
            },
            (F::Arsinh, _) => quotient(call(F::Sqrt, &Expression::add(square(u), number(1.0)))?),
            (F::Arcosh, _) => quotient(call(F::Sqrt, &Expression::sub(square(u), number(1.0)))?),
            (F::Artanh | F::Arcoth, _) => quotient(Expression::sub(number(1.0), square(u))),
            (F::Arsech, _) => {
                let root = call(F::Sqrt, &Expression::sub(number(1.0), square(u)))?;
                Expression::negate(quotient(Expression::mul(u.clone(), root)))
            },
            (F::Arcsch, _) => {
                let root = call(F::Sqrt, &Expression::add(number(1.0), square(u)))?;
                Expression::negate(quotient(Expression::mul(call(F::Abs, u)?, root)))
            },
            _ => return self.not_supported(NodeKind::Function(function), context),
        };
        Ok(result)
    }
}

impl Differentiator {
    /// The power rule, the exponential rule or logarithmic differentiation,
    /// depending on which side mentions the variable.
    fn power(&mut self,
             u: &Expression,
             v: &Expression,
             context: &mut DifferentiatorContext)
             -> DiffResult {
        let base_varies = u.has_variable(context.variable());
        let exponent_varies = v.has_variable(context.variable());
        let power = Expression::pow(u.clone(), v.clone());

        if !exponent_varies {
            let du = self.derive(u, context)?;
            let lowered = Expression::pow(u.clone(), Expression::sub(v.clone(), number(1.0)));
            return Ok(Expression::mul(Expression::mul(v.clone(), lowered), du));
        }
        let dv = self.derive(v, context)?;
        if !base_varies {
            return Ok(Expression::mul(Expression::mul(power, call(BuiltinFunction::Ln, u)?), dv));
        }
        let du = self.derive(u, context)?;
        let inner = Expression::add(Expression::mul(dv, call(BuiltinFunction::Ln, u)?),
                                    Expression::div(Expression::mul(v.clone(), du), u.clone()));
        Ok(Expression::mul(power, inner))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn x() -> Expression {
        Expression::variable("x")
    }

    #[test]
    fn product_rule_is_not_simplified() {
        let tree = Expression::mul(number(2.0), x());
        let expected = Expression::add(Expression::mul(number(0.0), x()),
                                       Expression::mul(number(2.0), number(1.0)));
        assert_eq!(differentiate(&tree, "x"), Ok(expected));
    }

    #[test]
    fn constant_subtree_is_zero() {
        let tree = Expression::mul(Expression::variable("y"), Expression::variable("z"));
        assert_eq!(differentiate(&tree, "x"), Ok(number(0.0)));
    }

    #[test]
    fn comparison_is_not_supported() {
        let tree = Expression::binary(BinaryOperator::LessThan, x(), number(1.0));
        let kind = NodeKind::Binary(BinaryOperator::LessThan);
        assert_eq!(differentiate(&tree, "x"), Err(DifferentiationError::NotSupported { kind }));
    }
}
