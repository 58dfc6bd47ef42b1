use crate::{
    analyzer::{
        Analyzer,
        type_analyzer::{ResultType, TypeAnalyzer},
    },
    ast::{
        Assign, BinaryExpression, BinaryOperator, Conditional, Define, Expression, ForLoop,
        FunctionCall, Matrix, NodeKind, Number, Polar, Step, Undefine, UnaryExpression,
        UnaryOperator, UserFunctionCall, Variable, Vector, WhileLoop,
    },
    error::SimplificationError,
    interpreter::{
        evaluator::core::ExpressionParameters,
        value::{angle::AngleValue, core::Value},
    },
};

type SimplifyResult = Result<Expression, SimplificationError>;

/// Algebraic simplification pass.
///
/// Works bottom-up: children are simplified first, then the node itself is
/// rewritten by the first matching rule:
/// - operators and functions whose operands are all number or boolean
///   literals are folded by evaluating them, provided the result is a finite
///   number or a boolean;
/// - `x - 0`, `x * 1`, `1 * x` and `x / 1` become `x`, and `0 - x` becomes
///   `-x`;
/// - `x + 0`, `0 + x` and `x ^ 1` become `x`, `x * 0` and `0 * x` become `0`,
///   `x ^ 0` and `1 ^ x` become `1`, but only when `x` is known to be a
///   number;
/// - `-(-x)` and `!(!x)` collapse to `x`;
/// - a conditional with a literal condition is replaced by the chosen
///   branch.
///
/// Whether `x` is a number is decided by a [`TypeAnalyzer`]. A free
/// variable may hold a string, a vector or a complex number, for which
/// `x + 0` or `x * 0` is not `x` or `0`, so [`Simplifier::new`] leaves those
/// identities alone around variables. [`Simplifier::numeric`] treats every
/// variable as a real number.
///
/// Every rewrite produces an already simplified tree, so simplifying twice
/// gives the same result as simplifying once.
#[derive(Debug, Default, Clone, Copy)]
pub struct Simplifier {
    types: TypeAnalyzer,
}

/// Simplifies `expression` without assuming anything about its variables.
///
/// # Example
/// ```
/// use mathtree::{analyzer::simplifier::simplify, interpreter::parser::core::parse};
///
/// let tree = parse("(x * 1 - 0) * (2 + 3)").unwrap();
/// assert_eq!(simplify(&tree), parse("x * 5").unwrap());
///
/// // `x` may be a string, and "a" + 0 is "a0"
/// let tree = parse("x + 0").unwrap();
/// assert_eq!(simplify(&tree), tree);
/// ```
#[must_use]
pub fn simplify(expression: &Expression) -> Expression {
    log::debug!("simplify {expression}");
    Simplifier::new().run(expression)
}

/// Simplifies `expression` with every variable taken to be a real number.
///
/// # Example
/// ```
/// use mathtree::{analyzer::simplifier::simplify_numeric, interpreter::parser::core::parse};
///
/// let tree = parse("sin(x) * 0 + y ^ 1").unwrap();
/// assert_eq!(simplify_numeric(&tree), parse("y").unwrap());
/// ```
#[must_use]
pub fn simplify_numeric(expression: &Expression) -> Expression {
    log::debug!("simplify {expression} over real variables");
    Simplifier::numeric().run(expression)
}

fn is_literal(expression: &Expression) -> bool {
    matches!(expression, Expression::Number(_) | Expression::Bool(_))
}

fn is_number(expression: &Expression, value: f64) -> bool {
    expression.as_number().is_some_and(|number| number.to_bits() == value.to_bits())
}

/// Evaluates a node whose operands are literals, keeping the node when the
/// result is not a finite number or a boolean.
fn fold(expression: Expression) -> Expression {
    if !expression.children().into_iter().all(is_literal) {
        return expression;
    }
    match expression.execute(&mut ExpressionParameters::without_constants()) {
        Ok(Value::Number(value)) if value.is_finite() => Expression::number(value),
        Ok(Value::Bool(value)) => Expression::Bool(value),
        _ => expression,
    }
}

/// Returns `true` if evaluating `expression` can change variables or
/// definitions.
fn changes_state(expression: &Expression) -> bool {
    matches!(expression,
             Expression::Assign(_)
             | Expression::Step(_)
             | Expression::Define(_)
             | Expression::Undefine(_))
    || expression.children().into_iter().any(changes_state)
}

/// `-operand` for an already simplified operand.
fn negate(operand: Expression) -> Expression {
    match operand {
        Expression::Unary(inner) if inner.operator() == UnaryOperator::Minus => {
            inner.operand().clone()
        },
        Expression::Number(number) => Expression::number(-number.value()),
        operand => Expression::negate(operand),
    }
}

impl Simplifier {
    /// Creates a simplifier that knows nothing about variable types.
    #[must_use]
    pub const fn new() -> Self {
        Self { types: TypeAnalyzer::new() }
    }

    /// Creates a simplifier that takes every variable to be a real number.
    ///
    /// Derivatives are simplified this way, since they are only defined for
    /// real functions.
    #[must_use]
    pub const fn numeric() -> Self {
        Self { types: TypeAnalyzer::with_variables(ResultType::Number) }
    }

    /// Simplifies `expression`, keeping any subtree the pass rejects.
    fn run(&mut self, expression: &Expression) -> Expression {
        expression.accept(self).unwrap_or_else(|error| {
                                   log::debug!("{error} Keeping {expression}");
                                   expression.clone()
                               })
    }

    /// Returns `true` if `expression` is known to evaluate to a real number.
    fn is_real(&self, expression: &Expression) -> bool {
        let mut types = self.types;
        expression.accept(&mut types) == Ok(ResultType::Number)
    }

    /// Returns `true` if `expression` is a real number that can be dropped
    /// without losing a side effect.
    fn is_discardable(&self, expression: &Expression) -> bool {
        self.is_real(expression) && !changes_state(expression)
    }

    /// Simplifies every child of `expression` and rebuilds it.
    fn children(&mut self, expression: &Expression) -> Expression {
        let replacements = expression.children()
                                     .into_iter()
                                     .map(|child| Some(self.run(child)))
                                     .collect();
        expression.clone_with(replacements)
                  .unwrap_or_else(|_| expression.clone())
    }

    #[allow(clippy::match_same_arms)]
    fn binary(&self, operator: BinaryOperator, left: Expression, right: Expression) -> Expression {
        use BinaryOperator::{Add, Div, Mul, Pow, Sub};

        let zero = |expression: &Expression| is_number(expression, 0.0);
        let one = |expression: &Expression| is_number(expression, 1.0);
        match operator {
            Sub if zero(&right) => left,
            Sub if zero(&left) && !is_literal(&right) => negate(right),
            Mul | Div if one(&right) => left,
            Mul if one(&left) => right,
            Add if zero(&right) && self.is_real(&left) => left,
            Add if zero(&left) && self.is_real(&right) => right,
            Mul if zero(&left) && self.is_discardable(&right) => Expression::Number(Number::ZERO),
            Mul if zero(&right) && self.is_discardable(&left) => Expression::Number(Number::ZERO),
            Pow if one(&right) && self.is_real(&left) => left,
            Pow if zero(&right) && self.is_discardable(&left) => Expression::Number(Number::ONE),
            Pow if one(&left) && self.is_discardable(&right) => Expression::Number(Number::ONE),
            _ => fold(Expression::binary(operator, left, right)),
        }
    }
}

impl Analyzer for Simplifier {
    type Error = SimplificationError;
    type Output = Expression;

    fn not_supported(&mut self, kind: NodeKind) -> SimplifyResult {
        Err(SimplificationError::NotSupported { kind })
    }

    fn visit_number(&mut self, node: Number) -> SimplifyResult {
        Ok(Expression::Number(node))
    }

    fn visit_bool(&mut self, value: bool) -> SimplifyResult {
        Ok(Expression::Bool(value))
    }

    fn visit_complex(&mut self, value: Polar) -> SimplifyResult {
        Ok(Expression::Complex(value))
    }

    fn visit_string(&mut self, value: &str) -> SimplifyResult {
        Ok(Expression::string(value))
    }

    fn visit_angle(&mut self, value: AngleValue) -> SimplifyResult {
        Ok(Expression::Angle(value))
    }

    fn visit_variable(&mut self, node: &Variable) -> SimplifyResult {
        Ok(Expression::Variable(node.clone()))
    }

    fn visit_unary(&mut self, node: &UnaryExpression) -> SimplifyResult {
        let operand = self.run(node.operand());
        let simplified = match (node.operator(), operand) {
            (UnaryOperator::Minus, operand) => negate(operand),
            (UnaryOperator::Not, Expression::Unary(inner))
                if inner.operator() == UnaryOperator::Not =>
            {
                inner.operand().clone()
            },
            (operator, operand) => fold(Expression::unary(operator, operand)),
        };
        Ok(simplified)
    }

    fn visit_binary(&mut self, node: &BinaryExpression) -> SimplifyResult {
        let left = self.run(node.left());
        let right = self.run(node.right());
        Ok(self.binary(node.operator(), left, right))
    }

    fn visit_function(&mut self, node: &FunctionCall) -> SimplifyResult {
        let simplified = self.children(&Expression::Function(node.clone()));
        if node.function().is_symbolic() {
            return Ok(simplified);
        }
        Ok(fold(simplified))
    }

    fn visit_user_function(&mut self, node: &UserFunctionCall) -> SimplifyResult {
        Ok(self.children(&Expression::UserFunction(node.clone())))
    }

    fn visit_vector(&mut self, node: &Vector) -> SimplifyResult {
        Ok(self.children(&Expression::Vector(node.clone())))
    }

    fn visit_matrix(&mut self, node: &Matrix) -> SimplifyResult {
        Ok(self.children(&Expression::Matrix(node.clone())))
    }

    fn visit_conditional(&mut self, node: &Conditional) -> SimplifyResult {
        let condition = self.run(node.condition());
        match (condition, node.otherwise()) {
            (Expression::Bool(true), _) => Ok(self.run(node.then())),
            (Expression::Bool(false), Some(otherwise)) => Ok(self.run(otherwise)),
            (condition, otherwise) => {
                let then = self.run(node.then());
                let otherwise = otherwise.map(|otherwise| self.run(otherwise));
                Ok(Expression::Conditional(Conditional::new(condition, then, otherwise)))
            },
        }
    }

    fn visit_for(&mut self, node: &ForLoop) -> SimplifyResult {
        Ok(self.children(&Expression::For(node.clone())))
    }

    fn visit_while(&mut self, node: &WhileLoop) -> SimplifyResult {
        Ok(self.children(&Expression::While(node.clone())))
    }

    fn visit_define(&mut self, node: &Define) -> SimplifyResult {
        Ok(self.children(&Expression::Define(node.clone())))
    }

    fn visit_undefine(&mut self, node: &Undefine) -> SimplifyResult {
        Ok(Expression::Undefine(node.clone()))
    }

    fn visit_assign(&mut self, node: &Assign) -> SimplifyResult {
        Ok(self.children(&Expression::Assign(node.clone())))
    }

    fn visit_step(&mut self, node: &Step) -> SimplifyResult {
        Ok(Expression::Step(node.clone()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::{BuiltinFunction, StepOperator};

    fn x() -> Expression {
        Expression::variable("x")
    }

    fn sin_x() -> Expression {
        Expression::call(BuiltinFunction::Sin, x()).unwrap()
    }

    #[test]
    fn removes_neutral_elements() {
        let product = Expression::mul(x(), Expression::number(1.0));
        let tree = Expression::sub(product.clone(), Expression::number(0.0));
        assert_eq!(simplify(&tree), x());

        let tree = Expression::add(product, Expression::number(0.0));
        assert_eq!(simplify_numeric(&tree), x());
        assert_eq!(simplify(&tree), Expression::add(x(), Expression::number(0.0)));
    }

    #[test]
    fn multiplication_by_zero() {
        let tree = Expression::mul(sin_x(), Expression::number(0.0));
        assert_eq!(simplify_numeric(&tree), Expression::number(0.0));
        // sin of a complex x is complex, and 0 * z is a complex zero
        assert_eq!(simplify(&tree), tree);
    }

    #[test]
    fn literal_operands_are_known_numbers() {
        let sine = Expression::call(BuiltinFunction::Sin, Expression::number(2.0)).unwrap();
        let tree = Expression::add(Expression::number(0.0), sine);
        assert_eq!(simplify(&tree), Expression::number(2f64.sin()));
    }

    #[test]
    fn keeps_side_effects() {
        let step = Expression::Step(Step::new(StepOperator::Increment, Variable::new("x")));
        let tree = Expression::mul(step, Expression::number(0.0));
        assert_eq!(simplify_numeric(&tree), tree);
    }

    #[test]
    fn collapses_double_negation() {
        let tree = Expression::negate(Expression::negate(x()));
        assert_eq!(simplify(&tree), x());
    }

    #[test]
    fn keeps_division_by_zero() {
        let tree = Expression::div(Expression::number(1.0), Expression::number(0.0));
        assert_eq!(simplify(&tree), tree);
    }

    #[test]
    fn subtraction_from_zero_negates() {
        let tree = Expression::sub(Expression::number(0.0), Expression::negate(x()));
        assert_eq!(simplify(&tree), x());
    }

    #[test]
    fn unhandled_nodes_are_rejected() {
        assert_eq!(Simplifier::new().not_supported(NodeKind::Variable),
                   Err(SimplificationError::NotSupported { kind: NodeKind::Variable }));
    }
}
