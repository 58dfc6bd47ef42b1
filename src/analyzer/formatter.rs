use std::convert::Infallible;

use crate::{
    analyzer::Analyzer,
    ast::{
        Assign, BinaryExpression, Conditional, Define, Expression, ForLoop, FunctionCall, Matrix,
        NodeKind, Number, Polar, Step, Undefine, UnaryExpression, UnaryOperator,
        UserFunctionCall, Variable, Vector, WhileLoop,
        operator::{
            ASSIGNMENT_PRECEDENCE, ATOM_PRECEDENCE, POSTFIX_PRECEDENCE, PREFIX_PRECEDENCE,
            TERNARY_PRECEDENCE,
        },
    },
    interpreter::value::angle::AngleValue,
};

/// Renders a tree as formula text.
///
/// Parentheses are inserted only where operator precedence or
/// associativity requires them, so parsing the output yields a tree equal
/// to the rendered one. Implicit multiplication is written with an explicit
/// `*`.
///
/// # Example
/// ```
/// use mathtree::{analyzer::formatter::Formatter, interpreter::parser::core::parse};
///
/// let tree = parse("(1 + 2) * 3 - 2x").unwrap();
/// assert_eq!(tree.accept(&mut Formatter::new()), Ok("(1 + 2) * 3 - 2 * x".to_string()));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Formatter;

impl Formatter {
    /// Creates a formatter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn render(&mut self, expression: &Expression) -> String {
        match expression.accept(self) {
            Ok(text) => text,
            Err(never) => match never {},
        }
    }

    /// Renders `expression`, in parentheses when `wrap` is set.
    fn operand(&mut self, expression: &Expression, wrap: bool) -> String {
        let text = self.render(expression);
        if wrap { format!("({text})") } else { text }
    }

    fn list(&mut self, expressions: &[Expression]) -> String {
        expressions.iter()
                   .map(|expression| self.render(expression))
                   .collect::<Vec<_>>()
                   .join(", ")
    }
}

/// The binding strength of the outermost construct of a rendered node.
fn precedence(expression: &Expression) -> u8 {
    match expression {
        Expression::Number(number) if number.value().is_sign_negative() => PREFIX_PRECEDENCE,
        Expression::Unary(node) => node.operator().precedence(),
        Expression::Binary(node) => node.operator().precedence(),
        Expression::Conditional(node) if node.otherwise().is_some() => TERNARY_PRECEDENCE,
        Expression::Define(_) | Expression::Assign(_) => ASSIGNMENT_PRECEDENCE,
        _ => ATOM_PRECEDENCE,
    }
}

impl Analyzer for Formatter {
    type Error = Infallible;
    type Output = String;

    fn not_supported(&mut self, kind: NodeKind) -> Result<String, Infallible> {
        Ok(format!("<{kind}>"))
    }

    fn visit_number(&mut self, node: Number) -> Result<String, Infallible> {
        Ok(node.to_string())
    }

    fn visit_bool(&mut self, value: bool) -> Result<String, Infallible> {
        Ok(value.to_string())
    }

    fn visit_complex(&mut self, value: Polar) -> Result<String, Infallible> {
        Ok(value.to_string())
    }

    fn visit_string(&mut self, value: &str) -> Result<String, Infallible> {
        Ok(format!("\"{value}\""))
    }

    fn visit_angle(&mut self, value: AngleValue) -> Result<String, Infallible> {
        Ok(value.to_string())
    }

    fn visit_variable(&mut self, node: &Variable) -> Result<String, Infallible> {
        Ok(node.name().to_string())
    }

    fn visit_unary(&mut self, node: &UnaryExpression) -> Result<String, Infallible> {
        let operand = node.operand();
        let text = match node.operator() {
            UnaryOperator::Factorial => {
                let wrap = precedence(operand) < POSTFIX_PRECEDENCE;
                format!("{}!", self.operand(operand, wrap))
            },
            operator => {
                let wrap = precedence(operand) <= PREFIX_PRECEDENCE;
                format!("{}{}", operator.symbol(), self.operand(operand, wrap))
            },
        };
        Ok(text)
    }

    fn visit_binary(&mut self, node: &BinaryExpression) -> Result<String, Infallible> {
        let operator = node.operator();
        let own = operator.precedence();
        let (left, right) = (precedence(node.left()), precedence(node.right()));
        let wrap_left = left < own || (left == own && operator.is_right_associative());
        let wrap_right = right < own || (right == own && !operator.is_right_associative());
        Ok(format!("{} {operator} {}",
                   self.operand(node.left(), wrap_left),
                   self.operand(node.right(), wrap_right)))
    }

    fn visit_function(&mut self, node: &FunctionCall) -> Result<String, Infallible> {
        Ok(format!("{}({})", node.function(), self.list(node.arguments())))
    }

    fn visit_user_function(&mut self, node: &UserFunctionCall) -> Result<String, Infallible> {
        Ok(format!("{}({})", node.name(), self.list(node.arguments())))
    }

    fn visit_vector(&mut self, node: &Vector) -> Result<String, Infallible> {
        Ok(format!("{{{}}}", self.list(node.elements())))
    }

    fn visit_matrix(&mut self, node: &Matrix) -> Result<String, Infallible> {
        let rows = node.rows()
                       .iter()
                       .map(|row| format!("{{{}}}", self.list(row.elements())))
                       .collect::<Vec<_>>();
        Ok(format!("{{{}}}", rows.join(", ")))
    }

    fn visit_conditional(&mut self, node: &Conditional) -> Result<String, Infallible> {
        let Some(otherwise) = node.otherwise() else {
            return Ok(format!("if({}, {})",
                              self.render(node.condition()),
                              self.render(node.then())));
        };
        let wrap_condition = precedence(node.condition()) <= TERNARY_PRECEDENCE;
        Ok(format!("{} ? {} : {}",
                   self.operand(node.condition(), wrap_condition),
                   self.render(node.then()),
                   self.render(otherwise)))
    }

    fn visit_for(&mut self, node: &ForLoop) -> Result<String, Infallible> {
        Ok(format!("for({}, {}, {}, {})",
                   self.render(node.body()),
                   self.render(node.init()),
                   self.render(node.condition()),
                   self.render(node.iteration())))
    }

    fn visit_while(&mut self, node: &WhileLoop) -> Result<String, Infallible> {
        Ok(format!("while({}, {})",
                   self.render(node.body()),
                   self.render(node.condition())))
    }

    fn visit_define(&mut self, node: &Define) -> Result<String, Infallible> {
        Ok(format!("{} := {}", self.render(node.key()), self.render(node.value())))
    }

    fn visit_undefine(&mut self, node: &Undefine) -> Result<String, Infallible> {
        Ok(format!("undef({})", self.render(node.key())))
    }

    fn visit_assign(&mut self, node: &Assign) -> Result<String, Infallible> {
        Ok(format!("{} {} {}",
                   node.variable(),
                   node.operator().symbol(),
                   self.render(node.value())))
    }

    fn visit_step(&mut self, node: &Step) -> Result<String, Infallible> {
        Ok(format!("{}{}", node.variable(), node.operator().symbol()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn right_associative_power() {
        let x = || Expression::variable("x");
        let nested_right = Expression::pow(x(), Expression::pow(x(), x()));
        let nested_left = Expression::pow(Expression::pow(x(), x()), x());
        assert_eq!(nested_right.to_string(), "x ^ x ^ x");
        assert_eq!(nested_left.to_string(), "(x ^ x) ^ x");
    }

    #[test]
    fn left_associative_subtraction() {
        let x = || Expression::variable("x");
        let tree = Expression::sub(x(), Expression::sub(x(), x()));
        assert_eq!(tree.to_string(), "x - (x - x)");
    }

    #[test]
    fn nested_prefix_operators_are_parenthesized() {
        let tree = Expression::negate(Expression::negate(Expression::variable("x")));
        assert_eq!(tree.to_string(), "-(-x)");
        assert_eq!(Expression::negate(Expression::number(-2.0)).to_string(), "-(-2)");
    }

    #[test]
    fn factorial_of_sum() {
        let sum = Expression::add(Expression::variable("x"), Expression::number(1.0));
        assert_eq!(Expression::factorial(sum).to_string(), "(x + 1)!");
    }
}
