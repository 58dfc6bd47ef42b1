use crate::{
    ast::{
        Assign, BinaryExpression, Conditional, Define, ForLoop, FunctionCall, Matrix, NodeKind,
        Number, Polar, Step, Undefine, UnaryExpression, UserFunctionCall, Variable, Vector,
        WhileLoop,
    },
    interpreter::value::angle::AngleValue,
};

/// Renders trees back to formula text.
///
/// Parentheses are chosen from operator precedence and associativity, so
/// the output re-parses to an equal tree.
pub mod formatter;

/// Symbolic differentiation.
///
/// Applies the sum, product, quotient, power and chain rules with respect to
/// one variable. The result is not simplified.
pub mod differentiator;

/// Algebraic simplification.
///
/// Folds constant subtrees, removes neutral elements and collapses double
/// negations. Simplifying twice gives the same tree as simplifying once.
pub mod simplifier;

/// Static result-type inference.
///
/// Determines what kind of value a tree produces without evaluating it, and
/// rejects operand types that can never fit an operator.
pub mod type_analyzer;

/// A pass over an expression tree.
///
/// [`crate::ast::Expression::accept`] calls the `visit_*` method matching the
/// node variant. Every method defaults to [`Analyzer::not_supported`], so a
/// pass only overrides the variants it handles; supporting a new pass never
/// requires changing the tree.
///
/// # Example
/// ```
/// use mathtree::{
///     analyzer::Analyzer,
///     ast::{Expression, NodeKind, Number, Variable},
/// };
///
/// /// Counts leaves, rejecting anything else.
/// struct Leaves;
///
/// impl Analyzer for Leaves {
///     type Error = NodeKind;
///     type Output = usize;
///
///     fn not_supported(&mut self, kind: NodeKind) -> Result<usize, NodeKind> {
///         Err(kind)
///     }
///
///     fn visit_number(&mut self, _: Number) -> Result<usize, NodeKind> {
///         Ok(1)
///     }
///
///     fn visit_variable(&mut self, _: &Variable) -> Result<usize, NodeKind> {
///         Ok(1)
///     }
/// }
///
/// assert_eq!(Expression::number(2.0).accept(&mut Leaves), Ok(1));
/// assert_eq!(Expression::bool(true).accept(&mut Leaves), Err(NodeKind::Bool));
/// ```
pub trait Analyzer {
    /// What the pass produces for one node.
    type Output;
    /// What the pass reports on failure.
    type Error;

    /// Called for every variant the pass does not override.
    fn not_supported(&mut self, kind: NodeKind) -> Result<Self::Output, Self::Error>;

    fn visit_number(&mut self, _node: Number) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Number)
    }

    fn visit_bool(&mut self, _value: bool) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Bool)
    }

    fn visit_complex(&mut self, _value: Polar) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Complex)
    }

    fn visit_string(&mut self, _value: &str) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::String)
    }

    fn visit_angle(&mut self, _value: AngleValue) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Angle)
    }

    fn visit_variable(&mut self, _node: &Variable) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Variable)
    }

    fn visit_unary(&mut self, node: &UnaryExpression) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Unary(node.operator()))
    }

    fn visit_binary(&mut self, node: &BinaryExpression) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Binary(node.operator()))
    }

    fn visit_function(&mut self, node: &FunctionCall) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Function(node.function()))
    }

    fn visit_user_function(&mut self,
                           _node: &UserFunctionCall)
                           -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::UserFunction)
    }

    fn visit_vector(&mut self, _node: &Vector) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Vector)
    }

    fn visit_matrix(&mut self, _node: &Matrix) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Matrix)
    }

    fn visit_conditional(&mut self, _node: &Conditional) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Conditional)
    }

    fn visit_for(&mut self, _node: &ForLoop) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::For)
    }

    fn visit_while(&mut self, _node: &WhileLoop) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::While)
    }

    fn visit_define(&mut self, _node: &Define) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Define)
    }

    fn visit_undefine(&mut self, _node: &Undefine) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Undefine)
    }

    fn visit_assign(&mut self, _node: &Assign) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Assign)
    }

    fn visit_step(&mut self, _node: &Step) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Step)
    }
}

/// A pass over an expression tree that threads a context through every
/// call, such as the variable bindings of the evaluator or the target
/// variable of the differentiator.
///
/// Dispatched by [`crate::ast::Expression::accept_with`]; defaults work as in
/// [`Analyzer`].
pub trait ContextAnalyzer<C: ?Sized> {
    /// What the pass produces for one node.
    type Output;
    /// What the pass reports on failure.
    type Error;

    /// Called for every variant the pass does not override.
    fn not_supported(&mut self,
                     kind: NodeKind,
                     context: &mut C)
                     -> Result<Self::Output, Self::Error>;

    fn visit_number(&mut self,
                    _node: Number,
                    context: &mut C)
                    -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Number, context)
    }

    fn visit_bool(&mut self, _value: bool, context: &mut C) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Bool, context)
    }

    fn visit_complex(&mut self,
                     _value: Polar,
                     context: &mut C)
                     -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Complex, context)
    }

    fn visit_string(&mut self, _value: &str, context: &mut C) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::String, context)
    }

    fn visit_angle(&mut self,
                   _value: AngleValue,
                   context: &mut C)
                   -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Angle, context)
    }

    fn visit_variable(&mut self,
                      _node: &Variable,
                      context: &mut C)
                      -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Variable, context)
    }

    fn visit_unary(&mut self,
                   node: &UnaryExpression,
                   context: &mut C)
                   -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Unary(node.operator()), context)
    }

    fn visit_binary(&mut self,
                    node: &BinaryExpression,
                    context: &mut C)
                    -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Binary(node.operator()), context)
    }

    fn visit_function(&mut self,
                      node: &FunctionCall,
                      context: &mut C)
                      -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Function(node.function()), context)
    }

    fn visit_user_function(&mut self,
                           _node: &UserFunctionCall,
                           context: &mut C)
                           -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::UserFunction, context)
    }

    fn visit_vector(&mut self,
                    _node: &Vector,
                    context: &mut C)
                    -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Vector, context)
    }

    fn visit_matrix(&mut self,
                    _node: &Matrix,
                    context: &mut C)
                    -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Matrix, context)
    }

    fn visit_conditional(&mut self,
                         _node: &Conditional,
                         context: &mut C)
                         -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Conditional, context)
    }

    fn visit_for(&mut self, _node: &ForLoop, context: &mut C) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::For, context)
    }

    fn visit_while(&mut self,
                   _node: &WhileLoop,
                   context: &mut C)
                   -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::While, context)
    }

    fn visit_define(&mut self,
                    _node: &Define,
                    context: &mut C)
                    -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Define, context)
    }

    fn visit_undefine(&mut self,
                      _node: &Undefine,
                      context: &mut C)
                      -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Undefine, context)
    }

    fn visit_assign(&mut self,
                    _node: &Assign,
                    context: &mut C)
                    -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Assign, context)
    }

    fn visit_step(&mut self, _node: &Step, context: &mut C) -> Result<Self::Output, Self::Error> {
        self.not_supported(NodeKind::Step, context)
    }
}
