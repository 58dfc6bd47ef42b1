use crate::error::ExpressionError;

/// Represents all errors that can occur during lexing or parsing.
///
/// Positions are byte offsets into the parsed text. `construct` names the
/// production the parser had committed to (`if`, `(`, `vector`, an operator
/// symbol...), so messages point at the incomplete construct.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input was empty or contained only whitespace.
    #[error("Error: The expression is empty.")]
    EmptyInput,
    /// A character sequence that is not a token, or a token that fits no
    /// production.
    #[error("Error at position {position}: Unexpected token '{token}'.")]
    UnexpectedToken {
        /// The offending text.
        token:    String,
        /// Byte offset of the token.
        position: usize,
    },
    /// `(` missing after a keyword that requires an argument list.
    #[error("Error at position {position}: Missing '(' after '{construct}'.")]
    MissingOpenParenthesis {
        /// The construct being parsed.
        construct: &'static str,
        /// Byte offset where `(` was expected.
        position:  usize,
    },
    /// `)` missing at the end of a construct.
    #[error("Error at position {position}: Missing ')' to close '{construct}'.")]
    MissingCloseParenthesis {
        /// The construct being parsed.
        construct: &'static str,
        /// Byte offset where `)` was expected.
        position:  usize,
    },
    /// `,` missing between the arguments of a construct.
    #[error("Error at position {position}: Missing ',' in '{construct}'.")]
    MissingComma {
        /// The construct being parsed.
        construct: &'static str,
        /// Byte offset where `,` was expected.
        position:  usize,
    },
    /// `}` missing at the end of a vector or matrix.
    #[error("Error at position {position}: Missing '}}' to close '{construct}'.")]
    MissingCloseBrace {
        /// The construct being parsed.
        construct: &'static str,
        /// Byte offset where `}` was expected.
        position:  usize,
    },
    /// A binary operator without a right operand.
    #[error("Error at position {position}: Missing second operand of '{operator}'.")]
    MissingSecondOperand {
        /// The operator symbol.
        operator: &'static str,
        /// Byte offset where the operand was expected.
        position: usize,
    },
    /// A required sub-expression of a construct is absent.
    #[error("Error at position {position}: Missing expression in '{construct}'.")]
    MissingExpression {
        /// The construct being parsed.
        construct: &'static str,
        /// Byte offset where the expression was expected.
        position:  usize,
    },
    /// A ternary conditional without `:` between its branches.
    #[error("Error at position {position}: Missing ':' in the conditional operator.")]
    MissingColon {
        /// Byte offset where `:` was expected.
        position: usize,
    },
    /// A complex literal whose phase is not followed by `°`.
    #[error("Error at position {position}: A complex number phase must end with '°'.")]
    MissingDegreeSymbol {
        /// Byte offset where `°` was expected.
        position: usize,
    },
    /// A complex literal with `∠` but no phase.
    #[error("Error at position {position}: Missing phase after '∠'.")]
    MissingPhase {
        /// Byte offset where the phase was expected.
        position: usize,
    },
    /// Tokens left over after a complete statement.
    #[error("Error at position {position}: Extra tokens starting at '{token}'.")]
    TrailingTokens {
        /// The first unconsumed token.
        token:    String,
        /// Byte offset of that token.
        position: usize,
    },
    /// The input nests deeper than the configured limit.
    #[error("Error at position {position}: Expression nests deeper than {max_depth} levels.")]
    NestingTooDeep {
        /// The configured limit.
        max_depth: usize,
        /// Byte offset where the limit was exceeded.
        position:  usize,
    },
    /// A well-formed construct produced an invalid node.
    #[error("Error at position {position}: {source}")]
    InvalidExpression {
        /// The construction error.
        #[source]
        source:   ExpressionError,
        /// Byte offset just after the construct.
        position: usize,
    },
}
