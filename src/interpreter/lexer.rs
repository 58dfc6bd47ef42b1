use logos::Logos;

use crate::{error::ParseError, util::num::i64_to_f64_checked};

/// A lexical token of a formula.
///
/// Keywords take priority over identifiers of the same length, so `if`,
/// `mod` or `deg` can never name a variable, while `iff` or `model` can.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    /// Number literals: decimal (`3`, `3.14`, `.5`, `2.1e-10`) or prefixed
    /// binary, octal and hexadecimal integers (`0b101`, `0o17`, `0xFF`).
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", parse_decimal)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_decimal)]
    #[regex(r"0[bB][01]+", |lex| parse_radix(lex.slice(), 2))]
    #[regex(r"0[oO][0-7]+", |lex| parse_radix(lex.slice(), 8))]
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| parse_radix(lex.slice(), 16))]
    Number(f64),
    /// Variable or function names such as `x`, `sin` or `α1`.
    #[regex(r"[a-zA-Z_α-ωΑ-Ω][a-zA-Z0-9_α-ωΑ-Ω]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// Double-quoted string literals, without the quotes.
    #[regex(r#""[^"]*""#, |lex| {
        let slice = lex.slice();
        slice[1..slice.len() - 1].to_string()
    })]
    String(String),

    /// `true`
    #[token("true")]
    True,
    /// `false`
    #[token("false")]
    False,
    /// `def` / `define`
    #[token("def")]
    #[token("define")]
    Define,
    /// `undef` / `undefine`
    #[token("undef")]
    #[token("undefine")]
    Undefine,
    /// `if`
    #[token("if")]
    If,
    /// `for`
    #[token("for")]
    For,
    /// `while`
    #[token("while")]
    While,
    /// `and`
    #[token("and")]
    AndKeyword,
    /// `or`
    #[token("or")]
    OrKeyword,
    /// `not`
    #[token("not")]
    NotKeyword,
    /// `xor`
    #[token("xor")]
    XOrKeyword,
    /// `nand`
    #[token("nand")]
    NAndKeyword,
    /// `nor`
    #[token("nor")]
    NOrKeyword,
    /// `eq` / `xnor`
    #[token("eq")]
    #[token("xnor")]
    EqKeyword,
    /// `impl`
    #[token("impl")]
    ImplKeyword,
    /// `mod`
    #[token("mod")]
    ModKeyword,
    /// `deg` / `degree` / `degrees`
    #[token("deg")]
    #[token("degree")]
    #[token("degrees")]
    DegreeKeyword,
    /// `rad` / `radian` / `radians`
    #[token("rad")]
    #[token("radian")]
    #[token("radians")]
    RadianKeyword,
    /// `grad` / `gradian` / `gradians`
    #[token("grad")]
    #[token("gradian")]
    #[token("gradians")]
    GradianKeyword,

    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `^`
    #[token("^")]
    Caret,
    /// `!`
    #[token("!")]
    Bang,
    /// `~`
    #[token("~")]
    Tilde,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `|`
    #[token("|")]
    Pipe,
    /// `&&`
    #[token("&&")]
    DoubleAmpersand,
    /// `||`
    #[token("||")]
    DoublePipe,
    /// `->` / `=>`
    #[token("->")]
    #[token("=>")]
    Implication,
    /// `<->` / `<=>`
    #[token("<->")]
    #[token("<=>")]
    Equality,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>`
    #[token(">")]
    Greater,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<<`
    #[token("<<")]
    LeftShift,
    /// `>>`
    #[token(">>")]
    RightShift,
    /// `:=`
    #[token(":=")]
    Assign,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*=`
    #[token("*=")]
    StarAssign,
    /// `/=`
    #[token("/=")]
    SlashAssign,
    /// `<<=`
    #[token("<<=")]
    LeftShiftAssign,
    /// `>>=`
    #[token(">>=")]
    RightShiftAssign,
    /// `++`
    #[token("++")]
    Increment,
    /// `--`
    #[token("--")]
    Decrement,
    /// `?`
    #[token("?")]
    Question,
    /// `:`
    #[token(":")]
    Colon,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `°`
    #[token("°")]
    Degree,
    /// `∠`
    #[token("∠")]
    Angle,

    /// Spaces, tabs and line breaks.
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Whitespace,
}

impl Token {
    /// A short human-readable rendering of the token, used in error messages.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Identifier(_) => "identifier",
            Self::String(_) => "string",
            Self::True => "true",
            Self::False => "false",
            Self::Define => "def",
            Self::Undefine => "undef",
            Self::If => "if",
            Self::For => "for",
            Self::While => "while",
            Self::AndKeyword => "and",
            Self::OrKeyword => "or",
            Self::NotKeyword => "not",
            Self::XOrKeyword => "xor",
            Self::NAndKeyword => "nand",
            Self::NOrKeyword => "nor",
            Self::EqKeyword => "eq",
            Self::ImplKeyword => "impl",
            Self::ModKeyword => "mod",
            Self::DegreeKeyword => "deg",
            Self::RadianKeyword => "rad",
            Self::GradianKeyword => "grad",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Caret => "^",
            Self::Bang => "!",
            Self::Tilde => "~",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::DoubleAmpersand => "&&",
            Self::DoublePipe => "||",
            Self::Implication => "->",
            Self::Equality => "<->",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::Assign => ":=",
            Self::PlusAssign => "+=",
            Self::MinusAssign => "-=",
            Self::StarAssign => "*=",
            Self::SlashAssign => "/=",
            Self::LeftShiftAssign => "<<=",
            Self::RightShiftAssign => ">>=",
            Self::Increment => "++",
            Self::Decrement => "--",
            Self::Question => "?",
            Self::Colon => ":",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::Comma => ",",
            Self::Degree => "°",
            Self::Angle => "∠",
            Self::Whitespace => "whitespace",
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Identifier(name) => f.write_str(name),
            Self::String(text) => write!(f, "\"{text}\""),
            other => f.write_str(other.describe()),
        }
    }
}

/// Splits `source` into tokens, each paired with its starting byte offset.
///
/// # Errors
/// Returns [`ParseError::UnexpectedToken`] for text that is not a token.
///
/// # Example
/// ```
/// use mathtree::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("2x + 1").unwrap();
/// assert_eq!(tokens,
///            vec![(Token::Number(2.0), 0),
///                 (Token::Identifier("x".to_string()), 1),
///                 (Token::Plus, 3),
///                 (Token::Number(1.0), 5)]);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next() {
        match token {
            Ok(token) => tokens.push((token, lexer.span().start)),
            Err(()) => {
                return Err(ParseError::UnexpectedToken { token:    lexer.slice().to_string(),
                                                         position: lexer.span().start, });
            },
        }
    }

    log::trace!("tokenized {} token(s) from {source:?}", tokens.len());
    Ok(tokens)
}

/// Parses a decimal literal from the current token slice.
fn parse_decimal(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

/// Parses a prefixed integer literal (`0b`, `0o`, `0x`) in the given radix.
///
/// Literals that do not fit exactly in an `f64` are rejected.
fn parse_radix(slice: &str, radix: u32) -> Option<f64> {
    let value = i64::from_str_radix(&slice[2..], radix).ok()?;
    i64_to_f64_checked(value, ()).ok()
}
