use crate::interpreter::lexer::Token;

/// A checkpoint returned by [`TokenReader::create_scope`].
///
/// A scope must be resolved with exactly one call to
/// [`TokenReader::rollback`] or [`TokenReader::commit`].
#[derive(Debug)]
#[must_use = "a scope must be committed or rolled back"]
pub struct Scope {
    position: usize,
    depth:    usize,
}

/// A cursor over a token buffer with nestable checkpoints.
///
/// The parser tries grammar productions speculatively: it opens a scope,
/// consumes tokens, and either commits (keeps the new position) or rolls
/// back (restores the position saved by the scope). Checkpoints nest in
/// stack order, and resolving an outer scope also discards any inner scope
/// that was abandoned without being resolved.
///
/// Reader methods never fail; reporting errors is the parser's job.
///
/// # Example
/// ```
/// use mathtree::interpreter::{
///     lexer::{Token, tokenize},
///     token_reader::TokenReader,
/// };
///
/// let tokens = tokenize("x + 1").unwrap();
/// let mut reader = TokenReader::new(&tokens);
///
/// let scope = reader.create_scope();
/// assert_eq!(reader.identifier(), Some("x"));
/// assert!(reader.check(&Token::Plus));
/// reader.rollback(scope);
///
/// assert_eq!(reader.position(), 0);
/// assert!(!reader.check(&Token::Plus));
/// ```
#[derive(Debug)]
pub struct TokenReader<'a> {
    tokens:      &'a [(Token, usize)],
    position:    usize,
    checkpoints: Vec<usize>,
    depth:       usize,
    max_depth:   usize,
}

impl<'a> TokenReader<'a> {
    /// Creates a reader positioned at the first token, with an unlimited
    /// nesting depth.
    #[must_use]
    pub const fn new(tokens: &'a [(Token, usize)]) -> Self {
        Self::with_max_depth(tokens, usize::MAX)
    }

    /// Creates a reader that reports nesting beyond `max_depth`.
    #[must_use]
    pub const fn with_max_depth(tokens: &'a [(Token, usize)], max_depth: usize) -> Self {
        Self { tokens,
               position: 0,
               checkpoints: Vec::new(),
               depth: 0,
               max_depth }
    }

    /// The index of the next token.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The byte offset of the next token, or of the end of input.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map_or(0, |(_, offset)| *offset)
    }

    /// The next token, without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position).map(|(token, _)| token)
    }

    /// Returns `true` once every token has been consumed.
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Consumes and returns the next token if it equals `expected`.
    ///
    /// Leaves the cursor unchanged and returns `None` otherwise.
    pub fn current(&mut self, expected: &Token) -> Option<&'a Token> {
        let token = self.peek().filter(|token| *token == expected)?;
        self.position += 1;
        Some(token)
    }

    /// Consumes and returns the next token if it equals any of `expected`.
    pub fn current_any(&mut self, expected: &[Token]) -> Option<&'a Token> {
        let token = self.peek().filter(|token| expected.contains(token))?;
        self.position += 1;
        Some(token)
    }

    /// Consumes the next token if it equals `expected` and reports whether it
    /// did.
    pub fn check(&mut self, expected: &Token) -> bool {
        self.current(expected).is_some()
    }

    /// Consumes a number literal.
    pub fn number(&mut self) -> Option<f64> {
        match self.peek()? {
            Token::Number(value) => {
                self.position += 1;
                Some(*value)
            },
            _ => None,
        }
    }

    /// Consumes an identifier.
    pub fn identifier(&mut self) -> Option<&'a str> {
        match self.peek()? {
            Token::Identifier(name) => {
                self.position += 1;
                Some(name)
            },
            _ => None,
        }
    }

    /// Consumes a string literal.
    pub fn string(&mut self) -> Option<&'a str> {
        match self.peek()? {
            Token::String(text) => {
                self.position += 1;
                Some(text)
            },
            _ => None,
        }
    }

    /// Saves the current position.
    pub fn create_scope(&mut self) -> Scope {
        let depth = self.checkpoints.len();
        self.checkpoints.push(self.position);
        Scope { position: self.position,
                depth }
    }

    /// Restores the position saved by `scope` and discards it, together with
    /// every scope opened after it.
    pub fn rollback(&mut self, scope: Scope) {
        log::trace!("rolling back from token {} to token {}",
                    self.position,
                    scope.position);
        self.position = scope.position;
        self.checkpoints.truncate(scope.depth);
    }

    /// Keeps the current position and discards `scope`, together with every
    /// scope opened after it.
    pub fn commit(&mut self, scope: Scope) {
        self.checkpoints.truncate(scope.depth);
    }

    /// The number of unresolved scopes.
    #[must_use]
    pub fn open_scopes(&self) -> usize {
        self.checkpoints.len()
    }

    /// Enters one level of nesting; returns `false` if that would exceed the
    /// maximum depth.
    pub const fn descend(&mut self) -> bool {
        if self.depth >= self.max_depth {
            return false;
        }
        self.depth += 1;
        true
    }

    /// Leaves one level of nesting.
    pub const fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// The configured maximum nesting depth.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }
}
