//! Token model fed into the evaluator, and the `TokenSource` trait that
//! decouples the parser from any particular lexer.

/// The kind of a token relevant to constant-expression evaluation.
///
/// Unary plus/minus are distinct variants from their binary counterparts,
/// rather than being disambiguated by parser state after the fact, the way
/// `CPP_PLUS`/`CPP_MINUS` are disambiguated in the reference by context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpKind {
    Eof = 0,
    Number,
    CharConst,
    WCharConst,
    Name,
    Defined,
    Assertion,

    Add,
    Sub,
    Mul,
    Div,
    Mod,

    UPlus,
    UMinus,
    LNot,
    BNot,

    Lshift,
    Rshift,

    Less,
    Greater,
    LessEq,
    GreaterEq,
    Eq,
    NotEq,

    BAnd,
    BXor,
    BOr,
    LAnd,
    LOr,

    /// GNU `<?` extension: the lesser of two operands.
    MinOp,
    /// GNU `>?` extension: the greater of two operands.
    MaxOp,

    Query,
    Colon,
    Comma,

    OpenParen,
    CloseParen,
}

impl OpKind {
    /// True for tokens that can legally start a primary expression
    /// (a value or a unary/opening operator), used by the parser's
    /// want-value/want-operator state machine.
    pub fn is_value_start(self) -> bool {
        matches!(
            self,
            OpKind::Number
                | OpKind::CharConst
                | OpKind::WCharConst
                | OpKind::Name
                | OpKind::Defined
                | OpKind::Assertion
                | OpKind::UPlus
                | OpKind::UMinus
                | OpKind::LNot
                | OpKind::BNot
                | OpKind::OpenParen
        )
    }
}

/// One token as seen by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token's syntactic kind.
    pub kind: OpKind,
    /// Raw source text, for `Number`/`CharConst`/`WCharConst`/`Name`/
    /// `Assertion` tokens. Empty for pure punctuation.
    pub text: String,
    /// True if this token came from expanding a macro defined in a system
    /// header, which suppresses the traditional-C `U`-suffix warning.
    /// Always false for tokens built directly (this crate's token source
    /// never expands macros), but carried on the token rather than looked
    /// up by name since "is this a system macro" is a property of the
    /// macro that produced the token, not of the literal text itself.
    pub from_sys_macro: bool,
}

impl Token {
    /// Build a punctuation token with no associated text.
    pub fn punct(kind: OpKind) -> Self {
        Token {
            kind,
            text: String::new(),
            from_sys_macro: false,
        }
    }

    /// Build a token carrying source text (a number, identifier, etc).
    pub fn with_text(kind: OpKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
            from_sys_macro: false,
        }
    }

    /// Mark this token as having come from a system-header macro expansion.
    pub fn from_system_macro(mut self) -> Self {
        self.from_sys_macro = true;
        self
    }
}

/// Supplies tokens to the evaluator one at a time.
///
/// Mirrors the reference implementation's callback into the main lexer;
/// this crate's evaluator never lexes raw source text itself, it only
/// consumes whatever already-tokenized stream a `TokenSource` hands it.
pub trait TokenSource {
    /// Return the next token, or an `Eof`-kind token at end of input.
    fn next_token(&mut self) -> Token;

    /// Peek at the next token's kind without consuming it, if the source
    /// can do so cheaply. Used by the parser to detect `defined` applied
    /// to a parenthesised name without committing to consuming tokens.
    fn peek_kind(&mut self) -> OpKind;
}

/// An in-memory [`TokenSource`] over a pre-lexed `Vec<Token>`, used by
/// tests and by callers that already have a token list from elsewhere.
#[derive(Debug, Clone)]
pub struct VecTokenSource {
    tokens: Vec<Token>,
    pos: usize,
}

impl VecTokenSource {
    /// Wrap a token vector. An `Eof` token is appended if the caller did
    /// not already supply one, so `next_token` never panics.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(OpKind::Eof) {
            tokens.push(Token::punct(OpKind::Eof));
        }
        VecTokenSource { tokens, pos: 0 }
    }
}

impl TokenSource for VecTokenSource {
    fn next_token(&mut self) -> Token {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .unwrap_or_else(|| Token::punct(OpKind::Eof));
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn peek_kind(&mut self) -> OpKind {
        self.tokens
            .get(self.pos)
            .map(|t| t.kind)
            .unwrap_or(OpKind::Eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_source_yields_in_order_then_eof() {
        let mut src = VecTokenSource::new(vec![
            Token::with_text(OpKind::Number, "1"),
            Token::punct(OpKind::Add),
            Token::with_text(OpKind::Number, "2"),
        ]);
        assert_eq!(src.next_token().kind, OpKind::Number);
        assert_eq!(src.peek_kind(), OpKind::Add);
        assert_eq!(src.next_token().kind, OpKind::Add);
        assert_eq!(src.next_token().kind, OpKind::Number);
        assert_eq!(src.next_token().kind, OpKind::Eof);
        assert_eq!(src.next_token().kind, OpKind::Eof);
    }

    #[test]
    fn value_start_classification() {
        assert!(OpKind::Number.is_value_start());
        assert!(OpKind::UMinus.is_value_start());
        assert!(!OpKind::Add.is_value_start());
        assert!(!OpKind::CloseParen.is_value_start());
    }
}
