//! Tokens produced by the lexer.

use std::fmt;

use crate::Span;

/// A lexed token.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// A line terminator appears between the previous token and this one.
    pub newline_before: bool,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span, newline_before: bool) -> Self {
        Token {
            kind,
            span,
            newline_before,
        }
    }
}

/// Token kinds of the host grammar.
///
/// Contextual words (`async`, `await`, `yield`, `from`, `as`, `of`) lex as
/// identifiers; the parser decides what they mean.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Literals
    Ident(String),
    Number(f64),
    Str(String),
    Regex { pattern: String, flags: String },

    // Keywords
    Break,
    Catch,
    Const,
    Continue,
    Else,
    Export,
    False,
    Finally,
    For,
    Function,
    If,
    Import,
    In,
    InstanceOf,
    Let,
    New,
    Null,
    Return,
    Throw,
    True,
    Try,
    TypeOf,
    Var,
    Void,
    While,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    Question,
    Colon,
    Arrow,

    // Operators
    Eq,
    EqEq,
    EqEqEq,
    NotEq,
    NotEqEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    Bang,
    AmpAmp,
    PipePipe,
    QuestionQuestion,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,

    Eof,
}

impl TokenKind {
    /// Source text of keywords, used where a keyword may stand in for a
    /// property name (`promise.catch`, `{ default: 1 }`).
    pub fn keyword_text(&self) -> Option<&'static str> {
        Some(match self {
            TokenKind::Break => "break",
            TokenKind::Catch => "catch",
            TokenKind::Const => "const",
            TokenKind::Continue => "continue",
            TokenKind::Else => "else",
            TokenKind::Export => "export",
            TokenKind::False => "false",
            TokenKind::Finally => "finally",
            TokenKind::For => "for",
            TokenKind::Function => "function",
            TokenKind::If => "if",
            TokenKind::Import => "import",
            TokenKind::In => "in",
            TokenKind::InstanceOf => "instanceof",
            TokenKind::Let => "let",
            TokenKind::New => "new",
            TokenKind::Null => "null",
            TokenKind::Return => "return",
            TokenKind::Throw => "throw",
            TokenKind::True => "true",
            TokenKind::Try => "try",
            TokenKind::TypeOf => "typeof",
            TokenKind::Var => "var",
            TokenKind::Void => "void",
            TokenKind::While => "while",
            _ => return None,
        })
    }

    /// Whether a `/` after this token continues an expression (division)
    /// rather than starting a regular expression literal.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Ident(_)
                | TokenKind::Number(_)
                | TokenKind::Str(_)
                | TokenKind::Regex { .. }
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
        )
    }

    /// Whether this is the identifier `word`.
    #[inline]
    pub fn is_ident(&self, word: &str) -> bool {
        matches!(self, TokenKind::Ident(name) if name == word)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = self.keyword_text() {
            return write!(f, "`{text}`");
        }
        let text = match self {
            TokenKind::Ident(name) => return write!(f, "identifier `{name}`"),
            TokenKind::Number(_) => "number",
            TokenKind::Str(_) => "string",
            TokenKind::Regex { .. } => "regular expression",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Ellipsis => "...",
            TokenKind::Question => "?",
            TokenKind::Colon => ":",
            TokenKind::Arrow => "=>",
            TokenKind::Eq => "=",
            TokenKind::EqEq => "==",
            TokenKind::EqEqEq => "===",
            TokenKind::NotEq => "!=",
            TokenKind::NotEqEq => "!==",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::StarStar => "**",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Bang => "!",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::QuestionQuestion => "??",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::Eof => return write!(f, "end of input"),
            _ => "token",
        };
        write!(f, "`{text}`")
    }
}
