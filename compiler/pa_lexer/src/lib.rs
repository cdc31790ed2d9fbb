//! Tokenizer for the host grammar, built on `logos`.
//!
//! Two things need more context than a regular grammar has, and are handled
//! in the driver loop around the generated lexer:
//!
//! - Regular-expression literals. A `/` starts a literal only when the
//!   previous token cannot end an operand; otherwise it is division.
//! - Line breaks. They are not tokens, but each [`Token`] records whether one
//!   preceded it so the parser can apply automatic semicolon insertion.

use logos::Logos;
use pa_ir::{Span, Token, TokenKind};

mod escape;

pub use escape::unescape;

/// Lexing failures. Offsets are already rebased.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character `{ch}`")]
    UnexpectedChar { ch: char, span: Span },
    #[error("unterminated string literal")]
    UnterminatedString { span: Span },
    #[error("unterminated regular expression literal")]
    UnterminatedRegex { span: Span },
    #[error("unterminated block comment")]
    UnterminatedComment { span: Span },
    #[error("invalid number literal `{text}`")]
    InvalidNumber { text: String, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::UnterminatedRegex { span }
            | LexError::UnterminatedComment { span }
            | LexError::InvalidNumber { span, .. } => *span,
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\f\u{a0}\u{feff}]+")]
enum RawToken {
    #[token("\n")]
    Newline,
    #[regex(r"//[^\n]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,

    #[token("break")]
    Break,
    #[token("catch")]
    Catch,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("else")]
    Else,
    #[token("export")]
    Export,
    #[token("false")]
    False,
    #[token("finally")]
    Finally,
    #[token("for")]
    For,
    #[token("function")]
    Function,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("in")]
    In,
    #[token("instanceof")]
    InstanceOf,
    #[token("let")]
    Let,
    #[token("new")]
    New,
    #[token("null")]
    Null,
    #[token("return")]
    Return,
    #[token("throw")]
    Throw,
    #[token("true")]
    True,
    #[token("try")]
    Try,
    #[token("typeof")]
    TypeOf,
    #[token("var")]
    Var,
    #[token("void")]
    Void,
    #[token("while")]
    While,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token("=>")]
    Arrow,

    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("===")]
    EqEqEq,
    #[token("!=")]
    NotEq,
    #[token("!==")]
    NotEqEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    StarStar,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("!")]
    Bang,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("??")]
    QuestionQuestion,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,

    #[regex(r"0[xX][0-9a-fA-F]+")]
    HexNumber,
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    Str,
    #[regex(r#""([^"\\\n]|\\.)*"#)]
    #[regex(r"'([^'\\\n]|\\.)*")]
    UnterminatedStr,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,
}

/// Skip to just past the closing `*/`. An unclosed comment consumes the rest
/// of the input and is reported as an error.
fn block_comment(lex: &mut logos::Lexer<RawToken>) -> bool {
    if let Some(end) = lex.remainder().find("*/") {
        lex.bump(end + 2);
        true
    } else {
        lex.bump(lex.remainder().len());
        false
    }
}

/// Tokenizer over one source string.
pub struct Lexer<'src> {
    source: &'src str,
    base: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer { source, base: 0 }
    }

    /// Report spans relative to byte `base` of the source instead of its
    /// start. Tokens before `base` collapse to empty spans at offset zero.
    #[must_use]
    pub fn with_base(mut self, base: u32) -> Self {
        self.base = base;
        self
    }

    /// Tokenize the whole source. The last token is always [`TokenKind::Eof`].
    #[tracing::instrument(level = "trace", skip_all, fields(len = self.source.len()))]
    pub fn tokenize(self) -> Result<Vec<Token>, LexError> {
        let mut raw = RawToken::lexer(self.source);
        let mut tokens: Vec<Token> = Vec::new();
        let mut newline_before = false;

        while let Some(next) = raw.next() {
            let span = self.span(raw.span());
            let Ok(kind) = next else {
                if raw.slice().starts_with("/*") {
                    let span = self.span(raw.span().start..self.source.len());
                    return Err(LexError::UnterminatedComment { span });
                }
                let ch = raw.slice().chars().next().unwrap_or('\u{fffd}');
                return Err(LexError::UnexpectedChar { ch, span });
            };

            let token_kind = match kind {
                RawToken::Newline => {
                    newline_before = true;
                    continue;
                }
                RawToken::LineComment => continue,
                RawToken::BlockComment => {
                    newline_before |= raw.slice().contains('\n');
                    continue;
                }
                RawToken::Slash | RawToken::SlashEq
                    if tokens.last().map_or(true, |t| !t.kind.ends_operand()) =>
                {
                    let start = raw.span().start;
                    let (pattern, flags, len) = scan_regex(&self.source[start..])
                        .ok_or(LexError::UnterminatedRegex { span })?;
                    raw.bump(len - raw.span().len());
                    TokenKind::Regex { pattern, flags }
                }
                RawToken::UnterminatedStr => return Err(LexError::UnterminatedString { span }),
                RawToken::Str => {
                    let slice = raw.slice();
                    TokenKind::Str(unescape(&slice[1..slice.len() - 1]))
                }
                RawToken::Number => {
                    let text = raw.slice();
                    let value = text.parse::<f64>().map_err(|_| LexError::InvalidNumber {
                        text: text.to_string(),
                        span,
                    })?;
                    TokenKind::Number(value)
                }
                RawToken::HexNumber => {
                    let text = raw.slice();
                    let value = u64::from_str_radix(&text[2..], 16).map_err(|_| {
                        LexError::InvalidNumber {
                            text: text.to_string(),
                            span,
                        }
                    })?;
                    TokenKind::Number(hex_to_f64(value))
                }
                RawToken::Ident => TokenKind::Ident(raw.slice().to_string()),
                other => simple_kind(other),
            };

            let span = self.span(raw.span());
            tokens.push(Token::new(token_kind, span, newline_before));
            newline_before = false;
        }

        let end = self.span(self.source.len()..self.source.len());
        tokens.push(Token::new(TokenKind::Eof, end, newline_before));
        tracing::trace!(count = tokens.len(), "tokenized");
        Ok(tokens)
    }

    fn span(&self, range: std::ops::Range<usize>) -> Span {
        Span::from_range(range).rebase(self.base)
    }
}

/// Tokenize `source` with spans relative to its start.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

/// Scan a regular-expression literal at the start of `text`, which begins
/// with `/`. Returns the body, the flags and the literal's byte length.
fn scan_regex(text: &str) -> Option<(String, String, usize)> {
    let mut chars = text.char_indices().skip(1);
    let mut in_class = false;
    let body_end = loop {
        let (i, c) = chars.next()?;
        match c {
            '\n' => return None,
            '\\' => {
                let (_, escaped) = chars.next()?;
                if escaped == '\n' {
                    return None;
                }
            }
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => break i,
            _ => {}
        }
    };
    let flags: String = text[body_end + 1..]
        .chars()
        .take_while(char::is_ascii_alphabetic)
        .collect();
    let len = body_end + 1 + flags.len();
    Some((text[1..body_end].to_string(), flags, len))
}

#[expect(
    clippy::cast_precision_loss,
    reason = "hex literals above 2^53 round like the host language"
)]
fn hex_to_f64(value: u64) -> f64 {
    value as f64
}

fn simple_kind(raw: RawToken) -> TokenKind {
    match raw {
        RawToken::Break => TokenKind::Break,
        RawToken::Catch => TokenKind::Catch,
        RawToken::Const => TokenKind::Const,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Else => TokenKind::Else,
        RawToken::Export => TokenKind::Export,
        RawToken::False => TokenKind::False,
        RawToken::Finally => TokenKind::Finally,
        RawToken::For => TokenKind::For,
        RawToken::Function => TokenKind::Function,
        RawToken::If => TokenKind::If,
        RawToken::Import => TokenKind::Import,
        RawToken::In => TokenKind::In,
        RawToken::InstanceOf => TokenKind::InstanceOf,
        RawToken::Let => TokenKind::Let,
        RawToken::New => TokenKind::New,
        RawToken::Null => TokenKind::Null,
        RawToken::Return => TokenKind::Return,
        RawToken::Throw => TokenKind::Throw,
        RawToken::True => TokenKind::True,
        RawToken::Try => TokenKind::Try,
        RawToken::TypeOf => TokenKind::TypeOf,
        RawToken::Var => TokenKind::Var,
        RawToken::Void => TokenKind::Void,
        RawToken::While => TokenKind::While,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Ellipsis => TokenKind::Ellipsis,
        RawToken::Question => TokenKind::Question,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::Eq => TokenKind::Eq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::EqEqEq => TokenKind::EqEqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::NotEqEq => TokenKind::NotEqEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::StarStar => TokenKind::StarStar,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
        RawToken::Bang => TokenKind::Bang,
        RawToken::AmpAmp => TokenKind::AmpAmp,
        RawToken::PipePipe => TokenKind::PipePipe,
        RawToken::QuestionQuestion => TokenKind::QuestionQuestion,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::StarEq => TokenKind::StarEq,
        RawToken::SlashEq => TokenKind::SlashEq,
        RawToken::PercentEq => TokenKind::PercentEq,
        // Handled by the driver loop before reaching here.
        RawToken::Newline
        | RawToken::LineComment
        | RawToken::BlockComment
        | RawToken::HexNumber
        | RawToken::Number
        | RawToken::Str
        | RawToken::UnterminatedStr
        | RawToken::Ident => TokenKind::Eof,
    }
}
