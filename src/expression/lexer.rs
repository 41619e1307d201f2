//! Logos-based lexer for variable expression bodies
//!
//! Recognises exactly four token kinds. Whitespace and `#` comments are skipped.

use logos::Logos;
use text_size::{TextRange, TextSize};
use tracing::trace;

use super::errors::UnparseableExpressionError;

/// Coarse token classification used by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    Operator,
    StringLiteral,
    Identifier,
}

/// A token with its kind, text, and position
///
/// `origin_key` is the parameter key the expression was declared under. It is only
/// consulted when resolving the `this` identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
    pub origin_key: Option<&'a str>,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, range: TextRange) -> Self {
        Self {
            kind,
            text,
            range,
            origin_key: None,
        }
    }

    pub fn with_origin_key(mut self, origin_key: Option<&'a str>) -> Self {
        self.origin_key = origin_key;
        self
    }
}

/// Lexer wrapping the logos-generated tokenizer
///
/// Yields `Err(range)` for input that is not part of any token (eg an unterminated
/// string literal).
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    origin_key: Option<&'a str>,
}

impl<'a> Lexer<'a> {
    /// Fails with [`UnparseableExpressionError::BodyTooLong`] if `input` can't be addressed
    /// by a [`TextSize`].
    pub fn new(input: &'a str, origin_key: Option<&'a str>) -> Result<Self, UnparseableExpressionError> {
        text_len(input.len())?;
        Ok(Self {
            inner: LogosToken::lexer(input),
            origin_key,
        })
    }
}

pub(crate) fn text_len(len: usize) -> Result<TextSize, UnparseableExpressionError> {
    TextSize::try_from(len).map_err(|_| UnparseableExpressionError::BodyTooLong(len))
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, TextRange>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let span = self.inner.span();
        // Lossless: `new` rejected input longer than u32::MAX
        let range = TextRange::new(TextSize::new(span.start as u32), TextSize::new(span.end as u32));

        Some(match logos_token {
            Ok(t) => Ok(Token::new(t.into(), self.inner.slice(), range).with_origin_key(self.origin_key)),
            Err(()) => Err(range),
        })
    }
}

/// Tokenize an entire expression body, failing on the first unrecognised input
pub fn tokenize<'a>(
    body: &'a str,
    origin_key: Option<&'a str>,
) -> Result<Vec<Token<'a>>, UnparseableExpressionError> {
    let tokens = Lexer::new(body, origin_key)?
        .map(|token| {
            token.map_err(|range| UnparseableExpressionError::Tokenize {
                body: body.to_string(),
                range,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    trace!(body, count = tokens.len(), "tokenized variable expression");
    Ok(tokens)
}

/// Logos token enum - maps to TokenKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+|#[^\n]*")]
enum LogosToken {
    // Single underscores may separate digit groups (`1_000`)
    #[regex(r"[0-9]+(_[0-9]+)*(\.([0-9]+(_[0-9]+)*)?)?([eE][+-]?[0-9]+(_[0-9]+)*)?")]
    #[regex(r"\.[0-9]+(_[0-9]+)*([eE][+-]?[0-9]+(_[0-9]+)*)?")]
    Number,

    // Anything punctuation-like is an operator here; the parser decides which are valid
    #[regex(r"==|!=|<=|>=|\*\*|//|<<|>>|->")]
    #[regex(r"[-+*/%<>=!&|^~@:,;()\[\]{}]")]
    Operator,

    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLiteral,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Number => TokenKind::Number,
            LogosToken::Operator => TokenKind::Operator,
            LogosToken::StringLiteral => TokenKind::StringLiteral,
            LogosToken::Identifier => TokenKind::Identifier,
        }
    }
}
