//! Error types for the variable expression language.
//!
//! Two kinds are kept apart so callers can tell them from each other and from
//! ordinary schema errors:
//! - [`MalformedExpressionError`]: the text contained a `$` but the wrapper was invalid
//! - [`UnparseableExpressionError`]: the body could not be tokenized or parsed

use text_size::TextRange;
use thiserror::Error;

/// Why an apparent variable expression was rejected by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MalformedReason {
    /// `$` was the final character
    #[error("nothing follows '$'. Try escaping $ like '\\$'")]
    DanglingDollar,
    /// `$(` without a closing `)`
    #[error("'$(' is never closed by ')'")]
    UnclosedParenthesis,
    /// `$()`, `$ ` or `$-`
    #[error("the variable body is empty")]
    EmptyBody,
    /// Leading or trailing non-whitespace around the expression
    #[error("variable expressions must be the entire value, not a substring")]
    SurroundingText,
}

/// Raised when a value looks like a variable expression but its delimiters are malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' appears to be a malformed variable definition: {reason}")]
pub struct MalformedExpressionError {
    /// The complete raw value that was inspected
    pub value: String,
    /// What was wrong with it
    pub reason: MalformedReason,
}

impl MalformedExpressionError {
    pub fn new(value: impl Into<String>, reason: MalformedReason) -> Self {
        Self {
            value: value.into(),
            reason,
        }
    }
}

/// Raised when a variable expression body fails to tokenize or parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnparseableExpressionError {
    #[error("variable expression body is empty")]
    EmptyBody,

    #[error("variable expression body is too long ({0} bytes)")]
    BodyTooLong(usize),

    #[error("error tokenizing '{body}' at {range:?}")]
    Tokenize { body: String, range: TextRange },

    #[error("unable to parse '{0}' into a simple unary/binary expression")]
    TokenCount(String),

    #[error("expected an operator (eg + - / *) but found '{0}'")]
    ExpectedOperator(String),

    #[error("unable to parse operator '{0}' into an operation")]
    UnknownOperator(String),

    #[error("'{0}' isn't recognized as a named variable")]
    UnknownVariable(String),

    #[error("$this cannot resolve to parameter {0:?}")]
    InvalidSelfReference(Option<String>),

    #[error("'{0}' can't be converted to a number")]
    BadNumber(String),

    #[error("{0} can't be parsed into a duration")]
    BadDuration(String),

    #[error("{0} can't be parsed into a duration. Mismatching quotes")]
    MismatchedQuotes(String),

    #[error("{literal} can't be parsed into a duration. Bad number {number}")]
    BadDurationNumber { literal: String, number: String },

    #[error("{literal} can't be parsed into a duration. Unknown unit {unit}")]
    UnknownDurationUnit { literal: String, unit: String },

    #[error("unable to parse token '{0}'")]
    UnexpectedToken(String),
}

/// Either expression error kind, as produced by [`super::parse_variable_expression`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error(transparent)]
    Malformed(#[from] MalformedExpressionError),

    #[error(transparent)]
    Unparseable(#[from] UnparseableExpressionError),
}

impl ExpressionError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }

    pub fn is_unparseable(&self) -> bool {
        matches!(self, Self::Unparseable(_))
    }
}
