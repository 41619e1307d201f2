//! Variable expression language
//!
//! Parameter values in a test definition may be replaced by a variable expression
//! that is resolved later, while the test is executing:
//!
//! ```text
//! $now                     -> NamedVariable(Now)
//! $(now - '5 minutes')     -> Expression(Subtract, Now, Constant(5 minutes))
//! $(0.5 * setMaxW)         -> Expression(Multiply, Constant(0.5), SetMaxW)
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! Raw value ("$(now - '5 mins')")
//!     ↓
//! Extractor → body text ("now - '5 mins'") or None
//!     ↓
//! Lexer (logos) → Number / Operator / StringLiteral / Identifier tokens
//!     ↓
//! Parser → Resolvable (Constant | NamedVariable | Expression)
//! ```
//!
//! Extraction failures are [`MalformedExpressionError`], everything after that is
//! [`UnparseableExpressionError`].

pub mod ast;
mod errors;
mod extract;
mod lexer;
mod parser;

pub use ast::{
    Constant, Expression, NAMED_VARIABLES, NamedVariable, OPERATIONS, Operand, Operation,
    Resolvable,
};
pub use errors::{
    ExpressionError, MalformedExpressionError, MalformedReason, UnparseableExpressionError,
};
pub use extract::try_extract_variable_expression;
pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use parser::{
    parse_binary_expression, parse_duration, parse_unary_expression, parse_variable_expression,
    parse_variable_expression_body,
};
