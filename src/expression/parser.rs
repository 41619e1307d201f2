//! Parser for variable expression bodies
//!
//! The grammar is dispatched purely on token count:
//!
//! ```text
//! body   := unary | unary OPERATOR unary
//! unary  := NUMBER | STRING_LITERAL (duration) | IDENTIFIER (named variable)
//! ```

use chrono::TimeDelta;
use tracing::debug;

use super::ast::{Constant, Expression, NamedVariable, Operand, Operation, Resolvable};
use super::errors::{ExpressionError, UnparseableExpressionError};
use super::extract::try_extract_variable_expression;
use super::lexer::{Token, TokenKind, tokenize};

/// Identifier that refers back to the parameter the expression was declared under
const SELF_REFERENCE: &str = "this";

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Duration units, matched case-insensitively, with their length in seconds
const DURATION_UNITS: &[(&[&str], f64)] = &[
    (&["day", "days"], 86_400.0),
    (&["hour", "hours", "hr", "hrs"], 3_600.0),
    (&["minute", "minutes", "min", "mins"], 60.0),
    (&["second", "seconds", "sec", "secs"], 1.0),
];

/// Extracts and parses `value` in one step.
///
/// Returns `Ok(None)` if `value` isn't a variable expression at all.
pub fn parse_variable_expression(
    value: &str,
    origin_key: Option<&str>,
) -> Result<Option<Resolvable>, ExpressionError> {
    match try_extract_variable_expression(value)? {
        Some(body) => Ok(Some(parse_variable_expression_body(body, origin_key)?)),
        None => Ok(None),
    }
}

/// Parses the contents of a variable definition.
///
/// For `$(now - '5 seconds')` the body is `now - '5 seconds'`. `origin_key` is the
/// parameter key the expression belongs to (eg `setMaxW`) and is what `this` resolves to.
pub fn parse_variable_expression_body(
    body: &str,
    origin_key: Option<&str>,
) -> Result<Resolvable, UnparseableExpressionError> {
    if body.is_empty() {
        return Err(UnparseableExpressionError::EmptyBody);
    }

    let tokens = tokenize(body, origin_key)?;
    let parsed: Resolvable = match tokens.as_slice() {
        [token] => parse_unary_expression(token)?.into(),
        [lhs, operation, rhs] => parse_binary_expression(lhs, operation, rhs)?.into(),
        _ => return Err(UnparseableExpressionError::TokenCount(body.to_string())),
    };

    debug!(body, origin_key, %parsed, "parsed variable expression");
    Ok(parsed)
}

/// Parses a single token into a constant or named variable.
pub fn parse_unary_expression(token: &Token<'_>) -> Result<Operand, UnparseableExpressionError> {
    match token.kind {
        TokenKind::Identifier => resolve_named_variable(token.text, token.origin_key),
        TokenKind::Number => parse_number(token.text).map(Operand::Constant),
        TokenKind::StringLiteral => {
            parse_duration(token.text).map(|d| Operand::Constant(Constant::Duration(d)))
        }
        TokenKind::Operator => Err(UnparseableExpressionError::UnexpectedToken(
            token.text.to_string(),
        )),
    }
}

/// Parses `lhs OPERATOR rhs`.
pub fn parse_binary_expression(
    lhs: &Token<'_>,
    operation: &Token<'_>,
    rhs: &Token<'_>,
) -> Result<Expression, UnparseableExpressionError> {
    if operation.kind != TokenKind::Operator {
        return Err(UnparseableExpressionError::ExpectedOperator(
            operation.text.to_string(),
        ));
    }

    let operation = Operation::from_symbol(operation.text)
        .ok_or_else(|| UnparseableExpressionError::UnknownOperator(operation.text.to_string()))?;

    let lhs = parse_unary_expression(lhs)?;
    let rhs = parse_unary_expression(rhs)?;

    Ok(Expression::new(operation, lhs, rhs))
}

fn resolve_named_variable(
    name: &str,
    origin_key: Option<&str>,
) -> Result<Operand, UnparseableExpressionError> {
    if name == SELF_REFERENCE {
        return match origin_key {
            Some(key) if key != SELF_REFERENCE => resolve_named_variable(key, None),
            _ => Err(UnparseableExpressionError::InvalidSelfReference(
                origin_key.map(str::to_string),
            )),
        };
    }

    name.parse::<NamedVariable>().map(Operand::NamedVariable)
}

fn parse_number(text: &str) -> Result<Constant, UnparseableExpressionError> {
    let bad_number = || UnparseableExpressionError::BadNumber(text.to_string());
    let digits = text.replace('_', "");

    if digits.contains('.') {
        digits.parse::<f64>().map(Constant::Float).map_err(|_| bad_number())
    } else {
        digits.parse::<i64>().map(Constant::Integer).map_err(|_| bad_number())
    }
}

/// Parses a quoted duration literal like `'5 minutes'` or `"-0.03 days"`.
///
/// The number may be signed and fractional, whitespace between number and unit is
/// optional. Resolution is one microsecond.
pub fn parse_duration(literal: &str) -> Result<TimeDelta, UnparseableExpressionError> {
    let bad_duration = || UnparseableExpressionError::BadDuration(literal.to_string());

    let mut chars = literal.chars();
    let (Some(open), Some(close)) = (chars.next(), chars.next_back()) else {
        return Err(bad_duration());
    };
    if !is_quote(open) || !is_quote(close) {
        return Err(bad_duration());
    }
    if open != close {
        return Err(UnparseableExpressionError::MismatchedQuotes(
            literal.to_string(),
        ));
    }

    let inner = chars.as_str();
    let number_end = inner
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.')))
        .unwrap_or(inner.len());
    let (number, unit) = inner.split_at(number_end);
    let unit = unit.trim_start();

    if unit.contains(['\'', '"']) {
        return Err(bad_duration());
    }

    let value: f64 = number
        .parse()
        .map_err(|_| UnparseableExpressionError::BadDurationNumber {
            literal: literal.to_string(),
            number: number.to_string(),
        })?;

    let unit = unit.to_lowercase();
    let seconds = DURATION_UNITS
        .iter()
        .find(|(names, _)| names.contains(&unit.as_str()))
        .map(|(_, seconds)| *seconds)
        .ok_or_else(|| UnparseableExpressionError::UnknownDurationUnit {
            literal: literal.to_string(),
            unit: unit.clone(),
        })?;

    let micros = (value * seconds * MICROS_PER_SECOND).round();
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return Err(bad_duration());
    }

    Ok(TimeDelta::microseconds(micros as i64))
}

fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '"')
}
