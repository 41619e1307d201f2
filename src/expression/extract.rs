//! Detects whether a raw string value is a variable expression.

use tracing::trace;

use super::errors::{MalformedExpressionError, MalformedReason};

/// Returns the body of the variable expression encoded by `value`, or `None` if `value`
/// is an ordinary string.
///
/// Two forms are recognised and must make up the entire value (surrounding whitespace
/// is ignored):
/// - `$(body)`: the body runs up to the first `)`, parentheses do not nest
/// - `$identifier`: the body is the run of `[A-Za-z0-9_]` following `$`
///
/// A `$` preceded by a backslash is escaped and the value is not an expression.
///
/// # Errors
///
/// [`MalformedExpressionError`] when the value contains an unescaped `$` but is not a
/// well formed expression. This never degrades to `None`, so a typo can't silently
/// turn into a literal string.
pub fn try_extract_variable_expression(value: &str) -> Result<Option<&str>, MalformedExpressionError> {
    let Some(dollar) = value.find('$') else {
        return Ok(None);
    };

    let leading = &value[..dollar];
    if leading.ends_with('\\') {
        return Ok(None);
    }

    let malformed = |reason| MalformedExpressionError::new(value, reason);

    let rest = &value[dollar + 1..];
    if rest.is_empty() {
        return Err(malformed(MalformedReason::DanglingDollar));
    }

    let (body, trailing) = match rest.strip_prefix('(') {
        Some(inner) => {
            let close = inner
                .find(')')
                .ok_or_else(|| malformed(MalformedReason::UnclosedParenthesis))?;
            (&inner[..close], &inner[close + 1..])
        }
        None => {
            let end = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            rest.split_at(end)
        }
    };

    if body.is_empty() {
        return Err(malformed(MalformedReason::EmptyBody));
    }

    if has_text(leading) || has_text(trailing) {
        return Err(malformed(MalformedReason::SurroundingText));
    }

    trace!(value, body, "extracted variable expression");
    Ok(Some(body))
}

fn has_text(s: &str) -> bool {
    s.chars().any(|c| !c.is_whitespace())
}
