//! Extractor Tests
//!
//! Deciding whether a raw value is a variable expression, and rejecting values
//! that look like one but are malformed.

use cactus::expression::{MalformedReason, try_extract_variable_expression};
use rstest::rstest;

// ============================================================================
// Not Expressions
// ============================================================================

#[rstest]
#[case("")]
#[case("  ")]
#[case("string value")]
#[case("/edev/1/der/1")]
// Escaped
#[case("\\$(now)")]
#[case("  \\$(now) ")]
#[case("  \\$now ")]
#[case("\\$now")]
#[case("\\$")]
#[case("\\$()")]
#[case(" \\$() ")]
fn test_not_an_expression(#[case] input: &str) {
    assert_eq!(try_extract_variable_expression(input), Ok(None), "Input: '{}'", input);
}

// ============================================================================
// Valid Expressions
// ============================================================================

#[rstest]
#[case("$now", "now")]
#[case("  $now\n  ", "now")]
#[case("$(now)", "now")]
#[case("$(now - '5 minutes')", "now - '5 minutes'")]
#[case("$(  now - '5 minutes'  )", "  now - '5 minutes'  ")]
#[case("$variable_with_556", "variable_with_556")]
#[case("$(variable_with_556)", "variable_with_556")]
#[case("$(variable-556)", "variable-556")]
#[case(
    "$(longer_variable but include everything)",
    "longer_variable but include everything"
)]
#[case("\t$(0.5 * setMaxW)\t", "0.5 * setMaxW")]
fn test_extracts_body(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(
        try_extract_variable_expression(input),
        Ok(Some(expected)),
        "Input: '{}'",
        input
    );
}

// ============================================================================
// Malformed Expressions
// ============================================================================

#[rstest]
#[case("$", MalformedReason::DanglingDollar)]
#[case("  $", MalformedReason::DanglingDollar)]
#[case("$ ", MalformedReason::EmptyBody)]
#[case("$()", MalformedReason::EmptyBody)]
#[case("$ invalid_space", MalformedReason::EmptyBody)]
#[case("$-invalid_char", MalformedReason::EmptyBody)]
#[case("$(now", MalformedReason::UnclosedParenthesis)]
#[case(" $(now  ", MalformedReason::UnclosedParenthesis)]
#[case(" $(now foo", MalformedReason::UnclosedParenthesis)]
#[case("$variable-556", MalformedReason::SurroundingText)]
#[case("$longer_variable no spaces", MalformedReason::SurroundingText)]
#[case("$(valid) no trailing data", MalformedReason::SurroundingText)]
#[case("no leading data $(valid)", MalformedReason::SurroundingText)]
#[case("text $(now)", MalformedReason::SurroundingText)]
#[case("$(now) text", MalformedReason::SurroundingText)]
#[case("$(now)x", MalformedReason::SurroundingText)]
fn test_malformed(#[case] input: &str, #[case] reason: MalformedReason) {
    let err = try_extract_variable_expression(input).unwrap_err();
    assert_eq!(err.reason, reason, "Input: '{}'", input);
    assert_eq!(err.value, input);
}

#[test]
fn test_nested_parentheses_stop_at_first_close() {
    // The body is not balanced: the first ')' ends it and the rest is trailing text
    let err = try_extract_variable_expression("$((now))").unwrap_err();
    assert_eq!(err.reason, MalformedReason::SurroundingText);

    assert_eq!(try_extract_variable_expression("$((now)"), Ok(Some("(now")));
}

#[test]
fn test_only_first_dollar_is_considered() {
    assert_eq!(try_extract_variable_expression("\\$now $now"), Ok(None));
}

#[test]
fn test_error_message_mentions_value() {
    let err = try_extract_variable_expression("$(now").unwrap_err();
    assert!(err.to_string().contains("$(now"));
}
