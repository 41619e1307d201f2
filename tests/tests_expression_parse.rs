//! Parser Tests - Variable Expression Bodies
//!
//! Unary and binary bodies, named variable lookup, `this` resolution and
//! the ways a body can fail to parse.

use cactus::expression::{
    Constant, Expression, ExpressionError, NamedVariable, Operand, Operation, Resolvable,
    UnparseableExpressionError, parse_variable_expression, parse_variable_expression_body,
};
use chrono::TimeDelta;
use rstest::rstest;

fn constant(c: Constant) -> Operand {
    Operand::Constant(c)
}

fn named(v: NamedVariable) -> Operand {
    Operand::NamedVariable(v)
}

fn expr(operation: Operation, lhs: Operand, rhs: Operand) -> Resolvable {
    Resolvable::Expression(Expression::new(operation, lhs, rhs))
}

// ============================================================================
// Unary Bodies
// ============================================================================

#[rstest]
#[case("1.23", Resolvable::Constant(Constant::Float(1.23)))]
#[case("123", Resolvable::Constant(Constant::Integer(123)))]
#[case("  123  ", Resolvable::Constant(Constant::Integer(123)))]
#[case("1_000", Resolvable::Constant(Constant::Integer(1_000)))]
#[case("1_000.5", Resolvable::Constant(Constant::Float(1_000.5)))]
#[case("2.5e1_0", Resolvable::Constant(Constant::Float(2.5e10)))]
#[case("'-4.56 hours'", Resolvable::Constant(Constant::Duration(TimeDelta::milliseconds(-16_416_000))))]
#[case("\"0.12 days\"", Resolvable::Constant(Constant::Duration(TimeDelta::seconds(10_368))))]
#[case(" \t  '-4.56 hours' \t  ", Resolvable::Constant(Constant::Duration(TimeDelta::milliseconds(-16_416_000))))]
#[case("now", Resolvable::NamedVariable(NamedVariable::Now))]
#[case("setMaxW", Resolvable::NamedVariable(NamedVariable::SetMaxW))]
#[case("setMaxVA", Resolvable::NamedVariable(NamedVariable::SetMaxVa))]
#[case("setMaxVar", Resolvable::NamedVariable(NamedVariable::SetMaxVar))]
#[case("setMaxChargeRateW", Resolvable::NamedVariable(NamedVariable::SetMaxChargeRateW))]
#[case("setMaxDischargeRateW", Resolvable::NamedVariable(NamedVariable::SetMaxDischargeRateW))]
#[case("setMaxWh", Resolvable::NamedVariable(NamedVariable::SetMaxWh))]
#[case("rtgMaxVA", Resolvable::NamedVariable(NamedVariable::RtgMaxVa))]
#[case("rtgMaxVar", Resolvable::NamedVariable(NamedVariable::RtgMaxVar))]
#[case("rtgMaxW", Resolvable::NamedVariable(NamedVariable::RtgMaxW))]
#[case("rtgMaxChargeRateW", Resolvable::NamedVariable(NamedVariable::RtgMaxChargeRateW))]
#[case("rtgMaxDischargeRateW", Resolvable::NamedVariable(NamedVariable::RtgMaxDischargeRateW))]
#[case("rtgMaxWh", Resolvable::NamedVariable(NamedVariable::RtgMaxWh))]
#[case("setMinWh", Resolvable::NamedVariable(NamedVariable::SetMinWh))]
#[case("negRtgMaxChargeRateW", Resolvable::NamedVariable(NamedVariable::NegRtgMaxChargeRateW))]
fn test_unary_bodies(#[case] body: &str, #[case] expected: Resolvable) {
    assert_eq!(parse_variable_expression_body(body, None), Ok(expected), "Body: '{}'", body);
}

// ============================================================================
// Binary Bodies
// ============================================================================

#[rstest]
#[case("0.5 * 0.2", expr(Operation::Multiply, constant(Constant::Float(0.5)), constant(Constant::Float(0.2))))]
#[case("0.5 * setMaxW", expr(Operation::Multiply, constant(Constant::Float(0.5)), named(NamedVariable::SetMaxW)))]
#[case("setMaxW / 2", expr(Operation::Divide, named(NamedVariable::SetMaxW), constant(Constant::Integer(2))))]
#[case("rtgMaxW / 2", expr(Operation::Divide, named(NamedVariable::RtgMaxW), constant(Constant::Integer(2))))]
#[case("rtgMaxWh > 10_000", expr(Operation::Gt, named(NamedVariable::RtgMaxWh), constant(Constant::Integer(10_000))))]
#[case(
    "  now  -    '-12   minutes'  ",
    expr(Operation::Subtract, named(NamedVariable::Now), constant(Constant::Duration(TimeDelta::minutes(-12))))
)]
#[case(
    "now-'-12minutes'",
    expr(Operation::Subtract, named(NamedVariable::Now), constant(Constant::Duration(TimeDelta::minutes(-12))))
)]
#[case(
    "now + \"3 day\"",
    expr(Operation::Add, named(NamedVariable::Now), constant(Constant::Duration(TimeDelta::days(3))))
)]
#[case(
    "\"3 day\" < \"5 day\"",
    expr(Operation::Lt, constant(Constant::Duration(TimeDelta::days(3))), constant(Constant::Duration(TimeDelta::days(5))))
)]
#[case("rtgMaxVar == 5.0", expr(Operation::Eq, named(NamedVariable::RtgMaxVar), constant(Constant::Float(5.0))))]
#[case("rtgMaxW != 0.5", expr(Operation::Ne, named(NamedVariable::RtgMaxW), constant(Constant::Float(0.5))))]
#[case("rtgMaxChargeRateW <= 0.5", expr(Operation::Lte, named(NamedVariable::RtgMaxChargeRateW), constant(Constant::Float(0.5))))]
#[case("rtgMaxDischargeRateW > 0.5", expr(Operation::Gt, named(NamedVariable::RtgMaxDischargeRateW), constant(Constant::Float(0.5))))]
#[case("rtgMaxWh >= 0.5", expr(Operation::Gte, named(NamedVariable::RtgMaxWh), constant(Constant::Float(0.5))))]
fn test_binary_bodies(#[case] body: &str, #[case] expected: Resolvable) {
    assert_eq!(parse_variable_expression_body(body, None), Ok(expected), "Body: '{}'", body);
}

#[rstest]
#[case("+", Operation::Add)]
#[case("-", Operation::Subtract)]
#[case("*", Operation::Multiply)]
#[case("/", Operation::Divide)]
#[case("==", Operation::Eq)]
#[case("!=", Operation::Ne)]
#[case("<", Operation::Lt)]
#[case("<=", Operation::Lte)]
#[case(">", Operation::Gt)]
#[case(">=", Operation::Gte)]
fn test_binary_operands_match_unary_parse(#[case] symbol: &str, #[case] operation: Operation) {
    let lhs = "setMaxW";
    let rhs = "'5 mins'";
    let body = format!("{lhs} {symbol} {rhs}");

    let Ok(Resolvable::Expression(parsed)) = parse_variable_expression_body(&body, None) else {
        panic!("'{}' did not parse to an expression", body);
    };
    assert_eq!(parsed.operation, operation);
    assert_eq!(Resolvable::from(parsed.lhs), parse_variable_expression_body(lhs, None).unwrap());
    assert_eq!(Resolvable::from(parsed.rhs), parse_variable_expression_body(rhs, None).unwrap());
}

// ============================================================================
// Failures
// ============================================================================

#[rstest]
#[case("")]
#[case("   ")]
#[case("NOW")] // case sensitive
#[case("SETMAXW")] // case sensitive
#[case("foo")] // unknown named variable
#[case("now + foo")]
#[case("now foo +")]
#[case("now foo ")]
#[case("7 + + 8 ")]
#[case("now ** 2")] // unknown operator
#[case("now 5 2")] // middle token isn't an operator
#[case("-5")] // sign is a separate token
#[case("1e5")] // exponent without '.' isn't an integer
#[case("99999999999999999999")] // overflow
#[case("1__000")] // doubled digit separator
#[case("1_")] // trailing digit separator
#[case("_1")] // identifier, not a number
#[case("+")]
#[case("'5 mins + now ")] // Unterminated string literal
#[case("now + '5 mins")] // Unterminated string literal
#[case("now + '5 foos'")] // unknown duration unit
#[case("this")] // no origin key
fn test_unparseable(#[case] body: &str) {
    assert!(
        parse_variable_expression_body(body, None).is_err(),
        "Expected '{}' to fail",
        body
    );
}

#[test]
fn test_failure_kinds() {
    assert_eq!(
        parse_variable_expression_body("", None),
        Err(UnparseableExpressionError::EmptyBody)
    );
    assert_eq!(
        parse_variable_expression_body("NOW", None),
        Err(UnparseableExpressionError::UnknownVariable("NOW".to_string()))
    );
    assert_eq!(
        parse_variable_expression_body("now ** 2", None),
        Err(UnparseableExpressionError::UnknownOperator("**".to_string()))
    );
    assert_eq!(
        parse_variable_expression_body("now 5 2", None),
        Err(UnparseableExpressionError::ExpectedOperator("5".to_string()))
    );
    assert_eq!(
        parse_variable_expression_body("now foo", None),
        Err(UnparseableExpressionError::TokenCount("now foo".to_string()))
    );
    assert!(matches!(
        parse_variable_expression_body("now + '5 mins", None),
        Err(UnparseableExpressionError::Tokenize { .. })
    ));
}

// ============================================================================
// Self Reference
// ============================================================================

#[test]
fn test_this_resolves_to_origin_key() {
    assert_eq!(
        parse_variable_expression_body("this < rtgMaxVA", Some("setMaxVA")),
        Ok(expr(
            Operation::Lt,
            named(NamedVariable::SetMaxVa),
            named(NamedVariable::RtgMaxVa)
        ))
    );
}

#[rstest]
#[case(None)]
#[case(Some("this"))]
#[case(Some("someUndefinedNamedVariable"))]
fn test_this_without_valid_target(#[case] origin_key: Option<&str>) {
    assert!(parse_variable_expression_body("this < rtgMaxVA", origin_key).is_err());
}

#[test]
fn test_this_invalid_self_reference_kind() {
    assert_eq!(
        parse_variable_expression_body("this", Some("this")),
        Err(UnparseableExpressionError::InvalidSelfReference(Some("this".to_string())))
    );
    assert_eq!(
        parse_variable_expression_body("this", Some("opModExpLimW")),
        Err(UnparseableExpressionError::UnknownVariable("opModExpLimW".to_string()))
    );
}

// ============================================================================
// Extract + Parse
// ============================================================================

#[test]
fn test_full_value_scenario() {
    assert_eq!(
        parse_variable_expression("$(now - '5 minutes')", None),
        Ok(Some(expr(
            Operation::Subtract,
            named(NamedVariable::Now),
            constant(Constant::Duration(TimeDelta::minutes(5)))
        )))
    );
    assert_eq!(
        parse_variable_expression("$setMaxW", None),
        Ok(Some(Resolvable::NamedVariable(NamedVariable::SetMaxW)))
    );
    assert_eq!(parse_variable_expression("plain text", None), Ok(None));
}

#[test]
fn test_full_value_error_kinds_are_distinct() {
    let malformed = parse_variable_expression("text $(now)", None).unwrap_err();
    assert!(malformed.is_malformed());
    assert!(matches!(malformed, ExpressionError::Malformed(_)));

    let unparseable = parse_variable_expression("$(now + foo)", None).unwrap_err();
    assert!(unparseable.is_unparseable());
    assert!(matches!(unparseable, ExpressionError::Unparseable(_)));
}
