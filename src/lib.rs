//! # cactus-test-definitions
//!
//! Test procedure definitions for the CSIP-AUS conformance suite, and the variable
//! expression language embedded in their parameters.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! definition → Actions/checks/events, parameter schemas, YAML loading
//!   ↓
//! expression → Extractor, logos lexer, parser, AST, errors
//! ```

// ============================================================================
// MODULES (dependency order: expression → definition)
// ============================================================================

/// Variable expressions: `$name` and `$(lhs OP rhs)`
pub mod expression;

/// Document model: test procedures and their parameters
#[cfg(feature = "definitions")]
pub mod definition;

// Re-export commonly needed items
pub use expression::{
    Constant, Expression, ExpressionError, MalformedExpressionError, NamedVariable, Operand,
    Operation, Resolvable, UnparseableExpressionError, parse_variable_expression,
    parse_variable_expression_body, try_extract_variable_expression,
};

#[cfg(feature = "definitions")]
pub use definition::{DefinitionError, ParameterValue, TestProcedure};
