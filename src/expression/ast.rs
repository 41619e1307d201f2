//! Typed AST for parsed variable expressions.
//!
//! The grammar is one level deep: an [`Expression`] combines two [`Operand`]s, and an
//! operand is never itself an expression.

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;

use super::errors::UnparseableExpressionError;

// ============================================================================
// Constant
// ============================================================================

/// A literal value known at parse time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constant {
    Integer(i64),
    Float(f64),
    Duration(TimeDelta),
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Duration(v) => {
                let seconds = match v.num_microseconds() {
                    Some(us) => us as f64 / 1_000_000.0,
                    None => v.num_milliseconds() as f64 / 1_000.0,
                };
                write!(f, "'{seconds} seconds'")
            }
        }
    }
}

// ============================================================================
// NamedVariable
// ============================================================================

/// A value that can only be resolved while a test procedure is executing.
///
/// Names mirror the CSIP-AUS `DERSetting` / `DERCapability` fields of the EndDevice
/// under test. Resolving them is the executor's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedVariable {
    /// Timezone aware current datetime
    Now,

    // DERSetting of the EndDevice under test
    SetMaxW,
    SetMaxVa,
    SetMaxVar,
    SetMaxChargeRateW,
    SetMaxDischargeRateW,
    SetMaxWh,

    // DERCapability of the EndDevice under test (multiplier applied)
    RtgMaxVa,
    RtgMaxVar,
    RtgMaxW,
    RtgMaxChargeRateW,
    RtgMaxDischargeRateW,
    RtgMaxWh,

    // Storage extension
    SetMinWh,
    /// Negated `rtgMaxChargeRateW`
    NegRtgMaxChargeRateW,
}

/// Every named variable keyed by the (case sensitive) name used in test definitions.
pub const NAMED_VARIABLES: &[(&str, NamedVariable)] = &[
    ("now", NamedVariable::Now),
    ("setMaxW", NamedVariable::SetMaxW),
    ("setMaxVA", NamedVariable::SetMaxVa),
    ("setMaxVar", NamedVariable::SetMaxVar),
    ("setMaxChargeRateW", NamedVariable::SetMaxChargeRateW),
    ("setMaxDischargeRateW", NamedVariable::SetMaxDischargeRateW),
    ("setMaxWh", NamedVariable::SetMaxWh),
    ("rtgMaxVA", NamedVariable::RtgMaxVa),
    ("rtgMaxVar", NamedVariable::RtgMaxVar),
    ("rtgMaxW", NamedVariable::RtgMaxW),
    ("rtgMaxChargeRateW", NamedVariable::RtgMaxChargeRateW),
    ("rtgMaxDischargeRateW", NamedVariable::RtgMaxDischargeRateW),
    ("rtgMaxWh", NamedVariable::RtgMaxWh),
    ("setMinWh", NamedVariable::SetMinWh),
    ("negRtgMaxChargeRateW", NamedVariable::NegRtgMaxChargeRateW),
];

impl NamedVariable {
    /// The name this variable is referenced by in a test definition.
    pub fn name(self) -> &'static str {
        NAMED_VARIABLES
            .iter()
            .find(|(_, variable)| *variable == self)
            .map(|(name, _)| *name)
            .unwrap_or_default()
    }
}

impl FromStr for NamedVariable {
    type Err = UnparseableExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAMED_VARIABLES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, variable)| *variable)
            .ok_or_else(|| UnparseableExpressionError::UnknownVariable(s.to_string()))
    }
}

impl fmt::Display for NamedVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Operation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

/// Operator symbols accepted between two operands.
pub const OPERATIONS: &[(&str, Operation)] = &[
    ("+", Operation::Add),
    ("-", Operation::Subtract),
    ("*", Operation::Multiply),
    ("/", Operation::Divide),
    ("==", Operation::Eq),
    ("!=", Operation::Ne),
    ("<", Operation::Lt),
    ("<=", Operation::Lte),
    (">", Operation::Gt),
    (">=", Operation::Gte),
];

impl Operation {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        OPERATIONS
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, op)| *op)
    }

    pub fn symbol(self) -> &'static str {
        OPERATIONS
            .iter()
            .find(|(_, op)| *op == self)
            .map(|(s, _)| *s)
            .unwrap_or_default()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// Expression
// ============================================================================

/// One side of an [`Expression`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand {
    Constant(Constant),
    NamedVariable(NamedVariable),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(c) => c.fmt(f),
            Self::NamedVariable(v) => v.fmt(f),
        }
    }
}

/// `lhs OP rhs`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expression {
    pub operation: Operation,
    pub lhs: Operand,
    pub rhs: Operand,
}

impl Expression {
    pub fn new(operation: Operation, lhs: Operand, rhs: Operand) -> Self {
        Self { operation, lhs, rhs }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.operation, self.rhs)
    }
}

// ============================================================================
// Resolvable
// ============================================================================

/// A parsed variable expression. Stands in for a parameter value until the
/// executor resolves it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolvable {
    Constant(Constant),
    NamedVariable(NamedVariable),
    Expression(Expression),
}

impl From<Operand> for Resolvable {
    fn from(operand: Operand) -> Self {
        match operand {
            Operand::Constant(c) => Self::Constant(c),
            Operand::NamedVariable(v) => Self::NamedVariable(v),
        }
    }
}

impl From<Expression> for Resolvable {
    fn from(expression: Expression) -> Self {
        Self::Expression(expression)
    }
}

impl fmt::Display for Resolvable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(c) => write!(f, "$({c})"),
            Self::NamedVariable(v) => write!(f, "$({v})"),
            Self::Expression(e) => write!(f, "$({e})"),
        }
    }
}
