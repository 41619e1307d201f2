//! Parameter bags: variable expression substitution and rudimentary type checks.

use indexmap::IndexMap;
use serde_yaml::Value;
use tracing::debug;

use super::{DefinitionError, ParameterValue};
use crate::expression::{
    ExpressionError, parse_variable_expression_body, try_extract_variable_expression,
};

/// Parameters as they come out of the document.
pub type RawParameters = IndexMap<String, Value>;

/// Parameters after variable expressions have been parsed.
pub type Parameters = IndexMap<String, ParameterValue>;

/// Converts a raw parameter map, replacing every top level string that holds a variable
/// expression with its parsed form.
///
/// Each key is passed to the parser as the origin key so `$this` resolves to the named
/// variable the parameter is called. Lists and maps are never inspected.
pub fn resolve_parameters(raw: RawParameters) -> Result<Parameters, DefinitionError> {
    raw.into_iter()
        .map(|(key, value)| {
            let value = resolve_parameter(&key, ParameterValue::from_yaml(&key, value)?)?;
            Ok((key, value))
        })
        .collect()
}

fn resolve_parameter(key: &str, value: ParameterValue) -> Result<ParameterValue, DefinitionError> {
    let ParameterValue::String(text) = &value else {
        return Ok(value);
    };

    let wrap = |source: ExpressionError| DefinitionError::Parameter {
        key: key.to_string(),
        source,
    };

    let Some(body) = try_extract_variable_expression(text).map_err(|e| wrap(e.into()))? else {
        return Ok(value);
    };
    let parsed = parse_variable_expression_body(body, Some(key)).map_err(|e| wrap(e.into()))?;

    debug!(key, %parsed, "substituted variable expression");
    Ok(ParameterValue::Variable(parsed))
}

// ============================================================================
// Schema
// ============================================================================

/// The basic types a parameter can be declared as.
///
/// Checks are rudimentary, they catch obvious misconfigurations only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    String,
    Integer,
    /// Integer >= 0
    UnsignedInteger,
    Float,
    Boolean,
    /// String holding a timezone aware datetime
    DateTime,
    ListString,
    /// String of hex digits, optionally prefixed with `0x`
    HexBinary,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Integer => "Integer",
            Self::UnsignedInteger => "UnsignedInteger",
            Self::Float => "Float",
            Self::Boolean => "Boolean",
            Self::DateTime => "DateTime",
            Self::ListString => "ListString",
            Self::HexBinary => "HexBinary",
        }
    }
}

/// Describes a single optional/mandatory parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSchema {
    pub mandatory: bool,
    pub expected_type: ParameterType,
}

impl ParameterSchema {
    pub const fn new(mandatory: bool, expected_type: ParameterType) -> Self {
        Self {
            mandatory,
            expected_type,
        }
    }
}

/// Returns true if `value` passes as `expected_type`.
///
/// Null and variable expressions always pass; checking them is a runtime concern.
pub fn is_valid_parameter_type(expected_type: ParameterType, value: &ParameterValue) -> bool {
    match value {
        ParameterValue::Null | ParameterValue::Variable(_) => return true,
        _ => {}
    }

    match expected_type {
        ParameterType::String => matches!(value, ParameterValue::String(_)),
        ParameterType::Integer => as_integer(value).is_some(),
        ParameterType::UnsignedInteger => as_integer(value).is_some_and(|i| i >= 0.0),
        ParameterType::Float => {
            matches!(value, ParameterValue::Float(_) | ParameterValue::Integer(_))
        }
        ParameterType::Boolean => matches!(value, ParameterValue::Bool(_)),
        ParameterType::DateTime => value.as_datetime().is_some(),
        ParameterType::ListString => value
            .as_list()
            .is_some_and(|items| items.iter().all(|e| matches!(e, ParameterValue::String(_)))),
        ParameterType::HexBinary => value.as_str().is_some_and(is_hex_binary),
    }
}

/// Integers, and floats with no fractional part
fn as_integer(value: &ParameterValue) -> Option<f64> {
    match value {
        ParameterValue::Integer(i) => Some(*i as f64),
        ParameterValue::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f),
        _ => None,
    }
}

fn is_hex_binary(s: &str) -> bool {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Validates `parameters` against `schema` for the location labelled `location`
/// (eg `ALL-01.Step Action: set-poll-rate`).
///
/// # Errors
///
/// [`DefinitionError::Invalid`] for an unknown parameter, a value of the wrong type, or
/// a missing mandatory parameter.
pub fn validate_parameters(
    location: &str,
    parameters: &Parameters,
    schema: &[(&str, ParameterSchema)],
) -> Result<(), DefinitionError> {
    let lookup = |name: &str| schema.iter().find(|(n, _)| *n == name).map(|(_, s)| s);

    for (name, value) in parameters {
        let Some(param_schema) = lookup(name.as_str()) else {
            let valid: Vec<_> = schema.iter().map(|(n, _)| *n).collect();
            return Err(DefinitionError::invalid(
                location,
                format!("doesn't have a parameter {name}. Valid params are {valid:?}"),
            ));
        };

        if !is_valid_parameter_type(param_schema.expected_type, value) {
            return Err(DefinitionError::invalid(
                location,
                format!(
                    "has parameter {name} expecting {} but got {value:?}",
                    param_schema.expected_type.as_str()
                ),
            ));
        }
    }

    for (name, param_schema) in schema {
        if param_schema.mandatory && !parameters.contains_key(*name) {
            return Err(DefinitionError::invalid(
                location,
                format!("is missing mandatory parameter {name}"),
            ));
        }
    }

    Ok(())
}
