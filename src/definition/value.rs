//! Parameter values as read from a YAML document.

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde_yaml::Value;

use super::DefinitionError;
use crate::expression::Resolvable;

/// Space separated YAML timestamp form (`2001-12-14 21:59:43.10+05:00`)
const YAML_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

/// A loosely typed parameter value.
///
/// `Variable` replaces any string that held a variable expression. It is the only
/// variant produced by parsing rather than by the document itself. Strings are kept as
/// written, timestamps are only interpreted on request (see [`Self::as_datetime`]).
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<ParameterValue>),
    Map(IndexMap<String, ParameterValue>),
    Variable(Resolvable),
}

impl ParameterValue {
    /// Converts a YAML value. `key` only labels errors.
    pub fn from_yaml(key: &str, value: Value) -> Result<Self, DefinitionError> {
        Ok(match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => n
                    .as_f64()
                    .map(Self::Float)
                    .ok_or_else(|| DefinitionError::unsupported(key, format!("number {n}")))?,
            },
            Value::String(s) => Self::String(s),
            Value::Sequence(items) => Self::List(
                items
                    .into_iter()
                    .map(|item| Self::from_yaml(key, item))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Mapping(mapping) => {
                let mut map = IndexMap::with_capacity(mapping.len());
                for (k, v) in mapping {
                    let Value::String(k) = k else {
                        return Err(DefinitionError::unsupported(key, "mapping keys must be strings"));
                    };
                    let v = Self::from_yaml(&k, v)?;
                    map.insert(k, v);
                }
                Self::Map(map)
            }
            Value::Tagged(tagged) => {
                return Err(DefinitionError::unsupported(
                    key,
                    format!("tag {} is not supported", tagged.tag),
                ));
            }
        })
    }

    /// True if this value is a parsed variable expression awaiting resolution.
    pub fn is_resolvable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    pub fn as_variable(&self) -> Option<&Resolvable> {
        match self {
            Self::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Interprets a string as a timezone aware timestamp (RFC 3339 or the space separated
    /// YAML form). Naive timestamps return `None`.
    pub fn as_datetime(&self) -> Option<DateTime<FixedOffset>> {
        self.as_str().and_then(parse_timestamp)
    }

    pub fn as_list(&self) -> Option<&[ParameterValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<Resolvable> for ParameterValue {
    fn from(value: Resolvable) -> Self {
        Self::Variable(value)
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, YAML_TIMESTAMP_FORMAT))
        .ok()
}
