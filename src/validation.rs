// Validation of concrete parameter values against a template's contract
//
// Values arrive as JSON. A single value is a string or number; permissive
// mode also admits booleans and null. A composite value is a list of single
// values or a map from string keys to single values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

use crate::domain::template::{Shape, UriParams};
use crate::error::ValueError;

/// Which primitive values count as legal single values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Strings and numbers only
    #[default]
    Strict,
    /// Strings, numbers, booleans and null
    Permissive,
}

impl Mode {
    pub fn is_single_value(self, value: &Value) -> bool {
        match value {
            Value::String(_) | Value::Number(_) => true,
            Value::Bool(_) | Value::Null => self == Mode::Permissive,
            Value::Array(_) | Value::Object(_) => false,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Strict => write!(f, "strict"),
            Mode::Permissive => write!(f, "permissive"),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// Validate one value against the shape required for parameter `name`
///
/// Returns Ok(()) if valid, Err(ValueError) describing the first problem otherwise
pub fn validate_value(
    name: &str,
    shape: Shape,
    value: &Value,
    mode: Mode,
) -> Result<(), ValueError> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(entries) => entries.values().collect(),
        single => {
            if !mode.is_single_value(single) {
                return Err(ValueError::InvalidSingleValue {
                    name: name.to_string(),
                    kind: kind_of(single),
                    mode,
                });
            }
            if !shape.accepts_single() {
                return Err(ValueError::ScalarNotAllowed {
                    name: name.to_string(),
                    kind: kind_of(single),
                });
            }
            return Ok(());
        }
    };

    if !shape.accepts_composite() {
        return Err(ValueError::CompositeNotAllowed {
            name: name.to_string(),
            kind: kind_of(value),
        });
    }

    // Composite values are flat: every item must itself be a single value
    match items.into_iter().find(|item| !mode.is_single_value(item)) {
        Some(item) => Err(ValueError::InvalidItem {
            name: name.to_string(),
            kind: kind_of(item),
            mode,
        }),
        None => Ok(()),
    }
}

fn check_param(
    params: &UriParams,
    name: &str,
    value: &Value,
    mode: Mode,
) -> Result<(), ValueError> {
    match params {
        UriParams::Open => Ok(()),
        UriParams::Typed(map) => match map.get(name) {
            Some(shape) => validate_value(name, shape, value, mode),
            None => Err(ValueError::UnknownParameter {
                name: name.to_string(),
            }),
        },
    }
}

/// Validate a full set of values against a contract
///
/// Every parameter is optional, so missing names are never an error.
/// Returns the first violation in parameter-name order.
pub fn validate_params(
    params: &UriParams,
    values: &Map<String, Value>,
    mode: Mode,
) -> Result<(), ValueError> {
    match collect_violations(params, values, mode).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Every violation in `values`, sorted by parameter name
pub fn collect_violations(
    params: &UriParams,
    values: &Map<String, Value>,
    mode: Mode,
) -> Vec<ValueError> {
    if params.is_open() {
        debug!("open contract, accepting {} values unchecked", values.len());
        return Vec::new();
    }

    let mut names: Vec<&String> = values.keys().collect();
    names.sort();

    names
        .into_iter()
        .filter_map(|name| check_param(params, name, &values[name.as_str()], mode).err())
        .collect()
}
