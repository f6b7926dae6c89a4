//! Casts for the scalar built-ins.
//!
//! Symbols are read as their text wherever strings are, so identifier-form
//! hash keys cast like textual ones.

use regex::Regex;

use crate::error::{CastError, Result};
use crate::value::Value;

pub(super) fn cast_string(raw: Value) -> Result<Value> {
    match raw {
        Value::String(_) => Ok(raw),
        Value::Symbol(text) => Ok(Value::String(text)),
        Value::Integer(value) => Ok(Value::String(value.to_string())),
        Value::Float(value) => Ok(Value::String(format!("{value:?}"))),
        Value::Bool(value) => Ok(Value::String(value.to_string())),
        Value::Time(time) => Ok(Value::String(time.to_rfc3339())),
        other => Err(CastError::invalid(&other, "String").into()),
    }
}

pub(super) fn cast_integer(raw: Value) -> Result<Value> {
    match &raw {
        Value::Integer(_) => Ok(raw),
        Value::Float(value) if value.is_finite() && value.fract() == 0.0 => {
            if *value >= i64::MIN as f64 && *value < i64::MAX as f64 {
                Ok(Value::Integer(*value as i64))
            } else {
                Err(CastError::invalid(&raw, "Integer").into())
            }
        }
        Value::String(text) | Value::Symbol(text) => text
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| CastError::invalid(&raw, "Integer").into()),
        _ => Err(CastError::invalid(&raw, "Integer").into()),
    }
}

pub(super) fn cast_float(raw: Value) -> Result<Value> {
    match &raw {
        Value::Float(_) => Ok(raw),
        Value::Integer(value) => Ok(Value::Float(*value as f64)),
        Value::String(text) | Value::Symbol(text) => text
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| CastError::invalid(&raw, "Float").into()),
        _ => Err(CastError::invalid(&raw, "Float").into()),
    }
}

pub(super) fn cast_boolean(raw: Value) -> Result<Value> {
    match &raw {
        Value::Bool(_) => Ok(raw),
        Value::String(text) | Value::Symbol(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(CastError::invalid(&raw, "Boolean").into()),
        },
        _ => Err(CastError::invalid(&raw, "Boolean").into()),
    }
}

pub(super) fn cast_symbol(raw: Value) -> Result<Value> {
    match raw {
        Value::Symbol(_) => Ok(raw),
        Value::String(text) => Ok(Value::Symbol(text)),
        other => Err(CastError::invalid(&other, "Symbol").into()),
    }
}

pub(super) fn cast_regexp(raw: Value) -> Result<Value> {
    match &raw {
        Value::Regexp(_) => Ok(raw),
        Value::String(pattern) => Regex::new(pattern)
            .map(Value::Regexp)
            .map_err(|_| CastError::invalid(&raw, "Regexp").into()),
        _ => Err(CastError::invalid(&raw, "Regexp").into()),
    }
}
