//! Processor outcomes
//!
//! The engine never inspects an [`Outcome`] except when coalescing tables or
//! exporting. Export goes through [`Outcome::to_primitive`], which flattens
//! timestamps and tables into plain JSON values.

use super::table::Table;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Value returned by a processor for one unit
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Outcome {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    List(Vec<Outcome>),
    Map(BTreeMap<String, Outcome>),
    Table(Table),
}

impl Outcome {
    /// Recursively convert into primitive JSON values
    pub fn to_primitive(&self) -> Value {
        match self {
            Outcome::Null => Value::Null,
            Outcome::Bool(b) => Value::Bool(*b),
            Outcome::Int(i) => Value::from(*i),
            Outcome::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Outcome::Text(s) => Value::String(s.clone()),
            Outcome::Timestamp(ts) => Value::String(ts.to_rfc3339()),
            Outcome::List(items) => Value::Array(items.iter().map(Outcome::to_primitive).collect()),
            Outcome::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_primitive()))
                    .collect(),
            ),
            Outcome::Table(table) => table.to_records(),
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Outcome::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Outcome::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Short shape name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Null => "null",
            Outcome::Bool(_) => "bool",
            Outcome::Int(_) => "int",
            Outcome::Float(_) => "float",
            Outcome::Text(_) => "text",
            Outcome::Timestamp(_) => "timestamp",
            Outcome::List(_) => "list",
            Outcome::Map(_) => "map",
            Outcome::Table(_) => "table",
        }
    }

    /// Build a map outcome from key/value pairs
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Outcome>,
        I: IntoIterator<Item = (K, V)>,
    {
        Outcome::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_primitive().serialize(serializer)
    }
}

impl From<Value> for Outcome {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Outcome::Null,
            Value::Bool(b) => Outcome::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Outcome::Int(i),
                None => Outcome::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Outcome::Text(s),
            Value::Array(items) => Outcome::List(items.into_iter().map(Outcome::from).collect()),
            Value::Object(map) => {
                Outcome::Map(map.into_iter().map(|(k, v)| (k, Outcome::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Outcome {
    fn from(value: bool) -> Self {
        Outcome::Bool(value)
    }
}

impl From<i64> for Outcome {
    fn from(value: i64) -> Self {
        Outcome::Int(value)
    }
}

impl From<i32> for Outcome {
    fn from(value: i32) -> Self {
        Outcome::Int(i64::from(value))
    }
}

impl From<usize> for Outcome {
    fn from(value: usize) -> Self {
        i64::try_from(value)
            .map(Outcome::Int)
            .unwrap_or(Outcome::Float(value as f64))
    }
}

impl From<f64> for Outcome {
    fn from(value: f64) -> Self {
        Outcome::Float(value)
    }
}

impl From<String> for Outcome {
    fn from(value: String) -> Self {
        Outcome::Text(value)
    }
}

impl From<&str> for Outcome {
    fn from(value: &str) -> Self {
        Outcome::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for Outcome {
    fn from(value: DateTime<Utc>) -> Self {
        Outcome::Timestamp(value)
    }
}

impl From<Table> for Outcome {
    fn from(value: Table) -> Self {
        Outcome::Table(value)
    }
}

impl<T: Into<Outcome>> From<Vec<T>> for Outcome {
    fn from(value: Vec<T>) -> Self {
        Outcome::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Outcome>> From<Option<T>> for Outcome {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Outcome::Null)
    }
}
