//! Runtime shape descriptors.
//!
//! Static shapes are plain Rust types (`packet.get::<Vec<Item>>("items")`). A [`Shape`]
//! covers the case where the target shape is only known at runtime, e.g. a
//! list-of-map-of-int-to-record assembled from configuration. Conforming a fragment to a
//! shape validates it and normalizes it into a `serde_json::Value`.

use std::fmt;

use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::json::kind_of;

/// Scalar target kinds. Also used as the key kind of [`Shape::Map`], where JSON object
/// keys are parsed as the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
    Text,
}

impl ScalarKind {
    fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::Text => "text",
        }
    }

    fn accepts_key(self, key: &str) -> bool {
        match self {
            ScalarKind::Bool => key == "true" || key == "false",
            ScalarKind::Int => key.parse::<i64>().is_ok() || key.parse::<u64>().is_ok(),
            ScalarKind::Float => key.parse::<f64>().is_ok(),
            ScalarKind::Text => true,
        }
    }
}

/// A target shape for dynamic conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Any JSON value, taken as-is
    Any,
    /// A single scalar
    Scalar(ScalarKind),
    /// An array whose every element has the element shape
    List(Box<Shape>),
    /// An object whose keys parse as `key` and whose values have the value shape
    Map { key: ScalarKind, value: Box<Shape> },
    /// An object with exactly these named fields; missing `Optional` fields become null
    Record(Vec<(String, Shape)>),
    /// `null` or the inner shape
    Optional(Box<Shape>),
}

/// A fragment that does not fit a [`Shape`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("at {path}: expected {expected}, found {found}")]
pub struct ShapeMismatch {
    pub path: String,
    pub expected: String,
    pub found: String,
}

impl Shape {
    pub fn bool() -> Self {
        Shape::Scalar(ScalarKind::Bool)
    }

    pub fn int() -> Self {
        Shape::Scalar(ScalarKind::Int)
    }

    pub fn float() -> Self {
        Shape::Scalar(ScalarKind::Float)
    }

    pub fn text() -> Self {
        Shape::Scalar(ScalarKind::Text)
    }

    pub fn list(element: Shape) -> Self {
        Shape::List(Box::new(element))
    }

    pub fn map(key: ScalarKind, value: Shape) -> Self {
        Shape::Map {
            key,
            value: Box::new(value),
        }
    }

    pub fn record<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Shape)>,
        K: Into<String>,
    {
        Shape::Record(fields.into_iter().map(|(k, s)| (k.into(), s)).collect())
    }

    pub fn optional(inner: Shape) -> Self {
        Shape::Optional(Box::new(inner))
    }

    /// Validate `value` against this shape and return its normalized form.
    ///
    /// Normalization turns integers into floats where a float is expected and fills
    /// missing optional record fields with null; everything else is copied unchanged.
    pub fn conform(&self, value: &Value) -> Result<Value, ShapeMismatch> {
        self.conform_at(value, "$")
    }

    fn conform_at(&self, value: &Value, path: &str) -> Result<Value, ShapeMismatch> {
        let mismatch = || ShapeMismatch {
            path: path.to_string(),
            expected: self.to_string(),
            found: kind_of(value).to_string(),
        };

        match (self, value) {
            (Shape::Any, _) => Ok(value.clone()),
            (Shape::Optional(_), Value::Null) => Ok(Value::Null),
            (Shape::Optional(inner), _) => inner.conform_at(value, path),
            (Shape::Scalar(ScalarKind::Bool), Value::Bool(_))
            | (Shape::Scalar(ScalarKind::Text), Value::String(_)) => Ok(value.clone()),
            (Shape::Scalar(ScalarKind::Int), Value::Number(n)) if !n.is_f64() => {
                Ok(value.clone())
            }
            (Shape::Scalar(ScalarKind::Float), Value::Number(n)) => n
                .as_f64()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(mismatch),
            (Shape::List(element), Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| element.conform_at(item, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            (Shape::Map { key, value: inner }, Value::Object(entries)) => {
                let mut out = Map::with_capacity(entries.len());
                for (k, v) in entries {
                    if !key.accepts_key(k) {
                        return Err(ShapeMismatch {
                            path: format!("{path}.{k}"),
                            expected: format!("{} key", key.name()),
                            found: format!("key {k:?}"),
                        });
                    }
                    out.insert(k.clone(), inner.conform_at(v, &format!("{path}.{k}"))?);
                }
                Ok(Value::Object(out))
            }
            (Shape::Record(fields), Value::Object(entries)) => {
                if let Some(unknown) = entries
                    .keys()
                    .find(|k| !fields.iter().any(|(name, _)| name == *k))
                {
                    return Err(ShapeMismatch {
                        path: format!("{path}.{unknown}"),
                        expected: self.to_string(),
                        found: format!("unknown field {unknown:?}"),
                    });
                }
                let mut out = Map::with_capacity(fields.len());
                for (name, shape) in fields {
                    let field_path = format!("{path}.{name}");
                    let conformed = match (entries.get(name), shape) {
                        (Some(v), _) => shape.conform_at(v, &field_path)?,
                        (None, Shape::Optional(_)) => Value::Null,
                        (None, _) => {
                            return Err(ShapeMismatch {
                                path: field_path,
                                expected: shape.to_string(),
                                found: "missing field".to_string(),
                            });
                        }
                    };
                    out.insert(name.clone(), conformed);
                }
                Ok(Value::Object(out))
            }
            _ => Err(mismatch()),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Any => write!(f, "any"),
            Shape::Scalar(kind) => write!(f, "{}", kind.name()),
            Shape::List(element) => write!(f, "list<{element}>"),
            Shape::Map { key, value } => write!(f, "map<{}, {value}>", key.name()),
            Shape::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, shape)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {shape}")?;
                }
                write!(f, "}}")
            }
            Shape::Optional(inner) => write!(f, "{inner}?"),
        }
    }
}
