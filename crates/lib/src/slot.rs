//! Slot values stored in a packet.
//!
//! A slot is either a materialized native value of some Rust type, or a raw JSON
//! fragment that has been parsed but not yet given a type. Raw fragments turn into
//! native values the first time a typed getter asks for them.

use std::any::{Any, type_name};
use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A type-erased, materialized value held by a packet.
///
/// Implemented for every `Serialize + Debug + Send + Sync + 'static` type, so callers never
/// implement it by hand. The JSON form is used for whole-document rendering and for
/// re-reading a value as a different type; `Debug` is the permissive fallback when
/// serialization fails.
pub trait Native: Any + fmt::Debug + Send + Sync {
    /// Render this value as a JSON tree.
    fn to_json(&self) -> serde_json::Result<Value>;

    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Name of the concrete Rust type, for logs and error messages.
    fn type_name(&self) -> &'static str;
}

impl<T> Native for T
where
    T: Serialize + fmt::Debug + Send + Sync + 'static,
{
    fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// A single key's stored value.
pub enum Slot {
    /// Materialized value of a concrete type
    Native(Box<dyn Native>),
    /// Parsed JSON fragment awaiting a typed read
    Raw(Value),
}

impl Slot {
    /// Wrap a native value.
    pub fn native<T: Native>(value: T) -> Self {
        Slot::Native(Box::new(value))
    }

    /// Convert an imported top-level JSON value into a slot.
    ///
    /// Objects and arrays stay raw until a caller names their type. Scalars are imported as
    /// their natural Rust type: `bool`, `String`, `i64` (or `u64` above `i64::MAX`), `f64`,
    /// and `()` for null.
    pub fn import(value: Value) -> Self {
        match value {
            Value::Null => Slot::native(()),
            Value::Bool(b) => Slot::native(b),
            Value::String(s) => Slot::native(s),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Slot::native(i)
                } else if let Some(u) = n.as_u64() {
                    Slot::native(u)
                } else {
                    // serde_json numbers are always one of the three
                    Slot::native(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            fragment @ (Value::Array(_) | Value::Object(_)) => Slot::Raw(fragment),
        }
    }

    /// Returns true if this slot still holds an unmaterialized fragment
    pub fn is_raw(&self) -> bool {
        matches!(self, Slot::Raw(_))
    }

    /// Returns true if this slot holds a materialized value
    pub fn is_native(&self) -> bool {
        matches!(self, Slot::Native(_))
    }

    /// Returns true if the slot holds exactly a `T`
    pub fn holds<T: Native>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    /// Borrow the native value as `T`, if that is what the slot holds.
    pub fn downcast_ref<T: Native>(&self) -> Option<&T> {
        match self {
            Slot::Native(native) => (**native).as_any().downcast_ref::<T>(),
            Slot::Raw(_) => None,
        }
    }

    /// Borrow the raw fragment, if the slot was never materialized.
    pub fn as_raw(&self) -> Option<&Value> {
        match self {
            Slot::Raw(fragment) => Some(fragment),
            Slot::Native(_) => None,
        }
    }

    /// Short description of what the slot holds
    pub fn type_name(&self) -> &'static str {
        match self {
            Slot::Native(native) => (**native).type_name(),
            Slot::Raw(Value::Array(_)) => "raw array",
            Slot::Raw(Value::Object(_)) => "raw object",
            Slot::Raw(_) => "raw scalar",
        }
    }

    /// Render the slot as JSON.
    ///
    /// Raw fragments are cloned as-is; native values go through their `Serialize` impl.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        match self {
            Slot::Native(native) => (**native).to_json(),
            Slot::Raw(fragment) => Ok(fragment.clone()),
        }
    }

    /// Render the slot as JSON, falling back to the value's `Debug` text as a JSON string.
    pub(crate) fn to_json_permissive(&self, key: &str) -> Value {
        match self.to_json() {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(
                    key,
                    type_name = self.type_name(),
                    error = %err,
                    "Structured serialization failed, rendering Debug text"
                );
                Value::String(format!("{self:?}"))
            }
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Native(native) => write!(f, "{native:?}"),
            Slot::Raw(fragment) => write!(f, "Raw({fragment})"),
        }
    }
}
