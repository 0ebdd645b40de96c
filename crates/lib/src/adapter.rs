//! Deserialization adapters.
//!
//! A packet calls its adapter whenever a typed read hits a raw JSON fragment. The adapter
//! is stateless per call: it converts and reports, while caching the result is the
//! packet's job. Swapping the adapter is how callers customize conversion (or, in tests,
//! count how often conversion runs).

use std::any::type_name;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Result, errors::PacketError, shape::Shape};

/// Converts raw JSON fragments into typed values.
pub trait Adapter {
    /// Convert `fragment` (stored under `key`) into a `T`.
    fn materialize<T: DeserializeOwned>(&self, key: &str, fragment: &Value) -> Result<T>;

    /// Validate `fragment` against a runtime shape and return its normalized form.
    fn conform(&self, key: &str, fragment: &Value, shape: &Shape) -> Result<Value>;
}

/// The default adapter, backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonAdapter;

impl Adapter for JsonAdapter {
    fn materialize<T: DeserializeOwned>(&self, key: &str, fragment: &Value) -> Result<T> {
        T::deserialize(fragment).map_err(|e| PacketError::from_json(key, type_name::<T>(), e))
    }

    fn conform(&self, key: &str, fragment: &Value, shape: &Shape) -> Result<Value> {
        shape
            .conform(fragment)
            .map_err(|mismatch| PacketError::from_mismatch(key, shape, mismatch))
    }
}
