//! The typed container.
//!
//! A [`Packet`] maps string keys to [`Slot`]s. Values put in by the caller are stored as
//! native Rust values; values imported from JSON text stay as raw fragments until a typed
//! getter names the type they should become. The first successful typed read replaces the
//! fragment with the converted value, so later reads of the same type are plain downcasts.
//!
//! # Examples
//!
//! ```
//! use jsonpacket::Packet;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct Item {
//!     id: u32,
//!     name: String,
//! }
//!
//! let mut packet = Packet::new();
//! packet.put("item", Item { id: 1, name: "lamp".into() });
//! packet.put_int("count", 3);
//!
//! let mut received = Packet::from_string(&packet.serialize());
//! assert_eq!(received.get_int("count", 0), 3);
//! assert_eq!(
//!     received.get::<Item>("item"),
//!     Some(Item { id: 1, name: "lamp".into() })
//! );
//! ```

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    Result,
    adapter::{Adapter, JsonAdapter},
    cast::{Timestamp, epoch_millis_to_timestamp},
    config::PacketConfig,
    constants::{KEY_ERROR, KEY_MESSAGE},
    errors::PacketError,
    json,
    shape::Shape,
    slot::{Native, Slot},
    storage::Storage,
};


/// A string-keyed container of heterogeneous values with lazy typed access.
///
/// `S` is the backing store (see [`Storage`]) and `A` the adapter used to convert raw
/// fragments (see [`Adapter`]). Typed reads take `&mut self` because they may replace a
/// raw fragment with its materialized value.
///
/// The packet does no locking of its own. It is `Send + Sync` whenever its store and
/// adapter are, so shared use goes through the caller's `Mutex` or `RwLock`.
pub struct Packet<S: Storage = HashMap<String, Slot>, A: Adapter = JsonAdapter> {
    core: S,
    adapter: A,
    config: PacketConfig,
}

impl Packet {
    /// Creates an empty packet backed by a `HashMap`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a packet from JSON text.
    ///
    /// Never fails: malformed input is logged and yields an empty packet.
    pub fn from_string(text: &str) -> Self {
        Self::from_string_with(text, HashMap::new())
    }
}

impl<S: Storage> Packet<S> {
    /// Creates a packet over a caller-supplied store, keeping any entries it already has.
    pub fn with_core(core: S) -> Self {
        Self::with_adapter(core, JsonAdapter)
    }

    /// Builds a packet over `core` from JSON text. See [`Packet::from_string`].
    pub fn from_string_with(text: &str, core: S) -> Self {
        let mut packet = Self::with_core(core);
        packet.deserialize(text);
        packet
    }
}

impl<S: Storage, A: Adapter + Default> Default for Packet<S, A> {
    fn default() -> Self {
        Self::with_adapter(S::default(), A::default())
    }
}

impl<S: Storage, A: Adapter> Packet<S, A> {
    /// Creates a packet with an explicit store and adapter.
    pub fn with_adapter(core: S, adapter: A) -> Self {
        Self {
            core,
            adapter,
            config: PacketConfig::default(),
        }
    }

    /// Replaces the rendering configuration.
    pub fn with_config(mut self, config: PacketConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PacketConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PacketConfig {
        &mut self.config
    }

    /// The backing store.
    pub fn core(&self) -> &S {
        &self.core
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    // ===== Import / export =====

    /// Imports every top-level key of a JSON object, overwriting existing keys.
    ///
    /// Objects and arrays become raw fragments; scalars become native values (see
    /// [`Slot::import`]). Returns the number of keys imported. The whole text is parsed
    /// before anything is inserted, so on error the packet is unchanged.
    pub fn try_deserialize(&mut self, text: &str) -> Result<usize> {
        let document = json::parse(text)?;
        let found = json::kind_of(&document);
        let Value::Object(entries) = document else {
            return Err(PacketError::NotAnObject { found });
        };

        self.core.try_reserve(entries.len())?;
        let imported = entries.len();
        for (key, value) in entries {
            self.core.insert(key, Slot::import(value));
        }
        tracing::debug!(imported, store = S::KIND, "Imported JSON document");
        Ok(imported)
    }

    /// Best-effort [`try_deserialize`](Self::try_deserialize): failures are logged and
    /// leave the packet unchanged.
    pub fn deserialize(&mut self, text: &str) {
        if let Err(err) = self.try_deserialize(text) {
            tracing::error!(error = %err, "Failed to import JSON document; packet left unchanged");
        }
    }

    /// Renders the whole packet as a JSON object.
    ///
    /// Native values go through `Serialize`; a value whose serialization fails is logged
    /// and rendered as its `Debug` text instead, so this always produces valid JSON.
    pub fn to_json(&self) -> Value {
        let mut document = serde_json::Map::with_capacity(self.core.len());
        for (key, slot) in self.core.iter() {
            let rendered = slot.to_json_permissive(key);
            if self.config.omit_nulls && rendered.is_null() {
                continue;
            }
            document.insert(key.clone(), rendered);
        }
        Value::Object(document)
    }

    /// Renders the packet as JSON text according to its [`PacketConfig`].
    pub fn serialize(&self) -> String {
        json::render(&self.to_json(), self.config.pretty)
    }

    /// Renders the packet as indented JSON text regardless of configuration.
    pub fn to_pretty_string(&self) -> String {
        json::render(&self.to_json(), true)
    }

    // ===== Puts =====

    /// Stores a native value, returning the slot previously under `key`.
    ///
    /// The previous slot may still be a raw fragment.
    pub fn put<T: Native>(&mut self, key: impl Into<String>, value: T) -> Option<Slot> {
        self.core.insert(key.into(), Slot::native(value))
    }

    pub fn put_bool(&mut self, key: impl Into<String>, value: bool) -> Option<Slot> {
        self.put(key, value)
    }

    pub fn put_int(&mut self, key: impl Into<String>, value: i64) -> Option<Slot> {
        self.put(key, value)
    }

    pub fn put_double(&mut self, key: impl Into<String>, value: f64) -> Option<Slot> {
        self.put(key, value)
    }

    /// Stores a calendar value; it travels as epoch milliseconds.
    pub fn put_timestamp(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Timestamp>,
    ) -> Option<Slot> {
        self.put(key, value.into())
    }

    /// Stores a slot as-is.
    pub fn put_slot(&mut self, key: impl Into<String>, slot: Slot) -> Option<Slot> {
        self.core.insert(key.into(), slot)
    }

    /// Stores every slot from `entries`, overwriting existing keys.
    pub fn put_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, Slot)>,
    {
        for (key, slot) in entries {
            self.core.insert(key, slot);
        }
    }

    // ===== Typed gets =====

    /// Reads `key` as a `T`, reporting conversion failures.
    ///
    /// - Absent key: `Ok(None)`.
    /// - Raw fragment: converted by the adapter; on success the slot is replaced by the
    ///   converted value. On failure the fragment is kept.
    /// - Native `T`: cloned out.
    /// - Native value of another type: re-read through its JSON form. The slot is left
    ///   untouched, so the stored value is never replaced by a lossy conversion.
    pub fn try_get<T>(&mut self, key: &str) -> Result<Option<T>>
    where
        T: Native + DeserializeOwned + Clone,
    {
        let Some(slot) = self.core.get_mut(key) else {
            return Ok(None);
        };

        if let Slot::Raw(fragment) = slot {
            let value: T = self.adapter.materialize(key, fragment)?;
            tracing::debug!(key, target = type_name::<T>(), "Materialized raw fragment");
            *slot = Slot::native(value.clone());
            return Ok(Some(value));
        }

        if let Some(value) = slot.downcast_ref::<T>() {
            tracing::trace!(key, target = type_name::<T>(), "Cached value hit");
            return Ok(Some(value.clone()));
        }

        let json = slot.to_json().map_err(|e| PacketError::Render {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        tracing::debug!(
            key,
            stored = slot.type_name(),
            target = type_name::<T>(),
            "Re-reading native value as another type"
        );
        self.adapter.materialize(key, &json).map(Some)
    }

    /// Reads `key` as a `T`. Absent keys and failed conversions yield `None`; failures
    /// are logged.
    pub fn get<T>(&mut self, key: &str) -> Option<T>
    where
        T: Native + DeserializeOwned + Clone,
    {
        self.try_get(key).unwrap_or_else(|err| {
            tracing::warn!(key, target = type_name::<T>(), error = %err, "Typed read failed");
            None
        })
    }

    /// Like [`get`](Self::get), with a fallback for absent keys and failed conversions.
    pub fn get_or<T>(&mut self, key: &str, default: T) -> T
    where
        T: Native + DeserializeOwned + Clone,
    {
        self.get(key).unwrap_or(default)
    }

    /// Borrows `key` as a `T`, materializing a raw fragment in place first.
    ///
    /// Unlike [`get`](Self::get) this never converts a native value of another type; that
    /// case yields `None`.
    pub fn get_ref<T>(&mut self, key: &str) -> Option<&T>
    where
        T: Native + DeserializeOwned,
    {
        let slot = self.core.get_mut(key)?;
        if let Slot::Raw(fragment) = slot {
            match self.adapter.materialize::<T>(key, fragment) {
                Ok(value) => {
                    tracing::debug!(key, target = type_name::<T>(), "Materialized raw fragment");
                    *slot = Slot::native(value);
                }
                Err(err) => {
                    tracing::warn!(key, target = type_name::<T>(), error = %err, "Typed read failed");
                    return None;
                }
            }
        }
        slot.downcast_ref::<T>()
    }

    /// Reads `key` as a list of `T`.
    pub fn get_list<T>(&mut self, key: &str) -> Option<Vec<T>>
    where
        T: Native + Serialize + DeserializeOwned + Clone,
    {
        self.get::<Vec<T>>(key)
    }

    /// Reads `key` as a map. JSON object keys are parsed as `K`.
    pub fn get_map<K, V>(&mut self, key: &str) -> Option<HashMap<K, V>>
    where
        K: Native + Serialize + DeserializeOwned + Clone + Eq + Hash,
        V: Native + Serialize + DeserializeOwned + Clone,
    {
        self.get::<HashMap<K, V>>(key)
    }

    /// Reads `key` against a runtime [`Shape`], reporting conversion failures.
    ///
    /// A raw fragment is conformed by the adapter and memoized as a native
    /// `serde_json::Value`. A slot that already holds a `serde_json::Value` is conformed to
    /// `shape` directly, without the adapter; any other native value is conformed through
    /// its JSON form. Neither case touches the slot.
    pub fn try_get_shaped(&mut self, key: &str, shape: &Shape) -> Result<Option<Value>> {
        let Some(slot) = self.core.get_mut(key) else {
            return Ok(None);
        };

        if let Slot::Raw(fragment) = slot {
            let value = self.adapter.conform(key, fragment, shape)?;
            tracing::debug!(key, %shape, "Conformed raw fragment");
            *slot = Slot::native(value.clone());
            return Ok(Some(value));
        }

        if let Some(value) = slot.downcast_ref::<Value>() {
            // Cached under some earlier shape; check it again against this one
            return shape
                .conform(value)
                .map(Some)
                .map_err(|mismatch| PacketError::from_mismatch(key, shape, mismatch));
        }

        let json = slot.to_json().map_err(|e| PacketError::Render {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.adapter.conform(key, &json, shape).map(Some)
    }

    /// Best-effort [`try_get_shaped`](Self::try_get_shaped).
    pub fn get_shaped(&mut self, key: &str, shape: &Shape) -> Option<Value> {
        self.try_get_shaped(key, shape).unwrap_or_else(|err| {
            tracing::warn!(key, %shape, error = %err, "Shaped read failed");
            None
        })
    }

    pub fn get_bool(&mut self, key: &str, default: bool) -> bool {
        self.get_or(key, default)
    }

    pub fn get_int(&mut self, key: &str, default: i64) -> i64 {
        self.get_or(key, default)
    }

    pub fn get_double(&mut self, key: &str, default: f64) -> f64 {
        self.get_or(key, default)
    }

    /// `None` if absent or not text.
    pub fn get_string(&mut self, key: &str) -> Option<String> {
        self.get(key)
    }

    pub fn get_string_or(&mut self, key: &str, default: impl Into<String>) -> String {
        self.get_string(key).unwrap_or_else(|| default.into())
    }

    /// Reads `key` as a `T` that travels as an `F`.
    ///
    /// If the slot already holds a `T` it is returned as-is. Otherwise the value is read as
    /// an `F`, passed through `cast`, and the resulting `T` replaces the slot so the cast
    /// runs at most once. `None` if the key is absent, the read fails, or `cast` declines.
    pub fn get_cast<F, T>(&mut self, key: &str, cast: impl FnOnce(F) -> Option<T>) -> Option<T>
    where
        F: Native + DeserializeOwned + Clone,
        T: Native + Clone,
    {
        if let Some(value) = self.core.get(key)?.downcast_ref::<T>() {
            return Some(value.clone());
        }

        let from = self.get::<F>(key)?;
        let to = cast(from)?;
        tracing::debug!(
            key,
            from = type_name::<F>(),
            to = type_name::<T>(),
            "Cast value in place"
        );
        self.core.insert(key.to_string(), Slot::native(to.clone()));
        Some(to)
    }

    /// Reads a calendar value transmitted as epoch milliseconds.
    pub fn get_timestamp(&mut self, key: &str) -> Option<Timestamp> {
        self.get_cast::<i64, Timestamp>(key, epoch_millis_to_timestamp)
    }

    // ===== Conventional keys =====

    /// Whether the payload flags an application-level error. `false` when absent.
    pub fn is_error(&mut self) -> bool {
        self.get_bool(KEY_ERROR, false)
    }

    pub fn set_error(&mut self, error: bool) {
        self.put_bool(KEY_ERROR, error);
    }

    pub fn message(&mut self) -> Option<String> {
        self.get_string(KEY_MESSAGE)
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.put(KEY_MESSAGE, message.into());
    }

    // ===== Untyped access =====

    /// Untyped access to a materialized value.
    ///
    /// Returns [`PacketError::Unmaterialized`] if the slot is still a raw fragment: a
    /// caller that does not know the type cannot be handed an opaque JSON node. Prefer the
    /// typed getters.
    pub fn raw_entry(&self, key: &str) -> Result<Option<&dyn Native>> {
        match self.core.get(key) {
            None => Ok(None),
            Some(Slot::Native(native)) => Ok(Some(&**native)),
            Some(Slot::Raw(_)) => Err(PacketError::Unmaterialized {
                key: key.to_string(),
            }),
        }
    }

    /// Iterates over slots in store order, raw fragments included.
    pub fn slots(&self) -> impl Iterator<Item = (&String, &Slot)> + '_ {
        self.core.iter()
    }

    /// Consumes the packet, yielding its slots in store order.
    pub fn into_slots(self) -> Vec<(String, Slot)> {
        self.core.into_entries()
    }

    // ===== Mapping delegates =====

    pub fn len(&self) -> usize {
        self.core.len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.core.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> + '_ {
        self.core.keys()
    }

    pub fn remove(&mut self, key: &str) -> Option<Slot> {
        self.core.remove(key)
    }

    pub fn clear(&mut self) {
        self.core.clear()
    }

    // ===== Backing store =====

    /// Whether the packet is already backed by `S2`.
    pub fn is_core<S2>(&self) -> bool
    where
        S: 'static,
        S2: Storage + 'static,
    {
        TypeId::of::<S>() == TypeId::of::<S2>()
    }

    /// Moves every entry into a freshly built `S2` store.
    ///
    /// Entries are inserted in the current store's iteration order. If the new store
    /// cannot reserve room for them the failure is logged and the untouched packet is
    /// handed back as `Err`.
    pub fn transform_core<S2: Storage>(self) -> std::result::Result<Packet<S2, A>, Self> {
        let mut core = S2::default();
        if let Err(err) = core.try_reserve(self.core.len()) {
            tracing::error!(from = S::KIND, to = S2::KIND, error = %err, "Backing store swap failed");
            return Err(self);
        }

        let entries = self.core.into_entries();
        let moved = entries.len();
        for (key, slot) in entries {
            core.insert(key, slot);
        }
        tracing::debug!(from = S::KIND, to = S2::KIND, moved, "Swapped backing store");

        Ok(Packet {
            core,
            adapter: self.adapter,
            config: self.config,
        })
    }
}

impl<S: Storage, A: Adapter> fmt::Display for Packet<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl<S: Storage, A: Adapter> fmt::Debug for Packet<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("store", &S::KIND)
            .field("config", &self.config)
            .field("slots", &DebugSlots(&self.core))
            .finish()
    }
}

struct DebugSlots<'a, S: Storage>(&'a S);

impl<S: Storage> fmt::Debug for DebugSlots<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}
