//!
//! jsonpacket: a string-keyed container of heterogeneous values that travels as a JSON
//! object and defers typing each entry until the receiver asks for one.
//!
//! ## Core Concepts
//!
//! * **Packets (`packet::Packet`)**: The container. Values are put in as native Rust values
//!   and the whole packet serializes to a single JSON object.
//! * **Slots (`slot::Slot`)**: What a key holds: either a materialized native value or a raw
//!   JSON fragment imported from text and not yet given a type.
//! * **Materialization**: The first typed read of a raw fragment converts it and caches the
//!   result in place, so later reads of the same type are downcasts.
//! * **Adapters (`adapter::Adapter`)**: The pluggable conversion step invoked for raw fragments.
//! * **Shapes (`shape::Shape`)**: Runtime target descriptors for shapes only known at runtime;
//!   static shapes are plain Rust types.
//! * **Storage (`storage::Storage`)**: The pluggable backing mapping (`HashMap`, `BTreeMap`,
//!   `IndexMap`), swappable with `Packet::transform_core`.
//! * **Casts (`cast`)**: Values that travel as a simpler type, e.g. [`Timestamp`] as epoch
//!   milliseconds, converted once on read.
//!
//! Typed reads are best-effort: absent keys and failed conversions come back as `None` or a
//! supplied default and the failure is logged through `tracing`. The `try_*` variants return
//! the [`PacketError`] instead.

pub mod adapter;
pub mod cast;
pub mod config;
pub mod constants;
pub mod errors;
pub mod json;
pub mod packet;
pub mod shape;
pub mod slot;
pub mod storage;

pub use adapter::{Adapter, JsonAdapter};
pub use cast::Timestamp;
pub use config::PacketConfig;
pub use errors::PacketError;
pub use packet::Packet;
pub use shape::{ScalarKind, Shape, ShapeMismatch};
pub use slot::{Native, Slot};
pub use storage::Storage;

/// Result type used throughout the jsonpacket library.
pub type Result<T> = std::result::Result<T, PacketError>;
