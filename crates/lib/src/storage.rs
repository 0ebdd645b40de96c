//! Pluggable backing storage for packets.
//!
//! The packet itself has no opinion about ordering or capacity; it delegates every
//! mapping operation to a [`Storage`]. Three implementations ship with the crate:
//!
//! - `HashMap<String, Slot>` - the default, unordered
//! - `BTreeMap<String, Slot>` - keys iterate in sorted order
//! - `IndexMap<String, Slot>` - keys iterate in insertion order, so an imported document
//!   re-serializes with its original key order

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;

use crate::{Result, errors::PacketError, slot::Slot};

/// Key to slot mapping backing a [`Packet`](crate::Packet).
pub trait Storage: Default {
    /// Human-readable name of the implementation, used in logs and errors.
    const KIND: &'static str;

    fn get(&self, key: &str) -> Option<&Slot>;

    fn get_mut(&mut self, key: &str) -> Option<&mut Slot>;

    /// Insert a slot, returning whatever slot was there before.
    fn insert(&mut self, key: String, slot: Slot) -> Option<Slot>;

    fn remove(&mut self, key: &str) -> Option<Slot>;

    fn len(&self) -> usize;

    fn clear(&mut self);

    fn keys(&self) -> Box<dyn Iterator<Item = &String> + '_>;

    fn iter(&self) -> Box<dyn Iterator<Item = (&String, &Slot)> + '_>;

    /// Consume the store, yielding entries in its iteration order.
    fn into_entries(self) -> Vec<(String, Slot)>;

    /// Reserve room for `additional` more entries.
    ///
    /// Stores without a notion of capacity accept any request.
    fn try_reserve(&mut self, _additional: usize) -> Result<()> {
        Ok(())
    }

    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for HashMap<String, Slot> {
    const KIND: &'static str = "HashMap";

    fn get(&self, key: &str) -> Option<&Slot> {
        HashMap::get(self, key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Slot> {
        HashMap::get_mut(self, key)
    }

    fn insert(&mut self, key: String, slot: Slot) -> Option<Slot> {
        HashMap::insert(self, key, slot)
    }

    fn remove(&mut self, key: &str) -> Option<Slot> {
        HashMap::remove(self, key)
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn clear(&mut self) {
        HashMap::clear(self)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &String> + '_> {
        Box::new(HashMap::keys(self))
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&String, &Slot)> + '_> {
        Box::new(HashMap::iter(self))
    }

    fn into_entries(self) -> Vec<(String, Slot)> {
        self.into_iter().collect()
    }

    fn try_reserve(&mut self, additional: usize) -> Result<()> {
        HashMap::try_reserve(self, additional).map_err(|e| PacketError::Construction {
            store: Self::KIND,
            reason: e.to_string(),
        })
    }
}

impl Storage for BTreeMap<String, Slot> {
    const KIND: &'static str = "BTreeMap";

    fn get(&self, key: &str) -> Option<&Slot> {
        BTreeMap::get(self, key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Slot> {
        BTreeMap::get_mut(self, key)
    }

    fn insert(&mut self, key: String, slot: Slot) -> Option<Slot> {
        BTreeMap::insert(self, key, slot)
    }

    fn remove(&mut self, key: &str) -> Option<Slot> {
        BTreeMap::remove(self, key)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn clear(&mut self) {
        BTreeMap::clear(self)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &String> + '_> {
        Box::new(BTreeMap::keys(self))
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&String, &Slot)> + '_> {
        Box::new(BTreeMap::iter(self))
    }

    fn into_entries(self) -> Vec<(String, Slot)> {
        self.into_iter().collect()
    }
}

impl Storage for IndexMap<String, Slot> {
    const KIND: &'static str = "IndexMap";

    fn get(&self, key: &str) -> Option<&Slot> {
        IndexMap::get(self, key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Slot> {
        IndexMap::get_mut(self, key)
    }

    fn insert(&mut self, key: String, slot: Slot) -> Option<Slot> {
        IndexMap::insert(self, key, slot)
    }

    // shift_remove keeps the remaining keys in insertion order
    fn remove(&mut self, key: &str) -> Option<Slot> {
        IndexMap::shift_remove(self, key)
    }

    fn len(&self) -> usize {
        IndexMap::len(self)
    }

    fn clear(&mut self) {
        IndexMap::clear(self)
    }

    fn keys(&self) -> Box<dyn Iterator<Item = &String> + '_> {
        Box::new(IndexMap::keys(self))
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&String, &Slot)> + '_> {
        Box::new(IndexMap::iter(self))
    }

    fn into_entries(self) -> Vec<(String, Slot)> {
        self.into_iter().collect()
    }

    fn try_reserve(&mut self, additional: usize) -> Result<()> {
        IndexMap::try_reserve(self, additional).map_err(|e| PacketError::Construction {
            store: Self::KIND,
            reason: e.to_string(),
        })
    }
}
