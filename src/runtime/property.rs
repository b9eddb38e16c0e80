//! Property keys, attributes and the property table
//!
//! Objects store named properties in a hash table with chained buckets.
//! Entries live in insertion order so own-key enumeration can follow
//! OrdinaryOwnPropertyKeys without sorting the string keys.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::runtime::string::JSString;
use crate::util::dtoa::number_to_string;
use crate::value::{Symbol, Value};

/// A property key: string or symbol
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum PropertyKey {
    String(JSString),
    Symbol(Symbol),
}

impl PropertyKey {
    /// Key for an integer index
    pub fn from_index(index: u32) -> Self {
        PropertyKey::String(JSString::from(index.to_string()))
    }

    /// Key for a numeric position (ToString of the number)
    pub fn from_number(n: f64) -> Self {
        if n >= 0.0 && n < u32::MAX as f64 && n.fract() == 0.0 {
            return PropertyKey::from_index(n as u32);
        }
        PropertyKey::String(JSString::from(number_to_string(n)))
    }

    /// Array index this key denotes, if any
    pub fn as_array_index(&self) -> Option<u32> {
        match self {
            PropertyKey::String(s) => s.as_array_index(),
            PropertyKey::Symbol(_) => None,
        }
    }

    #[inline]
    pub fn is_symbol(&self) -> bool {
        matches!(self, PropertyKey::Symbol(_))
    }

    /// Check if this is the string key `name`
    pub fn is_str(&self, name: &str) -> bool {
        match self {
            PropertyKey::String(s) => s.eq_str(name),
            PropertyKey::Symbol(_) => false,
        }
    }

    /// The key as a value (string or symbol)
    pub fn to_value(&self) -> Value {
        match self {
            PropertyKey::String(s) => Value::String(s.clone()),
            PropertyKey::Symbol(sym) => Value::Symbol(sym.clone()),
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        PropertyKey::String(JSString::from(s))
    }
}

impl From<JSString> for PropertyKey {
    fn from(s: JSString) -> Self {
        PropertyKey::String(s)
    }
}

impl From<Symbol> for PropertyKey {
    fn from(sym: Symbol) -> Self {
        PropertyKey::Symbol(sym)
    }
}

impl From<u32> for PropertyKey {
    fn from(index: u32) -> Self {
        PropertyKey::from_index(index)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::String(s) => write!(f, "{}", s),
            PropertyKey::Symbol(sym) => write!(f, "{}", sym),
        }
    }
}

/// Property attribute bits
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct PropertyFlags(u8);

impl PropertyFlags {
    const WRITABLE: u8 = 1 << 0;
    const ENUMERABLE: u8 = 1 << 1;
    const CONFIGURABLE: u8 = 1 << 2;

    /// Non-writable, non-enumerable, non-configurable
    pub const NONE: PropertyFlags = PropertyFlags(0);
    /// Attributes of a property created by assignment
    pub const DEFAULT: PropertyFlags =
        PropertyFlags(Self::WRITABLE | Self::ENUMERABLE | Self::CONFIGURABLE);
    /// Attributes of built-in methods: writable, configurable, hidden
    pub const BUILTIN: PropertyFlags = PropertyFlags(Self::WRITABLE | Self::CONFIGURABLE);

    pub const fn new(configurable: bool, enumerable: bool, writable: bool) -> Self {
        let mut bits = 0;
        if configurable {
            bits |= Self::CONFIGURABLE;
        }
        if enumerable {
            bits |= Self::ENUMERABLE;
        }
        if writable {
            bits |= Self::WRITABLE;
        }
        PropertyFlags(bits)
    }

    #[inline]
    pub const fn writable(self) -> bool {
        self.0 & Self::WRITABLE != 0
    }

    #[inline]
    pub const fn enumerable(self) -> bool {
        self.0 & Self::ENUMERABLE != 0
    }

    #[inline]
    pub const fn configurable(self) -> bool {
        self.0 & Self::CONFIGURABLE != 0
    }

    /// Same attributes with writability cleared
    #[inline]
    pub const fn without_writable(self) -> Self {
        PropertyFlags(self.0 & !Self::WRITABLE)
    }

    /// Same attributes with configurability cleared
    #[inline]
    pub const fn without_configurable(self) -> Self {
        PropertyFlags(self.0 & !Self::CONFIGURABLE)
    }
}

impl fmt::Debug for PropertyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyFlags")
            .field("configurable", &self.configurable())
            .field("enumerable", &self.enumerable())
            .field("writable", &self.writable())
            .finish()
    }
}

/// A complete data property descriptor
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyDescriptor {
    pub value: Value,
    pub flags: PropertyFlags,
}

impl PropertyDescriptor {
    pub fn new(value: Value, flags: PropertyFlags) -> Self {
        PropertyDescriptor { value, flags }
    }

    #[inline]
    pub fn writable(&self) -> bool {
        self.flags.writable()
    }

    #[inline]
    pub fn enumerable(&self) -> bool {
        self.flags.enumerable()
    }

    #[inline]
    pub fn configurable(&self) -> bool {
        self.flags.configurable()
    }
}

/// A property in an object's property table
#[derive(Clone, Debug)]
pub struct Property {
    pub key: PropertyKey,
    pub value: Value,
    pub flags: PropertyFlags,
    /// Next entry in the same bucket (index + 1, 0 = end of chain)
    hash_next: u32,
}

impl Property {
    pub fn new(key: PropertyKey, value: Value, flags: PropertyFlags) -> Self {
        Property {
            key,
            value,
            flags,
            hash_next: 0,
        }
    }

    /// Snapshot as a descriptor
    pub fn descriptor(&self) -> PropertyDescriptor {
        PropertyDescriptor::new(self.value.clone(), self.flags)
    }
}

/// Property table structure
///
/// - `slots`: properties in insertion order; deleted entries become `None`
/// - `hash_table`: bucket heads (index + 1 into `slots`, 0 = empty)
///
/// Deleted slots are compacted away on the next resize, which preserves the
/// relative order of the surviving entries.
#[derive(Debug, Clone)]
pub struct PropertyTable {
    /// Number of live properties
    prop_count: u32,
    /// Hash table mask (size - 1)
    hash_mask: u32,
    slots: Vec<Option<Property>>,
    hash_table: Vec<u32>,
}

impl PropertyTable {
    /// Minimum hash table size
    const MIN_HASH_SIZE: usize = 4;

    /// Maximum load factor before resize
    const MAX_LOAD_FACTOR: f64 = 0.75;

    /// Create a new empty property table
    pub fn new() -> Self {
        PropertyTable {
            prop_count: 0,
            hash_mask: (Self::MIN_HASH_SIZE - 1) as u32,
            slots: Vec::new(),
            hash_table: vec![0; Self::MIN_HASH_SIZE],
        }
    }

    /// Create a property table with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let hash_size = capacity.next_power_of_two().max(Self::MIN_HASH_SIZE);
        PropertyTable {
            prop_count: 0,
            hash_mask: (hash_size - 1) as u32,
            slots: Vec::with_capacity(capacity),
            hash_table: vec![0; hash_size],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.prop_count as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.prop_count == 0
    }

    #[inline]
    fn hash_key(key: &PropertyKey) -> u32 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let h = hasher.finish();
        (h ^ (h >> 32)) as u32
    }

    #[inline]
    fn live(&self, idx: usize) -> &Property {
        // Chains only ever link live slots
        self.slots[idx].as_ref().expect("hash chain points at a deleted slot")
    }

    /// Find a property by key, returning its slot index
    pub fn find(&self, key: &PropertyKey) -> Option<usize> {
        if self.prop_count == 0 {
            return None;
        }

        let hash = Self::hash_key(key);
        let mut idx = self.hash_table[(hash & self.hash_mask) as usize];

        while idx != 0 {
            let slot = (idx - 1) as usize;
            let prop = self.live(slot);
            if prop.key == *key {
                return Some(slot);
            }
            idx = prop.hash_next;
        }

        None
    }

    pub fn get(&self, key: &PropertyKey) -> Option<&Property> {
        self.find(key).and_then(|idx| self.slots[idx].as_ref())
    }

    pub fn get_mut(&mut self, key: &PropertyKey) -> Option<&mut Property> {
        self.find(key).and_then(move |idx| self.slots[idx].as_mut())
    }

    /// Insert or update a property
    ///
    /// Returns true if this was a new property, false if updated. Updates
    /// keep the entry's position.
    pub fn set(&mut self, key: PropertyKey, value: Value, flags: PropertyFlags) -> bool {
        if let Some(prop) = self.get_mut(&key) {
            prop.value = value;
            prop.flags = flags;
            return false;
        }

        let load = (self.slots.len() + 1) as f64 / (self.hash_mask + 1) as f64;
        if load > Self::MAX_LOAD_FACTOR {
            self.resize();
        }

        let hash = Self::hash_key(&key);
        let bucket = (hash & self.hash_mask) as usize;

        let mut prop = Property::new(key, value, flags);
        prop.hash_next = self.hash_table[bucket];

        self.slots.push(Some(prop));
        self.hash_table[bucket] = self.slots.len() as u32;
        self.prop_count += 1;

        true
    }

    /// Delete a property by key
    ///
    /// Returns true if the property existed.
    pub fn delete(&mut self, key: &PropertyKey) -> bool {
        if self.prop_count == 0 {
            return false;
        }

        let hash = Self::hash_key(key);
        let bucket = (hash & self.hash_mask) as usize;

        let mut prev: Option<usize> = None;
        let mut idx = self.hash_table[bucket];

        while idx != 0 {
            let slot = (idx - 1) as usize;
            let (matches, next) = {
                let prop = self.live(slot);
                (prop.key == *key, prop.hash_next)
            };

            if matches {
                match prev {
                    Some(p) => {
                        if let Some(prev_prop) = self.slots[p].as_mut() {
                            prev_prop.hash_next = next;
                        }
                    }
                    None => self.hash_table[bucket] = next,
                }
                self.slots[slot] = None;
                self.prop_count -= 1;
                return true;
            }

            prev = Some(slot);
            idx = next;
        }

        false
    }

    /// Grow the hash table, dropping deleted slots
    fn resize(&mut self) {
        let live = self.prop_count as usize + 1;
        let mut new_size = (self.hash_mask + 1) as usize;
        while live as f64 / new_size as f64 > Self::MAX_LOAD_FACTOR {
            new_size *= 2;
        }
        self.hash_mask = (new_size - 1) as u32;
        self.hash_table = vec![0; new_size];
        self.slots.retain(Option::is_some);

        for i in 0..self.slots.len() {
            let hash = Self::hash_key(&self.live(i).key);
            let bucket = (hash & self.hash_mask) as usize;
            let head = self.hash_table[bucket];
            if let Some(prop) = self.slots[i].as_mut() {
                prop.hash_next = head;
            }
            self.hash_table[bucket] = (i + 1) as u32;
        }
    }

    /// Iterate over live properties in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Iterate over mutable live properties in insertion order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Property> {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    /// Iterate over keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &PropertyKey> {
        self.iter().map(|p| &p.key)
    }

    pub fn has(&self, key: &PropertyKey) -> bool {
        self.find(key).is_some()
    }
}

impl Default for PropertyTable {
    fn default() -> Self {
        Self::new()
    }
}
