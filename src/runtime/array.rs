//! JavaScript Array storage
//!
//! Arrays use "no-hole" semantics: every index from 0 to length-1 holds a
//! value. Writing past the end fills the gap with `undefined`.

use crate::value::Value;

/// Maximum array length (2^30 - 1)
pub const MAX_ARRAY_LENGTH: u32 = (1 << 30) - 1;

/// Dense element storage of an Array object
#[derive(Debug, Clone, Default)]
pub struct JSArray {
    elements: Vec<Value>,
}

impl JSArray {
    /// Create a new empty array
    pub fn new() -> Self {
        JSArray { elements: Vec::new() }
    }

    /// Create an array with initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        JSArray {
            elements: Vec::with_capacity(capacity),
        }
    }

    /// Create an array from a vector of values
    ///
    /// Values beyond [`MAX_ARRAY_LENGTH`] are dropped.
    pub fn from_values(mut values: Vec<Value>) -> Self {
        values.truncate(MAX_ARRAY_LENGTH as usize);
        JSArray { elements: values }
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.elements.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get an element at the specified index
    #[inline]
    pub fn get(&self, index: u32) -> Option<&Value> {
        self.elements.get(index as usize)
    }

    /// Set an element at the specified index
    ///
    /// If index >= length, the array is extended with undefined values.
    /// Returns false when the index is beyond the maximum length.
    pub fn set(&mut self, index: u32, value: Value) -> bool {
        if index >= MAX_ARRAY_LENGTH {
            return false;
        }

        let idx = index as usize;
        if idx >= self.elements.len() {
            self.elements.resize(idx, Value::Undefined);
            self.elements.push(value);
        } else {
            self.elements[idx] = value;
        }
        true
    }

    /// Push a value onto the end of the array
    #[inline]
    pub fn push(&mut self, value: Value) -> bool {
        if self.len() >= MAX_ARRAY_LENGTH {
            return false;
        }
        self.elements.push(value);
        true
    }

    /// Pop a value from the end of the array
    #[inline]
    pub fn pop(&mut self) -> Option<Value> {
        self.elements.pop()
    }

    /// Change the length, truncating or padding with undefined
    pub fn set_length(&mut self, new_len: u32) -> bool {
        if new_len > MAX_ARRAY_LENGTH {
            return false;
        }
        self.elements.resize(new_len as usize, Value::Undefined);
        true
    }

    /// Iterate over the elements
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.elements.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.elements
    }
}
