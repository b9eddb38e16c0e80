//! JavaScript string representation
//!
//! Strings are immutable sequences of UTF-16 code units, shared by
//! reference count. `length`, indexing and surrogate handling all follow
//! the code-unit view, so lone surrogates survive round trips.

use std::fmt;
use std::rc::Rc;

use crate::error::{JsError, JsResult};
use crate::util::unicode::{is_lead_surrogate, is_trail_surrogate};

/// JavaScript string
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JSString(Rc<[u16]>);

impl JSString {
    /// Maximum string length in code units
    pub const MAX_LEN: usize = (1 << 30) - 1;

    /// The empty string
    pub fn empty() -> Self {
        JSString(Rc::from(Vec::new()))
    }

    /// Build a string from raw code units
    ///
    /// Fails with a RangeError when the result would exceed [`Self::MAX_LEN`].
    pub fn from_code_units(units: Vec<u16>) -> JsResult<Self> {
        if units.len() > Self::MAX_LEN {
            return Err(JsError::range_error("Invalid string length"));
        }
        Ok(JSString(Rc::from(units)))
    }

    /// Single code unit string
    pub fn from_code_unit(unit: u16) -> Self {
        JSString(Rc::from(vec![unit]))
    }

    /// Length in UTF-16 code units
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn code_units(&self) -> &[u16] {
        &self.0
    }

    /// Code unit at `index`, if in range
    #[inline]
    pub fn code_unit_at(&self, index: usize) -> Option<u16> {
        self.0.get(index).copied()
    }

    /// Code units in `[start, end)`, clamped to the string bounds
    pub fn substring(&self, start: usize, end: usize) -> JSString {
        let end = end.min(self.len());
        let start = start.min(end);
        JSString(Rc::from(&self.0[start..end]))
    }

    /// Concatenate two strings
    pub fn concat(&self, other: &JSString) -> JsResult<JSString> {
        if other.is_empty() {
            return Ok(self.clone());
        }
        if self.is_empty() {
            return Ok(other.clone());
        }
        let mut units = Vec::with_capacity(self.len() + other.len());
        units.extend_from_slice(&self.0);
        units.extend_from_slice(&other.0);
        JSString::from_code_units(units)
    }

    /// Check whether the string is well-formed UTF-16 (no lone surrogates)
    pub fn is_well_formed(&self) -> bool {
        let units = &self.0;
        let mut i = 0;
        while i < units.len() {
            let cu = units[i];
            if is_lead_surrogate(cu) {
                match units.get(i + 1) {
                    Some(&next) if is_trail_surrogate(next) => i += 2,
                    _ => return false,
                }
            } else if is_trail_surrogate(cu) {
                return false;
            } else {
                i += 1;
            }
        }
        true
    }

    /// Convert to a Rust string, replacing lone surrogates with U+FFFD
    pub fn to_rust_string(&self) -> String {
        String::from_utf16_lossy(&self.0)
    }

    /// Parse the string as a canonical array index
    pub fn as_array_index(&self) -> Option<u32> {
        is_array_index(&self.0)
    }

    /// Compare against a Rust string slice without allocating
    pub fn eq_str(&self, s: &str) -> bool {
        self.0.iter().copied().eq(s.encode_utf16())
    }
}

impl Default for JSString {
    fn default() -> Self {
        JSString::empty()
    }
}

impl From<&str> for JSString {
    fn from(s: &str) -> Self {
        JSString(s.encode_utf16().collect::<Vec<_>>().into())
    }
}

impl From<String> for JSString {
    fn from(s: String) -> Self {
        JSString::from(s.as_str())
    }
}

impl fmt::Display for JSString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in char::decode_utf16(self.0.iter().copied()) {
            write!(f, "{}", c.unwrap_or(char::REPLACEMENT_CHARACTER))?;
        }
        Ok(())
    }
}

impl fmt::Debug for JSString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.to_rust_string())
    }
}

/// Check if a code unit sequence is a canonical array index
///
/// Array indices are the canonical decimal strings of `0..2^32 - 1`.
pub fn is_array_index(units: &[u16]) -> Option<u32> {
    if units.is_empty() || units.len() > 10 {
        return None;
    }

    // Leading zeros are not valid (except "0")
    if units.len() > 1 && units[0] == b'0' as u16 {
        return None;
    }

    let mut n: u64 = 0;
    for &cu in units {
        if !(b'0' as u16..=b'9' as u16).contains(&cu) {
            return None;
        }
        n = n * 10 + (cu - b'0' as u16) as u64;
    }

    if n < u32::MAX as u64 { Some(n as u32) } else { None }
}
