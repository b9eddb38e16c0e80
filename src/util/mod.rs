//! Utility functions
//!
//! Number formatting/parsing and Unicode helpers used by the coercion layer
//! and the string payloads.

pub mod dtoa;
pub mod unicode;

/// Largest integer representable without loss in an f64 (2^53 - 1)
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// 2^32, the modulus of unsigned 32-bit coercion
pub const TWO_32: f64 = 4_294_967_296.0;
