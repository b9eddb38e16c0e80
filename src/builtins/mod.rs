//! Built-in objects and shim payloads
//!
//! `intrinsics` builds the host objects every context starts with. The
//! other modules hold the payloads the shim installs, one module per
//! Extension Target, each registering its functions with a
//! [`CapabilityRegistry`].

pub mod array;
pub(crate) mod intrinsics;
pub mod math;
pub mod number;
pub mod object;
pub mod regexp;
pub mod string;

use crate::registry::CapabilityRegistry;

/// Register every payload
pub(crate) fn register_all(registry: &mut CapabilityRegistry) {
    number::register(registry);
    object::register(registry);
    array::register(registry);
    regexp::register(registry);
    string::register(registry);
    math::register(registry);
}
