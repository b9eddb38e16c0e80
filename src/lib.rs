//! es7shim - conditional installation of draft standard-library functions
//!
//! Backfills a set of proposed JavaScript built-ins (`Number.compare`,
//! `Array.prototype.includes`, `String.prototype.lpad`, ...) onto a host's
//! built-in objects, defining each one only when the name is not already
//! present.
//!
//! # Features
//! - Minimal JavaScript object model: values, UTF-16 strings, property
//!   attributes, prototype chains, arrays and wrappers
//! - The ECMAScript coercions the payloads rely on (ToInteger, ToUint32,
//!   ToLength, ToObject, SameValue, ...)
//! - A define-if-absent installer with separate decide and apply steps
//! - A capability registry that can be queried, called into, or installed
//!   onto any number of independent contexts
//!
//! # Example
//! ```
//! use es7shim::{Context, PropertyKey, Value};
//!
//! let mut ctx = Context::with_shim().unwrap();
//! let padded = ctx
//!     .invoke(&Value::from("5"), "lpad", &[Value::from(3), Value::from("0")])
//!     .unwrap();
//! assert_eq!(padded, Value::from("005"));
//!
//! let math = ctx.intrinsics().math;
//! assert!(ctx.has_own_property(math, &PropertyKey::from("denormz")));
//! ```

// Core modules
pub mod value;
pub mod context;
pub mod error;
pub mod heap;

// Coercions
pub mod conv;

// Installer and registry
pub mod install;
pub mod registry;

// Built-in objects and payloads
pub mod builtins;

// Runtime support
pub mod runtime;

// Utilities
pub mod util;

// Re-export main types
pub use context::{Context, Intrinsics};
pub use error::{ErrorKind, JsError, JsResult};
pub use install::{CapabilityDescriptor, InstallDecision, Presence, define_internal, merge_if_absent};
pub use registry::{Capability, CapabilityKind, CapabilityRegistry, InstallReport, Target};
pub use runtime::{JSString, NativeFunction, ObjectId, PropertyDescriptor, PropertyFlags, PropertyKey};
pub use value::{Symbol, Type, Value};
