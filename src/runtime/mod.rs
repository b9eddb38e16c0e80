//! Runtime support
//!
//! This module contains the core object model the shim installs onto:
//! - Object representation (JSObject, class data)
//! - Property keys, attributes and the property table
//! - String handling (JSString, UTF-16 code units)
//! - Array storage (JSArray)
//! - Native function type

pub mod array;
pub mod function;
pub mod object;
pub mod property;
pub mod string;

pub use array::{JSArray, MAX_ARRAY_LENGTH};
pub use function::{NativeFn, NativeFunction, arg};
pub use object::{ClassId, JSObject, ObjectData, ObjectId};
pub use property::{Property, PropertyDescriptor, PropertyFlags, PropertyKey, PropertyTable};
pub use string::JSString;
