//! Native function type
//!
//! Every callable in this crate is a Rust function with a declared name and
//! arity. Function objects expose both as the non-writable `name` and
//! `length` properties.

use std::fmt;

use crate::context::Context;
use crate::error::JsResult;
use crate::value::Value;

/// Native function signature
///
/// Native functions take the context, the `this` value, and arguments.
pub type NativeFn = fn(ctx: &mut Context, this: Value, args: &[Value]) -> JsResult<Value>;

/// A native function with its declared name and arity
#[derive(Clone, Copy)]
pub struct NativeFunction {
    /// Declared name (the `name` property)
    pub name: &'static str,
    /// Declared parameter count (the `length` property)
    pub length: u32,
    pub func: NativeFn,
}

impl NativeFunction {
    pub const fn new(name: &'static str, length: u32, func: NativeFn) -> Self {
        NativeFunction { name, length, func }
    }

    /// Invoke the function
    #[inline]
    pub fn call(&self, ctx: &mut Context, this: Value, args: &[Value]) -> JsResult<Value> {
        (self.func)(ctx, this, args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFunction({}/{})", self.name, self.length)
    }
}

/// Argument at `index`, or undefined when absent
#[inline]
pub fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}
