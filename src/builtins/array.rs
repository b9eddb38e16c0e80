//! Array.prototype extensions
//!
//! Both functions are generic: they work on any array-like receiver
//! through `length` and index properties, not only on Array objects.

use crate::context::Context;
use crate::conv::{same_value_zero, to_boolean, to_length, to_number, to_object, to_uint32};
use crate::error::{JsError, JsResult};
use crate::registry::{CapabilityRegistry, Target};
use crate::runtime::{NativeFunction, PropertyKey, arg};
use crate::util::TWO_32;
use crate::value::Value;

pub(crate) fn register(registry: &mut CapabilityRegistry) {
    let target = Target::ArrayPrototype;
    registry.register_function(target, "pushAll", NativeFunction::new("pushAll", 1, push_all));
    registry.register_function(target, "includes", NativeFunction::new("includes", 1, includes));
}

/// Array.prototype.pushAll(other, start, end)
///
/// Appends `other[start..end)` to the receiver and updates its `length`.
fn push_all(ctx: &mut Context, this: Value, args: &[Value]) -> JsResult<Value> {
    let other = to_object(ctx, &arg(args, 0), None)?;
    let start = match arg(args, 1) {
        Value::Undefined => 0,
        start => to_uint32(ctx, &start)?,
    };
    let other_len = to_uint32(ctx, &ctx.get(other, &PropertyKey::from("length")))?;
    let end = match arg(args, 2) {
        Value::Undefined => other_len,
        end => to_uint32(ctx, &end)?,
    };

    let target = to_object(ctx, &this, None)?;
    let mut next = to_uint32(ctx, &ctx.get(target, &PropertyKey::from("length")))? as f64;
    for index in start..end {
        let value = ctx.get(other, &PropertyKey::from(index));
        ctx.set(target, PropertyKey::from_number(next), value)?;
        next += 1.0;
    }
    ctx.set(target, "length", Value::Number(next))?;
    Ok(Value::Undefined)
}

/// Array.prototype.includes(target, fromIndex)
///
/// Membership by SameValueZero, so NaN is found. A negative `fromIndex`
/// counts back from the end.
fn includes(ctx: &mut Context, this: Value, args: &[Value]) -> JsResult<Value> {
    if this.is_nullish() {
        return Err(JsError::type_error("Cannot convert this value to object"));
    }
    let obj = to_object(ctx, &this, None)?;
    let len = to_length(ctx, &ctx.get(obj, &PropertyKey::from("length")))?;
    if len < 1.0 {
        return Ok(Value::Bool(false));
    }

    let from_index = arg(args, 1);
    let from = if to_boolean(&from_index) {
        to_number(ctx, &from_index)?.floor()
    } else {
        0.0
    };
    if from >= len || from >= TWO_32 {
        return Ok(Value::Bool(false));
    }

    let needle = arg(args, 0);
    let mut k = if from < 0.0 { (len + from).max(0.0) } else { from };
    while k < len {
        let element = ctx.get(obj, &PropertyKey::from_number(k));
        if same_value_zero(&needle, &element) {
            return Ok(Value::Bool(true));
        }
        k += 1.0;
    }
    Ok(Value::Bool(false))
}
