//! String.prototype extensions
//!
//! Receivers are checked for null and undefined and then converted with
//! ToString, so the functions also work when called on numbers, arrays and
//! other objects.

use crate::context::Context;
use crate::conv::{require_object_coercible, string_of, to_integer};
use crate::error::{JsError, JsResult};
use crate::registry::{CapabilityRegistry, Target};
use crate::runtime::{JSString, NativeFunction, arg};
use crate::util::unicode::{is_lead_surrogate, is_trail_surrogate};
use crate::value::Value;

pub(crate) fn register(registry: &mut CapabilityRegistry) {
    registry.register_function(Target::StringPrototype, "at", NativeFunction::new("at", 1, at));
    registry.register_function(Target::StringPrototype, "lpad", NativeFunction::new("lpad", 0, lpad));
    registry.register_function(Target::StringPrototype, "rpad", NativeFunction::new("rpad", 0, rpad));
}

fn this_string(ctx: &Context, this: &Value) -> JsResult<JSString> {
    require_object_coercible(this, None)?;
    string_of(ctx, this)
}

/// String.prototype.at(pos)
///
/// The character at code-unit position `pos`: a surrogate pair when `pos`
/// is on a lead surrogate followed by a trail surrogate, a single code
/// unit otherwise, and "" when `pos` is out of range.
fn at(ctx: &mut Context, this: Value, args: &[Value]) -> JsResult<Value> {
    let s = this_string(ctx, &this)?;
    let position = to_integer(ctx, &arg(args, 0))?;
    let size = s.len();
    if position < 0.0 || position >= size as f64 {
        return Ok(Value::String(JSString::empty()));
    }

    let position = position as usize;
    let first = s.code_units()[position];
    let paired = is_lead_surrogate(first)
        && s.code_unit_at(position + 1).is_some_and(is_trail_surrogate);
    let end = if paired { position + 2 } else { position + 1 };
    Ok(Value::String(s.substring(position, end)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PadSide {
    Start,
    End,
}

/// String.prototype.lpad(minLength, fillStr)
fn lpad(ctx: &mut Context, this: Value, args: &[Value]) -> JsResult<Value> {
    pad(ctx, &this, args, PadSide::Start)
}

/// String.prototype.rpad(minLength, fillStr)
fn rpad(ctx: &mut Context, this: Value, args: &[Value]) -> JsResult<Value> {
    pad(ctx, &this, args, PadSide::End)
}

/// Pad the receiver to at least `minLength` code units with whole copies
/// of `fillStr` (default `" "`). The fill is never truncated, so the
/// result can overshoot `minLength`.
fn pad(ctx: &Context, this: &Value, args: &[Value], side: PadSide) -> JsResult<Value> {
    let s = this_string(ctx, this)?;
    let min_length = arg(args, 0);
    if min_length.is_undefined() {
        return Ok(Value::String(s));
    }

    let fill_len = to_integer(ctx, &min_length)? - s.len() as f64;
    if fill_len < 0.0 || fill_len.is_infinite() {
        return Err(JsError::range_error("Invalid string length"));
    }

    let fill = match arg(args, 1) {
        Value::Undefined => JSString::from(" "),
        fill => string_of(ctx, &fill)?,
    };
    if fill.is_empty() || fill_len == 0.0 {
        return Ok(Value::String(s));
    }
    if s.len() as f64 + fill_len > JSString::MAX_LEN as f64 {
        return Err(JsError::range_error("Invalid string length"));
    }

    let fill_len = fill_len as usize;
    let copies = fill_len.div_ceil(fill.len());
    let mut units = Vec::with_capacity(s.len() + copies * fill.len());
    if side == PadSide::End {
        units.extend_from_slice(s.code_units());
    }
    for _ in 0..copies {
        units.extend_from_slice(fill.code_units());
    }
    if side == PadSide::Start {
        units.extend_from_slice(s.code_units());
    }
    Ok(Value::String(JSString::from_code_units(units)?))
}
