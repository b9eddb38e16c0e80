//! Type conversion and comparison
//!
//! The abstract operations payloads are written against: ToNumber,
//! ToString, ToInteger, ToUint32, ToLength, ToObject, SameValue and
//! friends. Every numeric coercion has a pure `*_from_number` core so the
//! arithmetic can be used (and tested) without a context.
//!
//! Only ToObject rejects input outright (null and undefined); numeric
//! coercions normalize instead of failing. Symbols are the exception the
//! language itself makes: they refuse conversion to number or string.

use crate::context::Context;
use crate::error::{JsError, JsResult};
use crate::runtime::{JSObject, JSString, ObjectData, ObjectId, PropertyKey};
use crate::util::dtoa::{number_to_string, string_to_number};
use crate::util::{MAX_SAFE_INTEGER, TWO_32};
use crate::value::{Type, Value};

/// Classify a value (finer than `typeof`: `null` and symbols get their own
/// tags, callables are objects)
#[inline]
pub fn classify(value: &Value) -> Type {
    value.classify()
}

/// ToBoolean
pub fn to_boolean(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => !(*n == 0.0 || n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Symbol(_) | Value::Object(_) => true,
    }
}

/// ToPrimitive
///
/// Wrappers unbox; every other object converts through its string form.
pub fn to_primitive(ctx: &Context, value: &Value) -> JsResult<Value> {
    let mut seen = Vec::new();
    to_primitive_inner(ctx, value, &mut seen)
}

fn to_primitive_inner(ctx: &Context, value: &Value, seen: &mut Vec<ObjectId>) -> JsResult<Value> {
    let Value::Object(id) = value else {
        return Ok(value.clone());
    };
    let obj = ctx.object(*id);
    let prim = match &obj.data {
        ObjectData::Boolean(b) => Value::Bool(*b),
        ObjectData::Number(n) => Value::Number(*n),
        ObjectData::String(s) => Value::String(s.clone()),
        ObjectData::Symbol(sym) => Value::Symbol(sym.clone()),
        ObjectData::Array(_) => Value::String(array_join(ctx, *id, seen)?),
        ObjectData::Function(f) => Value::from(format!("function {}() {{ [native code] }}", f.name)),
        ObjectData::Error(_) => Value::String(error_to_string(ctx, *id)?),
        ObjectData::Ordinary => Value::from("[object Object]"),
    };
    Ok(prim)
}

/// Array.prototype.join(",") with cycle detection
fn array_join(ctx: &Context, id: ObjectId, seen: &mut Vec<ObjectId>) -> JsResult<JSString> {
    if seen.contains(&id) {
        return Ok(JSString::empty());
    }
    seen.push(id);

    let len = length_from_number(to_number(ctx, &ctx.get(id, &PropertyKey::from("length")))?);
    let mut units: Vec<u16> = Vec::new();
    let mut index = 0.0;
    while index < len {
        if index > 0.0 {
            units.push(b',' as u16);
        }
        let element = ctx.get(id, &PropertyKey::from(index as u32));
        if !element.is_nullish() {
            let prim = to_primitive_inner(ctx, &element, seen)?;
            units.extend_from_slice(to_string_primitive(&prim)?.code_units());
        }
        if units.len() > JSString::MAX_LEN {
            return Err(JsError::range_error("Invalid string length"));
        }
        index += 1.0;
    }

    seen.pop();
    JSString::from_code_units(units)
}

fn error_to_string(ctx: &Context, id: ObjectId) -> JsResult<JSString> {
    let name = ctx.get(id, &PropertyKey::from("name"));
    let message = ctx.get(id, &PropertyKey::from("message"));
    let name = if name.is_undefined() { JSString::from("Error") } else { to_string(ctx, &name)? };
    let message = if message.is_undefined() { JSString::empty() } else { to_string(ctx, &message)? };
    if message.is_empty() {
        return Ok(name);
    }
    if name.is_empty() {
        return Ok(message);
    }
    name.concat(&JSString::from(": "))?.concat(&message)
}

/// ToNumber
pub fn to_number(ctx: &Context, value: &Value) -> JsResult<f64> {
    match value {
        Value::Undefined => Ok(f64::NAN),
        Value::Null => Ok(0.0),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => Ok(*n),
        Value::String(s) => Ok(string_to_number(&s.to_rust_string())),
        Value::Symbol(_) => Err(JsError::type_error("Cannot convert a Symbol value to a number")),
        Value::Object(_) => {
            let prim = to_primitive(ctx, value)?;
            to_number(ctx, &prim)
        }
    }
}

fn to_string_primitive(value: &Value) -> JsResult<JSString> {
    match value {
        Value::Undefined => Ok(JSString::from("undefined")),
        Value::Null => Ok(JSString::from("null")),
        Value::Bool(b) => Ok(JSString::from(if *b { "true" } else { "false" })),
        Value::Number(n) => Ok(JSString::from(number_to_string(*n))),
        Value::String(s) => Ok(s.clone()),
        Value::Symbol(_) => Err(JsError::type_error("Cannot convert a Symbol value to a string")),
        Value::Object(_) => Err(JsError::type_error("Cannot convert object to primitive value")),
    }
}

/// ToString
pub fn to_string(ctx: &Context, value: &Value) -> JsResult<JSString> {
    let prim = to_primitive(ctx, value)?;
    to_string_primitive(&prim)
}

/// `String(value)`: ToString, except that a symbol renders as
/// `Symbol(description)` instead of throwing
pub fn string_of(ctx: &Context, value: &Value) -> JsResult<JSString> {
    match value {
        Value::Symbol(sym) => Ok(JSString::from(sym.to_string())),
        _ => to_string(ctx, value),
    }
}

/// ToPropertyKey
pub fn to_property_key(ctx: &Context, value: &Value) -> JsResult<PropertyKey> {
    match value {
        Value::Symbol(sym) => Ok(PropertyKey::Symbol(sym.clone())),
        _ => match to_primitive(ctx, value)? {
            Value::Symbol(sym) => Ok(PropertyKey::Symbol(sym)),
            prim => Ok(PropertyKey::String(to_string_primitive(&prim)?)),
        },
    }
}

/// ToInteger on a number: NaN maps to 0, zeros and infinities pass
/// through, everything else truncates toward zero
#[inline]
pub fn integer_from_number(n: f64) -> f64 {
    if n.is_nan() {
        return 0.0;
    }
    if n == 0.0 || n.is_infinite() {
        return n;
    }
    n.trunc()
}

/// ToInteger
pub fn to_integer(ctx: &Context, value: &Value) -> JsResult<f64> {
    Ok(integer_from_number(to_number(ctx, value)?))
}

/// ToUint32 on a number: modular reduction into `0..2^32`, matching `x >>> 0`
#[inline]
pub fn uint32_from_number(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    let int = n.trunc();
    (((int % TWO_32) + TWO_32) % TWO_32) as u32
}

/// ToUint32
pub fn to_uint32(ctx: &Context, value: &Value) -> JsResult<u32> {
    Ok(uint32_from_number(to_number(ctx, value)?))
}

/// ToLength on a number: ToInteger clamped to `[0, 2^53 - 1]`
#[inline]
pub fn length_from_number(n: f64) -> f64 {
    let len = integer_from_number(n);
    if len <= 0.0 {
        return 0.0;
    }
    len.min(MAX_SAFE_INTEGER)
}

/// ToLength
pub fn to_length(ctx: &Context, value: &Value) -> JsResult<f64> {
    Ok(length_from_number(to_number(ctx, value)?))
}

/// RequireObjectCoercible: reject null and undefined without boxing
pub fn require_object_coercible(value: &Value, message: Option<&str>) -> JsResult<()> {
    if value.is_nullish() {
        return Err(nullish_error(value, message));
    }
    Ok(())
}

fn nullish_error(value: &Value, message: Option<&str>) -> JsError {
    match message {
        Some(m) if !m.is_empty() => JsError::type_error(m),
        _ => JsError::type_error(format!("Cannot call method on {}", value)),
    }
}

/// ToObject
///
/// Fails with a TypeError on null and undefined (using `message` when
/// given), wraps primitives, passes objects through.
pub fn to_object(ctx: &mut Context, value: &Value, message: Option<&str>) -> JsResult<ObjectId> {
    let intr = *ctx.intrinsics();
    let (proto, data) = match value {
        Value::Object(id) => return Ok(*id),
        Value::Undefined | Value::Null => return Err(nullish_error(value, message)),
        Value::Bool(b) => (intr.boolean_prototype, ObjectData::Boolean(*b)),
        Value::Number(n) => (intr.number_prototype, ObjectData::Number(*n)),
        Value::String(s) => (intr.string_prototype, ObjectData::String(s.clone())),
        Value::Symbol(sym) => (intr.symbol_prototype, ObjectData::Symbol(sym.clone())),
    };
    Ok(ctx.alloc(JSObject::new(Some(proto), data)))
}

/// SameValue: strict equality, except NaN equals NaN and +0 differs from -0
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if x.is_nan() && y.is_nan() {
                return true;
            }
            x == y && x.is_sign_negative() == y.is_sign_negative()
        }
        _ => a == b,
    }
}

/// SameValueZero: SameValue, except +0 equals -0
pub fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => (x.is_nan() && y.is_nan()) || x == y,
        _ => a == b,
    }
}

/// Short human-readable rendering of a value for error messages
pub fn describe(ctx: &Context, value: &Value) -> String {
    match value {
        Value::Object(id) => match &ctx.object(*id).data {
            ObjectData::Function(f) => format!("function {}", f.name),
            ObjectData::Array(_) => "[object Array]".to_string(),
            _ => "[object Object]".to_string(),
        },
        Value::String(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}
