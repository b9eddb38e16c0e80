//! Math extensions: flushing denormals to zero

use crate::context::Context;
use crate::conv::to_number;
use crate::error::JsResult;
use crate::registry::{CapabilityRegistry, Target};
use crate::runtime::{NativeFunction, arg};
use crate::value::Value;

/// Smallest positive normal double (2^-1022)
const MIN_NORMAL_F64: f64 = f64::MIN_POSITIVE;
/// Smallest positive normal single (2^-126)
const MIN_NORMAL_F32: f64 = f32::MIN_POSITIVE as f64;

pub(crate) fn register(registry: &mut CapabilityRegistry) {
    registry.register_function(Target::Math, "denormz", NativeFunction::new("denormz", 1, denormz));
    registry.register_function(Target::Math, "fdenormz", NativeFunction::new("fdenormz", 1, fdenormz));
}

/// The signed zero a denormal magnitude flushes to, if `x` is one
#[inline]
fn flushed_zero(x: f64, min_normal: f64) -> Option<f64> {
    if x > 0.0 && x < min_normal {
        return Some(0.0);
    }
    if x < 0.0 && x > -min_normal {
        return Some(-0.0);
    }
    None
}

/// Flush a denormal argument to zero; any other argument is returned
/// as given, without conversion
fn flush_arg(ctx: &Context, args: &[Value], min_normal: f64) -> JsResult<Value> {
    let x = arg(args, 0);
    match flushed_zero(to_number(ctx, &x)?, min_normal) {
        Some(zero) => Ok(Value::Number(zero)),
        None => Ok(x),
    }
}

fn denormz(ctx: &mut Context, _this: Value, args: &[Value]) -> JsResult<Value> {
    flush_arg(ctx, args, MIN_NORMAL_F64)
}

fn fdenormz(ctx: &mut Context, _this: Value, args: &[Value]) -> JsResult<Value> {
    flush_arg(ctx, args, MIN_NORMAL_F32)
}
