//! Number extensions

use crate::context::Context;
use crate::conv::{to_boolean, to_number};
use crate::error::JsResult;
use crate::registry::{CapabilityRegistry, Target};
use crate::runtime::{NativeFunction, arg};
use crate::value::Value;

pub(crate) fn register(registry: &mut CapabilityRegistry) {
    registry.register_function(Target::Number, "compare", NativeFunction::new("compare", 3, compare));
}

/// Number.compare(first, second, tolerance)
///
/// 0 when the numbers are within `tolerance` of each other, otherwise the
/// sign of `first - second`. Differences involving NaN compare as 1.
fn compare(ctx: &mut Context, _this: Value, args: &[Value]) -> JsResult<Value> {
    let first = to_number(ctx, &arg(args, 0))?;
    let second = to_number(ctx, &arg(args, 1))?;
    let tolerance = arg(args, 2);
    let tolerance = if to_boolean(&tolerance) { to_number(ctx, &tolerance)? } else { 0.0 };

    let difference = first - second;
    let result = if difference.abs() <= tolerance {
        0
    } else if difference < 0.0 {
        -1
    } else {
        1
    };
    Ok(Value::from(result))
}
