//! RegExp extensions

use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::Context;
use crate::conv::string_of;
use crate::error::JsResult;
use crate::registry::{CapabilityRegistry, Target};
use crate::runtime::{JSString, NativeFunction, arg};
use crate::value::Value;

/// Everything except ASCII letters and digits
static SPECIAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]").expect("valid escape regex"));

const BACKSLASH: u16 = b'\\' as u16;

pub(crate) fn register(registry: &mut CapabilityRegistry) {
    registry.register_function(Target::RegExp, "escape", NativeFunction::new("escape", 1, escape));
}

/// RegExp.escape(s): backslash before every code point that is not an
/// ASCII letter or digit
fn escape(ctx: &mut Context, _this: Value, args: &[Value]) -> JsResult<Value> {
    let s = string_of(ctx, &arg(args, 0))?;
    Ok(Value::String(escape_str(&s)?))
}

fn escape_str(s: &JSString) -> JsResult<JSString> {
    if s.is_well_formed() {
        let escaped = SPECIAL_RE.replace_all(&s.to_rust_string(), r"\$0").into_owned();
        return JSString::from_code_units(escaped.encode_utf16().collect());
    }

    // Lone surrogates have no UTF-8 form; escape them unit by unit
    let mut units = Vec::with_capacity(s.len() * 2);
    for decoded in char::decode_utf16(s.code_units().iter().copied()) {
        match decoded {
            Ok(c) => {
                if !c.is_ascii_alphanumeric() {
                    units.push(BACKSLASH);
                }
                let mut buf = [0u16; 2];
                units.extend_from_slice(c.encode_utf16(&mut buf));
            }
            Err(err) => {
                units.push(BACKSLASH);
                units.push(err.unpaired_surrogate());
            }
        }
    }
    JSString::from_code_units(units)
}
