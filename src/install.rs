//! Capability installer
//!
//! Installation is split in two: [`merge_if_absent`] decides what should
//! happen to a name on a target from a snapshot of the target's state, and
//! [`define_internal`] applies that decision through the context's
//! property-definition primitive.
//!
//! Installed properties are never enumerable. Callables stay writable and
//! configurable; every other value is frozen in place.

use log::{debug, trace};

use crate::context::Context;
use crate::error::{JsError, JsResult};
use crate::runtime::{ObjectId, PropertyDescriptor, PropertyFlags, PropertyKey};
use crate::value::Value;

/// Attribute policy for an installed property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityDescriptor {
    /// Hidden, but replaceable and callable as a method
    Callable,
    /// Hidden and permanently frozen
    FrozenValue,
}

impl CapabilityDescriptor {
    /// Pick the policy for `value`
    pub fn classify(ctx: &Context, value: &Value) -> Self {
        if ctx.is_callable(value) {
            CapabilityDescriptor::Callable
        } else {
            CapabilityDescriptor::FrozenValue
        }
    }

    pub const fn attributes(self) -> PropertyFlags {
        match self {
            CapabilityDescriptor::Callable => PropertyFlags::new(true, false, true),
            CapabilityDescriptor::FrozenValue => PropertyFlags::new(false, false, false),
        }
    }
}

/// Where a name currently resolves on a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Absent,
    /// Found on the prototype chain but not on the target itself
    Inherited,
    Own { configurable: bool },
}

impl Presence {
    /// Snapshot the presence of `key` on `target`
    pub fn of(ctx: &Context, target: ObjectId, key: &PropertyKey) -> Self {
        if let Some(own) = ctx.get_own_property(target, key) {
            return Presence::Own { configurable: own.configurable() };
        }
        if ctx.has_property(target, key) {
            Presence::Inherited
        } else {
            Presence::Absent
        }
    }

    #[inline]
    pub fn is_present(self) -> bool {
        !matches!(self, Presence::Absent)
    }
}

/// Outcome of [`merge_if_absent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallDecision {
    Install,
    Skip,
    /// Installing would need to add a property to a non-extensible target
    Conflict,
}

/// Decide whether a candidate should be installed
///
/// A name that already resolves on the target (own or inherited) is
/// skipped unless `override_existing` is set. Overriding an own property is
/// always attempted: whether a non-configurable one may change is up to
/// property definition, which accepts restating the same value and
/// writing through a writable property.
pub fn merge_if_absent(presence: Presence, extensible: bool, override_existing: bool) -> InstallDecision {
    if presence.is_present() && !override_existing {
        return InstallDecision::Skip;
    }
    match presence {
        Presence::Own { .. } => InstallDecision::Install,
        Presence::Absent | Presence::Inherited if extensible => InstallDecision::Install,
        Presence::Absent | Presence::Inherited => InstallDecision::Conflict,
    }
}

/// Install `value` on `target` under `key` unless the name is already present
///
/// Returns the decision that was applied. A conflict, or a redefinition
/// property definition rejects, surfaces as a TypeError; a callable whose
/// `name` does not match `key` fails with [`JsError::Internal`] when the
/// `name-check` feature is enabled.
pub fn define_internal(
    ctx: &mut Context,
    target: ObjectId,
    key: impl Into<PropertyKey>,
    value: Value,
    override_existing: bool,
) -> JsResult<InstallDecision> {
    let key = key.into();
    let presence = Presence::of(ctx, target, &key);
    let decision = merge_if_absent(presence, ctx.is_extensible(target), override_existing);

    match decision {
        InstallDecision::Skip => {
            trace!("skip {}: already present", key);
            return Ok(decision);
        }
        InstallDecision::Conflict => {
            return Err(JsError::type_error(format!(
                "Cannot define property {}, object is not extensible",
                key
            )));
        }
        InstallDecision::Install => {}
    }

    let descriptor = CapabilityDescriptor::classify(ctx, &value);
    if cfg!(feature = "name-check") && descriptor == CapabilityDescriptor::Callable {
        check_function_name(ctx, &key, &value)?;
    }

    ctx.define_own_property(target, key.clone(), PropertyDescriptor::new(value, descriptor.attributes()))?;
    debug!("installed {} as {:?}", key, descriptor);
    #[cfg(feature = "dump")]
    log::info!("install {} ({:?}, override: {})", key, descriptor, override_existing);

    Ok(decision)
}

/// A callable must be named after the key it is installed under, or after
/// the key plus a trailing `_` (for keys that are reserved words). Symbol
/// keys and functions without a `name` are exempt.
fn check_function_name(ctx: &Context, key: &PropertyKey, value: &Value) -> JsResult<()> {
    let (PropertyKey::String(expected), Value::Object(id)) = (key, value) else {
        return Ok(());
    };
    let Some(name) = ctx.get_property(*id, &PropertyKey::from("name")) else {
        return Ok(());
    };
    if let Value::String(actual) = &name.value {
        if is_expected_name(actual.code_units(), expected.code_units()) {
            return Ok(());
        }
    }
    Err(JsError::internal(format!(
        "Expected function name \"{}\", was \"{}\"",
        expected, name.value
    )))
}

pub(crate) fn is_expected_name(actual: &[u16], expected: &[u16]) -> bool {
    match actual.split_last() {
        _ if actual == expected => true,
        Some((&last, stem)) => last == b'_' as u16 && stem == expected,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{NativeFunction, arg};
    use crate::value::Symbol;

    fn key(s: &str) -> PropertyKey {
        PropertyKey::from(s)
    }

    fn identity(_ctx: &mut Context, _this: Value, args: &[Value]) -> JsResult<Value> {
        Ok(arg(args, 0))
    }

    fn function(ctx: &mut Context, name: &'static str) -> Value {
        Value::Object(ctx.new_function(NativeFunction::new(name, 1, identity)))
    }

    #[test]
    fn test_merge_if_absent() {
        use InstallDecision::*;
        use Presence::*;

        assert_eq!(merge_if_absent(Absent, true, false), Install);
        assert_eq!(merge_if_absent(Absent, true, true), Install);
        assert_eq!(merge_if_absent(Inherited, true, false), Skip);
        assert_eq!(merge_if_absent(Inherited, true, true), Install);
        assert_eq!(merge_if_absent(Own { configurable: true }, true, false), Skip);
        assert_eq!(merge_if_absent(Own { configurable: true }, true, true), Install);
        assert_eq!(merge_if_absent(Own { configurable: false }, true, false), Skip);
        assert_eq!(merge_if_absent(Own { configurable: false }, true, true), Install);
        assert_eq!(merge_if_absent(Absent, false, false), Conflict);
        assert_eq!(merge_if_absent(Inherited, false, true), Conflict);
        assert_eq!(merge_if_absent(Own { configurable: true }, false, true), Install);
        assert_eq!(merge_if_absent(Own { configurable: false }, false, true), Install);
    }

    #[test]
    fn test_descriptor_attributes() {
        let callable = CapabilityDescriptor::Callable.attributes();
        assert!(callable.configurable() && callable.writable() && !callable.enumerable());
        let frozen = CapabilityDescriptor::FrozenValue.attributes();
        assert!(!frozen.configurable() && !frozen.writable() && !frozen.enumerable());
    }

    #[test]
    fn test_classify() {
        let mut ctx = Context::new();
        let f = function(&mut ctx, "f");
        let obj = Value::Object(ctx.new_object());
        assert_eq!(CapabilityDescriptor::classify(&ctx, &f), CapabilityDescriptor::Callable);
        assert_eq!(CapabilityDescriptor::classify(&ctx, &obj), CapabilityDescriptor::FrozenValue);
        assert_eq!(CapabilityDescriptor::classify(&ctx, &Value::from(1)), CapabilityDescriptor::FrozenValue);
    }

    #[test]
    fn test_install_value_is_frozen() {
        let mut ctx = Context::new();
        let target = ctx.new_object();
        let decision = define_internal(&mut ctx, target, "answer", Value::from(42), false).unwrap();
        assert_eq!(decision, InstallDecision::Install);

        let desc = ctx.get_own_property(target, &key("answer")).unwrap();
        assert_eq!(desc.value, Value::from(42));
        assert!(!desc.enumerable() && !desc.writable() && !desc.configurable());
        assert!(ctx.set(target, "answer", Value::from(0)).is_err());
    }

    #[test]
    fn test_install_function_is_replaceable() {
        let mut ctx = Context::new();
        let target = ctx.new_object();
        let f = function(&mut ctx, "method");
        define_internal(&mut ctx, target, "method", f.clone(), false).unwrap();

        let desc = ctx.get_own_property(target, &key("method")).unwrap();
        assert_eq!(desc.value, f);
        assert!(!desc.enumerable() && desc.writable() && desc.configurable());
        ctx.set(target, "method", Value::Null).unwrap();
    }

    #[test]
    fn test_install_is_idempotent() {
        let mut ctx = Context::new();
        let target = ctx.new_object();
        define_internal(&mut ctx, target, "k", Value::from(1), false).unwrap();
        let before = ctx.get_own_property(target, &key("k"));

        let decision = define_internal(&mut ctx, target, "k", Value::from(1), false).unwrap();
        assert_eq!(decision, InstallDecision::Skip);
        assert_eq!(ctx.get_own_property(target, &key("k")), before);
    }

    #[test]
    fn test_inherited_names_are_skipped() {
        let mut ctx = Context::new();
        let parent = ctx.new_object();
        ctx.set(parent, "shared", Value::from("parent")).unwrap();
        let child = ctx.new_object_with_proto(Some(parent));

        let decision = define_internal(&mut ctx, child, "shared", Value::from("child"), false).unwrap();
        assert_eq!(decision, InstallDecision::Skip);
        assert!(!ctx.has_own_property(child, &key("shared")));

        define_internal(&mut ctx, child, "shared", Value::from("child"), true).unwrap();
        assert_eq!(ctx.get(child, &key("shared")), Value::from("child"));
    }

    #[test]
    fn test_override_replaces() {
        let mut ctx = Context::new();
        let target = ctx.new_object();
        ctx.set(target, "f", Value::from(1)).unwrap();
        let f = function(&mut ctx, "f");
        let decision = define_internal(&mut ctx, target, "f", f.clone(), true).unwrap();
        assert_eq!(decision, InstallDecision::Install);
        assert_eq!(ctx.get(target, &key("f")), f);
        assert!(!ctx.get_own_property(target, &key("f")).unwrap().enumerable());
    }

    #[test]
    fn test_override_frozen_conflicts() {
        let mut ctx = Context::new();
        let target = ctx.new_object();
        define_internal(&mut ctx, target, "k", Value::from(1), false).unwrap();
        let err = define_internal(&mut ctx, target, "k", Value::from(2), true).unwrap_err();
        assert_eq!(err, JsError::type_error("Cannot redefine property: k"));
        assert_eq!(ctx.get(target, &key("k")), Value::from(1));
    }

    #[test]
    fn test_override_restating_frozen_value() {
        let mut ctx = Context::new();
        let target = ctx.new_object();
        define_internal(&mut ctx, target, "k", Value::from(1), false).unwrap();
        let before = ctx.get_own_property(target, &key("k"));

        let decision = define_internal(&mut ctx, target, "k", Value::from(1), true).unwrap();
        assert_eq!(decision, InstallDecision::Install);
        assert_eq!(ctx.get_own_property(target, &key("k")), before);
    }

    #[test]
    fn test_override_writable_non_configurable() {
        let mut ctx = Context::new();
        let target = ctx.new_object();
        let writable = PropertyFlags::new(false, false, true);
        ctx.define_own_property(target, "k", PropertyDescriptor::new(Value::from(1), writable))
            .unwrap();

        let decision = define_internal(&mut ctx, target, "k", Value::from(2), true).unwrap();
        assert_eq!(decision, InstallDecision::Install);
        let desc = ctx.get_own_property(target, &key("k")).unwrap();
        assert_eq!(desc.value, Value::from(2));
        assert!(!desc.writable() && !desc.configurable());
    }

    #[test]
    fn test_override_non_configurable_with_callable() {
        let mut ctx = Context::new();
        let target = ctx.new_object();
        let writable = PropertyFlags::new(false, false, true);
        ctx.define_own_property(target, "f", PropertyDescriptor::new(Value::from(1), writable))
            .unwrap();

        // A callable would become configurable again
        let f = function(&mut ctx, "f");
        let err = define_internal(&mut ctx, target, "f", f, true).unwrap_err();
        assert_eq!(err, JsError::type_error("Cannot redefine property: f"));
        assert_eq!(ctx.get(target, &key("f")), Value::from(1));
    }

    #[test]
    fn test_non_extensible_target() {
        let mut ctx = Context::new();
        let target = ctx.new_object();
        ctx.prevent_extensions(target);
        let err = define_internal(&mut ctx, target, "k", Value::from(1), false).unwrap_err();
        assert_eq!(
            err,
            JsError::type_error("Cannot define property k, object is not extensible")
        );
    }

    #[test]
    fn test_symbol_keys() {
        let mut ctx = Context::new();
        let target = ctx.new_object();
        let sym = Symbol::new(Some("iterator"));
        let f = function(&mut ctx, "values");
        define_internal(&mut ctx, target, sym.clone(), f, false).unwrap();
        assert!(ctx.has_own_property(target, &PropertyKey::Symbol(sym)));
    }

    #[test]
    fn test_expected_name() {
        let units = |s: &str| s.encode_utf16().collect::<Vec<u16>>();
        assert!(is_expected_name(&units("at"), &units("at")));
        assert!(is_expected_name(&units("escape_"), &units("escape")));
        assert!(!is_expected_name(&units("escape__"), &units("escape")));
        assert!(!is_expected_name(&units("other"), &units("escape")));
        assert!(!is_expected_name(&units(""), &units("x")));
        assert!(is_expected_name(&units(""), &units("")));
    }

    #[cfg(feature = "name-check")]
    #[test]
    fn test_name_mismatch_is_internal_failure() {
        let mut ctx = Context::new();
        let target = ctx.new_object();
        let f = function(&mut ctx, "wrong");
        let err = define_internal(&mut ctx, target, "right", f, false).unwrap_err();
        assert_eq!(err, JsError::internal("Expected function name \"right\", was \"wrong\""));
        assert_eq!(err.to_string(), "Internal assertion failure: Expected function name \"right\", was \"wrong\"");
        assert!(!ctx.has_own_property(target, &key("right")));
    }

    #[cfg(feature = "name-check")]
    #[test]
    fn test_trailing_marker_is_accepted() {
        let mut ctx = Context::new();
        let target = ctx.new_object();
        let f = function(&mut ctx, "delete_");
        define_internal(&mut ctx, target, "delete", f, false).unwrap();
        assert!(ctx.has_own_property(target, &key("delete")));
    }
}
