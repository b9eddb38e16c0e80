//! Object extensions: descriptor and key introspection

use crate::context::Context;
use crate::conv::{to_object, to_property_key};
use crate::error::JsResult;
use crate::registry::{CapabilityRegistry, Target};
use crate::runtime::{
    JSObject, NativeFunction, ObjectId, PropertyDescriptor, PropertyFlags, PropertyKey, arg,
};
use crate::value::Value;

pub(crate) fn register(registry: &mut CapabilityRegistry) {
    let functions = [
        ("getPropertyDescriptor", NativeFunction::new("getPropertyDescriptor", 2, get_property_descriptor)),
        ("getPropertyNames", NativeFunction::new("getPropertyNames", 1, get_property_names)),
        (
            "getOwnPropertyDescriptors",
            NativeFunction::new("getOwnPropertyDescriptors", 1, get_own_property_descriptors),
        ),
        ("values", NativeFunction::new("values", 1, values)),
        ("entries", NativeFunction::new("entries", 1, entries)),
    ];
    for (name, f) in functions {
        registry.register_function(Target::Object, name, f);
    }
}

/// Object.getPropertyDescriptor(o, p): the descriptor of the first object
/// on the prototype chain that owns `p`
fn get_property_descriptor(ctx: &mut Context, _this: Value, args: &[Value]) -> JsResult<Value> {
    let obj = to_object(ctx, &arg(args, 0), None)?;
    let key = to_property_key(ctx, &arg(args, 1))?;
    match ctx.get_property(obj, &key) {
        Some(desc) => Ok(Value::Object(ctx.from_property_descriptor(&desc))),
        None => Ok(Value::Undefined),
    }
}

/// Object.getPropertyNames(o): own and inherited string keys, each once
fn get_property_names(ctx: &mut Context, _this: Value, args: &[Value]) -> JsResult<Value> {
    let mut current = Some(to_object(ctx, &arg(args, 0), None)?);

    // Collected as keys of a bare object so duplicates collapse and the
    // result follows own-key order
    let mut names = JSObject::ordinary(None);
    while let Some(id) = current {
        for key in string_keys(ctx, id) {
            names.props.set(key, Value::Bool(true), PropertyFlags::DEFAULT);
        }
        current = ctx.get_prototype_of(id);
    }

    let names = names.own_property_keys().iter().map(PropertyKey::to_value).collect();
    Ok(Value::Object(ctx.new_array(names)))
}

/// Object.getOwnPropertyDescriptors(o)
fn get_own_property_descriptors(ctx: &mut Context, _this: Value, args: &[Value]) -> JsResult<Value> {
    let obj = to_object(ctx, &arg(args, 0), None)?;
    let result = ctx.new_object();
    for key in string_keys(ctx, obj) {
        let Some(desc) = ctx.get_own_property(obj, &key) else {
            continue;
        };
        let desc_obj = ctx.from_property_descriptor(&desc);
        ctx.define_own_property(
            result,
            key,
            PropertyDescriptor::new(Value::Object(desc_obj), PropertyFlags::DEFAULT),
        )?;
    }
    Ok(Value::Object(result))
}

/// Object.values(o)
fn values(ctx: &mut Context, _this: Value, args: &[Value]) -> JsResult<Value> {
    let obj = to_object(ctx, &arg(args, 0), None)?;
    let values = enumerable_keys(ctx, obj)
        .iter()
        .map(|key| ctx.get(obj, key))
        .collect();
    Ok(Value::Object(ctx.new_array(values)))
}

/// Object.entries(o)
fn entries(ctx: &mut Context, _this: Value, args: &[Value]) -> JsResult<Value> {
    let obj = to_object(ctx, &arg(args, 0), None)?;
    let mut entries = Vec::new();
    for key in enumerable_keys(ctx, obj) {
        let value = ctx.get(obj, &key);
        entries.push(Value::Object(ctx.new_array(vec![key.to_value(), value])));
    }
    Ok(Value::Object(ctx.new_array(entries)))
}

/// Own string keys (getOwnPropertyNames)
fn string_keys(ctx: &Context, id: ObjectId) -> Vec<PropertyKey> {
    ctx.own_property_keys(id)
        .into_iter()
        .filter(|key| !key.is_symbol())
        .collect()
}

/// Own enumerable string keys (Object.keys)
fn enumerable_keys(ctx: &Context, id: ObjectId) -> Vec<PropertyKey> {
    string_keys(ctx, id)
        .into_iter()
        .filter(|key| ctx.get_own_property(id, key).is_some_and(|desc| desc.enumerable()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::value::Symbol;

    fn key(s: &str) -> PropertyKey {
        PropertyKey::from(s)
    }

    /// Elements of an array value
    fn elements(ctx: &Context, value: &Value) -> Vec<Value> {
        let id = value.as_object().unwrap();
        match &ctx.object(id).data {
            crate::runtime::ObjectData::Array(arr) => arr.as_slice().to_vec(),
            _ => panic!("not an array"),
        }
    }

    fn strings(values: &[&str]) -> Vec<Value> {
        values.iter().map(|s| Value::from(*s)).collect()
    }

    #[test]
    fn test_get_property_descriptor_walks_chain() {
        let mut ctx = Context::new();
        let parent = ctx.new_object();
        ctx.set(parent, "inherited", Value::from(1)).unwrap();
        let child = ctx.new_object_with_proto(Some(parent));

        let desc = get_property_descriptor(
            &mut ctx,
            Value::Undefined,
            &[Value::Object(child), Value::from("inherited")],
        )
        .unwrap();
        let desc = desc.as_object().unwrap();
        assert_eq!(ctx.get(desc, &key("value")), Value::from(1));
        assert_eq!(ctx.get(desc, &key("enumerable")), Value::Bool(true));

        let missing =
            get_property_descriptor(&mut ctx, Value::Undefined, &[Value::Object(child), Value::from("nope")])
                .unwrap();
        assert_eq!(missing, Value::Undefined);
    }

    #[test]
    fn test_get_property_descriptor_on_primitive() {
        let mut ctx = Context::new();
        let desc =
            get_property_descriptor(&mut ctx, Value::Undefined, &[Value::from("abc"), Value::from("length")])
                .unwrap();
        let desc = desc.as_object().unwrap();
        assert_eq!(ctx.get(desc, &key("value")), Value::from(3));
        assert_eq!(ctx.get(desc, &key("writable")), Value::Bool(false));

        let err = get_property_descriptor(&mut ctx, Value::Undefined, &[Value::Null]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
    }

    #[test]
    fn test_get_property_names() {
        let mut ctx = Context::new();
        let parent = ctx.new_object_with_proto(None);
        ctx.set(parent, "b", Value::from(1)).unwrap();
        ctx.set(parent, "shared", Value::from(1)).unwrap();
        ctx.set(parent, "1", Value::from(1)).unwrap();
        let child = ctx.new_object_with_proto(Some(parent));
        ctx.set(child, "shared", Value::from(2)).unwrap();
        ctx.set(child, "a", Value::from(2)).unwrap();
        ctx.set(child, Symbol::new(None), Value::from(2)).unwrap();

        let names = get_property_names(&mut ctx, Value::Undefined, &[Value::Object(child)]).unwrap();
        assert_eq!(elements(&ctx, &names), strings(&["1", "shared", "a", "b"]));
    }

    #[test]
    fn test_get_property_names_includes_prototype_members() {
        let mut ctx = Context::new();
        let arr = ctx.new_array(vec![Value::from(1)]);
        let names = get_property_names(&mut ctx, Value::Undefined, &[Value::Object(arr)]).unwrap();
        let names = elements(&ctx, &names);
        assert_eq!(names[0], Value::from("0"));
        assert!(names.contains(&Value::from("length")));
        assert!(names.contains(&Value::from("constructor")));
    }

    #[test]
    fn test_get_own_property_descriptors() {
        let mut ctx = Context::new();
        let obj = ctx.new_object();
        ctx.set(obj, "x", Value::from(1)).unwrap();
        ctx.define_own_property(obj, "hidden", PropertyDescriptor::new(Value::from(2), PropertyFlags::NONE))
            .unwrap();

        let result =
            get_own_property_descriptors(&mut ctx, Value::Undefined, &[Value::Object(obj)]).unwrap();
        let result = result.as_object().unwrap();
        assert_eq!(ctx.own_property_keys(result), vec![key("x"), key("hidden")]);

        let hidden = ctx.get(result, &key("hidden")).as_object().unwrap();
        assert_eq!(ctx.get(hidden, &key("value")), Value::from(2));
        assert_eq!(ctx.get(hidden, &key("configurable")), Value::Bool(false));
    }

    #[test]
    fn test_values_and_entries() {
        let mut ctx = Context::new();
        let obj = ctx.new_object();
        ctx.set(obj, "a", Value::from(1)).unwrap();
        ctx.set(obj, "b", Value::from("two")).unwrap();
        ctx.define_own_property(obj, "hidden", PropertyDescriptor::new(Value::from(3), PropertyFlags::BUILTIN))
            .unwrap();

        let vals = values(&mut ctx, Value::Undefined, &[Value::Object(obj)]).unwrap();
        assert_eq!(elements(&ctx, &vals), vec![Value::from(1), Value::from("two")]);

        let ents = entries(&mut ctx, Value::Undefined, &[Value::Object(obj)]).unwrap();
        let ents = elements(&ctx, &ents);
        assert_eq!(ents.len(), 2);
        assert_eq!(elements(&ctx, &ents[1]), vec![Value::from("b"), Value::from("two")]);
    }

    #[test]
    fn test_values_of_string() {
        let mut ctx = Context::new();
        let vals = values(&mut ctx, Value::Undefined, &[Value::from("hi")]).unwrap();
        assert_eq!(elements(&ctx, &vals), strings(&["h", "i"]));

        let err = entries(&mut ctx, Value::Undefined, &[Value::Undefined]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeError);
    }
}
