use es7shim::{
    CapabilityKind, CapabilityRegistry, Context, ErrorKind, JsError, JsResult, NativeFunction,
    PropertyDescriptor, PropertyFlags, PropertyKey, Symbol, Target, Value, define_internal,
};

fn key(s: &str) -> PropertyKey {
    PropertyKey::from(s)
}

fn shimmed() -> Context {
    Context::with_shim().expect("standard registry installs")
}

fn array_values(ctx: &Context, value: &Value) -> Vec<Value> {
    let len = ctx.get_v(value, &key("length")).expect("length");
    let len = len.as_number().expect("numeric length") as u32;
    (0..len)
        .map(|i| ctx.get_v(value, &PropertyKey::from(i)).expect("element"))
        .collect()
}

#[test]
fn installed_members_behave_like_built_ins() {
    let mut ctx = shimmed();
    let number = Value::Object(ctx.intrinsics().number_constructor);
    let result = ctx
        .invoke(&number, "compare", &[Value::from(3), Value::from(1)])
        .unwrap();
    assert_eq!(result, Value::from(1));

    let arr = Value::Object(ctx.new_array(vec![Value::from(1), Value::from(2), Value::from(f64::NAN)]));
    assert_eq!(ctx.invoke(&arr, "includes", &[Value::from(f64::NAN)]).unwrap(), Value::Bool(true));

    assert_eq!(ctx.invoke(&Value::from("5"), "lpad", &[Value::from(3), Value::from("0")]).unwrap(), Value::from("005"));
    assert_eq!(ctx.invoke(&Value::from("ab"), "rpad", &[Value::from(5)]).unwrap(), Value::from("ab   "));
    assert_eq!(ctx.invoke(&Value::from("a😀"), "at", &[Value::from(1)]).unwrap(), Value::from("😀"));
}

#[test]
fn installed_members_are_hidden_from_enumeration() {
    let ctx = shimmed();
    for cap in CapabilityRegistry::standard().iter() {
        let target = cap.target.resolve(&ctx);
        let desc = ctx.get_own_property(target, &key(cap.name)).expect("installed");
        assert!(!desc.enumerable(), "{} is enumerable", cap);
        assert!(desc.writable() && desc.configurable(), "{} is frozen", cap);
    }
}

#[test]
fn padding_rejects_short_lengths() {
    let mut ctx = shimmed();
    let err = ctx.invoke(&Value::from("abc"), "lpad", &[Value::from(1)]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RangeError);

    // Errors can be surfaced as script-visible objects
    let obj = ctx.error_object(&err);
    assert_eq!(ctx.get(obj, &key("name")), Value::from("RangeError"));
}

#[test]
fn nullish_receivers_are_rejected() {
    let mut ctx = shimmed();
    let at = ctx.get(ctx.intrinsics().string_prototype, &key("at"));
    let err = ctx.call(&at, Value::Null, &[]).unwrap_err();
    assert_eq!(err, JsError::type_error("Cannot call method on null"));

    let includes = ctx.get(ctx.intrinsics().array_prototype, &key("includes"));
    let err = ctx.call(&includes, Value::Undefined, &[]).unwrap_err();
    assert_eq!(err, JsError::type_error("Cannot convert this value to object"));
}

#[test]
fn object_introspection() {
    let mut ctx = shimmed();
    let object = Value::Object(ctx.intrinsics().object_constructor);
    let obj = ctx.new_object();
    ctx.set(obj, "a", Value::from(1)).unwrap();
    ctx.set(obj, "b", Value::from(2)).unwrap();

    let values = ctx.invoke(&object, "values", &[Value::Object(obj)]).unwrap();
    assert_eq!(array_values(&ctx, &values), vec![Value::from(1), Value::from(2)]);

    let entries = ctx.invoke(&object, "entries", &[Value::Object(obj)]).unwrap();
    let entries = array_values(&ctx, &entries);
    assert_eq!(array_values(&ctx, &entries[0]), vec![Value::from("a"), Value::from(1)]);

    // Inherited members are found through the chain
    let desc = ctx
        .invoke(&object, "getPropertyDescriptor", &[Value::Object(obj), Value::from("constructor")])
        .unwrap();
    let desc = desc.as_object().unwrap();
    assert_eq!(ctx.get(desc, &key("value")), object);

    let names = ctx.invoke(&object, "getPropertyNames", &[Value::Object(obj)]).unwrap();
    let names = array_values(&ctx, &names);
    assert!(names.contains(&Value::from("a")));
    assert!(names.contains(&Value::from("constructor")));
}

#[test]
fn push_all_extends_receiver() {
    let mut ctx = shimmed();
    let target = Value::Object(ctx.new_array(vec![Value::from("x")]));
    let source = Value::Object(ctx.new_array(vec![Value::from("y"), Value::from("z")]));
    ctx.invoke(&target, "pushAll", &[source]).unwrap();
    assert_eq!(
        array_values(&ctx, &target),
        vec![Value::from("x"), Value::from("y"), Value::from("z")]
    );
}

#[test]
fn escape_and_denormals() {
    let mut ctx = shimmed();
    let regexp = Value::Object(ctx.intrinsics().regexp_constructor);
    let escaped = ctx.invoke(&regexp, "escape", &[Value::from("a.b")]).unwrap();
    assert_eq!(escaped, Value::from(r"a\.b"));

    let math = Value::Object(ctx.intrinsics().math);
    let tiny = Value::from(-f64::MIN_POSITIVE / 4.0);
    let flushed = ctx.invoke(&math, "denormz", &[tiny]).unwrap().as_number().unwrap();
    assert!(flushed == 0.0 && flushed.is_sign_negative());
}

fn native_includes(_ctx: &mut Context, _this: Value, _args: &[Value]) -> JsResult<Value> {
    Ok(Value::from("native"))
}

#[test]
fn host_members_win_over_the_shim() {
    let mut ctx = Context::new();
    let array_prototype = ctx.intrinsics().array_prototype;
    let native = ctx.new_function(NativeFunction::new("includes", 1, native_includes));
    ctx.define_own_property(
        array_prototype,
        "includes",
        PropertyDescriptor::new(Value::Object(native), PropertyFlags::BUILTIN),
    )
    .unwrap();

    let report = CapabilityRegistry::standard().install(&mut ctx).unwrap();
    assert_eq!(report.skipped, vec!["Array.prototype.includes".to_string()]);

    let arr = Value::Object(ctx.new_array(vec![]));
    assert_eq!(ctx.invoke(&arr, "includes", &[]).unwrap(), Value::from("native"));
}

#[test]
fn contexts_do_not_share_installs() {
    let shimmed = shimmed();
    let plain = Context::new();
    let compare = key("compare");
    assert!(shimmed.has_own_property(Target::Number.resolve(&shimmed), &compare));
    assert!(!plain.has_own_property(Target::Number.resolve(&plain), &compare));
}

#[test]
fn frozen_constants_stay_frozen() {
    let mut ctx = Context::new();
    let target = ctx.new_object();
    define_internal(&mut ctx, target, "VERSION", Value::from(7), false).unwrap();
    assert!(ctx.set(target, "VERSION", Value::from(8)).is_err());
    assert!(ctx.delete(target, &key("VERSION")).is_err());
    assert!(define_internal(&mut ctx, target, "VERSION", Value::from(8), true).is_err());
    assert_eq!(ctx.get(target, &key("VERSION")), Value::from(7));
}

#[test]
fn override_install_can_be_repeated() {
    let mut ctx = shimmed();
    let mut registry = CapabilityRegistry::standard();
    registry
        .register(Target::Math, "EPSILON32", CapabilityKind::Constant(Value::from(f32::EPSILON as f64)))
        .unwrap();
    registry.install_with_override(&mut ctx).unwrap();
    let report = registry.install_with_override(&mut ctx).unwrap();
    assert_eq!(report.installed.len(), registry.len());
    assert!(report.skipped.is_empty());
}

#[test]
fn symbols_convert_like_string_calls() {
    let mut ctx = shimmed();
    let regexp = Value::Object(ctx.intrinsics().regexp_constructor);
    let sym = Value::from(Symbol::new(Some("a")));
    let escaped = ctx.invoke(&regexp, "escape", &[sym]).unwrap();
    assert_eq!(escaped, Value::from(r"Symbol\(a\)"));

    let math = Value::Object(ctx.intrinsics().math);
    let text = Value::from("2");
    assert_eq!(ctx.invoke(&math, "denormz", &[text.clone()]).unwrap(), text);
}
