//! Host intrinsics
//!
//! Builds the fixed set of built-in objects every context starts with: the
//! prototypes, the constructors the shim extends, and the Math namespace.
//! Nothing here is part of the shim; these are the Extension Targets that
//! already exist before any capability is installed.

use crate::context::{Context, Intrinsics};
use crate::conv;
use crate::error::{ErrorKind, JsError, JsResult};
use crate::heap::Heap;
use crate::runtime::{
    JSArray, JSObject, JSString, MAX_ARRAY_LENGTH, NativeFunction, ObjectData, ObjectId,
    PropertyFlags, PropertyKey, arg,
};
use crate::value::Value;

/// `name` and `length` of function objects: configurable only
const FUNCTION_META: PropertyFlags = PropertyFlags::new(true, false, false);

const MATH_CONSTANTS: [(&str, f64); 8] = [
    ("E", std::f64::consts::E),
    ("LN10", std::f64::consts::LN_10),
    ("LN2", std::f64::consts::LN_2),
    ("LOG10E", std::f64::consts::LOG10_E),
    ("LOG2E", std::f64::consts::LOG2_E),
    ("PI", std::f64::consts::PI),
    ("SQRT1_2", std::f64::consts::FRAC_1_SQRT_2),
    ("SQRT2", std::f64::consts::SQRT_2),
];

/// Allocate a function object for a native function
pub(crate) fn make_function(heap: &mut Heap, function_prototype: ObjectId, f: NativeFunction) -> ObjectId {
    let mut obj = JSObject::new(Some(function_prototype), ObjectData::Function(f));
    obj.props.set(PropertyKey::from("length"), Value::from(f.length), FUNCTION_META);
    obj.props.set(PropertyKey::from("name"), Value::from(f.name), FUNCTION_META);
    heap.alloc(obj)
}

/// Populate a fresh heap with the host built-ins
pub(crate) fn create(heap: &mut Heap) -> Intrinsics {
    let object_prototype = heap.alloc(JSObject::ordinary(None));
    let function_prototype = heap.alloc(JSObject::ordinary(Some(object_prototype)));
    let proto = Some(object_prototype);

    let array_prototype = heap.alloc(JSObject::new(proto, ObjectData::Array(JSArray::new())));
    let string_prototype = heap.alloc(JSObject::new(proto, ObjectData::String(JSString::empty())));
    let number_prototype = heap.alloc(JSObject::new(proto, ObjectData::Number(0.0)));
    let boolean_prototype = heap.alloc(JSObject::new(proto, ObjectData::Boolean(false)));
    let symbol_prototype = heap.alloc(JSObject::ordinary(proto));

    let error_prototype = new_error_prototype(heap, object_prototype, ErrorKind::Error);
    let type_error_prototype = error_prototype_of(heap, error_prototype, ErrorKind::TypeError);
    let range_error_prototype = error_prototype_of(heap, error_prototype, ErrorKind::RangeError);
    let internal_error_prototype = error_prototype_of(heap, error_prototype, ErrorKind::InternalError);

    let constructor = |heap: &mut Heap, f: NativeFunction, prototype: ObjectId| {
        let ctor = make_function(heap, function_prototype, f);
        heap.get_mut(ctor)
            .props
            .set(PropertyKey::from("prototype"), Value::Object(prototype), PropertyFlags::NONE);
        heap.get_mut(prototype)
            .props
            .set(PropertyKey::from("constructor"), Value::Object(ctor), PropertyFlags::BUILTIN);
        ctor
    };

    let object_constructor =
        constructor(heap, NativeFunction::new("Object", 1, object_ctor), object_prototype);
    let array_constructor = constructor(heap, NativeFunction::new("Array", 1, array_ctor), array_prototype);
    let string_constructor =
        constructor(heap, NativeFunction::new("String", 1, string_ctor), string_prototype);
    let number_constructor =
        constructor(heap, NativeFunction::new("Number", 1, number_ctor), number_prototype);
    let regexp_prototype = heap.alloc(JSObject::ordinary(proto));
    let regexp_constructor =
        constructor(heap, NativeFunction::new("RegExp", 2, regexp_ctor), regexp_prototype);

    let math = heap.alloc(JSObject::ordinary(proto));
    for (name, value) in MATH_CONSTANTS {
        heap.get_mut(math)
            .props
            .set(PropertyKey::from(name), Value::from(value), PropertyFlags::NONE);
    }

    Intrinsics {
        object_prototype,
        function_prototype,
        array_prototype,
        string_prototype,
        number_prototype,
        boolean_prototype,
        symbol_prototype,
        error_prototype,
        type_error_prototype,
        range_error_prototype,
        internal_error_prototype,
        object_constructor,
        array_constructor,
        string_constructor,
        number_constructor,
        regexp_constructor,
        math,
    }
}

fn new_error_prototype(heap: &mut Heap, parent: ObjectId, kind: ErrorKind) -> ObjectId {
    let mut obj = JSObject::ordinary(Some(parent));
    obj.props.set(PropertyKey::from("name"), Value::from(kind.name()), PropertyFlags::BUILTIN);
    obj.props.set(PropertyKey::from("message"), Value::from(""), PropertyFlags::BUILTIN);
    heap.alloc(obj)
}

fn error_prototype_of(heap: &mut Heap, error_prototype: ObjectId, kind: ErrorKind) -> ObjectId {
    let mut obj = JSObject::ordinary(Some(error_prototype));
    obj.props.set(PropertyKey::from("name"), Value::from(kind.name()), PropertyFlags::BUILTIN);
    heap.alloc(obj)
}

// Constructors, called as plain functions

fn object_ctor(ctx: &mut Context, _this: Value, args: &[Value]) -> JsResult<Value> {
    let value = arg(args, 0);
    if value.is_nullish() {
        return Ok(Value::Object(ctx.new_object()));
    }
    Ok(Value::Object(conv::to_object(ctx, &value, None)?))
}

fn number_ctor(ctx: &mut Context, _this: Value, args: &[Value]) -> JsResult<Value> {
    if args.is_empty() {
        return Ok(Value::from(0));
    }
    Ok(Value::Number(conv::to_number(ctx, &args[0])?))
}

fn string_ctor(ctx: &mut Context, _this: Value, args: &[Value]) -> JsResult<Value> {
    match args.first() {
        None => Ok(Value::String(JSString::empty())),
        Some(value) => Ok(Value::String(conv::string_of(ctx, value)?)),
    }
}

fn array_ctor(ctx: &mut Context, _this: Value, args: &[Value]) -> JsResult<Value> {
    if let [Value::Number(n)] = args {
        if *n < 0.0 || n.fract() != 0.0 || *n > MAX_ARRAY_LENGTH as f64 {
            return Err(JsError::range_error("Invalid array length"));
        }
        let values = vec![Value::Undefined; *n as usize];
        return Ok(Value::Object(ctx.new_array(values)));
    }
    Ok(Value::Object(ctx.new_array(args.to_vec())))
}

fn regexp_ctor(_ctx: &mut Context, _this: Value, _args: &[Value]) -> JsResult<Value> {
    Err(JsError::type_error("RegExp objects are not supported by this host"))
}
