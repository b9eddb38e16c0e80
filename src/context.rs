//! JavaScript execution context
//!
//! The Context owns the object heap and the intrinsic objects (the
//! prototypes, constructors and namespaces capabilities are installed onto),
//! and provides the reflection primitives everything else is built from.
//! Each context is independent: a fresh one starts with only the host's
//! built-ins, and installing the shim never touches any other context.

use crate::builtins::intrinsics;
use crate::conv;
use crate::error::{ErrorKind, JsError, JsResult};
use crate::heap::Heap;
use crate::registry::CapabilityRegistry;
use crate::runtime::{
    JSArray, JSObject, JSString, NativeFunction, ObjectData, ObjectId, PropertyDescriptor, PropertyFlags,
    PropertyKey,
};
use crate::value::Value;

/// Handles to the host's built-in objects
#[derive(Debug, Clone, Copy)]
pub struct Intrinsics {
    pub object_prototype: ObjectId,
    pub function_prototype: ObjectId,
    pub array_prototype: ObjectId,
    pub string_prototype: ObjectId,
    pub number_prototype: ObjectId,
    pub boolean_prototype: ObjectId,
    pub symbol_prototype: ObjectId,
    pub error_prototype: ObjectId,
    pub type_error_prototype: ObjectId,
    pub range_error_prototype: ObjectId,
    pub internal_error_prototype: ObjectId,
    pub object_constructor: ObjectId,
    pub array_constructor: ObjectId,
    pub string_constructor: ObjectId,
    pub number_constructor: ObjectId,
    pub regexp_constructor: ObjectId,
    pub math: ObjectId,
}

/// JavaScript execution context
pub struct Context {
    heap: Heap,
    intrinsics: Intrinsics,
}

impl Context {
    /// Create a context holding only the host built-ins
    pub fn new() -> Self {
        let mut heap = Heap::new();
        let intrinsics = intrinsics::create(&mut heap);
        Context { heap, intrinsics }
    }

    /// Create a context with the standard capability registry installed
    pub fn with_shim() -> JsResult<Self> {
        let mut ctx = Context::new();
        CapabilityRegistry::standard().install(&mut ctx)?;
        Ok(ctx)
    }

    #[inline]
    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    #[inline]
    pub fn object(&self, id: ObjectId) -> &JSObject {
        self.heap.get(id)
    }

    #[inline]
    pub fn object_mut(&mut self, id: ObjectId) -> &mut JSObject {
        self.heap.get_mut(id)
    }

    /// Number of objects allocated so far
    pub fn object_count(&self) -> usize {
        self.heap.len()
    }

    // Object creation

    pub fn alloc(&mut self, obj: JSObject) -> ObjectId {
        self.heap.alloc(obj)
    }

    /// New plain object inheriting from Object.prototype
    pub fn new_object(&mut self) -> ObjectId {
        let proto = self.intrinsics.object_prototype;
        self.new_object_with_proto(Some(proto))
    }

    pub fn new_object_with_proto(&mut self, proto: Option<ObjectId>) -> ObjectId {
        self.heap.alloc(JSObject::ordinary(proto))
    }

    /// New Array holding `values`
    pub fn new_array(&mut self, values: Vec<Value>) -> ObjectId {
        let proto = self.intrinsics.array_prototype;
        self.heap
            .alloc(JSObject::new(Some(proto), ObjectData::Array(JSArray::from_values(values))))
    }

    /// New function object wrapping a native function
    pub fn new_function(&mut self, f: NativeFunction) -> ObjectId {
        let proto = self.intrinsics.function_prototype;
        intrinsics::make_function(&mut self.heap, proto, f)
    }

    /// Materialize an error as an Error object
    pub fn error_object(&mut self, err: &JsError) -> ObjectId {
        let proto = match err.kind() {
            ErrorKind::Error => self.intrinsics.error_prototype,
            ErrorKind::TypeError => self.intrinsics.type_error_prototype,
            ErrorKind::RangeError => self.intrinsics.range_error_prototype,
            ErrorKind::InternalError => self.intrinsics.internal_error_prototype,
        };
        let mut obj = JSObject::new(Some(proto), ObjectData::Error(err.kind()));
        obj.props
            .set(PropertyKey::from("message"), Value::from(err.message()), PropertyFlags::BUILTIN);
        self.heap.alloc(obj)
    }

    /// Descriptor object `{ value, writable, enumerable, configurable }`
    pub fn from_property_descriptor(&mut self, desc: &PropertyDescriptor) -> ObjectId {
        let id = self.new_object();
        let obj = self.heap.get_mut(id);
        let fields = [
            ("value", desc.value.clone()),
            ("writable", Value::Bool(desc.writable())),
            ("enumerable", Value::Bool(desc.enumerable())),
            ("configurable", Value::Bool(desc.configurable())),
        ];
        for (name, value) in fields {
            obj.props.set(PropertyKey::from(name), value, PropertyFlags::DEFAULT);
        }
        id
    }

    // Reflection primitives

    pub fn is_callable(&self, value: &Value) -> bool {
        match value {
            Value::Object(id) => self.object(*id).is_callable(),
            _ => false,
        }
    }

    pub fn get_prototype_of(&self, id: ObjectId) -> Option<ObjectId> {
        self.object(id).proto
    }

    pub fn is_extensible(&self, id: ObjectId) -> bool {
        self.object(id).extensible
    }

    pub fn prevent_extensions(&mut self, id: ObjectId) {
        self.object_mut(id).extensible = false;
    }

    /// Make every own property non-writable and non-configurable and
    /// prevent extensions
    ///
    /// Array elements are always plain data, so arrays with elements
    /// cannot be frozen.
    pub fn freeze(&mut self, id: ObjectId) -> JsResult<()> {
        let obj = self.object_mut(id);
        if let ObjectData::Array(arr) = &obj.data {
            if !arr.is_empty() {
                return Err(JsError::type_error("Cannot freeze array elements"));
            }
        }
        obj.extensible = false;
        for prop in obj.props.iter_mut() {
            prop.flags = prop.flags.without_writable().without_configurable();
        }
        Ok(())
    }

    /// Own property lookup
    pub fn get_own_property(&self, id: ObjectId, key: &PropertyKey) -> Option<PropertyDescriptor> {
        self.object(id).get_own_property(key)
    }

    /// Property lookup along the prototype chain
    pub fn get_property(&self, id: ObjectId, key: &PropertyKey) -> Option<PropertyDescriptor> {
        let mut current = Some(id);
        while let Some(obj_id) = current {
            let obj = self.object(obj_id);
            if let Some(desc) = obj.get_own_property(key) {
                return Some(desc);
            }
            current = obj.proto;
        }
        None
    }

    pub fn has_own_property(&self, id: ObjectId, key: &PropertyKey) -> bool {
        self.get_own_property(id, key).is_some()
    }

    /// The `in` operator
    pub fn has_property(&self, id: ObjectId, key: &PropertyKey) -> bool {
        self.get_property(id, key).is_some()
    }

    pub fn define_own_property(
        &mut self,
        id: ObjectId,
        key: impl Into<PropertyKey>,
        desc: PropertyDescriptor,
    ) -> JsResult<()> {
        self.object_mut(id).define_own_property(key.into(), desc)
    }

    pub fn own_property_keys(&self, id: ObjectId) -> Vec<PropertyKey> {
        self.object(id).own_property_keys()
    }

    /// [[Get]] on an object; undefined when absent
    pub fn get(&self, id: ObjectId, key: &PropertyKey) -> Value {
        self.get_property(id, key).map(|desc| desc.value).unwrap_or_default()
    }

    /// GetV: property read on any value, looking primitives up on their
    /// prototype without boxing them
    pub fn get_v(&self, value: &Value, key: &PropertyKey) -> JsResult<Value> {
        let proto = match value {
            Value::Object(id) => return Ok(self.get(*id, key)),
            Value::Undefined | Value::Null => {
                return Err(JsError::type_error(format!(
                    "Cannot read properties of {} (reading '{}')",
                    value, key
                )));
            }
            Value::String(s) => {
                if key.is_str("length") {
                    return Ok(Value::from(s.len() as u32));
                }
                if let Some(cu) = key.as_array_index().and_then(|i| s.code_unit_at(i as usize)) {
                    return Ok(Value::String(JSString::from_code_unit(cu)));
                }
                self.intrinsics.string_prototype
            }
            Value::Bool(_) => self.intrinsics.boolean_prototype,
            Value::Number(_) => self.intrinsics.number_prototype,
            Value::Symbol(_) => self.intrinsics.symbol_prototype,
        };
        Ok(self.get(proto, key))
    }

    /// [[Set]] with strict-mode failure semantics
    pub fn set(&mut self, id: ObjectId, key: impl Into<PropertyKey>, value: Value) -> JsResult<()> {
        let key = key.into();
        let flags = match self.get_own_property(id, &key) {
            Some(own) => {
                if !own.writable() {
                    return Err(read_only_error(&key));
                }
                own.flags
            }
            None => {
                if let Some(inherited) = self.get_property(id, &key) {
                    if !inherited.writable() {
                        return Err(read_only_error(&key));
                    }
                }
                if !self.is_extensible(id) {
                    return Err(JsError::type_error(format!(
                        "Cannot add property {}, object is not extensible",
                        key
                    )));
                }
                PropertyFlags::DEFAULT
            }
        };
        self.define_own_property(id, key, PropertyDescriptor::new(value, flags))
    }

    /// [[Delete]] with strict-mode failure semantics
    pub fn delete(&mut self, id: ObjectId, key: &PropertyKey) -> JsResult<()> {
        if self.object_mut(id).delete(key) {
            Ok(())
        } else {
            Err(JsError::type_error(format!("Cannot delete property '{}' of object", key)))
        }
    }

    /// Call a function value
    pub fn call(&mut self, callee: &Value, this: Value, args: &[Value]) -> JsResult<Value> {
        let func = match callee {
            Value::Object(id) => self.object(*id).as_function(),
            _ => None,
        };
        match func {
            Some(f) => f.call(self, this, args),
            None => Err(JsError::type_error(format!(
                "{} is not a function",
                conv::describe(self, callee)
            ))),
        }
    }

    /// Method call: look `name` up on `receiver` and call it with
    /// `receiver` as `this`
    pub fn invoke(
        &mut self,
        receiver: &Value,
        name: impl Into<PropertyKey>,
        args: &[Value],
    ) -> JsResult<Value> {
        let key = name.into();
        let method = self.get_v(receiver, &key)?;
        if !self.is_callable(&method) {
            return Err(JsError::type_error(format!(
                "{}.{} is not a function",
                conv::describe(self, receiver),
                key
            )));
        }
        self.call(&method, receiver.clone(), args)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

fn read_only_error(key: &PropertyKey) -> JsError {
    JsError::type_error(format!("Cannot assign to read only property '{}' of object", key))
}
