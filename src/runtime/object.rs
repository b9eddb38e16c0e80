//! JavaScript object representation
//!
//! A `JSObject` is a prototype link, an extensible flag, a property table
//! and class-specific data. Arrays and String wrappers are exotic: their
//! index keys and `length` are served from the class data rather than the
//! property table.

use crate::conv::same_value;
use crate::error::{ErrorKind, JsError, JsResult};
use crate::runtime::array::{JSArray, MAX_ARRAY_LENGTH};
use crate::runtime::function::NativeFunction;
use crate::runtime::property::{PropertyDescriptor, PropertyFlags, PropertyKey, PropertyTable};
use crate::runtime::string::JSString;
use crate::value::{Symbol, Value};

/// Handle to an object in the context's heap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

impl ObjectId {
    #[inline]
    pub const fn from_index(index: u32) -> Self {
        ObjectId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// JavaScript class IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassId {
    /// Plain object
    Object,
    Array,
    /// Native function
    Function,
    /// Boxed Boolean
    Boolean,
    /// Boxed Number
    Number,
    /// Boxed String
    String,
    /// Boxed Symbol
    Symbol,
    Error,
}

/// Class-specific object data
#[derive(Debug, Clone)]
pub enum ObjectData {
    Ordinary,
    Array(JSArray),
    Function(NativeFunction),
    Boolean(bool),
    Number(f64),
    String(JSString),
    Symbol(Symbol),
    Error(ErrorKind),
}

/// JavaScript object
#[derive(Debug, Clone)]
pub struct JSObject {
    /// Prototype of this object
    pub proto: Option<ObjectId>,
    /// Whether new own properties may be added
    pub extensible: bool,
    pub props: PropertyTable,
    pub data: ObjectData,
}

impl JSObject {
    pub fn new(proto: Option<ObjectId>, data: ObjectData) -> Self {
        JSObject {
            proto,
            extensible: true,
            props: PropertyTable::new(),
            data,
        }
    }

    /// Plain object with the given prototype
    pub fn ordinary(proto: Option<ObjectId>) -> Self {
        Self::new(proto, ObjectData::Ordinary)
    }

    pub fn class_id(&self) -> ClassId {
        match self.data {
            ObjectData::Ordinary => ClassId::Object,
            ObjectData::Array(_) => ClassId::Array,
            ObjectData::Function(_) => ClassId::Function,
            ObjectData::Boolean(_) => ClassId::Boolean,
            ObjectData::Number(_) => ClassId::Number,
            ObjectData::String(_) => ClassId::String,
            ObjectData::Symbol(_) => ClassId::Symbol,
            ObjectData::Error(_) => ClassId::Error,
        }
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self.data, ObjectData::Array(_))
    }

    #[inline]
    pub fn is_callable(&self) -> bool {
        matches!(self.data, ObjectData::Function(_))
    }

    /// The native function behind a callable object
    #[inline]
    pub fn as_function(&self) -> Option<NativeFunction> {
        match self.data {
            ObjectData::Function(f) => Some(f),
            _ => None,
        }
    }

    /// [[GetOwnProperty]]
    pub fn get_own_property(&self, key: &PropertyKey) -> Option<PropertyDescriptor> {
        match &self.data {
            ObjectData::Array(arr) => {
                if let Some(index) = key.as_array_index() {
                    return arr
                        .get(index)
                        .map(|v| PropertyDescriptor::new(v.clone(), PropertyFlags::DEFAULT));
                }
                if key.is_str("length") {
                    return Some(PropertyDescriptor::new(
                        Value::from(arr.len()),
                        PropertyFlags::new(false, false, true),
                    ));
                }
            }
            ObjectData::String(s) => {
                if let Some(index) = key.as_array_index() {
                    if let Some(cu) = s.code_unit_at(index as usize) {
                        return Some(PropertyDescriptor::new(
                            Value::String(JSString::from_code_unit(cu)),
                            PropertyFlags::new(false, true, false),
                        ));
                    }
                }
                if key.is_str("length") {
                    return Some(PropertyDescriptor::new(
                        Value::from(s.len() as u32),
                        PropertyFlags::NONE,
                    ));
                }
            }
            _ => {}
        }
        self.props.get(key).map(|p| p.descriptor())
    }

    /// [[DefineOwnProperty]] for complete data descriptors
    ///
    /// Applies ValidateAndApplyPropertyDescriptor: a non-configurable
    /// property can only be re-asserted (or, while writable, have its value
    /// or writability lowered), and non-extensible objects reject new keys.
    pub fn define_own_property(&mut self, key: PropertyKey, desc: PropertyDescriptor) -> JsResult<()> {
        let current = self.get_own_property(&key);
        validate_property_update(&key, current.as_ref(), &desc, self.extensible)?;

        if let ObjectData::Array(arr) = &mut self.data {
            if let Some(index) = key.as_array_index() {
                if desc.flags != PropertyFlags::DEFAULT {
                    return Err(redefine_error(&key));
                }
                if !arr.set(index, desc.value) {
                    return Err(JsError::range_error("Invalid array length"));
                }
                return Ok(());
            }
            if key.is_str("length") {
                let new_len = array_length_from_value(&desc.value)?;
                if desc.flags != PropertyFlags::new(false, false, true) {
                    return Err(redefine_error(&key));
                }
                arr.set_length(new_len);
                return Ok(());
            }
        }

        if let ObjectData::String(s) = &self.data {
            // Index and length properties are frozen, validation already
            // guaranteed the update is a no-op.
            let is_exotic = key.is_str("length")
                || key.as_array_index().is_some_and(|i| (i as usize) < s.len());
            if is_exotic {
                return Ok(());
            }
        }

        self.props.set(key, desc.value, desc.flags);
        Ok(())
    }

    /// [[Delete]]; returns false for non-configurable properties
    pub fn delete(&mut self, key: &PropertyKey) -> bool {
        match self.get_own_property(key) {
            None => true,
            Some(desc) if !desc.configurable() => false,
            Some(_) => {
                if let ObjectData::Array(arr) = &mut self.data {
                    if let Some(index) = key.as_array_index() {
                        // No holes: a deleted element reads as undefined
                        arr.set(index, Value::Undefined);
                        return true;
                    }
                }
                self.props.delete(key)
            }
        }
    }

    /// [[OwnPropertyKeys]]: array indices ascending, then strings in
    /// insertion order, then symbols in insertion order
    pub fn own_property_keys(&self) -> Vec<PropertyKey> {
        let mut indices: Vec<u32> = Vec::new();
        let mut strings: Vec<PropertyKey> = Vec::new();
        let mut symbols: Vec<PropertyKey> = Vec::new();

        match &self.data {
            ObjectData::Array(arr) => {
                indices.extend(0..arr.len());
                strings.push(PropertyKey::from("length"));
            }
            ObjectData::String(s) => {
                indices.extend(0..s.len() as u32);
                strings.push(PropertyKey::from("length"));
            }
            _ => {}
        }

        for key in self.props.keys() {
            match key {
                PropertyKey::Symbol(_) => symbols.push(key.clone()),
                PropertyKey::String(_) => match key.as_array_index() {
                    Some(index) => indices.push(index),
                    None => strings.push(key.clone()),
                },
            }
        }

        indices.sort_unstable();
        indices
            .into_iter()
            .map(PropertyKey::from_index)
            .chain(strings)
            .chain(symbols)
            .collect()
    }
}

fn redefine_error(key: &PropertyKey) -> JsError {
    JsError::type_error(format!("Cannot redefine property: {}", key))
}

/// ValidateAndApplyPropertyDescriptor, validation half
fn validate_property_update(
    key: &PropertyKey,
    current: Option<&PropertyDescriptor>,
    desc: &PropertyDescriptor,
    extensible: bool,
) -> JsResult<()> {
    let Some(current) = current else {
        if extensible {
            return Ok(());
        }
        return Err(JsError::type_error(format!(
            "Cannot define property {}, object is not extensible",
            key
        )));
    };

    if current.configurable() {
        return Ok(());
    }
    if desc.configurable() || desc.enumerable() != current.enumerable() {
        return Err(redefine_error(key));
    }
    if !current.writable() && (desc.writable() || !same_value(&desc.value, &current.value)) {
        return Err(redefine_error(key));
    }
    Ok(())
}

/// Validate a value assigned to an array's `length`
fn array_length_from_value(value: &Value) -> JsResult<u32> {
    match value {
        Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n <= MAX_ARRAY_LENGTH as f64 => {
            Ok(*n as u32)
        }
        _ => Err(JsError::range_error("Invalid array length")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> PropertyKey {
        PropertyKey::from(s)
    }

    fn array(values: &[i32]) -> JSObject {
        let values = values.iter().map(|&v| Value::from(v)).collect();
        JSObject::new(None, ObjectData::Array(JSArray::from_values(values)))
    }

    #[test]
    fn test_class_id() {
        assert_eq!(JSObject::ordinary(None).class_id(), ClassId::Object);
        assert_eq!(array(&[]).class_id(), ClassId::Array);
        assert_eq!(
            JSObject::new(None, ObjectData::Error(ErrorKind::TypeError)).class_id(),
            ClassId::Error
        );
        assert!(!JSObject::ordinary(None).is_callable());
    }

    #[test]
    fn test_define_and_get() {
        let mut obj = JSObject::ordinary(None);
        obj.define_own_property(key("a"), PropertyDescriptor::new(Value::from(1), PropertyFlags::DEFAULT))
            .unwrap();
        let desc = obj.get_own_property(&key("a")).unwrap();
        assert_eq!(desc.value, Value::from(1));
        assert!(desc.writable() && desc.enumerable() && desc.configurable());
    }

    #[test]
    fn test_non_configurable_cannot_be_redefined() {
        let mut obj = JSObject::ordinary(None);
        obj.define_own_property(key("k"), PropertyDescriptor::new(Value::from(1), PropertyFlags::NONE))
            .unwrap();

        // Re-asserting the same frozen property is allowed
        obj.define_own_property(key("k"), PropertyDescriptor::new(Value::from(1), PropertyFlags::NONE))
            .unwrap();

        let err = obj
            .define_own_property(key("k"), PropertyDescriptor::new(Value::from(2), PropertyFlags::NONE))
            .unwrap_err();
        assert_eq!(err, JsError::type_error("Cannot redefine property: k"));

        let err = obj
            .define_own_property(key("k"), PropertyDescriptor::new(Value::from(1), PropertyFlags::BUILTIN))
            .unwrap_err();
        assert!(matches!(err, JsError::Type(_)));
    }

    #[test]
    fn test_non_extensible_rejects_new_keys() {
        let mut obj = JSObject::ordinary(None);
        obj.extensible = false;
        let err = obj
            .define_own_property(key("x"), PropertyDescriptor::new(Value::Null, PropertyFlags::DEFAULT))
            .unwrap_err();
        assert_eq!(
            err,
            JsError::type_error("Cannot define property x, object is not extensible")
        );
    }

    #[test]
    fn test_array_exotic_properties() {
        let mut arr = array(&[10, 20]);
        assert_eq!(arr.get_own_property(&key("1")).unwrap().value, Value::from(20));
        let len = arr.get_own_property(&key("length")).unwrap();
        assert_eq!(len.value, Value::from(2));
        assert!(len.writable() && !len.enumerable() && !len.configurable());

        arr.define_own_property(PropertyKey::from_index(4), PropertyDescriptor::new(Value::from(5), PropertyFlags::DEFAULT))
            .unwrap();
        assert_eq!(arr.get_own_property(&key("length")).unwrap().value, Value::from(5));
        assert_eq!(arr.get_own_property(&key("3")).unwrap().value, Value::Undefined);

        arr.define_own_property(key("length"), PropertyDescriptor::new(Value::from(1), PropertyFlags::new(false, false, true)))
            .unwrap();
        assert!(arr.get_own_property(&key("1")).is_none());

        let err = arr
            .define_own_property(key("length"), PropertyDescriptor::new(Value::from(-1), PropertyFlags::new(false, false, true)))
            .unwrap_err();
        assert_eq!(err, JsError::range_error("Invalid array length"));
    }

    #[test]
    fn test_string_wrapper_properties() {
        let obj = JSObject::new(None, ObjectData::String(JSString::from("ab")));
        let desc = obj.get_own_property(&key("0")).unwrap();
        assert_eq!(desc.value, Value::from("a"));
        assert!(desc.enumerable() && !desc.writable() && !desc.configurable());
        assert_eq!(obj.get_own_property(&key("length")).unwrap().value, Value::from(2));
        assert!(obj.get_own_property(&key("2")).is_none());
    }

    #[test]
    fn test_own_property_keys_order() {
        let mut obj = JSObject::ordinary(None);
        let sym = Symbol::new(Some("s"));
        for k in [key("b"), PropertyKey::Symbol(sym.clone()), key("2"), key("a"), key("0")] {
            obj.define_own_property(k, PropertyDescriptor::new(Value::Null, PropertyFlags::DEFAULT))
                .unwrap();
        }
        let keys = obj.own_property_keys();
        assert_eq!(
            keys,
            vec![key("0"), key("2"), key("b"), key("a"), PropertyKey::Symbol(sym)]
        );

        let arr = array(&[1, 2]);
        assert_eq!(arr.own_property_keys(), vec![key("0"), key("1"), key("length")]);
    }

    #[test]
    fn test_delete() {
        let mut obj = JSObject::ordinary(None);
        obj.define_own_property(key("a"), PropertyDescriptor::new(Value::Null, PropertyFlags::DEFAULT))
            .unwrap();
        obj.define_own_property(key("b"), PropertyDescriptor::new(Value::Null, PropertyFlags::NONE))
            .unwrap();
        assert!(obj.delete(&key("a")));
        assert!(!obj.delete(&key("b")));
        assert!(obj.delete(&key("missing")));
        assert!(obj.get_own_property(&key("a")).is_none());

        let mut arr = array(&[1]);
        assert!(!arr.delete(&key("length")));
    }
}
