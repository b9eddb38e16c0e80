//! Capability registry
//!
//! A table of every extension the shim provides, keyed by the target it
//! extends and the name it is installed under. A registry is plain data:
//! it can be built fresh, queried and called into without touching any
//! context, and installed onto as many contexts as needed.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use crate::builtins;
use crate::context::Context;
use crate::error::{JsError, JsResult};
use crate::install::{InstallDecision, define_internal};
use crate::runtime::{NativeFunction, ObjectId};
use crate::value::Value;

/// An Extension Target: a host object capabilities are attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    Number,
    Object,
    ArrayPrototype,
    StringPrototype,
    Math,
    RegExp,
}

impl Target {
    pub const ALL: [Target; 6] = [
        Target::Number,
        Target::Object,
        Target::ArrayPrototype,
        Target::StringPrototype,
        Target::Math,
        Target::RegExp,
    ];

    /// The context's object for this target
    pub fn resolve(self, ctx: &Context) -> ObjectId {
        let intr = ctx.intrinsics();
        match self {
            Target::Number => intr.number_constructor,
            Target::Object => intr.object_constructor,
            Target::ArrayPrototype => intr.array_prototype,
            Target::StringPrototype => intr.string_prototype,
            Target::Math => intr.math,
            Target::RegExp => intr.regexp_constructor,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Target::Number => "Number",
            Target::Object => "Object",
            Target::ArrayPrototype => "Array.prototype",
            Target::StringPrototype => "String.prototype",
            Target::Math => "Math",
            Target::RegExp => "RegExp",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a capability installs
///
/// Constants must be primitives: object handles belong to one context and
/// a registry is shared between contexts. [`CapabilityRegistry::register`]
/// rejects object constants.
#[derive(Debug, Clone)]
pub enum CapabilityKind {
    Function(NativeFunction),
    Constant(Value),
}

/// A registered extension
#[derive(Debug, Clone)]
pub struct Capability {
    pub target: Target,
    pub name: &'static str,
    pub kind: CapabilityKind,
}

impl Capability {
    /// The declared name of a function capability
    pub fn declared_name(&self) -> Option<&'static str> {
        match &self.kind {
            CapabilityKind::Function(f) => Some(f.name),
            CapabilityKind::Constant(_) => None,
        }
    }

    fn materialize(&self, ctx: &mut Context) -> Value {
        match &self.kind {
            CapabilityKind::Function(f) => Value::Object(ctx.new_function(*f)),
            CapabilityKind::Constant(v) => v.clone(),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.target, self.name)
    }
}

/// Names touched by an install pass, as `Target.name`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub installed: Vec<String>,
    pub skipped: Vec<String>,
}

/// Capability table
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    entries: BTreeMap<Target, BTreeMap<&'static str, Capability>>,
}

impl CapabilityRegistry {
    /// Empty registry
    pub fn new() -> Self {
        CapabilityRegistry { entries: BTreeMap::new() }
    }

    /// Registry holding every capability the shim provides
    pub fn standard() -> Self {
        let mut registry = CapabilityRegistry::new();
        builtins::register_all(&mut registry);
        registry
    }

    /// Add a capability, returning the one it replaced
    ///
    /// Fails with a TypeError for an object constant, whose handle would
    /// not be valid in other contexts.
    pub fn register(
        &mut self,
        target: Target,
        name: &'static str,
        kind: CapabilityKind,
    ) -> JsResult<Option<Capability>> {
        if let CapabilityKind::Constant(Value::Object(_)) = kind {
            return Err(JsError::type_error(format!(
                "{}.{}: constants must be primitive values",
                target, name
            )));
        }
        Ok(self.insert(Capability { target, name, kind }))
    }

    /// Add a native function under `name`
    pub fn register_function(
        &mut self,
        target: Target,
        name: &'static str,
        f: NativeFunction,
    ) -> Option<Capability> {
        self.insert(Capability { target, name, kind: CapabilityKind::Function(f) })
    }

    fn insert(&mut self, cap: Capability) -> Option<Capability> {
        self.entries.entry(cap.target).or_default().insert(cap.name, cap)
    }

    pub fn get(&self, target: Target, name: &str) -> Option<&Capability> {
        self.entries.get(&target)?.get(name)
    }

    /// Capabilities in target then name order
    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.entries.values().flat_map(BTreeMap::values)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Install every capability whose name is not already present
    pub fn install(&self, ctx: &mut Context) -> JsResult<InstallReport> {
        self.install_impl(ctx, false)
    }

    /// Install every capability, replacing existing properties
    pub fn install_with_override(&self, ctx: &mut Context) -> JsResult<InstallReport> {
        self.install_impl(ctx, true)
    }

    fn install_impl(&self, ctx: &mut Context, override_existing: bool) -> JsResult<InstallReport> {
        debug!("installing {} capabilities (override: {})", self.len(), override_existing);
        let mut report = InstallReport::default();
        for cap in self.iter() {
            let target = cap.target.resolve(ctx);
            let value = cap.materialize(ctx);
            match define_internal(ctx, target, cap.name, value, override_existing)? {
                InstallDecision::Skip => report.skipped.push(cap.to_string()),
                _ => report.installed.push(cap.to_string()),
            }
        }
        debug!(
            "installed {}, skipped {}",
            report.installed.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Call a registered function directly, without installing it
    pub fn call(
        &self,
        ctx: &mut Context,
        target: Target,
        name: &str,
        this: Value,
        args: &[Value],
    ) -> JsResult<Value> {
        match self.get(target, name).map(|cap| &cap.kind) {
            Some(CapabilityKind::Function(f)) => f.call(ctx, this, args),
            Some(CapabilityKind::Constant(_)) => {
                Err(JsError::type_error(format!("{}.{} is not a function", target, name)))
            }
            None => Err(JsError::type_error(format!("{}.{} is not registered", target, name))),
        }
    }
}
