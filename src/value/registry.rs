//! Type descriptors and the type registry
//!
//! Trace files persist type names, not types. On load each name is resolved
//! through a [`TypeRegistry`] supplied by the host application at startup;
//! the registry also checks that the resolved type has the capability its
//! slot requires (ordering for vertex ids, a value layout for values).

use super::builtin::{
    BoolValue, DoubleValue, FloatValue, IntValue, LongListValue, LongValue, NullValue, TextValue,
};
use super::{TypedValue, Value};
use crate::error::{CodecError, ScenarioError};
use std::collections::HashMap;
use std::fmt;

/// Marker for user computation logic that can be named in a trace.
pub trait Computation: Send + Sync + 'static {
    const TYPE_NAME: &'static str;
}

/// Built-in value kinds known to every registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Null,
    Bool,
    Int,
    Long,
    Float,
    Double,
    Text,
    LongList,
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 8] = [
        BuiltinType::Null,
        BuiltinType::Bool,
        BuiltinType::Int,
        BuiltinType::Long,
        BuiltinType::Float,
        BuiltinType::Double,
        BuiltinType::Text,
        BuiltinType::LongList,
    ];

    pub fn type_name(self) -> &'static str {
        match self {
            BuiltinType::Null => NullValue::TYPE_NAME,
            BuiltinType::Bool => BoolValue::TYPE_NAME,
            BuiltinType::Int => IntValue::TYPE_NAME,
            BuiltinType::Long => LongValue::TYPE_NAME,
            BuiltinType::Float => FloatValue::TYPE_NAME,
            BuiltinType::Double => DoubleValue::TYPE_NAME,
            BuiltinType::Text => TextValue::TYPE_NAME,
            BuiltinType::LongList => LongListValue::TYPE_NAME,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.type_name() == name)
    }
}

/// A resolvable reference to a concrete value or computation type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Builtin(BuiltinType),
    Named(String),
}

impl TypeDescriptor {
    /// Descriptor for a value type; built-in kinds map to their variant.
    pub fn of<T: TypedValue>() -> Self {
        Self::from_name(T::TYPE_NAME)
    }

    pub fn computation<C: Computation>() -> Self {
        TypeDescriptor::Named(C::TYPE_NAME.to_string())
    }

    pub fn from_name(name: &str) -> Self {
        match BuiltinType::from_name(name) {
            Some(builtin) => TypeDescriptor::Builtin(builtin),
            None => TypeDescriptor::Named(name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TypeDescriptor::Builtin(builtin) => builtin.type_name(),
            TypeDescriptor::Named(name) => name,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TypeDescriptor::Builtin(BuiltinType::Null))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The position a type occupies in a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Computation,
    VertexId,
    VertexValue,
    EdgeValue,
    InboundMessage,
    OutboundMessage,
}

impl Slot {
    pub fn as_str(self) -> &'static str {
        match self {
            Slot::Computation => "computation",
            Slot::VertexId => "vertex_id",
            Slot::VertexValue => "vertex_value",
            Slot::EdgeValue => "edge_value",
            Slot::InboundMessage => "inbound_message",
            Slot::OutboundMessage => "outbound_message",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Factory = fn() -> Box<dyn Value>;

fn construct<T: TypedValue>() -> Box<dyn Value> {
    Box::new(T::default())
}

#[derive(Debug, Clone, Copy)]
enum EntryKind {
    Computation,
    Null,
    Value { factory: Factory, ordered: bool },
}

/// A type name resolved against a registry for a particular slot.
#[derive(Debug, Clone)]
pub struct ResolvedType {
    descriptor: TypeDescriptor,
    kind: EntryKind,
}

impl ResolvedType {
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn is_null(&self) -> bool {
        matches!(self.kind, EntryKind::Null)
    }

    /// Default-construct an empty instance; `None` for the sentinel type.
    pub fn new_instance(&self) -> Result<Option<Box<dyn Value>>, CodecError> {
        match self.kind {
            EntryKind::Value { factory, .. } => Ok(Some(factory())),
            EntryKind::Null => Ok(None),
            EntryKind::Computation => Err(CodecError::NotConstructible(self.name().to_string())),
        }
    }
}

/// Registry of value and computation types, keyed by persisted name.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    entries: HashMap<String, EntryKind>,
    /// Resolve any name in the computation slot.
    any_computation: bool,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create a registry with every [`BuiltinType`] pre-registered.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: HashMap::new(),
            any_computation: false,
        };
        registry
            .entries
            .insert(NullValue::TYPE_NAME.to_string(), EntryKind::Null);
        registry.register_vertex_id::<BoolValue>();
        registry.register_vertex_id::<IntValue>();
        registry.register_vertex_id::<LongValue>();
        registry.register_vertex_id::<TextValue>();
        registry.register_value::<FloatValue>();
        registry.register_value::<DoubleValue>();
        registry.register_value::<LongListValue>();
        registry
    }

    /// Register a value type usable for vertex values, edges and messages.
    pub fn register_value<T: TypedValue>(&mut self) -> &mut Self {
        self.entries.insert(
            T::TYPE_NAME.to_string(),
            EntryKind::Value {
                factory: construct::<T>,
                ordered: false,
            },
        );
        self
    }

    /// Register an ordered value type; it is also usable as a vertex id.
    pub fn register_vertex_id<T: TypedValue + Ord>(&mut self) -> &mut Self {
        self.entries.insert(
            T::TYPE_NAME.to_string(),
            EntryKind::Value {
                factory: construct::<T>,
                ordered: true,
            },
        );
        self
    }

    pub fn register_computation<C: Computation>(&mut self) -> &mut Self {
        self.register_computation_name(C::TYPE_NAME)
    }

    /// Register a computation known only by name, e.g. logic hosted elsewhere.
    pub fn register_computation_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.entries.insert(name.into(), EntryKind::Computation);
        self
    }

    /// Accept unregistered computation names.
    ///
    /// For readers that only inspect traces and never run the computation.
    pub fn accept_any_computation(&mut self) -> &mut Self {
        self.any_computation = true;
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Resolve a persisted type name for `slot`.
    pub fn resolve(&self, name: &str, slot: Slot) -> Result<ResolvedType, ScenarioError> {
        let kind = match self.entries.get(name) {
            Some(kind) => *kind,
            None if slot == Slot::Computation && self.any_computation => EntryKind::Computation,
            None => {
                return Err(ScenarioError::UnresolvedType {
                    slot,
                    name: name.to_string(),
                })
            }
        };

        let satisfied = match (slot, kind) {
            (Slot::Computation, EntryKind::Computation) => true,
            (Slot::VertexId, EntryKind::Value { ordered, .. }) => ordered,
            (Slot::EdgeValue, EntryKind::Null) => true,
            (
                Slot::VertexValue | Slot::EdgeValue | Slot::InboundMessage | Slot::OutboundMessage,
                EntryKind::Value { .. },
            ) => true,
            _ => false,
        };

        if !satisfied {
            return Err(ScenarioError::TypeConstraint {
                slot,
                name: name.to_string(),
                required: required_capability(slot),
            });
        }

        Ok(ResolvedType {
            descriptor: TypeDescriptor::from_name(name),
            kind,
        })
    }
}

fn required_capability(slot: Slot) -> &'static str {
    match slot {
        Slot::Computation => "a registered computation",
        Slot::VertexId => "an ordered, serializable value type",
        Slot::EdgeValue => "a serializable value type or the null sentinel",
        _ => "a serializable value type",
    }
}
