//! Dynamically typed graph values
//!
//! Vertex ids, vertex values, edge values and messages are user-defined types
//! that are unknown when this crate is built. Every such type advertises its
//! own binary layout through [`TypedValue`]; the rest of the crate handles
//! them as `Box<dyn Value>` and only ever orchestrates their bytes.

pub mod builtin;
pub mod codec;
pub mod registry;

pub use builtin::{
    BoolValue, DoubleValue, FloatValue, IntValue, LongListValue, LongValue, NullValue, TextValue,
};
pub use registry::{BuiltinType, Computation, ResolvedType, Slot, TypeDescriptor, TypeRegistry};

use crate::error::CodecError;
use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::fmt;

/// A value type with a stable name and a self-describing binary layout.
///
/// `Default` is the default-construction capability used on the read path:
/// an empty instance is created first and then populated from bytes.
pub trait TypedValue:
    Default + Clone + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Fully-qualified name persisted in trace files.
    const TYPE_NAME: &'static str;

    fn write_bytes(&self, out: &mut Vec<u8>) -> Result<(), CodecError>;

    fn read_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError>;
}

/// Object-safe view over any [`TypedValue`].
pub trait Value: Any + Send + Sync + fmt::Debug + fmt::Display {
    fn type_name(&self) -> &'static str;

    fn write_bytes(&self, out: &mut Vec<u8>) -> Result<(), CodecError>;

    fn read_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError>;

    fn clone_value(&self) -> Box<dyn Value>;

    fn eq_value(&self, other: &dyn Value) -> bool;

    fn as_any(&self) -> &dyn Any;
}

impl<T: TypedValue> Value for T {
    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn write_bytes(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        TypedValue::write_bytes(self, out)
    }

    fn read_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        TypedValue::read_bytes(self, bytes)
    }

    fn clone_value(&self) -> Box<dyn Value> {
        Box::new(self.clone())
    }

    fn eq_value(&self, other: &dyn Value) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Clone for Box<dyn Value> {
    fn clone(&self) -> Self {
        self.clone_value()
    }
}

/// Dynamic equality over optional values.
pub fn same_value(a: Option<&dyn Value>, b: Option<&dyn Value>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_value(b),
        (None, None) => true,
        _ => false,
    }
}

impl<'a> dyn Value + 'a {
    /// Downcast to a concrete value type.
    pub fn downcast_ref<T: TypedValue>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Bincode settings shared by the serde-backed value layouts.
///
/// Fixed-width big-endian integers, and trailing bytes are a decode error so
/// that a value of the wrong type is rejected instead of half-read.
fn layout_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_big_endian()
        .reject_trailing_bytes()
}

/// Append the serde layout of `value` to `out`.
///
/// Helper for value types whose binary layout is their serde form.
pub fn write_serde<T: Serialize>(
    value: &T,
    type_name: &str,
    out: &mut Vec<u8>,
) -> Result<(), CodecError> {
    layout_options()
        .serialize_into(&mut *out, value)
        .map_err(|_| CodecError::NotSerializable(type_name.to_string()))
}

/// Read a serde layout written by [`write_serde`].
pub fn read_serde<T: DeserializeOwned>(bytes: &[u8], type_name: &str) -> Result<T, CodecError> {
    layout_options()
        .deserialize(bytes)
        .map_err(|e| CodecError::Malformed {
            type_name: type_name.to_string(),
            reason: e.to_string(),
        })
}
