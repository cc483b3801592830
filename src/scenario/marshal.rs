//! Scenario marshaling
//!
//! Converts a [`Scenario`] to and from the canonical trace encoding. Type
//! descriptors are persisted by name so a trace file is self-describing; on
//! load every name is resolved through the [`TypeRegistry`] and each payload
//! is decoded into a default-constructed instance of its resolved type.
//!
//! Failures are whole-record: `from_bytes` either returns a complete scenario
//! or an error naming the field that failed.

use super::record::{ContextRecord, NeighborRecord, OutboundRecord, ScenarioRecord};
use super::{Context, Neighbor, OutboundMessage, Scenario, ScenarioTypes};
use crate::error::{CodecError, ScenarioError};
use crate::value::codec;
use crate::value::{ResolvedType, Slot, TypeDescriptor, TypeRegistry, Value};
use bincode::Options;
use std::sync::Arc;
use tracing::debug;

/// Version written into every trace record.
pub const TRACE_FORMAT_VERSION: u32 = 1;

fn record_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Resolved types for every slot of a record being loaded.
struct SlotTypes {
    vertex_id: ResolvedType,
    vertex_value: ResolvedType,
    edge_value: ResolvedType,
    inbound_message: ResolvedType,
    outbound_message: ResolvedType,
}

/// Reads and writes trace records. Holds no mutable state; share freely.
#[derive(Debug, Clone)]
pub struct ScenarioMarshaler {
    registry: Arc<TypeRegistry>,
}

impl ScenarioMarshaler {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Encode a scenario.
    ///
    /// Every embedded value must have the runtime type declared for its slot.
    pub fn to_bytes(&self, scenario: &Scenario) -> Result<Vec<u8>, ScenarioError> {
        let types = &scenario.types;
        let ctx = &scenario.context;

        let mut neighbors = Vec::with_capacity(ctx.neighbors.len());
        for (i, neighbor) in ctx.neighbors.iter().enumerate() {
            // A null sentinel edge is written as absent.
            let edge_value = match neighbor.edge() {
                Some(value) => Some(encode_as(
                    value,
                    &types.edge_value,
                    format!("context.neighbors[{}].edge_value", i),
                )?),
                None => None,
            };
            neighbors.push(NeighborRecord {
                neighbor_id: encode_as(
                    &*neighbor.id,
                    &types.vertex_id,
                    format!("context.neighbors[{}].neighbor_id", i),
                )?,
                edge_value,
            });
        }

        let mut inbound_messages = Vec::with_capacity(ctx.inbound_messages.len());
        for (i, message) in ctx.inbound_messages.iter().enumerate() {
            inbound_messages.push(encode_as(
                &**message,
                &types.inbound_message,
                format!("context.inbound_messages[{}]", i),
            )?);
        }

        let mut outbound_messages = Vec::with_capacity(ctx.outbound_messages.len());
        for (i, out) in ctx.outbound_messages.iter().enumerate() {
            outbound_messages.push(OutboundRecord {
                destination_id: encode_as(
                    &*out.destination,
                    &types.vertex_id,
                    format!("context.outbound_messages[{}].destination_id", i),
                )?,
                message: encode_as(
                    &*out.message,
                    &types.outbound_message,
                    format!("context.outbound_messages[{}].message", i),
                )?,
            });
        }

        let record = ScenarioRecord {
            version: TRACE_FORMAT_VERSION,
            computation_type: types.computation.name().to_string(),
            vertex_id_type: types.vertex_id.name().to_string(),
            vertex_value_type: types.vertex_value.name().to_string(),
            edge_value_type: types.edge_value.name().to_string(),
            inbound_message_type: types.inbound_message.name().to_string(),
            outbound_message_type: types.outbound_message.name().to_string(),
            context: ContextRecord {
                step: ctx.step,
                vertex_id: encode_as(&*ctx.vertex_id, &types.vertex_id, "context.vertex_id")?,
                vertex_value_before: encode_as(
                    &*ctx.vertex_value_before,
                    &types.vertex_value,
                    "context.vertex_value_before",
                )?,
                vertex_value_after: encode_as(
                    &*ctx.vertex_value_after,
                    &types.vertex_value,
                    "context.vertex_value_after",
                )?,
                neighbors,
                inbound_messages,
                outbound_messages,
            },
            anomaly: scenario.anomaly.clone(),
        };

        record_options()
            .serialize(&record)
            .map_err(|e| ScenarioError::Malformed(e.to_string()))
    }

    /// Decode a scenario, resolving every persisted type name.
    pub fn from_bytes(&self, bytes: &[u8]) -> Result<Scenario, ScenarioError> {
        let record: ScenarioRecord = record_options()
            .deserialize(bytes)
            .map_err(|e| ScenarioError::Malformed(e.to_string()))?;

        if record.version != TRACE_FORMAT_VERSION {
            return Err(ScenarioError::UnsupportedVersion {
                found: record.version,
                expected: TRACE_FORMAT_VERSION,
            });
        }

        let computation = self
            .registry
            .resolve(&record.computation_type, Slot::Computation)?;
        let slots = SlotTypes {
            vertex_id: self.registry.resolve(&record.vertex_id_type, Slot::VertexId)?,
            vertex_value: self
                .registry
                .resolve(&record.vertex_value_type, Slot::VertexValue)?,
            edge_value: self
                .registry
                .resolve(&record.edge_value_type, Slot::EdgeValue)?,
            inbound_message: self
                .registry
                .resolve(&record.inbound_message_type, Slot::InboundMessage)?,
            outbound_message: self
                .registry
                .resolve(&record.outbound_message_type, Slot::OutboundMessage)?,
        };

        let context = decode_context(record.context, &slots)?;
        debug!(
            step = context.step,
            vertex_id = %context.vertex_id,
            computation = computation.name(),
            "Decoded scenario"
        );

        Ok(Scenario {
            types: ScenarioTypes {
                computation: computation.descriptor().clone(),
                vertex_id: slots.vertex_id.descriptor().clone(),
                vertex_value: slots.vertex_value.descriptor().clone(),
                edge_value: slots.edge_value.descriptor().clone(),
                inbound_message: slots.inbound_message.descriptor().clone(),
                outbound_message: slots.outbound_message.descriptor().clone(),
            },
            context,
            anomaly: record.anomaly,
        })
    }
}

fn decode_context(record: ContextRecord, slots: &SlotTypes) -> Result<Context, ScenarioError> {
    let vertex_id = decode_required(&record.vertex_id, &slots.vertex_id, "context.vertex_id")?;
    let vertex_value_before = decode_required(
        &record.vertex_value_before,
        &slots.vertex_value,
        "context.vertex_value_before",
    )?;
    let vertex_value_after = decode_required(
        &record.vertex_value_after,
        &slots.vertex_value,
        "context.vertex_value_after",
    )?;

    let mut neighbors = Vec::with_capacity(record.neighbors.len());
    for (i, neighbor) in record.neighbors.iter().enumerate() {
        let id = decode_required(
            &neighbor.neighbor_id,
            &slots.vertex_id,
            format!("context.neighbors[{}].neighbor_id", i),
        )?;
        // Null-typed edges stay empty even if bytes were recorded.
        let edge_value = match &neighbor.edge_value {
            Some(bytes) => codec::decode(bytes, &slots.edge_value).map_err(|e| {
                ScenarioError::codec(format!("context.neighbors[{}].edge_value", i), e)
            })?,
            None => None,
        };
        neighbors.push(Neighbor { id, edge_value });
    }

    let mut inbound_messages = Vec::with_capacity(record.inbound_messages.len());
    for (i, bytes) in record.inbound_messages.iter().enumerate() {
        inbound_messages.push(decode_required(
            bytes,
            &slots.inbound_message,
            format!("context.inbound_messages[{}]", i),
        )?);
    }

    let mut outbound_messages = Vec::with_capacity(record.outbound_messages.len());
    for (i, out) in record.outbound_messages.iter().enumerate() {
        outbound_messages.push(OutboundMessage {
            destination: decode_required(
                &out.destination_id,
                &slots.vertex_id,
                format!("context.outbound_messages[{}].destination_id", i),
            )?,
            message: decode_required(
                &out.message,
                &slots.outbound_message,
                format!("context.outbound_messages[{}].message", i),
            )?,
        });
    }

    Ok(Context {
        step: record.step,
        vertex_id,
        vertex_value_before,
        vertex_value_after,
        neighbors,
        inbound_messages,
        outbound_messages,
    })
}

fn encode_as(
    value: &dyn Value,
    declared: &TypeDescriptor,
    field: impl Into<String>,
) -> Result<Vec<u8>, ScenarioError> {
    if value.type_name() != declared.name() {
        return Err(ScenarioError::TypeMismatch {
            field: field.into(),
            expected: declared.name().to_string(),
            actual: value.type_name().to_string(),
        });
    }
    codec::encode(value).map_err(|e| ScenarioError::codec(field, e))
}

fn decode_required(
    bytes: &[u8],
    ty: &ResolvedType,
    field: impl Into<String>,
) -> Result<Box<dyn Value>, ScenarioError> {
    let field = field.into();
    match codec::decode(bytes, ty) {
        Ok(Some(value)) => Ok(value),
        Ok(None) => Err(ScenarioError::codec(
            field,
            CodecError::NotConstructible(ty.name().to_string()),
        )),
        Err(e) => Err(ScenarioError::codec(field, e)),
    }
}
