//! Canonical on-disk schema for trace files.
//!
//! Field order is the encoding order. Value payloads are opaque bytes that
//! only make sense once the type named in the matching `*_type` field has
//! been resolved.

use super::Anomaly;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ScenarioRecord {
    pub version: u32,
    pub computation_type: String,
    pub vertex_id_type: String,
    pub vertex_value_type: String,
    pub edge_value_type: String,
    pub inbound_message_type: String,
    pub outbound_message_type: String,
    pub context: ContextRecord,
    pub anomaly: Option<Anomaly>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ContextRecord {
    pub step: u64,
    pub vertex_id: Vec<u8>,
    pub vertex_value_before: Vec<u8>,
    pub vertex_value_after: Vec<u8>,
    pub neighbors: Vec<NeighborRecord>,
    pub inbound_messages: Vec<Vec<u8>>,
    pub outbound_messages: Vec<OutboundRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct NeighborRecord {
    pub neighbor_id: Vec<u8>,
    pub edge_value: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct OutboundRecord {
    pub destination_id: Vec<u8>,
    pub message: Vec<u8>,
}
