//! Scenario model
//!
//! One scenario is one vertex's activity during one computation step: the
//! types involved plus a [`Context`] payload. On the write path it is built
//! incrementally as vertex state, edges and messages are observed; on the
//! read path it is produced whole by [`ScenarioMarshaler`].

pub mod marshal;
mod record;

pub use marshal::{ScenarioMarshaler, TRACE_FORMAT_VERSION};

use crate::value::{same_value, Computation, NullValue, TypeDescriptor, TypedValue, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type descriptors for every slot of a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioTypes {
    pub computation: TypeDescriptor,
    pub vertex_id: TypeDescriptor,
    pub vertex_value: TypeDescriptor,
    pub edge_value: TypeDescriptor,
    pub inbound_message: TypeDescriptor,
    pub outbound_message: TypeDescriptor,
}

impl ScenarioTypes {
    /// Descriptors derived from statically known types.
    pub fn of<C, I, V, E, M1, M2>() -> Self
    where
        C: Computation,
        I: TypedValue + Ord,
        V: TypedValue,
        E: TypedValue,
        M1: TypedValue,
        M2: TypedValue,
    {
        Self {
            computation: TypeDescriptor::computation::<C>(),
            vertex_id: TypeDescriptor::of::<I>(),
            vertex_value: TypeDescriptor::of::<V>(),
            edge_value: TypeDescriptor::of::<E>(),
            inbound_message: TypeDescriptor::of::<M1>(),
            outbound_message: TypeDescriptor::of::<M2>(),
        }
    }
}

/// An edge of the captured vertex. `edge_value` is `None` for null-typed edges.
#[derive(Debug, Clone)]
pub struct Neighbor {
    pub id: Box<dyn Value>,
    pub edge_value: Option<Box<dyn Value>>,
}

impl Neighbor {
    /// The edge value, with a null sentinel reported as absent.
    pub fn edge(&self) -> Option<&dyn Value> {
        self.edge_value
            .as_deref()
            .filter(|value| value.type_name() != NullValue::TYPE_NAME)
    }
}

#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub destination: Box<dyn Value>,
    pub message: Box<dyn Value>,
}

/// One vertex's activity during one step.
///
/// Neighbor and message order is arrival order and is preserved exactly.
#[derive(Debug, Clone)]
pub struct Context {
    pub step: u64,
    pub vertex_id: Box<dyn Value>,
    pub vertex_value_before: Box<dyn Value>,
    pub vertex_value_after: Box<dyn Value>,
    pub neighbors: Vec<Neighbor>,
    pub inbound_messages: Vec<Box<dyn Value>>,
    pub outbound_messages: Vec<OutboundMessage>,
}

impl Context {
    /// Start a context from the state observed before user logic runs.
    ///
    /// The after-value starts as a copy of the before-value.
    pub fn new(step: u64, vertex_id: Box<dyn Value>, vertex_value_before: Box<dyn Value>) -> Self {
        let vertex_value_after = vertex_value_before.clone();
        Self {
            step,
            vertex_id,
            vertex_value_before,
            vertex_value_after,
            neighbors: Vec::new(),
            inbound_messages: Vec::new(),
            outbound_messages: Vec::new(),
        }
    }

    pub fn set_vertex_value_after(&mut self, value: Box<dyn Value>) -> &mut Self {
        self.vertex_value_after = value;
        self
    }

    /// A null sentinel edge value is stored as absent.
    pub fn add_neighbor(
        &mut self,
        id: Box<dyn Value>,
        edge_value: Option<Box<dyn Value>>,
    ) -> &mut Self {
        let edge_value = edge_value.filter(|value| value.type_name() != NullValue::TYPE_NAME);
        self.neighbors.push(Neighbor { id, edge_value });
        self
    }

    pub fn add_inbound_message(&mut self, message: Box<dyn Value>) -> &mut Self {
        self.inbound_messages.push(message);
        self
    }

    pub fn add_outbound_message(
        &mut self,
        destination: Box<dyn Value>,
        message: Box<dyn Value>,
    ) -> &mut Self {
        self.outbound_messages.push(OutboundMessage {
            destination,
            message,
        });
        self
    }

    /// String form of the vertex id, as used in trace addresses.
    pub fn vertex_key(&self) -> String {
        self.vertex_id.to_string()
    }
}

/// Displays as the neighbor's id.
impl fmt::Display for Neighbor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}

impl PartialEq for Neighbor {
    fn eq(&self, other: &Self) -> bool {
        self.id.eq_value(&*other.id) && same_value(self.edge(), other.edge())
    }
}

impl PartialEq for OutboundMessage {
    fn eq(&self, other: &Self) -> bool {
        self.destination.eq_value(&*other.destination) && self.message.eq_value(&*other.message)
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.step == other.step
            && self.vertex_id.eq_value(&*other.vertex_id)
            && self.vertex_value_before.eq_value(&*other.vertex_value_before)
            && self.vertex_value_after.eq_value(&*other.vertex_value_after)
            && self.neighbors == other.neighbors
            && self.inbound_messages.len() == other.inbound_messages.len()
            && self
                .inbound_messages
                .iter()
                .zip(&other.inbound_messages)
                .all(|(a, b)| a.eq_value(&**b))
            && self.outbound_messages == other.outbound_messages
    }
}

/// Something abnormal observed while a vertex was processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anomaly {
    /// User logic failed with an uncaught error.
    Fault { message: String },
    /// The vertex value failed the host's integrity check.
    VertexValueViolation { value: String },
    /// An outbound message failed the host's integrity check.
    MessageViolation { destination: String, message: String },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::Fault { message } => write!(f, "fault: {}", message),
            Anomaly::VertexValueViolation { value } => {
                write!(f, "vertex value violation: {}", value)
            }
            Anomaly::MessageViolation {
                destination,
                message,
            } => write!(f, "message violation: {} -> {}", message, destination),
        }
    }
}

/// A captured unit of work.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub types: ScenarioTypes,
    pub context: Context,
    pub anomaly: Option<Anomaly>,
}

impl Scenario {
    pub fn new(types: ScenarioTypes, context: Context) -> Self {
        Self {
            types,
            context,
            anomaly: None,
        }
    }

    pub fn with_anomaly(mut self, anomaly: Anomaly) -> Self {
        self.anomaly = Some(anomaly);
        self
    }

    pub fn step(&self) -> u64 {
        self.context.step
    }
}
