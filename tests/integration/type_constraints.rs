use crate::integration::test_utils::{marshaler, registry, ConnectedComponents};
use std::fmt;
use std::sync::Arc;
use vertrace::value::{read_serde, write_serde, DoubleValue, IntValue, LongValue, NullValue, Slot};
use vertrace::{
    CodecError, Context, Scenario, ScenarioError, ScenarioMarshaler, ScenarioTypes, TypeDescriptor,
    TypedValue,
};

/// Host value type with no ordering.
#[derive(Debug, Clone, Default, PartialEq)]
struct Rgb(u8, u8, u8);

impl TypedValue for Rgb {
    const TYPE_NAME: &'static str = "acme.Rgb";

    fn write_bytes(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        write_serde(&(self.0, self.1, self.2), Self::TYPE_NAME, out)
    }

    fn read_bytes(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        let (r, g, b) = read_serde::<(u8, u8, u8)>(bytes, Self::TYPE_NAME)?;
        *self = Rgb(r, g, b);
        Ok(())
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

fn rgb_keyed_scenario() -> Scenario {
    let types = ScenarioTypes {
        computation: TypeDescriptor::computation::<ConnectedComponents>(),
        vertex_id: TypeDescriptor::of::<Rgb>(),
        vertex_value: TypeDescriptor::of::<IntValue>(),
        edge_value: TypeDescriptor::of::<NullValue>(),
        inbound_message: TypeDescriptor::of::<IntValue>(),
        outbound_message: TypeDescriptor::of::<IntValue>(),
    };
    let context = Context::new(0, Box::new(Rgb(1, 2, 3)), Box::new(IntValue(0)));
    Scenario::new(types, context)
}

fn rgb_marshaler() -> ScenarioMarshaler {
    let mut registry = registry();
    registry.register_value::<Rgb>();
    ScenarioMarshaler::new(Arc::new(registry))
}

#[test]
fn test_unordered_vertex_id_type_is_rejected() {
    let marshaler = rgb_marshaler();
    let bytes = marshaler.to_bytes(&rgb_keyed_scenario()).unwrap();

    let err = marshaler.from_bytes(&bytes).unwrap_err();
    assert!(matches!(
        err,
        ScenarioError::TypeConstraint {
            slot: Slot::VertexId,
            ref name,
            ..
        } if name == "acme.Rgb"
    ));
}

#[test]
fn test_builtin_unordered_vertex_id_is_rejected() {
    let mut scenario = rgb_keyed_scenario();
    scenario.types.vertex_id = TypeDescriptor::of::<DoubleValue>();
    scenario.context.vertex_id = Box::new(DoubleValue(1.5));

    let bytes = marshaler().to_bytes(&scenario).unwrap();
    assert!(matches!(
        marshaler().from_bytes(&bytes),
        Err(ScenarioError::TypeConstraint { slot: Slot::VertexId, .. })
    ));
}

#[test]
fn test_unregistered_type_is_unresolved() {
    let mut scenario = rgb_keyed_scenario();
    scenario.types.vertex_id = TypeDescriptor::of::<LongValue>();
    scenario.context.vertex_id = Box::new(LongValue(1));
    scenario.types.vertex_value = TypeDescriptor::of::<Rgb>();
    scenario.context.vertex_value_before = Box::new(Rgb(0, 0, 0));
    scenario.context.vertex_value_after = Box::new(Rgb(9, 9, 9));

    let bytes = rgb_marshaler().to_bytes(&scenario).unwrap();
    assert_eq!(rgb_marshaler().from_bytes(&bytes).unwrap(), scenario);

    let err = marshaler().from_bytes(&bytes).unwrap_err();
    assert!(matches!(
        err,
        ScenarioError::UnresolvedType {
            slot: Slot::VertexValue,
            ..
        }
    ));
}

#[test]
fn test_value_of_wrong_type_is_not_written() {
    let mut scenario = rgb_keyed_scenario();
    scenario.types.vertex_id = TypeDescriptor::of::<LongValue>();
    scenario.context.vertex_id = Box::new(LongValue(1));
    scenario
        .context
        .add_inbound_message(Box::new(IntValue(1)))
        .add_inbound_message(Box::new(Rgb(1, 1, 1)));

    let err = rgb_marshaler().to_bytes(&scenario).unwrap_err();
    match err {
        ScenarioError::TypeMismatch {
            field,
            expected,
            actual,
        } => {
            assert_eq!(field, "context.inbound_messages[1]");
            assert_eq!(expected, IntValue::TYPE_NAME);
            assert_eq!(actual, "acme.Rgb");
        }
        other => panic!("unexpected error: {other}"),
    }
}
