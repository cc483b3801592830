use proptest::prelude::*;
use std::sync::Arc;
use vertrace::value::{IntValue, LongValue, NullValue, TextValue};
use vertrace::{Computation, Context, Scenario, ScenarioMarshaler, ScenarioTypes, TypeRegistry};

struct Echo;

impl Computation for Echo {
    const TYPE_NAME: &'static str = "acme.Echo";
}

fn marshaler() -> ScenarioMarshaler {
    let mut registry = TypeRegistry::new();
    registry.register_computation::<Echo>();
    ScenarioMarshaler::new(Arc::new(registry))
}

/// Saving then loading reproduces every field, including order and absent edges.
#[test]
fn test_scenario_round_trip_property() {
    let marshaler = marshaler();
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                any::<u64>(),
                any::<i64>(),
                (any::<i32>(), any::<i32>()),
                prop::collection::vec((any::<i64>(), any::<Option<i32>>()), 0..8),
                prop::collection::vec(any::<i32>(), 0..8),
                prop::collection::vec((any::<i64>(), any::<i32>()), 0..8),
            ),
            |(step, vertex, (before, after), neighbors, inbound, outbound)| {
                let types =
                    ScenarioTypes::of::<Echo, LongValue, IntValue, IntValue, IntValue, IntValue>();
                let mut context =
                    Context::new(step, Box::new(LongValue(vertex)), Box::new(IntValue(before)));
                context.set_vertex_value_after(Box::new(IntValue(after)));
                for (id, edge) in &neighbors {
                    context.add_neighbor(
                        Box::new(LongValue(*id)),
                        edge.map(|e| Box::new(IntValue(e)) as Box<dyn vertrace::Value>),
                    );
                }
                for message in &inbound {
                    context.add_inbound_message(Box::new(IntValue(*message)));
                }
                for (destination, message) in &outbound {
                    context.add_outbound_message(
                        Box::new(LongValue(*destination)),
                        Box::new(IntValue(*message)),
                    );
                }
                let scenario = Scenario::new(types, context);

                let bytes = marshaler.to_bytes(&scenario).unwrap();
                let loaded = marshaler.from_bytes(&bytes).unwrap();
                prop_assert_eq!(loaded, scenario);
                Ok(())
            },
        )
        .unwrap();
}

/// Text values and null-typed edges survive a round trip.
#[test]
fn test_text_and_null_edges_round_trip_property() {
    let marshaler = marshaler();
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                ".{0,32}",
                ".{0,32}",
                prop::collection::vec((".{0,8}", any::<bool>()), 0..6),
            ),
            |(vertex, value, neighbors)| {
                let types =
                    ScenarioTypes::of::<Echo, TextValue, TextValue, NullValue, TextValue, TextValue>();
                let mut context = Context::new(
                    0,
                    Box::new(TextValue(vertex)),
                    Box::new(TextValue(value)),
                );
                // Either form of an absent edge: no value, or an explicit null.
                for (id, explicit_null) in neighbors {
                    let edge = explicit_null.then(|| Box::new(NullValue) as Box<dyn vertrace::Value>);
                    context.add_neighbor(Box::new(TextValue(id)), edge);
                }
                let scenario = Scenario::new(types, context);

                let loaded = marshaler
                    .from_bytes(&marshaler.to_bytes(&scenario).unwrap())
                    .unwrap();
                prop_assert!(loaded.context.neighbors.iter().all(|n| n.edge_value.is_none()));
                prop_assert_eq!(loaded, scenario);
                Ok(())
            },
        )
        .unwrap();
}
