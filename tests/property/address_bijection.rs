use proptest::prelude::*;
use vertrace::TraceAddress;

/// A trace address maps to a file name and back to the same address.
#[test]
fn test_address_bijection_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                "[a-z0-9_-]{1,12}",
                any::<u64>(),
                "[A-Za-z0-9_.:#-]{1,24}",
            ),
            |(job_id, step, vertex_id)| {
                let address = TraceAddress::new(job_id.as_str(), step, vertex_id.as_str()).unwrap();
                let parsed = TraceAddress::parse(&job_id, &address.file_name()).unwrap();

                prop_assert_eq!(parsed, Some(address));
                Ok(())
            },
        )
        .unwrap();
}

/// Vertex ids containing a path separator are never addressable.
#[test]
fn test_separator_rejected_property() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&("[a-z]{0,4}", "[a-z]{0,4}"), |(head, tail)| {
            let vertex_id = format!("{}/{}", head, tail);
            prop_assert!(TraceAddress::new("job", 0, vertex_id).is_err());
            Ok(())
        })
        .unwrap();
}
