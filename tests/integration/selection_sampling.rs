use crate::integration::test_utils::{capturer, query, scenario};
use tempfile::TempDir;
use vertrace::{CaptureConfig, CaptureOutcome, SkipReason};

const VERTICES: i64 = 10;

fn run_steps(config: &CaptureConfig, steps: u64, announce: bool) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let capturer = capturer(&temp_dir, "job", config);
    for step in 0..steps {
        if announce {
            let candidates: Vec<String> = (0..VERTICES).map(|v| v.to_string()).collect();
            capturer.begin_step(step, &candidates);
        }
        for vertex in 0..VERTICES {
            capturer.capture(&scenario(step, vertex));
        }
    }
    temp_dir
}

#[test]
fn test_random_sampling_cardinality() {
    let config = CaptureConfig {
        random_vertices_per_step: Some(3),
        max_captures: 1000,
        seed: Some(17),
        ..Default::default()
    };

    for announce in [false, true] {
        let temp_dir = run_steps(&config, 4, announce);
        let query = query(&temp_dir);
        for step in 0..4 {
            assert_eq!(query.list_vertices("job", step).unwrap().len(), 3);
        }
    }
}

#[test]
fn test_sampling_more_than_visited() {
    let config = CaptureConfig {
        random_vertices_per_step: Some(50),
        max_captures: 1000,
        ..Default::default()
    };
    let temp_dir = run_steps(&config, 1, true);
    assert_eq!(query(&temp_dir).list_vertices("job", 0).unwrap().len(), 10);
}

#[test]
fn test_seeded_draw_is_reproducible() {
    let config = CaptureConfig {
        random_vertices_per_step: Some(2),
        max_captures: 1000,
        seed: Some(99),
        ..Default::default()
    };
    let first = run_steps(&config, 2, true);
    let second = run_steps(&config, 2, true);
    for step in 0..2 {
        assert_eq!(
            query(&first).list_vertices("job", step).unwrap(),
            query(&second).list_vertices("job", step).unwrap()
        );
    }
}

#[test]
fn test_capture_ceiling_holds_for_rest_of_run() {
    let config = CaptureConfig {
        max_captures: 5,
        ..Default::default()
    };
    let temp_dir = TempDir::new().unwrap();
    let capturer = capturer(&temp_dir, "job", &config);

    let mut captured = 0;
    for step in 0..3 {
        for vertex in 0..VERTICES {
            match capturer.capture(&scenario(step, vertex)) {
                CaptureOutcome::Captured(_) => captured += 1,
                outcome => assert_eq!(outcome, CaptureOutcome::Skipped(SkipReason::CaptureLimit)),
            }
        }
    }
    assert_eq!(captured, 5);
    assert_eq!(capturer.captures(), 5);
}

#[test]
fn test_vertex_list_with_neighbors() {
    let config = CaptureConfig {
        vertices: Some(vec!["4".to_string()]),
        include_neighbors: true,
        ..Default::default()
    };
    let temp_dir = TempDir::new().unwrap();
    let capturer = capturer(&temp_dir, "job", &config);

    let mut adjacent = scenario(0, 5);
    adjacent
        .context
        .add_neighbor(Box::new(vertrace::value::LongValue(4)), None);

    assert!(matches!(capturer.capture(&scenario(0, 4)), CaptureOutcome::Captured(_)));
    assert!(matches!(capturer.capture(&adjacent), CaptureOutcome::Captured(_)));
    assert_eq!(
        capturer.capture(&scenario(0, 6)),
        CaptureOutcome::Skipped(SkipReason::VertexNotSelected)
    );
}
