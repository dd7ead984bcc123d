//! Model generation invoked directly, outside the pipeline.

mod common;

use std::path::{Path, PathBuf};

use common::FakeRunner;
use pocket_decor::{DetailLevel, ObjectCapture, PipelineError, SampleOrdering};

#[test]
fn passing_exit_code_returns_usdz_path() {
    let runner = FakeRunner::exiting_with(0, "");
    let capture = ObjectCapture::new();

    let model = capture
        .generate(
            &runner,
            Path::new("downloaded_videos/42/sofa/frames"),
            Path::new("models/42/sofa"),
            "sofa.mp4",
        )
        .unwrap();

    assert_eq!(model, PathBuf::from("models/42/sofa/sofa.usdz"));

    let calls = runner.calls.borrow();
    let (program, arguments) = &calls[0];
    assert_eq!(program, &PathBuf::from("./pocketDecorObjectCapture"));
    let rendered: Vec<String> = arguments
        .iter()
        .map(|argument| argument.to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        rendered,
        [
            "downloaded_videos/42/sofa/frames",
            "models/42/sofa/sofa.usdz",
            "--detail",
            "medium",
            "--sample-ordering",
            "sequential",
        ]
    );
}

#[test]
fn custom_detail_and_ordering_are_passed_through() {
    let runner = FakeRunner::exiting_with(0, "");
    let capture = ObjectCapture::new()
        .with_detail(DetailLevel::Raw)
        .with_sample_ordering(SampleOrdering::Unordered);

    capture
        .generate(&runner, Path::new("f"), Path::new("m"), "clip")
        .unwrap();

    let calls = runner.calls.borrow();
    let arguments = &calls[0].1;
    assert_eq!(arguments[3], "raw");
    assert_eq!(arguments[5], "unordered");
}

#[test]
fn non_zero_exit_carries_stderr() {
    let runner = FakeRunner::exiting_with(1, "photogrammetry session failed");

    let result = ObjectCapture::new().generate(&runner, Path::new("f"), Path::new("m"), "clip.mov");

    match result {
        Err(PipelineError::ModelGeneration { exit_code, stderr }) => {
            assert_eq!(exit_code, Some(1));
            assert_eq!(stderr, "photogrammetry session failed");
        }
        other => panic!("expected a model generation error, got {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn system_runner_reports_real_exit_status() {
    use pocket_decor::{CommandRunner, SystemRunner};

    let ok = SystemRunner.run(Path::new("true"), &[]).unwrap();
    assert!(ok.success());

    let failed = SystemRunner.run(Path::new("false"), &[]).unwrap();
    assert!(!failed.success());
    assert_eq!(failed.exit_code, Some(1));
}
