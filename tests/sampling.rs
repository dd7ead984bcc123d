//! Probing and sampling through `extract_frames`, mostly against FFmpeg.
//!
//! Tests that need a real video require `tests/fixtures/sample_video.mp4`
//! (see `tests/fixtures/generate_fixtures.sh`) and return early without it.

mod common;

use std::{path::Path, sync::Arc, time::Duration};

use common::FakeTool;
use pocket_decor::{
    FfmpegTool, MediaProbe, OperationType, PipelineError, ProgressCallback, ProgressInfo,
    extract_frames,
};

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

#[derive(Default)]
struct CountingProgress(std::sync::Mutex<Vec<ProgressInfo>>);

impl ProgressCallback for CountingProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.0.lock().unwrap().push(info.clone());
    }
}

#[test]
fn probe_reports_duration_and_stream() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let metadata = MediaProbe::probe(path).expect("Failed to probe sample video");
    let video = metadata.video.expect("sample has a video stream");

    assert!((metadata.duration.as_secs_f64() - 5.0).abs() < 0.2);
    assert_eq!((video.width, video.height), (320, 240));
    assert!((video.frames_per_second - 30.0).abs() < 0.5);
}

#[test]
fn extract_frames_writes_numbered_jpegs_and_reports_estimate() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let progress = Arc::new(CountingProgress::default());

    let count = extract_frames(
        &FfmpegTool::new(),
        Path::new(path),
        temporary_directory.path(),
        Duration::from_secs(1),
        85,
        progress.clone(),
    )
    .expect("Failed to extract frames");

    assert_eq!(count, 5);

    let first = temporary_directory.path().join("frame_0001.jpg");
    assert!(first.exists());
    let image = image::open(&first).expect("frame is a readable image");
    assert_eq!((image.width(), image.height()), (320, 240));

    let written = std::fs::read_dir(temporary_directory.path()).unwrap().count() as u64;
    assert!((4..=6).contains(&written), "unexpected frame count {written}");

    let reports = progress.0.lock().unwrap();
    assert!(!reports.is_empty());
    assert!(
        reports
            .iter()
            .all(|info| info.operation == OperationType::FrameExtraction)
    );
}

#[test]
fn garbage_file_fails_without_writing_frames() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid = temporary_directory.path().join("invalid.mp4");
    std::fs::write(&invalid, b"this is not a media file").expect("Failed to write invalid file");
    let frames = temporary_directory.path().join("frames");
    std::fs::create_dir(&frames).unwrap();

    let result = extract_frames(
        &FfmpegTool::new(),
        &invalid,
        &frames,
        Duration::from_secs(1),
        90,
        Arc::new(CountingProgress::default()),
    );

    assert!(matches!(result, Err(PipelineError::FileOpen { .. })));
    assert_eq!(std::fs::read_dir(&frames).unwrap().count(), 0);
}

#[test]
fn zero_interval_is_rejected_before_probing() {
    let result = extract_frames(
        &FfmpegTool::new(),
        Path::new("does-not-matter.mp4"),
        Path::new("."),
        Duration::ZERO,
        90,
        Arc::new(CountingProgress::default()),
    );

    assert!(matches!(result, Err(PipelineError::InvalidInterval)));
}

#[test]
fn missing_video_stream_is_rejected_before_sampling() {
    let tool = FakeTool::new(Duration::from_secs(12), 12).without_video();

    let result = extract_frames(
        &tool,
        Path::new("audio_only.m4a"),
        Path::new("."),
        Duration::from_secs(1),
        90,
        Arc::new(CountingProgress::default()),
    );

    assert!(matches!(result, Err(PipelineError::NoVideoStream)));
    assert_eq!(tool.probed.borrow().len(), 1);
    assert_eq!(tool.sample_calls.get(), 0);
}
