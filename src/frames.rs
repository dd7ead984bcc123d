//! Frame extraction.
//!
//! [`extract_frames`] probes a video for its duration, asks a [`VideoTool`]
//! to write one JPEG every `interval` into a directory, and reports
//! `floor(duration / interval)` as the number of frames. That figure is an
//! estimate: the tool may write one more or one fewer image depending on
//! where the stream's timestamps fall.

use std::{path::Path, sync::Arc, time::Duration};

use crate::{error::PipelineError, metadata::MediaMetadata, progress::ProgressCallback};

/// Parameters for one sampling pass.
#[derive(Clone)]
pub struct SamplingRequest {
    /// Time between consecutive sampled frames.
    pub interval: Duration,
    /// JPEG quality, 1–100.
    pub jpeg_quality: u8,
    /// Expected number of frames, used as the progress total.
    pub expected_frames: Option<u64>,
    /// Receives one update per written frame.
    pub progress: Arc<dyn ProgressCallback>,
}

/// A video-processing backend.
pub trait VideoTool {
    /// Read container and stream metadata.
    fn probe(&self, video: &Path) -> Result<MediaMetadata, PipelineError>;

    /// Write `frame_0001.jpg`, `frame_0002.jpg`, … into `frames_directory`,
    /// one per `request.interval`. Returns how many images were written.
    fn sample_frames(
        &self,
        video: &Path,
        frames_directory: &Path,
        request: &SamplingRequest,
    ) -> Result<u64, PipelineError>;
}

/// File name of the `index`-th sampled frame, counting from 1.
pub fn frame_file_name(index: u64) -> String {
    format!("frame_{index:04}.jpg")
}

/// `floor(duration / interval)`.
pub fn approximate_frame_count(duration: Duration, interval: Duration) -> u64 {
    if interval.is_zero() {
        return 0;
    }
    (duration.as_secs_f64() / interval.as_secs_f64()).floor() as u64
}

/// Sample `video` into `frames_directory` and return the approximate frame
/// count.
///
/// # Errors
///
/// [`PipelineError::InvalidInterval`] for a zero interval,
/// [`PipelineError::NoVideoStream`] when the probe finds no video, and any
/// error from the tool itself.
pub fn extract_frames(
    tool: &dyn VideoTool,
    video: &Path,
    frames_directory: &Path,
    interval: Duration,
    jpeg_quality: u8,
    progress: Arc<dyn ProgressCallback>,
) -> Result<u64, PipelineError> {
    if interval.is_zero() {
        return Err(PipelineError::InvalidInterval);
    }

    let metadata = tool.probe(video)?;
    let Some(stream) = &metadata.video else {
        return Err(PipelineError::NoVideoStream);
    };
    log::info!(
        "Sampling {} ({:.2}s, {}x{} {}) every {:?}",
        video.display(),
        metadata.duration.as_secs_f64(),
        stream.width,
        stream.height,
        stream.codec,
        interval
    );

    let expected = approximate_frame_count(metadata.duration, interval);
    let request = SamplingRequest {
        interval,
        jpeg_quality,
        expected_frames: Some(expected),
        progress,
    };
    let written = tool.sample_frames(video, frames_directory, &request)?;
    if written != expected {
        log::debug!("Tool wrote {written} frames; reporting the estimate of {expected}");
    }

    Ok(expected)
}
