//! Media metadata types.
//!
//! Returned by [`MediaProbe::probe`](crate::MediaProbe::probe) and by every
//! [`VideoTool`](crate::VideoTool) implementation. The frame extractor only
//! needs [`MediaMetadata::duration`]; the rest is logged for the operator.

use std::time::Duration;

/// Container-level metadata plus the best video stream, if any.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct MediaMetadata {
    /// Video stream metadata, if a video stream is present.
    pub video: Option<VideoMetadata>,
    /// Total duration of the media file.
    pub duration: Duration,
    /// Container format name (e.g. `"mov,mp4,m4a,3gp,3g2,mj2"`).
    pub format: String,
}

impl MediaMetadata {
    /// Metadata for a video-bearing file of the given duration.
    ///
    /// Mostly useful for [`VideoTool`](crate::VideoTool) test doubles.
    pub fn with_duration(duration: Duration) -> Self {
        Self {
            video: Some(VideoMetadata::default()),
            duration,
            format: String::new(),
        }
    }
}

/// Metadata for a video stream.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use]
pub struct VideoMetadata {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frames per second (may be approximate for variable-frame-rate content).
    pub frames_per_second: f64,
    /// Codec name (e.g. `"h264"`, `"hevc"`).
    pub codec: String,
}
