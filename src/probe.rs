//! Media file probing.
//!
//! [`MediaProbe`] opens a file through FFmpeg's demuxer, reads the container
//! duration and the best video stream's parameters, and closes it again.

use std::{path::Path, time::Duration};

use ffmpeg_next::{Rational, codec::context::Context as CodecContext, media::Type};

use crate::{
    error::PipelineError,
    metadata::{MediaMetadata, VideoMetadata},
};

/// Stateless media prober.
///
/// # Example
///
/// ```no_run
/// use pocket_decor::MediaProbe;
///
/// let metadata = MediaProbe::probe("clip.mp4")?;
/// println!("Duration: {:?}, format: {}", metadata.duration, metadata.format);
/// # Ok::<(), pocket_decor::PipelineError>(())
/// ```
pub struct MediaProbe;

impl MediaProbe {
    /// Probe a media file and return its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::FileOpen`] if FFmpeg cannot open or
    /// recognise the file.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<MediaMetadata, PipelineError> {
        let path = path.as_ref();
        log::debug!("Probing media file: {}", path.display());

        let open_error = |reason: String| PipelineError::FileOpen {
            path: path.to_path_buf(),
            reason,
        };

        ffmpeg_next::init()
            .map_err(|error| open_error(format!("FFmpeg initialisation failed: {error}")))?;
        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| open_error(error.to_string()))?;

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };
        let format = input_context.format().name().to_string();

        let video = match input_context.streams().best(Type::Video) {
            Some(stream) => {
                let index = stream.index();
                let decoder = CodecContext::from_parameters(stream.parameters())
                    .and_then(|context| context.decoder().video())
                    .map_err(|error| {
                        open_error(format!(
                            "Failed to create video decoder for stream {index}: {error}"
                        ))
                    })?;

                let frames_per_second = rational_to_f64(stream.avg_frame_rate())
                    .or_else(|| rational_to_f64(stream.rate()))
                    .unwrap_or(0.0);
                let codec = decoder
                    .codec()
                    .map(|codec| codec.name().to_string())
                    .unwrap_or_else(|| "unknown".to_string());

                Some(VideoMetadata {
                    width: decoder.width(),
                    height: decoder.height(),
                    frames_per_second,
                    codec,
                })
            }
            None => None,
        };

        Ok(MediaMetadata {
            video,
            duration,
            format,
        })
    }
}

fn rational_to_f64(rate: Rational) -> Option<f64> {
    if rate.denominator() == 0 || rate.numerator() == 0 {
        None
    } else {
        Some(rate.numerator() as f64 / rate.denominator() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rational_rejects_zero_terms() {
        assert_eq!(rational_to_f64(Rational::new(30, 0)), None);
        assert_eq!(rational_to_f64(Rational::new(0, 1)), None);
    }

    #[test]
    fn rational_ntsc_rate() {
        let fps = rational_to_f64(Rational::new(30_000, 1001)).unwrap();
        assert!((fps - 29.97).abs() < 0.01);
    }

    #[test]
    fn probe_missing_file_is_file_open_error() {
        let result = MediaProbe::probe("definitely_missing_clip.mp4");
        assert!(matches!(result, Err(PipelineError::FileOpen { .. })));
    }
}
