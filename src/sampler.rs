//! FFmpeg-backed [`VideoTool`].
//!
//! Decodes the best video stream and pushes every frame through the filter
//! graph `buffer → fps=1/N → format=rgb24 → buffersink`, then encodes each
//! frame that comes out of the sink as a JPEG. The graph is built lazily from
//! the first decoded frame so the `buffer` source matches the decoder's real
//! output size and pixel format.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use ffmpeg_next::{
    Rational, codec::context::Context as CodecContext, filter::Graph as FilterGraph,
    frame::Video as VideoFrame, media::Type,
};
use ffmpeg_sys_next::AVPixelFormat;
use image::{RgbImage, codecs::jpeg::JpegEncoder};

use crate::{
    conversion::{frame_to_buffer, pts_to_seconds},
    error::PipelineError,
    frames::{SamplingRequest, VideoTool, frame_file_name},
    metadata::MediaMetadata,
    probe::MediaProbe,
    progress::{OperationType, ProgressTracker},
};

/// [`VideoTool`] that links FFmpeg in-process through `ffmpeg-next`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegTool;

impl FfmpegTool {
    pub fn new() -> Self {
        Self
    }
}

impl VideoTool for FfmpegTool {
    fn probe(&self, video: &Path) -> Result<MediaMetadata, PipelineError> {
        MediaProbe::probe(video)
    }

    fn sample_frames(
        &self,
        video: &Path,
        frames_directory: &Path,
        request: &SamplingRequest,
    ) -> Result<u64, PipelineError> {
        ffmpeg_next::init()?;
        let mut input_context =
            ffmpeg_next::format::input(&video).map_err(|error| PipelineError::FileOpen {
                path: video.to_path_buf(),
                reason: error.to_string(),
            })?;

        let (stream_index, time_base, mut decoder) = {
            let stream = input_context
                .streams()
                .best(Type::Video)
                .ok_or(PipelineError::NoVideoStream)?;
            let decoder = CodecContext::from_parameters(stream.parameters())?
                .decoder()
                .video()?;
            (stream.index(), stream.time_base(), decoder)
        };

        log::debug!(
            "Sampling stream {stream_index} of {} into {}",
            video.display(),
            frames_directory.display()
        );

        let mut writer = JpegSequenceWriter {
            directory: frames_directory.to_path_buf(),
            quality: request.jpeg_quality.clamp(1, 100),
            tracker: ProgressTracker::new(
                request.progress.clone(),
                OperationType::FrameExtraction,
                request.expected_frames,
            ),
        };
        let filter_spec = format!(
            "fps=fps=1/{},format=pix_fmts=rgb24",
            request.interval.as_secs_f64()
        );
        let mut graph: Option<FilterGraph> = None;
        let mut decoded_frame = VideoFrame::empty();

        for (stream, packet) in input_context.packets() {
            if stream.index() != stream_index {
                continue;
            }
            decoder
                .send_packet(&packet)
                .map_err(|error| PipelineError::VideoDecode(error.to_string()))?;

            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                if graph.is_none() {
                    graph = Some(build_graph(&decoded_frame, time_base, &filter_spec)?);
                }
                if let Some(graph) = graph.as_mut() {
                    push_frame(graph, &mut decoded_frame, time_base, &mut writer)?;
                }
            }
        }

        decoder
            .send_eof()
            .map_err(|error| PipelineError::VideoDecode(error.to_string()))?;
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            if graph.is_none() {
                graph = Some(build_graph(&decoded_frame, time_base, &filter_spec)?);
            }
            if let Some(graph) = graph.as_mut() {
                push_frame(graph, &mut decoded_frame, time_base, &mut writer)?;
            }
        }

        let Some(mut graph) = graph else {
            return Err(PipelineError::VideoDecode(
                "no frames could be decoded".to_string(),
            ));
        };
        graph
            .get("in")
            .ok_or_else(|| PipelineError::FilterGraph("filter 'in' not found".to_string()))?
            .source()
            .flush()
            .map_err(|error| PipelineError::FilterGraph(format!("Failed to flush: {error}")))?;
        drain_sink(&mut graph, time_base, &mut writer)?;

        writer.tracker.finish();
        Ok(writer.tracker.current())
    }
}

/// Writes sink output as a numbered JPEG sequence.
struct JpegSequenceWriter {
    directory: PathBuf,
    quality: u8,
    tracker: ProgressTracker,
}

impl JpegSequenceWriter {
    fn write(&mut self, rgb_frame: &VideoFrame, time_base: Rational) -> Result<(), PipelineError> {
        let width = rgb_frame.width();
        let height = rgb_frame.height();
        let buffer = frame_to_buffer(rgb_frame, width, height, 3);
        let image = RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            PipelineError::VideoDecode(
                "Failed to construct RGB image from filtered frame data".to_string(),
            )
        })?;

        let path = self.directory.join(frame_file_name(self.tracker.current() + 1));
        let mut file = BufWriter::new(File::create(&path)?);
        JpegEncoder::new_with_quality(&mut file, self.quality).encode_image(&image)?;
        file.flush()?;

        log::debug!(
            "Wrote {} (t={:.3}s)",
            path.display(),
            pts_to_seconds(rgb_frame.pts().unwrap_or(0), time_base)
        );
        self.tracker.advance(1);
        Ok(())
    }
}

fn build_graph(
    first_frame: &VideoFrame,
    time_base: Rational,
    filter_spec: &str,
) -> Result<FilterGraph, PipelineError> {
    let graph_error = |stage: &str, error: ffmpeg_next::Error| {
        PipelineError::FilterGraph(format!("{stage}: {error}"))
    };

    let mut graph = FilterGraph::new();
    let buffer_args = format!(
        "video_size={}x{}:pix_fmt={}:time_base={}/{}:pixel_aspect=1/1",
        first_frame.width(),
        first_frame.height(),
        AVPixelFormat::from(first_frame.format()) as i32,
        time_base.numerator(),
        time_base.denominator(),
    );

    let buffer = ffmpeg_next::filter::find("buffer").ok_or_else(|| {
        PipelineError::FilterGraph("FFmpeg 'buffer' filter not found".to_string())
    })?;
    let buffersink = ffmpeg_next::filter::find("buffersink").ok_or_else(|| {
        PipelineError::FilterGraph("FFmpeg 'buffersink' filter not found".to_string())
    })?;

    graph
        .add(&buffer, "in", &buffer_args)
        .map_err(|error| graph_error("Failed to add buffer filter", error))?;
    graph
        .add(&buffersink, "out", "")
        .map_err(|error| graph_error("Failed to add buffersink filter", error))?;
    graph
        .output("in", 0)
        .map_err(|error| graph_error("Filter graph output error", error))?
        .input("out", 0)
        .map_err(|error| graph_error("Filter graph input error", error))?
        .parse(filter_spec)
        .map_err(|error| graph_error("Filter graph parse error", error))?;
    graph
        .validate()
        .map_err(|error| graph_error("Filter graph validation", error))?;

    log::debug!("Built filter graph [{buffer_args}] -> {filter_spec}");
    Ok(graph)
}

fn push_frame(
    graph: &mut FilterGraph,
    decoded_frame: &mut VideoFrame,
    time_base: Rational,
    writer: &mut JpegSequenceWriter,
) -> Result<(), PipelineError> {
    // The fps filter works on pts; prefer the demuxer's best-effort value.
    let timestamp = decoded_frame.timestamp();
    decoded_frame.set_pts(timestamp);

    graph
        .get("in")
        .ok_or_else(|| PipelineError::FilterGraph("filter 'in' not found".to_string()))?
        .source()
        .add(decoded_frame)
        .map_err(|error| PipelineError::FilterGraph(format!("Failed to feed filter: {error}")))?;

    drain_sink(graph, time_base, writer)
}

fn drain_sink(
    graph: &mut FilterGraph,
    time_base: Rational,
    writer: &mut JpegSequenceWriter,
) -> Result<(), PipelineError> {
    let mut filtered_frame = VideoFrame::empty();
    while graph
        .get("out")
        .ok_or_else(|| PipelineError::FilterGraph("filter 'out' not found".to_string()))?
        .sink()
        .frame(&mut filtered_frame)
        .is_ok()
    {
        writer.write(&filtered_frame, time_base)?;
    }
    Ok(())
}
