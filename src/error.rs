//! Error types for the `pocket-decor` crate.
//!
//! This module defines [`PipelineError`], the unified error type returned by
//! every fallible operation in the crate. Variants carry the path, resource
//! id, or upstream message needed to explain the failure to the operator.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `pocket-decor` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// A required environment variable is not set.
    #[error("Missing configuration: environment variable {0} is not set")]
    MissingEnvironment(&'static str),

    /// The operator supplied a user identifier that cannot be used.
    #[error("Invalid user ID {value:?}: {reason}")]
    InvalidUserId {
        /// The rejected input, after trimming.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The sampling interval was zero or not a finite number.
    #[error("Sampling interval must be a positive number of seconds")]
    InvalidInterval,

    /// An option string did not match any known value.
    #[error("Unsupported {kind}: {value}")]
    UnsupportedOption {
        /// Which option was being parsed (e.g. `"detail level"`).
        kind: &'static str,
        /// The rejected text.
        value: String,
    },

    /// The chosen display name does not match any listed resource.
    #[error("Selected video {0:?} does not match any listed resource")]
    SelectionNotFound(String),

    /// A console prompt failed or was aborted.
    #[error("Prompt failed: {0}")]
    Prompt(String),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The media store answered with a non-2xx status.
    #[error("Media store error ({status}): {body}")]
    Store {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The media store returned a body that could not be decoded.
    #[error("Failed to decode media store response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The media file could not be opened.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to the probe or sampler.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// A video frame could not be decoded.
    #[error("Failed to decode video frame: {0}")]
    VideoDecode(String),

    /// FFmpeg filter graph setup or processing failed.
    #[error("Filter graph error: {0}")]
    FilterGraph(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// An error from the `image` crate while encoding a frame.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),

    /// The model generator could not be started.
    #[error("Failed to start {program}: {reason}")]
    Spawn {
        /// Program that was executed.
        program: PathBuf,
        /// Underlying reason the spawn failed.
        reason: String,
    },

    /// The model generator exited unsuccessfully.
    #[error("Model generation failed (exit code {exit_code:?}): {stderr}")]
    ModelGeneration {
        /// Exit code, if the process was not killed by a signal.
        exit_code: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}

impl From<FfmpegError> for PipelineError {
    fn from(error: FfmpegError) -> Self {
        PipelineError::Ffmpeg(error.to_string())
    }
}
