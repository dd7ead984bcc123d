//! # pocket-decor
//!
//! Pick one of a user's uploaded videos from Cloudinary, download it, and
//! sample it into a sequence of JPEG stills with FFmpeg, ready for an
//! object-capture tool to turn into a `.usdz` model.
//!
//! The run is a straight line:
//!
//! 1. ask for a user id,
//! 2. list the videos under `users/<id>/` in the media store,
//! 3. let the operator pick one,
//! 4. stream it to `downloaded_videos/<id>/<video>/`,
//! 5. write one frame per interval into `…/frames/`,
//! 6. optionally run the object-capture executable into `models/<id>/<video>/`.
//!
//! Every external collaborator sits behind a trait ([`MediaStore`],
//! [`VideoTool`], [`CommandRunner`], [`Console`]) so the pipeline can be
//! driven against fakes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pocket_decor::{
//!     CloudinaryConfig, CloudinaryStore, FfmpegTool, Pipeline, PipelineOptions,
//!     TerminalConsole,
//! };
//!
//! dotenvy::dotenv().ok();
//! let store = CloudinaryStore::new(CloudinaryConfig::from_env()?);
//! let console = TerminalConsole::new();
//! let pipeline = Pipeline::new(&store, &FfmpegTool, &console, PipelineOptions::new());
//! let outcome = pipeline.run()?;
//! println!("{outcome:?}");
//! # Ok::<(), pocket_decor::PipelineError>(())
//! ```
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed; `ffmpeg-next` links
//! against them at build time.

pub mod capture;
pub mod cloudinary;
pub mod config;
pub mod console;
mod conversion;
pub mod error;
pub mod ffmpeg;
pub mod frames;
pub mod layout;
pub mod metadata;
pub mod pipeline;
pub mod probe;
pub mod progress;
pub mod resource;
pub mod sampler;
pub mod store;

pub use capture::{
    CommandOutput, CommandRunner, DetailLevel, ObjectCapture, SampleOrdering, SystemRunner,
};
pub use cloudinary::CloudinaryStore;
pub use config::{CloudinaryConfig, PipelineOptions};
pub use console::{Console, TerminalConsole};
pub use error::PipelineError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use frames::{SamplingRequest, VideoTool, approximate_frame_count, extract_frames};
pub use layout::{VideoPaths, WorkspaceLayout};
pub use metadata::{MediaMetadata, VideoMetadata};
pub use pipeline::{ModelOutcome, Pipeline, ProcessedVideo, RunOutcome};
pub use probe::MediaProbe;
pub use progress::{OperationType, ProgressCallback, ProgressInfo};
pub use resource::{UserId, VideoResource};
pub use sampler::FfmpegTool;
pub use store::{MediaStore, RemoteStream, download_video};
