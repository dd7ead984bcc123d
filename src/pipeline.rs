//! The end-to-end run: ask, list, select, download, extract, (model).
//!
//! Each step reports its own outcome to the [`Console`]. Download and
//! extraction failures are reported and absorbed here; only failures that
//! leave nothing sensible to do (listing, prompting, directory creation)
//! are returned to the caller.

use std::path::PathBuf;

use crate::{
    capture::{CommandRunner, SystemRunner},
    config::PipelineOptions,
    console::Console,
    error::PipelineError,
    frames::{VideoTool, extract_frames},
    layout::{VideoPaths, ensure_directory},
    resource::{UserId, choices, resolve_selection},
    store::{MediaStore, download_video},
};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The user has no videos under their prefix.
    NoVideos {
        user: UserId,
    },
    /// The selected video could not be downloaded; nothing was extracted.
    DownloadFailed {
        user: UserId,
        paths: VideoPaths,
    },
    /// The video was downloaded and frame extraction was attempted.
    Processed(ProcessedVideo),
}

/// Result of a run that got past the download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedVideo {
    pub user: UserId,
    pub public_id: String,
    pub paths: VideoPaths,
    /// Bytes written by the download.
    pub bytes: u64,
    /// Approximate number of frames; 0 when extraction failed.
    pub frame_count: u64,
    /// Outcome of model generation, `None` when it is disabled.
    pub model: Option<ModelOutcome>,
}

/// Outcome of the model generation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOutcome {
    Generated(PathBuf),
    Failed(String),
}

/// One configured pipeline.
pub struct Pipeline<'a> {
    store: &'a dyn MediaStore,
    tool: &'a dyn VideoTool,
    console: &'a dyn Console,
    runner: &'a dyn CommandRunner,
    options: PipelineOptions,
}

impl<'a> Pipeline<'a> {
    /// Model generation, when enabled in `options`, runs through
    /// [`SystemRunner`]; use [`with_runner`](Self::with_runner) to replace it.
    pub fn new(
        store: &'a dyn MediaStore,
        tool: &'a dyn VideoTool,
        console: &'a dyn Console,
        options: PipelineOptions,
    ) -> Self {
        Self {
            store,
            tool,
            console,
            runner: &SystemRunner,
            options,
        }
    }

    pub fn with_runner(mut self, runner: &'a dyn CommandRunner) -> Self {
        self.runner = runner;
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Run once, prompting for the user id.
    pub fn run(&self) -> Result<RunOutcome, PipelineError> {
        let raw = self.console.prompt_user_id()?;
        let user = UserId::parse(&raw)?;
        self.run_for(user)
    }

    /// Run once for `user`.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidInterval`] for a zero sampling interval,
    /// before the store is contacted.
    pub fn run_for(&self, user: UserId) -> Result<RunOutcome, PipelineError> {
        if self.options.interval.is_zero() {
            return Err(PipelineError::InvalidInterval);
        }
        let layout = &self.options.layout;
        ensure_directory(&layout.user_directory(&user))?;

        let resources = self
            .store
            .list_videos(&user.prefix(), self.options.max_results)?;
        if resources.is_empty() {
            self.console.info(&format!("No videos found for user {user}"));
            return Ok(RunOutcome::NoVideos { user });
        }
        log::info!("Found {} videos for user {user}", resources.len());

        let selected = self.console.select_video(&choices(&resources))?;
        let resource = resolve_selection(&resources, &selected)?;
        let paths = layout.video_paths(&user, resource);

        ensure_directory(&paths.video_directory)?;
        ensure_directory(&paths.frames_directory)?;

        let bytes = match download_video(
            self.store,
            &resource.public_id,
            &paths.video_file,
            self.options.chunk_size,
            self.options.progress.clone(),
        ) {
            Ok(bytes) => bytes,
            Err(error) => {
                log::warn!("Download of {} failed: {error}", resource.public_id);
                self.console.error(&format!("Error downloading video: {error}"));
                self.console.error("Failed to download video");
                return Ok(RunOutcome::DownloadFailed { user, paths });
            }
        };
        self.console.success(&format!("Downloaded: {}", paths.file_name));

        let frame_count = match extract_frames(
            self.tool,
            &paths.video_file,
            &paths.frames_directory,
            self.options.interval,
            self.options.jpeg_quality,
            self.options.progress.clone(),
        ) {
            Ok(count) => count,
            Err(error) => {
                self.console.error(&format!("FFmpeg error occurred: {error}"));
                0
            }
        };
        self.console.info(&format!(
            "Extracted approximately {frame_count} frames from {}",
            paths.file_name
        ));

        ensure_directory(&paths.model_directory)?;
        let model = self.generate_model(&paths);

        Ok(RunOutcome::Processed(ProcessedVideo {
            user,
            public_id: resource.public_id.clone(),
            paths,
            bytes,
            frame_count,
            model,
        }))
    }

    fn generate_model(&self, paths: &VideoPaths) -> Option<ModelOutcome> {
        let capture = self.options.object_capture.as_ref()?;

        let outcome = match capture.generate(
            self.runner,
            &paths.frames_directory,
            &paths.model_directory,
            &paths.file_name,
        ) {
            Ok(model_file) => {
                self.console.success("Successfully generated 3D model");
                self.console.info(&format!(
                    "Model has been generated and saved in: {}",
                    paths.model_directory.display()
                ));
                ModelOutcome::Generated(model_file)
            }
            Err(error) => {
                self.console.error(&format!("Error generating 3D model: {error}"));
                self.console.error("Failed to generate 3D model");
                ModelOutcome::Failed(error.to_string())
            }
        };
        self.console.info(&format!(
            "Video has been downloaded and processed in: {}",
            paths.video_directory.display()
        ));
        Some(outcome)
    }
}
