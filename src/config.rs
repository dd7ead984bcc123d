//! Pipeline configuration.
//!
//! [`CloudinaryConfig`] holds the media store credentials and is normally
//! read from the environment (after `dotenvy` has loaded `.env`).
//! [`PipelineOptions`] is a builder that threads the local layout, sampling
//! settings, progress callback and the optional model generator through the
//! [`Pipeline`](crate::Pipeline) without a long constructor.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use pocket_decor::{CloudinaryConfig, PipelineOptions};
//!
//! dotenvy::dotenv().ok();
//! let cloudinary = CloudinaryConfig::from_env()?;
//! let options = PipelineOptions::new()
//!     .with_interval(Duration::from_secs(2))
//!     .with_jpeg_quality(85);
//! # Ok::<(), pocket_decor::PipelineError>(())
//! ```

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::Path,
    sync::Arc,
    time::Duration,
};

use crate::{
    capture::ObjectCapture,
    error::PipelineError,
    layout::WorkspaceLayout,
    progress::{NoOpProgress, ProgressCallback},
};

/// Environment variable holding the Cloudinary cloud name.
pub const CLOUD_NAME_VAR: &str = "CLOUDINARY_CLOUD_NAME";
/// Environment variable holding the Cloudinary API key.
pub const API_KEY_VAR: &str = "CLOUDINARY_API_KEY";
/// Environment variable holding the Cloudinary API secret.
pub const API_SECRET_VAR: &str = "CLOUDINARY_API_SECRET";
/// Optional override for the admin API host.
pub const API_BASE_VAR: &str = "CLOUDINARY_API_BASE";
/// Optional override for the delivery host.
pub const DELIVERY_BASE_VAR: &str = "CLOUDINARY_DELIVERY_BASE";

/// Default admin API host.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";
/// Default delivery host.
pub const DEFAULT_DELIVERY_BASE: &str = "https://res.cloudinary.com";

/// Credentials and endpoints for a Cloudinary account.
#[derive(Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    /// Account cloud name, the first path segment of every URL.
    pub cloud_name: String,
    /// Admin API key.
    pub api_key: String,
    /// Admin API secret.
    pub api_secret: String,
    /// Admin API host, without trailing slash.
    pub api_base: String,
    /// Delivery host, without trailing slash.
    pub delivery_base: String,
}

impl Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("delivery_base", &self.delivery_base)
            .finish()
    }
}

impl CloudinaryConfig {
    /// Build a configuration for the public Cloudinary endpoints.
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            delivery_base: DEFAULT_DELIVERY_BASE.to_string(),
        }
    }

    /// Read the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MissingEnvironment`] naming the first
    /// required variable that is unset or empty.
    pub fn from_env() -> Result<Self, PipelineError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PipelineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(PipelineError::MissingEnvironment(name))
        };

        let mut config = Self::new(
            required(CLOUD_NAME_VAR)?,
            required(API_KEY_VAR)?,
            required(API_SECRET_VAR)?,
        );
        if let Some(base) = lookup(API_BASE_VAR).filter(|value| !value.is_empty()) {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(base) = lookup(DELIVERY_BASE_VAR).filter(|value| !value.is_empty()) {
            config.delivery_base = base.trim_end_matches('/').to_string();
        }
        Ok(config)
    }
}

/// Operational settings for one pipeline run.
#[derive(Clone)]
pub struct PipelineOptions {
    /// Where downloads, frames and models are written.
    pub layout: WorkspaceLayout,
    /// Seconds between sampled frames.
    pub interval: Duration,
    /// JPEG quality for sampled frames (1–100).
    pub jpeg_quality: u8,
    /// Read size used when streaming a download to disk.
    pub chunk_size: usize,
    /// Maximum number of resources requested from the store.
    pub max_results: u32,
    /// Model generator to run after extraction. `None` skips the step.
    pub object_capture: Option<ObjectCapture>,
    /// Receives download and sampling progress.
    pub progress: Arc<dyn ProgressCallback>,
}

impl Debug for PipelineOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PipelineOptions")
            .field("layout", &self.layout)
            .field("interval", &self.interval)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("chunk_size", &self.chunk_size)
            .field("max_results", &self.max_results)
            .field("object_capture", &self.object_capture)
            .finish_non_exhaustive()
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            layout: WorkspaceLayout::default(),
            interval: Duration::from_secs(1),
            jpeg_quality: 90,
            chunk_size: 8192,
            max_results: 500,
            object_capture: None,
            progress: Arc::new(NoOpProgress),
        }
    }
}

impl PipelineOptions {
    /// Defaults: `downloaded_videos/` and `models/` under the working
    /// directory, one frame per second, quality 90, 8 KiB chunks, 500
    /// results, no model generation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write downloads under `downloads` and models under `models`.
    pub fn with_roots(mut self, downloads: impl AsRef<Path>, models: impl AsRef<Path>) -> Self {
        self.layout = WorkspaceLayout::new(downloads, models);
        self
    }

    /// Sample one frame every `interval`.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the JPEG quality, clamped to 1–100.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Set the download chunk size. Zero is treated as one byte.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Cap the number of resources requested from the store.
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// Run `capture` after frame extraction.
    pub fn with_model_generation(mut self, capture: ObjectCapture) -> Self {
        self.object_capture = Some(capture);
        self
    }

    /// Report progress to `callback`.
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }
}
