//! 3D model generation through an external object-capture executable.
//!
//! The executable is invoked as
//!
//! ```text
//! <program> <frames dir> <output dir>/<basename>.usdz --detail <level> --sample-ordering <ordering>
//! ```
//!
//! and succeeds when it exits with status zero. Process spawning sits behind
//! [`CommandRunner`] so the argument list and exit handling can be tested
//! without the executable.

use std::{
    ffi::OsString,
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    process::Command,
    str::FromStr,
};

use crate::{error::PipelineError, resource::strip_extension};

/// Default executable, resolved against the working directory.
pub const DEFAULT_EXECUTABLE: &str = "./pocketDecorObjectCapture";

/// Extension of generated models.
pub const MODEL_EXTENSION: &str = "usdz";

/// Reconstruction detail level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailLevel {
    Preview,
    Reduced,
    #[default]
    Medium,
    Full,
    Raw,
}

impl DetailLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            DetailLevel::Preview => "preview",
            DetailLevel::Reduced => "reduced",
            DetailLevel::Medium => "medium",
            DetailLevel::Full => "full",
            DetailLevel::Raw => "raw",
        }
    }
}

impl Display for DetailLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetailLevel {
    type Err = PipelineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "preview" => Ok(DetailLevel::Preview),
            "reduced" => Ok(DetailLevel::Reduced),
            "medium" => Ok(DetailLevel::Medium),
            "full" => Ok(DetailLevel::Full),
            "raw" => Ok(DetailLevel::Raw),
            _ => Err(PipelineError::UnsupportedOption {
                kind: "detail level",
                value: value.to_string(),
            }),
        }
    }
}

/// Whether input images are treated as an ordered sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleOrdering {
    Unordered,
    #[default]
    Sequential,
}

impl SampleOrdering {
    pub fn as_str(self) -> &'static str {
        match self {
            SampleOrdering::Unordered => "unordered",
            SampleOrdering::Sequential => "sequential",
        }
    }
}

impl Display for SampleOrdering {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleOrdering {
    type Err = PipelineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "unordered" => Ok(SampleOrdering::Unordered),
            "sequential" => Ok(SampleOrdering::Sequential),
            _ => Err(PipelineError::UnsupportedOption {
                kind: "sample ordering",
                value: value.to_string(),
            }),
        }
    }
}

/// What a finished child process reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured standard error, lossily decoded.
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a program to completion and captures its result.
pub trait CommandRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<CommandOutput, PipelineError>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<CommandOutput, PipelineError> {
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|error| PipelineError::Spawn {
                program: program.to_path_buf(),
                reason: error.to_string(),
            })?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Settings for the object-capture executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectCapture {
    /// Path of the executable.
    pub executable: PathBuf,
    /// Value passed to `--detail`.
    pub detail: DetailLevel,
    /// Value passed to `--sample-ordering`.
    pub sample_ordering: SampleOrdering,
}

impl Default for ObjectCapture {
    fn default() -> Self {
        Self {
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            detail: DetailLevel::default(),
            sample_ordering: SampleOrdering::default(),
        }
    }
}

impl ObjectCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_detail(mut self, detail: DetailLevel) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_sample_ordering(mut self, sample_ordering: SampleOrdering) -> Self {
        self.sample_ordering = sample_ordering;
        self
    }

    /// `<output_directory>/<video name without extension>.usdz`
    pub fn output_path(output_directory: &Path, video_name: &str) -> PathBuf {
        output_directory.join(format!(
            "{}.{MODEL_EXTENSION}",
            strip_extension(video_name)
        ))
    }

    /// Arguments passed to the executable, in order.
    pub fn arguments(&self, frames_directory: &Path, output_file: &Path) -> Vec<OsString> {
        vec![
            frames_directory.as_os_str().to_os_string(),
            output_file.as_os_str().to_os_string(),
            OsString::from("--detail"),
            OsString::from(self.detail.as_str()),
            OsString::from("--sample-ordering"),
            OsString::from(self.sample_ordering.as_str()),
        ]
    }

    /// Build a model from `frames_directory` into `output_directory`.
    ///
    /// Returns the path of the generated model.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Spawn`] when the executable cannot be started and
    /// [`PipelineError::ModelGeneration`] with the captured stderr when it
    /// exits unsuccessfully.
    pub fn generate(
        &self,
        runner: &dyn CommandRunner,
        frames_directory: &Path,
        output_directory: &Path,
        video_name: &str,
    ) -> Result<PathBuf, PipelineError> {
        let output_file = Self::output_path(output_directory, video_name);
        let arguments = self.arguments(frames_directory, &output_file);
        log::info!(
            "Running {} {:?}",
            self.executable.display(),
            arguments
        );

        let output = runner.run(&self.executable, &arguments)?;
        if output.success() {
            Ok(output_file)
        } else {
            Err(PipelineError::ModelGeneration {
                exit_code: output.exit_code,
                stderr: output.stderr,
            })
        }
    }
}
