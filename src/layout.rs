//! Local file-system layout.
//!
//! ```text
//! downloaded_videos/<user>/<basename>/<file name>
//! downloaded_videos/<user>/<basename>/frames/frame_0001.jpg …
//! models/<user>/<basename>/<basename>.usdz
//! ```
//!
//! Directories are created on demand with [`ensure_directory`]; an existing
//! directory is not an error, so a run can be repeated with the same inputs.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::PipelineError,
    resource::{UserId, VideoResource, strip_extension},
};

/// Name of the per-video frames subdirectory.
pub const FRAMES_DIRECTORY: &str = "frames";

/// Roots of the download and model trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    /// Root for downloaded videos and their frames.
    pub downloads_root: PathBuf,
    /// Root for generated models.
    pub models_root: PathBuf,
}

impl Default for WorkspaceLayout {
    fn default() -> Self {
        Self::new("downloaded_videos", "models")
    }
}

impl WorkspaceLayout {
    pub fn new(downloads_root: impl AsRef<Path>, models_root: impl AsRef<Path>) -> Self {
        Self {
            downloads_root: downloads_root.as_ref().to_path_buf(),
            models_root: models_root.as_ref().to_path_buf(),
        }
    }

    /// `<downloads>/<user>`
    pub fn user_directory(&self, user: &UserId) -> PathBuf {
        self.downloads_root.join(user.as_str())
    }

    /// Paths for one selected video under this layout.
    pub fn video_paths(&self, user: &UserId, resource: &VideoResource) -> VideoPaths {
        let file_name = resource.file_name();
        let basename = strip_extension(&file_name).to_string();
        let video_directory = self.user_directory(user).join(&basename);

        VideoPaths {
            video_file: video_directory.join(&file_name),
            frames_directory: video_directory.join(FRAMES_DIRECTORY),
            model_directory: self.models_root.join(user.as_str()).join(&basename),
            video_directory,
            file_name,
        }
    }
}

/// Every local path touched while processing one video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPaths {
    /// Name the download is saved under (display name, maybe plus format).
    pub file_name: String,
    /// `<downloads>/<user>/<basename>`
    pub video_directory: PathBuf,
    /// `<video_directory>/<file name>`
    pub video_file: PathBuf,
    /// `<video_directory>/frames`
    pub frames_directory: PathBuf,
    /// `<models>/<user>/<basename>`
    pub model_directory: PathBuf,
}

/// Create `path` and any missing parents.
pub fn ensure_directory(path: &Path) -> Result<(), PipelineError> {
    if !path.is_dir() {
        log::debug!("Creating directory {}", path.display());
    }
    fs::create_dir_all(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_roots_are_relative() {
        let layout = WorkspaceLayout::default();
        assert_eq!(layout.downloads_root, PathBuf::from("downloaded_videos"));
        assert_eq!(layout.models_root, PathBuf::from("models"));
    }

    #[test]
    fn video_paths_follow_user_and_basename() {
        let layout = WorkspaceLayout::new("dl", "out");
        let user = UserId::parse("u1").unwrap();
        let paths = layout.video_paths(&user, &VideoResource::new("users/u1/couch.mov"));

        assert_eq!(paths.file_name, "couch.mov");
        assert_eq!(paths.video_directory, PathBuf::from("dl/u1/couch"));
        assert_eq!(paths.video_file, PathBuf::from("dl/u1/couch/couch.mov"));
        assert_eq!(paths.frames_directory, PathBuf::from("dl/u1/couch/frames"));
        assert_eq!(paths.model_directory, PathBuf::from("out/u1/couch"));
    }

    #[test]
    fn ensure_directory_is_idempotent() {
        let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
        let nested = temporary_directory.path().join("a").join("b");

        ensure_directory(&nested).unwrap();
        ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
