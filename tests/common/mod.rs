//! Test doubles for the pipeline's collaborators.

#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    ffi::OsString,
    fs,
    io::Cursor,
    path::{Path, PathBuf},
    time::Duration,
};

use pocket_decor::{
    CommandOutput, CommandRunner, Console, MediaMetadata, MediaStore, PipelineError,
    RemoteStream, SamplingRequest, VideoResource, VideoTool, frames::frame_file_name,
};

/// In-memory media store.
pub struct FakeStore {
    pub resources: Vec<VideoResource>,
    pub body: Vec<u8>,
    pub fail_download: bool,
    pub fail_listing: bool,
    pub listed_prefixes: RefCell<Vec<(String, u32)>>,
    pub opened_urls: RefCell<Vec<String>>,
}

impl FakeStore {
    pub fn with_videos(public_ids: &[&str]) -> Self {
        Self {
            resources: public_ids.iter().map(|id| VideoResource::new(*id)).collect(),
            body: b"not really an mp4".to_vec(),
            fail_download: false,
            fail_listing: false,
            listed_prefixes: RefCell::new(Vec::new()),
            opened_urls: RefCell::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::with_videos(&[])
    }

    pub fn failing_download(mut self) -> Self {
        self.fail_download = true;
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }
}

impl MediaStore for FakeStore {
    fn list_videos(
        &self,
        prefix: &str,
        max_results: u32,
    ) -> Result<Vec<VideoResource>, PipelineError> {
        self.listed_prefixes
            .borrow_mut()
            .push((prefix.to_string(), max_results));
        if self.fail_listing {
            return Err(PipelineError::Store {
                status: 401,
                body: "Invalid api_key".to_string(),
            });
        }
        Ok(self
            .resources
            .iter()
            .filter(|resource| resource.public_id.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn delivery_url(&self, public_id: &str) -> String {
        format!("https://media.test/video/upload/{public_id}")
    }

    fn open(&self, url: &str) -> Result<RemoteStream, PipelineError> {
        self.opened_urls.borrow_mut().push(url.to_string());
        if self.fail_download {
            return Err(PipelineError::Store {
                status: 404,
                body: "Resource not found".to_string(),
            });
        }
        Ok(RemoteStream::new(
            Cursor::new(self.body.clone()),
            Some(self.body.len() as u64),
        ))
    }
}

/// Video tool that reports a fixed duration and writes a fixed number of
/// placeholder frames.
pub struct FakeTool {
    pub duration: Duration,
    pub frames_to_write: u64,
    pub failure: Option<String>,
    pub has_video: bool,
    pub probed: RefCell<Vec<PathBuf>>,
    pub sample_calls: Cell<u32>,
    pub frames_directory_existed: Cell<bool>,
}

impl FakeTool {
    pub fn new(duration: Duration, frames_to_write: u64) -> Self {
        Self {
            duration,
            frames_to_write,
            failure: None,
            has_video: true,
            probed: RefCell::new(Vec::new()),
            sample_calls: Cell::new(0),
            frames_directory_existed: Cell::new(false),
        }
    }

    pub fn failing(mut self, diagnostic: &str) -> Self {
        self.failure = Some(diagnostic.to_string());
        self
    }

    /// Probe reports an audio-only file.
    pub fn without_video(mut self) -> Self {
        self.has_video = false;
        self
    }
}

impl VideoTool for FakeTool {
    fn probe(&self, video: &Path) -> Result<MediaMetadata, PipelineError> {
        self.probed.borrow_mut().push(video.to_path_buf());
        let mut metadata = MediaMetadata::with_duration(self.duration);
        if !self.has_video {
            metadata.video = None;
        }
        Ok(metadata)
    }

    fn sample_frames(
        &self,
        _video: &Path,
        frames_directory: &Path,
        _request: &SamplingRequest,
    ) -> Result<u64, PipelineError> {
        self.sample_calls.set(self.sample_calls.get() + 1);
        self.frames_directory_existed.set(frames_directory.is_dir());
        if let Some(diagnostic) = &self.failure {
            return Err(PipelineError::Ffmpeg(diagnostic.clone()));
        }
        for index in 1..=self.frames_to_write {
            fs::write(frames_directory.join(frame_file_name(index)), b"jpeg")?;
        }
        Ok(self.frames_to_write)
    }
}

/// Console that answers from a script and records everything printed.
pub struct FakeConsole {
    pub user_id: String,
    pub selection: Option<String>,
    pub offered: RefCell<Vec<String>>,
    pub lines: RefCell<Vec<String>>,
}

impl FakeConsole {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            selection: None,
            offered: RefCell::new(Vec::new()),
            lines: RefCell::new(Vec::new()),
        }
    }

    /// Pick `name` instead of the first offered choice.
    pub fn choosing(mut self, name: &str) -> Self {
        self.selection = Some(name.to_string());
        self
    }

    pub fn printed(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|line| line.contains(needle))
    }
}

impl Console for FakeConsole {
    fn prompt_user_id(&self) -> Result<String, PipelineError> {
        Ok(self.user_id.clone())
    }

    fn select_video(&self, choices: &[String]) -> Result<String, PipelineError> {
        *self.offered.borrow_mut() = choices.to_vec();
        match &self.selection {
            Some(selection) => Ok(selection.clone()),
            None => choices
                .first()
                .cloned()
                .ok_or_else(|| PipelineError::Prompt("no choices".to_string())),
        }
    }

    fn info(&self, message: &str) {
        self.lines.borrow_mut().push(message.to_string());
    }

    fn success(&self, message: &str) {
        self.lines.borrow_mut().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.lines.borrow_mut().push(message.to_string());
    }
}

/// Command runner that returns a canned exit status.
pub struct FakeRunner {
    pub exit_code: Option<i32>,
    pub stderr: String,
    pub calls: RefCell<Vec<(PathBuf, Vec<OsString>)>>,
}

impl FakeRunner {
    pub fn exiting_with(exit_code: i32, stderr: &str) -> Self {
        Self {
            exit_code: Some(exit_code),
            stderr: stderr.to_string(),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<CommandOutput, PipelineError> {
        self.calls
            .borrow_mut()
            .push((program.to_path_buf(), args.to_vec()));
        Ok(CommandOutput {
            exit_code: self.exit_code,
            stderr: self.stderr.clone(),
        })
    }
}
