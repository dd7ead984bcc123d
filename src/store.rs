//! The media store seam and the chunked downloader built on it.
//!
//! [`MediaStore`] is everything the pipeline needs from the cloud: list a
//! user's videos, turn a public id into a delivery URL, and open that URL
//! as a byte stream. [`CloudinaryStore`](crate::CloudinaryStore) is the
//! production implementation; tests substitute their own.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
    sync::Arc,
};

use crate::{
    error::PipelineError,
    progress::{OperationType, ProgressCallback, ProgressTracker},
    resource::VideoResource,
};

/// A readable response body plus its advertised length.
pub struct RemoteStream {
    /// The body.
    pub reader: Box<dyn Read + Send>,
    /// `Content-Length`, when the server sent one.
    pub content_length: Option<u64>,
}

impl RemoteStream {
    pub fn new(reader: impl Read + Send + 'static, content_length: Option<u64>) -> Self {
        Self {
            reader: Box::new(reader),
            content_length,
        }
    }
}

/// Access to a cloud media store.
pub trait MediaStore {
    /// List up to `max_results` video resources whose public id starts with
    /// `prefix`.
    fn list_videos(
        &self,
        prefix: &str,
        max_results: u32,
    ) -> Result<Vec<VideoResource>, PipelineError>;

    /// Delivery URL for the video with `public_id`.
    fn delivery_url(&self, public_id: &str) -> String;

    /// Issue a streaming GET for `url`. Non-2xx answers are errors.
    fn open(&self, url: &str) -> Result<RemoteStream, PipelineError>;
}

/// Download the video `public_id` from `store` into `destination`.
///
/// The body is copied `chunk_size` bytes at a time. Returns the number of
/// bytes written. The destination's parent directory must already exist.
///
/// # Errors
///
/// Any store, network, or I/O failure. A partially written file is left in
/// place.
pub fn download_video(
    store: &dyn MediaStore,
    public_id: &str,
    destination: &Path,
    chunk_size: usize,
    progress: Arc<dyn ProgressCallback>,
) -> Result<u64, PipelineError> {
    let url = store.delivery_url(public_id);
    log::info!("Downloading {public_id} from {url}");

    let RemoteStream {
        mut reader,
        content_length,
    } = store.open(&url)?;

    let mut writer = BufWriter::new(File::create(destination)?);
    let mut tracker = ProgressTracker::new(progress, OperationType::Download, content_length);
    let mut chunk = vec![0_u8; chunk_size.max(1)];

    loop {
        let read = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => read,
            Err(error) if error.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error.into()),
        };
        writer.write_all(&chunk[..read])?;
        tracker.advance(read as u64);
    }
    writer.flush()?;
    tracker.finish();

    log::debug!(
        "Wrote {} bytes to {}",
        tracker.current(),
        destination.display()
    );
    Ok(tracker.current())
}
