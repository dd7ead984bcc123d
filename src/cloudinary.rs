//! Cloudinary implementation of [`MediaStore`].
//!
//! Listing goes through the Admin API
//! (`GET /v1_1/<cloud>/resources/video/upload`) with HTTP basic auth.
//! Delivery uses the unsigned public URL
//! `https://res.cloudinary.com/<cloud>/video/upload/<public id>`, which is
//! what the store serves for uploads with the default `upload` type.

use serde::Deserialize;

use crate::{
    config::CloudinaryConfig,
    error::PipelineError,
    resource::VideoResource,
    store::{MediaStore, RemoteStream},
};

/// Blocking HTTP client for one Cloudinary account.
pub struct CloudinaryStore {
    client: reqwest::blocking::Client,
    config: CloudinaryConfig,
}

/// Body of a resource listing.
#[derive(Debug, Deserialize)]
struct ResourceListing {
    #[serde(default)]
    resources: Vec<VideoResource>,
    #[serde(default)]
    next_cursor: Option<String>,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            config,
        }
    }

    /// Reuse an existing [`reqwest::blocking::Client`].
    pub fn with_client(client: reqwest::blocking::Client, config: CloudinaryConfig) -> Self {
        Self { client, config }
    }

    fn listing_url(&self) -> String {
        format!(
            "{}/v1_1/{}/resources/video/upload",
            self.config.api_base, self.config.cloud_name
        )
    }

    fn check_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, PipelineError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(PipelineError::Store {
            status: status.as_u16(),
            body,
        })
    }
}

impl MediaStore for CloudinaryStore {
    fn list_videos(
        &self,
        prefix: &str,
        max_results: u32,
    ) -> Result<Vec<VideoResource>, PipelineError> {
        log::debug!("Listing videos under {prefix} (max {max_results})");

        let max_results_param = max_results.to_string();
        let response = self
            .client
            .get(self.listing_url())
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .query(&[("prefix", prefix), ("max_results", max_results_param.as_str())])
            .send()?;
        let body = Self::check_status(response)?.text()?;
        let listing = parse_listing(&body)?;

        if listing.next_cursor.is_some() {
            log::warn!(
                "More than {max_results} videos under {prefix}; only the first page is shown"
            );
        }
        Ok(listing.resources)
    }

    fn delivery_url(&self, public_id: &str) -> String {
        format!(
            "{}/{}/video/upload/{}",
            self.config.delivery_base,
            self.config.cloud_name,
            escape_public_id(public_id)
        )
    }

    fn open(&self, url: &str) -> Result<RemoteStream, PipelineError> {
        let response = Self::check_status(self.client.get(url).send()?)?;
        let content_length = response.content_length();
        Ok(RemoteStream::new(response, content_length))
    }
}

fn parse_listing(body: &str) -> Result<ResourceListing, PipelineError> {
    Ok(serde_json::from_str(body)?)
}

/// Percent-encode every byte outside `[A-Za-z0-9_.\-/:]`.
///
/// Matches the escaping the store applies to public ids in delivery URLs,
/// so ids with spaces or non-ASCII names still resolve.
pub fn escape_public_id(public_id: &str) -> String {
    let mut escaped = String::with_capacity(public_id.len());
    for byte in public_id.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-' | b'/' | b':' => {
                escaped.push(byte as char)
            }
            _ => escaped.push_str(&format!("%{byte:02X}")),
        }
    }
    escaped
}
