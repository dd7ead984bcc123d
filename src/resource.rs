//! Remote resources and the names derived from them.
//!
//! A [`VideoResource`] is one entry of a media store listing. Everything the
//! operator sees and every local path is derived from its public id:
//! the display name is the last `/` segment, and the basename used for
//! directories is the display name without its last extension.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Deserialize;

use crate::error::PipelineError;

/// Operator-supplied user identifier.
///
/// Trimmed on construction. Empty identifiers and identifiers that could
/// escape the per-user namespace (`/`, `\`, `..`) are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Validate and wrap a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidUserId`] for empty input or input
    /// containing a path separator or `..`, and for a bare `.`.
    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        let value = raw.trim();
        let reject = |reason: &'static str| -> Result<Self, PipelineError> {
            Err(PipelineError::InvalidUserId {
                value: value.to_string(),
                reason,
            })
        };

        if value.is_empty() {
            return reject("must not be empty");
        }
        if value.contains(['/', '\\']) {
            return reject("must not contain path separators");
        }
        if value.contains("..") {
            return reject("must not contain '..'");
        }
        if value == "." {
            return reject("must not be '.'");
        }
        Ok(Self(value.to_string()))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Listing prefix for this user's uploads: `users/<id>/`.
    pub fn prefix(&self) -> String {
        format!("users/{}/", self.0)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// One video resource as reported by the media store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VideoResource {
    /// Full public id, e.g. `users/42/living-room`.
    pub public_id: String,
    /// Container format reported by the store (`"mp4"`, `"mov"`, …).
    #[serde(default)]
    pub format: Option<String>,
    /// Stored size in bytes.
    #[serde(default)]
    pub bytes: Option<u64>,
    /// Duration in seconds, when the store has analysed the upload.
    #[serde(default)]
    pub duration: Option<f64>,
    /// HTTPS delivery URL of the original upload.
    #[serde(default)]
    pub secure_url: Option<String>,
    /// Upload timestamp, RFC 3339.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl VideoResource {
    /// A resource with only its public id set.
    pub fn new(public_id: impl Into<String>) -> Self {
        Self {
            public_id: public_id.into(),
            format: None,
            bytes: None,
            duration: None,
            secure_url: None,
            created_at: None,
        }
    }

    /// Name shown to the operator: the last `/` segment of the public id.
    pub fn display_name(&self) -> &str {
        display_name(&self.public_id)
    }

    /// File name the download is saved under.
    ///
    /// The display name, plus the store-reported format as extension when
    /// the display name has none.
    pub fn file_name(&self) -> String {
        let name = self.display_name();
        match &self.format {
            Some(format) if !format.is_empty() && !name.contains('.') => {
                format!("{name}.{format}")
            }
            _ => name.to_string(),
        }
    }
}

/// Last `/`-separated segment of `public_id`.
pub fn display_name(public_id: &str) -> &str {
    public_id.rsplit('/').next().unwrap_or(public_id)
}

/// `name` with everything from its last `.` removed.
///
/// A name without a dot is returned unchanged.
pub fn strip_extension(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}

/// Display names for the selection prompt, in listing order.
pub fn choices(resources: &[VideoResource]) -> Vec<String> {
    resources
        .iter()
        .map(|resource| resource.display_name().to_string())
        .collect()
}

/// Resolve a selected display name back to its resource by exact match.
///
/// # Errors
///
/// Returns [`PipelineError::SelectionNotFound`] when nothing matches.
pub fn resolve_selection<'a>(
    resources: &'a [VideoResource],
    selected: &str,
) -> Result<&'a VideoResource, PipelineError> {
    resources
        .iter()
        .find(|resource| resource.display_name() == selected)
        .ok_or_else(|| PipelineError::SelectionNotFound(selected.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_is_trimmed_and_prefixed() {
        let user = UserId::parse("  42 ").unwrap();
        assert_eq!(user.as_str(), "42");
        assert_eq!(user.prefix(), "users/42/");
    }

    #[test]
    fn user_id_rejects_empty_and_traversal() {
        assert!(UserId::parse("   ").is_err());
        assert!(UserId::parse("a/b").is_err());
        assert!(UserId::parse("a\\b").is_err());
        assert!(UserId::parse("..").is_err());
        assert!(UserId::parse(" . ").is_err());
        assert_eq!(UserId::parse("a.b").unwrap().as_str(), "a.b");
    }

    #[test]
    fn display_name_is_last_segment() {
        assert_eq!(display_name("users/42/sofa"), "sofa");
        assert_eq!(display_name("sofa"), "sofa");
        assert_eq!(display_name("users/42/"), "");
    }

    #[test]
    fn strip_extension_removes_last_only() {
        assert_eq!(strip_extension("chair.mov"), "chair");
        assert_eq!(strip_extension("chair.final.mp4"), "chair.final");
        assert_eq!(strip_extension("chair"), "chair");
    }

    #[test]
    fn file_name_appends_reported_format() {
        let mut resource = VideoResource::new("users/1/lamp");
        assert_eq!(resource.file_name(), "lamp");

        resource.format = Some("mp4".into());
        assert_eq!(resource.file_name(), "lamp.mp4");

        let dotted = VideoResource {
            format: Some("mp4".into()),
            ..VideoResource::new("users/1/lamp.mov")
        };
        assert_eq!(dotted.file_name(), "lamp.mov");
    }

    #[test]
    fn resolve_selection_exact_match() {
        let resources = vec![
            VideoResource::new("users/7/table"),
            VideoResource::new("users/7/tables"),
        ];

        assert_eq!(choices(&resources), vec!["table", "tables"]);
        let found = resolve_selection(&resources, "tables").unwrap();
        assert_eq!(found.public_id, "users/7/tables");
        assert!(matches!(
            resolve_selection(&resources, "tab"),
            Err(PipelineError::SelectionNotFound(name)) if name == "tab"
        ));
    }

    #[test]
    fn resource_deserializes_store_entry() {
        let json = r#"{
            "public_id": "users/7/vase",
            "format": "mp4",
            "resource_type": "video",
            "type": "upload",
            "bytes": 1048576,
            "duration": 12.5,
            "secure_url": "https://res.cloudinary.com/demo/video/upload/v1/users/7/vase.mp4",
            "created_at": "2024-05-01T10:00:00Z"
        }"#;
        let resource: VideoResource = serde_json::from_str(json).unwrap();
        assert_eq!(resource.display_name(), "vase");
        assert_eq!(resource.bytes, Some(1_048_576));
        assert_eq!(resource.duration, Some(12.5));
    }
}
