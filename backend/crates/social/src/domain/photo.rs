//! Photo Service
//!
//! Delegates image storage to an external host. Results are the host's own
//! response bodies; known fields are typed, everything else is carried
//! through untouched in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhotoError {
    /// The host answered with a non-success status
    #[error("Photo host error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// The host could not be reached or its body could not be read
    #[error("Photo host unreachable: {0}")]
    Transport(String),

    #[error("Photo host configuration error: {0}")]
    Configuration(String),
}

/// File received from a client
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for PhotoUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Upload response as returned by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    pub public_id: String,
    pub secure_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Deletion response as returned by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletionResult {
    /// `"ok"` or `"not found"`
    pub result: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Photo host interface
#[trait_variant::make(PhotoService: Send)]
pub trait LocalPhotoService {
    async fn upload(&self, file: PhotoUpload) -> Result<UploadResult, PhotoError>;

    async fn delete(&self, public_id: &str) -> Result<DeletionResult, PhotoError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_survive_roundtrip() {
        let raw = json!({
            "public_id": "albums/abc",
            "secure_url": "https://res.example/abc.jpg",
            "width": 500,
            "height": 500,
            "format": "jpg"
        });
        let parsed: UploadResult = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(parsed.public_id, "albums/abc");
        assert_eq!(parsed.extra["width"], 500);
        assert_eq!(serde_json::to_value(&parsed).unwrap(), raw);
    }
}
