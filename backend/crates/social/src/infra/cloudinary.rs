//! Cloudinary Photo Service
//!
//! Signed REST calls against the Cloudinary upload API. Signatures are the
//! SHA-1 hex of the sorted `key=value` parameters joined with `&`, with the
//! API secret appended.

use std::collections::BTreeMap;

use chrono::Utc;
use platform::crypto::sha1_hex;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::domain::photo::{
    DeletionResult, PhotoError, PhotoService, PhotoUpload, UploadResult,
};

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Square cover crop applied on upload
const COVER_TRANSFORMATION: &str = "c_fill,h_500,w_500";

/// Cloudinary account settings
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Folder uploads are placed in
    pub folder: String,
    /// API root, overridable for tests
    pub api_base: String,
}

impl CloudinaryConfig {
    /// Read `CLOUDINARY_*` variables; `None` if any credential is missing
    pub fn from_env() -> Option<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Some(Self {
            cloud_name: var("CLOUDINARY_CLOUD_NAME")?,
            api_key: var("CLOUDINARY_API_KEY")?,
            api_secret: var("CLOUDINARY_API_SECRET")?,
            folder: var("CLOUDINARY_FOLDER").unwrap_or_else(|| "albums".to_string()),
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{}",
            self.api_base.trim_end_matches('/'),
            self.cloud_name,
            action
        )
    }
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("folder", &self.folder)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Sign request parameters
pub fn sign(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let joined = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    sha1_hex(format!("{joined}{api_secret}").as_bytes())
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Cloudinary-backed [`PhotoService`]
#[derive(Clone)]
pub struct CloudinaryPhotoService {
    client: reqwest::Client,
    config: Option<CloudinaryConfig>,
}

impl CloudinaryPhotoService {
    /// Without a config every call fails with a configuration error
    pub fn new(config: Option<CloudinaryConfig>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn config(&self) -> Result<&CloudinaryConfig, PhotoError> {
        self.config.as_ref().ok_or_else(|| {
            PhotoError::Configuration("Cloudinary credentials are not set".to_string())
        })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, PhotoError> {
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| PhotoError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(PhotoError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| PhotoError::Provider {
            status: status.as_u16(),
            message: format!("unexpected response body: {e}"),
        })
    }
}

impl PhotoService for CloudinaryPhotoService {
    async fn upload(&self, file: PhotoUpload) -> Result<UploadResult, PhotoError> {
        let config = self.config()?;
        let timestamp = Utc::now().timestamp().to_string();

        let mut params = BTreeMap::new();
        params.insert("folder", config.folder.clone());
        params.insert("timestamp", timestamp.clone());
        params.insert("transformation", COVER_TRANSFORMATION.to_string());
        let signature = sign(&params, &config.api_secret);

        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|e| PhotoError::Transport(e.to_string()))?;
        }

        let form = Form::new()
            .part("file", part)
            .text("api_key", config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", config.folder.clone())
            .text("transformation", COVER_TRANSFORMATION)
            .text("signature", signature);

        let response = self
            .client
            .post(config.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| PhotoError::Transport(e.to_string()))?;

        Self::decode(response).await
    }

    async fn delete(&self, public_id: &str) -> Result<DeletionResult, PhotoError> {
        let config = self.config()?;
        let timestamp = Utc::now().timestamp().to_string();

        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        params.insert("timestamp", timestamp.clone());
        let signature = sign(&params, &config.api_secret);

        let form = [
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp),
            ("api_key", config.api_key.clone()),
            ("signature", signature),
        ];

        let response = self
            .client
            .post(config.endpoint("destroy"))
            .form(&form)
            .send()
            .await
            .map_err(|e| PhotoError::Transport(e.to_string()))?;

        Self::decode(response).await
    }
}
