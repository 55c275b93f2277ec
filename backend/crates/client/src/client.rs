//! API Client
//!
//! Every call sends and receives JSON, attaches `Authorization: Bearer`
//! while a session token is held, and unwraps the response envelope.
//! The refresh token never passes through this type: it lives in the
//! cookie store and is replayed by reqwest.

use std::sync::Arc;

use kernel::response::ServiceResponse;
use reqwest::{Method, RequestBuilder, Response, multipart};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::{ClientError, ClientResult};
use crate::models::{
    AlbumDto, CreateAlbumRequest, FollowDto, LoginRequest, Problem, ProfileDto, RegisterRequest,
    UserDto, VerifyRequest,
};

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for a server root such as `http://localhost:31113`
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl(base_url));
        }

        let http = reqwest::Client::builder().cookie_store(true).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session: Arc::new(RwLock::new(None)),
        })
    }

    /// Currently held session token
    pub async fn session_token(&self) -> Option<String> {
        self.session.read().await.clone()
    }

    pub async fn set_session_token(&self, token: Option<String>) {
        *self.session.write().await = token;
    }

    pub async fn is_logged_in(&self) -> bool {
        self.session.read().await.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.read().await.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and unwrap the envelope, returning its optional payload
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<Option<T>> {
        let response = builder.send().await?;
        decode(response).await
    }

    async fn send_data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        self.send(builder).await?.ok_or(ClientError::MissingData)
    }

    async fn send_unit(&self, builder: RequestBuilder) -> ClientResult<()> {
        self.send::<Value>(builder).await.map(|_| ())
    }

    // ========================================================================
    // Auth
    // ========================================================================

    /// Returns the new user id
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<i64> {
        let builder = self.request(Method::POST, "/Auth/Register").await.json(request);
        self.send_data(builder).await
    }

    pub async fn verify(&self, token: &str) -> ClientResult<()> {
        let builder = self
            .request(Method::POST, "/Auth/Verify")
            .await
            .json(&VerifyRequest { token });
        self.send_unit(builder).await
    }

    /// Log in and keep the returned session token
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<String> {
        let builder = self
            .request(Method::POST, "/Auth/Login")
            .await
            .json(&LoginRequest { email, password });
        let token: String = self.send_data(builder).await?;

        self.set_session_token(Some(token.clone())).await;
        tracing::debug!("Session token stored after login");
        Ok(token)
    }

    /// Trade the refresh cookie for a new session token
    pub async fn refresh_token(&self) -> ClientResult<String> {
        let builder = self.request(Method::POST, "/Auth/RefreshToken").await;
        let token: String = self.send_data(builder).await?;

        self.set_session_token(Some(token.clone())).await;
        Ok(token)
    }

    /// Log out; the local session is dropped even if the call fails
    pub async fn logout(&self) -> ClientResult<()> {
        let builder = self.request(Method::POST, "/Auth/Logout").await;
        let result = self.send_unit(builder).await;
        self.set_session_token(None).await;
        result
    }

    pub async fn current_user(&self) -> ClientResult<UserDto> {
        let builder = self.request(Method::GET, "/Auth/GetCurrentUser").await;
        self.send_data(builder).await
    }

    // ========================================================================
    // Albums
    // ========================================================================

    pub async fn list_albums(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> ClientResult<Vec<AlbumDto>> {
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit));
        }
        if let Some(offset) = offset {
            query.push(("offset", offset));
        }

        let builder = self.request(Method::GET, "/Album").await.query(&query);
        self.send_data(builder).await
    }

    /// Returns the new album id
    pub async fn create_album(&self, request: &CreateAlbumRequest) -> ClientResult<i64> {
        let builder = self.request(Method::POST, "/Album").await.json(request);
        self.send_data(builder).await
    }

    pub async fn get_album(&self, album_id: i64) -> ClientResult<AlbumDto> {
        let builder = self
            .request(Method::GET, &format!("/Album/{album_id}"))
            .await;
        self.send_data(builder).await
    }

    pub async fn delete_album(&self, album_id: i64) -> ClientResult<()> {
        let builder = self
            .request(Method::DELETE, &format!("/Album/{album_id}"))
            .await;
        self.send_unit(builder).await
    }

    /// Upload a cover image; returns the image host's upload result
    pub async fn upload_album_photo(
        &self,
        album_id: i64,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<Value> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = multipart::Form::new().part("file", part);

        let builder = self
            .request(Method::POST, &format!("/Album/{album_id}/Photo"))
            .await
            .multipart(form);
        self.send_data(builder).await
    }

    /// Remove the cover image; returns the image host's deletion result
    pub async fn delete_album_photo(&self, album_id: i64) -> ClientResult<Value> {
        let builder = self
            .request(Method::DELETE, &format!("/Album/{album_id}/Photo"))
            .await;
        self.send_data(builder).await
    }

    pub async fn like_album(&self, album_id: i64) -> ClientResult<()> {
        let builder = self
            .request(Method::POST, &format!("/Album/{album_id}/Like"))
            .await;
        self.send_unit(builder).await
    }

    pub async fn unlike_album(&self, album_id: i64) -> ClientResult<()> {
        let builder = self
            .request(Method::DELETE, &format!("/Album/{album_id}/Like"))
            .await;
        self.send_unit(builder).await
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn get_profile(&self, user_id: i64) -> ClientResult<ProfileDto> {
        let builder = self.request(Method::GET, &format!("/User/{user_id}")).await;
        self.send_data(builder).await
    }

    pub async fn followers(&self, user_id: i64) -> ClientResult<Vec<FollowDto>> {
        let builder = self
            .request(Method::GET, &format!("/User/{user_id}/Followers"))
            .await;
        self.send_data(builder).await
    }

    pub async fn following(&self, user_id: i64) -> ClientResult<Vec<FollowDto>> {
        let builder = self
            .request(Method::GET, &format!("/User/{user_id}/Following"))
            .await;
        self.send_data(builder).await
    }

    pub async fn follow(&self, user_id: i64) -> ClientResult<()> {
        let builder = self
            .request(Method::POST, &format!("/User/{user_id}/Follow"))
            .await;
        self.send_unit(builder).await
    }

    pub async fn unfollow(&self, user_id: i64) -> ClientResult<()> {
        let builder = self
            .request(Method::DELETE, &format!("/User/{user_id}/Follow"))
            .await;
        self.send_unit(builder).await
    }
}

/// Unwrap the `{success, returnMessage, data}` envelope
///
/// Fatal server errors arrive as a problem body instead; its `detail`
/// becomes the message.
async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<Option<T>> {
    let status = response.status().as_u16();
    let bytes = response.bytes().await?;

    match serde_json::from_slice::<ServiceResponse<T>>(&bytes) {
        Ok(envelope) if envelope.success => Ok(envelope.data),
        Ok(envelope) => Err(ClientError::Api {
            status,
            message: envelope.return_message,
        }),
        Err(e) if (200..300).contains(&status) => Err(ClientError::Decode(e)),
        Err(_) => {
            let message = serde_json::from_slice::<Problem>(&bytes)
                .map(|p| p.detail)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            Err(ClientError::Api { status, message })
        }
    }
}
