//! Client tests against a mock server

#[cfg(test)]
mod api_client_tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::client::ApiClient;
    use crate::error::ClientError;
    use crate::models::RegisterRequest;

    fn envelope(data: serde_json::Value, message: &str) -> serde_json::Value {
        json!({"success": true, "returnMessage": message, "data": data})
    }

    async fn logged_in(server: &MockServer) -> ApiClient {
        Mock::given(method("POST"))
            .and(path("/api/Auth/Login"))
            .and(body_json(json!({"email": "a@x.com", "password": "pw1"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "refreshToken=abc; HttpOnly; Path=/")
                    .set_body_json(envelope(json!("session-1"), "Logged in")),
            )
            .mount(server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        client.login("a@x.com", "pw1").await.unwrap();
        client
    }

    #[tokio::test]
    async fn test_rejects_base_url_without_scheme() {
        assert!(matches!(
            ApiClient::new("localhost:31113"),
            Err(ClientError::InvalidBaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_register_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/Auth/Register"))
            .and(body_json(json!({
                "email": "a@x.com",
                "username": "alice",
                "password": "pw1"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(1), "ok")))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let id = client
            .register(&RegisterRequest {
                email: "a@x.com".into(),
                username: "alice".into(),
                password: "pw1".into(),
                ..RegisterRequest::default()
            })
            .await
            .unwrap();
        assert_eq!(id, 1);
        assert!(!client.is_logged_in().await);
    }

    #[tokio::test]
    async fn test_login_attaches_bearer_afterwards() {
        let server = MockServer::start().await;
        let client = logged_in(&server).await;
        assert_eq!(client.session_token().await.as_deref(), Some("session-1"));

        Mock::given(method("GET"))
            .and(path("/api/Auth/GetCurrentUser"))
            .and(header("authorization", "Bearer session-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
                json!({
                    "id": 1,
                    "email": "a@x.com",
                    "username": "alice",
                    "firstName": null,
                    "lastName": null,
                    "createdAt": "2024-03-01T12:00:00Z",
                    "verified": true
                }),
                "Current user",
            )))
            .mount(&server)
            .await;

        let user = client.current_user().await.unwrap();
        assert_eq!(user.username, "alice");
        assert!(user.verified);
    }

    #[tokio::test]
    async fn test_refresh_replays_cookie_and_stores_token() {
        let server = MockServer::start().await;
        let client = logged_in(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/Auth/RefreshToken"))
            .and(header("cookie", "refreshToken=abc"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(envelope(json!("session-2"), "ok")),
            )
            .mount(&server)
            .await;

        assert_eq!(client.refresh_token().await.unwrap(), "session-2");
        assert_eq!(client.session_token().await.as_deref(), Some("session-2"));
    }

    #[tokio::test]
    async fn test_failure_envelope_becomes_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/Auth/Login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "success": false,
                "returnMessage": "Wrong password",
                "data": null
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let err = client.login("a@x.com", "nope").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Api { status: 401, ref message } if message == "Wrong password"
        ));
        assert!(!client.is_logged_in().await);
    }

    #[tokio::test]
    async fn test_problem_body_becomes_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/Auth/Login"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "type": "about:blank",
                "title": "Internal Server Error",
                "status": 500,
                "detail": "Configuration error: JWT signing secret is not set"
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let err = client.login("a@x.com", "pw1").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("JWT signing secret"));
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let server = MockServer::start().await;
        let client = logged_in(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/Auth/Logout"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "returnMessage": "Logged out",
                "data": null
            })))
            .mount(&server)
            .await;

        client.logout().await.unwrap();
        assert!(!client.is_logged_in().await);
    }

    #[tokio::test]
    async fn test_list_albums_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/Album"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
                json!([{
                    "id": 3,
                    "ownerId": 1,
                    "ownerName": "alice",
                    "title": "Blue",
                    "artist": "Joni Mitchell",
                    "genre": null,
                    "releaseYear": 1971,
                    "description": null,
                    "photoUrl": null,
                    "likeCount": 2,
                    "createdAt": "2024-03-01T12:00:00Z"
                }]),
                "Albums",
            )))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let albums = client.list_albums(Some(5), None).await.unwrap();
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].like_count, 2);
    }

    #[tokio::test]
    async fn test_upload_sends_file_field() {
        let server = MockServer::start().await;
        let client = logged_in(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/Album/3/Photo"))
            .and(header("authorization", "Bearer session-1"))
            .and(body_string_contains("name=\"file\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(
                json!({"public_id": "albums/p1", "secure_url": "https://res.example/p1.jpg"}),
                "Photo uploaded",
            )))
            .mount(&server)
            .await;

        let result = client
            .upload_album_photo(3, "cover.jpg", "image/jpeg", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(result["public_id"], "albums/p1");
    }

    #[tokio::test]
    async fn test_follow_conflict() {
        let server = MockServer::start().await;
        let client = logged_in(&server).await;

        Mock::given(method("POST"))
            .and(path("/api/User/2/Follow"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "success": false,
                "returnMessage": "Already following this user",
                "data": null
            })))
            .mount(&server)
            .await;

        let err = client.follow(2).await.unwrap_err();
        assert_eq!(err.status(), Some(409));
    }
}
