//! Crate-level tests for the auth flows

#[cfg(test)]
mod use_case_tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use kernel::id::UserId;

    use crate::application::{
        AuthConfig, CurrentUserUseCase, LoginInput, LoginUseCase, LogoutUseCase,
        RefreshSessionUseCase, RegisterInput, RegisterOutput, RegisterUseCase, TokenIssuer,
        VerifyUseCase,
    };
    use crate::domain::entity::RefreshToken;
    use crate::domain::repository::UserRepository;
    use crate::error::AuthError;
    use crate::infra::InMemoryUserRepository;

    struct Harness {
        repo: Arc<InMemoryUserRepository>,
        issuer: Arc<TokenIssuer>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                repo: Arc::new(InMemoryUserRepository::new()),
                issuer: Arc::new(TokenIssuer::new(Arc::new(AuthConfig::development()))),
            }
        }

        async fn register(&self, email: &str, password: &str, name: &str) -> Result<RegisterOutput, AuthError> {
            RegisterUseCase::new(self.repo.clone())
                .execute(RegisterInput {
                    email: email.to_string(),
                    user_name: name.to_string(),
                    password: password.to_string(),
                    first_name: None,
                    last_name: None,
                })
                .await
        }

        async fn login(&self, email: &str, password: &str) -> Result<crate::application::SessionOutput, AuthError> {
            LoginUseCase::new(self.repo.clone(), self.issuer.clone())
                .execute(LoginInput {
                    email: email.to_string(),
                    password: password.to_string(),
                })
                .await
        }

        async fn verify(&self, token: &str) -> Result<UserId, AuthError> {
            VerifyUseCase::new(self.repo.clone()).execute(token).await
        }

        fn refresh(&self) -> RefreshSessionUseCase<InMemoryUserRepository> {
            RefreshSessionUseCase::new(self.repo.clone(), self.issuer.clone())
        }
    }

    #[tokio::test]
    async fn test_full_scenario() {
        let h = Harness::new();

        let alice = h.register("a@x.com", "pw1", "alice").await.unwrap();
        assert_eq!(alice.user_id, UserId::from_i64(1));

        assert!(matches!(
            h.register("A@X.com", "pw2", "bob").await,
            Err(AuthError::EmailInUse)
        ));

        assert!(matches!(h.verify("WRONG").await, Err(AuthError::InvalidToken)));
        assert_eq!(
            h.verify(alice.verification_token.as_str()).await.unwrap(),
            alice.user_id
        );

        let session = h.login("a@x.com", "pw1").await.unwrap();
        let claims = h.issuer.validate_session_token(&session.session_token).unwrap();
        assert_eq!(claims.sub, "1");
        assert_eq!(claims.name, "alice");

        assert!(matches!(
            h.login("a@x.com", "wrongpw").await,
            Err(AuthError::WrongPassword)
        ));
    }

    #[tokio::test]
    async fn test_register_username_taken() {
        let h = Harness::new();
        h.register("a@x.com", "pw1", "alice").await.unwrap();
        assert!(matches!(
            h.register("b@x.com", "pw1", "ALICE").await,
            Err(AuthError::UserNameTaken)
        ));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let h = Harness::new();
        assert!(matches!(
            h.register("not-an-email", "pw1", "alice").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            h.register("a@x.com", "", "alice").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            h.register("a@x.com", "pw1", "a").await,
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_login_precedence() {
        let h = Harness::new();

        assert!(matches!(
            h.login("nobody@x.com", "pw1").await,
            Err(AuthError::UserNotFound)
        ));

        h.register("a@x.com", "pw1", "alice").await.unwrap();

        // Unverified AND wrong password: the password check wins
        assert!(matches!(
            h.login("a@x.com", "wrong").await,
            Err(AuthError::WrongPassword)
        ));
        assert!(matches!(
            h.login("a@x.com", "pw1").await,
            Err(AuthError::NotVerified)
        ));
    }

    #[tokio::test]
    async fn test_login_email_case_insensitive() {
        let h = Harness::new();
        let out = h.register("a@x.com", "pw1", "alice").await.unwrap();
        h.verify(out.verification_token.as_str()).await.unwrap();
        assert!(h.login("A@X.COM", "pw1").await.is_ok());
    }

    #[tokio::test]
    async fn test_verification_token_single_use() {
        let h = Harness::new();
        let out = h.register("a@x.com", "pw1", "alice").await.unwrap();
        h.verify(out.verification_token.as_str()).await.unwrap();
        assert!(matches!(
            h.verify(out.verification_token.as_str()).await,
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(h.verify("   ").await, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_refresh_rotates() {
        let h = Harness::new();
        let out = h.register("a@x.com", "pw1", "alice").await.unwrap();
        h.verify(out.verification_token.as_str()).await.unwrap();
        let session = h.login("a@x.com", "pw1").await.unwrap();

        let first = session.refresh_token.token.clone();
        let refreshed = h.refresh().execute(&first).await.unwrap();
        assert_ne!(refreshed.refresh_token.token, first);
        assert!(h.issuer.validate_session_token(&refreshed.session_token).is_ok());

        assert!(matches!(
            h.refresh().execute(&first).await,
            Err(AuthError::InvalidOrExpiredToken)
        ));
        assert!(h.refresh().execute(&refreshed.refresh_token.token).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_expiry_boundary() {
        let h = Harness::new();
        let out = h.register("a@x.com", "pw1", "alice").await.unwrap();

        let now = Utc::now();
        let token = RefreshToken {
            token: "fixed-token".to_string(),
            created_at: now - Duration::hours(24),
            expires_at: now,
        };
        h.repo.store_refresh_token(out.user_id, &token).await.unwrap();

        assert!(matches!(
            h.refresh().execute_at("fixed-token", now).await,
            Err(AuthError::InvalidOrExpiredToken)
        ));
        assert!(matches!(
            h.refresh()
                .execute_at("fixed-token", now + Duration::seconds(1))
                .await,
            Err(AuthError::InvalidOrExpiredToken)
        ));
        assert!(
            h.refresh()
                .execute_at("fixed-token", now - Duration::seconds(1))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_refresh_unknown_token() {
        let h = Harness::new();
        assert!(matches!(
            h.refresh().execute("nope").await,
            Err(AuthError::InvalidOrExpiredToken)
        ));
        assert!(matches!(
            h.refresh().execute("").await,
            Err(AuthError::InvalidOrExpiredToken)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_refresh_single_winner() {
        let h = Harness::new();
        let out = h.register("a@x.com", "pw1", "alice").await.unwrap();
        h.verify(out.verification_token.as_str()).await.unwrap();
        let token = h.login("a@x.com", "pw1").await.unwrap().refresh_token.token;

        let a = h.refresh();
        let b = h.refresh();
        let (ra, rb) = tokio::join!(a.execute(&token), b.execute(&token));
        assert_eq!(ra.is_ok() as u8 + rb.is_ok() as u8, 1);
    }

    #[tokio::test]
    async fn test_login_without_secret_is_configuration_error() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let out = RegisterUseCase::new(repo.clone())
            .execute(RegisterInput {
                email: "a@x.com".to_string(),
                user_name: "alice".to_string(),
                password: "pw1".to_string(),
                first_name: None,
                last_name: None,
            })
            .await
            .unwrap();
        VerifyUseCase::new(repo.clone())
            .execute(out.verification_token.as_str())
            .await
            .unwrap();

        let issuer = Arc::new(TokenIssuer::new(Arc::new(AuthConfig::default())));
        let result = LoginUseCase::new(repo.clone(), issuer)
            .execute(LoginInput {
                email: "a@x.com".to_string(),
                password: "pw1".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::Configuration(_))));

        // No refresh token was bound
        let user = repo.find_by_id(out.user_id).await.unwrap().unwrap();
        assert!(user.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_token() {
        let h = Harness::new();
        let out = h.register("a@x.com", "pw1", "alice").await.unwrap();
        h.verify(out.verification_token.as_str()).await.unwrap();
        let token = h.login("a@x.com", "pw1").await.unwrap().refresh_token.token;

        let logout = LogoutUseCase::new(h.repo.clone());
        assert!(logout.execute(Some(&token)).await.unwrap());
        assert!(!logout.execute(Some(&token)).await.unwrap());
        assert!(!logout.execute(None).await.unwrap());

        assert!(matches!(
            h.refresh().execute(&token).await,
            Err(AuthError::InvalidOrExpiredToken)
        ));
    }

    #[tokio::test]
    async fn test_current_user() {
        let h = Harness::new();
        let out = h.register("a@x.com", "pw1", "Alice").await.unwrap();

        let user = CurrentUserUseCase::new(h.repo.clone())
            .execute(out.user_id)
            .await
            .unwrap();
        assert_eq!(user.user_name.original(), "Alice");

        assert!(matches!(
            CurrentUserUseCase::new(h.repo.clone())
                .execute(UserId::from_i64(99))
                .await,
            Err(AuthError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_expired_refresh_tokens() {
        let h = Harness::new();
        let out = h.register("a@x.com", "pw1", "alice").await.unwrap();
        let now = Utc::now();
        let token = RefreshToken::generate(now - Duration::hours(25), Duration::hours(24));
        h.repo.store_refresh_token(out.user_id, &token).await.unwrap();

        assert_eq!(h.repo.delete_expired_refresh_tokens(now).await.unwrap(), 1);
        assert_eq!(h.repo.delete_expired_refresh_tokens(now).await.unwrap(), 0);
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::application::AuthConfig;
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::Email;
    use crate::infra::InMemoryUserRepository;
    use crate::presentation::router::auth_router_generic;

    fn app(repo: InMemoryUserRepository) -> Router {
        Router::new().nest("/api/Auth", auth_router_generic(repo, AuthConfig::development()))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn set_cookie(response: &axum::response::Response) -> String {
        response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    /// Register and verify through the API, returning the new id
    async fn registered_user(repo: &InMemoryUserRepository) -> i64 {
        let response = app(repo.clone())
            .oneshot(post_json(
                "/api/Auth/Register",
                json!({"email": "a@x.com", "username": "alice", "password": "pw1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let id = body_json(response).await["data"].as_i64().unwrap();

        let user = repo
            .find_by_email(&Email::new("a@x.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        let token = user.verification_token.unwrap();

        let response = app(repo.clone())
            .oneshot(post_json(
                "/api/Auth/Verify",
                json!({"token": token.as_str()}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        id
    }

    #[tokio::test]
    async fn test_register_envelope() {
        let repo = InMemoryUserRepository::new();
        assert_eq!(registered_user(&repo).await, 1);

        let response = app(repo)
            .oneshot(post_json(
                "/api/Auth/Register",
                json!({"email": "A@X.com", "username": "bob", "password": "pw2"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["returnMessage"], "Email is already in use");
        assert!(body["data"].is_null());
    }

    #[tokio::test]
    async fn test_login_sets_cookie_and_current_user() {
        let repo = InMemoryUserRepository::new();
        registered_user(&repo).await;

        let response = app(repo.clone())
            .oneshot(post_json(
                "/api/Auth/Login",
                json!({"email": "a@x.com", "password": "pw1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = set_cookie(&response);
        assert!(cookie.starts_with("refreshToken="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=86400"));

        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        let token = body["data"].as_str().unwrap().to_string();

        let response = app(repo)
            .oneshot(
                Request::builder()
                    .uri("/api/Auth/GetCurrentUser")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["id"], 1);
        assert_eq!(body["data"]["username"], "alice");
        assert_eq!(body["data"]["verified"], true);
    }

    #[tokio::test]
    async fn test_current_user_requires_bearer() {
        let response = app(InMemoryUserRepository::new())
            .oneshot(
                Request::builder()
                    .uri("/api/Auth/GetCurrentUser")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_refresh_via_cookie() {
        let repo = InMemoryUserRepository::new();
        registered_user(&repo).await;

        let response = app(repo.clone())
            .oneshot(post_json(
                "/api/Auth/Login",
                json!({"email": "a@x.com", "password": "pw1"}),
            ))
            .await
            .unwrap();
        let cookie = set_cookie(&response);
        let pair = cookie.split(';').next().unwrap().to_string();

        let refresh = |pair: String| {
            Request::builder()
                .method("POST")
                .uri("/api/Auth/RefreshToken")
                .header(header::COOKIE, pair)
                .body(Body::empty())
                .unwrap()
        };

        let response = app(repo.clone()).oneshot(refresh(pair.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let rotated = set_cookie(&response);
        assert_ne!(rotated.split(';').next().unwrap(), pair);
        assert_eq!(body_json(response).await["success"], true);

        // The old value no longer redeems
        let response = app(repo).oneshot(refresh(pair)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await["returnMessage"],
            "Invalid or expired refresh token"
        );
    }

    #[tokio::test]
    async fn test_refresh_without_cookie() {
        let response = app(InMemoryUserRepository::new())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/Auth/RefreshToken")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_clears_cookie() {
        let response = app(InMemoryUserRepository::new())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/Auth/Logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response).contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_login_without_secret_is_problem_response() {
        let repo = InMemoryUserRepository::new();
        registered_user(&repo).await;

        let router = Router::new().nest(
            "/api/Auth",
            auth_router_generic(repo, AuthConfig::default()),
        );
        let response = router
            .oneshot(post_json(
                "/api/Auth/Login",
                json!({"email": "a@x.com", "password": "pw1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body.get("success").is_none());
    }
}
