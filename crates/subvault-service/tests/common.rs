//! Common test utilities for subvault integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::http::{header, HeaderName, HeaderValue};
use axum::Router;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use wiremock::MockServer;

use subvault_core::{Subtitle, UserId, UserProfile};
use subvault_service::auth::JwtClaims;
use subvault_service::config::DEFAULT_CREDENTIAL_SECRET;
use subvault_service::crypto::CredentialCipher;
use subvault_service::{create_router, AppState, ServiceConfig};
use subvault_store::{MemoryStore, Store};

/// Secret the test identity provider signs tokens with.
pub const JWT_SECRET: &str = "integration-test-secret";

/// Server default provider key.
pub const SERVER_API_KEY: &str = "server-key";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Stand-in for the transcript provider.
    pub provider: MockServer,
    /// Direct handle on the backing store for seeding and inspection.
    pub store: Arc<MemoryStore>,
    /// A test user ID for authenticated requests.
    pub test_user_id: UserId,
}

impl TestHarness {
    /// Create a harness with a server default provider key.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a harness with the given server default provider key.
    pub async fn with_server_key(server_key: Option<&str>) -> Self {
        Self::with_config(|config| {
            config.transcript_api_key = server_key.map(str::to_string);
        })
        .await
    }

    /// Create a harness, adjusting the service configuration first.
    pub async fn with_config(configure: impl FnOnce(&mut ServiceConfig)) -> Self {
        let provider = MockServer::start().await;
        let store = Arc::new(MemoryStore::new());

        let mut config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            auth_jwt_secret: Some(JWT_SECRET.into()),
            transcript_api_url: provider.uri(),
            transcript_api_key: Some(SERVER_API_KEY.into()),
            cors_origins: vec!["*".into()],
            request_timeout_seconds: 30,
            ..ServiceConfig::default()
        };
        configure(&mut config);

        let state = AppState::new(store.clone(), config).expect("Failed to build app state");
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            provider,
            store,
            test_user_id: UserId::generate(),
        }
    }

    /// Authorization header name.
    pub fn auth_name() -> HeaderName {
        header::AUTHORIZATION
    }

    /// Get the authorization header for the test user.
    pub fn user_auth_header(&self) -> HeaderValue {
        Self::auth_header_for(&self.test_user_id)
    }

    /// Get a different user's auth header (for testing isolation).
    pub fn other_user_auth_header() -> HeaderValue {
        Self::auth_header_for(&UserId::generate())
    }

    /// Bearer header carrying a freshly signed token for `user_id`.
    pub fn auth_header_for(user_id: &UserId) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", mint_token(user_id)))
            .expect("Token is a valid header value")
    }

    /// Seed `count` saved subtitles for the test user, created now.
    pub async fn seed_subtitles(&self, count: usize) {
        self.seed_subtitles_at(count, Utc::now()).await;
    }

    /// Seed `count` saved subtitles for the test user at a fixed time.
    pub async fn seed_subtitles_at(&self, count: usize, created_at: DateTime<Utc>) {
        for i in 0..count {
            let subtitle = Subtitle::new(
                self.test_user_id,
                format!("Seeded {i}"),
                "seeded content".into(),
            )
            .with_created_at(created_at);
            self.store
                .insert_subtitle(&subtitle)
                .await
                .expect("Failed to seed subtitle");
        }
    }

    /// Store a personal key for the test user, encrypted the way the service does.
    pub async fn seed_personal_key(&self, plaintext: &str) {
        let cipher = CredentialCipher::new(DEFAULT_CREDENTIAL_SECRET);
        self.seed_raw_key(&cipher.encrypt(plaintext)).await;
    }

    /// Store an arbitrary ciphertext as the test user's key.
    pub async fn seed_raw_key(&self, ciphertext: &str) {
        let mut profile = UserProfile::new(self.test_user_id, None);
        profile.set_api_key(ciphertext.to_string());
        self.store
            .put_profile(&profile)
            .await
            .expect("Failed to seed profile");
    }
}

/// Sign a session token the way the identity provider does.
pub fn mint_token(user_id: &UserId) -> String {
    let claims = JwtClaims {
        sub: user_id.to_string(),
        email: Some("viewer@example.com".into()),
        aud: Some(serde_json::Value::String("authenticated".into())),
        iss: None,
        exp: Utc::now().timestamp() + 3600,
        role: Some("authenticated".into()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign token")
}
