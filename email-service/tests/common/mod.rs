use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;
use email_service::domain::account::errors::AccountError;
use email_service::domain::account::models::NewUser;
use email_service::domain::account::models::User;
use email_service::domain::account::models::UserId;
use email_service::domain::account::models::Username;
use email_service::domain::account::ports::UserRepository;
use email_service::domain::account::service::AccountService;
use email_service::domain::email::errors::EmailError;
use email_service::domain::email::models::HistoryEntry;
use email_service::domain::email::models::HistoryEntryId;
use email_service::domain::email::models::NewHistoryEntry;
use email_service::domain::email::pipeline::GenerationPipeline;
use email_service::domain::email::ports::EmailHistoryRepository;
use email_service::domain::email::service::EmailService;
use email_service::inbound::http::router::create_router;
use email_service::inbound::http::router::AppState;
use email_service::outbound::inference::HuggingFaceTextGenerator;
use wiremock::MockServer;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const API_TOKEN: &str = "hf_test_token";
pub const MODEL_PATH: &str = "/models/test-model";

/// In-memory stand-in for the users table
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AccountError> {
        let mut users = self.users.lock().unwrap();
        let key = new_user.username.as_str().to_string();
        if users.contains_key(&key) {
            return Err(AccountError::DuplicateUsername(key));
        }

        let user = User {
            id: UserId::new(),
            username: new_user.username,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(key, user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AccountError> {
        Ok(self.users.lock().unwrap().get(username.as_str()).cloned())
    }
}

/// In-memory stand-in for the email_history table
#[derive(Default)]
pub struct InMemoryHistoryRepository {
    entries: Mutex<Vec<HistoryEntry>>,
}

#[async_trait]
impl EmailHistoryRepository for InMemoryHistoryRepository {
    async fn append(&self, entry: NewHistoryEntry) -> Result<HistoryEntry, EmailError> {
        let stored = HistoryEntry {
            id: HistoryEntryId::new(),
            user_id: entry.user_id,
            prompt: entry.prompt,
            tone: entry.tone,
            generated_email: entry.generated_email,
            created_at: Utc::now(),
        };
        self.entries.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<HistoryEntry>, EmailError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|entry| entry.user_id == *user_id)
            .cloned()
            .collect())
    }
}

/// Test application that spawns a real server against mocked inference endpoints
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub translation_server: MockServer,
    pub formatting_server: MockServer,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let translation_server = MockServer::start().await;
        let formatting_server = MockServer::start().await;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(Authenticator::new(JWT_SECRET));

        let timeout = Duration::from_secs(2);
        let translator = Arc::new(HuggingFaceTextGenerator::new(
            reqwest::Client::new(),
            format!("{}{}", translation_server.uri(), MODEL_PATH),
            API_TOKEN,
            timeout,
        ));
        let formatter = Arc::new(HuggingFaceTextGenerator::new(
            reqwest::Client::new(),
            format!("{}{}", formatting_server.uri(), MODEL_PATH),
            API_TOKEN,
            timeout,
        ));
        let pipeline = GenerationPipeline::new(translator, formatter).with_stage_timeout(timeout);

        let account_service = Arc::new(AccountService::new(
            Arc::new(InMemoryUserRepository::default()),
            Arc::clone(&authenticator),
        ));
        let email_service = Arc::new(EmailService::new(
            pipeline,
            Arc::new(InMemoryHistoryRepository::default()),
        ));

        let state = AppState::new(
            account_service,
            email_service,
            Arc::clone(&authenticator),
            chrono::Duration::minutes(30),
        );
        let router = create_router(state, &["http://localhost:3000".to_string()]);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            translation_server,
            formatting_server,
            authenticator,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Register `username` with a matching password pair
    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&serde_json::json!({
                "username": username,
                "password": password,
                "verify_password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register and log in, returning the access token
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        self.register(username, password).await;
        let body: serde_json::Value = self
            .login(username, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");
        body["data"]["access_token"]
            .as_str()
            .expect("Missing access token")
            .to_string()
    }
}
