//! # Common Test Utilities
//!
//! The shared harness for `pharmalens-server` integration tests:
//!
//! - `TestApp`: spawns the real server on a random port, backed by a
//!   temporary SQLite file and an `httpmock` stand-in for the AI gateway.
//! - `generate_jwt`: mints tokens the auth extractor accepts.
//! - `mock_gateway_completion`: the canned chat-completions body.

// Allow unused code because this is a test utility module, and not all
// functions might be used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use httpmock::MockServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use pharmalens_server::{
    auth::middleware::Claims,
    config, router,
    state::{build_app_state, AppState},
};
use reqwest::Client;
use serde_json::{json, Value};
use std::{
    fs::File,
    io::Write,
    net::SocketAddr,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tempfile::{tempdir, NamedTempFile, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};
use uuid::Uuid;

// --- Full Application Test Harness ---

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub db_path: PathBuf,
    pub app_state: AppState,
    _db_file: NamedTempFile,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server and returns a `TestApp` instance.
    pub async fn spawn() -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start();
        let db_file = NamedTempFile::new()?;
        let db_path = db_file.path().to_path_buf();

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
db_url: "{}"
ai:
  api_url: "{}"
  api_key: "test-gateway-key"
  model_name: "mock-chat-model"
"#,
            db_path.to_str().unwrap(),
            mock_server.url("/v1/chat/completions"),
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(Some(config_path.to_str().unwrap()))?;
        let app_state = build_app_state(config).await?;
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = axum::serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            db_path,
            app_state: app_state_for_harness,
            _db_file: db_file,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Opens a second handle onto the server's database file, for asserting
    /// on persisted state.
    pub async fn db(&self) -> Result<turso::Database> {
        let db = turso::Builder::new_local(self.db_path.to_str().unwrap())
            .build()
            .await?;
        Ok(db)
    }

    /// Counts the rows of a table.
    pub async fn count_rows(&self, table: &str) -> Result<i64> {
        let db = self.db().await?;
        let conn = db.connect()?;
        let mut rows = conn.query(&format!("SELECT COUNT(*) FROM {table}"), ()).await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| anyhow::anyhow!("COUNT returned no row"))?;
        match row.get_value(0)? {
            turso::Value::Integer(n) => Ok(n),
            other => anyhow::bail!("expected Integer, got {other:?}"),
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

// --- Mock Data Helpers ---

/// A chat-completions body the mock gateway can return.
pub fn mock_gateway_completion(content: &str) -> Value {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

/// The deterministic user id a given token subject resolves to.
pub fn user_id_for(sub: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, sub.as_bytes()).to_string()
}

/// Generates a valid JWT for a given user identifier (subject).
pub fn generate_jwt(sub: &str) -> Result<String> {
    generate_jwt_with_expiry(sub, 3600)
}

/// Generates a valid JWT with a custom expiration.
pub fn generate_jwt_with_expiry(sub: &str, expires_in_secs: u64) -> Result<String> {
    let expiration = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() + expires_in_secs;
    let claims = Claims {
        sub: sub.to_string(),
        exp: expiration as usize,
        user_id: user_id_for(sub),
    };
    let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| "a-secure-secret-key".to_string());
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;
    Ok(token)
}
