#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use qrpass::config::{Config, MailConfig, OAuthConfig};
use qrpass::email::{MailDispatcher, MailError, OutgoingMail};
use qrpass::qr::PngQrEncoder;
use qrpass::store::MemorySubmissionStore;

/// Mailer that keeps every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailDispatcher for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

/// Mailer whose relay always refuses.
pub struct FailingMailer;

#[async_trait]
impl MailDispatcher for FailingMailer {
    async fn send(&self, _mail: OutgoingMail) -> Result<(), MailError> {
        Err(MailError::from("relay rejected the message"))
    }
}

/// A running test server backed by an in-memory store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<MemorySubmissionStore>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Report a scan as JSON, return (body, status).
    pub async fn receive_qr(&self, data: &str) -> (Value, StatusCode) {
        self.post_json("/receive-qr", &json!({ "qrCodeData": data })).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn post_form(&self, path: &str, data: &[(&str, &str)]) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .form(data)
            .send()
            .await
            .expect("post form failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn list_qrcodes(&self) -> Vec<Value> {
        let (body, status) = self.get("/get-qrcodes").await;
        assert_eq!(status, StatusCode::OK, "get-qrcodes failed: {body}");
        body.as_array().cloned().expect("get-qrcodes returns an array")
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 1_048_576,
        static_dir: PathBuf::from("static"),
        qr_size: 64,
        log_level: "warn".to_string(),
        oauth: OAuthConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_uri: "http://localhost/callback".to_string(),
            refresh_token: "refresh-token".to_string(),
            token_url: "http://127.0.0.1:9/token".to_string(),
        },
        mail: MailConfig {
            smtp_host: "127.0.0.1".to_string(),
            smtp_port: 2525,
            from: "registration@example.com".to_string(),
            timeout: Duration::from_secs(5),
        },
    }
}

/// Spawn a test app with a recording mailer.
pub async fn spawn_app() -> TestApp {
    let mailer = Arc::new(RecordingMailer::default());
    spawn_app_with(mailer.clone(), mailer).await
}

/// Spawn a test app whose mail relay always fails.
pub async fn spawn_app_failing_mail() -> TestApp {
    spawn_app_with(Arc::new(FailingMailer), Arc::new(RecordingMailer::default())).await
}

async fn spawn_app_with(
    dispatcher: Arc<dyn MailDispatcher>,
    recorder: Arc<RecordingMailer>,
) -> TestApp {
    let store = Arc::new(MemorySubmissionStore::new());

    let app = qrpass::build_app(
        test_config(),
        store.clone(),
        Arc::new(PngQrEncoder::new(64)),
        dispatcher,
    );

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        store,
        mailer: recorder,
    }
}
