#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub const ADMIN_TOKEN: &str = "test-admin-token";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Each test binary gets its own scratch data file so runs are hermetic
        let data_file = std::env::temp_dir().join(format!("tekoa-it-{}.json", port));
        let _ = std::fs::remove_file(&data_file);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/tekoa-api");
        cmd.env("TEKOA_PORT", port.to_string())
            .env("TEKOA_DATA_FILE", &data_file)
            .env("ADMIN_TOKEN", ADMIN_TOKEN)
            // Force file-backed mode regardless of the ambient environment
            .env_remove("DATABASE_URL")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/api/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Client with a cookie jar, the way a browser would hold the session.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("client builds")
}

pub fn unique_email(prefix: &str) -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static SEQ: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{nanos}-{seq}@example.com")
}

/// Register a fresh user on `client` and return (user_id, email).
pub async fn register_user(
    server: &TestServer,
    client: &reqwest::Client,
    prefix: &str,
) -> Result<(String, String)> {
    let email = unique_email(prefix);
    let res = client
        .post(format!("{}/api/register", server.base_url))
        .json(&serde_json::json!({
            "name": "Test User",
            "email": email,
            "password": "hunter22",
        }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "register failed: {}", res.status());
    let body: serde_json::Value = res.json().await?;
    let id = body["userId"]
        .as_str()
        .context("register response missing userId")?
        .to_string();
    Ok((id, email))
}
