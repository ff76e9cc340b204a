//! Test server management.
//!
//! Spawns and manages chatrelayd instances for integration testing.

use std::path::PathBuf;
use std::process::{Child, Command};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

const DEFAULT_LIMITS: &str = "sendq = 64\nmax_message_bytes = 1024";

/// A test server instance.
pub struct TestServer {
    child: Child,
    port: u16,
    _data_dir: TempDir,
}

impl TestServer {
    /// Spawn a new test server listening on `port`.
    #[allow(dead_code)]
    pub async fn spawn(port: u16) -> anyhow::Result<Self> {
        Self::spawn_with(port, "").await
    }

    /// Spawn a test server with extra TOML appended to the base config.
    ///
    /// `extra` may add keys to the `[listen]` table since it comes last in
    /// the base config.
    #[allow(dead_code)]
    pub async fn spawn_with(port: u16, extra: &str) -> anyhow::Result<Self> {
        Self::spawn_config(port, DEFAULT_LIMITS, extra).await
    }

    /// Spawn a test server whose `[limits]` table is `limits`.
    #[allow(dead_code)]
    pub async fn spawn_with_limits(port: u16, limits: &str) -> anyhow::Result<Self> {
        Self::spawn_config(port, limits, "").await
    }

    async fn spawn_config(port: u16, limits: &str, listen_extra: &str) -> anyhow::Result<Self> {
        let data_dir = tempfile::tempdir()?;
        let config_path = data_dir.path().join("config.toml");
        let config_content = format!(
            r#"
[server]
name = "test.relay"
metrics_port = 0

[limits]
{limits}

[listen]
address = "127.0.0.1:{port}"
{listen_extra}
"#
        );
        std::fs::write(&config_path, config_content)?;

        let child = Command::new(binary_path())
            .arg(&config_path)
            .env_remove("PORT")
            .spawn()?;

        Self::ready(child, port, data_dir).await
    }

    /// Spawn a test server with no config file, choosing the port via the
    /// `PORT` environment variable.
    #[allow(dead_code)]
    pub async fn spawn_with_port_env(port: u16) -> anyhow::Result<Self> {
        let data_dir = tempfile::tempdir()?;
        let child = Command::new(binary_path())
            .env("PORT", port.to_string())
            .spawn()?;

        Self::ready(child, port, data_dir).await
    }

    async fn ready(child: Child, port: u16, data_dir: TempDir) -> anyhow::Result<Self> {
        let server = Self {
            child,
            port,
            _data_dir: data_dir,
        };

        // Wait for server to start listening
        server.wait_until_ready().await?;

        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 5 seconds")
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Connect a client and join as `username`.
    #[allow(dead_code)]
    pub async fn join(&self, username: &str) -> anyhow::Result<super::client::TestClient> {
        let mut client = super::client::TestClient::connect(&self.address()).await?;
        client.join(username).await?;
        Ok(client)
    }

    /// Connect a client without joining.
    #[allow(dead_code)]
    pub async fn connect(&self) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address()).await
    }
}

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_chatrelayd"))
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Kill the server process
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
