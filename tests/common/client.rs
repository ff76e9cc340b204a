//! Test chat client.
//!
//! Provides a WebSocket client for integration testing that can send chat
//! events and assert on received events.

use chatrelay_proto::frame::{decode_server_frame, encode_client_frame};
use chatrelay_proto::{ClientEvent, ServerEvent};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// A test chat client.
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let (ws, _) = connect_async(format!("ws://{address}/")).await?;
        Ok(Self { ws })
    }

    /// Connect with an `Origin` header.
    #[allow(dead_code)]
    pub async fn connect_with_origin(address: &str, origin: &str) -> anyhow::Result<Self> {
        let mut request = format!("ws://{address}/").into_client_request()?;
        request
            .headers_mut()
            .insert("Origin", HeaderValue::from_str(origin)?);
        let (ws, _) = connect_async(request).await?;
        Ok(Self { ws })
    }

    /// Send a raw text frame.
    pub async fn send_raw(&mut self, text: &str) -> anyhow::Result<()> {
        self.ws.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    /// Send a chat event.
    pub async fn send(&mut self, event: ClientEvent) -> anyhow::Result<()> {
        let text = encode_client_frame(&event)?;
        self.send_raw(&text).await
    }

    /// Send a `new-message`.
    #[allow(dead_code)]
    pub async fn say(&mut self, text: &str) -> anyhow::Result<()> {
        self.send(ClientEvent::NewMessage(text.to_string())).await
    }

    /// Receive a single event from the server.
    pub async fn recv(&mut self) -> anyhow::Result<ServerEvent> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive an event with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<ServerEvent> {
        let text = timeout(dur, self.recv_raw()).await??;
        Ok(decode_server_frame(&text)?)
    }

    /// Receive the next text frame without decoding it.
    pub async fn recv_raw(&mut self) -> anyhow::Result<String> {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text),
                Some(Ok(Message::Close(_))) | None => anyhow::bail!("connection closed"),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    /// Receive events until the given predicate returns true.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<ServerEvent>>
    where
        F: FnMut(&ServerEvent) -> bool,
    {
        let mut events = Vec::new();
        loop {
            let event = self.recv().await?;
            let done = predicate(&event);
            events.push(event);
            if done {
                break;
            }
        }
        Ok(events)
    }

    /// Assert that nothing arrives within `dur`.
    #[allow(dead_code)]
    pub async fn expect_silence(&mut self, dur: Duration) -> anyhow::Result<()> {
        match self.recv_timeout(dur).await {
            Ok(event) => anyhow::bail!("unexpected event: {event:?}"),
            Err(_) => Ok(()),
        }
    }

    /// Join as `username`. Returns the user count from the `login` reply.
    pub async fn join(&mut self, username: &str) -> anyhow::Result<usize> {
        self.send(ClientEvent::AddIdentity(username.to_string()))
            .await?;

        let events = self
            .recv_until(|event| matches!(event, ServerEvent::Login(_)))
            .await?;
        match events.last() {
            Some(ServerEvent::Login(login)) => Ok(login.num_users),
            _ => anyhow::bail!("Join failed: no login received"),
        }
    }

    /// Close the connection.
    #[allow(dead_code)]
    pub async fn close(mut self) -> anyhow::Result<()> {
        self.ws.close(None).await?;
        Ok(())
    }
}
