//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers, making HTTP requests,
//! and driving subscribe connections.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use ama_api::{create_app_state, serve, AppState};
use ama_common::{AppConfig, AppError};
use ama_core::events::EventScope;
use anyhow::Result;
use futures_util::StreamExt;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

/// Client side of a subscribe connection
pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a test waits for something to arrive before failing
pub const WAIT: Duration = Duration::from_secs(5);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    state: AppState,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), AppError>>,
}

impl TestServer {
    /// Start a new test server backed by in-memory storage
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let state = create_app_state(config).await?;
        let (shutdown, signal) = oneshot::channel::<()>();

        let handle = tokio::spawn(serve(listener, state.clone(), async move {
            signal.await.ok();
        }));

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            state,
            shutdown: Some(shutdown),
            handle,
        })
    }

    /// Shared application state of the running server
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Issue an access token for a fresh user
    pub fn token(&self, name: &str) -> Result<(Uuid, String)> {
        let user_id = Uuid::new_v4();
        let token = self.state.jwt_service().issue_token(user_id, name)?;
        Ok((user_id, token))
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the WebSocket URL for a path
    pub fn ws_url(&self, path: &str) -> String {
        format!("ws://{}{}", self.addr, path)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).bearer_auth(token).send().await?)
    }

    /// Make a POST request with JSON body and no token
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a PATCH request with auth token and JSON body
    pub async fn patch_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .patch(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a PATCH request with auth token and no body
    pub async fn patch_empty(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.patch(&url).bearer_auth(token).send().await?)
    }

    /// Make a DELETE request with auth token
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.delete(&url).bearer_auth(token).send().await?)
    }

    /// Open a subscribe connection
    pub async fn connect(&self, path: &str) -> Result<WsClient> {
        let (stream, _) = connect_async(self.ws_url(path)).await?;
        Ok(stream)
    }

    /// Wait until `count` connections are registered under `scope`
    pub async fn wait_for_subscribers(&self, scope: EventScope, count: usize) -> Result<()> {
        let registry = self.state.hub().registry();
        wait_until(|| registry.subscriber_count(scope) == count).await
    }

    /// Wait until no connection is registered anywhere
    pub async fn wait_for_no_connections(&self) -> Result<()> {
        let registry = self.state.hub().registry();
        wait_until(|| registry.connection_count() == 0 && registry.room_count() == 0).await
    }

    /// Trigger graceful shutdown and wait for the server task to finish
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(shutdown) = self.shutdown.take() {
            shutdown.send(()).ok();
        }
        tokio::time::timeout(WAIT * 2, &mut self.handle).await???;
        Ok(())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if self.shutdown.is_some() {
            self.handle.abort();
        }
    }
}

/// Create a test configuration with in-memory storage
pub fn test_config() -> Result<AppConfig> {
    let config = AppConfig::from_toml_str(
        r#"
        [app]
        env = "development"

        [server]
        host = "127.0.0.1"
        port = 0

        [storage]
        backend = "memory"

        [jwt]
        secret = "integration-test-secret"

        [hub]
        shutdown_timeout_secs = 2
        "#,
    )
    .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    Ok(config)
}

/// Poll a condition until it holds or [`WAIT`] elapses
pub async fn wait_until<F: Fn() -> bool>(condition: F) -> Result<()> {
    poll_until(WAIT, || {
        let ready = condition();
        async move { ready }
    })
    .await
}

async fn poll_until<F, Fut>(timeout: Duration, mut check: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check().await {
            return Ok(());
        }
        if tokio::time::Instant::now() >= deadline {
            anyhow::bail!("condition not met within {:?}", timeout);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Read the next event frame, skipping control frames
pub async fn next_event(ws: &mut WsClient) -> Result<Value> {
    loop {
        let frame = tokio::time::timeout(WAIT, ws.next())
            .await
            .map_err(|_| anyhow::anyhow!("no frame within {:?}", WAIT))?
            .ok_or_else(|| anyhow::anyhow!("connection ended"))??;

        match frame {
            WsMessage::Text(text) => return Ok(serde_json::from_str(&text)?),
            WsMessage::Close(frame) => anyhow::bail!("connection closed: {:?}", frame),
            _ => continue,
        }
    }
}

/// Assert that no event frame arrives within `window`
pub async fn assert_silent(ws: &mut WsClient, window: Duration) -> Result<()> {
    match tokio::time::timeout(window, ws.next()).await {
        Err(_) => Ok(()),
        Ok(Some(Ok(WsMessage::Text(text)))) => anyhow::bail!("unexpected event: {}", text),
        Ok(other) => anyhow::bail!("unexpected frame: {:?}", other),
    }
}

/// Wait for the close frame sent by the server
pub async fn expect_close(ws: &mut WsClient) -> Result<Option<CloseFrame<'static>>> {
    loop {
        let frame = tokio::time::timeout(WAIT, ws.next())
            .await
            .map_err(|_| anyhow::anyhow!("no close within {:?}", WAIT))?;

        match frame {
            Some(Ok(WsMessage::Close(frame))) => return Ok(frame),
            Some(Ok(WsMessage::Text(text))) => anyhow::bail!("unexpected event: {}", text),
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(e.into()),
            None => return Ok(None),
        }
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
