//! HTTP client for the soundctld IPC endpoints.

use std::time::Duration;

use reqwest::{Method, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use soundctl_domain::event::{StateChanged, StateSnapshot};
use soundctl_domain::output::Output;

use crate::sse::Decoder;

/// SSE event name used by the daemon for state changes.
const STATE_CHANGED: &str = "StateChanged";

/// Everything that can go wrong talking to the daemon.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The daemon could not be reached.
    #[error("cannot reach soundctld: {0}")]
    Transport(#[source] reqwest::Error),

    /// The daemon refused or failed the command.
    #[error("{kind}: {message}")]
    Daemon { kind: String, message: String },

    /// The daemon answered with something we could not understand.
    #[error("malformed response from soundctld: {0}")]
    Malformed(String),
}

impl ClientError {
    /// Process exit code for this failure.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Transport(_) => 3,
            Self::Daemon { .. } | Self::Malformed(_) => 1,
        }
    }
}

/// Failure body sent by the daemon.
#[derive(Deserialize)]
struct ErrorBody {
    kind: String,
    error: String,
}

/// Thin wrapper over [`reqwest::Client`] bound to one daemon.
pub struct SoundCtlClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl SoundCtlClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(ClientError::Transport)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub async fn volume_up(&self, amount: Option<u16>) -> Result<StateSnapshot, ClientError> {
        self.call(Method::POST, &with_amount("/api/volume_up", amount))
            .await
    }

    pub async fn volume_down(&self, amount: Option<u16>) -> Result<StateSnapshot, ClientError> {
        self.call(Method::POST, &with_amount("/api/volume_down", amount))
            .await
    }

    pub async fn cycle_outputs(&self) -> Result<StateSnapshot, ClientError> {
        self.call(Method::POST, "/api/cycle_outputs").await
    }

    pub async fn state(&self) -> Result<StateSnapshot, ClientError> {
        self.call(Method::GET, "/api/state").await
    }

    pub async fn outputs(&self) -> Result<Vec<Output>, ClientError> {
        self.call(Method::GET, "/api/outputs").await
    }

    pub async fn notify_volume(&self) -> Result<StateSnapshot, ClientError> {
        self.call(Method::POST, "/api/notify_volume").await
    }

    pub async fn notify_outputs(&self) -> Result<StateSnapshot, ClientError> {
        self.call(Method::POST, "/api/notify_outputs").await
    }

    pub async fn rescan(&self) -> Result<Vec<Output>, ClientError> {
        self.call(Method::POST, "/api/outputs/rescan").await
    }

    /// Follow the daemon's `StateChanged` stream until it ends.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the connection fails, or
    /// [`ClientError::Malformed`] if an event cannot be decoded.
    pub async fn watch(&self, mut on_event: impl FnMut(StateChanged)) -> Result<(), ClientError> {
        let mut response = self
            .http
            .get(format!("{}/api/events/stream", self.base_url))
            .send()
            .await
            .map_err(ClientError::Transport)?;
        response = check(response).await?;

        let mut decoder = Decoder::default();
        while let Some(chunk) = response.chunk().await.map_err(ClientError::Transport)? {
            for frame in decoder.push(&chunk) {
                if frame.event.as_deref() != Some(STATE_CHANGED) {
                    tracing::debug!(event = ?frame.event, "ignoring unknown event");
                    continue;
                }
                let event = serde_json::from_str(&frame.data)
                    .map_err(|err| ClientError::Malformed(err.to_string()))?;
                on_event(event);
            }
        }
        Ok(())
    }

    async fn call<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T, ClientError> {
        tracing::debug!(%method, path, "calling soundctld");
        let response = self
            .http
            .request(method, format!("{}{path}", self.base_url))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        check(response)
            .await?
            .json()
            .await
            .map_err(|err| ClientError::Malformed(err.to_string()))
    }
}

fn with_amount(path: &str, amount: Option<u16>) -> String {
    match amount {
        Some(amount) => format!("{path}?amount={amount}"),
        None => path.to_string(),
    }
}

/// Turn a non-success status into a [`ClientError::Daemon`].
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.map_err(ClientError::Transport)?;
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => Err(ClientError::Daemon {
            kind: body.kind,
            message: body.error,
        }),
        Err(_) => Err(ClientError::Daemon {
            kind: status.to_string(),
            message: text,
        }),
    }
}
