//! The request wrapper around `POST /api/chat`.
//!
//! Wraps one logical gateway call with a client-imposed timeout, cooperative
//! cancellation and a small retry budget. Whatever happens on the wire, the
//! caller always gets back a well-formed [`ChatResponse`] envelope.

use crate::cancel::CancelToken;
use hlrgw_types::{ChatPayload, ChatResponse, Reason, UsageSnapshot};
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

/// Per-call knobs. `retries` is the number of extra attempts after the
/// first, not the total.
#[derive(Debug, Clone, Copy)]
pub struct SendOptions {
    pub timeout_ms: u64,
    pub retries: u32,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 25_000,
            retries: 1,
        }
    }
}

enum Attempt {
    Response(reqwest::Response),
    Transport(reqwest::Error),
    Cancelled(&'static str),
}

/// Client for the gateway's chat endpoint
pub struct AssistantClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AssistantClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Send a conversation and resolve to an envelope. Never errors.
    ///
    /// Cancellation (external or timeout) is terminal: no retry, and the
    /// envelope carries zero usage because no round trip completed. Each
    /// attempt owns its timer and cancellation listener; both are torn down
    /// when the attempt's race resolves.
    pub async fn send_chat(
        &self,
        payload: &ChatPayload,
        cancel: Option<CancelToken>,
        options: SendOptions,
    ) -> ChatResponse {
        let url = format!("{}/api/chat", self.base_url);
        let mut cancel = cancel;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let request = self.http_client.post(&url).json(payload).send();
            let outcome = tokio::select! {
                res = request => match res {
                    Ok(response) => Attempt::Response(response),
                    Err(err) => Attempt::Transport(err),
                },
                _ = sleep(Duration::from_millis(options.timeout_ms)) => {
                    Attempt::Cancelled("Request timed out.")
                }
                _ = external_cancelled(&mut cancel) => {
                    Attempt::Cancelled("Request was cancelled.")
                }
            };

            match outcome {
                Attempt::Cancelled(message) => {
                    tracing::debug!(attempt, message, "chat request cancelled");
                    return ChatResponse::error_with_message(
                        Reason::InternalError,
                        UsageSnapshot::zero(),
                        message,
                    );
                }
                Attempt::Response(response) => {
                    let status = response.status();
                    match response.json::<ChatResponse>().await {
                        Ok(envelope) => {
                            if !status.is_success()
                                && attempt <= options.retries
                                && should_retry(status, &envelope)
                            {
                                backoff(500, 200, attempt).await;
                                continue;
                            }
                            return envelope;
                        }
                        // The server contract is JSON in every state; a body
                        // we cannot decode is treated like a transport fault.
                        Err(err) => {
                            tracing::warn!(attempt, %err, "undecodable chat response");
                            if attempt <= options.retries {
                                backoff(600, 250, attempt).await;
                                continue;
                            }
                            return network_error();
                        }
                    }
                }
                Attempt::Transport(err) => {
                    tracing::warn!(attempt, %err, "chat transport fault");
                    if attempt <= options.retries {
                        backoff(600, 250, attempt).await;
                        continue;
                    }
                    return network_error();
                }
            }
        }
    }
}

async fn external_cancelled(cancel: &mut Option<CancelToken>) {
    match cancel {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

/// Retry 5xx, and generic internal errors the server admitted to
fn should_retry(status: reqwest::StatusCode, envelope: &ChatResponse) -> bool {
    status.is_server_error() || envelope.is_internal_error()
}

async fn backoff(base_ms: u64, jitter_ms: u64, attempt: u32) {
    let jitter = rand::thread_rng().gen_range(0..jitter_ms);
    sleep(Duration::from_millis(base_ms * u64::from(attempt) + jitter)).await;
}

fn network_error() -> ChatResponse {
    ChatResponse::error_with_message(
        Reason::InternalError,
        UsageSnapshot::zero(),
        "Network error.",
    )
}
