// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! HTTPS connector for the Slack Web API.
//!
//! Service structures in this module provide a low-level way to interact
//! with the Slack Web API over HTTPS. Every call is a single GET request
//! whose JSON body is checked for Slack's `ok` flag and otherwise handed
//! back untouched; making sense of the payload is up to the caller.

use crate::auth::Token;
use reqwest::{Client, ClientBuilder, header};
use serde_json::Value;
use thiserror::Error;

/// Base URL of every Slack Web API method.
pub const API_BASE: &str = "https://slack.com/api/";

/// The result of a Slack API call.
pub type ApiResult<T> = Result<T, ApiError>;

/// Indicates an error has occurred when calling the Slack API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP request itself failed.
    #[error("Error while making HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body is not JSON.
    #[error("Invalid response body: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// Slack answered with `"ok": false`; carries Slack's `error` field.
    #[error("Slack replied {0:?}")]
    Rejected(String),

    /// The response lacks a field we need, e.g. `message.reactions`.
    #[error("Unexpected response: missing or invalid {0}")]
    UnexpectedShape(String),
}

/// A service for calling Slack API methods.
///
/// Using this trait, clients can implement different ways of connecting
/// to the Slack API, such as an actual connector for production code,
/// and a mocked connector for testing purposes.
pub trait Service {
    /// Calls the API method at `path` (e.g. `"reactions.get"`) with the
    /// given query `params`, authenticated by `token`.
    ///
    /// Returns the decoded response body if Slack reports success.
    fn call(
        &self,
        path: &str,
        token: &Token,
        params: &[(&str, &str)],
    ) -> impl Future<Output = ApiResult<Value>> + Send;
}

/// A service that contacts the Slack API directly.
#[derive(Debug)]
pub struct SlackService {
    client: Client,
}

impl Default for SlackService {
    /// Creates a new Slack service.
    fn default() -> Self {
        let client = ClientBuilder::new()
            .user_agent(user_agent())
            .build()
            // build() only fails if a TLS backend or the DNS resolver
            // cannot be initialized, and we cannot do anything without
            // either of them.
            .expect("could not create a new HTTP client");
        Self { client }
    }
}

impl SlackService {
    fn uri(&self, path: &str) -> String {
        format!("{API_BASE}{path}")
    }
}

impl Service for SlackService {
    async fn call(&self, path: &str, token: &Token, params: &[(&str, &str)]) -> ApiResult<Value> {
        let uri = self.uri(path);
        log::debug!("GET {uri} {params:?}");

        let auth_header = format!("Bearer {}", token.secret());
        let body = self
            .client
            .get(&uri)
            .header(header::AUTHORIZATION, auth_header)
            .query(params)
            .send()
            .await?
            .text()
            .await?;
        decode_envelope(&body)
    }
}

/// User agent sent with every request.
pub fn user_agent() -> String {
    format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Decodes a Slack response body and checks its `ok` flag.
///
/// A missing or `false` `ok` flag is an [`ApiError::Rejected`] carrying
/// the body's `error` field (or an empty string). Nothing else in the body
/// is looked at.
///
/// # Examples
///
/// ```
/// use slak::slack::service::{ApiError, decode_envelope};
///
/// let envelope = decode_envelope(r#"{"ok": true, "warning": "superfluous_charset"}"#).unwrap();
/// assert_eq!(envelope["warning"], "superfluous_charset");
///
/// let err = decode_envelope(r#"{"ok": false, "error": "invalid_auth"}"#).unwrap_err();
/// assert!(matches!(err, ApiError::Rejected(msg) if msg == "invalid_auth"));
/// ```
pub fn decode_envelope(body: &str) -> ApiResult<Value> {
    let envelope: Value = serde_json::from_str(body)?;
    match envelope.get("ok").and_then(Value::as_bool) {
        Some(true) => Ok(envelope),
        _ => {
            let error = envelope
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or_default();
            Err(ApiError::Rejected(error.to_string()))
        }
    }
}

/// Looks up a nested field of a response, e.g. `["message", "reactions"]`.
///
/// A missing field is an [`ApiError::UnexpectedShape`] naming the dotted
/// path that could not be followed.
pub fn get_in<'a>(envelope: &'a Value, path: &[&str]) -> ApiResult<&'a Value> {
    path.iter()
        .try_fold(envelope, |value, key| value.get(key))
        .ok_or_else(|| ApiError::UnexpectedShape(path.join(".")))
}
