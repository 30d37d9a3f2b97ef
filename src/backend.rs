// chatline — A terminal chat client with scroll-aware typewriter replies
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Client for the schedule bot's `POST /api/chat` endpoint.

use crate::config::Config;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    answer: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("HTTP {status} {status_text}{}", body_suffix(.body))]
    Status { status: u16, status_text: String, body: String },
    #[error("{0}")]
    Transport(#[source] reqwest::Error),
    #[error("invalid response: {0}")]
    Decode(#[source] reqwest::Error),
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() { String::new() } else { format!(" - {body}") }
}

/// Request/response conversation backend. `None` means the backend answered
/// without text.
#[async_trait(?Send)]
pub trait ChatBackend {
    async fn ask(&self, message: &str) -> Result<Option<String>, BackendError>;
}

pub struct HttpBackend {
    client: reqwest::Client,
    chat_url: Url,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                tracing::error!("failed to build HTTP client: {e}");
                AppError::HttpClient
            })?;
        Ok(Self { client, chat_url: config.chat_url()? })
    }

    #[must_use]
    pub fn chat_url(&self) -> &Url {
        &self.chat_url
    }
}

#[async_trait(?Send)]
impl ChatBackend for HttpBackend {
    async fn ask(&self, message: &str) -> Result<Option<String>, BackendError> {
        tracing::debug!(url = %self.chat_url, chars = message.chars().count(), "POST chat");
        let response = self
            .client
            .post(self.chat_url.clone())
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(BackendError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_owned(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(BackendError::Decode)?;
        Ok(parsed.answer)
    }
}
