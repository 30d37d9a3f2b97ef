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

use crate::Cli;
use crate::error::AppError;
use reqwest::Url;
use std::time::Duration;

pub const SERVER_ENV: &str = "CHATLINE_SERVER";
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_TICK_MS: u64 = 12;
pub const DEFAULT_DEBOUNCE_MS: u64 = 120;
pub const DEFAULT_NEAR_BOTTOM_ROWS: usize = 4;

const CHAT_PATH: &str = "api/chat";

/// Runtime settings resolved from the command line and environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: Url,
    pub request_timeout: Duration,
    pub tick_interval: Duration,
    pub debounce: Duration,
    pub near_bottom_rows: usize,
    pub greeting: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self, AppError> {
        let raw = cli
            .server
            .clone()
            .or_else(|| std::env::var(SERVER_ENV).ok().filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_SERVER.to_owned());
        let server = parse_server_url(&raw)?;

        Ok(Self {
            server,
            request_timeout: Duration::from_secs(cli.timeout_secs.max(1)),
            tick_interval: Duration::from_millis(cli.tick_ms.max(1)),
            debounce: Duration::from_millis(cli.debounce_ms),
            near_bottom_rows: cli.near_bottom,
            greeting: !cli.no_greeting,
        })
    }

    /// Absolute URL of the chat endpoint.
    pub fn chat_url(&self) -> Result<Url, AppError> {
        self.server.join(CHAT_PATH).map_err(|_| AppError::InvalidServerUrl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: Url::parse(DEFAULT_SERVER).unwrap_or_else(|_| unreachable!()),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            near_bottom_rows: DEFAULT_NEAR_BOTTOM_ROWS,
            greeting: true,
        }
    }
}

fn parse_server_url(raw: &str) -> Result<Url, AppError> {
    let trimmed = raw.trim();
    let mut url = Url::parse(trimmed).map_err(|e| {
        tracing::debug!("rejecting server url `{trimmed}`: {e}");
        AppError::InvalidServerUrl
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(AppError::InvalidServerUrl);
    }
    // Treat the last path segment as a directory so `api/chat` nests under it.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
