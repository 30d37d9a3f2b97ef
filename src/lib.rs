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

pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod markup;
pub mod ui;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "chatline", about = "Terminal chat client for the weekly schedule bot")]
pub struct Cli {
    /// Backend base URL (falls back to $CHATLINE_SERVER, then http://127.0.0.1:8000)
    #[arg(long, short)]
    pub server: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Typewriter tick interval in milliseconds
    #[arg(long, default_value_t = config::DEFAULT_TICK_MS)]
    pub tick_ms: u64,

    /// Delay before auto-follow is re-enabled after scrolling back to the bottom
    #[arg(long, default_value_t = config::DEFAULT_DEBOUNCE_MS)]
    pub debounce_ms: u64,

    /// Rows from the bottom that still count as "at the bottom"
    #[arg(long, default_value_t = config::DEFAULT_NEAR_BOTTOM_ROWS)]
    pub near_bottom: usize,

    /// Skip the welcome message
    #[arg(long)]
    pub no_greeting: bool,

    /// Write tracing diagnostics to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Tracing filter directives (overrides RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Append to the log file instead of truncating it
    #[arg(long)]
    pub log_append: bool,
}
