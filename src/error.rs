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

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error("Invalid server URL")]
    InvalidServerUrl,
    #[error("HTTP client initialization failed")]
    HttpClient,
    #[error("Terminal setup failed")]
    Terminal,
}

impl AppError {
    pub const INVALID_SERVER_URL_EXIT_CODE: i32 = 20;
    pub const HTTP_CLIENT_EXIT_CODE: i32 = 21;
    pub const TERMINAL_EXIT_CODE: i32 = 22;

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidServerUrl => Self::INVALID_SERVER_URL_EXIT_CODE,
            Self::HttpClient => Self::HTTP_CLIENT_EXIT_CODE,
            Self::Terminal => Self::TERMINAL_EXIT_CODE,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidServerUrl => {
                "Invalid server URL. Pass an http(s) base URL via --server or $CHATLINE_SERVER."
            }
            Self::HttpClient => "Failed to initialize the HTTP client.",
            Self::Terminal => "Failed to set up or draw to the terminal.",
        }
    }
}
