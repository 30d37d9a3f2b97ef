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

use chatline::Cli;
use chatline::app::{self, App};
use chatline::backend::HttpBackend;
use chatline::config::Config;
use chatline::error::AppError;
use clap::Parser;
use std::rc::Rc;
use std::time::Instant;

#[allow(clippy::exit)]
fn main() {
    if let Err(err) = run() {
        if let Some(app_error) = extract_app_error(&err) {
            eprintln!("{}", app_error.user_message());
            std::process::exit(app_error.exit_code());
        }
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    chatline::logging::init_tracing(
        cli.log_file.as_deref(),
        cli.log_filter.as_deref(),
        cli.log_append,
    )?;

    let config = Config::from_cli(&cli).map_err(anyhow::Error::new)?;
    let backend = HttpBackend::new(&config).map_err(anyhow::Error::new)?;
    tracing::info!(
        server = %config.server,
        chat_url = %backend.chat_url(),
        timeout = ?config.request_timeout,
        "starting chat client"
    );

    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let local_set = tokio::task::LocalSet::new();

    rt.block_on(local_set.run_until(async move {
        let mut app = App::new(config, Rc::new(backend));
        if app.config.greeting {
            app::greet(&mut app, Instant::now());
        }
        app::run_tui(&mut app).await
    }))
}

fn extract_app_error(err: &anyhow::Error) -> Option<AppError> {
    err.chain().find_map(|cause| cause.downcast_ref::<AppError>().cloned())
}
