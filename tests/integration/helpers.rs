use chatline::app::{self, App, BubbleId};
use chatline::backend::{BackendError, ChatBackend};
use chatline::config::Config;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub type Reply = Result<Option<String>, BackendError>;

/// Backend that answers from a queue and records every message it was sent.
/// With an empty queue the request never completes.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: RefCell<VecDeque<Reply>>,
    received: RefCell<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Rc<Self> {
        Rc::new(Self { replies: RefCell::new(replies.into_iter().collect()), ..Self::default() })
    }

    pub fn received(&self) -> Vec<String> {
        self.received.borrow().clone()
    }
}

#[async_trait::async_trait(?Send)]
impl ChatBackend for ScriptedBackend {
    async fn ask(&self, message: &str) -> Result<Option<String>, BackendError> {
        self.received.borrow_mut().push(message.to_owned());
        let next = self.replies.borrow_mut().pop_front();
        match next {
            Some(reply) => reply,
            None => futures::future::pending().await,
        }
    }
}

/// Build an `App` without a terminal and without the greeting.
pub fn test_app(backend: Rc<ScriptedBackend>) -> App {
    let config = Config { greeting: false, ..Config::default() };
    App::new(config, backend)
}

pub fn status_error(status: u16, status_text: &str, body: &str) -> BackendError {
    BackendError::Status { status, status_text: status_text.to_owned(), body: body.to_owned() }
}

/// Type `text` into the composer and submit it.
pub fn submit(app: &mut App, text: &str, now: Instant) -> bool {
    app.composer.clear();
    app.composer.insert_str(text);
    app::submit_input(app, now)
}

/// Wait for the backend task to post its reply and feed it to the app.
pub async fn deliver_reply(app: &mut App, now: Instant) {
    let event = tokio::time::timeout(Duration::from_secs(5), app.event_rx.recv())
        .await
        .expect("reply in time")
        .expect("event channel open");
    app::handle_app_event(app, event, now);
}

/// Poll timers on a simulated clock until the active reveal finishes.
/// Returns the clock after the last tick.
pub fn finish_reveal(app: &mut App, mut now: Instant) -> Instant {
    let tick = app.config.tick_interval;
    for _ in 0..10_000 {
        if app.typewriter.active().is_none() {
            break;
        }
        app::poll_timers(app, now);
        now += tick;
    }
    assert!(app.typewriter.active().is_none(), "reveal did not finish");
    now
}

pub fn bubble_text(app: &App, id: BubbleId) -> String {
    app.log.get(id).map(|b| b.content.plain_text()).expect("bubble exists")
}

pub fn last_bubble_text(app: &App) -> String {
    app.log.bubbles().last().map(|b| b.content.plain_text()).expect("log is not empty")
}

pub fn terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(width, height)).expect("test terminal")
}

/// Draw one frame of the full UI.
pub fn draw(terminal: &mut Terminal<TestBackend>, app: &mut App) {
    terminal.draw(|f| chatline::ui::render(f, app)).expect("draw");
}

/// Draw enough frames for a smooth scroll to settle.
pub fn settle(terminal: &mut Terminal<TestBackend>, app: &mut App) {
    for _ in 0..32 {
        draw(terminal, app);
    }
}

/// Rendered screen rows, trailing spaces trimmed.
pub fn screen_rows(terminal: &Terminal<TestBackend>) -> Vec<String> {
    let buffer = terminal.backend().buffer();
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            let mut row = String::new();
            for x in area.left()..area.right() {
                row.push_str(buffer[(x, y)].symbol());
            }
            row.trim_end().to_owned()
        })
        .collect()
}

pub fn screen_contains(terminal: &Terminal<TestBackend>, needle: &str) -> bool {
    screen_rows(terminal).iter().any(|row| row.contains(needle))
}

/// Fill the log with `count` short bot bubbles.
pub fn fill_log(app: &mut App, count: usize) {
    for i in 0..count {
        app.append_bubble(app::Role::Bot, chatline::markup::paragraph(&format!("dòng {i}")));
    }
}
