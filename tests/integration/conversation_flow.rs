// Submission lifecycle end to end: composer, backend task, reply handling,
// composing indicator and typewriter reveal.

use chatline::app::{self, COMPOSING_INTERVAL, FALLBACK_ANSWER, Focus, GREETING, Phase};
use chatline::markup;
use pretty_assertions::assert_eq;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tokio::task::LocalSet;

use crate::helpers::{
    ScriptedBackend, bubble_text, deliver_reply, finish_reveal, last_bubble_text, status_error,
    submit, test_app,
};

// --- Submit ---

#[tokio::test]
async fn submit_appends_user_bubble_and_placeholder() {
    LocalSet::new()
        .run_until(async {
            let backend = ScriptedBackend::new([Ok(Some("Có họp khoa.".to_owned()))]);
            let mut app = test_app(Rc::clone(&backend));
            let now = Instant::now();

            assert!(submit(&mut app, "  Thứ 5 có gì?  ", now));

            assert_eq!(app.log.len(), 2);
            assert_eq!(app.log.bubbles()[0].role, app::Role::User);
            assert_eq!(app.log.bubbles()[0].content.plain_text(), "Thứ 5 có gì?");
            assert_eq!(last_bubble_text(&app), "Đang soạn trả lời...");
            assert!(app.composer.is_empty());
            assert!(matches!(app.conversation, Phase::Sent { .. }));
            assert!(app.composing.is_running());

            deliver_reply(&mut app, now).await;
            assert_eq!(backend.received(), vec!["Thứ 5 có gì?".to_owned()]);
        })
        .await;
}

#[tokio::test]
async fn blank_input_is_ignored() {
    LocalSet::new()
        .run_until(async {
            let backend = ScriptedBackend::new([]);
            let mut app = test_app(Rc::clone(&backend));

            assert!(!submit(&mut app, "   \t ", Instant::now()));
            assert!(app.log.is_empty());
            assert!(app.conversation.is_idle());
            assert!(!app.composing.is_running());
            tokio::task::yield_now().await;
            assert!(backend.received().is_empty());
        })
        .await;
}

#[tokio::test]
async fn submit_while_waiting_is_ignored() {
    LocalSet::new()
        .run_until(async {
            let backend = ScriptedBackend::new([]);
            let mut app = test_app(Rc::clone(&backend));
            let now = Instant::now();

            assert!(submit(&mut app, "câu 1", now));
            tokio::task::yield_now().await;
            assert!(!submit(&mut app, "câu 2", now));

            assert_eq!(app.log.len(), 2);
            // The second message stays in the composer.
            assert_eq!(app.composer.text(), "câu 2");
            tokio::task::yield_now().await;
            assert_eq!(backend.received(), vec!["câu 1".to_owned()]);
        })
        .await;
}

#[tokio::test]
async fn user_text_is_shown_literally() {
    LocalSet::new()
        .run_until(async {
            let backend = ScriptedBackend::new([]);
            let mut app = test_app(backend);

            submit(&mut app, "**đậm** <b>x</b>\u{7}", Instant::now());
            assert_eq!(app.log.bubbles()[0].content.plain_text(), "**đậm** <b>x</b>\u{2407}");
        })
        .await;
}

// --- Success ---

#[tokio::test]
async fn answer_is_revealed_then_phase_returns_to_idle() {
    LocalSet::new()
        .run_until(async {
            let answer = "Thứ 5: **họp khoa** lúc 9h30";
            let backend = ScriptedBackend::new([Ok(Some(answer.to_owned()))]);
            let mut app = test_app(backend);
            let t0 = Instant::now();

            submit(&mut app, "Thứ 5 có gì?", t0);
            let Phase::Sent { placeholder, .. } = app.conversation else {
                panic!("submission should be in flight");
            };
            deliver_reply(&mut app, t0).await;

            assert!(matches!(app.conversation, Phase::Answered { .. }));
            assert!(!app.composing.is_running());

            // First tick reveals one char.
            app::poll_timers(&mut app, t0);
            assert_eq!(bubble_text(&app, placeholder), markup::render("T").plain_text());
            assert!(matches!(app.conversation, Phase::Answered { .. }));

            let t1 = t0 + app.config.tick_interval;
            finish_reveal(&mut app, t1);
            assert!(app.conversation.is_idle());
            assert_eq!(app.focus, Focus::Input);
            assert_eq!(bubble_text(&app, placeholder), markup::render(answer).plain_text());
        })
        .await;
}

#[tokio::test]
async fn reveal_takes_one_tick_per_char_for_short_answers() {
    LocalSet::new()
        .run_until(async {
            let answer = "Họp lúc 9h";
            let backend = ScriptedBackend::new([Ok(Some(answer.to_owned()))]);
            let mut app = test_app(backend);
            let t0 = Instant::now();
            let tick = app.config.tick_interval;

            submit(&mut app, "hỏi", t0);
            deliver_reply(&mut app, t0).await;

            let mut ticks = 0;
            let mut now = t0;
            while app.typewriter.active().is_some() {
                app::poll_timers(&mut app, now);
                ticks += 1;
                now += tick;
            }
            assert_eq!(ticks, answer.chars().count());
        })
        .await;
}

#[tokio::test]
async fn polling_early_does_not_advance_the_reveal() {
    LocalSet::new()
        .run_until(async {
            let backend = ScriptedBackend::new([Ok(Some("abc".to_owned()))]);
            let mut app = test_app(backend);
            let t0 = Instant::now();

            submit(&mut app, "hỏi", t0);
            deliver_reply(&mut app, t0).await;
            app::poll_timers(&mut app, t0);
            let revealed = app.typewriter.active().map(|s| s.revealed());
            app::poll_timers(&mut app, t0 + Duration::from_millis(5));
            assert_eq!(app.typewriter.active().map(|s| s.revealed()), revealed);
        })
        .await;
}

#[tokio::test]
async fn missing_or_empty_answer_uses_fallback() {
    for reply in [None, Some(String::new()), Some("   ".to_owned())] {
        LocalSet::new()
            .run_until(async move {
                let backend = ScriptedBackend::new([Ok(reply)]);
                let mut app = test_app(backend);
                let t0 = Instant::now();

                submit(&mut app, "hỏi", t0);
                deliver_reply(&mut app, t0).await;
                finish_reveal(&mut app, t0);

                assert_eq!(last_bubble_text(&app), markup::render(FALLBACK_ANSWER).plain_text());
                assert!(app.conversation.is_idle());
            })
            .await;
    }
}

#[tokio::test]
async fn second_question_after_first_answer() {
    LocalSet::new()
        .run_until(async {
            let backend =
                ScriptedBackend::new([Ok(Some("một".to_owned())), Ok(Some("hai".to_owned()))]);
            let mut app = test_app(Rc::clone(&backend));
            let t0 = Instant::now();

            submit(&mut app, "câu 1", t0);
            deliver_reply(&mut app, t0).await;
            // Still revealing: a new submission is ignored.
            assert!(!submit(&mut app, "quá sớm", t0));
            let t1 = finish_reveal(&mut app, t0);

            assert!(submit(&mut app, "câu 2", t1));
            deliver_reply(&mut app, t1).await;
            finish_reveal(&mut app, t1);

            assert_eq!(app.log.len(), 4);
            assert_eq!(last_bubble_text(&app), markup::render("hai").plain_text());
            assert_eq!(backend.received(), vec!["câu 1".to_owned(), "câu 2".to_owned()]);
        })
        .await;
}

// --- Failure ---

#[tokio::test]
async fn failure_replaces_placeholder_with_error_notice() {
    LocalSet::new()
        .run_until(async {
            let backend =
                ScriptedBackend::new([Err(status_error(500, "Internal Server Error", "oops"))]);
            let mut app = test_app(backend);
            let t0 = Instant::now();

            submit(&mut app, "hỏi", t0);
            app.focus = Focus::Transcript;
            deliver_reply(&mut app, t0).await;

            assert_eq!(last_bubble_text(&app), "⚠️ Lỗi: HTTP 500 Internal Server Error - oops");
            assert!(app.conversation.is_idle());
            assert!(!app.composing.is_running());
            assert!(app.typewriter.active().is_none());
            assert_eq!(app.focus, Focus::Input);
        })
        .await;
}

#[tokio::test]
async fn error_text_is_not_interpreted_as_markup() {
    LocalSet::new()
        .run_until(async {
            let backend = ScriptedBackend::new([Err(status_error(400, "Bad Request", "<b>*x*</b>"))]);
            let mut app = test_app(backend);
            let t0 = Instant::now();

            submit(&mut app, "hỏi", t0);
            deliver_reply(&mut app, t0).await;
            assert!(last_bubble_text(&app).ends_with("<b>*x*</b>"));
        })
        .await;
}

// --- Composing indicator ---

#[tokio::test]
async fn composing_indicator_alternates_until_reply() {
    LocalSet::new()
        .run_until(async {
            let backend = ScriptedBackend::new([]);
            let mut app = test_app(backend);
            let t0 = Instant::now();

            submit(&mut app, "hỏi", t0);
            app::poll_timers(&mut app, t0 + Duration::from_millis(100));
            assert_eq!(last_bubble_text(&app), "Đang soạn trả lời...");

            app::poll_timers(&mut app, t0 + COMPOSING_INTERVAL);
            assert_eq!(last_bubble_text(&app), "Đang soạn trả lời…");
            app::poll_timers(&mut app, t0 + COMPOSING_INTERVAL * 2);
            assert_eq!(last_bubble_text(&app), "Đang soạn trả lời....");
            app::poll_timers(&mut app, t0 + COMPOSING_INTERVAL * 3);
            assert_eq!(last_bubble_text(&app), "Đang soạn trả lời…");
        })
        .await;
}

// --- Greeting ---

#[test]
fn greeting_is_revealed_without_leaving_idle() {
    let backend = ScriptedBackend::new([]);
    let mut app = test_app(backend);
    let t0 = Instant::now();

    app::greet(&mut app, t0);
    assert_eq!(app.log.len(), 1);
    assert!(app.conversation.is_idle());

    finish_reveal(&mut app, t0);
    assert_eq!(last_bubble_text(&app), markup::render(GREETING).plain_text());
    assert!(last_bubble_text(&app).contains("Chat Bot lịch tuần Đại học Thương Mại"));
    assert!(app.conversation.is_idle());
}

#[tokio::test]
async fn submitting_during_greeting_completes_greeting_at_once() {
    LocalSet::new()
        .run_until(async {
            let backend = ScriptedBackend::new([Ok(Some("ok".to_owned()))]);
            let mut app = test_app(backend);
            let t0 = Instant::now();

            let greeting = app::greet(&mut app, t0);
            app::poll_timers(&mut app, t0);

            assert!(submit(&mut app, "hỏi", t0));
            deliver_reply(&mut app, t0).await;
            assert_eq!(bubble_text(&app, greeting), markup::render(GREETING).plain_text());

            finish_reveal(&mut app, t0);
            assert_eq!(last_bubble_text(&app), markup::render("ok").plain_text());
            assert!(app.conversation.is_idle());
        })
        .await;
}

// --- Shutdown ---

#[tokio::test]
async fn shutdown_cancels_pending_request_and_timers() {
    LocalSet::new()
        .run_until(async {
            let backend = ScriptedBackend::new([]);
            let mut app = test_app(backend);
            let t0 = Instant::now();

            submit(&mut app, "hỏi", t0);
            tokio::task::yield_now().await;
            app.shutdown();

            assert!(!app.composing.is_running());
            assert_eq!(app.next_deadline(), None);
            tokio::task::yield_now().await;
            assert!(app.event_rx.try_recv().is_err());
        })
        .await;
}
