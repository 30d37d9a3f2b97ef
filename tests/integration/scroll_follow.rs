// Auto-follow versus user scrolling, driven through real frames on a test
// terminal so the geometry comes from layout.

use chatline::app::{self, LockState, ScrollBehavior};
use crossterm::event::{Event, KeyModifiers, MouseEvent, MouseEventKind};
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};
use tokio::task::LocalSet;

use crate::helpers::{
    ScriptedBackend, deliver_reply, draw, fill_log, screen_contains, settle, submit, terminal,
    test_app,
};

const DEBOUNCE: Duration = Duration::from_millis(120);

fn at_bottom(app: &app::App) -> bool {
    let viewport = app.scroll.viewport();
    viewport.scroll_top == viewport.max_scroll()
}

#[test]
fn new_bubbles_are_followed_while_at_bottom() {
    let mut app = test_app(ScriptedBackend::new([]));
    let mut term = terminal(40, 16);

    fill_log(&mut app, 20);
    settle(&mut term, &mut app);
    assert!(app.scroll.viewport().max_scroll() > 0);
    assert!(at_bottom(&app));

    fill_log(&mut app, 3);
    draw(&mut term, &mut app);
    assert!(at_bottom(&app));
    assert!(screen_contains(&term, "dòng 22"));
}

#[test]
fn scrolling_up_locks_and_shows_jump_control() {
    let mut app = test_app(ScriptedBackend::new([]));
    let mut term = terminal(40, 16);
    fill_log(&mut app, 20);
    settle(&mut term, &mut app);
    assert!(!screen_contains(&term, "Xuống cuối"));

    app.user_scroll_by(-10, Instant::now());
    assert_eq!(app.lock.state(), LockState::Locked);
    draw(&mut term, &mut app);
    assert!(screen_contains(&term, "Xuống cuối"));
    assert!(app.jump_area.is_some());

    // Content added while locked leaves the viewport alone.
    let top = app.scroll.viewport().scroll_top;
    fill_log(&mut app, 5);
    settle(&mut term, &mut app);
    assert_eq!(app.scroll.viewport().scroll_top, top);
    assert!(!at_bottom(&app));
}

#[test]
fn scroll_within_threshold_keeps_following() {
    let mut app = test_app(ScriptedBackend::new([]));
    let mut term = terminal(40, 16);
    fill_log(&mut app, 20);
    settle(&mut term, &mut app);

    app.user_scroll_by(-3, Instant::now());
    assert_eq!(app.lock.state(), LockState::Following);
    assert!(app.lock.debounce_deadline().is_some());
    assert!(app.may_auto_scroll());
}

#[test]
fn returning_to_bottom_resumes_after_debounce() {
    let mut app = test_app(ScriptedBackend::new([]));
    let mut term = terminal(40, 16);
    fill_log(&mut app, 20);
    settle(&mut term, &mut app);
    let t0 = Instant::now();

    app.user_scroll_to(0, t0);
    app.user_scroll_to(usize::MAX, t0);
    assert_eq!(app.lock.state(), LockState::Locked);
    assert!(!app.may_auto_scroll());

    app::poll_timers(&mut app, t0 + DEBOUNCE - Duration::from_millis(1));
    assert_eq!(app.lock.state(), LockState::Locked);
    app::poll_timers(&mut app, t0 + DEBOUNCE);
    assert_eq!(app.lock.state(), LockState::Following);
    assert_eq!(app.lock.debounce_deadline(), None);

    draw(&mut term, &mut app);
    assert!(!screen_contains(&term, "Xuống cuối"));
    fill_log(&mut app, 2);
    draw(&mut term, &mut app);
    assert!(at_bottom(&app));
}

#[test]
fn scrolling_away_during_debounce_cancels_it() {
    let mut app = test_app(ScriptedBackend::new([]));
    let mut term = terminal(40, 16);
    fill_log(&mut app, 20);
    settle(&mut term, &mut app);
    let t0 = Instant::now();

    app.user_scroll_to(0, t0);
    app.user_scroll_to(usize::MAX, t0);
    app.user_scroll_by(-10, t0 + Duration::from_millis(60));
    assert_eq!(app.lock.debounce_deadline(), None);

    app::poll_timers(&mut app, t0 + DEBOUNCE * 3);
    assert_eq!(app.lock.state(), LockState::Locked);
}

#[test]
fn jump_request_returns_to_bottom_and_hides_control() {
    let mut app = test_app(ScriptedBackend::new([]));
    let mut term = terminal(40, 16);
    fill_log(&mut app, 20);
    settle(&mut term, &mut app);

    app.user_scroll_to(0, Instant::now());
    app.focus = app::Focus::Transcript;
    draw(&mut term, &mut app);
    assert!(app.jump_area.is_some());

    app.request_jump();
    assert_eq!(app.scroll.pending_follow(), Some(ScrollBehavior::Smooth));
    assert_eq!(app.focus, app::Focus::Input);

    // Smooth: the first frame moves part of the way only.
    draw(&mut term, &mut app);
    assert!(!at_bottom(&app));
    settle(&mut term, &mut app);
    assert!(at_bottom(&app));
    assert_eq!(app.lock.state(), LockState::Following);
    assert_eq!(app.jump_area, None);
}

#[tokio::test]
async fn reveal_does_not_pull_a_locked_reader_down() {
    LocalSet::new()
        .run_until(async {
            let answer = "Lịch tuần:\n\n- Thứ 2: giao ban\n- Thứ 4: seminar\n- Thứ 6: họp khoa";
            let mut app = test_app(ScriptedBackend::new([Ok(Some(answer.to_owned()))]));
            let mut term = terminal(40, 16);
            fill_log(&mut app, 20);
            settle(&mut term, &mut app);
            let mut now = Instant::now();

            submit(&mut app, "Tuần này có gì?", now);
            settle(&mut term, &mut app);
            app.user_scroll_by(-12, now);
            let top = app.scroll.viewport().scroll_top;

            deliver_reply(&mut app, now).await;
            while app.typewriter.active().is_some() {
                app::poll_timers(&mut app, now);
                draw(&mut term, &mut app);
                now += app.config.tick_interval;
            }

            assert!(app.conversation.is_idle());
            assert_eq!(app.scroll.viewport().scroll_top, top);
            assert_eq!(app.lock.state(), LockState::Locked);
            assert!(screen_contains(&term, "Xuống cuối"));
        })
        .await;
}

#[tokio::test]
async fn one_wheel_notch_mid_reveal_stops_the_follow() {
    LocalSet::new()
        .run_until(async {
            let answer = "Lịch tuần:\n\n- Thứ 2: giao ban\n- Thứ 4: seminar\n- Thứ 6: họp khoa";
            let mut app = test_app(ScriptedBackend::new([Ok(Some(answer.to_owned()))]));
            let mut term = terminal(40, 16);
            fill_log(&mut app, 20);
            settle(&mut term, &mut app);
            let mut now = Instant::now();

            submit(&mut app, "Tuần này có gì?", now);
            settle(&mut term, &mut app);
            deliver_reply(&mut app, now).await;
            for _ in 0..3 {
                app::poll_timers(&mut app, now);
                draw(&mut term, &mut app);
                now += app.config.tick_interval;
            }
            assert!(app.typewriter.active().is_some());
            assert!(at_bottom(&app));

            let wheel_up = Event::Mouse(MouseEvent {
                kind: MouseEventKind::ScrollUp,
                column: 5,
                row: 5,
                modifiers: KeyModifiers::NONE,
            });
            app::handle_terminal_event(&mut app, wheel_up, now);
            assert_eq!(app.lock.state(), LockState::Locked);
            let top = app.scroll.viewport().scroll_top;

            while app.typewriter.active().is_some() {
                app::poll_timers(&mut app, now);
                draw(&mut term, &mut app);
                assert_eq!(app.scroll.viewport().scroll_top, top);
                now += app.config.tick_interval;
            }
            assert_eq!(app.lock.state(), LockState::Locked);
            assert!(screen_contains(&term, "Xuống cuối"));
        })
        .await;
}

#[tokio::test]
async fn reveal_keeps_a_following_reader_at_the_bottom() {
    LocalSet::new()
        .run_until(async {
            let answer = "Lịch tuần:\n\n- Thứ 2: giao ban\n- Thứ 4: seminar\n- Thứ 6: họp khoa";
            let mut app = test_app(ScriptedBackend::new([Ok(Some(answer.to_owned()))]));
            let mut term = terminal(40, 16);
            fill_log(&mut app, 20);
            settle(&mut term, &mut app);
            let mut now = Instant::now();

            submit(&mut app, "Tuần này có gì?", now);
            settle(&mut term, &mut app);
            deliver_reply(&mut app, now).await;
            loop {
                app::poll_timers(&mut app, now);
                if app.typewriter.active().is_none() {
                    break;
                }
                draw(&mut term, &mut app);
                assert!(at_bottom(&app));
                now += app.config.tick_interval;
            }
            // The last step eases in rather than snapping.
            assert_eq!(app.scroll.pending_follow(), Some(ScrollBehavior::Smooth));
            settle(&mut term, &mut app);

            assert!(at_bottom(&app));
            assert!(screen_contains(&term, "Thứ 6: họp khoa"));
        })
        .await;
}

#[test]
fn resize_keeps_bottom_in_view() {
    let mut app = test_app(ScriptedBackend::new([]));
    let mut term = terminal(40, 16);
    fill_log(&mut app, 20);
    settle(&mut term, &mut app);

    term.backend_mut().resize(30, 12);
    app::on_resize(&mut app);
    draw(&mut term, &mut app);
    assert!(at_bottom(&app));
    assert_eq!(app.scroll.viewport().client_height, 6);
}
