//! The interactive loop.
//!
//! Strictly sequential: a submission blocks the loop until the backend
//! replies. While waiting, the loop keeps redrawing so the indicator and the
//! cosmetic reveal animate, and it still honours Ctrl+C. Every other key
//! pressed during a call is dropped.

pub mod keybindings;
pub mod lifecycle;

use std::error::Error;
use std::time::Duration;

use ratatui::backend::Backend;
use ratatui::crossterm::event::{self, Event, KeyEventKind};
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::debug;

use crate::core::app::App;
use crate::core::backend::ERROR_MARKER;
use crate::ui::layout::{build_transcript_lines, max_scroll, prewrap_lines, ScreenAreas};
use crate::ui::renderer::ui;
use keybindings::{handle_key, is_quit, sanitize_paste, KeyOutcome, ScrollBounds};
use lifecycle::{restore_terminal, setup_terminal, ChatTerminal};

const IDLE_TICK: Duration = Duration::from_millis(250);
const MIN_REVEAL_TICK: Duration = Duration::from_millis(16);

#[derive(Debug, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Quit,
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<Event>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

fn scroll_bounds(app: &App, terminal: &ChatTerminal) -> Result<ScrollBounds, Box<dyn Error>> {
    let size = terminal.size()?;
    let areas = ScreenAreas::compute(ratatui::layout::Rect::new(0, 0, size.width, size.height));
    let height = areas.transcript_text_height();
    let lines = prewrap_lines(&build_transcript_lines(app), areas.transcript.width);
    Ok(ScrollBounds {
        page: height,
        max: max_scroll(lines.len(), height),
    })
}

enum TurnEnd {
    Reply(String),
    Cancelled,
}

/// Text recorded for a turn abandoned with Ctrl+C, so the transcript and
/// the log still pair every user message with a reply.
fn cancelled_reply() -> String {
    format!("{ERROR_MARKER} cancelled before a reply arrived")
}

async fn run_turn<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut mpsc::UnboundedReceiver<Event>,
    text: String,
) -> Result<LoopControl, Box<dyn Error>> {
    let Some(pending) = app.begin_turn(&text) else {
        return Ok(LoopControl::Continue);
    };
    let backend = app.session.backend();
    let mut ticker = tokio::time::interval(app.reveal_delay.max(MIN_REVEAL_TICK));

    let end = {
        let call = backend.call(&pending.request);
        tokio::pin!(call);
        loop {
            terminal.draw(|f| ui(f, app))?;
            tokio::select! {
                reply = &mut call => break TurnEnd::Reply(reply),
                _ = ticker.tick() => app.ui.tick(),
                Some(ev) = events.recv() => {
                    if let Event::Key(key) = ev {
                        if key.kind == KeyEventKind::Press && is_quit(&key) {
                            debug!("quit requested while a reply was outstanding");
                            break TurnEnd::Cancelled;
                        }
                    }
                }
            }
        }
    };

    match end {
        TurnEnd::Reply(reply) => {
            app.complete_turn(pending, reply);
            Ok(LoopControl::Continue)
        }
        TurnEnd::Cancelled => {
            app.complete_turn(pending, cancelled_reply());
            Ok(LoopControl::Quit)
        }
    }
}

async fn event_loop(terminal: &mut ChatTerminal, app: &mut App) -> Result<(), Box<dyn Error>> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let reader = spawn_event_reader(event_tx);
    let mut ticker = tokio::time::interval(IDLE_TICK);

    let result = loop {
        if let Err(err) = terminal.draw(|f| ui(f, app)) {
            break Err(err.into());
        }

        let ev = tokio::select! {
            ev = event_rx.recv() => ev,
            _ = ticker.tick() => continue,
        };
        let Some(ev) = ev else {
            break Ok(());
        };

        match ev {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let bounds = match scroll_bounds(app, terminal) {
                    Ok(bounds) => bounds,
                    Err(err) => break Err(err),
                };
                match handle_key(app, key, bounds) {
                    KeyOutcome::Continue => {}
                    KeyOutcome::Quit => break Ok(()),
                    KeyOutcome::Submit(text) => {
                        match run_turn(terminal, app, &mut event_rx, text).await {
                            Ok(LoopControl::Continue) => {}
                            Ok(LoopControl::Quit) => break Ok(()),
                            Err(err) => break Err(err),
                        }
                    }
                }
            }
            Event::Paste(text) => app.ui.insert_str(&sanitize_paste(&text)),
            _ => {}
        }
    };

    reader.abort();
    result
}

pub async fn run_chat(mut app: App) -> Result<(), Box<dyn Error>> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app).await;
    restore_terminal(&mut terminal)?;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::{Backend as InferenceBackend, BackendKind, Capabilities};
    use crate::core::message::Role;
    use crate::core::prompt::BackendRequest;
    use crate::core::session::tests::{session_with, ScriptedBackend};
    use async_trait::async_trait;
    use ratatui::backend::TestBackend;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::Arc;
    use std::time::Instant;

    const LONG_TEXT: &str = "one two three four five six seven eight nine ten eleven twelve";

    fn test_terminal() -> Terminal<TestBackend> {
        Terminal::new(TestBackend::new(100, 24)).unwrap()
    }

    /// Never answers; only Ctrl+C ends a turn against it.
    struct SilentBackend;

    #[async_trait]
    impl InferenceBackend for SilentBackend {
        fn kind(&self) -> BackendKind {
            BackendKind::LocalDaemon
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities { multi_turn: true }
        }

        async fn call(&self, _request: &BackendRequest) -> String {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn reply_lands_without_waiting_for_the_reveal() {
        let backend = Arc::new(ScriptedBackend::new(BackendKind::LocalDaemon, &["done"]));
        let mut app = App::new(session_with(backend.clone()), Duration::from_secs(5));
        let mut terminal = test_terminal();
        let (_event_tx, mut event_rx) = mpsc::unbounded_channel();

        let started = Instant::now();
        let control = run_turn(&mut terminal, &mut app, &mut event_rx, LONG_TEXT.to_string())
            .await
            .unwrap();

        assert_eq!(control, LoopControl::Continue);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!app.ui.is_pending());

        let visible = app.session.transcript().visible();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0].role, Role::User);
        assert_eq!(visible[0].content, LONG_TEXT);
        assert_eq!(visible[1].role, Role::Assistant);
        assert_eq!(visible[1].content, "done");
        assert_eq!(backend.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_submission_does_not_call_the_backend() {
        let backend = Arc::new(ScriptedBackend::new(BackendKind::LocalDaemon, &["unused"]));
        let mut app = App::new(session_with(backend.clone()), Duration::from_millis(50));
        let mut terminal = test_terminal();
        let (_event_tx, mut event_rx) = mpsc::unbounded_channel();

        let control = run_turn(&mut terminal, &mut app, &mut event_rx, "   ".to_string())
            .await
            .unwrap();

        assert_eq!(control, LoopControl::Continue);
        assert!(app.session.transcript().is_empty());
        assert!(backend.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn ctrl_c_during_a_call_closes_the_turn_and_quits() {
        let mut app = App::new(
            crate::core::session::Session::new(
                crate::core::transcript::Transcript::new(None),
                crate::core::settings::Settings::for_backend(BackendKind::LocalDaemon),
                Arc::new(SilentBackend),
            ),
            Duration::from_millis(50),
        );
        let mut terminal = test_terminal();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        event_tx
            .send(Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)))
            .unwrap();
        event_tx
            .send(Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)))
            .unwrap();

        let control = run_turn(&mut terminal, &mut app, &mut event_rx, "hello".to_string())
            .await
            .unwrap();

        assert_eq!(control, LoopControl::Quit);
        assert!(app.ui.input.is_empty());
        let visible = app.session.transcript().visible();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[1].content, cancelled_reply());
        assert!(visible[1].content.starts_with(ERROR_MARKER));
    }
}
