//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI, and
//! translates keyboard events into component updates.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Poll Loop
//!
//! The event loop waits for terminal events with the configured poll
//! interval as its timeout, so every pass is at most one interval apart.
//! Each pass drains the engine's outbound relay with the non-blocking
//! `try_drain` and appends the fragments to the transcript — the interface
//! thread never blocks on the engine. Redraws happen only when something
//! changed (new output, a key, a resize).

pub mod component;
pub mod components;
pub mod event;
pub mod ui;

use log::{debug, info};
use std::io;
use std::io::stdout;

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::core::config::ResolvedConfig;
use crate::core::engine::{EngineRunner, InterpreterProcess};
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, TranscriptState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Presentation state persisted across the event loop.
pub struct TuiState {
    pub transcript: TranscriptState,
    pub input_box: InputBox,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            transcript: TranscriptState::new(),
            input_box: InputBox::new(),
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
    }
}

pub fn run(config: ResolvedConfig) -> io::Result<()> {
    let mut runner = EngineRunner::new();
    runner.start(InterpreterProcess::new(
        config.interpreter.clone(),
        config.interpreter_args.clone(),
        config.story.clone(),
    ))?;

    let story_name = config
        .story
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.story.display().to_string());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()?;

    let mut tui = TuiState::new();
    let mut needs_redraw = true; // Force first frame

    loop {
        // Drain whatever the engine produced since the last pass.
        let fragments = runner.outbound().try_drain();
        if !fragments.is_empty() {
            debug!("drained {} fragment(s) from engine", fragments.len());
            for fragment in &fragments {
                tui.transcript.append(fragment);
            }
            needs_redraw = true;
        }

        if needs_redraw {
            let engine_running = runner.is_running();
            terminal.draw(|f| ui::draw_ui(f, &mut tui, &story_name, engine_running))?;
            needs_redraw = false;
        }

        // Process first event + drain ALL pending events before next draw
        let first_event = poll_event_timeout(config.poll_interval);
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            needs_redraw = true;
            match event {
                // Resize just needs a redraw (already flagged above)
                TuiEvent::Resize => {}
                TuiEvent::ForceQuit => should_quit = true,
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown => {
                    tui.transcript.handle_event(&event);
                }
                _ => {
                    if let Some(InputEvent::Submit(line)) = tui.input_box.handle_event(&event) {
                        debug!("submitting command: {line:?}");
                        runner.enqueue_line(&line);
                    }
                }
            }
        }

        if should_quit {
            break;
        }
    }

    ratatui::restore();
    info!("Quill shutting down");
    Ok(())
}
