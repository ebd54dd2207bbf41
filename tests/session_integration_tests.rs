//! Integration tests for a full front-end session.
//!
//! These drive the same path the application shell does — submit a command
//! through the input box, forward it to the engine runner, drain the
//! outbound relay on a poll cadence, and append into the transcript — with
//! a scripted engine standing in for the external interpreter.

use std::io;
use std::io::{BufRead, Write};
use std::thread;
use std::time::{Duration, Instant};

use quill::core::engine::{EngineRunner, StoryEngine};
use quill::core::relay::{RelayReader, RelayWriter};
use quill::tui::TuiState;
use quill::tui::component::EventHandler;
use quill::tui::components::InputEvent;
use quill::tui::event::TuiEvent;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Stand-in interpreter: prints a banner, then answers each command line
/// with a canned response until the script runs out.
struct ScriptedEngine {
    banner: &'static str,
    responses: Vec<&'static str>,
}

impl StoryEngine for ScriptedEngine {
    fn run(&mut self, mut input: RelayReader, mut output: RelayWriter) -> io::Result<()> {
        write!(output, "{}", self.banner)?;
        for response in std::mem::take(&mut self.responses) {
            let mut line = String::new();
            input.read_line(&mut line)?;
            write!(output, "{response}")?;
        }
        Ok(())
    }
}

/// Drain the runner's outbound relay into the transcript, one poll at a
/// time, until the transcript contains `needle` (or the deadline passes).
fn poll_until(runner: &EngineRunner, tui: &mut TuiState, needle: &str) {
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        for fragment in runner.outbound().try_drain() {
            tui.transcript.append(&fragment);
        }
        if tui.transcript.text().contains(needle) {
            return;
        }
        assert!(
            Instant::now() < deadline,
            "transcript never contained {needle:?}; got {:?}",
            tui.transcript.text()
        );
        thread::sleep(POLL_INTERVAL);
    }
}

fn submit(tui: &mut TuiState, runner: &EngineRunner, command: &str) {
    for c in command.chars() {
        tui.input_box.handle_event(&TuiEvent::InputChar(c));
    }
    if let Some(InputEvent::Submit(line)) = tui.input_box.handle_event(&TuiEvent::Submit) {
        runner.enqueue_line(&line);
    }
}

#[test]
fn test_command_response_lands_in_transcript() {
    let mut runner = EngineRunner::new();
    runner
        .start(ScriptedEngine {
            banner: "ZORK I: The Great Underground Empire\nWest of House\n>",
            responses: vec!["Opening the small mailbox reveals a leaflet.\n>"],
        })
        .unwrap();

    let mut tui = TuiState::new();
    poll_until(&runner, &mut tui, "West of House");

    let banner_len = tui.transcript.text().len();
    submit(&mut tui, &runner, "open mailbox");
    poll_until(&runner, &mut tui, "leaflet");

    // The response landed strictly after all prior content.
    assert!(tui.transcript.text()[banner_len..].contains("Opening the small mailbox"));
    assert!(tui.transcript.text().starts_with("ZORK I"));
}

#[test]
fn test_session_over_multiple_turns_preserves_order() {
    let mut runner = EngineRunner::new();
    runner
        .start(ScriptedEngine {
            banner: "West of House\n>",
            responses: vec![
                "Opening the small mailbox reveals a leaflet.\n>",
                "Taken.\n>",
            ],
        })
        .unwrap();

    let mut tui = TuiState::new();
    poll_until(&runner, &mut tui, ">");

    submit(&mut tui, &runner, "open mailbox");
    poll_until(&runner, &mut tui, "leaflet");

    submit(&mut tui, &runner, "take leaflet");
    poll_until(&runner, &mut tui, "Taken.");

    let text = tui.transcript.text();
    let banner_at = text.find("West of House").unwrap();
    let open_at = text.find("Opening the small mailbox").unwrap();
    let taken_at = text.find("Taken.").unwrap();
    assert!(banner_at < open_at && open_at < taken_at);

    // Both commands were recorded for recall.
    assert_eq!(tui.input_box.history().len(), 2);
}

#[test]
fn test_empty_submission_reaches_no_engine() {
    let mut runner = EngineRunner::new();
    runner
        .start(ScriptedEngine {
            banner: "West of House\n>",
            responses: vec!["You can't see any such thing.\n>"],
        })
        .unwrap();

    let mut tui = TuiState::new();
    poll_until(&runner, &mut tui, ">");

    // Whitespace-only input is swallowed by the input box.
    submit(&mut tui, &runner, "   ");
    assert!(runner.inbound().is_empty());
    assert!(tui.input_box.history().is_empty());

    // A real command still goes through afterwards.
    submit(&mut tui, &runner, "examine grue");
    poll_until(&runner, &mut tui, "any such thing");
}
