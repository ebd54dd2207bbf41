//! # Engine Runner
//!
//! Hosts exactly one execution of the external interpreter, entirely off the
//! interface thread. The engine collaborator is consumed purely through two
//! line-oriented stream handles — commands in, narrative text out — which it
//! receives as explicit `run()` parameters. No global stream state is
//! touched on any thread.
//!
//! There is no restart and no shutdown handshake: if the engine errors or
//! exits, its worker thread simply ends (logged, never propagated), and on
//! process exit the worker is abandoned rather than joined.

use log::{info, warn};
use std::io;
use std::io::{BufRead, Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;

use crate::core::relay::{Relay, RelayReader, RelayWriter};

/// An interactive-fiction engine driven through injected stream handles.
///
/// Implementations read command lines from `input` and write narrative text
/// to `output`, exactly as a legacy stdin/stdout program would.
pub trait StoryEngine: Send + 'static {
    fn run(&mut self, input: RelayReader, output: RelayWriter) -> io::Result<()>;
}

/// Background worker owning the relay pair for one engine session.
///
/// Created once at application start; lives for the process lifetime.
pub struct EngineRunner {
    inbound: Arc<Relay>,
    outbound: Arc<Relay>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineRunner {
    pub fn new() -> Self {
        Self {
            inbound: Relay::new(),
            outbound: Relay::new(),
            worker: None,
        }
    }

    /// Launch the worker thread and invoke the engine's entry point on it.
    ///
    /// Engine failure ends the worker; the interface keeps running and will
    /// simply receive no further output.
    pub fn start<E: StoryEngine>(&mut self, mut engine: E) -> io::Result<()> {
        let input = self.inbound.reader();
        let output = self.outbound.writer();
        let handle = thread::Builder::new()
            .name("engine".to_string())
            .spawn(move || {
                info!("engine worker started");
                match engine.run(input, output) {
                    Ok(()) => info!("engine finished"),
                    Err(e) => warn!("engine terminated: {e}"),
                }
            })?;
        self.worker = Some(handle);
        Ok(())
    }

    /// Normalize `text` to end with exactly one newline and queue it for the
    /// engine. Safe to call from any thread; blocks only if the inbound
    /// relay is full, which user-paced typing does not reach in practice.
    pub fn enqueue_line(&self, text: &str) {
        let mut line = text.trim_end_matches('\n').to_string();
        line.push('\n');
        self.inbound.write(line);
    }

    /// The relay carrying caller commands to the engine.
    pub fn inbound(&self) -> &Arc<Relay> {
        &self.inbound
    }

    /// The relay carrying produced text back from the engine.
    pub fn outbound(&self) -> &Arc<Relay> {
        &self.outbound
    }

    /// Whether the worker thread is still alive. Purely informational.
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Default for EngineRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// The production engine: an external interpreter executable with piped
/// stdio, invoked as if launched from a command line with the story path as
/// its final argument.
pub struct InterpreterProcess {
    command: String,
    args: Vec<String>,
    story: PathBuf,
}

impl InterpreterProcess {
    pub fn new(command: String, args: Vec<String>, story: PathBuf) -> Self {
        Self {
            command,
            args,
            story,
        }
    }
}

impl StoryEngine for InterpreterProcess {
    fn run(&mut self, mut input: RelayReader, mut output: RelayWriter) -> io::Result<()> {
        info!(
            "spawning interpreter: {} {:?} {}",
            self.command,
            self.args,
            self.story.display()
        );
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .arg(&self.story)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let mut child_stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::other("interpreter stdin unavailable"))?;

        // Feed relay lines into the child's stdin. The relay never closes,
        // so this thread blocks between commands and is abandoned with the
        // process; it ends on its own once the child's stdin goes away.
        thread::Builder::new()
            .name("engine-stdin".to_string())
            .spawn(move || {
                loop {
                    let mut line = String::new();
                    if input.read_line(&mut line).is_err() {
                        break;
                    }
                    if child_stdin
                        .write_all(line.as_bytes())
                        .and_then(|()| child_stdin.flush())
                        .is_err()
                    {
                        break;
                    }
                }
            })?;

        // Copy the child's stdout into the outbound relay chunk by chunk.
        // Reading bytes rather than lines keeps prompts without a trailing
        // newline (the bare ">") flowing through.
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::other("interpreter stdout unavailable"))?;
        let mut buf = [0u8; 4096];
        loop {
            let n = stdout.read(&mut buf)?;
            if n == 0 {
                break;
            }
            output.write_all(&buf[..n])?;
        }

        let status = child.wait()?;
        info!("interpreter exited: {status}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedEngine;
    use std::time::{Duration, Instant};

    fn drain_with_deadline(runner: &EngineRunner, needle: &str) -> String {
        let deadline = Instant::now() + Duration::from_secs(2);
        let mut collected = String::new();
        while Instant::now() < deadline {
            for fragment in runner.outbound().try_drain() {
                collected.push_str(&fragment);
            }
            if collected.contains(needle) {
                return collected;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("engine output never contained {needle:?}; got {collected:?}");
    }

    #[test]
    fn test_enqueue_line_appends_newline() {
        let runner = EngineRunner::new();
        runner.enqueue_line("look");
        assert_eq!(runner.inbound().read_line(), "look\n");
    }

    #[test]
    fn test_enqueue_line_normalization_is_idempotent() {
        let runner = EngineRunner::new();
        runner.enqueue_line("look\n");
        assert_eq!(runner.inbound().read_line(), "look\n");
    }

    #[test]
    fn test_scripted_engine_round_trip() {
        let mut runner = EngineRunner::new();
        let engine = ScriptedEngine::new(
            "West of House\n",
            vec!["Opening the small mailbox reveals a leaflet.\n".to_string()],
        );
        runner.start(engine).unwrap();

        let banner = drain_with_deadline(&runner, "West of House");
        assert!(banner.contains("West of House"));

        runner.enqueue_line("open mailbox");
        let response = drain_with_deadline(&runner, "leaflet");
        assert!(response.contains("Opening the small mailbox"));
    }

    #[test]
    fn test_engine_failure_only_ends_worker() {
        struct FailingEngine;
        impl StoryEngine for FailingEngine {
            fn run(&mut self, _input: RelayReader, _output: RelayWriter) -> io::Result<()> {
                Err(io::Error::other("story file corrupt"))
            }
        }

        let mut runner = EngineRunner::new();
        runner.start(FailingEngine).unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        while runner.is_running() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!runner.is_running());

        // The interface side keeps working against the relays.
        runner.enqueue_line("look");
        assert_eq!(runner.inbound().read_line(), "look\n");
        assert!(runner.outbound().try_drain().is_empty());
    }
}
