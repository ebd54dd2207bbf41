//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::io;
use std::io::{BufRead, Write};

use crate::core::engine::StoryEngine;
use crate::core::relay::{RelayReader, RelayWriter};

/// A canned engine for tests that don't need a real interpreter.
///
/// Writes its banner, then answers one queued response per command line
/// read, and returns once the script is exhausted.
pub struct ScriptedEngine {
    banner: String,
    responses: Vec<String>,
}

impl ScriptedEngine {
    pub fn new(banner: impl Into<String>, responses: Vec<String>) -> Self {
        Self {
            banner: banner.into(),
            responses,
        }
    }
}

impl StoryEngine for ScriptedEngine {
    fn run(&mut self, mut input: RelayReader, mut output: RelayWriter) -> io::Result<()> {
        write!(output, "{}", self.banner)?;
        for response in self.responses.drain(..) {
            let mut line = String::new();
            input.read_line(&mut line)?;
            write!(output, "{response}")?;
        }
        Ok(())
    }
}
