//! # InputBox Component
//!
//! Single command line with history recall.
//!
//! ## Responsibilities
//!
//! - Capture text input and ordinary editing (backspace, delete, cursor
//!   movement, paste)
//! - Handle submission (Enter): trim, record in history, clear, emit
//! - Handle history recall (Up/Down) with the cursor clamped to
//!   `[0, history length]`
//!
//! Enter never inserts a literal newline and Up/Down never move a native
//! cursor line — those keys are consumed here. The buffer is internal
//! state; the command history lives inside the component as well, since
//! nothing else reads it.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::history::CommandHistory;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted a non-empty command (Enter pressed)
    Submit(String),
    /// Text content changed (if the parent needs to know)
    ContentChanged,
}

/// Command input component.
///
/// # State
///
/// - `buffer`: the line being composed
/// - `cursor`: byte offset into `buffer` (always on a char boundary)
/// - `history`: previously submitted lines plus the recall cursor
pub struct InputBox {
    buffer: String,
    cursor: usize,
    history: CommandHistory,
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            history: CommandHistory::new(),
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Replace the whole line (history recall) with the cursor at its end.
    fn set_line(&mut self, text: String) {
        self.cursor = text.len();
        self.buffer = text;
    }
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

fn prev_char_boundary(s: &str, idx: usize) -> usize {
    let mut i = idx - 1;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn next_char_boundary(s: &str, idx: usize) -> usize {
    let mut i = idx + 1;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(2);
        let cursor_col = self.buffer[..self.cursor].width() as u16;
        // Keep the cursor visible when the line outgrows the box.
        let hscroll = cursor_col.saturating_sub(inner_width.saturating_sub(1));

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Command");
        let input = Paragraph::new(self.buffer.as_str())
            .block(block)
            .scroll((0, hscroll))
            .style(Style::default().fg(Color::Green));

        frame.render_widget(input, area);
        frame.set_cursor_position((area.x + 1 + cursor_col - hscroll, area.y + 1));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // The input composes a single command line: pasted line
                // breaks become spaces.
                let flat: String = text
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                    .collect();
                self.buffer.insert_str(self.cursor, &flat);
                self.cursor += flat.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(prev..self.cursor);
                    self.cursor = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(self.cursor..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => {
                if self.cursor > 0 {
                    self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorRight => {
                if self.cursor < self.buffer.len() {
                    self.cursor = next_char_boundary(&self.buffer, self.cursor);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor != self.buffer.len()).then(|| {
                self.cursor = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::Submit => {
                // Empty or whitespace-only input just clears: no history
                // entry, no submission.
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    self.history.push(trimmed);
                    Some(InputEvent::Submit(trimmed.to_string()))
                }
            }
            TuiEvent::HistoryPrev => {
                if self.history.is_empty() {
                    None
                } else {
                    let entry = self.history.previous().unwrap_or("").to_string();
                    self.set_line(entry);
                    Some(InputEvent::ContentChanged)
                }
            }
            TuiEvent::HistoryNext => {
                if self.history.is_empty() {
                    None
                } else {
                    let entry = self.history.next_entry().unwrap_or("").to_string();
                    self.set_line(entry);
                    Some(InputEvent::ContentChanged)
                }
            }
            _ => None,
        }
    }
}
