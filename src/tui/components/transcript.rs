//! # Transcript Component
//!
//! Scrollable, read-only view of everything the engine has written.
//!
//! ## Responsibilities
//!
//! - Append incoming text fragments at the tail (never anywhere else)
//! - Auto-scroll to show new content while the user sits at the bottom
//! - Free scrolling (wheel / PageUp / PageDown) with clamping, re-pinning
//!   to the bottom when the user scrolls back down to it
//!
//! No line parsing and no markup interpretation: embedded formatting codes
//! display as literal text.
//!
//! ## Architecture
//!
//! `Transcript` is a transient component (created each frame) wrapping
//! `&mut TranscriptState` (persistent state), so the render pass can update
//! scroll state in place, aligning with ratatui's `StatefulWidget` pattern.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::widgets::{Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Text buffer and scroll state for the transcript.
/// Must be persisted in the parent TuiState.
pub struct TranscriptState {
    /// Append-only session text. Grows for the session lifetime.
    text: String,
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Wrapped content height from the last render
    pub total_height: u16,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptState {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true, // Start attached to bottom
            total_height: 0,
            viewport_height: 0,
        }
    }

    /// Append a fragment at the tail of the buffer.
    pub fn append(&mut self, fragment: &str) {
        self.text.push_str(fragment);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.total_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll if the user has scrolled back to the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.total_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Whether content exists below the current scroll position.
    pub fn has_unseen_content(&self) -> bool {
        if self.total_height <= self.viewport_height {
            return false;
        }
        let max_y = self.total_height - self.viewport_height;
        self.scroll_state.offset().y < max_y
    }
}

/// EventHandler lives on `TranscriptState` rather than `Transcript` because
/// the component is recreated each frame while scroll state persists across
/// the event loop.
impl EventHandler for TranscriptState {
    type Event = (); // Scrolling is handled internally, nothing propagates

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
                None
            }
            _ => None,
        }
    }
}

/// Read-only scrolling view over the transcript buffer.
/// Created fresh each frame with a reference to the persistent state.
pub struct Transcript<'a> {
    pub state: &'a mut TranscriptState,
}

impl<'a> Transcript<'a> {
    pub fn new(state: &'a mut TranscriptState) -> Self {
        Self { state }
    }
}

impl Component for Transcript<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area

        let paragraph = Paragraph::new(self.state.text.as_str()).wrap(Wrap { trim: false });
        let total_height = paragraph.line_count(content_width).min(u16::MAX as usize) as u16;
        let canvas_height = total_height.max(1);

        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(paragraph, Rect::new(0, 0, content_width, canvas_height));

        self.state.total_height = total_height;
        self.state.viewport_height = area.height;

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        } else {
            self.state.clamp_scroll();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn backend_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_append_is_monotonic() {
        let mut state = TranscriptState::new();
        state.append("West of House\n");
        let before = state.text().to_string();
        state.append("You are standing in an open field.\n");

        assert!(state.text().starts_with(&before), "existing content altered");
        assert_eq!(
            &state.text()[before.len()..],
            "You are standing in an open field.\n"
        );
    }

    #[test]
    fn test_render_shows_appended_text() {
        let backend = TestBackend::new(40, 10);
        let mut terminal = Terminal::new(backend).unwrap();

        let mut state = TranscriptState::new();
        state.append("West of House\n");

        terminal
            .draw(|f| Transcript::new(&mut state).render(f, f.area()))
            .unwrap();

        assert!(backend_text(&terminal).contains("West of House"));
    }

    #[test]
    fn test_stick_to_bottom_shows_tail() {
        let backend = TestBackend::new(40, 5);
        let mut terminal = Terminal::new(backend).unwrap();

        let mut state = TranscriptState::new();
        for i in 0..50 {
            state.append(&format!("line {i}\n"));
        }

        terminal
            .draw(|f| Transcript::new(&mut state).render(f, f.area()))
            .unwrap();

        let text = backend_text(&terminal);
        assert!(text.contains("line 49"));
        assert!(!text.contains("line 0"));
        assert!(!state.has_unseen_content());
    }

    #[test]
    fn test_scroll_up_unpins_and_flags_unseen() {
        let backend = TestBackend::new(40, 5);
        let mut terminal = Terminal::new(backend).unwrap();

        let mut state = TranscriptState::new();
        for i in 0..50 {
            state.append(&format!("line {i}\n"));
        }
        terminal
            .draw(|f| Transcript::new(&mut state).render(f, f.area()))
            .unwrap();

        for _ in 0..10 {
            state.handle_event(&TuiEvent::ScrollUp);
        }
        assert!(!state.stick_to_bottom);

        terminal
            .draw(|f| Transcript::new(&mut state).render(f, f.area()))
            .unwrap();
        assert!(state.has_unseen_content());
        assert!(!backend_text(&terminal).contains("line 49"));
    }

    #[test]
    fn test_scroll_back_down_repins() {
        let mut state = TranscriptState::new();
        state.total_height = 20;
        state.viewport_height = 5;
        state.scroll_state.set_offset(Position { x: 0, y: 14 });
        state.stick_to_bottom = false;

        state.handle_event(&TuiEvent::ScrollDown);
        assert!(state.stick_to_bottom);
    }
}
