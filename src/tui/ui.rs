use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::text::Span;

use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::Transcript;

/// Lay out the session screen: one-line title bar, transcript, command box.
pub fn draw_ui(frame: &mut Frame, tui: &mut TuiState, story: &str, engine_running: bool) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(3)]);
    let [title_area, transcript_area, input_area] = layout.areas(frame.area());

    // Title bar
    let mut title = format!("Quill — {story}");
    if !engine_running {
        title.push_str(" | engine stopped");
    }
    if tui.transcript.has_unseen_content() {
        title.push_str(" | ↓ New");
    }
    frame.render_widget(Span::raw(title), title_area);

    Transcript::new(&mut tui.transcript).render(frame, transcript_area);
    tui.input_box.render(frame, input_area);
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
    fn test_draw_ui_smoke() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut tui = TuiState::new();
        tui.transcript.append("West of House\n");

        terminal
            .draw(|f| draw_ui(f, &mut tui, "zork1.z5", true))
            .unwrap();

        let text = backend_text(&terminal);
        assert!(text.contains("Quill — zork1.z5"));
        assert!(text.contains("West of House"));
        assert!(text.contains("Command"));
        assert!(!text.contains("engine stopped"));
    }

    #[test]
    fn test_draw_ui_reports_stopped_engine() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut tui = TuiState::new();

        terminal
            .draw(|f| draw_ui(f, &mut tui, "zork1.z5", false))
            .unwrap();

        assert!(backend_text(&terminal).contains("engine stopped"));
    }
}
