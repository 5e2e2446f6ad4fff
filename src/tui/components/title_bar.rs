//! # TitleBar Component
//!
//! Single-line bar: app name, current status message, and the key hints
//! for the screen that is showing.
//!
//! Purely presentational. All data arrives as props.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar<'a> {
    pub status_message: &'a str,
    /// Key hints, right-aligned (e.g. "Enter analyze · Ctrl+C quit")
    pub hints: &'a str,
}

impl<'a> TitleBar<'a> {
    pub fn new(status_message: &'a str, hints: &'a str) -> Self {
        Self {
            status_message,
            hints,
        }
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let hints_width = (self.hints.chars().count() as u16).min(area.width / 2);
        let [left, right] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(hints_width)]).areas(area);

        let mut spans = vec![Span::styled(
            "Triage",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )];
        if !self.status_message.is_empty() {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::raw(self.status_message.to_string()));
        }
        frame.render_widget(Line::from(spans), left);
        frame.render_widget(
            Line::from(Span::styled(
                self.hints.to_string(),
                Style::default().fg(Color::DarkGray),
            ))
            .right_aligned(),
            right,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(100, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_title_bar_with_status_and_hints() {
        let mut bar = TitleBar::new("MediTriageAI v1.0.0 online", "Ctrl+C quit");
        let text = render(&mut bar);
        assert!(text.starts_with("Triage | MediTriageAI v1.0.0 online"));
        assert!(text.trim_end().ends_with("Ctrl+C quit"));
    }

    #[test]
    fn test_title_bar_without_status() {
        let mut bar = TitleBar::new("", "");
        let text = render(&mut bar);
        assert!(text.starts_with("Triage"));
        assert!(!text.contains('|'));
    }
}
