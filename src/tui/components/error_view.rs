//! # ErrorPanel Component
//!
//! Centered bordered box with the classified error's title and guidance.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Wrap};

use crate::core::state::{ErrorKind, ErrorView};
use crate::tui::component::Component;

pub struct ErrorPanel<'a> {
    pub error: &'a ErrorView,
}

impl<'a> ErrorPanel<'a> {
    pub fn new(error: &'a ErrorView) -> Self {
        Self { error }
    }
}

fn icon(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NetworkFailure => "🔌",
        ErrorKind::ModelUnavailable => "🧠",
        ErrorKind::AnalysisFailed => "⚠️",
    }
}

impl Component for ErrorPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                format!("{} {}", icon(self.error.kind), self.error.title),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::raw(self.error.message.clone())),
            Line::default(),
            Line::from(Span::styled(
                "Press r or Enter to try again",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let width = area.width.min(72);
        let [column] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(area);
        let [boxed] = Layout::vertical([Constraint::Length(11)])
            .flex(Flex::Center)
            .areas(column);

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Red))
                    .padding(Padding::uniform(1)),
            );
        frame.render_widget(paragraph, boxed);
    }
}
