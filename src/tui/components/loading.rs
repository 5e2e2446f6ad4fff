//! # Loading Component
//!
//! Spinner, the current stage text, and the three-step indicator
//! (`Extract ─ Classify ─ Report`). Completed steps are dimmed green, the
//! active step is bold, pending steps are dark gray.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::core::progress::Stage;
use crate::tui::component::Component;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct LoadingView<'a> {
    pub stage: Stage,
    pub prompt: &'a str,
    pub spinner_frame: usize,
}

impl<'a> LoadingView<'a> {
    pub fn new(stage: Stage, prompt: &'a str, spinner_frame: usize) -> Self {
        Self {
            stage,
            prompt,
            spinner_frame,
        }
    }

    fn step_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, step) in Stage::ALL.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" ── ", Style::default().fg(Color::DarkGray)));
            }
            let (marker, style) = if step < self.stage {
                ("✓", Style::default().fg(Color::Green).add_modifier(Modifier::DIM))
            } else if step == self.stage {
                (
                    SPINNER[self.spinner_frame % SPINNER.len()],
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )
            } else {
                ("○", Style::default().fg(Color::DarkGray))
            };
            spans.push(Span::styled(
                format!("{} {}. {}", marker, step.number(), step.step_name()),
                style,
            ));
        }
        Line::from(spans)
    }

    /// The submitted prompt, one `Line` per line, wrapped in quotes.
    fn prompt_lines(&self) -> Vec<Line<'static>> {
        let style = Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC);
        let rows: Vec<&str> = self.prompt.lines().collect();
        let last = rows.len().saturating_sub(1);
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                let open = if i == 0 { "\"" } else { "" };
                let close = if i == last { "\"" } else { "" };
                Line::from(Span::styled(format!("{open}{row}{close}"), style))
            })
            .collect()
    }
}

impl Component for LoadingView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(Span::styled(
                "Analyzing your symptoms",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            self.step_line(),
            Line::default(),
            Line::from(Span::styled(self.stage.label(), Style::default().fg(Color::Cyan))),
            Line::default(),
        ];
        lines.extend(self.prompt_lines());

        let [centered] = Layout::vertical([Constraint::Length(lines.len() as u16 + 2)])
            .flex(Flex::Center)
            .areas(area);
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, centered);
    }
}
