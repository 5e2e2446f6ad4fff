//! # DiseaseList Component
//!
//! Overlay listing the conditions the service knows about, with each
//! one's risk icon and an emergency marker. Toggled with Ctrl+D.

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Wrap};

use crate::core::state::DiseasePanel;
use crate::render::view::RiskClass;
use crate::tui::component::Component;

pub struct DiseaseList<'a> {
    pub panel: &'a DiseasePanel,
}

impl<'a> DiseaseList<'a> {
    pub fn new(panel: &'a DiseasePanel) -> Self {
        Self { panel }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        match self.panel {
            DiseasePanel::Hidden => Vec::new(),
            DiseasePanel::Loading => vec![Line::from(Span::styled(
                "Loading catalogue...",
                Style::default().fg(Color::DarkGray),
            ))],
            DiseasePanel::Failed(message) => vec![Line::from(Span::styled(
                format!("Could not load catalogue: {message}"),
                Style::default().fg(Color::Red),
            ))],
            DiseasePanel::Shown(list) if list.is_empty() => vec![Line::from(Span::styled(
                "The service reported no conditions.",
                Style::default().fg(Color::DarkGray),
            ))],
            DiseasePanel::Shown(list) => list
                .iter()
                .map(|d| {
                    let class = RiskClass::from_label(d.risk_level.as_deref().unwrap_or(""));
                    let mut spans = vec![
                        Span::raw(format!("{} ", class.icon())),
                        Span::raw(d.name.clone()),
                    ];
                    if d.is_emergency {
                        spans.push(Span::styled(
                            "  🚨",
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        ));
                    }
                    Line::from(spans)
                })
                .collect(),
        }
    }
}

impl Component for DiseaseList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if matches!(self.panel, DiseasePanel::Hidden) {
            return;
        }
        let count = match self.panel {
            DiseasePanel::Shown(list) => format!(" Known conditions ({}) ", list.len()),
            _ => " Known conditions ".to_string(),
        };

        let [column] = Layout::horizontal([Constraint::Percentage(60)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::vertical([Constraint::Percentage(80)])
            .flex(Flex::Center)
            .areas(column);

        let paragraph = Paragraph::new(self.lines())
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(count)
                    .title_bottom(Line::from(" Ctrl+D / Esc close ").right_aligned()),
            );
        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }
}
