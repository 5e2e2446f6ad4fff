//! # Results Component
//!
//! Draws a `ResultView` as one scrollable column: emergency banner, the four
//! summary cards, symptom tags, ranked predictions with bars, precautions,
//! and the narrative.
//!
//! Bars fill according to `render::reveal`, driven by `elapsed` (time since
//! the results screen appeared). The event loop keeps redrawing until the
//! reveal settles.

use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::render::reveal::{CONFIDENCE_REVEAL, PREDICTION_REVEAL, Reveal};
use crate::render::view::{ResultView, RiskClass, SymptomTags};
use crate::tui::component::Component;
use crate::tui::markdown;

const LABEL_WIDTH: usize = 14;
const NAME_WIDTH: usize = 24;

pub struct ResultsPanel<'a> {
    pub view: &'a ResultView,
    pub elapsed: Duration,
    pub state: &'a mut ScrollViewState,
}

impl<'a> ResultsPanel<'a> {
    pub fn new(view: &'a ResultView, elapsed: Duration, state: &'a mut ScrollViewState) -> Self {
        Self {
            view,
            elapsed,
            state,
        }
    }
}

/// Whether any bar is still filling.
pub fn is_animating(elapsed: Duration) -> bool {
    !CONFIDENCE_REVEAL.is_settled(elapsed) || !PREDICTION_REVEAL.is_settled(elapsed)
}

impl Component for ResultsPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        // Leave a column for the scrollbar
        let content_width = area.width.saturating_sub(1);
        let lines = build_lines(self.view, self.elapsed, content_width);

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        let height = paragraph.line_count(content_width) as u16;

        let mut scroll_view = ScrollView::new(Size::new(content_width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(paragraph, Rect::new(0, 0, content_width, height));
        frame.render_stateful_widget(scroll_view, area, self.state);
    }
}

fn risk_color(class: RiskClass) -> Color {
    match class {
        RiskClass::Low => Color::Green,
        RiskClass::Medium => Color::Yellow,
        RiskClass::High => Color::Rgb(230, 126, 34),
        RiskClass::Critical => Color::Red,
        RiskClass::Unknown => Color::Gray,
    }
}

fn heading(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn card(label: &str, value: Vec<Span<'static>>) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{:<LABEL_WIDTH$}", label),
        Style::default().fg(Color::DarkGray),
    )];
    spans.extend(value);
    Line::from(spans)
}

fn bar(reveal: Reveal, elapsed: Duration, percent: u32, width: u16, color: Color) -> Vec<Span<'static>> {
    let filled = reveal.cells(elapsed, percent, width);
    vec![
        Span::styled("█".repeat(usize::from(filled)), Style::default().fg(color)),
        Span::styled(
            "░".repeat(usize::from(width.saturating_sub(filled))),
            Style::default().fg(Color::DarkGray),
        ),
    ]
}

fn build_lines(view: &ResultView, elapsed: Duration, width: u16) -> Vec<Line<'static>> {
    let bar_width = width.saturating_sub((LABEL_WIDTH + NAME_WIDTH + 8) as u16).clamp(10, 40);
    let mut lines = Vec::new();

    if view.emergency_banner {
        lines.push(Line::from(Span::styled(
            " 🚨 EMERGENCY: these symptoms may need immediate medical attention. Call emergency services. ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::default());
    }

    let risk_style = Style::default()
        .fg(risk_color(view.risk.class))
        .add_modifier(Modifier::BOLD);
    lines.push(card(
        "Risk Level",
        vec![Span::styled(
            format!("{} {}", view.risk.class.icon(), view.risk.label),
            risk_style,
        )],
    ));
    lines.push(card(
        "Condition",
        vec![
            Span::styled(
                view.disease.name.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", view.disease.severity),
                Style::default().fg(Color::DarkGray),
            ),
        ],
    ));
    let mut confidence = bar(CONFIDENCE_REVEAL, elapsed, view.confidence.percent, bar_width, Color::Cyan);
    confidence.push(Span::raw(format!(" {}", view.confidence.text)));
    lines.push(card("Confidence", confidence));
    let status_style = if view.status.emergency {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    lines.push(card(
        "Status",
        vec![
            Span::styled(view.status.title, status_style),
            Span::styled(
                format!("  {}", view.status.subtitle),
                Style::default().fg(Color::DarkGray),
            ),
        ],
    ));

    lines.push(Line::default());
    lines.push(heading("Detected Symptoms"));
    match &view.symptoms {
        SymptomTags::Tags(tags) => {
            let mut spans = Vec::new();
            for tag in tags {
                spans.push(Span::styled(
                    format!(" {tag} "),
                    Style::default().fg(Color::Black).bg(Color::Cyan),
                ));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }
        SymptomTags::Placeholder(text) => lines.push(Line::from(Span::styled(
            *text,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))),
    }

    if !view.predictions.is_empty() {
        lines.push(Line::default());
        lines.push(heading("Top Predictions"));
        for row in &view.predictions {
            let mut spans = vec![
                Span::styled(format!("#{:<3}", row.rank), Style::default().fg(Color::DarkGray)),
                Span::raw(format!("{:<NAME_WIDTH$}", truncate(&row.disease, NAME_WIDTH - 1))),
            ];
            let color = if row.rank == 1 { Color::Cyan } else { Color::Blue };
            spans.extend(bar(PREDICTION_REVEAL, elapsed, row.percent, bar_width, color));
            spans.push(Span::raw(format!(" {}%", row.percent)));
            lines.push(Line::from(spans));
        }
    }

    if !view.precautions.is_empty() {
        lines.push(Line::default());
        lines.push(heading("Precautions"));
        for (i, p) in view.precautions.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{}. ", i + 1),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::raw(p.clone()),
            ]));
        }
    }

    if let Some(narrative) = &view.narrative {
        lines.push(Line::default());
        lines.push(heading("Detailed Analysis"));
        lines.extend(markdown::render(narrative, Color::White).lines);
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Informational only, not a medical diagnosis.  r / Enter: new analysis  ·  Ctrl+E: export report",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
