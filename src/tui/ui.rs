use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::core::input::Sample;
use crate::core::state::{App, UiState};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    DiseaseList, ErrorPanel, InputBox, LoadingView, ResultsPanel, TitleBar,
};

/// Key hints for the screen that is showing.
pub fn hints_for(ui: &UiState) -> &'static str {
    match ui {
        UiState::Idle => "Enter analyze · F1-F4 examples · Ctrl+D conditions · Ctrl+C quit",
        UiState::Loading { .. } => "Ctrl+C quit",
        UiState::Results(_) => "↑↓ scroll · r new · Ctrl+E export · Ctrl+C quit",
        UiState::Error(_) => "r retry · Ctrl+C quit",
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let [title_area, main_area] = Layout::vertical([Length(1), Min(0)]).areas(frame.area());

    TitleBar::new(&app.status_message, hints_for(&app.ui)).render(frame, title_area);

    match &app.ui {
        UiState::Idle => draw_input_screen(frame, main_area, app),
        UiState::Loading { stage, request } => {
            LoadingView::new(*stage, &request.prompt, spinner_frame).render(frame, main_area)
        }
        UiState::Results(rendered) => {
            let elapsed = tui.results_elapsed();
            ResultsPanel::new(&rendered.view, elapsed, &mut tui.results_scroll)
                .render(frame, main_area)
        }
        UiState::Error(error) => ErrorPanel::new(error).render(frame, main_area),
    }
}

fn draw_input_screen(frame: &mut Frame, area: Rect, app: &App) {
    use Constraint::{Length, Min};

    let mut input = InputBox::new(&app.input.text, app.input.char_count(), app.input.is_flagged());
    let input_height = input.calculate_height(area.width);
    let [intro_area, input_area, samples_area, _] =
        Layout::vertical([Length(3), Length(input_height), Length(2), Min(0)]).areas(area);

    let intro = Paragraph::new(vec![
        Line::default(),
        Line::from(Span::styled(
            "How are you feeling?",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Describe your symptoms in plain language. Ctrl+J starts a new line.",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    frame.render_widget(intro, intro_area);

    input.render(frame, input_area);

    let mut spans = vec![Span::styled("Examples: ", Style::default().fg(Color::DarkGray))];
    for (i, sample) in Sample::ALL.iter().enumerate() {
        spans.push(Span::styled(
            format!("F{} ", i + 1),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!("{}   ", sample.label())));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).wrap(Wrap { trim: true }), samples_area);

    DiseaseList::new(&app.diseases).render(frame, area);
}
