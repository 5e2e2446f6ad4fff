//! # InputBox Component
//!
//! Bordered, wrapping text field for the symptom description.
//!
//! The buffer itself lives in core (`InputState`); this component only
//! draws it. Edits always happen at the end of the buffer, so the cursor is
//! drawn after the last character and the view follows the tail once the
//! text outgrows `MAX_VISIBLE_LINES`.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::input::Edit;
use crate::tui::component::Component;
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before the view follows the tail
pub const MAX_VISIBLE_LINES: u16 = 6;
const MIN_VISIBLE_LINES: u16 = 3;

const PLACEHOLDER: &str =
    "Describe how you feel, e.g. \"I have had a fever and a dry cough for three days\"";

/// Translate a key event into a buffer edit, if it is one.
pub fn edit_for(event: &TuiEvent) -> Option<Edit> {
    match event {
        TuiEvent::InputChar(c) => Some(Edit::Insert(*c)),
        TuiEvent::Paste(text) => Some(Edit::Paste(text.clone())),
        TuiEvent::Backspace => Some(Edit::Backspace),
        _ => None,
    }
}

/// Symptom input field.
///
/// # Props
///
/// - `text`: current buffer (from `App.input`)
/// - `char_count`: live character count shown in the title
/// - `flagged`: highlight after an empty submission
pub struct InputBox<'a> {
    pub text: &'a str,
    pub char_count: usize,
    pub flagged: bool,
}

impl<'a> InputBox<'a> {
    pub fn new(text: &'a str, char_count: usize, flagged: bool) -> Self {
        Self {
            text,
            char_count,
            flagged,
        }
    }

    /// Required height for the current buffer, clamped to the visible range.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let lines = wrap_lines(self.text, inner_width(area_width)).len() as u16;
        lines.clamp(MIN_VISIBLE_LINES, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }
}

impl Component for InputBox<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.flagged {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let title = format!(" Describe your symptoms ({} chars) ", self.char_count);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .padding(Padding::horizontal(1));

        let inner = block.inner(area);
        let visible_rows = usize::from(inner.height.max(1));

        if self.text.is_empty() {
            let placeholder = Paragraph::new(Span::styled(
                PLACEHOLDER,
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ))
            .block(block)
            .wrap(ratatui::widgets::Wrap { trim: true });
            frame.render_widget(placeholder, area);
            frame.set_cursor_position((inner.x, inner.y));
            return;
        }

        let lines = wrap_lines(self.text, inner.width);
        let start = lines.len().saturating_sub(visible_rows);
        let visible: Vec<Line> = lines[start..]
            .iter()
            .map(|l| Line::from(l.clone()))
            .collect();

        let last = lines.last().map(String::as_str).unwrap_or("");
        let cursor_row = (lines.len() - start - 1) as u16;
        let cursor_col = (last.width() as u16).min(inner.width.saturating_sub(1));

        let paragraph = Paragraph::new(visible)
            .block(block)
            .style(Style::default().fg(Color::White));
        frame.render_widget(paragraph, area);
        frame.set_cursor_position((inner.x + cursor_col, inner.y + cursor_row));
    }
}

fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Wrap `text` to `width` columns, keeping explicit newlines and a trailing
/// empty line when the text ends with one (so the cursor lands below it).
fn wrap_lines(text: &str, width: u16) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    let options = textwrap::Options::new(usize::from(width))
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);

    let mut out = Vec::new();
    for line in text.split('\n') {
        if line.is_empty() {
            out.push(String::new());
            continue;
        }
        out.extend(textwrap::wrap(line, &options).into_iter().map(|c| c.into_owned()));
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}
