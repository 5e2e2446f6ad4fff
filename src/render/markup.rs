//! Narrative markup → HTML.
//!
//! The service writes its narrative in a small markdown-like dialect. The
//! text is HTML-escaped first, then the substitutions below run in order on
//! the escaped copy. Order matters: `### ` must not be caught by the `## `
//! rule, and line breaks are converted last so the line-anchored rules
//! still see lines.

use std::sync::LazyLock;

use regex::Regex;

static H2: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^## (.+)$"));
static H3: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^### (.+)$"));
static BOLD: LazyLock<Regex> = LazyLock::new(|| compile(r"\*\*(.+?)\*\*"));
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^(\d+\.) (.+)$"));
static RULE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?m)^---$"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid regex")
}

/// Escape the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn to_html(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let html = escape_html(&text.replace("\r\n", "\n"));
    let html = H2.replace_all(&html, "<h2>$1</h2>");
    let html = H3.replace_all(&html, "<h3>$1</h3>");
    let html = BOLD.replace_all(&html, "<strong>$1</strong>");
    let html = NUMBERED.replace_all(&html, r#"<div class="num-line"><strong>$1</strong> $2</div>"#);
    let html = RULE.replace_all(&html, "<hr>");
    html.replace('\n', "<br>")
}
