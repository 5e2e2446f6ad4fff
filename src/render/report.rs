//! # Report Export
//!
//! Writes the results view as a standalone HTML document to
//! `~/.triage/reports/triage-<timestamp>-<result id>.html`.
//!
//! Every piece of text that came from the user or the service is escaped.
//! The narrative goes through `markup::to_html`, which escapes before it
//! substitutes.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::info;

use crate::core::config::triage_dir;
use crate::render::markup::escape_html;
use crate::render::view::{ResultView, SymptomTags};

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;max-width:820px;margin:2rem auto;padding:0 1rem;color:#1f2933}\
.banner{background:#c0392b;color:#fff;padding:.75rem 1rem;border-radius:6px;font-weight:600}\
.cards{display:grid;grid-template-columns:repeat(4,1fr);gap:.75rem;margin:1rem 0}\
.card{border:1px solid #d9e2ec;border-radius:6px;padding:.75rem}\
.card h4{margin:0 0 .25rem;font-size:.8rem;text-transform:uppercase;color:#627d98}\
.risk-low{border-color:#27ae60}.risk-medium{border-color:#f1c40f}\
.risk-high{border-color:#e67e22}.risk-critical{border-color:#c0392b}.risk-unknown{border-color:#95a5a6}\
.bar{background:#e4e7eb;border-radius:3px;height:8px}.fill{background:#3d7be0;border-radius:3px;height:8px}\
.tag{display:inline-block;background:#e4e7eb;border-radius:12px;padding:2px 10px;margin:2px}\
.num-line{margin:4px 0;padding-left:8px}";

impl ResultView {
    /// Render the whole view, stamped with the current local time.
    pub fn to_html_report(&self, prompt: &str) -> String {
        render_report(self, prompt, Local::now())
    }
}

pub fn render_report(view: &ResultView, prompt: &str, generated_at: DateTime<Local>) -> String {
    let mut html = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut html, view, prompt, generated_at);
    html
}

fn write_report(
    out: &mut String,
    view: &ResultView,
    prompt: &str,
    generated_at: DateTime<Local>,
) -> std::fmt::Result {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\"><head><meta charset=\"utf-8\">")?;
    writeln!(out, "<title>Triage report</title><style>{STYLE}</style></head><body>")?;
    writeln!(out, "<h1>Symptom analysis</h1>")?;
    writeln!(
        out,
        "<p><small>Generated {}</small></p>",
        escape_html(&generated_at.format("%Y-%m-%d %H:%M:%S %Z").to_string())
    )?;
    writeln!(out, "<blockquote>{}</blockquote>", escape_html(prompt))?;

    if view.emergency_banner {
        writeln!(
            out,
            "<div class=\"banner\">🚨 Emergency indicators detected. Seek immediate medical help.</div>"
        )?;
    }

    writeln!(out, "<div class=\"cards\">")?;
    writeln!(
        out,
        "<div class=\"card {}\"><h4>Risk level</h4>{} {}</div>",
        view.risk.class.css_class(),
        view.risk.class.icon(),
        escape_html(&view.risk.label)
    )?;
    writeln!(
        out,
        "<div class=\"card\"><h4>Predicted condition</h4><strong>{}</strong><br><small>{}</small></div>",
        escape_html(&view.disease.name),
        escape_html(&view.disease.severity)
    )?;
    writeln!(
        out,
        "<div class=\"card\"><h4>Confidence</h4>{}<div class=\"bar\"><div class=\"fill\" style=\"width:{}%\"></div></div></div>",
        escape_html(&view.confidence.text),
        view.confidence.percent.min(100)
    )?;
    writeln!(
        out,
        "<div class=\"card\"><h4>Status</h4><strong>{}</strong><br><small>{}</small></div>",
        view.status.title, view.status.subtitle
    )?;
    writeln!(out, "</div>")?;

    writeln!(out, "<h3>Detected symptoms</h3><p>")?;
    match &view.symptoms {
        SymptomTags::Tags(tags) => {
            for tag in tags {
                writeln!(out, "<span class=\"tag\">{}</span>", escape_html(tag))?;
            }
        }
        SymptomTags::Placeholder(text) => writeln!(out, "<em>{}</em>", escape_html(text))?,
    }
    writeln!(out, "</p>")?;

    if !view.predictions.is_empty() {
        writeln!(out, "<h3>Top predictions</h3><table>")?;
        for row in &view.predictions {
            writeln!(
                out,
                "<tr><td>#{}</td><td>{}</td><td style=\"width:50%\"><div class=\"bar\"><div class=\"fill\" style=\"width:{}%\"></div></div></td><td>{}%</td></tr>",
                row.rank,
                escape_html(&row.disease),
                row.percent.min(100),
                row.percent
            )?;
        }
        writeln!(out, "</table>")?;
    }

    if !view.precautions.is_empty() {
        writeln!(out, "<h3>Precautions</h3><ol>")?;
        for p in &view.precautions {
            writeln!(out, "<li>{}</li>", escape_html(p))?;
        }
        writeln!(out, "</ol>")?;
    }

    if let Some(narrative) = &view.narrative_html {
        writeln!(out, "<h3>Detailed analysis</h3><div class=\"narrative\">{narrative}</div>")?;
    }

    writeln!(
        out,
        "<p><small>This report is informational only and is not a medical diagnosis.</small></p>"
    )?;
    writeln!(out, "</body></html>")
}

/// Returns `~/.triage/reports/`, creating it if needed.
pub fn reports_dir() -> io::Result<PathBuf> {
    let dir = triage_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?
        .join("reports");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Write the report into `~/.triage/reports/` and return its path.
///
/// `result_id` keeps reports of different results apart even when they are
/// exported within the same second.
pub fn export(view: &ResultView, prompt: &str, result_id: &str) -> io::Result<PathBuf> {
    export_to(&reports_dir()?, view, prompt, result_id, Local::now())
}

pub fn export_to(
    dir: &Path,
    view: &ResultView,
    prompt: &str,
    result_id: &str,
    generated_at: DateTime<Local>,
) -> io::Result<PathBuf> {
    let short_id: String = result_id
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(8)
        .collect();
    let path = dir.join(format!(
        "triage-{}-{}.html",
        generated_at.format("%Y%m%d-%H%M%S"),
        short_id
    ));
    atomic_write(&path, &render_report(view, prompt, generated_at))?;
    info!("Report written to {}", path.display());
    Ok(path)
}

/// Write via `.tmp` + rename so a half-written report never appears.
fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisOutcome;
    use crate::test_support::sample_outcome;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_time() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn test_report_contains_every_section() {
        let view = ResultView::project(&sample_outcome().result);
        let html = render_report(&view, "chest pain", fixed_time());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("class=\"banner\""));
        assert!(html.contains("risk-high"));
        assert!(html.contains("Very High (87%)"));
        assert!(html.contains("<span class=\"tag\">chest pain</span>"));
        assert!(html.contains("<td>#1</td><td>Heart attack</td>"));
        assert!(html.contains("<li>Call ambulance</li>"));
        assert!(html.contains("<h2>Analysis Report</h2>"));
    }

    #[test]
    fn test_report_escapes_interpolated_text() {
        let outcome = AnalysisOutcome::from_value(json!({
            "predicted_disease": "<img src=x onerror=alert(1)>",
            "symptoms_detected": ["<b>"],
            "precautions": ["a & b"]
        }))
        .unwrap();
        let view = ResultView::project(&outcome.result);
        let html = render_report(&view, "<script>", fixed_time());
        assert!(!html.contains("<img"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(html.contains("<li>A &amp; b</li>"));
    }

    #[test]
    fn test_sparse_report_shows_placeholder_only() {
        let view = ResultView::project(&AnalysisOutcome::from_value(json!({})).unwrap().result);
        let html = render_report(&view, "x", fixed_time());
        assert!(html.contains("No specific symptoms matched"));
        assert!(!html.contains("class=\"tag\""));
        assert!(!html.contains("Top predictions"));
        assert!(!html.contains("class=\"banner\""));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let view = ResultView::project(&sample_outcome().result);

        let path = export_to(dir.path(), &view, "chest pain", "3f2a9c1e-77b0", fixed_time()).unwrap();
        assert_eq!(path.file_name().unwrap(), "triage-20240501-093000-3f2a9c1e.html");
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("Heart attack"));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_exports_in_the_same_second_keep_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = ResultView::project(&sample_outcome().result);
        let second = ResultView::project(
            &AnalysisOutcome::from_value(json!({"predicted_disease": "Migraine"}))
                .unwrap()
                .result,
        );

        let a = export_to(dir.path(), &first, "chest pain", "aaaa1111-0000", fixed_time()).unwrap();
        let b = export_to(dir.path(), &second, "headache", "bbbb2222-0000", fixed_time()).unwrap();

        assert_ne!(a, b);
        assert!(fs::read_to_string(&a).unwrap().contains("Heart attack"));
        assert!(fs::read_to_string(&b).unwrap().contains("Migraine"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }
}
