//! Projection of an `AnalysisResult` into the layered results view.
//!
//! Everything here is pure: the same result always yields the same view,
//! and a sparse payload degrades to placeholders instead of failing.

use crate::analysis::AnalysisResult;
use crate::render::markup;

pub const UNKNOWN: &str = "Unknown";
pub const NO_SYMPTOMS_PLACEHOLDER: &str =
    "No specific symptoms matched in our database. Please try more medical terms.";
const DASH: &str = "—";

/// Visual class of the risk card, derived from the free-form label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskClass {
    Low,
    Medium,
    High,
    Critical,
    Unknown,
}

impl RiskClass {
    /// Case-insensitive match over the four known levels.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "low" => RiskClass::Low,
            "medium" => RiskClass::Medium,
            "high" => RiskClass::High,
            "critical" => RiskClass::Critical,
            _ => RiskClass::Unknown,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            RiskClass::Low => "🟢",
            RiskClass::Medium => "🟡",
            RiskClass::High => "🟠",
            RiskClass::Critical => "🔴",
            RiskClass::Unknown => "⚪",
        }
    }

    /// Class name used in the HTML report.
    pub fn css_class(self) -> &'static str {
        match self {
            RiskClass::Low => "risk-low",
            RiskClass::Medium => "risk-medium",
            RiskClass::High => "risk-high",
            RiskClass::Critical => "risk-critical",
            RiskClass::Unknown => "risk-unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskCard {
    pub label: String,
    pub class: RiskClass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseCard {
    pub name: String,
    /// `Severity Score: {n} / 7`
    pub severity: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceCard {
    /// 0–100, rounded.
    pub percent: u32,
    /// `{label} ({percent}%)`
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusCard {
    pub emergency: bool,
    pub title: &'static str,
    pub subtitle: &'static str,
}

impl StatusCard {
    fn new(emergency: bool) -> Self {
        if emergency {
            Self {
                emergency,
                title: "🚨 EMERGENCY",
                subtitle: "Seek immediate help",
            }
        } else {
            Self {
                emergency,
                title: "✅ Non-Emergency",
                subtitle: "Monitor symptoms",
            }
        }
    }
}

/// Either the detected symptoms or the single placeholder, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum SymptomTags {
    Tags(Vec<String>),
    Placeholder(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRow {
    /// 1-based, in the order the service ranked them.
    pub rank: usize,
    pub disease: String,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub emergency_banner: bool,
    pub risk: RiskCard,
    pub disease: DiseaseCard,
    pub confidence: ConfidenceCard,
    pub status: StatusCard,
    pub symptoms: SymptomTags,
    pub predictions: Vec<PredictionRow>,
    /// First letter upper-cased; numbered on display.
    pub precautions: Vec<String>,
    /// Narrative markup as received.
    pub narrative: Option<String>,
    pub narrative_html: Option<String>,
}

impl ResultView {
    pub fn project(result: &AnalysisResult) -> Self {
        let risk_label = result
            .risk_level
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());
        let risk = RiskCard {
            class: RiskClass::from_label(&risk_label),
            label: risk_label,
        };

        let disease = DiseaseCard {
            name: result
                .predicted_disease
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            severity: format!("Severity Score: {} / 7", severity_text(result.severity_score)),
        };

        let percent = result.confidence.map(to_percent).unwrap_or(0);
        let label = result
            .confidence_label
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(DASH);
        let confidence = ConfidenceCard {
            percent,
            text: format!("{label} ({percent}%)"),
        };

        let symptoms = if result.symptoms_detected.is_empty() {
            SymptomTags::Placeholder(NO_SYMPTOMS_PLACEHOLDER)
        } else {
            SymptomTags::Tags(
                result
                    .symptoms_detected
                    .iter()
                    .map(|s| s.replace('_', " "))
                    .collect(),
            )
        };

        let predictions = result
            .top_predictions
            .iter()
            .enumerate()
            .map(|(i, p)| PredictionRow {
                rank: i + 1,
                disease: if p.disease.is_empty() {
                    UNKNOWN.to_string()
                } else {
                    p.disease.clone()
                },
                percent: to_percent(p.probability),
            })
            .collect();

        let narrative = result.detailed_analysis.clone().filter(|n| !n.is_empty());
        let narrative_html = narrative.as_deref().map(markup::to_html);

        Self {
            emergency_banner: result.is_emergency,
            risk,
            disease,
            confidence,
            status: StatusCard::new(result.is_emergency),
            symptoms,
            predictions,
            precautions: result.precautions.iter().map(|p| capitalize(p)).collect(),
            narrative,
            narrative_html,
        }
    }
}

/// Fraction in 0.0–1.0 to a rounded percentage. Out-of-range and NaN
/// values saturate.
pub fn to_percent(fraction: f64) -> u32 {
    let pct = (fraction * 100.0).round();
    if pct.is_nan() || pct <= 0.0 {
        0
    } else {
        pct as u32
    }
}

/// Zero or missing scores render as a dash.
fn severity_text(score: Option<f64>) -> String {
    match score {
        Some(s) if s != 0.0 && !s.is_nan() => s.to_string(),
        _ => DASH.to_string(),
    }
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
