use serde::{Deserialize, Deserializer, Serialize};

/// A single symptom description, ready to be sent to the analysis service.
///
/// Only produced by [`crate::core::input::submit`], so the prompt is always
/// trimmed and non-empty.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub prompt: String,
}

/// One ranked candidate condition.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Prediction {
    #[serde(default, deserialize_with = "null_as_default")]
    pub disease: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub probability: f64,
}

/// The analysis service's response.
///
/// Every field is optional on the wire. Explicit `null`s are treated the same
/// as absent fields so a sparse payload never fails to parse.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AnalysisResult {
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_emergency: bool,
    #[serde(default)]
    pub predicted_disease: Option<String>,
    #[serde(default)]
    pub severity_score: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub confidence_label: Option<String>,
    #[serde(default, deserialize_with = "present_strings")]
    pub symptoms_detected: Vec<String>,
    /// Already ranked by the service, highest probability first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_predictions: Vec<Prediction>,
    #[serde(default, deserialize_with = "present_strings")]
    pub precautions: Vec<String>,
    #[serde(default)]
    pub detailed_analysis: Option<String>,
}

/// A parsed result together with the exact JSON body it came from.
///
/// The raw body is what gets persisted as `full_result`, so fields this
/// client doesn't model survive the round trip to the history store.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub raw: serde_json::Value,
}

impl AnalysisOutcome {
    /// Parse a response body. Anything but a JSON object is rejected.
    pub fn from_value(raw: serde_json::Value) -> Result<Self, serde_json::Error> {
        if !raw.is_object() {
            return Err(serde::de::Error::custom("expected a JSON object"));
        }
        let result = AnalysisResult::deserialize(&raw)?;
        Ok(Self { result, raw })
    }
}

/// `GET /health` response.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub version: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// One entry of the `GET /diseases` catalogue.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DiseaseEntry {
    pub name: String,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_emergency: bool,
}

#[derive(Deserialize, Debug)]
pub(crate) struct DiseaseCatalogue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub diseases: Vec<DiseaseEntry>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A string list whose `null` entries are dropped.
fn present_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(items.unwrap_or_default().into_iter().flatten().collect())
}
