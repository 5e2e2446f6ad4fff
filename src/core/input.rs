//! # Input Capture
//!
//! The symptom text the user is typing, the four canned examples, and the
//! validation that turns raw text into an [`AnalysisRequest`].

use std::fmt;
use std::time::Duration;

use crate::analysis::AnalysisRequest;

/// How long an empty submission keeps the input box flagged.
pub const INPUT_FLAG_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyInput,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyInput => write!(f, "please describe your symptoms first"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim `raw` and turn it into a request. Whitespace-only text is rejected.
pub fn submit(raw: &str) -> Result<AnalysisRequest, ValidationError> {
    let prompt = raw.trim();
    if prompt.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    Ok(AnalysisRequest {
        prompt: prompt.to_string(),
    })
}

/// Canned example descriptions, bound to F1–F4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {
    ChestPain,
    Meningitis,
    CommonCold,
    StomachBug,
}

impl Sample {
    pub const ALL: [Sample; 4] = [
        Sample::ChestPain,
        Sample::Meningitis,
        Sample::CommonCold,
        Sample::StomachBug,
    ];

    /// Sample for a zero-based trigger index (F1 = 0).
    pub fn from_index(index: usize) -> Option<Sample> {
        Self::ALL.get(index).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Sample::ChestPain => "Chest pain",
            Sample::Meningitis => "High fever + stiff neck",
            Sample::CommonCold => "Runny nose",
            Sample::StomachBug => "Stomach pain",
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Sample::ChestPain => {
                "I have severe chest pain and shortness of breath. My left arm is numb and I feel very dizzy for the past 2 hours."
            }
            Sample::Meningitis => {
                "I have a very high fever, severe headache, stiff neck and I am sensitive to light. I also feel nauseous."
            }
            Sample::CommonCold => {
                "I have a runny nose, mild cough, and a slight sore throat. I feel a little tired but nothing too serious."
            }
            Sample::StomachBug => {
                "I have stomach pain, nausea and vomiting since yesterday. I also have a mild fever and diarrhoea."
            }
        }
    }
}

/// A single edit to the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Insert(char),
    Paste(String),
    Backspace,
}

/// The input buffer plus its transient "you left this empty" flag.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputState {
    pub text: String,
    /// Token of the active flag; cleared only by the matching `ClearInputFlag`.
    pub flag: Option<u64>,
    next_flag: u64,
}

impl InputState {
    pub fn apply(&mut self, edit: Edit) {
        match edit {
            Edit::Insert(c) => self.text.push(c),
            Edit::Paste(s) => self.text.push_str(&s),
            Edit::Backspace => {
                self.text.pop();
            }
        }
    }

    /// Overwrite the buffer with a canned example.
    pub fn select_sample(&mut self, sample: Sample) {
        self.text = sample.text().to_string();
    }

    /// Character count shown next to the input. Counts chars, not bytes.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_flagged(&self) -> bool {
        self.flag.is_some()
    }

    /// Raise the flag and return its token. A newer flag supersedes an older one.
    pub fn raise_flag(&mut self) -> u64 {
        self.next_flag += 1;
        self.flag = Some(self.next_flag);
        self.next_flag
    }

    /// Clear the flag if `token` is still the active one.
    pub fn clear_flag(&mut self, token: u64) {
        if self.flag == Some(token) {
            self.flag = None;
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.flag = None;
    }
}
