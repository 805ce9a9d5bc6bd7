use serde::{Deserialize, Serialize};

/// user attributes collected by the app's onboarding survey. a value of `0`
/// means the user skipped the question.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SurveyResponse {
    /// age bracket code, 1 (under 18) through 6 (65 and over)
    pub age: u8,
    /// gender code, 1 is male
    pub gender: u8,
    /// cycling comfort level code
    pub cycling_level: u8,
}

impl SurveyResponse {
    pub fn new(age: &str, gender: &str, cycling_level: &str) -> SurveyResponse {
        SurveyResponse {
            age: Self::parse_code(age),
            gender: Self::parse_code(gender),
            cycling_level: Self::parse_code(cycling_level),
        }
    }

    /// true when every survey question has an answer.
    pub fn is_complete(&self) -> bool {
        self.age != 0 && self.gender != 0 && self.cycling_level != 0
    }

    /// reads a survey code. blank or unreadable cells are coded as unanswered.
    pub fn parse_code(value: &str) -> u8 {
        let trimmed = value.trim();
        trimmed
            .parse::<u8>()
            .ok()
            .or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0 && *f <= u8::MAX as f64)
                    .map(|f| f as u8)
            })
            .unwrap_or_default()
    }
}
