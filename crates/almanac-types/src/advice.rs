//! Outfit advice request/response types

use serde::{Deserialize, Serialize};

/// Returned when the model answers without any usable text
pub const NO_ADVICE: &str = "No advice available.";

/// Weather observation sent by the client
///
/// Missing keys take their zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviceRequest {
    pub weather_code: i64,
    pub temperature: f64,
    pub description: String,
    /// `"ja"` for Japanese; anything else means English
    pub language: String,
}

impl AdviceRequest {
    pub fn is_japanese(&self) -> bool {
        self.language == "ja"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceResponse {
    pub advice: String,
}

impl AdviceResponse {
    pub fn new(advice: impl Into<String>) -> Self {
        Self {
            advice: advice.into(),
        }
    }

    pub fn fallback() -> Self {
        Self::new(NO_ADVICE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let req: AdviceRequest = serde_json::from_str(r#"{"temperature": 21.5}"#).unwrap();
        assert_eq!(req.temperature, 21.5);
        assert_eq!(req.weather_code, 0);
        assert_eq!(req.language, "");
        assert!(!req.is_japanese());
    }

    #[test]
    fn test_language_tag() {
        let req: AdviceRequest = serde_json::from_str(r#"{"language":"ja"}"#).unwrap();
        assert!(req.is_japanese());
    }
}
