//! Outfit advice proxy for the Gemini `generateContent` API

use almanac_core::{AdviceRequest, AdviceResponse};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("Server configuration error: API Key missing")]
    MissingApiKey,

    #[error("Failed to call AI service")]
    Transport(#[source] reqwest::Error),

    #[error("AI service returned error: {status}")]
    Status { status: u16 },

    #[error("Failed to parse AI response")]
    Decode(#[source] reqwest::Error),
}

// Wire types for generateContent. Missing keys and `null` both decode to
// the empty value, so a sparse response still yields the fallback.
fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Part {
    #[serde(default, deserialize_with = "null_as_default")]
    text: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default, deserialize_with = "null_as_default")]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default, deserialize_with = "null_as_default")]
    content: Content,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content
            .parts
            .into_iter()
            .next()
            .map(|p| p.text)
    }
}

/// Build the one-shot prompt for a weather observation.
pub fn build_prompt(req: &AdviceRequest) -> String {
    if req.is_japanese() {
        format!(
            "天気は{} ({:.1}°C)です。今日の服装を具体的に提案してください。100文字以内で簡潔に答えてください。",
            req.description, req.temperature
        )
    } else {
        format!(
            "The weather is {} ({:.1}°C). Suggest a specific outfit for today. Keep it concise (under 100 characters).",
            req.description, req.temperature
        )
    }
}

/// Show only the first and last four characters of a credential.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() < 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

pub struct AdviceService {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl AdviceService {
    pub fn new(api_key: Option<String>, endpoint: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }

    /// The configured credential, or `MissingApiKey`.
    pub fn api_key(&self) -> Result<&str, AdviceError> {
        match self.api_key.as_deref() {
            Some(key) => Ok(key),
            None => {
                error!("Error: GEMINI_API_KEY is not set");
                Err(AdviceError::MissingApiKey)
            }
        }
    }

    /// Ask the model for an outfit suggestion.
    ///
    /// A successful answer with no candidate text yields the fallback advice
    /// rather than an error.
    pub async fn advise(&self, req: &AdviceRequest) -> Result<AdviceResponse, AdviceError> {
        let api_key = self.api_key()?;
        info!("Using API Key: {}", mask_key(api_key));

        let prompt = build_prompt(req);
        info!("Sending prompt to Gemini: {}", prompt);

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Error calling Gemini API: {}", e);
                AdviceError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Gemini API Error: Status={} Body={}", status.as_u16(), body);
            return Err(AdviceError::Status {
                status: status.as_u16(),
            });
        }

        // A literal `null` body is an empty response
        let decoded: GenerateContentResponse = response
            .json::<Option<GenerateContentResponse>>()
            .await
            .map_err(|e| {
                error!("Error decoding response: {}", e);
                AdviceError::Decode(e)
            })?
            .unwrap_or_default();

        match decoded.first_text() {
            Some(advice) => {
                info!("Received advice: {}", advice);
                Ok(AdviceResponse::new(advice))
            }
            None => {
                warn!("No advice candidates returned");
                Ok(AdviceResponse::fallback())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(language: &str, temperature: f64) -> AdviceRequest {
        AdviceRequest {
            weather_code: 3,
            temperature,
            description: "cloudy".to_string(),
            language: language.to_string(),
        }
    }

    #[test]
    fn test_english_prompt() {
        let prompt = build_prompt(&request("en", 18.0));
        assert_eq!(
            prompt,
            "The weather is cloudy (18.0°C). Suggest a specific outfit for today. Keep it concise (under 100 characters)."
        );
    }

    #[test]
    fn test_japanese_prompt() {
        let prompt = build_prompt(&request("ja", 7.26));
        assert!(prompt.starts_with("天気はcloudy (7.3°C)です。"));
        assert!(prompt.contains("100文字以内"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        assert!(build_prompt(&request("fr", -2.0)).starts_with("The weather is cloudy (-2.0°C)."));
        assert!(build_prompt(&request("", 30.04)).contains("(30.0°C)"));
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("AIzaSyABCDEFGH1234"), "AIza...1234");
        assert_eq!(mask_key("short"), "****");
    }

    #[test]
    fn test_first_text_requires_a_part() {
        let empty: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(empty.first_text(), None);

        let no_parts: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap();
        assert_eq!(no_parts.first_text(), None);

        let ok: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Wear a coat."}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(ok.first_text().as_deref(), Some("Wear a coat."));
    }

    #[test]
    fn test_nulls_decode_as_empty() {
        let null_candidates: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":null}"#).unwrap();
        assert_eq!(null_candidates.first_text(), None);

        let null_text: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":null}]}}]}"#,
        )
        .unwrap();
        assert_eq!(null_text.first_text().as_deref(), Some(""));

        let null_content: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":null}]}"#).unwrap();
        assert_eq!(null_content.first_text(), None);
    }

    #[test]
    fn test_missing_key_is_reported() {
        let service = AdviceService::new(None, "http://127.0.0.1:9".to_string());
        assert!(matches!(service.api_key(), Err(AdviceError::MissingApiKey)));
    }
}
