//! Chat-completions wire types for a single-image vision request.

use serde::{Deserialize, Serialize};

/// Fixed output budget for one analysis.
pub const MAX_OUTPUT_TOKENS: u32 = 2000;
/// Low sampling temperature for reproducible analyses.
pub const TEMPERATURE: f32 = 0.3;

/// How closely the model should inspect the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageDetail {
    Low,
    High,
    Auto,
}

/// Provider-neutral description of one vision call.
#[derive(Debug, Clone, PartialEq)]
pub struct VisionRequest {
    pub system: String,
    pub prompt: String,
    /// `data:<mime>;base64,<payload>`
    pub image_data_url: String,
    pub detail: ImageDetail,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl VisionRequest {
    /// Request with the fixed analysis parameters (high detail, 2000 tokens, 0.3).
    pub fn analysis(system: &str, prompt: &str, image_data_url: String) -> Self {
        Self {
            system: system.to_string(),
            prompt: prompt.to_string(),
            image_data_url,
            detail: ImageDetail::High,
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

// ──────────────────────────────────────────────
// Request body
// ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: MessageContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl<'a> {
    pub url: &'a str,
    pub detail: ImageDetail,
}

impl<'a> ChatCompletionRequest<'a> {
    /// System text, then a user message with the instruction and the image.
    pub fn from_vision(request: &'a VisionRequest) -> Self {
        Self {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(&request.system),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Parts(vec![
                        ContentPart::Text {
                            text: &request.prompt,
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: &request.image_data_url,
                                detail: request.detail,
                            },
                        },
                    ]),
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

// ──────────────────────────────────────────────
// Response body
// ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if any.
    pub fn into_content(self) -> Option<String> {
        self.choices.into_iter().next()?.message.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn analysis_request_uses_fixed_parameters() {
        let req = VisionRequest::analysis("sys", "prompt", "data:image/png;base64,AA".into());
        assert_eq!(req.detail, ImageDetail::High);
        assert_eq!(req.max_tokens, 2000);
        assert!((req.temperature - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn chat_request_serializes_multipart_message() {
        let req = VisionRequest::analysis("sys", "look", "data:image/png;base64,AA".into());
        let body = serde_json::to_value(ChatCompletionRequest::from_vision(&req)).unwrap();

        assert_eq!(body["messages"][0], json!({"role": "system", "content": "sys"}));
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(
            body["messages"][1]["content"][0],
            json!({"type": "text", "text": "look"})
        );
        assert_eq!(
            body["messages"][1]["content"][1],
            json!({
                "type": "image_url",
                "image_url": {"url": "data:image/png;base64,AA", "detail": "high"}
            })
        );
        assert_eq!(body["max_tokens"], 2000);
        let temperature = body["temperature"].as_f64().unwrap();
        assert!((temperature - 0.3).abs() < 1e-6);
    }

    #[test]
    fn response_content_extracted() {
        let raw = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"{\"a\":1}"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_content().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn response_without_choices_or_content() {
        let parsed: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(parsed.into_content().is_none());
        let parsed: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(parsed.into_content().is_none());
    }
}
