//! GeminiGateway - Direct REST API implementation of the generation gateway.
//!
//! Calls the Gemini `generateContent` endpoint for both image and text
//! generation. The API key is resolved through a [`SecretService`] on every
//! call, so a missing credential surfaces before any request is sent.

use std::sync::Arc;

use async_trait::async_trait;
use posemaster_core::error::{PoseMasterError, Result};
use posemaster_core::generation::GenerationGateway;
use posemaster_core::image_ref::EmbeddedImage;
use posemaster_core::secret::SecretService;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_IMAGE_MEDIA_TYPE: &str = "image/png";

/// Gateway implementation that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiGateway {
    client: Client,
    secrets: Arc<dyn SecretService>,
    image_model: String,
    text_model: String,
    base_url: String,
}

impl GeminiGateway {
    /// Creates a gateway using the default models.
    pub fn new(secrets: Arc<dyn SecretService>) -> Self {
        Self {
            client: Client::new(),
            secrets,
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Overrides the image model after construction.
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    /// Overrides the text model after construction.
    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    /// Points the gateway at a different API root (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn send_request(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let api_key = self.secrets.gemini_api_key().await?;
        let url = format!("{}/{model}:generateContent", self.base_url);

        tracing::debug!(model, "Sending Gemini generateContent request");

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                PoseMasterError::upstream(None, format!("Gemini API request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        response.json().await.map_err(|err| {
            PoseMasterError::upstream(None, format!("Failed to parse Gemini response: {err}"))
        })
    }
}

#[async_trait]
impl GenerationGateway for GeminiGateway {
    async fn preflight(&self) -> Result<()> {
        self.secrets.gemini_api_key().await.map(|_| ())
    }

    async fn generate_image(
        &self,
        prompt: &str,
        reference: Option<&EmbeddedImage>,
    ) -> Result<EmbeddedImage> {
        let mut parts = Vec::with_capacity(2);
        if let Some(image) = reference {
            parts.push(Part::InlineData {
                inline_data: InlineDataPayload {
                    mime_type: image.media_type().to_string(),
                    data: image.base64_data(),
                },
            });
        }
        parts.push(Part::Text {
            text: prompt.to_string(),
        });

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["IMAGE".to_string(), "TEXT".to_string()],
            }),
        };

        let response = self.send_request(&self.image_model, &request).await?;
        extract_image_response(response)
    }

    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part::Text {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: None,
        };

        let response = self.send_request(&self.text_model, &request).await?;
        extract_text_response(response)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartResponse {
    text: Option<String>,
    inline_data: Option<InlineDataResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataResponse {
    mime_type: Option<String>,
    data: String,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn first_candidate_parts(response: GenerateContentResponse) -> Vec<PartResponse> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .unwrap_or_default()
}

fn extract_image_response(response: GenerateContentResponse) -> Result<EmbeddedImage> {
    let inline = first_candidate_parts(response)
        .into_iter()
        .find_map(|part| part.inline_data)
        .ok_or(PoseMasterError::NoImageProduced)?;

    let media_type = inline
        .mime_type
        .filter(|mime| !mime.is_empty())
        .unwrap_or_else(|| DEFAULT_IMAGE_MEDIA_TYPE.to_string());

    EmbeddedImage::from_base64(media_type, &inline.data).map_err(|err| {
        PoseMasterError::upstream(None, format!("Gemini returned an unreadable image: {err}"))
    })
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    let text = first_candidate_parts(response)
        .into_iter()
        .filter_map(|part| part.text)
        .collect::<Vec<_>>()
        .join("");

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PoseMasterError::NoTextProduced);
    }
    Ok(trimmed.to_string())
}

fn map_http_error(status: StatusCode, body: String) -> PoseMasterError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    PoseMasterError::upstream(Some(status.as_u16()), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_extracts_first_inline_image() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"Here is your image"},
                {"inlineData":{"mimeType":"image/png","data":"AQID"}}
            ]}}]}"#,
        );
        let image = extract_image_response(response).unwrap();
        assert_eq!(image.media_type(), "image/png");
        assert_eq!(image.bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_image_defaults_media_type() {
        let response = parse(r#"{"candidates":[{"content":{"parts":[{"inlineData":{"data":"AQID"}}]}}]}"#);
        let image = extract_image_response(response).unwrap();
        assert_eq!(image.media_type(), "image/png");
    }

    #[test]
    fn test_text_only_response_has_no_image() {
        let response = parse(r#"{"candidates":[{"content":{"parts":[{"text":"I cannot draw that"}]}}]}"#);
        assert_eq!(
            extract_image_response(response).unwrap_err(),
            PoseMasterError::NoImageProduced
        );

        let empty = parse(r#"{"candidates":[]}"#);
        assert_eq!(
            extract_image_response(empty).unwrap_err(),
            PoseMasterError::NoImageProduced
        );
    }

    #[test]
    fn test_extracts_and_joins_text_parts() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"站位：左侧 "},{"text":"光线：侧逆光"}]}}]}"#,
        );
        assert_eq!(extract_text_response(response).unwrap(), "站位：左侧 光线：侧逆光");
    }

    #[test]
    fn test_blank_text_is_not_a_success() {
        let response = parse(r#"{"candidates":[{"content":{"parts":[{"text":"   "}]}}]}"#);
        assert_eq!(
            extract_text_response(response).unwrap_err(),
            PoseMasterError::NoTextProduced
        );

        let no_content = parse(r#"{"candidates":[{}]}"#);
        assert_eq!(
            extract_text_response(no_content).unwrap_err(),
            PoseMasterError::NoTextProduced
        );
    }

    #[test]
    fn test_map_http_error_uses_gemini_error_body() {
        let err = map_http_error(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#
                .to_string(),
        );
        assert_eq!(
            err,
            PoseMasterError::upstream(Some(429), "RESOURCE_EXHAUSTED: Quota exceeded")
        );

        let raw = map_http_error(StatusCode::BAD_GATEWAY, "upstream down".to_string());
        assert_eq!(raw, PoseMasterError::upstream(Some(502), "upstream down"));
    }

    #[test]
    fn test_image_request_serializes_reference_before_prompt() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineDataPayload {
                            mime_type: "image/jpeg".to_string(),
                            data: "AQID".to_string(),
                        },
                    },
                    Part::Text {
                        text: "prompt".to_string(),
                    },
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
            }),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(json["contents"][0]["parts"][1]["text"], "prompt");
        assert_eq!(json["generationConfig"]["responseModalities"][0], "IMAGE");
    }
}
