use axum::body::Bytes;
use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::RelayError;

/// Addressing carried in the request path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelayTarget {
    #[serde(rename = "transcript")]
    pub transcript_id: String,
    #[serde(rename = "agentId")]
    pub agent_id: String,
}

/// A binary blob submitted in the `file` form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub data: Bytes,
    pub content_type: Option<String>,
}

/// Validated inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    pub target: RelayTarget,
    pub user_id: String,
    pub user_name: String,
    pub name: String,
    pub text: Option<String>,
    pub attachment: Option<Attachment>,
}

impl RelayRequest {
    pub fn new(target: RelayTarget) -> Self {
        Self {
            target,
            user_id: String::new(),
            user_name: String::new(),
            name: String::new(),
            text: None,
            attachment: None,
        }
    }

    /// Read the form fields out of a multipart body.
    ///
    /// The first occurrence of a field wins and unknown fields are skipped.
    /// A `file` part only counts as an attachment when it was sent as a file,
    /// i.e. with a filename. If the first `file` part is plain text, nothing
    /// is attached.
    pub async fn from_multipart(
        target: RelayTarget,
        mut multipart: Multipart,
    ) -> Result<Self, RelayError> {
        let mut request = Self::new(target);
        let mut user_id = None;
        let mut user_name = None;
        let mut name = None;
        let mut file_seen = false;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| RelayError::unexpected(e.body_text()))?
        {
            let field_name = field.name().unwrap_or_default().to_string();
            match field_name.as_str() {
                "userId" | "userName" | "name" | "text" => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| RelayError::unexpected(e.body_text()))?;
                    let slot = match field_name.as_str() {
                        "userId" => &mut user_id,
                        "userName" => &mut user_name,
                        "name" => &mut name,
                        _ => &mut request.text,
                    };
                    if slot.is_none() {
                        *slot = Some(value);
                    }
                }
                "file" => {
                    let is_blob = field.file_name().is_some();
                    let content_type = field.content_type().map(str::to_string);
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| RelayError::unexpected(e.body_text()))?;
                    if !file_seen && is_blob {
                        request.attachment = Some(Attachment { data, content_type });
                    }
                    file_seen = true;
                }
                _ => {}
            }
        }

        request.user_id = user_id.unwrap_or_default();
        request.user_name = user_name.unwrap_or_default();
        request.name = name.unwrap_or_default();
        Ok(request)
    }

    /// Whether there is anything to forward.
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// The multipart payload sent to the agent service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub room_id: String,
    pub user_id: String,
    pub user_name: String,
    pub name: String,
    /// Carries the transcript id, not the submitted text. Downstream agents
    /// look the conversation up by it.
    pub text: String,
    pub attachment: Option<Attachment>,
}

impl OutboundMessage {
    pub fn from_request(request: &RelayRequest) -> Self {
        Self {
            room_id: request.user_id.clone(),
            user_id: request.user_id.clone(),
            user_name: request.user_name.clone(),
            name: request.name.clone(),
            text: request.target.transcript_id.clone(),
            attachment: request.attachment.clone(),
        }
    }
}

/// Successful relay outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayResponse {
    /// Nothing was forwarded.
    Empty,
    /// The agent service's JSON body, untouched.
    Agent(Value),
}

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        let body = match self {
            RelayResponse::Empty => json!([]),
            RelayResponse::Agent(value) => value,
        };
        (StatusCode::OK, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> RelayTarget {
        RelayTarget {
            transcript_id: "t1".into(),
            agent_id: "a1".into(),
        }
    }

    #[test]
    fn outbound_swaps_transcript_into_text() {
        let mut request = RelayRequest::new(target());
        request.user_id = "u1".into();
        request.user_name = "Alice".into();
        request.name = "Alice".into();
        request.text = Some("hello".into());

        let outbound = OutboundMessage::from_request(&request);
        assert_eq!(outbound.room_id, "u1");
        assert_eq!(outbound.user_id, "u1");
        assert_eq!(outbound.user_name, "Alice");
        assert_eq!(outbound.name, "Alice");
        assert_eq!(outbound.text, "t1");
        assert!(outbound.attachment.is_none());
    }

    #[test]
    fn empty_text_is_not_forwardable() {
        let mut request = RelayRequest::new(target());
        assert!(!request.has_text());
        request.text = Some(String::new());
        assert!(!request.has_text());
        request.text = Some("hi".into());
        assert!(request.has_text());
    }

    #[tokio::test]
    async fn empty_response_renders_empty_array() {
        let response = RelayResponse::Empty.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 64).await.unwrap();
        assert_eq!(&body[..], b"[]");
    }
}
