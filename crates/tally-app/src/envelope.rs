// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred!";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    #[error("response body from {status} is not valid JSON: {reason}")]
    InvalidJson { status: u16, reason: String },
    #[error("response body from {status} has an unexpected shape: {reason}")]
    UnexpectedShape { status: u16, reason: String },
}

/// A parsed server reply. The HTTP status picks the variant; the body only fills it in.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    Success(SuccessBody),
    Failure(FailureBody),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SuccessBody {
    pub status_code: u16,
    pub status: Option<String>,
    pub detail: Option<String>,
    pub redirect_url: Option<String>,
    pub data: Option<Map<String, Value>>,
}

impl SuccessBody {
    /// The named value under `data`, ignoring an explicit JSON `null`.
    pub fn result(&self, key: &str) -> Option<&Value> {
        self.data
            .as_ref()
            .and_then(|data| data.get(key))
            .filter(|value| !value.is_null())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FailureBody {
    pub status_code: u16,
    pub status: Option<String>,
    pub detail: Option<String>,
    /// Field name to message. Empty when the server sent no field errors.
    pub errors: BTreeMap<String, String>,
}

impl FailureBody {
    pub fn detail_or_default(&self) -> &str {
        self.detail
            .as_deref()
            .filter(|detail| !detail.trim().is_empty())
            .unwrap_or(DEFAULT_ERROR_MESSAGE)
    }
}

impl ResponseEnvelope {
    pub fn parse(status_code: u16, body: &str) -> Result<Self, EnvelopeError> {
        let trimmed = body.trim();
        let raw: RawEnvelope = if trimmed.is_empty() {
            RawEnvelope::default()
        } else {
            let value: Value =
                serde_json::from_str(trimmed).map_err(|error| EnvelopeError::InvalidJson {
                    status: status_code,
                    reason: error.to_string(),
                })?;
            if !value.is_object() {
                return Err(EnvelopeError::UnexpectedShape {
                    status: status_code,
                    reason: format!("expected a JSON object, got {}", json_kind(&value)),
                });
            }
            serde_json::from_value(value).map_err(|error| EnvelopeError::UnexpectedShape {
                status: status_code,
                reason: error.to_string(),
            })?
        };

        if (200..300).contains(&status_code) {
            Ok(Self::Success(SuccessBody {
                status_code,
                status: raw.status,
                detail: raw.detail,
                redirect_url: raw.redirect_url.filter(|url| !url.trim().is_empty()),
                data: raw.data,
            }))
        } else {
            Ok(Self::Failure(FailureBody {
                status_code,
                status: raw.status,
                detail: raw.detail,
                errors: raw
                    .errors
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(field, messages)| (field, messages.joined()))
                    .collect(),
            }))
        }
    }

    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Success(body) => body.status_code,
            Self::Failure(body) => body.status_code,
        }
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    redirect_url: Option<String>,
    #[serde(default)]
    data: Option<Map<String, Value>>,
    #[serde(default)]
    errors: Option<BTreeMap<String, ErrorMessages>>,
}

/// Django form errors arrive as lists; hand-built ones as plain strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorMessages {
    One(String),
    Many(Vec<String>),
}

impl ErrorMessages {
    fn joined(self) -> String {
        match self {
            Self::One(message) => message,
            Self::Many(messages) => messages.join(" "),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_ERROR_MESSAGE, EnvelopeError, ResponseEnvelope};

    #[test]
    fn success_with_redirect() {
        let envelope = ResponseEnvelope::parse(
            200,
            r#"{"status":"success","detail":"ok","redirect_url":"/stores/5/"}"#,
        )
        .expect("valid envelope");
        let ResponseEnvelope::Success(body) = envelope else {
            panic!("expected success");
        };
        assert_eq!(body.redirect_url.as_deref(), Some("/stores/5/"));
        assert_eq!(body.status.as_deref(), Some("success"));
    }

    #[test]
    fn success_exposes_named_result() {
        let envelope =
            ResponseEnvelope::parse(201, r#"{"data":{"result":"$1,200","empty":null}}"#)
                .expect("valid envelope");
        let ResponseEnvelope::Success(body) = envelope else {
            panic!("expected success");
        };
        assert_eq!(
            body.result("result"),
            Some(&serde_json::Value::String("$1,200".to_owned()))
        );
        assert_eq!(body.result("empty"), None);
        assert_eq!(body.result("missing"), None);
    }

    #[test]
    fn failure_with_string_and_list_errors() {
        let envelope = ResponseEnvelope::parse(
            400,
            r#"{"errors":{"email":"taken","name":["too short","reserved"]}}"#,
        )
        .expect("valid envelope");
        let ResponseEnvelope::Failure(body) = envelope else {
            panic!("expected failure");
        };
        assert_eq!(body.errors.get("email").map(String::as_str), Some("taken"));
        assert_eq!(
            body.errors.get("name").map(String::as_str),
            Some("too short reserved")
        );
        assert_eq!(body.detail_or_default(), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn failure_detail_falls_back_when_blank() {
        let envelope =
            ResponseEnvelope::parse(500, r#"{"detail":"  "}"#).expect("valid envelope");
        let ResponseEnvelope::Failure(body) = envelope else {
            panic!("expected failure");
        };
        assert!(body.errors.is_empty());
        assert_eq!(body.detail_or_default(), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn empty_body_is_an_empty_envelope() {
        let envelope = ResponseEnvelope::parse(204, "").expect("empty body is allowed");
        assert!(envelope.is_success());
        assert_eq!(envelope.status_code(), 204);
    }

    #[test]
    fn malformed_bodies_are_structural_errors() {
        let error = ResponseEnvelope::parse(200, "<html>").expect_err("not json");
        assert!(matches!(error, EnvelopeError::InvalidJson { status: 200, .. }));

        let error = ResponseEnvelope::parse(400, "[1,2]").expect_err("not an object");
        assert!(error.to_string().contains("an array"));

        let error = ResponseEnvelope::parse(400, r#"{"errors":"nope"}"#)
            .expect_err("errors must be a map");
        assert!(matches!(error, EnvelopeError::UnexpectedShape { .. }));
    }
}
