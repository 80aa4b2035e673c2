//! Request-body validation.
//!
//! Body shapes are plain serde types that also derive [`validator::Validate`].
//! [`ValidatedJson`] runs [`validate_body`] before the handler, so handlers
//! only ever see values that decoded cleanly and passed their field rules.
//! Strictness (rejecting unknown fields) is declared on the type with
//! `#[serde(deny_unknown_fields)]`.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::error::Category;
use validator::Validate;

use crate::app::errors::ApiError;

/// One validation failure, optionally tied to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Option<String>,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn body(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

/// Non-empty list of validation failures, ordered by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// A decode failure, located by the path `serde_path_to_error` tracked.
    fn from_decode(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = err.path().to_string();
        let inner = err.into_inner();

        let error = match inner.classify() {
            Category::Syntax | Category::Eof => FieldError::body(format!("malformed JSON: {inner}")),
            Category::Data | Category::Io if path != "." => FieldError::new(path, inner.to_string()),
            Category::Data | Category::Io => FieldError::body(inner.to_string()),
        };

        Self(vec![error])
    }
}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| {
                    let message = match &e.message {
                        Some(message) => message.to_string(),
                        None => format!("{field} failed `{}`", e.code),
                    };
                    FieldError::new(field.clone(), message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        Self(fields)
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// Decode and validate a raw body.
///
/// A whitespace-only body is treated as `{}`, so a missing body reports the
/// schema's required fields instead of a parse error.
pub fn validate_body<T>(bytes: &[u8]) -> Result<T, ValidationErrors>
where
    T: DeserializeOwned + Validate,
{
    let bytes: &[u8] = if is_blank(bytes) { b"{}" } else { bytes };

    let mut de = serde_json::Deserializer::from_slice(bytes);
    let value: T = serde_path_to_error::deserialize(&mut de).map_err(ValidationErrors::from_decode)?;
    de.end()
        .map_err(|e| ValidationErrors(vec![FieldError::body(format!("malformed JSON: {e}"))]))?;
    value.validate()?;
    Ok(value)
}

/// JSON body extractor that runs [`validate_body`] before the handler.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req.headers().contains_key(CONTENT_TYPE);
        if content_type && !has_json_content_type(req.headers()) {
            return Err(ApiError::UnsupportedMediaType);
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|e| ApiError::BodyRead {
            status: e.status(),
            message: e.body_text(),
        })?;

        // No content type at all is only acceptable for an empty body.
        if !content_type && !is_blank(&bytes) {
            return Err(ApiError::UnsupportedMediaType);
        }

        let value = validate_body::<T>(&bytes).inspect_err(|errors| {
            tracing::debug!(%errors, "request body failed validation");
        })?;

        Ok(Self(value))
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct Sample {
        #[validate(required(message = "name is required"))]
        name: Option<String>,
        #[validate(range(min = 1, message = "count must be positive"))]
        count: Option<u32>,
    }

    fn only_error(errors: ValidationErrors) -> FieldError {
        assert_eq!(errors.fields().len(), 1, "{errors}");
        errors.fields()[0].clone()
    }

    #[test]
    fn valid_body_is_typed() {
        let v: Sample = validate_body(br#"{"name":"a","count":3}"#).unwrap();
        assert_eq!(
            v,
            Sample {
                name: Some("a".to_string()),
                count: Some(3)
            }
        );
    }

    #[test]
    fn unknown_field_is_reported_at_its_path() {
        let err = validate_body::<Sample>(br#"{"name":"a","count":3,"admin":true}"#).unwrap_err();
        let e = only_error(err);
        assert_eq!(e.field.as_deref(), Some("admin"));
        assert!(e.message.contains("unknown field"), "{}", e.message);
    }

    #[test]
    fn missing_required_field_is_reported_by_validator() {
        let err = validate_body::<Sample>(br#"{"count":2}"#).unwrap_err();
        assert_eq!(only_error(err), FieldError::new("name", "name is required"));
    }

    #[test]
    fn empty_body_reports_required_fields() {
        let err = validate_body::<Sample>(b"  ").unwrap_err();
        assert_eq!(only_error(err).field.as_deref(), Some("name"));
    }

    #[test]
    fn wrong_type_is_reported_at_its_path() {
        let err = validate_body::<Sample>(br#"{"name":"a","count":"three"}"#).unwrap_err();
        let e = only_error(err);
        assert_eq!(e.field.as_deref(), Some("count"));
        assert!(e.message.starts_with("invalid type"), "{}", e.message);
    }

    #[test]
    fn malformed_json_is_a_body_error() {
        let err = validate_body::<Sample>(br#"{"name":"#).unwrap_err();
        let e = only_error(err);
        assert_eq!(e.field, None);
        assert!(e.message.starts_with("malformed JSON"), "{}", e.message);
    }

    #[test]
    fn non_object_body_is_a_body_error() {
        let err = validate_body::<Sample>(b"42").unwrap_err();
        assert_eq!(only_error(err).field, None);
    }

    #[test]
    fn trailing_characters_are_malformed() {
        let err = validate_body::<Sample>(br#"{"name":"a"} x"#).unwrap_err();
        let e = only_error(err);
        assert_eq!(e.field, None);
        assert!(e.message.starts_with("malformed JSON"), "{}", e.message);
    }

    #[test]
    fn field_rules_run_after_decoding() {
        let err = validate_body::<Sample>(br#"{"name":"a","count":0}"#).unwrap_err();
        assert_eq!(only_error(err), FieldError::new("count", "count must be positive"));
    }

    #[test]
    fn failures_are_ordered_by_field() {
        let err = validate_body::<Sample>(br#"{"count":0}"#).unwrap_err();
        let fields: Vec<_> = err.fields().iter().map(|e| e.field.clone().unwrap()).collect();
        assert_eq!(fields, vec!["count", "name"]);
    }

    #[test]
    fn json_content_type_detection() {
        let mut headers = HeaderMap::new();
        assert!(!has_json_content_type(&headers));

        for (value, expected) in [
            ("application/json", true),
            ("application/json; charset=utf-8", true),
            ("Application/JSON", true),
            ("application/problem+json", true),
            ("text/plain", false),
            ("application/x-www-form-urlencoded", false),
        ] {
            headers.insert(CONTENT_TYPE, value.parse().unwrap());
            assert_eq!(has_json_content_type(&headers), expected, "{value}");
        }
    }
}
