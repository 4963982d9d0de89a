//! API utility functions
//!
//! Pure, stateless helpers for request body decoding.

use serde_json::Value;

use crate::api::error::ApiError;
use crate::storage::Fields;

/// Body encodings accepted by create and update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Json,
    Form,
}

/// Parses the Content-Type header into a payload format
///
/// Accepts:
/// - `application/json` (optionally with charset)
/// - `application/x-www-form-urlencoded`
///
/// Rejects other media types with 415 and malformed headers with 400.
pub fn parse_content_type(content_type: &str) -> Result<PayloadFormat, ApiError> {
    let media_type: mime::Mime = content_type.parse().map_err(|_| {
        ApiError::InvalidPayload(format!("invalid Content-Type: {}", content_type))
    })?;

    if media_type.type_() != mime::APPLICATION {
        return Err(unsupported(&media_type));
    }

    if media_type.subtype() == mime::JSON {
        Ok(PayloadFormat::Json)
    } else if media_type.subtype() == mime::WWW_FORM_URLENCODED {
        Ok(PayloadFormat::Form)
    } else {
        Err(unsupported(&media_type))
    }
}

fn unsupported(media_type: &mime::Mime) -> ApiError {
    ApiError::UnsupportedMediaType(format!(
        "expected application/json or application/x-www-form-urlencoded, got: {}/{}",
        media_type.type_(),
        media_type.subtype()
    ))
}

/// Decodes a JSON body; only objects are accepted
pub fn parse_json(body: &[u8]) -> Result<Fields, ApiError> {
    match serde_json::from_slice(body)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(ApiError::InvalidPayload(
            "payload must be a JSON object".to_string(),
        )),
    }
}

/// Decodes an urlencoded form body; repeated keys keep the last value
pub fn parse_form(body: &[u8]) -> Fields {
    url::form_urlencoded::parse(body)
        .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
        .collect()
}
