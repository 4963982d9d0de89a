use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use http_body_util::{BodyExt, LengthLimitError, Limited};

use super::error::ApiError;
use super::state::ResourceState;
use super::utils::{PayloadFormat, parse_content_type, parse_form, parse_json};
use crate::storage::Fields;

/// Create/update request body, decoded from JSON or an HTML form
///
/// Decompression is handled by `RequestDecompressionLayer`, so the size
/// limit applies to the decoded body.
#[derive(Debug)]
pub struct Payload(pub Fields);

impl FromRequest<ResourceState> for Payload {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &ResourceState) -> Result<Self, Self::Rejection> {
        let result = decode(req, state.max_payload_bytes).await;
        if result.is_err() {
            state.metrics.request_rejected();
        }
        result.map(Payload)
    }
}

async fn decode(req: Request, max_payload_bytes: usize) -> Result<Fields, ApiError> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let body = read_body(req, max_payload_bytes).await?;

    match content_type {
        Some(content_type) => match parse_content_type(&content_type)? {
            PayloadFormat::Json => parse_json(&body),
            PayloadFormat::Form => Ok(parse_form(&body)),
        },
        None if body.is_empty() => Ok(Fields::new()),
        None => Err(ApiError::InvalidPayload(
            "missing Content-Type header".into(),
        )),
    }
}

/// Reads the request body, failing once it grows past the limit
async fn read_body(req: Request, max_payload_bytes: usize) -> Result<Vec<u8>, ApiError> {
    let limited = Limited::new(req.into_body(), max_payload_bytes);
    let collected = limited.collect().await.map_err(|err| {
        if err.downcast_ref::<LengthLimitError>().is_some() {
            ApiError::PayloadTooLarge(max_payload_bytes)
        } else {
            ApiError::InvalidPayload(format!("failed to read body: {}", err))
        }
    })?;

    Ok(collected.to_bytes().to_vec())
}
