//! Translation of raw HTTP responses into values or errors.

use crate::error::{AdsError, AdsResult, ApiError};
use crate::transport::HttpResponse;
use serde::Deserialize;
use serde_json::Value;

/// Outcome of a single item inside a batch response.
pub type BatchItem = Result<Value, ApiError>;

/// Status code the server uses for items it could not process.
pub const BATCH_ITEM_SERVER_ERROR: u16 = 500;

/// Turn a live response into its JSON value.
///
/// Non-200 bodies that parse as JSON with an `error` object become
/// [`AdsError::Api`]; anything else surfaces as [`AdsError::HttpStatus`].
pub fn translate_response(url: &str, response: HttpResponse) -> AdsResult<Value> {
    if response.status == 200 {
        return serde_json::from_str(&response.body).map_err(|e| {
            AdsError::invalid_response(format!("body of {} is not JSON: {}", url, e))
        });
    }

    match serde_json::from_str::<Value>(&response.body)
        .ok()
        .as_ref()
        .and_then(ApiError::from_body)
    {
        Some(api_error) => Err(AdsError::Api(api_error)),
        None => Err(AdsError::HttpStatus {
            status: response.status,
            url: url.to_string(),
        }),
    }
}

#[derive(Debug, Deserialize)]
struct BatchEnvelope {
    code: u16,
    #[serde(default)]
    body: Option<String>,
}

/// Split a batch response into one result per submitted descriptor.
pub fn decode_batch(url: &str, response: HttpResponse, expected: usize) -> AdsResult<Vec<BatchItem>> {
    let envelopes: Vec<Option<BatchEnvelope>> = match translate_response(url, response)? {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()?,
        other => {
            return Err(AdsError::invalid_response(format!(
                "batch response is not an array: {}",
                other
            )))
        }
    };

    if envelopes.len() != expected {
        return Err(AdsError::invalid_response(format!(
            "batch returned {} results for {} requests",
            envelopes.len(),
            expected
        )));
    }

    envelopes.into_iter().map(decode_item).collect()
}

fn decode_item(envelope: Option<BatchEnvelope>) -> AdsResult<BatchItem> {
    let envelope = match envelope {
        Some(envelope) => envelope,
        None => return Ok(Ok(Value::Null)),
    };

    // 500 bodies are sometimes not JSON at all; never look at them.
    if envelope.code == BATCH_ITEM_SERVER_ERROR {
        return Ok(Err(ApiError::unknown()));
    }

    let value = match envelope.body {
        Some(body) => serde_json::from_str::<Value>(&body)?,
        None => Value::Null,
    };

    Ok(match ApiError::from_body(&value) {
        Some(api_error) => Err(api_error),
        None => Ok(value),
    })
}
