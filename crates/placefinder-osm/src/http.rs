//! Shared HTTP plumbing for the providers

use placefinder::ProviderError;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

pub(crate) fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(|err| ProviderError::Unavailable(format!("failed to build HTTP client: {err}")))
}

pub(crate) fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Network(format!("request timed out: {err}"))
    } else {
        ProviderError::Network(err.to_string())
    }
}

/// Read the body of a successful response, or map the failure status
pub(crate) async fn read_body(response: Response) -> Result<String, ProviderError> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        return Err(map_http_error(status, &body));
    }

    Ok(body)
}

pub(crate) fn map_http_error(status: StatusCode, body: &str) -> ProviderError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return ProviderError::RateLimited;
    }

    // Both services wrap errors as {"error": {"message": ..}}; Nominatim
    // also answers {"error": ".."} for some failures.
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            let error = json.get("error")?;
            error
                .get("message")
                .and_then(Value::as_str)
                .or_else(|| error.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string());

    ProviderError::Service {
        status: status.as_u16(),
        message,
    }
}

pub(crate) fn parse_error(err: serde_json::Error) -> ProviderError {
    ProviderError::Parse(err.to_string())
}
