pub mod case_registry;
pub mod contact_moments;
pub mod delivery;
pub mod party_registry;

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::errors::ProcessingError;

pub(crate) fn http_client(timeout_seconds: u64) -> Result<Client, ProcessingError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| ProcessingError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

pub(crate) fn transport_error(service: &'static str, err: reqwest::Error) -> ProcessingError {
    if err.is_decode() {
        ProcessingError::MalformedResponse {
            service,
            detail: err.to_string(),
        }
    } else {
        ProcessingError::UpstreamUnavailable {
            service,
            detail: err.to_string(),
        }
    }
}

pub(crate) fn status_error(
    service: &'static str,
    status: StatusCode,
    reference: &str,
) -> ProcessingError {
    if status == StatusCode::NOT_FOUND {
        ProcessingError::DataNotFound {
            service,
            reference: reference.to_string(),
        }
    } else if status.is_server_error() {
        ProcessingError::UpstreamUnavailable {
            service,
            detail: format!("status {}", status),
        }
    } else {
        ProcessingError::MalformedResponse {
            service,
            detail: format!("unexpected status {}", status),
        }
    }
}

/// GET a JSON resource with the shared upstream error mapping: transport
/// failures and timeouts surface as unavailable, 404 as missing data, and
/// schema mismatches as malformed responses.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    service: &'static str,
    reference: &str,
) -> Result<T, ProcessingError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| transport_error(service, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(status_error(service, status, reference));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ProcessingError::MalformedResponse {
            service,
            detail: e.to_string(),
        })
}
