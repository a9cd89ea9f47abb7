use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use souschef_core::ServiceError;

/// Every outbound call carries the same bounded timeout; a hung collaborator
/// must not hold the user's turn open indefinitely.
pub(crate) fn build_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(Duration::from_secs(timeout_secs)).build()
}

/// Sends a request, retrying exactly once on a transport-level failure
/// (including a timeout) when enabled. Non-2xx statuses are not retried.
pub(crate) async fn send_checked(
    request: RequestBuilder,
    service: &'static str,
    retry_once: bool,
) -> Result<Response, ServiceError> {
    let retry = if retry_once { request.try_clone() } else { None };

    match request.send().await {
        Ok(response) => check_status(response, service),
        Err(first) => {
            let Some(retry) = retry else {
                return Err(transport(service, &first));
            };
            tracing::debug!(
                event_name = "integration.retry",
                service,
                error = %first,
                "transport failure; retrying once"
            );
            match retry.send().await {
                Ok(response) => check_status(response, service),
                Err(second) => Err(transport(service, &second)),
            }
        }
    }
}

pub(crate) async fn decode_json<T>(
    response: Response,
    service: &'static str,
) -> Result<T, ServiceError>
where
    T: DeserializeOwned,
{
    response.json::<T>().await.map_err(|error| ServiceError::Decode {
        service,
        detail: error.to_string(),
    })
}

fn check_status(response: Response, service: &'static str) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ServiceError::Transport { service, detail: format!("unexpected status {status}") })
    }
}

fn transport(service: &'static str, error: &reqwest::Error) -> ServiceError {
    ServiceError::Transport { service, detail: error.to_string() }
}
