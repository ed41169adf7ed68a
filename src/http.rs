use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::time::sleep;

use crate::config::HttpConfig;

/// Builds the client shared by every upstream call of a run.
///
/// The configured timeout covers the whole request (connect, send and
/// reading the body), so a hung upstream cannot stall the pipeline past it.
pub fn build_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Sends `request` and turns non-success statuses into errors.
///
/// Retries up to `retries` times when the upstream answers `502 Bad Gateway`,
/// waiting 500 ms longer before each attempt. Any other failure is returned
/// immediately.
pub async fn send(request: RequestBuilder, retries: u32) -> Result<Response, reqwest::Error> {
    let mut attempt = 0;

    loop {
        // Streaming bodies cannot be cloned; those get a single attempt.
        let Some(current) = request.try_clone() else {
            return request.send().await?.error_for_status();
        };

        match current.send().await.and_then(|r| r.error_for_status()) {
            Ok(response) => return Ok(response),
            Err(err) if attempt < retries && err.status() == Some(StatusCode::BAD_GATEWAY) => {
                attempt += 1;
                sleep(Duration::from_millis(500 * attempt as u64)).await;
            }
            Err(err) => return Err(err),
        }
    }
}
