use reqwest::header::{self, HeaderMap};
use reqwest::StatusCode;

use crate::{ClientOptions, CoinfeedError, Countdown, RequestSpec, Response, Result};

/// HTTP client that honors server-side rate limiting.
///
/// A 429 response is not an error from the caller's perspective: the client
/// waits the server-specified duration (with a visible countdown) and then
/// re-issues the identical request. Every other failure is classified and
/// returned immediately.
#[derive(Clone, Debug)]
pub struct RateLimitedClient {
    http: reqwest::Client,
    options: ClientOptions,
    countdown: Countdown,
}

impl Default for RateLimitedClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimitedClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            options: ClientOptions::default(),
            countdown: Countdown::new(),
        }
    }

    /// Applies retry options.
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the wait display, e.g. with [`Countdown::disabled`] for
    /// non-interactive runs.
    pub fn with_countdown(mut self, countdown: Countdown) -> Self {
        self.countdown = countdown;
        self
    }

    /// Sends the request described by `spec` and classifies the outcome.
    ///
    /// Retries only on 429, rebuilding the request from the same spec each
    /// attempt. Transport failures and every other non-success status are
    /// returned without retry.
    pub async fn send(&self, spec: &RequestSpec) -> Result<Response> {
        let mut waits = 0u32;
        loop {
            tracing::debug!(method = %spec.method, url = %spec.url, "issuing request");
            let response = self
                .issue(spec)
                .await
                .map_err(CoinfeedError::from_transport)?;
            let status = response.status();

            match status {
                StatusCode::UNAUTHORIZED => return Err(CoinfeedError::Auth),
                StatusCode::TOO_MANY_REQUESTS => {
                    let capped = self
                        .options
                        .max_rate_limit_waits
                        .is_some_and(|max| waits >= max);
                    if capped {
                        let body = response.text().await.map_err(CoinfeedError::Request)?;
                        return Err(CoinfeedError::Http {
                            status: StatusCode::TOO_MANY_REQUESTS.as_u16(),
                            body,
                        });
                    }
                    let wait_secs = retry_after_secs(
                        response.headers(),
                        self.options.default_retry_after_secs,
                    );
                    tracing::warn!(wait_secs, "rate limited; waiting before retry");
                    self.countdown.run(wait_secs).await;
                    waits += 1;
                }
                status if status.is_client_error() || status.is_server_error() => {
                    let body = response.text().await.map_err(CoinfeedError::Request)?;
                    return Err(CoinfeedError::Http {
                        status: status.as_u16(),
                        body,
                    });
                }
                _ => {
                    let headers = response.headers().clone();
                    let body = response.text().await.map_err(CoinfeedError::Request)?;
                    return Ok(Response {
                        status: status.as_u16(),
                        headers,
                        body,
                    });
                }
            }
        }
    }

    async fn issue(&self, spec: &RequestSpec) -> reqwest::Result<reqwest::Response> {
        let mut builder = self
            .http
            .request(spec.method.clone(), &spec.url)
            .timeout(spec.timeout);
        if !spec.query.is_empty() {
            builder = builder.query(&spec.query);
        }
        for (name, value) in &spec.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(form) = &spec.form {
            builder = builder.form(form);
        }
        builder.send().await
    }
}

/// Reads `Retry-After` as plain integer seconds.
///
/// HTTP-date values are not supported and fall back to the default, as does
/// a missing header.
pub(crate) fn retry_after_secs(headers: &HeaderMap, default_secs: u64) -> u64 {
    headers
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default_secs)
}
