/// Configures rate-limit retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Maximum number of rate-limit waits before a 429 surfaces as an error.
    ///
    /// `None` keeps retrying for as long as the server answers 429, matching
    /// the upstream API's expectation that clients simply honor `Retry-After`.
    pub max_rate_limit_waits: Option<u32>,
    /// Wait in seconds applied when `Retry-After` is missing or unparseable.
    pub default_retry_after_secs: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            max_rate_limit_waits: None,
            default_retry_after_secs: 60,
        }
    }
}
