/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum CoinfeedError {
    /// HTTP 401 from the upstream API.
    #[error("unauthorized; check API key")]
    Auth,
    /// Connection-level failure from `reqwest` (DNS, refused, reset).
    #[error("connection error: {0}")]
    Connection(reqwest::Error),
    /// Request execution failure from `reqwest` (timeout, redirect loop, body).
    #[error("request error: {0}")]
    Request(reqwest::Error),
    /// Non-success HTTP status code with raw response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Response decoding or schema-shape validation error.
    #[error("decode error: {0}")]
    Decode(String),
    /// Database failure; the enclosing transaction has been rolled back.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// File persistence failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoinfeedError {
    /// Classifies a transport failure into connection vs. request error.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::Connection(err)
        } else {
            Self::Request(err)
        }
    }
}
