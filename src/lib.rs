//! `coinfeed` ingests cryptocurrency listings from a rate-limited REST API.
//!
//! The core is [`RateLimitedClient::send`]: it issues one HTTP request and,
//! on a 429, honors `Retry-After` with a visible countdown before re-issuing
//! the identical request. Around it sit:
//! - [`ListingsClient`] — typed access to the listings endpoint
//! - [`save_json`] — raw payload dump to disk
//! - [`CoinStore`] — transactional MySQL sink

mod api;
mod client;
mod config;
mod countdown;
mod error;
mod options;
mod persist;
mod request;
mod store;

pub use api::{ApiStatus, Coin, ListingsClient, ListingsPage, Quote};
pub use client::RateLimitedClient;
pub use config::Config;
pub use countdown::{BarColor, Countdown};
pub use error::CoinfeedError;
pub use options::ClientOptions;
pub use persist::save_json;
pub use request::{RequestSpec, Response};
pub use store::CoinStore;

pub type Result<T> = std::result::Result<T, CoinfeedError>;
