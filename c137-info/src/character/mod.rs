//! Resilient client for the public character REST API
//!
//! - [`types`]: record and page envelope shapes
//! - [`transport`]: one raw GET per call (reqwest in production)
//! - [`retry`]: per-attempt timeout and exponential backoff
//! - [`fallback`]: ordered degradation chain and built-in records
//! - [`client`]: count / get / page / search / random operations

pub mod client;
pub mod error;
pub mod fallback;
pub mod retry;
pub mod transport;
pub mod types;

pub use client::{CharacterClient, RandomIdSource, ThreadRngIds};
pub use error::FetchError;
pub use fallback::{placeholder_character, static_fallback_character, FALLBACK_CHARACTER_IDS};
pub use retry::RetryPolicy;
pub use transport::{CharacterTransport, HttpTransport, UpstreamResponse};
pub use types::{CharacterPage, CharacterRecord, LocationRef, PageInfo};
