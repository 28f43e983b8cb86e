//! HTTP API handlers for c137-info
//!
//! JSON endpoints for character data, the streamed and one-shot enrichment
//! reports, generated error messages, about-page content and small extras.

pub mod about;
pub mod characters;
pub mod dynamic_errors;
pub mod enrichment;
pub mod extras;
pub mod health;

pub use about::about_routes;
pub use characters::character_routes;
pub use dynamic_errors::dynamic_error_routes;
pub use enrichment::enrichment_routes;
pub use extras::extras_routes;
pub use health::health_routes;
