//! API layer: HTTP client, its error type and error classification

mod classify;
mod client;
mod error;
mod traits;

pub use classify::{classify, resolve_message, side_effects, Classification, SideEffect};
pub use client::{HttpApiClient, DEFAULT_ADDRESS};
pub use error::{ApiError, ErrorBody, TransportError, IDENTITY_PATH, OFFLINE_STATUS};
pub use traits::ApiClientTrait;

#[cfg(test)]
pub use traits::MockApiClientTrait;
