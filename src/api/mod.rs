//! Gateway client and request types.

pub mod action;
pub mod client;
pub mod error;

pub use action::ActionRequest;
pub use client::{API_URL, ApiClient};
pub use error::ApiErrorCode;
