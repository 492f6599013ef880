//! # Quill Shared
//!
//! Request/response types shared across the API surface. Kept free of
//! framework dependencies so clients can reuse the same definitions.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, FieldError};
