//! Core types and error handling.

pub mod error;

pub use error::{DevstackError, ErrorContext, user_friendly_error};
