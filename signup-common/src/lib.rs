//! # Signup Common Library
//!
//! Shared code for the account sign-up client including:
//! - Wire types for the registration record and the create-user response
//! - Bootstrap configuration loading
//! - Error types
//! - Clock helpers

pub mod api;
pub mod config;
pub mod error;
pub mod time;

pub use api::types::{CreateUserResponse, Field, Month, RegistrationRecord, SubmissionStatus};
pub use error::{Error, Result};
