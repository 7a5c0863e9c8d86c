//! API request/response types shared with the create-user endpoint

pub mod types;

pub use types::{CreateUserResponse, Field, Month, RegistrationRecord, SubmissionStatus};
