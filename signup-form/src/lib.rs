//! signup-form library - account registration client
//!
//! Collects a registration draft, validates it locally and submits it to the
//! create-user endpoint.
//!
//! - [`validator`]: pure field validation
//! - [`session`]: draft ownership and the submit state machine
//! - [`transport`]: the create-user HTTP call
//! - [`render`]: plain-text form output
//! - [`choices`]: birthday selector option lists
//! - [`logging`]: tracing subscriber with a reloadable level

pub mod choices;
pub mod logging;
pub mod render;
pub mod session;
pub mod transport;
pub mod validator;

pub use session::{ControllerPhase, FormSnapshot, RegistrationSession, SessionError, SubmitOutcome};
pub use transport::{HttpTransport, RegistrationTransport, TransportError};
pub use validator::{validate, validate_now, FieldErrors};
