// Library surface for the binary, headless/integration tests and reuse.
// Terminal rendering stays in the binary.
pub mod app_dirs;
pub mod cancel;
pub mod config;
pub mod controller;
pub mod definition;
pub mod error;
pub mod grading;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod source;
pub mod speech;
pub mod submission;
pub mod view;

#[cfg(test)]
mod canned_http;

pub use controller::{Publisher, SessionController};
pub use error::PracticeError;
pub use session::{SessionEvent, SessionEventKind, SessionReport, SessionStatus, Timing};
