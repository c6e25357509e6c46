//! CLI command handlers. Each command is in its own file.

mod capture;
mod completions;

pub use capture::{run_capture, CaptureArgs};
pub use completions::run_completions;
