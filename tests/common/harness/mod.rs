//! Test harness for CLI and store integration tests.
//!
//! Provides isolated test environments, programmatic note creation,
//! a trash backend that never touches the real trash, and CLI assertion
//! helpers using `assert_cmd`.

mod command;
mod env;
mod note;
mod trash;

// Re-export main types for external use
#[allow(unused_imports)]
pub use command::NotetreeCommand;
#[allow(unused_imports)]
pub use env::TestEnv;
#[allow(unused_imports)]
pub use note::TestNote;
#[allow(unused_imports)]
pub use trash::RecordingTrash;
