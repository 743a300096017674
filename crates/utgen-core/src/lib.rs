// ABOUTME: Component resolution and dependency pipeline for unit-test prompt generation
// ABOUTME: Transport-free; the MCP server crate wraps these operations as tools

pub mod config;
pub mod dependencies;
pub mod error;
pub mod observer;
pub mod paths;
pub mod pipeline;
pub mod probe;
pub mod prompt;

pub use config::*;
pub use dependencies::*;
pub use error::{Result, UtgenError};
pub use observer::*;
pub use paths::*;
pub use pipeline::*;
pub use probe::*;
pub use prompt::*;
