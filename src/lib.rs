//! Tracewatch - incremental EcmaScript 6 build tool
//!
//! Detects JavaScript sources written for tomorrow's dialect, shells out to
//! the Traceur compiler to transpile them, and recompiles on change in
//! watch mode. The library owns file selection, invocation batching,
//! output location, and translation of raw compiler errors into structured
//! diagnostics; the compiler itself stays an external process.

pub mod cli;
pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod eligibility;
pub mod error;
pub mod project;
pub mod tool;
pub mod watcher;

// Re-exports for convenience
pub use compiler::compile_all;
pub use config::Config;
pub use diagnostics::{translate, Diagnostic};
pub use eligibility::{should_compile, IncludePatterns};
pub use error::{TracewatchError, TracewatchResult};
pub use project::{AssetRoot, Origin, Project};
pub use tool::{ExecutionOutput, Invocation, ToolRunner, Traceur};
pub use watcher::{watch, Es6Watcher, WatchEvent, Watcher};
