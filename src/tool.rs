//! External compiler resolution and invocation
//!
//! Traceur is an npm-distributed executable; this module resolves a pinned
//! release into the project's build directory and runs it with captured
//! streams. Execution is synchronous and blocking with no timeout: a hang
//! in the tool blocks the whole pass. Runners are meant to be invoked
//! serially; they are not designed for concurrent invocations.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{TracewatchError, TracewatchResult};

/// npm package providing the compiler.
pub const TOOL_NAME: &str = "traceur";

/// One batched compiler call: every eligible file of one asset root,
/// compiled into a single aggregate output.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub output: PathBuf,
    pub inputs: Vec<PathBuf>,
    pub experimental: bool,
    pub modules: String,
}

impl Invocation {
    /// `--out <output> <inputs...> [--experimental] --modules=<strategy>`
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--out".into(), self.output.clone().into()];
        for input in &self.inputs {
            args.push(input.clone().into());
        }
        if self.experimental {
            args.push("--experimental".into());
        }
        args.push(format!("--modules={}", self.modules).into());
        args
    }
}

/// Captured result of one compiler call. Error text travels with the
/// result rather than being stashed on the runner, so attribution cannot
/// be corrupted by a later call.
#[derive(Debug, Clone)]
pub struct ExecutionOutput {
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Seam between the orchestrator and the real compiler process.
pub trait ToolRunner {
    /// Execute one invocation, blocking until the tool exits. An `Err`
    /// means the process could not be run at all; a tool-reported failure
    /// is an `Ok` with a non-zero status.
    fn run(&self, invocation: &Invocation) -> io::Result<ExecutionOutput>;
}

/// The real Traceur executable.
#[derive(Debug, Clone)]
pub struct Traceur {
    binary: PathBuf,
}

impl Traceur {
    /// Resolve `traceur@<version>`, installing it under `<build>/node_modules`
    /// when the cached copy is absent. Resolution failure is fatal for the
    /// whole pass: without the tool nothing can be compiled.
    pub fn resolve(build_dir: &Path, version: &str) -> TracewatchResult<Self> {
        let binary = build_dir.join("node_modules").join(TOOL_NAME).join(TOOL_NAME);
        if binary.is_file() {
            return Ok(Self { binary });
        }

        fs::create_dir_all(build_dir)?;
        let result = Command::new("npm")
            .arg("install")
            .arg("--prefix")
            .arg(build_dir)
            .arg(format!("{TOOL_NAME}@{version}"))
            .stdin(Stdio::null())
            .output();

        let resolution_error = |message: String| TracewatchError::ToolResolution {
            tool: TOOL_NAME.to_string(),
            version: version.to_string(),
            message,
        };

        let output = result.map_err(|e| resolution_error(format!("cannot run npm: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(resolution_error(format!(
                "npm install failed: {}",
                stderr.trim()
            )));
        }
        if !binary.is_file() {
            return Err(resolution_error(format!(
                "installed package has no executable at {}",
                binary.display()
            )));
        }
        Ok(Self { binary })
    }

    /// Use an already-resolved executable. This is how tests point the
    /// orchestrator at a stub compiler.
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl ToolRunner for Traceur {
    fn run(&self, invocation: &Invocation) -> io::Result<ExecutionOutput> {
        let output = Command::new(&self.binary)
            .args(invocation.to_args())
            .stdin(Stdio::null())
            .output()?;
        Ok(ExecutionOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
