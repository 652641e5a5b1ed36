//! Compilation orchestrator
//!
//! Runs one full pass: discover candidate files per asset root, filter
//! them, substitute filtered variants, batch the survivors into a single
//! compiler invocation per root, and translate tool failures into
//! structured diagnostics.
//!
//! Passes are synchronous and run to completion; the caller (CLI or watch
//! loop) is responsible for serializing them.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::diagnostics::{self, Diagnostic};
use crate::eligibility::{should_compile, IncludePatterns};
use crate::error::TracewatchResult;
use crate::project::{AssetRoot, Project};
use crate::tool::{Invocation, ToolRunner};

/// Compile every eligible file of every asset root.
///
/// Roots are processed sequentially, internal first; a failing invocation
/// aborts before the next root is attempted. `trigger` is the file whose
/// change started the pass (watch mode); diagnostics for the root owning
/// it are attributed to that file.
///
/// Returns the aggregate output files written, one per root with a
/// non-empty eligible set.
pub fn compile_all(
    project: &Project,
    config: &Config,
    tool: &dyn ToolRunner,
    trigger: Option<&Path>,
) -> TracewatchResult<Vec<PathBuf>> {
    let patterns = IncludePatterns::new(&config.include);
    let mut outputs = Vec::new();
    for root in project.roots() {
        if let Some(output) = compile_root(&root, config, &patterns, tool, trigger)? {
            outputs.push(output);
        }
    }
    Ok(outputs)
}

/// Compile one asset root. An empty eligible set is a no-op: no output is
/// written and any stale aggregate is left untouched.
fn compile_root(
    root: &AssetRoot,
    config: &Config,
    patterns: &IncludePatterns,
    tool: &dyn ToolRunner,
    trigger: Option<&Path>,
) -> TracewatchResult<Option<PathBuf>> {
    let eligible: Vec<PathBuf> = root
        .discover()
        .into_iter()
        .filter(|file| should_compile(file, patterns))
        .collect();
    if eligible.is_empty() {
        return Ok(None);
    }

    // Failures are attributed to the file that triggered the pass when it
    // belongs to this root, otherwise to the root's first eligible source.
    let attributed = trigger
        .filter(|t| root.contains(t))
        .unwrap_or(&eligible[0])
        .to_path_buf();

    let inputs: Vec<PathBuf> = eligible
        .iter()
        .map(|source| {
            root.filtered_variant(source, &config.output).unwrap_or_else(|| {
                eprintln!(
                    "Warning: cannot find the filtered version of {}, using source file",
                    source.display()
                );
                source.clone()
            })
        })
        .collect();

    fs::create_dir_all(&root.output_dir)?;
    let invocation = Invocation {
        output: root.output_file(&config.output),
        inputs,
        experimental: config.experimental,
        modules: config.modules.clone(),
    };

    match tool.run(&invocation) {
        Ok(exec) if exec.success() => Ok(Some(invocation.output)),
        Ok(exec) => {
            let stderr = exec.stderr.trim();
            if stderr.is_empty() {
                Err(Diagnostic::unlocated(
                    format!("Error while compiling {}", attributed.display()),
                    &attributed,
                )
                .into())
            } else {
                Err(diagnostics::translate(&exec.stderr, &attributed).into())
            }
        }
        Err(e) => Err(Diagnostic::unlocated(
            format!("Error while compiling {}: {}", attributed.display(), e),
            &attributed,
        )
        .into()),
    }
}
