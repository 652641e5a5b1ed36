//! Project layout and asset discovery
//!
//! A project carries two asset roots, processed independently but
//! identically: "internal" assets bundled with the artifact and "external"
//! assets served as-is. Each root pairs an input directory with an output
//! directory; all eligible sources of a root compile into one aggregate
//! file under that output directory.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

/// Extension accepted for compiler input (and produced as output).
pub const INPUT_EXTENSION: &str = "js";

/// Origin of an asset root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Bundled with the artifact.
    Internal,
    /// Provided by the project, served unpackaged.
    External,
}

/// One input/output directory pair.
#[derive(Debug, Clone)]
pub struct AssetRoot {
    pub origin: Origin,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl AssetRoot {
    /// Enumerate the `.js` files under the input directory, sorted for
    /// deterministic invocation order. A missing directory is an empty
    /// root, not an error.
    pub fn discover(&self) -> Vec<PathBuf> {
        if !self.input_dir.is_dir() {
            return Vec::new();
        }
        let mut files: Vec<PathBuf> = WalkBuilder::new(&self.input_dir)
            .standard_filters(false)
            .build()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
            .map(|entry| entry.into_path())
            .filter(|path| path.extension().is_some_and(|e| e == INPUT_EXTENSION))
            .collect();
        files.sort();
        files
    }

    /// Locate the filtered (templated) copy of `source`, if the earlier
    /// pipeline stage produced one: same relative path under this root's
    /// output tree. The filtered copy takes precedence as compiler input
    /// because placeholders have already been substituted in it.
    ///
    /// The root's own aggregate (`output_name`) is never a variant: a
    /// source whose relative path collides with it would otherwise resolve
    /// the previous pass's output and feed it back to the compiler.
    pub fn filtered_variant(&self, source: &Path, output_name: &str) -> Option<PathBuf> {
        let rel = source.strip_prefix(&self.input_dir).ok()?;
        let candidate = self.output_dir.join(rel);
        if candidate == self.output_file(output_name) {
            return None;
        }
        candidate.is_file().then_some(candidate)
    }

    /// Aggregate output path for this root.
    pub fn output_file(&self, output_name: &str) -> PathBuf {
        self.output_dir.join(output_name)
    }

    /// Whether `file` lives under this root's input directory.
    pub fn contains(&self, file: &Path) -> bool {
        file.starts_with(&self.input_dir)
    }
}

/// A project directory with its build tree.
#[derive(Debug, Clone)]
pub struct Project {
    pub base_dir: PathBuf,
}

impl Project {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The build directory, also used to cache the resolved compiler.
    pub fn build_dir(&self) -> PathBuf {
        self.base_dir.join("target")
    }

    fn internal_root(&self) -> AssetRoot {
        AssetRoot {
            origin: Origin::Internal,
            input_dir: self.base_dir.join("src/resources/assets"),
            output_dir: self.build_dir().join("classes/assets"),
        }
    }

    fn external_root(&self) -> AssetRoot {
        AssetRoot {
            origin: Origin::External,
            input_dir: self.base_dir.join("src/assets"),
            output_dir: self.build_dir().join("web/assets"),
        }
    }

    /// Both asset roots, in processing order (internal first).
    pub fn roots(&self) -> [AssetRoot; 2] {
        [self.internal_root(), self.external_root()]
    }

    /// Whether `file` belongs to either asset root's input tree.
    pub fn owns(&self, file: &Path) -> bool {
        self.roots().iter().any(|root| root.contains(file))
    }
}
