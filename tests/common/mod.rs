//! Common test utilities: a stub Traceur executable and project scaffolding.
//!
//! The stub honors the real argument contract
//! (`--out <output> <inputs...> [--experimental] --modules=<strategy>`),
//! concatenates its inputs into the aggregate output behind a strict-mode
//! prologue and a class-construction helper call, and fails with a
//! Traceur-shaped error for any input containing `SYNTAX_ERROR`.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tracewatch::{AssetRoot, Config, Project};

const STUB: &str = r#"#!/bin/sh
out=""
inputs=""
while [ $# -gt 0 ]; do
  case "$1" in
    --out) out="$2"; shift 2 ;;
    --experimental) shift ;;
    --modules=*) shift ;;
    *) inputs="$inputs $1"; shift ;;
  esac
done
for f in $inputs; do
  if grep -q "SYNTAX_ERROR" "$f"; then
    printf '\n\n[Error: %s:10:14:Unexpected end of input\n' "$f" >&2
    exit 1
  fi
done
{
  printf '"use strict";\n'
  printf '$traceurRuntime.createClass();\n'
  for f in $inputs; do
    cat "$f"
  done
} > "$out"
"#;

/// Write the stub compiler into `dir` and make it executable.
pub fn stub_traceur(dir: &Path) -> PathBuf {
    let path = dir.join("traceur-stub");
    fs::write(&path, STUB).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }
    path
}

/// A project with a fixed output name, so assertions do not depend on the
/// temp directory's random name.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.output = "acme.js".to_string();
    config
}

/// Write a source file under the root's input directory.
pub fn write_source(root: &AssetRoot, rel: &str, content: &str) -> PathBuf {
    let path = root.input_dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

pub fn aggregate(root: &AssetRoot) -> PathBuf {
    root.output_file("acme.js")
}

pub fn roots(project: &Project) -> [AssetRoot; 2] {
    project.roots()
}
