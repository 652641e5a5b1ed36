//! Eligibility filter
//!
//! Decides whether a candidate JavaScript file should be handed to the
//! compiler. Selection is either by configured include pattern (matched
//! against the base name) or by an in-source marker comment (`//!ES6`).

use std::fs;
use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

/// Marker substrings flagging a file for compilation, compared lowercase.
const MARKERS: [&str; 2] = ["!ecmascript6", "!es6"];

/// Configured include patterns, matched against file base names with
/// `*`/`?` glob semantics.
#[derive(Debug)]
pub struct IncludePatterns {
    matcher: Gitignore,
    pattern_count: usize,
}

impl IncludePatterns {
    /// Build a matcher from the configured patterns. Invalid patterns are
    /// skipped with a warning rather than aborting the build.
    pub fn new(patterns: &[String]) -> Self {
        let mut builder = GitignoreBuilder::new("");
        let mut pattern_count = 0;
        for pattern in patterns {
            let trimmed = pattern.trim();
            if trimmed.is_empty() {
                continue;
            }
            match builder.add_line(None, trimmed) {
                Ok(_) => pattern_count += 1,
                Err(e) => eprintln!("Warning: skipping invalid include pattern '{trimmed}': {e}"),
            }
        }
        let matcher = builder.build().unwrap_or_else(|_| Gitignore::empty());
        Self {
            matcher,
            pattern_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pattern_count == 0
    }

    /// Match the file's base name (not its full path) against the patterns.
    pub fn matches(&self, file: &Path) -> bool {
        if self.pattern_count == 0 {
            return false;
        }
        let Some(name) = file.file_name() else {
            return false;
        };
        self.matcher.matched(Path::new(name), false).is_ignore()
    }
}

/// Whether `file` should be compiled.
///
/// Any matching include pattern is sufficient. With no matching pattern (or
/// no patterns configured) the file content decides: the lowercased text
/// must contain one of the eligibility markers. Read failures are logged
/// and treated as "not eligible" so one unreadable file never aborts a
/// pass. Idempotent apart from that warning.
pub fn should_compile(file: &Path, patterns: &IncludePatterns) -> bool {
    if patterns.matches(file) {
        return true;
    }

    match fs::read_to_string(file) {
        Ok(content) => {
            let content = content.to_lowercase();
            MARKERS.iter().any(|m| content.contains(m))
        }
        Err(e) => {
            eprintln!("Warning: cannot inspect {}: {}", file.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn patterns(p: &[&str]) -> IncludePatterns {
        IncludePatterns::new(&p.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn test_marker_uppercase() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("greeter.js");
        fs::write(&file, "// greeter.js\n//!ES6\nclass Greeter {}\n").unwrap();
        assert!(should_compile(&file, &patterns(&[])));
    }

    #[test]
    fn test_marker_long_form_mixed_case() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("app.js");
        fs::write(&file, "//!EcmaScript6\nlet x = 1;\n").unwrap();
        assert!(should_compile(&file, &patterns(&[])));
    }

    #[test]
    fn test_no_marker_no_patterns() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain.js");
        fs::write(&file, "var x = 1;\n").unwrap();
        assert!(!should_compile(&file, &patterns(&[])));
    }

    #[test]
    fn test_pattern_matches_base_name() {
        let dir = tempdir().unwrap();
        let include = patterns(&["human*.js"]);

        let human = dir.path().join("human.js");
        let humans = dir.path().join("humans.js");
        let dummy = dir.path().join("dummy.js");
        fs::write(&human, "var x = 1;\n").unwrap();
        fs::write(&humans, "var x = 1;\n").unwrap();
        fs::write(&dummy, "var x = 1;\n").unwrap();

        assert!(should_compile(&human, &include));
        assert!(should_compile(&humans, &include));
        assert!(!should_compile(&dummy, &include));
    }

    #[test]
    fn test_marker_still_applies_when_patterns_miss() {
        let dir = tempdir().unwrap();
        let include = patterns(&["human*.js"]);
        let file = dir.path().join("robot.js");
        fs::write(&file, "//!es6\nclass Robot {}\n").unwrap();
        assert!(should_compile(&file, &include));
    }

    #[test]
    fn test_question_mark_glob() {
        let dir = tempdir().unwrap();
        let include = patterns(&["app?.js"]);
        let app1 = dir.path().join("app1.js");
        let app12 = dir.path().join("app12.js");
        fs::write(&app1, "var x;\n").unwrap();
        fs::write(&app12, "var x;\n").unwrap();
        assert!(should_compile(&app1, &include));
        assert!(!should_compile(&app12, &include));
    }

    #[test]
    fn test_unreadable_file_is_ineligible() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone.js");
        assert!(!should_compile(&missing, &patterns(&[])));
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        // A lone "!" is not a valid gitignore line; the rest still work.
        let include = patterns(&["!", "human*.js"]);
        assert!(include.matches(Path::new("human.js")));
    }
}
