//! File watcher for continuous compilation
//!
//! Implements the watch loop with:
//! - Debouncing (100ms)
//! - Full recompilation per change (output is an aggregate per root)
//! - Graceful Ctrl+C shutdown
//! - NDJSON output for CI
//!
//! The loop serializes hook calls; watcher implementations carry no
//! internal locking and rely on being called serially.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{
    Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode,
    Watcher as NotifyWatcher,
};

use crate::compiler::compile_all;
use crate::config::Config;
use crate::error::{TracewatchError, TracewatchResult};
use crate::project::{Project, INPUT_EXTENSION};
use crate::tool::ToolRunner;

/// Debounce duration in milliseconds
const DEBOUNCE_MS: u64 = 100;

/// Lifecycle hooks invoked by the watch loop (or any hosting build
/// framework). The host owns scheduling: hooks are called serially and
/// each runs to completion before the next event is handled.
pub trait Watcher {
    /// Whether `file` is in this watcher's domain at all. Suffix-based and
    /// independent of the content-based eligibility filter.
    fn accept(&self, file: &Path) -> bool;

    /// Full build with no triggering file, run once before events flow.
    fn on_start(&mut self) -> TracewatchResult<bool>;

    /// A file appeared. Returns `true` on success; compilation failures
    /// surface as a structured diagnostic inside the error.
    fn on_create(&mut self, file: &Path) -> TracewatchResult<bool>;

    /// A file changed.
    fn on_update(&mut self, file: &Path) -> TracewatchResult<bool>;

    /// A file disappeared. The aggregate output must reflect the removal.
    fn on_delete(&mut self, file: &Path) -> TracewatchResult<bool>;
}

/// The EcmaScript 6 watcher: every event triggers a full
/// discover/filter/batch/invoke pass over both asset roots, since the
/// output is one aggregate file per root.
pub struct Es6Watcher<T: ToolRunner> {
    project: Project,
    config: Config,
    tool: T,
}

impl<T: ToolRunner> Es6Watcher<T> {
    pub fn new(project: Project, config: Config, tool: T) -> Self {
        Self {
            project,
            config,
            tool,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// One full compilation pass, attributing failures to `trigger`.
    pub fn compile(&self, trigger: Option<&Path>) -> TracewatchResult<Vec<PathBuf>> {
        compile_all(&self.project, &self.config, &self.tool, trigger)
    }
}

impl<T: ToolRunner> Watcher for Es6Watcher<T> {
    fn accept(&self, file: &Path) -> bool {
        file.extension().is_some_and(|e| e == INPUT_EXTENSION)
    }

    fn on_start(&mut self) -> TracewatchResult<bool> {
        self.compile(None)?;
        Ok(true)
    }

    fn on_create(&mut self, file: &Path) -> TracewatchResult<bool> {
        self.compile(Some(file))?;
        Ok(true)
    }

    fn on_update(&mut self, file: &Path) -> TracewatchResult<bool> {
        self.on_create(file)
    }

    fn on_delete(&mut self, file: &Path) -> TracewatchResult<bool> {
        // Drop the stale aggregate of the owning root first, so a root
        // whose eligible set just became empty does not keep serving the
        // deleted code. The pass below recreates it when files remain.
        for root in self.project.roots() {
            if root.contains(file) {
                let output = root.output_file(&self.config.output);
                if output.exists() {
                    let _ = std::fs::remove_file(&output);
                }
            }
        }
        self.compile(None)?;
        Ok(true)
    }
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone)]
pub enum WatchEvent {
    Started { project: String },
    FileChanged { path: String },
    CompileStarted,
    CompileComplete,
    Error { message: String },
    Shutdown,
}

impl WatchEvent {
    pub fn to_json(&self) -> String {
        match self {
            WatchEvent::Started { project } => {
                format!(r#"{{"event":"started","project":"{}"}}"#, project)
            }
            WatchEvent::FileChanged { path } => {
                format!(r#"{{"event":"file_changed","path":"{}"}}"#, path)
            }
            WatchEvent::CompileStarted => r#"{"event":"compile_started"}"#.to_string(),
            WatchEvent::CompileComplete => r#"{"event":"compile_complete"}"#.to_string(),
            WatchEvent::Error { message } => {
                format!(
                    r#"{{"event":"error","message":"{}"}}"#,
                    message.replace('\\', "\\\\").replace('"', "\\\"")
                )
            }
            WatchEvent::Shutdown => r#"{"event":"shutdown"}"#.to_string(),
        }
    }
}

/// The hook to dispatch for a pending path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PendingKind {
    Created,
    Updated,
    Deleted,
}

/// Watcher state for debouncing
struct WatcherState {
    pending: HashMap<PathBuf, PendingKind>,
    last_change: Option<Instant>,
}

impl WatcherState {
    fn new() -> Self {
        Self {
            pending: HashMap::new(),
            last_change: None,
        }
    }

    fn add(&mut self, path: PathBuf, kind: PendingKind) {
        // Last event wins: a create followed by a delete is a delete.
        self.pending.insert(path, kind);
        self.last_change = Some(Instant::now());
    }

    fn should_flush(&self) -> bool {
        match self.last_change {
            Some(last) => {
                !self.pending.is_empty() && last.elapsed() >= Duration::from_millis(DEBOUNCE_MS)
            }
            None => false,
        }
    }

    fn take(&mut self) -> Vec<(PathBuf, PendingKind)> {
        let mut changes: Vec<_> = self.pending.drain().collect();
        changes.sort();
        self.last_change = None;
        changes
    }
}

/// Run the watch loop until `running` is cleared.
///
/// Performs an initial full pass, then dispatches debounced file events to
/// the watcher's hooks. Compilation diagnostics are reported through the
/// callback and the loop keeps running; fatal errors (tool resolution, IO)
/// end it.
pub fn watch<W: Watcher>(
    project: &Project,
    watcher: &mut W,
    running: Arc<AtomicBool>,
    event_callback: impl Fn(WatchEvent),
) -> TracewatchResult<()> {
    event_callback(WatchEvent::Started {
        project: project.base_dir.display().to_string(),
    });

    // Initial full build. A compile error here is reported, not fatal:
    // the watch continues so the user can fix the file.
    dispatch(watcher, W::on_start, &event_callback)?;

    let (tx, rx) = channel();
    let mut fs_watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                let kind = match event.kind {
                    EventKind::Create(_) => PendingKind::Created,
                    EventKind::Modify(_) => PendingKind::Updated,
                    EventKind::Remove(_) => PendingKind::Deleted,
                    _ => return,
                };
                for path in event.paths {
                    let _ = tx.send((path, kind));
                }
            }
        },
        NotifyConfig::default(),
    )
    .map_err(into_io)?;

    // Watch the source tree only; the build directory is written by the
    // compiler itself and must not feed back into the loop.
    let watched = source_tree(project);
    fs_watcher
        .watch(&watched, RecursiveMode::Recursive)
        .map_err(into_io)?;

    let mut state = WatcherState::new();
    while running.load(Ordering::SeqCst) {
        if let Ok((path, kind)) = rx.recv_timeout(Duration::from_millis(50)) {
            if watcher.accept(&path) && project.owns(&path) {
                event_callback(WatchEvent::FileChanged {
                    path: path.display().to_string(),
                });
                state.add(path, kind);
            }
        }

        if state.should_flush() {
            for (path, kind) in state.take() {
                let hook = move |w: &mut W| match kind {
                    PendingKind::Created => w.on_create(&path),
                    PendingKind::Updated => w.on_update(&path),
                    PendingKind::Deleted => w.on_delete(&path),
                };
                dispatch(watcher, hook, &event_callback)?;
            }
        }
    }

    event_callback(WatchEvent::Shutdown);
    Ok(())
}

/// Run one hook, reporting compilation diagnostics through the callback
/// and propagating only fatal errors.
fn dispatch<W: Watcher>(
    watcher: &mut W,
    hook: impl FnOnce(&mut W) -> TracewatchResult<bool>,
    event_callback: &impl Fn(WatchEvent),
) -> TracewatchResult<()> {
    event_callback(WatchEvent::CompileStarted);
    match hook(watcher) {
        Ok(_) => {
            event_callback(WatchEvent::CompileComplete);
            Ok(())
        }
        Err(TracewatchError::Compilation(diag)) => {
            event_callback(WatchEvent::Error {
                message: diag.to_string(),
            });
            Ok(())
        }
        Err(e) => {
            event_callback(WatchEvent::Error {
                message: e.to_string(),
            });
            Err(e)
        }
    }
}

fn source_tree(project: &Project) -> PathBuf {
    let src = project.base_dir.join("src");
    if src.is_dir() {
        src
    } else {
        project.base_dir.clone()
    }
}

fn into_io(e: notify::Error) -> TracewatchError {
    TracewatchError::Io(std::io::Error::other(e.to_string()))
}
