//! File watching for hot reload.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::event::ModifyKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

use agents_kit_catalog::Slug;

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A component module appeared
    ComponentAdded(PathBuf),

    /// A component module disappeared
    ComponentRemoved(PathBuf),

    /// A component module was renamed into or out of place
    ComponentRenamed(PathBuf),

    /// A component module changed
    ComponentModified(PathBuf),

    /// Any other change
    Other(PathBuf),
}

impl WatchEvent {
    /// Whether the event adds or removes a catalog page.
    pub fn changes_routes(&self) -> bool {
        matches!(
            self,
            WatchEvent::ComponentAdded(_)
                | WatchEvent::ComponentRemoved(_)
                | WatchEvent::ComponentRenamed(_)
        )
    }
}

/// File watcher for detecting changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Create a new file watcher for the given directories.
    ///
    /// Only direct children are watched; the catalog is flat.
    pub fn new(
        paths: &[PathBuf],
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for path in paths {
            if path.exists() {
                watcher
                    .watch(path, RecursiveMode::NonRecursive)
                    .map_err(std::io::Error::other)?;
            } else {
                tracing::warn!("Not watching missing directory {}", path.display());
            }
        }

        std::thread::spawn(move || {
            let mut last_modify: Option<Instant> = None;
            let debounce_duration = Duration::from_millis(100);

            while let Ok(event) = sync_rx.recv() {
                // Editors emit bursts of content changes; creations,
                // removals and renames always go through.
                if is_content_change(&event.kind) {
                    let now = Instant::now();
                    if last_modify.is_some_and(|last| now.duration_since(last) < debounce_duration) {
                        continue;
                    }
                    last_modify = Some(now);
                }

                for path in &event.paths {
                    if let Some(e) = classify_event(path, &event.kind) {
                        if async_tx.blocking_send(e).is_err() {
                            return;
                        }
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Modify(modify) if !matches!(modify, ModifyKind::Name(_)))
}

/// Classify a notify event into a WatchEvent.
fn classify_event(path: &Path, kind: &EventKind) -> Option<WatchEvent> {
    let is_component = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(Slug::from_file_name)
        .is_some();

    let path = path.to_path_buf();

    match kind {
        EventKind::Create(_) if is_component => Some(WatchEvent::ComponentAdded(path)),
        EventKind::Remove(_) if is_component => Some(WatchEvent::ComponentRemoved(path)),
        EventKind::Modify(ModifyKind::Name(_)) if is_component => {
            Some(WatchEvent::ComponentRenamed(path))
        }
        EventKind::Modify(_) if is_component => Some(WatchEvent::ComponentModified(path)),
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(_) => {
            Some(WatchEvent::Other(path))
        }
        _ => None,
    }
}
