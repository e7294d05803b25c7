//! Filesystem watching for incremental sprite regeneration.
//!
//! A notify watcher feeds raw events into a [`debouncer::Debouncer`];
//! settled batches are classified into file vs directory changes and routed
//! into the collector's fan-out handlers. No sprite is eagerly rebuilt
//! here; the next document request recomposes on demand.

mod debouncer;
mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use crossbeam::channel::{self, RecvTimeoutError};
use notify::{RecursiveMode, Watcher};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::log;
use crate::sprite::Collector;

use debouncer::Debouncer;
use types::{Change, ChangeKind};

/// Poll ceiling so the loop notices shutdown even while idle.
const IDLE_POLL_MS: u64 = 500;

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

/// Watch `root` recursively and route debounced changes into the collector.
///
/// Blocks until `shutdown` is set or the watcher channel closes.
pub fn run(
    root: &Path,
    collector: &Arc<RwLock<Collector>>,
    shutdown: &Arc<AtomicBool>,
) -> Result<()> {
    let (tx, rx) = channel::unbounded();

    let mut watcher = notify::recommended_watcher(move |result| {
        tx.send(result).ok();
    })
    .context("Failed to create filesystem watcher")?;

    watcher
        .watch(root, RecursiveMode::Recursive)
        .with_context(|| format!("Failed to watch {}", root.display()))?;

    log!("watch"; "watching {}", root.display());

    let mut debouncer = Debouncer::new();

    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        let timeout = debouncer
            .sleep_duration()
            .min(Duration::from_millis(IDLE_POLL_MS));

        match rx.recv_timeout(timeout) {
            Ok(Ok(event)) => debouncer.add_event(&event),
            Ok(Err(e)) => log!("watch"; "watcher error: {e}"),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if let Some(changes) = debouncer.take_if_ready() {
            apply_changes(collector, changes);
        }
    }

    Ok(())
}

/// Route one settled batch of changes into the collector.
///
/// Directory creation triggers a single whole-pattern rescan per batch;
/// everything else is routed per path. Non-SVG file noise is dropped.
fn apply_changes(collector: &RwLock<Collector>, changes: FxHashMap<PathBuf, ChangeKind>) {
    let mut changes: Vec<Change> = changes.into_iter().collect();
    changes.sort_by(|a, b| a.0.cmp(&b.0));

    let mut collector = collector.write();
    let mut applied = 0usize;
    let mut rescan = false;

    for (path, kind) in &changes {
        match kind {
            ChangeKind::Created => {
                if path.is_dir() {
                    rescan = true;
                    applied += 1;
                } else if is_svg(path) {
                    collector.handle_add(path);
                    applied += 1;
                }
            }
            ChangeKind::Modified => {
                if is_svg(path) {
                    collector.handle_change(path);
                    applied += 1;
                }
            }
            ChangeKind::Removed => {
                if is_svg(path) {
                    collector.handle_unlink(path);
                } else {
                    // The path is gone, so we can't stat it; treat every
                    // non-SVG removal as a possible directory removal.
                    collector.handle_unlink_dir(path);
                }
                applied += 1;
            }
        }
    }

    if rescan {
        collector.handle_add_dir();
    }

    if applied > 0 {
        log!("watch"; "applied {} change{}", applied, if applied == 1 { "" } else { "s" });
    }
}
