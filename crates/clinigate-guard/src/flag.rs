//! Demo-mode flag stores.
//!
//! The guard only reads these. Writes come from outside the guard, e.g. a
//! login screen that enters demo mode or a logout action that leaves it.

use crate::ports::DemoModeFlag;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Well-known key under which the demo flag is persisted.
pub const DEMO_MODE_KEY: &str = "demo_mode";

/// Errors raised when writing a persisted flag.
#[derive(Debug, Error)]
pub enum FlagError {
    /// The flag file could not be written or removed.
    #[error("Demo flag I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Process-wide in-memory flag.
///
/// Clones share the same underlying value, so one handle can be given to the
/// guard and another to the code that toggles demo mode.
#[derive(Debug, Clone, Default)]
pub struct MemoryDemoFlag {
    enabled: Arc<AtomicBool>,
}

impl MemoryDemoFlag {
    /// Create a flag that starts disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a flag with an initial value.
    pub fn with_value(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    /// Enable demo mode.
    pub fn set(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    /// Disable demo mode.
    pub fn clear(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }
}

impl DemoModeFlag for MemoryDemoFlag {
    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

/// Flag persisted as a file named [`DEMO_MODE_KEY`] inside a directory.
///
/// The file holds `true` when demo mode is on. A missing file, unreadable
/// file or any other content reads as disabled. Every read goes to disk.
#[derive(Debug, Clone)]
pub struct FileDemoFlag {
    path: PathBuf,
}

impl FileDemoFlag {
    /// Use `dir/demo_mode` as the backing file.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(DEMO_MODE_KEY),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist demo mode as enabled.
    pub fn set(&self) -> Result<(), FlagError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, "true")?;
        Ok(())
    }

    /// Remove the persisted flag. Clearing an absent flag succeeds.
    pub fn clear(&self) -> Result<(), FlagError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl DemoModeFlag for FileDemoFlag {
    fn is_enabled(&self) -> bool {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents.trim() == "true",
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                tracing::debug!(error = %e, "demo flag unreadable; treating as disabled");
                false
            }
        }
    }
}
