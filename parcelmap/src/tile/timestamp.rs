//! Modification timestamps and the staleness rule.

use std::fs::{File, Metadata};
use std::path::Path;
use std::time::{Duration, SystemTime};

/// A file modification time.
///
/// Wraps [`SystemTime`] so tests can build synthetic timestamps without
/// touching the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(SystemTime);

impl Timestamp {
    /// Wraps a system time.
    pub const fn new(time: SystemTime) -> Self {
        Self(time)
    }

    /// A timestamp `secs` seconds after the Unix epoch.
    pub fn from_secs(secs: u64) -> Self {
        Self(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self(SystemTime::now())
    }

    /// Reads the modification time of a file's metadata.
    pub fn from_metadata(metadata: &Metadata) -> std::io::Result<Self> {
        metadata.modified().map(Self)
    }

    /// Modification time of `path`, or `None` if it does not exist.
    pub fn of_path(path: &Path) -> std::io::Result<Option<Self>> {
        match std::fs::metadata(path) {
            Ok(metadata) => Self::from_metadata(&metadata).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Sets the modification time of `path` to this timestamp.
    pub fn apply_to(&self, path: &Path) -> std::io::Result<()> {
        let file = File::options().write(true).open(path)?;
        file.set_modified(self.0)
    }

    /// The wrapped system time.
    pub fn as_system_time(&self) -> SystemTime {
        self.0
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        Self(time)
    }
}

/// Whether an output must be regenerated from its input.
///
/// A missing output is infinitely old. An existing output is stale only when
/// the input is strictly newer; equal timestamps are up to date.
pub fn is_stale(required: Timestamp, existing: Option<Timestamp>) -> bool {
    match existing {
        None => true,
        Some(existing) => required > existing,
    }
}
