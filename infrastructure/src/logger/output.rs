//! Record destinations
//!
//! Every record goes to the primary writer (standard error unless replaced)
//! and to each configured file.

use super::error::{LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::warn;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

/// Open `path` for appending, creating it with owner-only permissions
pub fn open_append(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

/// Tee over the primary writer and the output files
pub(crate) struct Output {
    writer: BoxMakeWriter,
    lock: Mutex<()>,
}

impl Output {
    /// Open every path in order; the first failure aborts construction.
    ///
    /// Files are never closed by the logger. They live until the last
    /// handle is dropped, usually at process exit.
    pub(crate) fn open(primary: BoxMakeWriter, paths: &[PathBuf]) -> Result<Self> {
        let mut writer = primary;
        for path in paths {
            let file = open_append(path).map_err(|source| LoggerError::OpenOutput {
                path: path.clone(),
                source,
            })?;
            writer = BoxMakeWriter::new(writer.and(Mutex::new(file)));
        }

        Ok(Self {
            writer,
            lock: Mutex::new(()),
        })
    }

    /// Write one formatted record to every destination
    pub(crate) fn write(&self, line: &[u8]) {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut writer = self.writer.make_writer();
        if let Err(e) = writer.write_all(line).and_then(|()| writer.flush()) {
            warn!(error = %e, "failed to write log record");
        }
    }
}
