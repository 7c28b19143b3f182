use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "nomadtui=info,nomadtui_core=info";
const VERBOSE_LOG_FILTER: &str = "nomadtui=debug,nomadtui_core=debug";
const LOG_FILE_NAME: &str = "nomadtui.log";

/// Default log location: the platform state directory, falling back to the cache directory.
pub fn default_log_file() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::cache_dir)
        .map(|dir| dir.join("nomadtui").join(LOG_FILE_NAME))
}

/// Directory and file-name prefix for the rolling appender. A bare file name
/// lands in the current directory.
fn split_log_path(path: &Path) -> (PathBuf, OsString) {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| LOG_FILE_NAME.into());
    (dir, file_name)
}

/// Sends tracing output to a daily rolling file named after `path`. The
/// terminal is owned by the UI, so nothing is ever written to stdout or stderr.
///
/// Buffered lines are flushed when the returned guard is dropped; keep it
/// alive until the UI has exited.
pub fn init_logging(path: &Path, verbose: bool) -> io::Result<WorkerGuard> {
    let (dir, file_name) = split_log_path(path);
    fs::create_dir_all(&dir)?;

    let file_appender = tracing_appender::rolling::daily(dir, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        })
    });

    tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_env_filter(filter)
        .init();
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_log_path() {
        let (dir, name) = split_log_path(Path::new("/var/log/nomadtui/ui.log"));
        assert_eq!(dir, PathBuf::from("/var/log/nomadtui"));
        assert_eq!(name, OsString::from("ui.log"));

        let (dir, name) = split_log_path(Path::new("ui.log"));
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(name, OsString::from("ui.log"));

        let (_, name) = split_log_path(Path::new("/"));
        assert_eq!(name, OsString::from(LOG_FILE_NAME));
    }
}
