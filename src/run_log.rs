use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File receiving the pretty-printed DOM of the fetched page
pub const SCRAPED_HTML_FILE: &str = "scraped.html";

/// File receiving the generated advertisement
pub const GENERATED_TEXT_FILE: &str = "generated.txt";

/// Run-scoped directory of flat log files
#[derive(Debug, Clone)]
pub struct RunLog {
    dir: PathBuf,
}

impl RunLog {
    /// Create `dir` if needed and remove everything already inside it
    pub fn reset(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            // file_type() does not follow symlinks, so a link to a directory is unlinked, not emptied
            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
            ::log::trace!("Removed stale log entry {}", path.display());
        }

        ::log::debug!("Log directory ready: {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Overwrite `filename` in the log directory. Failures are logged, never returned.
    pub fn write(&self, filename: &str, content: &str) {
        let path = self.dir.join(filename);
        match fs::write(&path, content) {
            Ok(()) => ::log::debug!("Wrote {} bytes to {}", content.len(), path.display()),
            Err(e) => ::log::warn!("Failed to write log file {}: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_creates_missing_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("logs");

        let log = RunLog::reset(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(log.dir(), dir.as_path());
    }

    #[test]
    fn test_reset_removes_stale_files_and_directories() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("logs");
        fs::create_dir_all(dir.join("old_run").join("deeper")).unwrap();
        fs::write(dir.join("scraped.html"), "<html>stale</html>").unwrap();
        fs::write(dir.join("old_run").join("deeper").join("x.txt"), "x").unwrap();

        RunLog::reset(&dir).unwrap();

        assert!(dir.is_dir());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let root = tempfile::tempdir().unwrap();
        let log = RunLog::reset(root.path().join("logs")).unwrap();

        log.write(GENERATED_TEXT_FILE, "first version, rather long");
        log.write(GENERATED_TEXT_FILE, "second");

        let content = fs::read_to_string(log.dir().join(GENERATED_TEXT_FILE)).unwrap();
        assert_eq!(content, "second");
    }

    #[test]
    fn test_write_failure_does_not_panic() {
        let root = tempfile::tempdir().unwrap();
        let log = RunLog::reset(root.path().join("logs")).unwrap();
        fs::remove_dir_all(log.dir()).unwrap();

        // Directory is gone; the write is logged and skipped
        log.write(SCRAPED_HTML_FILE, "<html></html>");
        assert!(!log.dir().join(SCRAPED_HTML_FILE).exists());
    }
}
