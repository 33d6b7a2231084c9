//! File-backed HistoryStore implementation.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Lines, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use recall_core::{HistoryError, HistoryStore, Result};

/// A `HistoryStore` that appends entries to a plain-text history file.
///
/// Each record is a timestamp comment followed by one `+`-prefixed line per
/// entry line and a blank separator:
///
/// ```text
/// # 2024-01-01T00:00:00Z
/// +explain this code
///
/// # 2024-01-01T00:00:05Z
/// +first line of a multi-line entry
/// +second line of the same entry
/// ```
///
/// Entries are stored verbatim and yielded back in file order, oldest
/// first. The loader streams the file line by line, so large histories are
/// never materialized in memory.
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    /// Creates a store writing to the given file.
    ///
    /// Parent directories are created if missing; the file itself is
    /// created on first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directories cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(Self { path })
    }

    /// Creates a store at the default location (~/.recall/history).
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined or if
    /// the directory structure cannot be created.
    pub fn default_location() -> Result<Self> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| HistoryError::store("failed to get home directory"))?;
        Self::new(home_dir.join(".recall").join("history"))
    }

    /// Returns the path of the underlying history file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for FileHistoryStore {
    fn store_string(&self, entry: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut record = format!(
            "\n# {}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        for line in entry.split('\n') {
            record.push('+');
            record.push_str(line);
            record.push('\n');
        }

        file.write_all(record.as_bytes())?;
        tracing::trace!(path = %self.path.display(), "appended history entry");
        Ok(())
    }

    fn load_history_strings(&self) -> Box<dyn Iterator<Item = Result<String>> + Send + '_> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            // A store that has never been written to reads as empty.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Box::new(std::iter::empty());
            }
            Err(err) => return Box::new(std::iter::once(Err(err.into()))),
        };

        Box::new(EntryIter {
            lines: BufReader::new(file).lines(),
            pending: None,
        })
    }
}

/// Streams entries out of the history file without materializing it.
///
/// Consecutive `+`-prefixed lines accumulate into one entry; any other line
/// (timestamp comment, blank separator) terminates the entry in progress.
struct EntryIter {
    lines: Lines<BufReader<File>>,
    pending: Option<String>,
}

impl Iterator for EntryIter {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.lines.next() {
                Some(Ok(line)) => {
                    if let Some(rest) = line.strip_prefix('+') {
                        match &mut self.pending {
                            Some(entry) => {
                                entry.push('\n');
                                entry.push_str(rest);
                            }
                            None => self.pending = Some(rest.to_string()),
                        }
                    } else if let Some(entry) = self.pending.take() {
                        return Some(Ok(entry));
                    }
                }
                Some(Err(err)) => return Some(Err(err.into())),
                None => return self.pending.take().map(Ok),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(temp_dir: &TempDir) -> FileHistoryStore {
        FileHistoryStore::new(temp_dir.path().join("history")).unwrap()
    }

    fn load_all(store: &FileHistoryStore) -> Vec<String> {
        store
            .load_history_strings()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_store_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        store.store_string("/help").unwrap();
        store.store_string("explain this code").unwrap();
        store.store_string("/cd /tmp").unwrap();

        assert_eq!(load_all(&store), vec!["/help", "explain this code", "/cd /tmp"]);
    }

    #[test]
    fn test_multi_line_entry_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        store.store_string("first line\nsecond line\nthird line").unwrap();
        store.store_string("/help").unwrap();

        assert_eq!(
            load_all(&store),
            vec!["first line\nsecond line\nthird line", "/help"]
        );
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        assert!(load_all(&store).is_empty());
    }

    #[test]
    fn test_entries_survive_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("history");

        {
            let store = FileHistoryStore::new(&path).unwrap();
            store.store_string("/help").unwrap();
        }

        let reopened = FileHistoryStore::new(&path).unwrap();
        reopened.store_string("explain this code").unwrap();

        assert_eq!(load_all(&reopened), vec!["/help", "explain this code"]);
    }

    #[test]
    fn test_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("history");

        let store = FileHistoryStore::new(&path).unwrap();
        store.store_string("/help").unwrap();

        assert!(path.exists());
        assert_eq!(load_all(&store), vec!["/help"]);
    }

    #[test]
    fn test_empty_entry_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        store.store_string("").unwrap();
        store.store_string("/help").unwrap();

        assert_eq!(load_all(&store), vec!["", "/help"]);
    }
}
